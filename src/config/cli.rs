use crate::app::flows::contact::{SUCCESS_DISMISS_AFTER, SUCCESS_FADE_AFTER};
use crate::app::flows::post_browser::SEARCH_QUIET_PERIOD;
use crate::config::{DEFAULT_API_BASE, DEFAULT_CONTACT_PATH, DEFAULT_POSTS_PATH};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 命令列參數。給了 `--message` 就走聯絡表單流程，否則瀏覽文章列表。
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "showroom-client")]
#[command(about = "Headless client for the furniture showroom site")]
pub struct CliConfig {
    /// API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// 文章列表端點，相對於 base
    #[arg(long, default_value = DEFAULT_POSTS_PATH)]
    pub posts_path: String,

    /// 聯絡表單端點，相對於 base
    #[arg(long, default_value = DEFAULT_CONTACT_PATH)]
    pub contact_path: String,

    /// 單一請求的逾時秒數
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// 搜尋關鍵字
    #[arg(long, default_value = "")]
    pub search: String,

    /// 頁碼，1 起算
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// 展開全文的文章 id，可重複指定
    #[arg(long)]
    pub expand: Vec<i64>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub service: Option<String>,

    /// 留言內容
    #[arg(long)]
    pub message: Option<String>,

    /// TOML 設定檔路徑，優先於上面的端點參數
    #[arg(long)]
    pub config: Option<String>,

    /// 只檢查設定不發請求
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, short)]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn posts_path(&self) -> &str {
        &self.posts_path
    }

    fn contact_path(&self) -> &str {
        &self.contact_path
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn extra_headers(&self) -> Option<&HashMap<String, String>> {
        // 自訂標頭只開放給 TOML 設定檔
        None
    }

    fn search_quiet_ms(&self) -> u64 {
        SEARCH_QUIET_PERIOD.as_millis() as u64
    }

    fn success_fade_ms(&self) -> u64 {
        SUCCESS_FADE_AFTER.as_millis() as u64
    }

    fn success_dismiss_ms(&self) -> u64 {
        SUCCESS_DISMISS_AFTER.as_millis() as u64
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base", &self.api_base)?;
        validation::validate_non_empty_string("posts_path", &self.posts_path)?;
        validation::validate_non_empty_string("contact_path", &self.contact_path)?;
        validation::validate_positive_number("page", self.page as usize, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_the_production_site() {
        let config = CliConfig::try_parse_from(["showroom-client"]).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.posts_path, "posts.php");
        assert_eq!(config.contact_path, "submit_contact.php");
        assert_eq!(config.page, 1);
        assert_eq!(config.search, "");
        assert!(config.message.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_browse_flags_parse() {
        let config = CliConfig::try_parse_from([
            "showroom-client",
            "--search",
            "ceiling",
            "--page",
            "2",
            "--expand",
            "7",
            "--expand",
            "9",
        ])
        .unwrap();
        assert_eq!(config.search, "ceiling");
        assert_eq!(config.page, 2);
        assert_eq!(config.expand, vec![7, 9]);
    }

    #[test]
    fn test_page_zero_fails_validation() {
        let config = CliConfig::try_parse_from(["showroom-client", "--page", "0"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flow_timings_use_the_built_in_defaults() {
        let config = CliConfig::try_parse_from(["showroom-client"]).unwrap();
        assert_eq!(config.search_quiet_ms(), 400);
        assert_eq!(config.success_fade_ms(), 2500);
        assert_eq!(config.success_dismiss_ms(), 3000);
    }
}
