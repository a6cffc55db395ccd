use crate::app::flows::contact::{SUCCESS_DISMISS_AFTER, SUCCESS_FADE_AFTER};
use crate::app::flows::post_browser::SEARCH_QUIET_PERIOD;
use crate::config::{DEFAULT_CONTACT_PATH, DEFAULT_POSTS_PATH};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// TOML 設定檔，部署用。`${VAR}` 會先用環境變數替換再解析。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub site: SiteConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub flows: Option<FlowsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub description: Option<String>,
}

/// 遠端資料來源：base URL、端點路徑、逾時與額外標頭
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub api_base: String,
    pub posts_path: Option<String>,
    pub contact_path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

/// 流程時間參數，省略的欄位用內建值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowsConfig {
    pub search_quiet_ms: Option<u64>,
    pub success_fade_ms: Option<u64>,
    pub success_dismiss_ms: Option<u64>,
}

impl TomlConfig {
    /// 讀取 TOML 設定檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 解析 TOML 字串。只管格式，語意檢查走 `validate()`
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 環境變數先替換再解析
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOWROOM_API_BASE})，查不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("site.name", &self.site.name)?;
        validation::validate_url("source.api_base", &self.source.api_base)?;
        if let Some(path) = &self.source.posts_path {
            validation::validate_non_empty_string("source.posts_path", path)?;
        }
        if let Some(path) = &self.source.contact_path {
            validation::validate_non_empty_string("source.contact_path", path)?;
        }
        if let Some(flows) = &self.flows {
            if let Some(ms) = flows.search_quiet_ms {
                validation::validate_range("flows.search_quiet_ms", ms, 1, 60_000)?;
            }
            if let Some(ms) = flows.success_fade_ms {
                validation::validate_range("flows.success_fade_ms", ms, 1, 600_000)?;
            }
            if let Some(ms) = flows.success_dismiss_ms {
                validation::validate_range("flows.success_dismiss_ms", ms, 1, 600_000)?;
            }
        }

        // 淡出要先於收合，省略其中一邊時用預設值一起比
        let fade = self.success_fade_ms();
        let dismiss = self.success_dismiss_ms();
        if fade >= dismiss {
            return Err(SiteError::InvalidConfigValueError {
                field: "flows.success_fade_ms".to_string(),
                value: fade.to_string(),
                reason: format!(
                    "Fade must start before the message is dismissed at {} ms",
                    dismiss
                ),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base(&self) -> &str {
        &self.source.api_base
    }

    fn posts_path(&self) -> &str {
        self.source.posts_path.as_deref().unwrap_or(DEFAULT_POSTS_PATH)
    }

    fn contact_path(&self) -> &str {
        self.source
            .contact_path
            .as_deref()
            .unwrap_or(DEFAULT_CONTACT_PATH)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn extra_headers(&self) -> Option<&HashMap<String, String>> {
        self.source.headers.as_ref()
    }

    fn search_quiet_ms(&self) -> u64 {
        self.flows
            .as_ref()
            .and_then(|f| f.search_quiet_ms)
            .unwrap_or(SEARCH_QUIET_PERIOD.as_millis() as u64)
    }

    fn success_fade_ms(&self) -> u64 {
        self.flows
            .as_ref()
            .and_then(|f| f.success_fade_ms)
            .unwrap_or(SUCCESS_FADE_AFTER.as_millis() as u64)
    }

    fn success_dismiss_ms(&self) -> u64 {
        self.flows
            .as_ref()
            .and_then(|f| f.success_dismiss_ms)
            .unwrap_or(SUCCESS_DISMISS_AFTER.as_millis() as u64)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
