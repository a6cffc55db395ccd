use crate::domain::model::{ContactForm, PostPage, SubmitReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 文章列表閘道：每次 (頁碼, 搜尋詞) 觸發都對應恰好一次請求
#[async_trait]
pub trait PostListing: Send + Sync {
    async fn fetch_page(&self, page: u32, search: &str) -> Result<PostPage>;
}

/// 聯絡表單閘道：整份表單一次送出
#[async_trait]
pub trait ContactSink: Send + Sync {
    async fn submit(&self, form: &ContactForm) -> Result<SubmitReceipt>;
}

/// 部署設定注入點。base URL 只能從這裡來，程式碼不寫死。
pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn posts_path(&self) -> &str;
    fn contact_path(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn extra_headers(&self) -> Option<&HashMap<String, String>>;
    fn search_quiet_ms(&self) -> u64;
    fn success_fade_ms(&self) -> u64;
    fn success_dismiss_ms(&self) -> u64;
}
