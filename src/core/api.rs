use crate::core::{
    ConfigProvider, ContactForm, ContactSink, PostListing, PostPage, Result, SubmitReceipt,
};
use crate::domain::model::{PostListEnvelope, SubmitEnvelope};
use crate::utils::error::SiteError;
use reqwest::Client;

/// 兩個遠端端點的 reqwest 閘道，同時實作列表與提交兩個 port。
/// 端點、標頭、逾時全部來自注入的設定。
pub struct SiteApi<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> SiteApi<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn apply_request_options(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        if let Some(headers) = self.config.extra_headers() {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }
        if let Some(timeout) = self.config.timeout_seconds() {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }
        request
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> PostListing for SiteApi<C> {
    async fn fetch_page(&self, page: u32, search: &str) -> Result<PostPage> {
        let url = self.endpoint(self.config.posts_path());
        let page_param = page.to_string();

        tracing::debug!("📡 GET {} (page {}, search {:?})", url, page, search);
        let request = self
            .client
            .get(&url)
            .query(&[("page", page_param.as_str()), ("search", search)]);
        let response = self.apply_request_options(request).send().await?;

        let status = response.status();
        tracing::debug!("📡 Listing response status: {}", status);
        if !status.is_success() {
            return Err(SiteError::HttpStatus { status });
        }

        // body 先收成文字再解析，讓壞掉的 JSON 是獨立的錯誤類別
        let body = response.text().await?;
        let envelope: PostListEnvelope = serde_json::from_str(&body)?;
        Ok(PostPage::from(envelope))
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> ContactSink for SiteApi<C> {
    async fn submit(&self, form: &ContactForm) -> Result<SubmitReceipt> {
        let url = self.endpoint(self.config.contact_path());

        tracing::debug!("📨 POST {}", url);
        let request = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(form);
        let response = self.apply_request_options(request).send().await?;

        let status = response.status();
        tracing::debug!("📨 Submission response status: {}", status);

        // 錯誤狀態碼也要解析 body：後端用非 2xx 夾帶拒絕訊息，等同 success: false
        let body = response.text().await?;
        let envelope: SubmitEnvelope = serde_json::from_str(&body)?;

        if status.is_success() && envelope.success {
            Ok(SubmitReceipt {
                message: envelope.message,
            })
        } else {
            Err(SiteError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to send message. Please try again.".to_string()),
            })
        }
    }
}
