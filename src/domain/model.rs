use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Post {
    /// 卡片主圖，沒有圖片時呼叫端顯示佔位內容
    pub fn lead_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// 展開視圖的附屬圖庫：第一張以外的圖片，只有一張時為空
    pub fn gallery(&self) -> &[String] {
        if self.images.len() > 1 {
            &self.images[1..]
        } else {
            &[]
        }
    }

    /// 後端的時間戳有 RFC 3339 和 PHP 的 `Y-m-d H:i:s` 兩種，解析不了就不顯示日期
    pub fn created_date(&self) -> Option<NaiveDate> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        NaiveDate::parse_from_str(&self.created_at, "%Y-%m-%d").ok()
    }
}

/// 列表端點的回應封套。缺少的欄位不是錯誤：沒有 posts 視為空頁，沒有 pages 視為單頁。
#[derive(Debug, Clone, Deserialize)]
pub struct PostListEnvelope {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default = "default_page_count")]
    pub pages: u32,
}

fn default_page_count() -> u32 {
    1
}

/// 一次查詢快取的一頁結果
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub pages: u32,
}

impl From<PostListEnvelope> for PostPage {
    fn from(envelope: PostListEnvelope) -> Self {
        Self {
            posts: envelope.posts,
            // 總頁數契約上 ≥ 1，後端送 0 不能把分頁卡死
            pages: envelope.pages.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Service,
    Message,
}

/// 聯絡表單：五個自由字串欄位，整包序列化成提交的 JSON body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl ContactForm {
    pub fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = value,
            ContactField::Service => self.service = value,
            ContactField::Message => self.message = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.service.is_empty()
            && self.message.is_empty()
    }
}

/// 提交端點的回應封套
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// 提交成功後交給呼叫端的回執，message 是後端附的感謝文案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
}
