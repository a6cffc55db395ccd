pub mod api;
pub mod excerpt;
pub mod timer;

pub use crate::domain::model::{ContactField, ContactForm, Post, PostPage, SubmitReceipt};
pub use crate::domain::ports::{ConfigProvider, ContactSink, PostListing};
pub use crate::utils::error::Result;
