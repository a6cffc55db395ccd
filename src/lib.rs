// Headless client for the furniture showroom site: post browsing with
// debounced search, and the contact form submission flow.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::app::flows::contact::{ContactEvent, ContactSubmitter, SubmitPhase};
pub use crate::app::flows::post_browser::{BrowseEvent, BrowsePhase, CardView, PostBrowser};
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;
pub use crate::core::api::SiteApi;
pub use crate::domain::model::{ContactField, ContactForm, Post, PostPage, SubmitReceipt};
pub use crate::domain::ports::{ConfigProvider, ContactSink, PostListing};
pub use crate::utils::error::{Result, SiteError};
