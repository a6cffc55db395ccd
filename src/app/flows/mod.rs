pub mod contact;
pub mod post_browser;
