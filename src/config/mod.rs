#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::toml_config::TomlConfig;

/// 未另行設定時指向正式站台
pub const DEFAULT_API_BASE: &str = "https://unique-furniture.infinityfreeapp.com/api";
pub const DEFAULT_POSTS_PATH: &str = "posts.php";
pub const DEFAULT_CONTACT_PATH: &str = "submit_contact.php";
