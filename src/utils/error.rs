use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned error status: {status}")]
    HttpStatus { status: reqwest::StatusCode },

    #[error("Malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Submission rejected: {message}")]
    Rejected { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

impl SiteError {
    /// 轉成給使用者看的錯誤訊息，細節留在日誌裡
    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::Transport(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            SiteError::HttpStatus { status } => format!(
                "Server error (HTTP {}). Please try again later.",
                status.as_u16()
            ),
            SiteError::MalformedResponse(_) => "Invalid response from server.".to_string(),
            SiteError::Rejected { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// 錯誤的修復建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            SiteError::Transport(_) => {
                "Check the network connection and that the API base URL is reachable".to_string()
            }
            SiteError::HttpStatus { .. } => {
                "The backend may be temporarily down, retry in a moment".to_string()
            }
            SiteError::MalformedResponse(_) => {
                "Verify the endpoint returns the expected JSON envelope".to_string()
            }
            SiteError::Rejected { .. } => "Review the submitted fields and try again".to_string(),
            SiteError::IoError(_) => "Check that the file exists and is readable".to_string(),
            SiteError::ConfigValidationError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            SiteError::InvalidConfigValueError { .. } => {
                "Correct the named configuration field".to_string()
            }
            SiteError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
