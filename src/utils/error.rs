use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpmError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    StatusError {
        status: u16,
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("Max retries exceeded for {url}: {attempts} attempts, last status {status}")]
    RetriesExhausted {
        attempts: u32,
        status: u16,
        url: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Exercise fetch failed: {message}")]
    FetchFailed { message: String },
}

/// 擷取器對外的錯誤型別
pub type FetchError = SpmError;

pub type Result<T> = std::result::Result<T, SpmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Data,
    Configuration,
    Input,
}

impl SpmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SpmError::ApiError(_) | SpmError::IoError(_) => ErrorCategory::Network,
            SpmError::StatusError { .. }
            | SpmError::RetriesExhausted { .. }
            | SpmError::FetchFailed { .. } => ErrorCategory::Remote,
            SpmError::SerializationError(_) => ErrorCategory::Data,
            SpmError::ConfigValidationError { .. }
            | SpmError::InvalidConfigValueError { .. }
            | SpmError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SpmError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    /// 回應狀態碼（如果錯誤來自 HTTP 回應）
    pub fn status(&self) -> Option<u16> {
        match self {
            SpmError::ApiError(e) => e.status().map(|s| s.as_u16()),
            SpmError::StatusError { status, .. } | SpmError::RetriesExhausted { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SpmError::ApiError(e) if e.is_timeout() => "The remote service timed out".to_string(),
            SpmError::ApiError(_) => "Could not reach the remote service".to_string(),
            SpmError::StatusError { status, .. } => {
                format!("The remote service answered with HTTP {}", status)
            }
            SpmError::RetriesExhausted { attempts, .. } => {
                format!("The remote service stayed unavailable after {} attempts", attempts)
            }
            SpmError::SerializationError(_) => "The remote service sent unexpected data".to_string(),
            SpmError::IoError(e) => format!("File access failed: {}", e),
            SpmError::ConfigValidationError { .. }
            | SpmError::InvalidConfigValueError { .. }
            | SpmError::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
            SpmError::ValidationError { message } => format!("Invalid input: {}", message),
            SpmError::FetchFailed { message } => {
                format!("Could not fetch exercises: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the configured base URL",
            ErrorCategory::Remote => "Retry later or verify the request parameters",
            ErrorCategory::Data => "Verify the endpoint returns the expected JSON format",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::Input => "Check the values passed on the command line",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => 1,
            ErrorCategory::Remote => 2,
            ErrorCategory::Network | ErrorCategory::Data => 3,
        }
    }
}
