//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use scratchpad_chat_core::CoreError;
use scratchpad_chat_llm::LlmError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No API key has been supplied for the session
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Hosted model call failed
    #[error("Model request failed: {0}")]
    Transport(LlmError),

    /// Uploaded text could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart preparation or rendering errors
    #[error("Chart error: {0}")]
    Chart(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a missing credential error
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => Self::NotFound(msg),
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Parse(msg) => Self::Validation(msg),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey { provider } => {
                Self::MissingCredential(format!("API key not configured for {}", provider))
            }
            other => Self::Transport(other),
        }
    }
}

/// Convert AppError to a string suitable for command responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
