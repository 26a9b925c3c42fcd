use http::StatusCode;
use thiserror::Error;

use crate::cache::error::TokenError;

#[derive(Debug, Error)]
pub enum ContentError {
    /// A required content configuration value is absent or empty.
    #[error("missing required configuration '{0}'")]
    Configuration(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("content request failed: {0}")]
    Transport(String),

    #[error("content api returned {0}")]
    Status(StatusCode),

    #[error("malformed content response: {0}")]
    Decode(String),
}

impl ContentError {
    /// Transport failures and upstream 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ContentError::Transport(_) => true,
            ContentError::Status(status) => status.is_server_error(),
            _ => false,
        }
    }

    /// Status the local proxy answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ContentError::Token(_) => StatusCode::SERVICE_UNAVAILABLE,
            ContentError::Transport(_) | ContentError::Status(_) | ContentError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}
