use thiserror::Error;

/// Failure of a token lookup or refresh.
///
/// Cloneable so that a single failed refresh can be handed to every caller
/// that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// A required configuration value is absent or empty.
    #[error("missing required configuration '{0}'")]
    Configuration(String),

    /// Network failure, timeout or non-success status from the token endpoint.
    #[error("token refresh failed: {0}")]
    RefreshTransport(String),

    /// The token endpoint answered with an unusable body.
    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}

impl TokenError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Configuration(_) => "configuration",
            TokenError::RefreshTransport(_) => "transport",
            TokenError::MalformedResponse(_) => "malformed",
        }
    }
}
