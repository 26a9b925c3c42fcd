//! Token sources
//!
//! A token source performs the credential exchange with an authorization
//! server. The token cache decides *when* to call it.

use serde::Deserialize;

use crate::cache::error::TokenError;

pub mod fetch;
pub mod oauth2;

pub use fetch::TokenEndpoint;
pub use oauth2::OAuth2Source;

/// Raw token endpoint response (RFC 6749 section 5.1)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
}

impl TokenResponse {
    pub fn parse(body: &str) -> Result<Self, TokenError> {
        serde_json::from_str(body).map_err(|err| TokenError::MalformedResponse(err.to_string()))
    }
}
