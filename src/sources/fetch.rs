use std::future::Future;
use std::sync::Arc;

use crate::cache::error::TokenError;
use crate::sources::TokenResponse;

/// Performs one credential exchange against an authorization server.
///
/// Implementations do no caching and no retrying; every call is a network
/// round-trip.
pub trait TokenEndpoint: Send + Sync {
    fn request_token(&self) -> impl Future<Output = Result<TokenResponse, TokenError>> + Send;

    /// Static client identifier sent next to the credential on content calls.
    fn client_id(&self) -> Result<String, TokenError>;
}

impl<T: TokenEndpoint> TokenEndpoint for Arc<T> {
    fn request_token(&self) -> impl Future<Output = Result<TokenResponse, TokenError>> + Send {
        (**self).request_token()
    }

    fn client_id(&self) -> Result<String, TokenError> {
        (**self).client_id()
    }
}
