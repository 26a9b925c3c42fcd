pub mod credential;
pub mod error;
pub mod token_cache;

pub use credential::Credential;
pub use error::TokenError;
pub use token_cache::TokenCache;
