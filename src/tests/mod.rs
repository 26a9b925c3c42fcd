pub mod common;

mod oauth2_token_endpoint;
mod retry_policy;
