//! # Quran Gateway Library
//!
//! Proxies the upstream Quran content API behind a shared OAuth2
//! client-credentials token cache, and reshapes upstream JSON into a local
//! envelope.
//!
//! Modules:
//! - `cache`: single-flight bearer token cache
//! - `sources`: token endpoint abstraction and the OAuth2 client-credentials source
//! - `content`: authenticated upstream content client
//! - `server`: axum routes for the local API
//! - `audio`: verse playback sequencing
//! - `config`: service configuration

pub mod audio;
pub mod cache;
pub mod config;
pub mod content;
pub mod helpers;
pub mod observability;
pub mod resilience;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::cache::{Credential, TokenCache, TokenError};
pub use crate::config::sources::ServiceConfig;
