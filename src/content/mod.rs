//! Authenticated access to the upstream content API.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ContentClient, VersesQuery};
pub use error::ContentError;
