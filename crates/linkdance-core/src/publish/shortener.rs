//! URL shortening capability
//!
//! Shortening is optional: the publisher treats every failure the same way
//! and falls back to the long view URL.

use async_trait::async_trait;
use thiserror::Error;

/// Why a shortening attempt failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortenError {
    /// Service unreachable (DNS, connect, timeout, blocked)
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered, but not with a usable short URL
    #[error("Shortening service error: {0}")]
    Service(String),
}

/// Something that turns a long URL into a short one
#[async_trait]
pub trait Shortener: Send + Sync {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError>;
}
