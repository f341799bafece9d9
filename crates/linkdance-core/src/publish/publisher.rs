//! Publishing
//!
//! Publishing builds the long view URL for a profile and then tries to
//! shorten it. A shortening failure is never a publish failure: the long URL
//! is returned instead. The only way to fail is a profile without a name.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::codec::{build_view_url, encode};
use super::shortener::Shortener;
use crate::models::Profile;

/// Publish was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Please add a name before publishing")]
    MissingName,
}

/// Produces shareable URLs for profiles
#[derive(Clone)]
pub struct Publisher {
    origin: String,
    shortener: Option<Arc<dyn Shortener>>,
}

impl Publisher {
    /// Publisher for the given origin, without shortening
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            shortener: None,
        }
    }

    /// Attach a shortening service
    pub fn with_shortener(mut self, shortener: Arc<dyn Shortener>) -> Self {
        self.shortener = Some(shortener);
        self
    }

    /// Origin that view URLs point at
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Long-form view URL for a profile
    pub fn view_url(&self, profile: &Profile) -> String {
        build_view_url(&self.origin, &encode(profile))
    }

    /// Publish a snapshot of the profile
    ///
    /// The shortening call is not cancelled if the caller stops waiting; its
    /// result is simply dropped.
    pub async fn publish(&self, profile: &Profile) -> Result<String, PublishError> {
        if profile.name.is_empty() {
            return Err(PublishError::MissingName);
        }

        let long_url = self.view_url(profile);

        let Some(ref shortener) = self.shortener else {
            return Ok(long_url);
        };

        match shortener.shorten(&long_url).await {
            Ok(short) if !short.trim().is_empty() => {
                info!("Published profile {} as {}", profile.id, short);
                Ok(short)
            }
            Ok(_) => {
                warn!("Shortener returned an empty URL; using long URL");
                Ok(long_url)
            }
            Err(e) => {
                warn!("Error generating short URL, using long URL: {}", e);
                Ok(long_url)
            }
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("origin", &self.origin)
            .field("shortening", &self.shortener.is_some())
            .finish()
    }
}
