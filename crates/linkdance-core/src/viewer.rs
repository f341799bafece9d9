//! Read-only profile viewer
//!
//! Reconstructs a profile from the `data` query parameter of a view URL. The
//! result depends only on the location it was mounted with: the viewer never
//! reads the local store, and a different token needs a fresh mount.

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::models::Profile;
use crate::publish::{decode, DATA_PARAM};

/// Base used to resolve relative locations such as `/view?data=...`
const RELATIVE_BASE: &str = "http://localhost/";

/// Why a view could not be shown
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// The location carries no token
    #[error("No profile data found")]
    NoData,
    /// The token did not decode into a profile
    #[error("Invalid profile data")]
    InvalidData,
    /// Anything else went wrong while loading
    #[error("Failed to load profile")]
    LoadFailed,
}

/// What the viewer is showing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Error(ViewError),
    Loaded(Profile),
}

impl ViewState {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            ViewState::Loaded(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ViewError> {
        match self {
            ViewState::Error(e) => Some(*e),
            _ => None,
        }
    }
}

/// Viewer bound to one location
#[derive(Debug, Clone)]
pub struct Viewer {
    location: String,
    state: ViewState,
}

impl Viewer {
    /// Mount on a location; the state starts as `Loading`
    ///
    /// Accepts an absolute URL, a path with a query (`/view?data=...`) or a
    /// bare query string (`data=...`).
    pub fn mount(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            state: ViewState::Loading,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Run the decode attempt once and settle on `Loaded` or `Error`
    pub fn resolve(&mut self) -> &ViewState {
        if self.state == ViewState::Loading {
            self.state = load(&self.location);
        }
        &self.state
    }

    /// Consume the viewer, returning its settled state
    pub fn into_state(mut self) -> ViewState {
        self.resolve();
        self.state
    }
}

/// Mount and resolve in one step
pub fn reconstruct(location: &str) -> ViewState {
    Viewer::mount(location).into_state()
}

fn load(location: &str) -> ViewState {
    let token = match query_token(location) {
        Ok(Some(token)) => token,
        Ok(None) => return ViewState::Error(ViewError::NoData),
        Err(e) => {
            warn!("Error loading profile from {:?}: {}", location, e);
            return ViewState::Error(ViewError::LoadFailed);
        }
    };

    match decode(&token) {
        Ok(profile) => ViewState::Loaded(profile),
        Err(e) => {
            warn!("Error decoding profile data: {}", e);
            ViewState::Error(ViewError::InvalidData)
        }
    }
}

/// Non-empty `data` value of the location's query, percent-decoded
fn query_token(location: &str) -> Result<Option<String>, url::ParseError> {
    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RELATIVE_BASE)?;
            if location.starts_with('/') || location.starts_with('?') {
                base.join(location)?
            } else {
                base.join(&format!("?{}", location))?
            }
        }
        Err(e) => return Err(e),
    };

    Ok(url
        .query_pairs()
        .find(|(key, _)| key == DATA_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::{build_view_url, encode};

    #[test]
    fn test_mount_starts_loading() {
        let viewer = Viewer::mount("/view");
        assert_eq!(viewer.state(), &ViewState::Loading);
        assert_eq!(viewer.location(), "/view");
    }

    #[test]
    fn test_loads_published_url() {
        let profile = Profile::demo();
        let url = build_view_url("https://bio.example", &encode(&profile));

        let mut viewer = Viewer::mount(url);
        assert_eq!(viewer.resolve().profile(), Some(&profile));
    }

    #[test]
    fn test_relative_and_bare_locations() {
        let profile = Profile::demo();
        let token = encode(&profile);

        for location in [
            format!("/view?data={}", token),
            format!("?data={}", token),
            format!("data={}", token),
        ] {
            assert_eq!(reconstruct(&location).profile(), Some(&profile), "{}", location);
        }
    }

    #[test]
    fn test_percent_encoded_token() {
        let profile = Profile::demo();
        let token = encode(&profile)
            .replace('+', "%2B")
            .replace('/', "%2F")
            .replace('=', "%3D");
        let state = reconstruct(&format!("https://bio.example/view?data={}", token));
        assert_eq!(state.profile(), Some(&profile));
    }

    #[test]
    fn test_missing_parameter() {
        assert_eq!(
            reconstruct("https://bio.example/view").error(),
            Some(ViewError::NoData)
        );
        assert_eq!(
            reconstruct("https://bio.example/view?data=").error(),
            Some(ViewError::NoData)
        );
        assert_eq!(
            reconstruct("/view?other=1").error(),
            Some(ViewError::NoData)
        );
    }

    #[test]
    fn test_invalid_token() {
        let state = reconstruct("/view?data=not-valid-base64!!");
        assert_eq!(state, ViewState::Error(ViewError::InvalidData));
        assert!(state.profile().is_none());
    }

    #[test]
    fn test_unparseable_location() {
        assert_eq!(
            reconstruct("http://[::1/view?data=abc").error(),
            Some(ViewError::LoadFailed)
        );
    }

    #[test]
    fn test_resolve_is_sticky() {
        let mut viewer = Viewer::mount("/view?data=bad!");
        let first = viewer.resolve().clone();
        assert_eq!(viewer.resolve(), &first);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ViewError::NoData.to_string(), "No profile data found");
        assert_eq!(ViewError::InvalidData.to_string(), "Invalid profile data");
        assert_eq!(ViewError::LoadFailed.to_string(), "Failed to load profile");
    }
}
