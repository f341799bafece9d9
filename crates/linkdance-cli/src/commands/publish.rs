//! Publish command handler

use anyhow::Result;

use linkdance_core::{Config, EditorEvent, ProfileStore};

use super::{build_publisher, open_session};
use crate::output::Output;

/// Publish a profile and print its shareable URL
///
/// Shortening problems never fail the command; the long URL is printed instead.
pub async fn publish(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    origin: Option<String>,
    no_shorten: bool,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(config, store, &profile_id)?
        .with_publisher(build_publisher(config, origin, !no_shorten));
    let mut events = session.take_events();

    let url = session.publish().await?;

    if let Some(ref mut events) = events {
        while let Ok(event) = events.try_recv() {
            if let EditorEvent::SaveFailed(reason) = event {
                if !output.is_quiet() {
                    eprintln!("⚠ Published, but the profile could not be saved: {}", reason);
                }
            }
        }
    }

    output.print_url(&url);
    session.close();
    Ok(())
}
