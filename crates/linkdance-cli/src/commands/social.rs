//! Social link command handlers

use anyhow::{bail, Result};

use linkdance_core::{Config, Platform, ProfileStore};

use super::{open_session, save_and_exit};
use crate::output::Output;

/// Add a social link for a platform the profile doesn't have yet
pub fn add(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    platform: String,
    url: String,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(config, store, &profile_id)?;
    let platform = Platform::from(platform.trim().to_lowercase());

    session.add_social_link(platform.clone(), url)?;
    let profile = save_and_exit(session)?;

    output.success(&format!("Added {} link", platform.display_name()));
    output.print_profile(&profile);
    Ok(())
}

/// Remove a platform's social link
pub fn remove(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    platform: String,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(config, store, &profile_id)?;
    let platform = Platform::from(platform.trim().to_lowercase());

    if !session.remove_social_link(&platform) {
        session.close();
        bail!("Profile has no {} link", platform.display_name());
    }
    let profile = save_and_exit(session)?;

    output.success(&format!("Removed {} link", platform.display_name()));
    output.print_profile(&profile);
    Ok(())
}

/// List the platforms that can still be added to a profile
pub fn platforms(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    output: &Output,
) -> Result<()> {
    let session = open_session(config, store, &profile_id)?;
    output.print_platforms(&session.available_platforms());
    session.close();
    Ok(())
}
