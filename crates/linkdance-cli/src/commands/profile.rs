//! Profile command handlers

use anyhow::{bail, Context, Result};

use linkdance_core::{Config, Profile, ProfileStore};

use super::{open_session, resolve_profile_id, save_and_exit, session_for};
use crate::editor::{confirm, edit_text};
use crate::output::Output;

/// Create a profile, either named or filled with the sample content
pub fn create(
    config: &Config,
    store: ProfileStore,
    name: Option<String>,
    demo: bool,
    output: &Output,
) -> Result<()> {
    let id = Profile::new_with_generated_id().id;
    let mut session = session_for(config, store, &id);

    if demo {
        session.load_demo();
    }
    if let Some(name) = name {
        session.set_name(name);
    }

    if !session.profile().has_content() {
        session.close();
        bail!("A new profile needs a name. Use --name or --demo.");
    }

    let profile = save_and_exit(session).context("Failed to create profile")?;

    output.success(&format!("Created profile: {}", profile.id));
    output.print_profile(&profile);
    Ok(())
}

/// List all profiles (dashboard)
pub fn list(store: &ProfileStore, output: &Output) -> Result<()> {
    let profiles = store.list_profiles();
    output.print_profiles(&profiles);
    Ok(())
}

/// Show a single profile
pub fn show(store: &ProfileStore, id: String, output: &Output) -> Result<()> {
    let id = resolve_profile_id(store, &id)?;
    let profile = store
        .try_get_profile(&id)?
        .ok_or_else(|| anyhow::anyhow!("Profile not found: {}", id))?;

    output.print_profile(&profile);
    Ok(())
}

/// Delete a profile
pub fn delete(store: &ProfileStore, id: String, output: &Output) -> Result<()> {
    let id = resolve_profile_id(store, &id)?;

    if output.should_prompt() {
        let label = store
            .get_profile(&id)
            .map(|p| p.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "(untitled)".to_string());
        println!("Delete profile: {} - {}", id, label);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !store
        .try_delete_profile(&id)
        .context("Failed to delete profile")?
    {
        bail!("Profile not found: {}", id);
    }

    output.success(&format!("Deleted profile: {}", id));
    Ok(())
}

/// Edit a profile's bio in $EDITOR
pub fn edit_bio(config: &Config, store: ProfileStore, id: String, output: &Output) -> Result<()> {
    let mut session = open_session(config, store, &id)?;

    let bio = edit_text(&session.profile().description)?;
    if bio == session.profile().description {
        session.close();
        output.message("Bio unchanged.");
        return Ok(());
    }

    session.set_description(bio);
    let profile = save_and_exit(session)?;

    output.success("Bio updated");
    output.print_profile(&profile);
    Ok(())
}
