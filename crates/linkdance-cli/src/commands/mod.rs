//! Command handlers

pub mod config;
pub mod edit;
pub mod link;
pub mod profile;
pub mod publish;
pub mod social;
pub mod view;

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::warn;

use linkdance_core::{
    AutoSaver, Config, EditorError, EditorSession, FileBackend, Profile, ProfileStore, Publisher,
};

use crate::shortener::CleanUriShortener;

/// Resolve a full profile ID or a unique prefix of one
pub fn resolve_profile_id(store: &ProfileStore, id: &str) -> Result<String> {
    let profiles = store.try_list_profiles()?;
    let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
    resolve_prefix(&ids, id, "profile")
}

/// Resolve a full link ID or a unique prefix of one within a profile
pub fn resolve_link_id(profile: &Profile, id: &str) -> Result<String> {
    let ids: Vec<&str> = profile.links.iter().map(|l| l.id.as_str()).collect();
    resolve_prefix(&ids, id, "link")
}

fn resolve_prefix(ids: &[&str], id: &str, kind: &str) -> Result<String> {
    if ids.contains(&id) {
        return Ok(id.to_string());
    }

    let matches: Vec<&&str> = ids.iter().filter(|i| i.starts_with(id)).collect();
    match matches.len() {
        0 => bail!("No {} found with ID: {}", kind, id),
        1 => Ok(matches[0].to_string()),
        n => bail!(
            "Ambiguous {} ID '{}' matches {} {}s. Use a longer prefix.",
            kind,
            id,
            n,
            kind
        ),
    }
}

/// Profile ID for an interactive session
///
/// Without `new` the ID must match an existing profile. With `new` it names a
/// profile that does not exist yet, or is generated when omitted.
pub fn edit_target(store: &ProfileStore, id: Option<String>, new: bool) -> Result<String> {
    match (id, new) {
        (Some(id), true) => {
            if store.try_get_profile(&id)?.is_some() {
                bail!("Profile {} already exists. Drop --new to edit it.", id);
            }
            Ok(id)
        }
        (None, true) => Ok(Profile::new_with_generated_id().id),
        (Some(id), false) => {
            let profiles = store.try_list_profiles()?;
            let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
            if !ids.iter().any(|i| i.starts_with(id.as_str())) {
                bail!(
                    "No profile found with ID: {}. Use `linkdance edit --new` to start one.",
                    id
                );
            }
            resolve_prefix(&ids, &id, "profile")
        }
        (None, false) => bail!("Give a profile ID, or use --new to start a blank profile."),
    }
}

/// Publisher for the configured origin, with shortening when enabled
pub fn build_publisher(config: &Config, origin: Option<String>, shorten: bool) -> Publisher {
    let publisher = Publisher::new(origin.unwrap_or_else(|| config.origin.clone()));
    if !(shorten && config.shorten_enabled) {
        return publisher;
    }

    match CleanUriShortener::new(&config.shortener_url) {
        Ok(shortener) => publisher.with_shortener(Arc::new(shortener)),
        Err(e) => {
            warn!("Shortener unavailable, publishing long URLs: {}", e);
            publisher
        }
    }
}

/// Editing session on an existing profile, configured from `config`
pub fn open_session(
    config: &Config,
    store: ProfileStore<FileBackend>,
    id: &str,
) -> Result<EditorSession<FileBackend>> {
    let id = resolve_profile_id(&store, id)?;
    Ok(session_for(config, store, &id))
}

/// Editing session on any ID; a new ID starts a blank profile
pub fn session_for(
    config: &Config,
    store: ProfileStore<FileBackend>,
    id: &str,
) -> EditorSession<FileBackend> {
    EditorSession::open(store, id)
        .with_autosave(AutoSaver::new(config.autosave_debounce()))
        .with_publisher(build_publisher(config, None, true))
}

/// Save and end a session; storage failures carry a recovery hint
pub fn save_and_exit(session: EditorSession<FileBackend>) -> Result<Profile> {
    session.save_and_exit().map_err(save_error)
}

fn save_error(e: EditorError) -> anyhow::Error {
    let message = match e.recovery_suggestion() {
        Some(hint) => format!("Failed to save profile. {}", hint),
        None => "Failed to save profile".to_string(),
    };
    anyhow::Error::new(e).context(message)
}
