//! Link command handlers

use anyhow::{Context, Result};

use linkdance_core::{Config, LinkItem, LinkMove, ProfileStore};

use super::{open_session, resolve_link_id, save_and_exit};
use crate::output::Output;

/// Append a link to a profile
pub fn add(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    label: String,
    url: String,
    icon: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(config, store, &profile_id)?;

    let mut link = LinkItem::new(label, url);
    if let Some(icon) = icon.filter(|i| !i.is_empty()) {
        link = link.icon(icon);
    }
    let link_id = session.push_link(link);

    let profile = save_and_exit(session)?;
    output.success(&format!("Added link: {}", link_id));
    output.print_profile(&profile);
    Ok(())
}

/// Remove a link from a profile
pub fn remove(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    link_id: String,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(config, store, &profile_id)?;
    let link_id = resolve_link_id(session.profile(), &link_id)?;

    session.delete_link(&link_id);
    let profile = save_and_exit(session)?;

    output.success(&format!("Removed link: {}", link_id));
    output.print_profile(&profile);
    Ok(())
}

/// Move a link between 1-based positions
pub fn move_to(
    config: &Config,
    store: ProfileStore,
    profile_id: String,
    from: usize,
    to: usize,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(config, store, &profile_id)?;

    let gesture = LinkMove::to(position_index(from)?, position_index(to)?);
    session
        .move_link(gesture)
        .with_context(|| format!("Cannot move link {} to {}", from, to))?;

    let profile = save_and_exit(session)?;
    output.success(&format!("Moved link {} to position {}", from, to));
    output.print_profile(&profile);
    Ok(())
}

/// Convert a 1-based position as shown in listings to an index
pub fn position_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}
