//! LinkDance CLI
//!
//! Command-line interface for LinkDance - build link-in-bio profiles and
//! share them as self-contained URLs.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use linkdance_core::{Config, ProfileStore};

mod commands;
mod editor;
mod output;
mod shortener;

use output::{Output, OutputFormat};

/// Environment variable holding the log level; logging is off when unset
const LOG_ENV: &str = "LINKDANCE_LOG";

#[derive(Parser)]
#[command(name = "linkdance")]
#[command(about = "LinkDance - link-in-bio profiles you can share as a URL")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Manage the links on a profile
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage the social links on a profile
    Social {
        #[command(subcommand)]
        command: SocialCommands,
    },
    /// Edit a profile interactively, with auto-save
    Edit {
        /// Profile ID (full or prefix); with --new, the ID to create
        profile: Option<String>,
        /// Start a new blank profile
        #[arg(long)]
        new: bool,
    },
    /// Publish a profile and print its shareable URL
    Publish {
        /// Profile ID (full or prefix)
        profile: String,
        /// Origin the view URL points at (defaults to the configured origin)
        #[arg(long)]
        origin: Option<String>,
        /// Print the long URL without trying to shorten it
        #[arg(long)]
        no_shorten: bool,
    },
    /// Show the profile carried by a view URL or token
    View {
        /// View URL, query string or bare token
        target: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a new profile
    #[command(alias = "create")]
    New {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Start from the sample profile
        #[arg(long)]
        demo: bool,
    },
    /// List all profiles
    #[command(alias = "ls")]
    List,
    /// Show profile details
    Show {
        /// Profile ID (full or prefix)
        id: String,
    },
    /// Edit a profile's bio in $EDITOR
    Bio {
        /// Profile ID (full or prefix)
        id: String,
    },
    /// Delete a profile
    #[command(alias = "rm")]
    Delete {
        /// Profile ID (full or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Append a link
    Add {
        /// Profile ID (full or prefix)
        profile: String,
        /// Button text
        label: String,
        /// Target URL
        url: String,
        /// Icon name
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// Remove a link
    #[command(alias = "rm")]
    Remove {
        /// Profile ID (full or prefix)
        profile: String,
        /// Link ID (full or prefix)
        link: String,
    },
    /// Move a link to another position (positions start at 1)
    #[command(alias = "mv")]
    Move {
        /// Profile ID (full or prefix)
        profile: String,
        /// Current position
        from: usize,
        /// New position
        to: usize,
    },
}

#[derive(Subcommand)]
enum SocialCommands {
    /// Add a social link
    Add {
        /// Profile ID (full or prefix)
        profile: String,
        /// Platform (facebook, twitter, instagram, linkedin, github, telegram, whatsapp, youtube, email)
        platform: String,
        /// Profile URL on that platform
        url: String,
    },
    /// Remove a social link
    #[command(alias = "rm")]
    Remove {
        /// Profile ID (full or prefix)
        profile: String,
        /// Platform
        platform: String,
    },
    /// List the platforms that can still be added
    Platforms {
        /// Profile ID (full or prefix)
        profile: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, origin, shorten_enabled, shortener_url, autosave_debounce_ms, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Logging starts before dispatch so every command is covered. A broken
    // config file only fails the commands that need it.
    let loaded = Config::load_with_cli_override(config_path);
    if let Ok(ref config) = loaded {
        init_logging(config);
    }

    // Commands that don't need the store
    match cli.command {
        Commands::Config { command } => {
            return handle_config_command(command, config_path, &output);
        }
        Commands::View { target } => {
            return commands::view::view(target, &output);
        }
        _ => {}
    }

    let config = loaded.context("Failed to load configuration")?;
    debug!("Using profiles at {:?}", config.profiles_path());

    let store = ProfileStore::open_with_config(&config);

    match cli.command {
        Commands::Profile { command } => handle_profile_command(command, &config, store, &output),
        Commands::Link { command } => handle_link_command(command, &config, store, &output),
        Commands::Social { command } => handle_social_command(command, &config, store, &output),
        Commands::Edit { profile, new } => {
            commands::edit::run(&config, store, profile, new, &output).await
        }
        Commands::Publish {
            profile,
            origin,
            no_shorten,
        } => {
            commands::publish::publish(&config, store, profile, origin, no_shorten, &output).await
        }
        Commands::Config { .. } | Commands::View { .. } => unreachable!(), // Handled above
    }
}

fn handle_profile_command(
    command: ProfileCommands,
    config: &Config,
    store: ProfileStore,
    output: &Output,
) -> Result<()> {
    match command {
        ProfileCommands::New { name, demo } => {
            commands::profile::create(config, store, name, demo, output)
        }
        ProfileCommands::List => commands::profile::list(&store, output),
        ProfileCommands::Show { id } => commands::profile::show(&store, id, output),
        ProfileCommands::Bio { id } => commands::profile::edit_bio(config, store, id, output),
        ProfileCommands::Delete { id } => commands::profile::delete(&store, id, output),
    }
}

fn handle_link_command(
    command: LinkCommands,
    config: &Config,
    store: ProfileStore,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            profile,
            label,
            url,
            icon,
        } => commands::link::add(config, store, profile, label, url, icon, output),
        LinkCommands::Remove { profile, link } => {
            commands::link::remove(config, store, profile, link, output)
        }
        LinkCommands::Move { profile, from, to } => {
            commands::link::move_to(config, store, profile, from, to, output)
        }
    }
}

fn handle_social_command(
    command: SocialCommands,
    config: &Config,
    store: ProfileStore,
    output: &Output,
) -> Result<()> {
    match command {
        SocialCommands::Add {
            profile,
            platform,
            url,
        } => commands::social::add(config, store, profile, platform, url, output),
        SocialCommands::Remove { profile, platform } => {
            commands::social::remove(config, store, profile, platform, output)
        }
        SocialCommands::Platforms { profile } => {
            commands::social::platforms(config, store, profile, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging when LINKDANCE_LOG is set
///
/// Writes to the configured log file, or stderr when none is set.
fn init_logging(config: &Config) {
    let log_level = match std::env::var(LOG_ENV) {
        Ok(level) if !level.is_empty() => level,
        _ => return,
    };

    let env_filter = EnvFilter::new(log_directives(&log_level));

    let Some(ref log_path) = config.log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();
}

/// Filter directives applying one level to both crates
fn log_directives(level: &str) -> String {
    format!("linkdance_core={},linkdance_cli={}", level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives() {
        assert_eq!(
            log_directives("debug"),
            "linkdance_core=debug,linkdance_cli=debug"
        );
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["linkdance", "--json", "view", "data=abc"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::View { .. }));

        let cli = Cli::try_parse_from(["linkdance", "edit", "--new"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Edit {
                profile: None,
                new: true
            }
        ));
    }
}
