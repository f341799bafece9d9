//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use linkdance_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "origin": config.origin,
                    "shorten_enabled": config.shorten_enabled,
                    "shortener_url": config.shortener_url,
                    "autosave_debounce_ms": config.autosave_debounce_ms,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:             {}", config.data_dir.display());
            println!("  origin:               {}", config.origin);
            println!("  shorten_enabled:      {}", config.shorten_enabled);
            println!("  shortener_url:        {}", config.shortener_url);
            println!("  autosave_debounce_ms: {}", config.autosave_debounce_ms);
            println!(
                "  log_file:             {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Profiles:    {}", config.profiles_path().display());
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "origin" => {
            if value.is_empty() {
                bail!("origin cannot be empty");
            }
            config.origin = value.to_string();
        }
        "shorten_enabled" => {
            config.shorten_enabled = value
                .parse()
                .context("Invalid value for shorten_enabled. Use 'true' or 'false'.")?;
        }
        "shortener_url" => {
            if value.is_empty() {
                bail!("shortener_url cannot be empty; set shorten_enabled = false instead");
            }
            config.shortener_url = value.to_string();
        }
        "autosave_debounce_ms" | "autosave_ms" => {
            config.autosave_debounce_ms = value
                .parse()
                .context("Invalid value for autosave_debounce_ms. Use a number of milliseconds.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, origin, shorten_enabled, shortener_url, autosave_debounce_ms, log_file",
                key
            );
        }
    }
    Ok(())
}
