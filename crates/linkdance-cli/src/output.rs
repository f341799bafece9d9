//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use linkdance_core::{Platform, Profile};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single profile with its links
    pub fn print_profile(&self, profile: &Profile) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", profile.id);
                println!("Name:        {}", display_or_none(&profile.name));
                if !profile.description.is_empty() {
                    println!("Bio:         {}", truncate_line(&profile.description, 60));
                }
                if !profile.photo_url.is_empty() {
                    println!("Photo:       {}", profile.photo_url);
                }
                if let Some(ref url) = profile.published_url {
                    println!("Published:   {}", truncate(url, 60));
                }
                println!("Created:     {}", profile.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:     {}", profile.updated_at.format("%Y-%m-%d %H:%M"));

                println!();
                println!("── Links ({}) ──", profile.links.len());
                for (position, link) in profile.links.iter().enumerate() {
                    let icon = link
                        .icon
                        .as_deref()
                        .map(|i| format!(" [{}]", i))
                        .unwrap_or_default();
                    println!(
                        "{:>2}. {} | {}{} | {}",
                        position + 1,
                        short_id(&link.id),
                        truncate(display_or_none(&link.label), 30),
                        icon,
                        truncate(&link.url, 45)
                    );
                }

                if !profile.social_links.is_empty() {
                    println!();
                    println!("── Social ({}) ──", profile.social_links.len());
                    for social in &profile.social_links {
                        println!("{:<10} {}", social.platform.display_name(), social.url);
                    }
                }
            }
            OutputFormat::Json => print_json(profile),
            OutputFormat::Quiet => println!("{}", profile.id),
        }
    }

    /// Print the profile dashboard
    pub fn print_profiles(&self, profiles: &[Profile]) {
        match self.format {
            OutputFormat::Human => {
                if profiles.is_empty() {
                    println!("No profiles yet. Create one with `linkdance profile new`.");
                    return;
                }
                for profile in profiles {
                    let published = if profile.published_url.is_some() {
                        " [published]"
                    } else {
                        ""
                    };
                    println!(
                        "{} | {}{} | {} link(s) | updated {}",
                        profile.id,
                        truncate(display_or_none(&profile.name), 30),
                        published,
                        profile.links.len(),
                        profile.updated_at.format("%Y-%m-%d %H:%M")
                    );
                }
                println!("\n{} profile(s)", profiles.len());
            }
            OutputFormat::Json => print_json(&profiles),
            OutputFormat::Quiet => {
                for profile in profiles {
                    println!("{}", profile.id);
                }
            }
        }
    }

    /// Print the platforms that can still be added
    pub fn print_platforms(&self, platforms: &[Platform]) {
        match self.format {
            OutputFormat::Human => {
                if platforms.is_empty() {
                    println!("Every supported platform already has a link.");
                    return;
                }
                for platform in platforms {
                    println!("{:<10} {}", platform.as_str(), platform.display_name());
                }
            }
            OutputFormat::Json => {
                let names: Vec<_> = platforms.iter().map(|p| p.as_str()).collect();
                print_json(&names);
            }
            OutputFormat::Quiet => {
                for platform in platforms {
                    println!("{}", platform.as_str());
                }
            }
        }
    }

    /// Point the user back home after a failed view
    pub fn print_view_hint(&self) {
        if self.format == OutputFormat::Human {
            eprintln!("Go home: run `linkdance profile list` to see your profiles.");
        }
    }

    /// Print a published URL
    pub fn print_url(&self, url: &str) {
        match self.format {
            OutputFormat::Human => {
                println!("✓ Profile published");
                println!("{}", url);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"status": "success", "url": url}));
            }
            // Scripts only want the URL
            OutputFormat::Quiet => println!("{}", url),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to format JSON: {}", e),
    }
}

/// First eight characters of an ID
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn display_or_none(s: &str) -> &str {
    if s.is_empty() {
        "(untitled)"
    } else {
        s
    }
}

/// Truncate a string to max length (in characters), adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
