//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/linkdance/config.toml)
//! 3. Environment variables (LINKDANCE_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "LINKDANCE";

/// File name of the persisted profile record
pub const PROFILES_FILE: &str = "linkdance-profiles.json";

/// Default publish origin
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Default shortening endpoint
pub const DEFAULT_SHORTENER_URL: &str = "https://cleanuri.com/api/v1/shorten";

/// Default auto-save debounce window in milliseconds
pub const DEFAULT_AUTOSAVE_MS: u64 = 800;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the profile record
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Origin that published view URLs point at
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Whether to try shortening published URLs
    #[serde(default = "default_true")]
    pub shorten_enabled: bool,

    /// Shortening service endpoint
    #[serde(default = "default_shortener_url")]
    pub shortener_url: String,

    /// Quiet period before an edit is auto-saved
    #[serde(default = "default_autosave_ms")]
    pub autosave_debounce_ms: u64,

    /// Log file (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            origin: default_origin(),
            shorten_enabled: true,
            shortener_url: default_shortener_url(),
            autosave_debounce_ms: DEFAULT_AUTOSAVE_MS,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (LINKDANCE_DATA_DIR, LINKDANCE_ORIGIN, ...)
    /// 2. Config file (~/.config/linkdance/config.toml or LINKDANCE_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_ORIGIN", ENV_PREFIX)) {
            if !val.is_empty() {
                self.origin = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_SHORTEN_ENABLED", ENV_PREFIX)) {
            self.shorten_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_SHORTENER_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.shortener_url = val;
            }
        }

        // Unparseable values are ignored
        if let Ok(val) = std::env::var(format!("{}_AUTOSAVE_MS", ENV_PREFIX)) {
            if let Ok(ms) = val.parse() {
                self.autosave_debounce_ms = ms;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with LINKDANCE_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linkdance")
            .join("config.toml")
    }

    /// Get the path to the persisted profile record
    pub fn profiles_path(&self) -> PathBuf {
        self.data_dir.join(PROFILES_FILE)
    }

    /// Auto-save debounce window
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkdance")
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_shortener_url() -> String {
    DEFAULT_SHORTENER_URL.to_string()
}

fn default_autosave_ms() -> u64 {
    DEFAULT_AUTOSAVE_MS
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "LINKDANCE_DATA_DIR",
        "LINKDANCE_ORIGIN",
        "LINKDANCE_SHORTEN_ENABLED",
        "LINKDANCE_SHORTENER_URL",
        "LINKDANCE_AUTOSAVE_MS",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.shorten_enabled);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.shortener_url, DEFAULT_SHORTENER_URL);
        assert_eq!(config.autosave_debounce(), Duration::from_millis(800));
        assert!(config.data_dir.ends_with("linkdance"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_profiles_path() {
        let config = Config::default();
        assert!(config.profiles_path().ends_with(PROFILES_FILE));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("LINKDANCE_DATA_DIR", "/tmp/linkdance-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/linkdance-test"));
    }

    #[test]
    fn test_env_override_shorten_enabled() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("LINKDANCE_SHORTEN_ENABLED", "false");
        config.apply_env_overrides();
        assert!(!config.shorten_enabled);

        env::set_var("LINKDANCE_SHORTEN_ENABLED", "1");
        config.apply_env_overrides();
        assert!(config.shorten_enabled);
    }

    #[test]
    fn test_env_override_origin_and_autosave() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("LINKDANCE_ORIGIN", "https://links.example.com");
        env::set_var("LINKDANCE_AUTOSAVE_MS", "250");
        config.apply_env_overrides();
        assert_eq!(config.origin, "https://links.example.com");
        assert_eq!(config.autosave_debounce_ms, 250);

        // Empty origin and garbage debounce leave values alone
        env::set_var("LINKDANCE_ORIGIN", "");
        env::set_var("LINKDANCE_AUTOSAVE_MS", "soon");
        config.apply_env_overrides();
        assert_eq!(config.origin, "https://links.example.com");
        assert_eq!(config.autosave_debounce_ms, 250);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/linkdance"),
            origin: "https://me.example".to_string(),
            shorten_enabled: false,
            shortener_url: DEFAULT_SHORTENER_URL.to_string(),
            autosave_debounce_ms: 500,
            log_file: Some(PathBuf::from("/tmp/linkdance.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("origin"));
        assert!(toml_str.contains("autosave_debounce_ms"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.origin, config.origin);
        assert_eq!(parsed.shorten_enabled, config.shorten_enabled);
        assert_eq!(parsed.autosave_debounce_ms, 500);
        assert_eq!(parsed.log_file, config.log_file);
    }

    #[test]
    fn test_load_from_str_partial() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            origin = "https://bio.example"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.origin, "https://bio.example");
        // Unspecified keys fall back to defaults
        assert!(config.shorten_enabled);
        assert_eq!(config.autosave_debounce_ms, DEFAULT_AUTOSAVE_MS);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            origin: "https://saved.example".to_string(),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.origin, "https://saved.example");
        // Loading creates the data directory
        assert!(loaded.data_dir.exists());
    }
}
