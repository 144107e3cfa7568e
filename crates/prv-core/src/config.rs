//! Configuration management for prv.
//!
//! Loads configuration from ${PRV_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::typeset::{Delimiter, default_delimiters};

/// Filesystem locations used by prv.
pub mod paths {
    use std::path::PathBuf;

    /// Returns the prv home directory.
    ///
    /// Checks PRV_HOME env var first, falls back to ~/.config/prv
    pub fn prv_home() -> PathBuf {
        if let Ok(home) = std::env::var("PRV_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("prv"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        prv_home().join("config.toml")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        prv_home().join("logs")
    }
}

/// Typesetting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesetConfig {
    /// Disables math rendering entirely when false (raw text pass-through).
    pub enabled: bool,
    /// Delimiter pairs in priority order. Empty means the built-in set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delimiters: Vec<Delimiter>,
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delimiters: Vec::new(),
        }
    }
}

impl TypesetConfig {
    /// Effective delimiter set: configured pairs, or the built-in defaults.
    pub fn delimiters(&self) -> Vec<Delimiter> {
        if self.delimiters.is_empty() {
            default_delimiters()
        } else {
            self.delimiters.clone()
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Proover evaluator.
    pub backend_url: String,

    /// Request timeout in seconds (0 disables; streams can be long-lived).
    pub request_timeout_secs: u64,

    /// Typesetting configuration.
    #[serde(default)]
    pub typeset: TypesetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: crate::client::DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            typeset: TypesetConfig::default(),
        }
    }
}

impl Config {
    /// Default is disabled: proof searches have no useful upper bound.
    const DEFAULT_TIMEOUT_SECS: u64 = 0;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path`.
    ///
    /// # Errors
    /// Fails if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists: {}", path.display());
        }
        Self::write_config(path, default_config_template())
    }

    /// Saves only the backend_url field to a specific config file path.
    ///
    /// Creates the file from the template if it doesn't exist; preserves
    /// existing fields and comments using toml_edit.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or written.
    pub fn save_backend_url_to(path: &Path, backend_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["backend_url"] = value(backend_url);

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Request timeout as a `Duration`; `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// The commented config written by `prv config init`.
fn default_config_template() -> &'static str {
    r#"# prv configuration

# Base URL of the Proover evaluator.
# Overridden by the PRV_BACKEND_URL environment variable.
backend_url = "http://127.0.0.1:8000"

# Request timeout in seconds. 0 disables the timeout.
request_timeout_secs = 0

[typeset]
# Set to false to show raw response text without math rendering.
enabled = true

# Custom delimiter pairs (priority order). Defaults to $$, $, \[, \(.
# [[typeset.delimiters]]
# open = "$$"
# close = "$$"
# display = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config.backend_url, crate::client::DEFAULT_BACKEND_URL);
        assert_eq!(config.request_timeout(), None);
        assert!(config.typeset.enabled);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend_url = \"http://proover.local\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url, "http://proover.local");
        assert_eq!(config.request_timeout_secs, 0);
    }

    #[test]
    fn init_writes_parseable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("config.toml");

        Config::init(&path).unwrap();
        assert!(path.exists());
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url, crate::client::DEFAULT_BACKEND_URL);

        // Refuses to clobber an existing file.
        assert!(Config::init(&path).is_err());
    }

    #[test]
    fn save_backend_url_preserves_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::init(&path).unwrap();

        Config::save_backend_url_to(&path, "http://proover.example").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# prv configuration"));
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url, "http://proover.example");
    }

    #[test]
    fn custom_delimiters_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[[typeset.delimiters]]\nopen = \"@@\"\nclose = \"@@\"\ndisplay = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let delims = config.typeset.delimiters();
        assert_eq!(delims.len(), 1);
        assert_eq!(delims[0].open, "@@");
        assert!(delims[0].display);
    }
}
