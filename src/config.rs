//! Configuration file handling.
//!
//! This module provides loading and saving of plugin-sites configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/plugin-sites/config.toml`
//! - macOS: `~/Library/Application Support/plugin-sites/config.toml`
//! - Windows: `%APPDATA%\plugin-sites\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! network = "/srv/network.toml"
//! plugins_dir = "/srv/www/wp-content/plugins"
//! default_format = "table"
//! default_fields = ["blog_id", "url"]
//! site_limit = 10000
//! show_progress = true
//! log_level = "warn"
//! ```

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::network::DEFAULT_SITE_LIMIT;
use crate::output::{DisplayOptions, Field, OutputFormat};
use crate::platform::config_dir;

/// Application configuration.
///
/// Every value can be overridden on the command line.
///
/// # Example
///
/// ```no_run
/// use plugin_sites::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Site limit: {}", config.site_limit);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network snapshot to read when `--network` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<PathBuf>,

    /// Plugins directory to discover installed plugins from instead of the
    /// snapshot's list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins_dir: Option<PathBuf>,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "csv", "ids", "json", "yaml", "count"
    /// Default: "table"
    pub default_format: String,

    /// Columns shown when no `--fields` flag is provided.
    ///
    /// Default: ["blog_id", "url"]
    pub default_fields: Vec<String>,

    /// Maximum number of sites fetched for one scan.
    ///
    /// Default: 10000
    pub site_limit: usize,

    /// Whether to show a progress bar while scanning in table mode.
    ///
    /// Default: true
    pub show_progress: bool,

    /// Log level used when neither `RUST_LOG` nor `-v` is given.
    ///
    /// Default: "warn"
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: None,
            plugins_dir: None,
            default_format: "table".to_string(),
            default_fields: Field::DEFAULT.iter().map(|f| f.as_str().to_string()).collect(),
            site_limit: DEFAULT_SITE_LIMIT,
            show_progress: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use plugin_sites::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Resolves the site cap for one scan, preferring `requested` over the
    /// configured `site_limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved limit is zero.
    pub fn scan_limit(&self, requested: Option<usize>) -> Result<usize> {
        let limit = requested.unwrap_or(self.site_limit);
        ensure!(limit > 0, "Site limit must be at least 1.");
        Ok(limit)
    }

    /// Builds display options from the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `default_format` or `default_fields` name an
    /// unknown format or column.
    pub fn display_defaults(&self) -> Result<DisplayOptions> {
        let format: OutputFormat = self.default_format.parse()?;
        let fields = Field::parse_list(&self.default_fields.join(","))?;
        Ok(DisplayOptions {
            format,
            fields,
            ..DisplayOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.default_format, "table");
        assert_eq!(config.default_fields, vec!["blog_id", "url"]);
        assert_eq!(config.site_limit, 10_000);
        assert!(config.show_progress);
        assert_eq!(config.log_level, "warn");
        assert!(config.network.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("site_limit = 50\ndefault_format = \"json\"").unwrap();
        assert_eq!(config.site_limit, 50);
        assert_eq!(config.default_fields, vec!["blog_id", "url"]);

        let display = config.display_defaults().unwrap();
        assert_eq!(display.format, OutputFormat::Json);
        assert_eq!(display.fields, vec![Field::BlogId, Field::Url]);
    }

    #[test]
    fn test_invalid_defaults_are_rejected() {
        let config = Config {
            default_fields: vec!["blog_id".to_string(), "colour".to_string()],
            ..Config::default()
        };
        assert!(config.display_defaults().is_err());

        let config = Config {
            default_format: "xml".to_string(),
            ..Config::default()
        };
        assert!(config.display_defaults().is_err());
    }

    #[test]
    fn test_scan_limit() {
        let config = Config::default();
        assert_eq!(config.scan_limit(None).unwrap(), 10_000);
        assert_eq!(config.scan_limit(Some(5)).unwrap(), 5);
        assert!(config.scan_limit(Some(0)).is_err());

        let config = Config {
            site_limit: 0,
            ..Config::default()
        };
        assert!(config.scan_limit(None).is_err());
        assert_eq!(config.scan_limit(Some(2)).unwrap(), 2);
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = Config::generate_default_config();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.site_limit, Config::default().site_limit);
        assert!(!text.contains("network"));
    }
}
