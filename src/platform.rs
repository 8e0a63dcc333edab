//! Cross-platform path resolution.
//!
//! Functions here locate the config directory and the default network
//! snapshot. Lookups that may fail return `Option<PathBuf>`.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "plugin-sites";

/// File names tried, in order, when no snapshot path is configured.
pub const NETWORK_FILE_NAMES: [&str; 2] = ["network.toml", "network.json"];

/// Returns the directory holding the config file.
///
/// Platform-specific locations:
/// - Linux: `~/.config/plugin-sites/`
/// - macOS: `~/Library/Application Support/plugin-sites/`
/// - Windows: `%APPDATA%\plugin-sites\`
///
/// Falls back to `./plugin-sites` if the platform directory is unknown.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns the first default snapshot file present in `dir`.
pub fn find_network_file(dir: &Path) -> Option<PathBuf> {
    NETWORK_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
