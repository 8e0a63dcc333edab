use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use super::PluginRegistry;
use crate::error::{Error, Result};

/// Only the start of a file is searched for the plugin header.
const HEADER_READ_BYTES: u64 = 8 * 1024;

const PLUGIN_NAME_HEADER: &str = "Plugin Name:";

/// Installed plugins discovered from a plugins directory.
///
/// A plugin is a `*.php` file either directly in the directory or one level
/// down, whose first 8 KiB carry a non-empty `Plugin Name:` header.
pub struct PluginsDir {
    root: PathBuf,
}

impl PluginsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PluginRegistry for PluginsDir {
    fn installed_plugins(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(Error::PluginsDir {
                path: self.root.clone(),
                message: "not a directory".to_string(),
            });
        }

        let mut plugins = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable plugins directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !has_php_extension(entry.path()) {
                continue;
            }

            if !has_plugin_header(entry.path()) {
                trace!(path = %entry.path().display(), "No plugin header");
                continue;
            }

            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(r) => r,
                Err(_) => continue,
            };

            let plugin_file = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            plugins.push(plugin_file);
        }

        debug!(root = %self.root.display(), count = plugins.len(), "Discovered installed plugins");
        Ok(plugins)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn has_php_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("php"))
        .unwrap_or(false)
}

fn has_plugin_header(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut head = Vec::new();
    if file.take(HEADER_READ_BYTES).read_to_end(&mut head).is_err() {
        return false;
    }

    let head = String::from_utf8_lossy(&head);
    head.lines().any(|line| {
        line.find(PLUGIN_NAME_HEADER)
            .map(|pos| !header_value(&line[pos + PLUGIN_NAME_HEADER.len()..]).is_empty())
            .unwrap_or(false)
    })
}

/// Strips a trailing comment close or PHP close tag from a header value.
fn header_value(raw: &str) -> &str {
    let end = ["*/", "?>"]
        .iter()
        .filter_map(|marker| raw.find(marker))
        .min()
        .unwrap_or(raw.len());
    raw[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn plugin_source(name: &str) -> String {
        format!("<?php\n/*\nPlugin Name: {name}\nVersion: 1.0\n*/\n")
    }

    #[test]
    fn test_discovers_plugins_like_the_platform() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir(root.join("akismet")).unwrap();
        fs::write(root.join("akismet/akismet.php"), plugin_source("Akismet")).unwrap();
        fs::write(root.join("akismet/class.akismet.php"), "<?php\nclass Akismet {}\n").unwrap();
        fs::write(root.join("hello.php"), plugin_source("Hello Dolly")).unwrap();
        fs::write(root.join("index.php"), "<?php\n// Silence is golden.\n").unwrap();
        fs::write(root.join("readme.txt"), "Plugin Name: Not a plugin").unwrap();

        fs::create_dir_all(root.join("deep/inner")).unwrap();
        fs::write(root.join("deep/inner/deep.php"), plugin_source("Too Deep")).unwrap();

        fs::create_dir(root.join(".hidden")).unwrap();
        fs::write(root.join(".hidden/hidden.php"), plugin_source("Hidden")).unwrap();

        fs::create_dir(root.join("empty-header")).unwrap();
        fs::write(root.join("empty-header/main.php"), "<?php\n/* Plugin Name:   */\n").unwrap();

        let plugins = PluginsDir::new(root).installed_plugins().unwrap();
        assert_eq!(plugins, vec!["akismet/akismet.php", "hello.php"]);
    }

    #[test]
    fn test_header_value() {
        assert_eq!(header_value(" Akismet "), "Akismet");
        assert_eq!(header_value(" Akismet */"), "Akismet");
        assert_eq!(header_value("   */"), "");
        assert_eq!(header_value(" Hello ?>"), "Hello");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PluginsDir::new(dir.path().join("nope")).installed_plugins();
        assert!(matches!(result, Err(Error::PluginsDir { .. })));
    }
}
