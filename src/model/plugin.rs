use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The normalized identifier of a plugin: the directory its main file lives in.
///
/// Plugin files are stored relative to the plugins directory
/// (`akismet/akismet.php`). Two plugin files belong to the same plugin when
/// their directory names match. A single-file plugin such as `hello.php`
/// normalizes to `.`, the same way the platform's `dirname` does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginSlug(String);

impl PluginSlug {
    /// Normalizes a plugin file path to its slug.
    pub fn from_plugin_file(plugin_file: &str) -> Self {
        let trimmed = plugin_file.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Self("/".to_string()),
            Some(pos) => Self(trimmed[..pos].trim_end_matches('/').to_string()),
            None => Self(".".to_string()),
        }
    }

    /// Normalizes a slug typed by a user.
    ///
    /// A bare slug is kept as-is (minus surrounding whitespace and trailing
    /// slashes). A full plugin file path like `akismet/akismet.php` is reduced
    /// to its directory.
    pub fn from_arg(arg: &str) -> Self {
        let trimmed = arg.trim().trim_end_matches('/');
        if trimmed.contains('/') && trimmed.ends_with(".php") {
            Self::from_plugin_file(trimmed)
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if any of the given plugin files normalizes to this slug.
    pub fn matches_any<I, S>(&self, plugin_files: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        plugin_files
            .into_iter()
            .any(|file| Self::from_plugin_file(file.as_ref()) == *self)
    }
}

impl std::fmt::Display for PluginSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads an `active_plugins` option value.
///
/// Only a list counts. Non-string entries are skipped, and any other shape
/// (missing, a string, an object) yields `None`.
pub fn active_plugin_files(value: Option<&Value>) -> Option<Vec<&str>> {
    match value? {
        Value::Array(entries) => Some(entries.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

/// Reads an `active_sitewide_plugins` network option value.
///
/// The platform stores it as a map of plugin file to activation time. A plain
/// list of plugin files is accepted too. Any other shape reads as empty.
pub fn sitewide_plugin_files(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_from_plugin_file() {
        assert_eq!(PluginSlug::from_plugin_file("akismet/akismet.php").as_str(), "akismet");
        assert_eq!(PluginSlug::from_plugin_file("vendor/pkg/main.php").as_str(), "vendor/pkg");
        assert_eq!(PluginSlug::from_plugin_file("hello.php").as_str(), ".");
    }

    #[test]
    fn test_slug_from_arg() {
        assert_eq!(PluginSlug::from_arg("buddypress").as_str(), "buddypress");
        assert_eq!(PluginSlug::from_arg(" buddypress/ ").as_str(), "buddypress");
        assert_eq!(PluginSlug::from_arg("buddypress/bp-loader.php").as_str(), "buddypress");
        assert_eq!(PluginSlug::from_arg("hello.php").as_str(), "hello.php");
    }

    #[test]
    fn test_matches_any() {
        let slug = PluginSlug::from_arg("foo");
        assert!(slug.matches_any(["bar/bar.php", "foo/foo.php"]));
        assert!(!slug.matches_any(["foobar/foo.php", "foo.php"]));
    }

    #[test]
    fn test_active_plugin_files() {
        let value = json!(["foo/foo.php", 3, null, "bar/bar.php"]);
        assert_eq!(
            active_plugin_files(Some(&value)),
            Some(vec!["foo/foo.php", "bar/bar.php"])
        );

        assert_eq!(active_plugin_files(Some(&json!("foo/foo.php"))), None);
        assert_eq!(active_plugin_files(Some(&json!({"0": "foo/foo.php"}))), None);
        assert_eq!(active_plugin_files(None), None);
    }

    #[test]
    fn test_sitewide_plugin_files() {
        let map = json!({"akismet/akismet.php": 1700000000, "hello.php": 1700000001});
        let mut files = sitewide_plugin_files(Some(&map));
        files.sort();
        assert_eq!(files, vec!["akismet/akismet.php", "hello.php"]);

        let list = json!(["akismet/akismet.php"]);
        assert_eq!(sitewide_plugin_files(Some(&list)), vec!["akismet/akismet.php"]);

        assert!(sitewide_plugin_files(Some(&json!(false))).is_empty());
        assert!(sitewide_plugin_files(None).is_empty());
    }
}
