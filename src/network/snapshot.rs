use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ContextSwitch, Network, PluginRegistry, SITEWIDE_PLUGINS_OPTION};
use crate::error::{Error, Result};
use crate::model::{sitewide_plugin_files, BlogId, Site};

/// On-disk description of a network.
///
/// ```toml
/// multisite = true
/// installed_plugins = ["akismet/akismet.php"]
///
/// [network_options]
/// active_sitewide_plugins = { "akismet/akismet.php" = 1700000000 }
///
/// [[sites]]
/// blog_id = 1
/// domain = "example.com"
///
/// [sites.options]
/// active_plugins = ["akismet/akismet.php"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSnapshot {
    #[serde(default)]
    pub multisite: bool,
    #[serde(default = "default_main_site")]
    pub main_site: BlogId,
    #[serde(default)]
    pub installed_plugins: Vec<String>,
    #[serde(default)]
    pub network_options: BTreeMap<String, Value>,
    #[serde(default)]
    pub sites: Vec<SiteRecord>,
}

fn default_main_site() -> BlogId {
    1
}

/// A site together with its option table.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteRecord {
    #[serde(flatten)]
    pub site: Site,
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl NetworkSnapshot {
    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// A network served from a [`NetworkSnapshot`].
///
/// Option reads follow the platform's switching model: they resolve against
/// the current site, which starts out as the snapshot's main site.
#[derive(Debug, Clone)]
pub struct SnapshotNetwork {
    snapshot: NetworkSnapshot,
    current: BlogId,
    stack: Vec<BlogId>,
}

impl SnapshotNetwork {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        let current = snapshot.main_site;
        Self {
            snapshot,
            current,
            stack: Vec::new(),
        }
    }

    /// Loads a snapshot file. `.toml` files are read as TOML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let parsed = if is_toml {
            NetworkSnapshot::from_toml(&content)
        } else {
            NetworkSnapshot::from_json(&content)
        };

        let snapshot = parsed.map_err(|message| Error::SnapshotParse {
            path: PathBuf::from(path),
            message,
        })?;

        debug!(
            path = %path.display(),
            sites = snapshot.sites.len(),
            installed = snapshot.installed_plugins.len(),
            "Loaded network snapshot"
        );

        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &NetworkSnapshot {
        &self.snapshot
    }

    fn record(&self, blog_id: BlogId) -> Option<&SiteRecord> {
        self.snapshot.sites.iter().find(|r| r.site.blog_id == blog_id)
    }
}

impl PluginRegistry for SnapshotNetwork {
    fn installed_plugins(&self) -> Result<Vec<String>> {
        Ok(self.snapshot.installed_plugins.clone())
    }
}

impl Network for SnapshotNetwork {
    fn is_multisite(&self) -> bool {
        self.snapshot.multisite
    }

    fn network_active_plugins(&self) -> Result<Vec<String>> {
        Ok(sitewide_plugin_files(
            self.snapshot.network_options.get(SITEWIDE_PLUGINS_OPTION),
        ))
    }

    fn sites(&self, limit: usize) -> Result<Vec<Site>> {
        Ok(self
            .snapshot
            .sites
            .iter()
            .take(limit)
            .map(|r| r.site.clone())
            .collect())
    }
}

impl ContextSwitch for SnapshotNetwork {
    fn switch_to(&mut self, blog_id: BlogId) -> Result<()> {
        if self.record(blog_id).is_none() {
            return Err(Error::UnknownSite(blog_id));
        }
        self.stack.push(self.current);
        self.current = blog_id;
        Ok(())
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    fn current_blog(&self) -> BlogId {
        self.current
    }

    fn current_option(&self, name: &str) -> Option<Value> {
        self.record(self.current)?.options.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{SiteOptions, Switched};
    use std::io::Write;

    const TOML_SNAPSHOT: &str = r#"
multisite = true
installed_plugins = ["akismet/akismet.php", "hello.php"]

[network_options]
active_sitewide_plugins = { "akismet/akismet.php" = 1700000000 }

[[sites]]
blog_id = 1
domain = "example.com"
path = "/"
registered = "2020-01-01 00:00:00"

[sites.options]
active_plugins = ["hello.php"]

[[sites]]
blog_id = 2
domain = "example.com"
path = "/shop/"
archived = 1
"#;

    #[test]
    fn test_parse_toml_snapshot() {
        let network = SnapshotNetwork::new(NetworkSnapshot::from_toml(TOML_SNAPSHOT).unwrap());

        assert!(network.is_multisite());
        assert_eq!(network.installed_plugins().unwrap().len(), 2);
        assert_eq!(
            network.network_active_plugins().unwrap(),
            vec!["akismet/akismet.php"]
        );

        let sites = network.sites(10).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].url(), "example.com/shop/");
        assert!(sites[1].archived);
        assert!(sites[0].registered.is_some());
    }

    #[test]
    fn test_parse_json_snapshot() {
        let json = r#"{
            "multisite": true,
            "main_site": 5,
            "sites": [
                {"blog_id": 5, "domain": "a.example.com", "options": {"active_plugins": "oops"}},
                {"blog_id": 6, "domain": "b.example.com", "spam": "1"}
            ]
        }"#;
        let network = SnapshotNetwork::new(NetworkSnapshot::from_json(json).unwrap());

        assert_eq!(network.current_blog(), 5);
        assert!(network.network_active_plugins().unwrap().is_empty());
        assert_eq!(network.current_option("active_plugins"), Some(Value::from("oops")));
        assert!(network.sites(10).unwrap()[1].spam);
    }

    #[test]
    fn test_sites_respects_limit() {
        let network = SnapshotNetwork::new(NetworkSnapshot::from_toml(TOML_SNAPSHOT).unwrap());
        let sites = network.sites(1).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].blog_id, 1);
    }

    #[test]
    fn test_switching_reads_each_sites_options() {
        let mut network =
            SnapshotNetwork::new(NetworkSnapshot::from_toml(TOML_SNAPSHOT).unwrap());

        network.switch_to(2).unwrap();
        assert_eq!(network.current_option("active_plugins"), None);
        network.switch_to(1).unwrap();
        assert!(network.current_option("active_plugins").is_some());
        network.restore();
        assert_eq!(network.current_blog(), 2);
        network.restore();
        assert_eq!(network.current_blog(), 1);

        // Nothing left to undo.
        network.restore();
        assert_eq!(network.current_blog(), 1);

        assert!(matches!(network.switch_to(42), Err(Error::UnknownSite(42))));
        assert_eq!(network.current_blog(), 1);
    }

    #[test]
    fn test_switched_snapshot_reads_by_handle() {
        let network = Switched::new(SnapshotNetwork::new(
            NetworkSnapshot::from_toml(TOML_SNAPSHOT).unwrap(),
        ));
        assert_eq!(
            network.active_plugins(1).unwrap(),
            Some(serde_json::json!(["hello.php"]))
        );
        assert_eq!(network.active_plugins(2).unwrap(), None);
        assert!(network.active_plugins(3).is_err());
        assert_eq!(network.current_blog(), 1);
    }

    #[test]
    fn test_load_picks_parser_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("network.toml");
        fs::write(&toml_path, TOML_SNAPSHOT).unwrap();
        assert_eq!(SnapshotNetwork::load(&toml_path).unwrap().sites(10).unwrap().len(), 2);

        let json_path = dir.path().join("network.json");
        let mut file = fs::File::create(&json_path).unwrap();
        write!(file, r#"{{"multisite": false}}"#).unwrap();
        assert!(!SnapshotNetwork::load(&json_path).unwrap().is_multisite());

        let bad_path = dir.path().join("bad.json");
        fs::write(&bad_path, "{ not json").unwrap();
        assert!(matches!(
            SnapshotNetwork::load(&bad_path),
            Err(Error::SnapshotParse { .. })
        ));

        assert!(matches!(
            SnapshotNetwork::load(&dir.path().join("missing.json")),
            Err(Error::SnapshotRead { .. })
        ));
    }
}
