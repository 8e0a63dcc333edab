//! Access to a multisite network's data.
//!
//! The scan never talks to storage directly. It goes through the traits in
//! this module:
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`PluginRegistry`] | Plugin files installed on disk |
//! | [`Network`] | Multisite flag, network-activated plugins, the site table |
//! | [`SiteOptions`] | A given site's `active_plugins` option |
//! | [`ContextSwitch`] | The platform's "current site" switch |
//!
//! # Implementations
//!
//! - [`SnapshotNetwork`] - a network described by a JSON or TOML file
//! - [`PluginsDir`] - installed plugins discovered from a plugins directory
//! - [`Switched`] - reads per-site options through a [`ContextSwitch`]
//!
//! # Example
//!
//! ```no_run
//! use plugin_sites::network::{Network, SnapshotNetwork, Switched};
//!
//! let network = Switched::new(SnapshotNetwork::load("network.toml".as_ref())?);
//! for site in network.sites(100)? {
//!     println!("{}", site.url());
//! }
//! # Ok::<(), plugin_sites::Error>(())
//! ```

pub(crate) mod context;
mod plugins_dir;
mod snapshot;

pub use context::{SiteContext, Switched};
pub use plugins_dir::PluginsDir;
pub use snapshot::{NetworkSnapshot, SiteRecord, SnapshotNetwork};

use crate::error::Result;
use crate::model::{BlogId, Site};
use serde_json::Value;

/// Name of the per-site option listing active plugin files.
pub const ACTIVE_PLUGINS_OPTION: &str = "active_plugins";

/// Name of the network option listing network-activated plugin files.
pub const SITEWIDE_PLUGINS_OPTION: &str = "active_sitewide_plugins";

/// Default cap on how many sites one scan fetches.
pub const DEFAULT_SITE_LIMIT: usize = 10_000;

/// The set of plugins physically installed, active or not.
pub trait PluginRegistry {
    /// Returns installed plugin files relative to the plugins directory,
    /// e.g. `akismet/akismet.php`.
    fn installed_plugins(&self) -> Result<Vec<String>>;
}

/// Network-level reads.
pub trait Network {
    /// Returns true if this deployment hosts a network of sites.
    fn is_multisite(&self) -> bool;

    /// Returns the plugin files activated for every site in the network.
    fn network_active_plugins(&self) -> Result<Vec<String>>;

    /// Returns up to `limit` sites in registry order.
    fn sites(&self, limit: usize) -> Result<Vec<Site>>;
}

/// Per-site option reads addressed by an explicit site handle.
pub trait SiteOptions {
    /// Returns the raw `active_plugins` option of a site, or `None` if the
    /// site has no such option.
    fn active_plugins(&self, blog_id: BlogId) -> Result<Option<Value>>;
}

/// The platform's ambient "current site".
///
/// Every option read resolves against whichever site was last switched to.
/// Switches nest: [`restore`](Self::restore) returns to exactly the site that
/// was current before the matching [`switch_to`](Self::switch_to).
///
/// Prefer [`SiteContext`], which pairs the two calls.
pub trait ContextSwitch {
    /// Makes `blog_id` the current site, remembering the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSite`](crate::Error::UnknownSite) if the site
    /// does not exist. The current site is left unchanged in that case.
    fn switch_to(&mut self, blog_id: BlogId) -> Result<()>;

    /// Returns to the site that was current before the last switch.
    /// Does nothing if there is no switch to undo.
    fn restore(&mut self);

    /// Returns the current site.
    fn current_blog(&self) -> BlogId;

    /// Reads an option of the current site.
    fn current_option(&self, name: &str) -> Option<Value>;
}
