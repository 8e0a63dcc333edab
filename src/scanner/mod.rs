//! Finding the sites a plugin is active on.
//!
//! A scan runs in two steps:
//!
//! 1. [`preflight`] - refuses single-site installs and unknown plugins, and
//!    short-circuits when the plugin is network-activated
//! 2. [`find_sites_with_plugin`] - reads each site's active plugins and keeps
//!    the sites where the plugin shows up
//!
//! [`active_on_sites`] runs both and returns an [`Outcome`] for the caller to
//! present.
//!
//! # Example
//!
//! ```no_run
//! use plugin_sites::network::{SnapshotNetwork, Switched, DEFAULT_SITE_LIMIT};
//! use plugin_sites::scanner::{active_on_sites, Outcome};
//! use plugin_sites::PluginSlug;
//!
//! let snapshot = SnapshotNetwork::load("network.toml".as_ref())?;
//! let registry = snapshot.clone();
//! let network = Switched::new(snapshot);
//!
//! let target = PluginSlug::from_arg("akismet");
//! match active_on_sites(&target, &network, &registry, &network, DEFAULT_SITE_LIMIT, None)? {
//!     Outcome::NetworkActivated => println!("{target} is network-activated."),
//!     Outcome::Matches(found) => println!("Active on {} sites", found.len()),
//! }
//! # Ok::<(), plugin_sites::Error>(())
//! ```

mod preflight;
mod sites;

pub use preflight::{preflight, Preflight};
pub use sites::find_sites_with_plugin;

use indicatif::ProgressBar;
use tracing::info;

use crate::error::Result;
use crate::model::{MatchResult, PluginSlug};
use crate::network::{Network, PluginRegistry, SiteOptions};

/// What a completed run found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The plugin is active everywhere; no sites were scanned.
    NetworkActivated,
    /// Sites with the plugin active, possibly none.
    Matches(MatchResult),
}

/// Checks preconditions, then scans every site.
///
/// # Errors
///
/// Returns [`Error::NotMultisite`](crate::Error::NotMultisite) or
/// [`Error::NotInstalled`](crate::Error::NotInstalled) before any site is
/// read, or an error if the site table cannot be fetched.
pub fn active_on_sites(
    target: &PluginSlug,
    network: &dyn Network,
    registry: &dyn PluginRegistry,
    options: &dyn SiteOptions,
    limit: usize,
    progress: Option<&ProgressBar>,
) -> Result<Outcome> {
    match preflight(target, network, registry)? {
        Preflight::NetworkActivated => {
            info!(plugin = %target, "Plugin is network-activated, skipping scan");
            Ok(Outcome::NetworkActivated)
        }
        Preflight::Proceed => {
            let found = find_sites_with_plugin(target, network, options, limit, progress)?;
            Ok(Outcome::Matches(found))
        }
    }
}
