use tracing::debug;

use crate::error::{Error, Result};
use crate::model::PluginSlug;
use crate::network::{Network, PluginRegistry};

/// Result of a successful precondition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preflight {
    /// Scan the sites.
    Proceed,
    /// The plugin is active on every site already.
    NetworkActivated,
}

/// Checks that a scan for `target` makes sense.
///
/// The checks run in order: the deployment must be a multisite network, the
/// plugin must be installed, and a network-activated plugin ends the run early.
pub fn preflight(
    target: &PluginSlug,
    network: &dyn Network,
    registry: &dyn PluginRegistry,
) -> Result<Preflight> {
    if !network.is_multisite() {
        return Err(Error::NotMultisite);
    }

    let installed = registry.installed_plugins()?;
    if !target.matches_any(&installed) {
        debug!(plugin = %target, installed = installed.len(), "Plugin not among installed plugins");
        return Err(Error::NotInstalled(target.to_string()));
    }

    if target.matches_any(network.network_active_plugins()?) {
        return Ok(Preflight::NetworkActivated);
    }

    Ok(Preflight::Proceed)
}
