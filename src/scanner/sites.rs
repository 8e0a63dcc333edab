use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::{active_plugin_files, MatchResult, PluginSlug};
use crate::network::{Network, SiteOptions};

/// Scans up to `limit` sites and returns those with `target` active.
///
/// Sites are visited one at a time in registry order. A site whose
/// `active_plugins` option is missing, malformed, or unreadable counts as
/// having nothing active; it never aborts the scan.
///
/// # Errors
///
/// Only fails if the site table itself cannot be fetched.
pub fn find_sites_with_plugin(
    target: &PluginSlug,
    network: &dyn Network,
    options: &dyn SiteOptions,
    limit: usize,
    progress: Option<&ProgressBar>,
) -> Result<MatchResult> {
    let sites = network.sites(limit)?;
    if sites.len() >= limit {
        warn!(
            limit,
            "Site limit reached; sites beyond the limit were not scanned"
        );
    }

    info!(plugin = %target, sites = sites.len(), "Scanning sites");
    if let Some(pb) = progress {
        pb.set_length(sites.len() as u64);
    }

    let mut found = MatchResult::default();

    for site in sites {
        if let Some(pb) = progress {
            pb.set_message(site.url());
        }

        let active = match options.active_plugins(site.blog_id) {
            Ok(value) => value,
            Err(e) => {
                warn!(blog_id = site.blog_id, error = %e, "Could not read active plugins");
                None
            }
        };

        match active_plugin_files(active.as_ref()) {
            Some(files) if target.matches_any(&files) => {
                debug!(blog_id = site.blog_id, "Plugin active");
                found.push(site);
            }
            Some(_) => {}
            None if active.is_some() => {
                warn!(blog_id = site.blog_id, "Ignoring malformed active_plugins option");
            }
            None => {}
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(plugin = %target, matches = found.len(), "Scan finished");
    Ok(found)
}
