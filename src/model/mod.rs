//! Core data types for sites, plugin slugs, and scan results.
//!
//! This module contains the fundamental types used throughout plugin-sites:
//!
//! - [`Site`] - A site record from the network's site table
//! - [`PluginSlug`] - The normalized directory-name form of a plugin
//! - [`MatchResult`] - The sites a plugin was found active on
//!
//! # Example
//!
//! ```
//! use plugin_sites::{MatchResult, PluginSlug, Site};
//!
//! let slug = PluginSlug::from_plugin_file("akismet/akismet.php");
//! assert_eq!(slug.as_str(), "akismet");
//!
//! let result = MatchResult::new(vec![Site::new(1, "example.com", "/")]);
//! println!("Found {} sites", result.len());
//! ```

mod matches;
mod plugin;
mod site;

pub use matches::*;
pub use plugin::*;
pub use site::*;
