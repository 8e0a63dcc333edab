pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod output;
pub mod platform;
pub mod scanner;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{BlogId, MatchResult, PluginSlug, Site};
pub use scanner::{active_on_sites, Outcome};
