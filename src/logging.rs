//! Diagnostic logging to stderr.
//!
//! Level precedence: `RUST_LOG`, then `-v` flags, then the configured
//! `log_level`.
//!
//! ```bash
//! RUST_LOG=plugin_sites=debug plugin-sites active-on-sites akismet
//! plugin-sites -vv active-on-sites akismet
//! ```

use std::io::IsTerminal;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Maps a `-v` count to a level, or `None` to use the configured level.
pub fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Installs the global subscriber. Only the first call takes effect.
pub fn init(verbose: u8, configured_level: &str) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            let level = verbosity_level(verbose).unwrap_or(configured_level);
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .init();
    });
}
