use std::path::PathBuf;

use crate::model::BlogId;

/// Errors raised by the library.
///
/// Precondition failures (`NotMultisite`, `NotInstalled`) are the only ones
/// the scan itself produces. Malformed per-site data is never an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "This only works on multisite networks. Use a single-site plugin listing on regular installations."
    )]
    NotMultisite,

    #[error("{0} is not installed.")]
    NotInstalled(String),

    #[error("Site {0} does not exist in this network.")]
    UnknownSite(BlogId),

    #[error("Failed to read network snapshot {path:?}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse network snapshot {path:?}: {message}")]
    SnapshotParse { path: PathBuf, message: String },

    #[error("Failed to read plugins directory {path:?}: {message}")]
    PluginsDir { path: PathBuf, message: String },

    #[error("Invalid field: {0}.")]
    InvalidField(String),

    #[error("Invalid format: {0}. Use 'table', 'csv', 'ids', 'json', 'yaml', or 'count'")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
