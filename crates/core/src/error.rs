//! Error types for sk-core
//!
//! One variant per failure kind the transfer engine can surface. The CLI
//! maps these to stable exit codes; causes are wrapped, never swallowed.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sk-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sk-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid required setting; no transfer is attempted
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bucket check or transport setup failure
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Local directory could not be enumerated
    #[error("Failed to traverse {path}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote listing failure, wrapping the transport error
    #[error("Failed to list objects under '{prefix}': {message}")]
    List { prefix: String, message: String },

    /// Single upload or download failure
    #[error("Transfer failed for '{key}': {message}")]
    Transfer { key: String, message: String },

    /// Archive compression or decompression failure
    #[error("Archive error for {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive contains an entry type we refuse to restore
    #[error("Unsupported archive entry type for '{0}'")]
    UnsupportedEntry(String),

    /// IO error outside the traversal/archive paths
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the restore loop may recover from this error under the
    /// skip-and-warn policy. Config, connectivity, traversal, and listing
    /// failures always abort; so does an unsupported archive entry.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Transfer { .. } | Error::Archive { .. } | Error::Io(_)
        )
    }
}
