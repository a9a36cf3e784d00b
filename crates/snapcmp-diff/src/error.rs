//! Error types for the diff crate.

use std::path::PathBuf;

/// Errors that can occur while producing a comparison report.
///
/// Scanning and comparing never fail: unreadable entries degrade to
/// "absent" or "different". Only persisting the report can error.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Filesystem operation on the given path failed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization of the report failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
