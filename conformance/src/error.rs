//! Error types for conformance runs.

use std::path::PathBuf;

use cmdtree_core::SchemaError;
use thiserror::Error;

/// Fatal conformance failures. Individual command failures are recorded in
/// the report instead.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// Schema artifact could not be read or parsed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Target binary path does not exist or is not on `PATH`.
    #[error("binary '{}' not found", .0.display())]
    BinaryNotFound(PathBuf),

    /// Temporary candidate directory could not be created.
    #[error("failed to create candidate directory: {0}")]
    TempDir(#[source] std::io::Error),

    /// Report could not be written.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`ConformanceError`].
pub type Result<T> = std::result::Result<T, ConformanceError>;
