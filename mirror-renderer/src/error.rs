//! Error types for mirror-renderer.

use std::path::PathBuf;

use thiserror::Error;

use mirror_core::MirrorError;

/// All errors that can arise while building or writing `release.json`.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A patch string in the addon's patch list could not be named.
    #[error("naming error: {0}")]
    Naming(#[from] MirrorError),

    /// JSON serialization error.
    #[error("release document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while writing the document.
    #[error("release document io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
