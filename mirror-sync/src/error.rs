//! Error types for mirror-sync.

use std::path::PathBuf;

use thiserror::Error;

use mirror_core::MirrorError;
use mirror_renderer::RenderError;

/// All errors that can arise from a mirror run. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Catalog or artifact transport error, or a non-success status.
    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The catalog answered, but not with a JSON array of addons.
    #[error("addon catalog at {url} is malformed: {source}")]
    CatalogMalformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reset/clone of a mirror repository failed.
    #[error("mirror repository for '{slug}' is unavailable: {reason}")]
    RepoUnavailable { slug: String, reason: String },

    /// The mirrored version could not be read from a working copy.
    #[error("cannot read mirror state at {path}: {reason}")]
    RepoStateError { path: PathBuf, reason: String },

    /// Commit, tag, or push of a mirror repository failed.
    #[error("mirror publish of '{slug}' failed at `{step}`: {reason}")]
    RepoPublishFailed {
        slug: String,
        step: String,
        reason: String,
    },

    /// Asset extension has no known content type.
    #[error("no content type known for asset {path}")]
    UnknownAssetType { path: PathBuf },

    /// Hosted release creation or asset upload failed.
    #[error("hosted release for '{slug}' failed at {step}: {reason}")]
    ReleaseFailed {
        slug: String,
        step: String,
        reason: String,
    },

    /// An error building or writing `release.json`.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from naming or configuration.
    #[error("{0}")]
    Core(#[from] MirrorError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Describe a ureq failure: status code plus body excerpt, or the transport error.
pub(crate) fn describe_ureq(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let body = body.trim();
            if body.is_empty() {
                format!("status {code}")
            } else {
                format!("status {code}: {}", excerpt(body))
            }
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}

fn excerpt(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
