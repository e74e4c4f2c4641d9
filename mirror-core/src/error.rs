//! Error types for mirror-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from naming and configuration.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// An upstream patch string could not be mapped to a flavour or interface id.
    #[error("malformed game version '{patch}': {reason}")]
    MalformedVersion { patch: String, reason: String },

    /// A catalog slug or version cannot be used as a single path component.
    #[error("addon '{slug}' rejected: {reason}")]
    InvalidAddon { slug: String, reason: String },

    /// A required credential or setting was not supplied.
    #[error("required configuration '{name}' is not set")]
    ConfigMissing { name: String },

    /// Config file parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML serialization error (printing the effective config).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    pub(crate) fn malformed(patch: &str, reason: impl Into<String>) -> Self {
        MirrorError::MalformedVersion {
            patch: patch.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience constructor for [`MirrorError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MirrorError {
    MirrorError::Io {
        path: path.into(),
        source,
    }
}
