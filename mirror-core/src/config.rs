//! Mirror configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.addon-mirror/
//!   config.yaml             (optional — every field has a default)
//!   repos/<slug>/           (mirror working copies, recloned each run)
//!   cache/<slug>--<ver>.zip (downloaded artifacts, survive resets)
//! ```
//!
//! # API pattern
//!
//! Every function that touches the home directory has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! The hosted-release token never lives in the file; see [`Credentials`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, MirrorError};

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const DEFAULT_ORG: &str = "ogri-la";
pub const DEFAULT_CATALOG_URL: &str = "https://api.tukui.org/v1/addons";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ROOT_DIR: &str = ".addon-mirror";
const CONFIG_FILE: &str = "config.yaml";

// ---------------------------------------------------------------------------
// MirrorConfig
// ---------------------------------------------------------------------------

/// Settings for one mirror run. Loaded from YAML; missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Organisation owning every mirror repository and hosted release.
    pub org: String,
    pub catalog_url: String,
    /// Git remote prefix; `<remote_base>/<slug>` is cloned. Defaults to
    /// `ssh://git@github.com/<org>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_base: Option<String>,
    pub api_base: String,
    pub user_agent: String,
    /// Root for `repos/` and `cache/`. Defaults to `~/.addon-mirror`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_user_email: Option<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            remote_base: None,
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: format!("addon-mirror/{}", env!("CARGO_PKG_VERSION")),
            work_dir: None,
            git_user_name: None,
            git_user_email: None,
        }
    }
}

impl MirrorConfig {
    /// Effective git remote prefix, without a trailing slash.
    pub fn remote_base(&self) -> String {
        match &self.remote_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("ssh://git@github.com/{}", self.org),
        }
    }

    /// Effective work directory for a given home.
    pub fn work_dir_at(&self, home: &Path) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| mirror_root(home))
    }

    /// `<work_dir>/repos`
    pub fn repos_dir_at(&self, home: &Path) -> PathBuf {
        self.work_dir_at(home).join("repos")
    }

    /// `<work_dir>/cache`
    pub fn cache_dir_at(&self, home: &Path) -> PathBuf {
        self.work_dir_at(home).join("cache")
    }

    /// Committer identity for mirror commits, when both halves are configured.
    pub fn git_identity(&self) -> Option<(&str, &str)> {
        match (&self.git_user_name, &self.git_user_email) {
            (Some(name), Some(email)) => Some((name.as_str(), email.as_str())),
            _ => None,
        }
    }

    pub fn to_yaml(&self) -> Result<String, MirrorError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ---------------------------------------------------------------------------
// Paths + load
// ---------------------------------------------------------------------------

/// `<home>/.addon-mirror`
pub fn mirror_root(home: &Path) -> PathBuf {
    home.join(ROOT_DIR)
}

/// `<home>/.addon-mirror/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    mirror_root(home).join(CONFIG_FILE)
}

/// Load `<home>/.addon-mirror/config.yaml`, or defaults when it does not exist.
pub fn load_at(home: &Path) -> Result<MirrorConfig, MirrorError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(MirrorConfig::default());
    }
    load_file(&path)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<MirrorConfig, MirrorError> {
    load_at(&home()?)
}

/// Load an explicit config file. Unlike [`load_at`], a missing file is an error.
pub fn load_file(path: &Path) -> Result<MirrorConfig, MirrorError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(MirrorConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| MirrorError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn home() -> Result<PathBuf, MirrorError> {
    dirs::home_dir().ok_or(MirrorError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Bearer token for the hosted release API, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Read `GITHUB_TOKEN`. Absent or blank is [`MirrorError::ConfigMissing`].
    pub fn from_env() -> Result<Self, MirrorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Credentials::from_env`] over an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl FnOnce(&str) -> Option<String>) -> Result<Self, MirrorError> {
        match lookup(GITHUB_TOKEN_VAR) {
            Some(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(MirrorError::ConfigMissing {
                name: GITHUB_TOKEN_VAR.to_string(),
            }),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
