//! Hosted releases.
//!
//! [`ReleasePublisher::publish`] creates a release tagged with the addon
//! version and uploads its assets in order. Content types are resolved for
//! every asset before anything is sent, so an unknown extension creates no
//! remote state at all. Once the release exists, a failed upload stops the
//! remaining uploads and leaves the release as is.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;

use mirror_core::{AddonDescriptor, Credentials};

use crate::error::{describe_ureq, io_err, SyncError};

/// A created hosted release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseHandle {
    pub id: u64,
    pub html_url: String,
    /// Uploaded asset file names, in upload order.
    pub assets: Vec<String>,
}

pub trait ReleasePublisher {
    fn publish(
        &self,
        addon: &AddonDescriptor,
        assets: &[PathBuf],
    ) -> Result<ReleaseHandle, SyncError>;
}

/// Transport content type for an asset, by lower-cased extension.
pub fn content_type_for(path: &Path) -> Result<&'static str, SyncError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("zip") => Ok("application/zip"),
        Some("json") => Ok("application/json"),
        _ => Err(SyncError::UnknownAssetType {
            path: path.to_path_buf(),
        }),
    }
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CreatedRelease {
    id: u64,
    upload_url: String,
    #[serde(default)]
    html_url: String,
}

/// [`ReleasePublisher`] over the GitHub REST API.
pub struct GithubPublisher {
    api_base: String,
    org: String,
    user_agent: String,
    credentials: Credentials,
    agent: ureq::Agent,
}

impl GithubPublisher {
    pub fn new(
        api_base: impl Into<String>,
        org: impl Into<String>,
        user_agent: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            org: org.into(),
            user_agent: user_agent.into(),
            credentials,
            agent: ureq::Agent::new(),
        }
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("Authorization", &format!("Bearer {}", self.credentials.token()))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", &self.user_agent)
    }

    fn create_release(&self, addon: &AddonDescriptor) -> Result<CreatedRelease, SyncError> {
        let url = format!("{}/repos/{}/{}/releases", self.api_base, self.org, addon.slug);
        let failed = |reason: String| SyncError::ReleaseFailed {
            slug: addon.slug.0.clone(),
            step: "create release".to_string(),
            reason,
        };

        let response = self
            .authorized(self.agent.post(&url))
            .send_json(json!({
                "tag_name": addon.version,
                "name": addon.name,
                "make_latest": "true",
            }))
            .map_err(|e| failed(describe_ureq(e)))?;
        response
            .into_json::<CreatedRelease>()
            .map_err(|e| failed(format!("unreadable response: {e}")))
    }

    fn upload_asset(
        &self,
        addon: &AddonDescriptor,
        release: &CreatedRelease,
        path: &Path,
        content_type: &str,
    ) -> Result<String, SyncError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
        // `upload_url` is a URI template: ".../assets{?name,label}".
        let url = release
            .upload_url
            .split('{')
            .next()
            .unwrap_or(&release.upload_url);

        tracing::info!(slug = %addon.slug, asset = %name, content_type, "uploading asset");
        self.authorized(self.agent.post(url))
            .query("name", &name)
            .query("label", &name)
            .set("Content-Type", content_type)
            .send_bytes(&bytes)
            .map_err(|e| SyncError::ReleaseFailed {
                slug: addon.slug.0.clone(),
                step: format!("upload {name}"),
                reason: describe_ureq(e),
            })?;
        Ok(name)
    }
}

impl ReleasePublisher for GithubPublisher {
    fn publish(
        &self,
        addon: &AddonDescriptor,
        assets: &[PathBuf],
    ) -> Result<ReleaseHandle, SyncError> {
        let typed = assets
            .iter()
            .map(|path| content_type_for(path).map(|ct| (path, ct)))
            .collect::<Result<Vec<_>, _>>()?;

        let release = self.create_release(addon)?;
        tracing::info!(slug = %addon.slug, version = %addon.version, id = release.id, "created release");

        let mut uploaded = Vec::with_capacity(typed.len());
        for (path, content_type) in typed {
            uploaded.push(self.upload_asset(addon, &release, path, content_type)?);
        }

        Ok(ReleaseHandle {
            id: release.id,
            html_url: release.html_url,
            assets: uploaded,
        })
    }
}
