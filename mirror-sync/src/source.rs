//! Where addons come from.
//!
//! [`AddonSource`] is the swappable capability: list the catalog, stream one
//! artifact. [`CatalogSource`] is the production implementation over a JSON
//! HTTP catalog; tests substitute their own.

use std::io::Write;

use mirror_core::AddonDescriptor;

use crate::error::{describe_ureq, SyncError};

/// Catalog listing plus artifact transport.
pub trait AddonSource {
    /// Every addon the catalog currently offers, in catalog order.
    fn list_addons(&self) -> Result<Vec<AddonDescriptor>, SyncError>;

    /// Stream the artifact for `addon` into `sink`, returning the byte count.
    fn fetch_artifact(&self, addon: &AddonDescriptor, sink: &mut dyn Write)
        -> Result<u64, SyncError>;
}

/// HTTP catalog answering `GET <catalog_url>` with
/// `[{"slug", "name", "url", "version", "patch": [..]}, ..]`.
pub struct CatalogSource {
    catalog_url: String,
    user_agent: String,
    agent: ureq::Agent,
}

impl CatalogSource {
    pub fn new(catalog_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            user_agent: user_agent.into(),
            agent: ureq::Agent::new(),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, SyncError> {
        self.agent
            .get(url)
            .set("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| SyncError::FetchFailed {
                url: url.to_string(),
                reason: describe_ureq(e),
            })
    }
}

impl AddonSource for CatalogSource {
    fn list_addons(&self) -> Result<Vec<AddonDescriptor>, SyncError> {
        let url = &self.catalog_url;
        tracing::info!(%url, "fetching addon catalog");
        let body = self
            .get(url)?
            .into_string()
            .map_err(|e| SyncError::FetchFailed {
                url: url.clone(),
                reason: format!("reading response body: {e}"),
            })?;
        let addons: Vec<AddonDescriptor> =
            serde_json::from_str(&body).map_err(|source| SyncError::CatalogMalformed {
                url: url.clone(),
                source,
            })?;
        tracing::info!(count = addons.len(), "addon catalog loaded");
        Ok(addons)
    }

    fn fetch_artifact(
        &self,
        addon: &AddonDescriptor,
        sink: &mut dyn Write,
    ) -> Result<u64, SyncError> {
        let url = &addon.artifact_url;
        tracing::info!(slug = %addon.slug, %url, "downloading artifact");
        let mut reader = self.get(url)?.into_reader();
        std::io::copy(&mut reader, sink).map_err(|e| SyncError::FetchFailed {
            url: url.clone(),
            reason: format!("streaming response body: {e}"),
        })
    }
}
