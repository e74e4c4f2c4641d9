//! `release.json` — the per-release metadata document.
//!
//! # Layout
//!
//! ```json
//! {
//!   "releases": [
//!     {
//!       "name": "ElvUI",
//!       "version": "13.33",
//!       "filename": "elvui--13.33.zip",
//!       "nolib": false,
//!       "metadata": [ { "flavor": "mainline", "interface": 100100 } ]
//!     }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mirror_core::{flavour_of, interface_id_of, AddonDescriptor, Flavour};

use crate::error::{io_err, RenderError};

/// Fixed name of the document inside a mirror repository.
pub const RELEASE_JSON: &str = "release.json";

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDocument {
    pub releases: Vec<ReleaseEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEntry {
    pub name: String,
    pub version: String,
    pub filename: String,
    pub nolib: bool,
    /// One entry per supported game version, in catalog order. Never absent.
    pub metadata: Vec<FlavourEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavourEntry {
    pub flavor: Flavour,
    pub interface: u32,
}

impl FlavourEntry {
    pub fn from_patch(patch: &str) -> Result<Self, RenderError> {
        Ok(Self {
            flavor: flavour_of(patch)?,
            interface: interface_id_of(patch)?,
        })
    }
}

impl ReleaseDocument {
    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, RenderError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Build the single-release document for `addon`.
///
/// Fails on the first patch string that cannot be named.
pub fn render(addon: &AddonDescriptor, artifact_file_name: &str) -> Result<ReleaseDocument, RenderError> {
    let metadata = addon
        .patch_list
        .iter()
        .map(|patch| FlavourEntry::from_patch(patch))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReleaseDocument {
        releases: vec![ReleaseEntry {
            name: addon.name.clone(),
            version: addon.version.clone(),
            filename: artifact_file_name.to_string(),
            nolib: false,
            metadata,
        }],
    })
}

// ---------------------------------------------------------------------------
// write_release_json
// ---------------------------------------------------------------------------

/// Write `doc` to `<dir>/release.json` via a `.mirror.tmp` sibling + rename.
///
/// Returns the final path.
pub fn write_release_json(dir: &Path, doc: &ReleaseDocument) -> Result<PathBuf, RenderError> {
    let path = dir.join(RELEASE_JSON);
    let tmp = dir.join(format!("{RELEASE_JSON}.mirror.tmp"));
    write_with_tmp(&path, &doc.to_json()?, &tmp)?;
    Ok(path)
}

fn write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), RenderError> {
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::info!("wrote: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
