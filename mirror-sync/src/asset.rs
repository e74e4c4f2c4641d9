//! Artifact cache — download-once storage keyed by `<slug>--<version>.zip`.
//!
//! 1. Compute the deterministic path.
//! 2. Already present → return it, no network.
//! 3. Stream into `<path>.part`.
//! 4. Rename to the final path; on any failure the `.part` file is removed.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use mirror_core::AddonDescriptor;

use crate::error::{io_err, SyncError};
use crate::source::AddonSource;

/// Directory of downloaded artifacts. Lives outside the mirror working copies
/// so a repository reset never discards it.
#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
}

impl AssetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the artifact for `addon` lives (or will live). Pure, no I/O.
    pub fn path_for(&self, addon: &AddonDescriptor) -> PathBuf {
        self.dir.join(addon.artifact_file_name())
    }

    /// Local path of the artifact for `addon`, fetching it through `source`
    /// only when it is not cached yet.
    pub fn acquire(
        &self,
        source: &dyn AddonSource,
        addon: &AddonDescriptor,
    ) -> Result<PathBuf, SyncError> {
        addon.validate()?;
        let path = self.path_for(addon);
        if path.exists() {
            tracing::debug!(path = %path.display(), "artifact cached, not downloading");
            return Ok(path);
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;
        let part = PathBuf::from(format!("{}.part", path.display()));

        let bytes = match download_to(source, addon, &part) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = std::fs::remove_file(&part);
                return Err(e);
            }
        };

        if let Err(e) = std::fs::rename(&part, &path) {
            let _ = std::fs::remove_file(&part);
            return Err(io_err(&path, e));
        }

        tracing::info!(path = %path.display(), bytes, "wrote artifact");
        Ok(path)
    }
}

fn download_to(
    source: &dyn AddonSource,
    addon: &AddonDescriptor,
    part: &Path,
) -> Result<u64, SyncError> {
    let mut file = File::create(part).map_err(|e| io_err(part, e))?;
    let bytes = source.fetch_artifact(addon, &mut file)?;
    file.flush().map_err(|e| io_err(part, e))?;
    file.sync_all().map_err(|e| io_err(part, e))?;
    Ok(bytes)
}
