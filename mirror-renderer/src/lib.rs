//! # mirror-renderer
//!
//! Builds the `release.json` metadata document that accompanies every
//! mirrored addon release.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mirror_core::AddonDescriptor;
//! use mirror_renderer::{render, write_release_json};
//!
//! fn emit(addon: &AddonDescriptor, repo_dir: &std::path::Path) {
//!     if let Ok(doc) = render(addon, &addon.artifact_file_name()) {
//!         if let Ok(path) = write_release_json(repo_dir, &doc) {
//!             println!("wrote {}", path.display());
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod metadata;

pub use error::RenderError;
pub use metadata::{
    render, write_release_json, FlavourEntry, ReleaseDocument, ReleaseEntry, RELEASE_JSON,
};
