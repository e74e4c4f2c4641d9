//! # mirror-sync
//!
//! Addon mirror pipeline: catalog source, artifact cache, git mirror
//! repositories and hosted releases, wired together by [`pipeline::run`].

pub mod asset;
pub mod error;
pub mod pipeline;
pub mod publisher;
pub mod repository;
pub mod source;

pub use asset::AssetCache;
pub use error::SyncError;
pub use pipeline::{run, sync_addon, AddonOutcome, Mirror, RunOptions};
pub use publisher::{content_type_for, GithubPublisher, ReleaseHandle, ReleasePublisher};
pub use repository::{GitGateway, RepositoryGateway};
pub use source::{AddonSource, CatalogSource};
