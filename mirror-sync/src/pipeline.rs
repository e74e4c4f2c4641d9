//! Mirror run orchestration, shared by `addon-mirror sync` and its tests.
//!
//! For each catalog addon, in catalog order:
//!
//! 1. reset the mirror working copy and read its current version
//! 2. equal to upstream → skip
//! 3. acquire the artifact (cache first)
//! 4. render and write `release.json`
//! 5. commit, tag, push
//! 6. create the hosted release with the artifact and `release.json`
//!
//! The first error aborts the whole run. Nothing already pushed or published
//! is rolled back; the next run picks up where this one stopped because the
//! version check is made against the pushed tag.

use std::path::PathBuf;

use mirror_core::{AddonDescriptor, Slug};
use mirror_renderer::{render, write_release_json};

use crate::asset::AssetCache;
use crate::error::SyncError;
use crate::publisher::{ReleaseHandle, ReleasePublisher};
use crate::repository::RepositoryGateway;
use crate::source::AddonSource;

/// Knobs for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after the version check; fetch, write and publish nothing.
    pub dry_run: bool,
    /// Restrict the run to these slugs. `None` means every catalog addon.
    pub only: Option<Vec<Slug>>,
}

impl RunOptions {
    fn selects(&self, slug: &Slug) -> bool {
        self.only
            .as_ref()
            .map_or(true, |only| only.iter().any(|s| s == slug))
    }
}

/// What happened to one addon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddonOutcome {
    /// The mirror already carries the upstream version.
    UpToDate { slug: Slug, version: String },
    /// A new version was pushed and released.
    Published {
        slug: Slug,
        previous: String,
        version: String,
        release: ReleaseHandle,
    },
    /// Dry run: a new version would have been pushed and released.
    WouldPublish {
        slug: Slug,
        previous: String,
        version: String,
    },
}

impl AddonOutcome {
    pub fn slug(&self) -> &Slug {
        match self {
            AddonOutcome::UpToDate { slug, .. }
            | AddonOutcome::Published { slug, .. }
            | AddonOutcome::WouldPublish { slug, .. } => slug,
        }
    }
}

/// The capabilities a run is wired from.
pub struct Mirror<'a> {
    pub source: &'a dyn AddonSource,
    pub gateway: &'a dyn RepositoryGateway,
    pub cache: &'a AssetCache,
    pub publisher: &'a dyn ReleasePublisher,
}

/// Mirror every selected catalog addon. Fails fast on the first error.
pub fn run(mirror: &Mirror<'_>, options: &RunOptions) -> Result<Vec<AddonOutcome>, SyncError> {
    let addons = mirror.source.list_addons()?;
    let selected: Vec<&AddonDescriptor> =
        addons.iter().filter(|a| options.selects(&a.slug)).collect();
    for slug in options.only.iter().flatten() {
        if !addons.iter().any(|a| &a.slug == slug) {
            tracing::warn!(%slug, "requested addon is not in the catalog");
        }
    }
    tracing::info!(
        total = addons.len(),
        selected = selected.len(),
        dry_run = options.dry_run,
        "starting mirror run"
    );

    let mut outcomes = Vec::with_capacity(selected.len());
    for addon in selected {
        outcomes.push(sync_addon(mirror, addon, options.dry_run)?);
    }
    Ok(outcomes)
}

/// Bring one addon's mirror up to date with `addon.version`.
pub fn sync_addon(
    mirror: &Mirror<'_>,
    addon: &AddonDescriptor,
    dry_run: bool,
) -> Result<AddonOutcome, SyncError> {
    let slug = &addon.slug;
    addon.validate()?;
    let repo = mirror.gateway.reset(slug)?;
    let previous = mirror.gateway.current_version(&repo)?;

    if previous == addon.version {
        tracing::info!(%slug, version = %addon.version, "mirror is up to date, skipping");
        return Ok(AddonOutcome::UpToDate {
            slug: slug.clone(),
            version: previous,
        });
    }

    tracing::info!(%slug, %previous, version = %addon.version, "new upstream version");
    if dry_run {
        return Ok(AddonOutcome::WouldPublish {
            slug: slug.clone(),
            previous,
            version: addon.version.clone(),
        });
    }

    let artifact = mirror.cache.acquire(mirror.source, addon)?;
    let document = render(addon, &addon.artifact_file_name())?;
    let release_json = write_release_json(&repo, &document)?;
    mirror.gateway.commit_and_push(&repo, &addon.version)?;

    let assets: Vec<PathBuf> = vec![artifact, release_json];
    let release = mirror.publisher.publish(addon, &assets)?;
    tracing::info!(%slug, version = %addon.version, url = %release.html_url, "published release");

    Ok(AddonOutcome::Published {
        slug: slug.clone(),
        previous,
        version: addon.version.clone(),
        release,
    })
}
