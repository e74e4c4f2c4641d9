//! `addon-mirror sync` — mirror new upstream versions.

use anyhow::{Context, Result};
use clap::Args;
use mirror_core::{Credentials, Slug};
use mirror_sync::{
    run, AddonOutcome, AssetCache, CatalogSource, GitGateway, GithubPublisher, Mirror, RunOptions,
};

use super::ConfigOverrides;

/// Arguments for `addon-mirror sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Report what would be published without downloading, pushing or releasing.
    #[arg(long)]
    pub dry_run: bool,

    /// Only mirror these addon slugs (repeatable).
    #[arg(long, value_name = "SLUG")]
    pub only: Vec<String>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        // Fail before any network or git work when the token is absent.
        let credentials = Credentials::from_env()?;
        let (cfg, home) = self.overrides.resolve()?;

        let source = CatalogSource::new(&cfg.catalog_url, &cfg.user_agent);
        let mut gateway = GitGateway::new(cfg.repos_dir_at(&home), cfg.remote_base());
        if let Some((name, email)) = cfg.git_identity() {
            gateway = gateway.with_identity(name, email);
        }
        let cache = AssetCache::new(cfg.cache_dir_at(&home));
        let publisher = GithubPublisher::new(&cfg.api_base, &cfg.org, &cfg.user_agent, credentials);

        let options = RunOptions {
            dry_run: self.dry_run,
            only: if self.only.is_empty() {
                None
            } else {
                Some(self.only.into_iter().map(Slug::from).collect())
            },
        };
        let mirror = Mirror {
            source: &source,
            gateway: &gateway,
            cache: &cache,
            publisher: &publisher,
        };

        let outcomes = run(&mirror, &options).context("mirror run failed")?;
        log_summary(&outcomes);
        if outcomes.is_empty() {
            println!("No addons selected.");
        }
        for outcome in &outcomes {
            print_outcome(outcome);
        }
        Ok(())
    }
}

fn log_summary(outcomes: &[AddonOutcome]) {
    let count = |f: fn(&AddonOutcome) -> bool| outcomes.iter().filter(|o| f(o)).count();
    tracing::info!(
        published = count(|o| matches!(o, AddonOutcome::Published { .. })),
        would_publish = count(|o| matches!(o, AddonOutcome::WouldPublish { .. })),
        up_to_date = count(|o| matches!(o, AddonOutcome::UpToDate { .. })),
        "mirror run finished"
    );
}

fn print_outcome(outcome: &AddonOutcome) {
    match outcome {
        AddonOutcome::UpToDate { slug, version } => {
            println!("·  {slug} {version} up to date");
        }
        AddonOutcome::Published {
            slug,
            previous,
            version,
            release,
        } => {
            println!("✓  {slug} {} → {version} {}", shown(previous), release.html_url);
        }
        AddonOutcome::WouldPublish {
            slug,
            previous,
            version,
        } => {
            println!("[dry-run] ~  {slug} {} → {version}", shown(previous));
        }
    }
}

fn shown(previous: &str) -> &str {
    if previous.is_empty() {
        "(none)"
    } else {
        previous
    }
}
