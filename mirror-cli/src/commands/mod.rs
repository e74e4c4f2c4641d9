pub mod config;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mirror_core::{config as core_config, MirrorConfig};

/// Configuration source plus per-invocation overrides, shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Read configuration from this file instead of ~/.addon-mirror/config.yaml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub organisation that owns the mirror repositories.
    #[arg(long)]
    pub org: Option<String>,

    /// Addon catalog endpoint.
    #[arg(long, value_name = "URL")]
    pub catalog_url: Option<String>,

    /// Directory holding mirror working copies and the artifact cache.
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Load the configuration file (explicit or default) and apply overrides.
    pub fn resolve(&self) -> Result<(MirrorConfig, PathBuf)> {
        let home = core_config::home()?;
        let mut cfg = match &self.config {
            Some(path) => core_config::load_file(path)
                .with_context(|| format!("could not load config from {}", path.display()))?,
            None => core_config::load_at(&home).context("could not load config")?,
        };

        if let Some(org) = &self.org {
            cfg.org = org.clone();
        }
        if let Some(url) = &self.catalog_url {
            cfg.catalog_url = url.clone();
        }
        if let Some(dir) = &self.work_dir {
            cfg.work_dir = Some(dir.clone());
        }
        Ok((cfg, home))
    }
}
