//! `addon-mirror config` — print the effective configuration.

use anyhow::Result;
use clap::Args;

use super::ConfigOverrides;

/// Arguments for `addon-mirror config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

impl ConfigArgs {
    pub fn run(self) -> Result<()> {
        let (cfg, home) = self.overrides.resolve()?;
        print!("{}", cfg.to_yaml()?);
        println!("# remote base: {}", cfg.remote_base());
        println!("# repositories: {}", cfg.repos_dir_at(&home).display());
        println!("# cache: {}", cfg.cache_dir_at(&home).display());
        Ok(())
    }
}
