//! addon-mirror — mirror catalog addons into git repositories and hosted releases.
//!
//! # Usage
//!
//! ```text
//! addon-mirror sync [--dry-run] [--only <slug>...] [--config <path>]
//!                   [--org <org>] [--catalog-url <url>] [--work-dir <dir>]
//! addon-mirror config [--config <path>] [...]
//! ```
//!
//! `GITHUB_TOKEN` must be set for `sync`. Logging goes to stderr; `RUST_LOG`
//! overrides the default `info` level, `-v` raises it to `debug`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config::ConfigArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "addon-mirror",
    version,
    about = "Mirror addon catalog releases into git repositories and GitHub releases",
    long_about = None,
)]
struct Cli {
    /// Log at debug level (ignored when RUST_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mirror every catalog addon whose upstream version is new.
    Sync(SyncArgs),

    /// Print the effective configuration as YAML.
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Config(args) => args.run(),
    }
}
