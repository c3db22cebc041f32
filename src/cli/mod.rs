//! Command-line interface for nvrmap.
//!
//! # Commands
//!
//! - `resolve` - Look builds up in the catalog, cache and print their content sets
//! - `show` - Print what the mapping file holds
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - Log level (`RUST_LOG` takes precedence)
//! - `--config` - Path to a config file
//! - `--base-url` - Catalog endpoint override
//! - `--mapping` - Mapping file override
//! - `--timeout` - Request timeout in seconds, `0` for none
//!
//! # Example
//!
//! ```bash
//! nvrmap resolve openssl-3.0.7-1.el9 --arch x86_64
//! nvrmap resolve foo-1.0-1 bar-2.0-1 --arch aarch64 --format json
//! nvrmap show openssl-3.0.7-1.el9 --arch x86_64
//! ```

mod resolve;
mod show;

use crate::config::NvrmapConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use resolve::ResolveCommand;
pub use show::ShowCommand;

/// Output format shared by all commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain lines, one value per line
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "nvrmap",
    about = "Resolve build NVRs to content sets and CPE IDs",
    version,
    long_about = "nvrmap looks builds up in the container catalog and records their content sets and CPE IDs in a local mapping file."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a config file (default: ~/.nvrmap/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Catalog endpoint the NVR is appended to
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Mapping file to read and update
    #[arg(short, long, global = true, value_name = "PATH")]
    mapping: Option<PathBuf>,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve builds to their content sets, caching the answers
    Resolve(ResolveCommand),

    /// Show cached mapping entries
    Show(ShowCommand),
}

impl Cli {
    /// Log filter implied by `--verbose` / `--quiet`.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("nvrmap_cli={}", self.log_level())));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load configuration and apply command-line overrides on top.
    pub async fn load_config(&self) -> Result<NvrmapConfig> {
        let mut config = NvrmapConfig::load_with_optional(self.config.clone()).await?;

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(path) = &self.mapping {
            config.mapping_path = path.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        Ok(config)
    }

    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config().await?;

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&config).await,
            Commands::Show(cmd) => cmd.execute(&config).await,
        }
    }
}
