//! `nvrmap resolve` - look builds up and cache their content sets.
//!
//! One build prints its content sets one per line. Several builds are looked up
//! concurrently and print `<nvr>\t<content set>` lines in argument order.
//! `--format json` prints an object mapping each NVR to its content sets.
//!
//! Builds the catalog does not know print nothing and are not cached.

use super::OutputFormat;
use crate::config::NvrmapConfig;
use crate::core::user_friendly_error;
use crate::models::BuildRef;
use crate::resolver::ContentSetResolver;
use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use tracing::debug;

/// Arguments for `nvrmap resolve`.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Build NVRs to resolve
    #[arg(required = true, value_name = "NVR")]
    nvrs: Vec<String>,

    /// Architecture to resolve for (e.g. x86_64, aarch64)
    #[arg(short, long)]
    arch: String,

    /// Maximum number of lookups in flight (default: config, else 2x CPU cores)
    #[arg(long, value_name = "NUM")]
    max_parallel: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ResolveCommand {
    /// Resolve every requested build and print the results.
    ///
    /// With one build, its error is returned as-is. With several, successful
    /// results are printed and failures are reported together afterwards.
    pub async fn execute(self, config: &NvrmapConfig) -> Result<()> {
        let builds = self
            .nvrs
            .iter()
            .map(|nvr| BuildRef::new(nvr.as_str(), self.arch.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let resolver = ContentSetResolver::from_config(config)?;
        debug!("Using catalog {} and mapping {}", resolver.catalog().base_url(), config.mapping_path.display());

        if let [build] = builds.as_slice() {
            let content_sets = resolver.resolve(build).await?;
            let output = render(&[(build.clone(), content_sets)], self.format, false)?;
            print!("{output}");
            return Ok(());
        }

        let max_parallel = self.max_parallel.filter(|n| *n > 0).unwrap_or_else(|| config.max_parallel());
        let results = resolver.resolve_many(builds, max_parallel).await;

        let mut resolved = Vec::new();
        let mut failures = Vec::new();
        for (build, result) in results {
            match result {
                Ok(content_sets) => resolved.push((build, content_sets)),
                Err(e) => failures.push((build, e)),
            }
        }

        let output = render(&resolved, self.format, true)?;
        print!("{output}");

        if failures.is_empty() {
            return Ok(());
        }

        let total = failures.len() + resolved.len();
        let messages: Vec<String> = failures
            .into_iter()
            .map(|(build, e)| format!("  {}: {}", build, user_friendly_error(e.into())))
            .collect();
        Err(anyhow::anyhow!(
            "Failed to resolve {} of {} builds:\n{}",
            messages.len(),
            total,
            messages.join("\n")
        ))
    }
}

/// Render resolved builds. `prefix_nvr` adds the NVR column in text mode.
fn render(resolved: &[(BuildRef, Vec<String>)], format: OutputFormat, prefix_nvr: bool) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let by_nvr: BTreeMap<&str, &Vec<String>> =
                resolved.iter().map(|(build, content_sets)| (build.nvr(), content_sets)).collect();
            let mut json =
                serde_json::to_string_pretty(&by_nvr).context("Failed to serialize results")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (build, content_sets) in resolved {
                for content_set in content_sets {
                    if prefix_nvr {
                        out.push_str(build.nvr());
                        out.push('\t');
                    }
                    out.push_str(content_set);
                    out.push('\n');
                }
            }
            Ok(out)
        }
    }
}
