//! `nvrmap show` - inspect the mapping file.

use super::OutputFormat;
use crate::cache::{Mapping, MappingCache};
use crate::config::NvrmapConfig;
use crate::models::BuildRef;
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for `nvrmap show`.
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Only show entries for this NVR
    #[arg(value_name = "NVR")]
    nvr: Option<String>,

    /// Only show entries for this architecture
    #[arg(short, long)]
    arch: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ShowCommand {
    /// Print matching entries of the mapping file.
    pub async fn execute(self, config: &NvrmapConfig) -> Result<()> {
        let cache = MappingCache::new(config.mapping_path.clone());
        let mapping = cache.load().await?;

        let filtered = self.filter(mapping);
        if filtered.is_empty() && self.nvr.is_some() {
            let arch = self.arch.as_deref().unwrap_or("any architecture");
            anyhow::bail!(
                "No cached entry for {} ({}) in {}",
                self.nvr.as_deref().unwrap_or_default(),
                arch,
                cache.path().display()
            );
        }

        print!("{}", render(&filtered, self.format)?);
        Ok(())
    }

    fn filter(&self, mapping: Mapping) -> Mapping {
        mapping
            .into_iter()
            .filter(|(key, _)| {
                let Ok(build) = BuildRef::from_key(key) else {
                    return self.nvr.is_none() && self.arch.is_none();
                };
                self.nvr.as_deref().is_none_or(|nvr| build.nvr() == nvr)
                    && self.arch.as_deref().is_none_or(|arch| build.arch() == arch)
            })
            .collect()
    }
}

/// Text mode prints `<key>\t<content sets>\t<cpe ids>` with comma-joined lists.
fn render(mapping: &Mapping, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(mapping).context("Failed to serialize mapping")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(mapping
            .iter()
            .map(|(key, entry)| {
                format!("{key}\t{}\t{}\n", entry.content_sets.join(","), entry.cpe_ids.join(","))
            })
            .collect()),
    }
}
