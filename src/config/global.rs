//! User configuration for nvrmap.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. The TOML config file (`--config`, else `$NVRMAP_CONFIG`, else
//!    `~/.nvrmap/config.toml`); a missing file yields defaults
//! 2. Environment overrides `NVRMAP_BASE_URL` and `NVRMAP_MAPPING_PATH`
//! 3. Command-line flags, applied by the CLI
//!
//! # File format
//!
//! ```toml
//! base_url = "https://catalog.redhat.com/api/containers/v1/images/nvr"
//! mapping_path = "nvr-mapping.json"
//! request_timeout_secs = 30
//! max_parallel = 16
//! ```

use crate::constants::{
    DEFAULT_CATALOG_URL, DEFAULT_MAPPING_FILE, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_BASE_URL,
    ENV_CONFIG_PATH, ENV_MAPPING_PATH, default_max_parallel,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

fn default_base_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_mapping_path() -> PathBuf {
    PathBuf::from(DEFAULT_MAPPING_FILE)
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Resolved nvrmap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvrmapConfig {
    /// Catalog endpoint the NVR path segment is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Mapping file location, relative paths resolve against the working directory
    #[serde(default = "default_mapping_path")]
    pub mapping_path: PathBuf,

    /// Per-request timeout in seconds, `0` disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Concurrency for batch resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
}

impl Default for NvrmapConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mapping_path: default_mapping_path(),
            request_timeout_secs: default_request_timeout_secs(),
            max_parallel: None,
        }
    }
}

impl NvrmapConfig {
    /// Load from `path`, or the default location if `None`, then apply
    /// environment overrides.
    ///
    /// A missing file is not an error.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::load_from(&path).await?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load a config file without applying environment overrides.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config file location.
    ///
    /// `$NVRMAP_CONFIG` if set, else `~/.nvrmap/config.toml`; `None` if no home
    /// directory can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".nvrmap").join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(path) = std::env::var(ENV_MAPPING_PATH) {
            if !path.is_empty() {
                self.mapping_path = PathBuf::from(path);
            }
        }
    }

    /// Request timeout, `None` when disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Effective batch concurrency, never zero.
    #[must_use]
    pub fn max_parallel(&self) -> usize {
        self.max_parallel.filter(|n| *n > 0).unwrap_or_else(default_max_parallel)
    }
}
