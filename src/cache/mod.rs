//! Durable NVR mapping cache.
//!
//! The mapping file records, for every `(nvr, arch)` pair resolved so far, the
//! content sets and CPE IDs the catalog returned. It is a single JSON object
//! keyed by `<nvr>//<arch>`:
//!
//! ```json
//! {
//!   "foo-bar-1.0-1//x86_64": {
//!     "nvr": "foo-bar-1.0-1",
//!     "arch": "x86_64",
//!     "content_sets": ["rhel-8-for-x86_64-baseos-rpms"],
//!     "cpe_ids": ["cpe:/o:redhat:rhel:8"]
//!   }
//! }
//! ```
//!
//! # Merge cycle
//!
//! The whole file is the unit of durability. [`MappingCache::merge_entry`]
//! loads the file, inserts or overwrites one key, and writes the file back.
//! The cycle runs under one async mutex owned by the cache instance, so within
//! a process merges are linearized and none can be lost to an interleaved
//! read-modify-write. Share one instance between callers (`Arc<MappingCache>`).
//!
//! There is no cross-process locking. Two processes merging into the same
//! file at the same time can still lose updates.
//!
//! # Durability
//!
//! Writes go through [`atomic_write`](crate::utils::fs::atomic_write): the new
//! table is written to a temporary file next to the target and renamed over
//! it, so readers see either the previous table or the new one.
//!
//! A missing file is the bootstrap case and reads as an empty mapping. A file
//! that exists but cannot be read or parsed fails the merge with
//! [`NvrmapError::StoreError`] and is left as it was.

use crate::core::{NvrmapError, Result, StoreOperation};
use crate::models::BuildRef;
use crate::utils::fs::{atomic_write, read_if_exists};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// One resolved build in the mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Build name-version-release
    pub nvr: String,
    /// Architecture label
    pub arch: String,
    /// Content sets the catalog reported
    #[serde(default)]
    pub content_sets: Vec<String>,
    /// CPE identifiers the catalog reported
    #[serde(default)]
    pub cpe_ids: Vec<String>,
}

impl MappingEntry {
    /// Create an entry for `build`.
    #[must_use]
    pub fn new(build: &BuildRef, content_sets: Vec<String>, cpe_ids: Vec<String>) -> Self {
        Self {
            nvr: build.nvr().to_string(),
            arch: build.arch().to_string(),
            content_sets,
            cpe_ids,
        }
    }

    /// Validated reference for this entry's key.
    pub fn build_ref(&self) -> Result<BuildRef> {
        BuildRef::new(self.nvr.as_str(), self.arch.as_str())
    }

    /// The mapping key (`<nvr>//<arch>`) this entry is stored under.
    pub fn key(&self) -> Result<String> {
        Ok(self.build_ref()?.key())
    }
}

/// The whole persisted table, ordered by key.
pub type Mapping = BTreeMap<String, MappingEntry>;

/// Owner of the mapping file.
///
/// All reads and writes of the backing file go through this type. Its
/// in-memory table mirrors the last state this instance read or persisted.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::cache::{MappingCache, MappingEntry};
/// use nvrmap_cli::models::BuildRef;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let cache = Arc::new(MappingCache::new("nvr-mapping.json"));
/// let build = BuildRef::new("foo-bar-1.0-1", "x86_64")?;
/// cache
///     .merge_entry(MappingEntry::new(
///         &build,
///         vec!["rhel-8-for-x86_64-baseos-rpms".to_string()],
///         vec!["cpe:/o:redhat:rhel:8".to_string()],
///     ))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MappingCache {
    path: PathBuf,
    table: Mutex<Mapping>,
}

impl MappingCache {
    /// Create a cache backed by `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: Mutex::new(Mapping::new()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or overwrite one entry and persist the whole mapping.
    ///
    /// Holds the cache lock for the full load → mutate → persist cycle.
    ///
    /// # Errors
    ///
    /// - [`NvrmapError::InvalidIdentifier`] if the entry's key halves are invalid
    /// - [`NvrmapError::StoreError`] if the file cannot be read, parsed or written;
    ///   the file on disk is unchanged in that case
    pub async fn merge_entry(&self, entry: MappingEntry) -> Result<()> {
        let key = entry.key()?;
        let mut table = self.table.lock().await;

        let mut mapping = self.read_mapping().await?;
        mapping.insert(key.clone(), entry);
        self.write_mapping(&mapping).await?;

        debug!("Merged {} into {} ({} entries)", key, self.path.display(), mapping.len());
        *table = mapping;
        Ok(())
    }

    /// Read the whole mapping from disk.
    ///
    /// Waits for any in-flight merge, so the result is never a torn state.
    pub async fn load(&self) -> Result<Mapping> {
        let mut table = self.table.lock().await;
        let mapping = self.read_mapping().await?;
        *table = mapping.clone();
        Ok(mapping)
    }

    /// Look up the persisted entry for `build`, if any.
    pub async fn get(&self, build: &BuildRef) -> Result<Option<MappingEntry>> {
        let mut mapping = self.load().await?;
        Ok(mapping.remove(&build.key()))
    }

    /// The table as of the last load or merge made through this instance.
    pub async fn snapshot(&self) -> Mapping {
        self.table.lock().await.clone()
    }

    async fn read_mapping(&self) -> Result<Mapping> {
        let content = read_if_exists(&self.path)
            .await
            .map_err(|e| NvrmapError::store(&self.path, StoreOperation::Read, e))?;

        let Some(content) = content else {
            debug!("No mapping file at {}, starting empty", self.path.display());
            return Ok(Mapping::new());
        };
        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| NvrmapError::store(&self.path, StoreOperation::Parse, e))
    }

    async fn write_mapping(&self, mapping: &Mapping) -> Result<()> {
        let mut content = serde_json::to_string_pretty(mapping)
            .map_err(|e| NvrmapError::store(&self.path, StoreOperation::Serialize, e))?;
        content.push('\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, content.as_bytes()))
            .await
            .map_err(|e| NvrmapError::store(&self.path, StoreOperation::Write, std::io::Error::other(e)))?
            .map_err(|e| NvrmapError::store(&self.path, StoreOperation::Write, e))
    }
}
