//! Resolve builds to their content sets.
//!
//! [`ContentSetResolver`] ties the catalog client to the mapping cache: it
//! looks a build up in the catalog, records the answer in the mapping file and
//! returns the content sets. CPE IDs are cached but not returned; they are
//! there for later inspection of the mapping file.
//!
//! The resolver is safe to share between concurrent callers. Catalog lookups
//! run fully in parallel; only the merge into the mapping file is serialized,
//! by the cache's own lock.

use crate::cache::{MappingCache, MappingEntry};
use crate::catalog::{CatalogClient, CatalogClientConfig};
use crate::config::NvrmapConfig;
use crate::core::Result;
use crate::models::BuildRef;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of one lookup in a batch.
pub type BatchResult = (BuildRef, Result<Vec<String>>);

/// Looks builds up in the catalog and caches the answers.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::config::NvrmapConfig;
/// use nvrmap_cli::resolver::ContentSetResolver;
///
/// # async fn example() -> anyhow::Result<()> {
/// let resolver = ContentSetResolver::from_config(&NvrmapConfig::default())?;
/// let content_sets = resolver.resolve_content_sets("foo-bar-1.0-1", "x86_64").await?;
/// for cs in content_sets {
///     println!("{cs}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContentSetResolver {
    catalog: CatalogClient,
    cache: Arc<MappingCache>,
}

impl ContentSetResolver {
    /// Build a resolver from an existing client and cache.
    ///
    /// Resolvers that share a mapping file must share the same cache instance.
    #[must_use]
    pub const fn new(catalog: CatalogClient, cache: Arc<MappingCache>) -> Self {
        Self {
            catalog,
            cache,
        }
    }

    /// Build a resolver with its own client and cache from configuration.
    pub fn from_config(config: &NvrmapConfig) -> Result<Self> {
        let catalog = CatalogClient::new(CatalogClientConfig::from(config))?;
        let cache = Arc::new(MappingCache::new(config.mapping_path.clone()));
        Ok(Self::new(catalog, cache))
    }

    /// The mapping cache answers are recorded in.
    #[must_use]
    pub fn cache(&self) -> &Arc<MappingCache> {
        &self.cache
    }

    /// The catalog client lookups go through.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Resolve the content sets of `nvr` on `arch`.
    ///
    /// An unknown build resolves to an empty list and leaves the mapping file
    /// untouched. Otherwise the catalog answer is merged into the mapping file
    /// before its content sets are returned.
    ///
    /// # Errors
    ///
    /// Catalog errors are returned unchanged. A failure to persist the answer
    /// fails the whole call, so a returned list is always one that was cached.
    pub async fn resolve_content_sets(&self, nvr: &str, arch: &str) -> Result<Vec<String>> {
        let build = BuildRef::new(nvr, arch)?;
        self.resolve(&build).await
    }

    /// Same as [`resolve_content_sets`](Self::resolve_content_sets) for a validated reference.
    pub async fn resolve(&self, build: &BuildRef) -> Result<Vec<String>> {
        let Some(image) = self.catalog.fetch(build).await? else {
            return Ok(Vec::new());
        };

        let content_sets = image.content_sets.clone();
        self.cache.merge_entry(MappingEntry::new(build, image.content_sets, image.cpe_ids)).await?;

        debug!("Resolved {} to {} content set(s)", build, content_sets.len());
        Ok(content_sets)
    }

    /// Resolve many builds with at most `max_parallel` lookups in flight.
    ///
    /// Results come back in input order, one per build. A failure for one
    /// build does not stop the others.
    pub async fn resolve_many(&self, builds: Vec<BuildRef>, max_parallel: usize) -> Vec<BatchResult> {
        let total = builds.len();
        info!("Resolving {} build(s) with up to {} in parallel", total, max_parallel.max(1));

        let mut results: Vec<(usize, BatchResult)> = stream::iter(builds.into_iter().enumerate())
            .map(|(index, build)| async move {
                let result = self.resolve(&build).await;
                (index, (build, result))
            })
            .buffer_unordered(max_parallel.max(1))
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
