//! nvrmap - resolve build NVRs to content sets and CPE IDs
//!
//! Given a build's name-version-release (NVR) and an architecture, nvrmap asks
//! the container catalog which content sets and CPE IDs that build belongs to
//! and records the answer in a local JSON mapping file shared by all callers.
//!
//! # Architecture Overview
//!
//! - [`catalog`] - HTTP client for the catalog; one GET per lookup, validates
//!   that at most one image matches
//! - [`cache`] - Owner of the mapping file; merges one entry at a time under a
//!   single lock and replaces the file atomically
//! - [`resolver`] - Composes the two behind `resolve_content_sets`
//!
//! Supporting modules:
//! - [`cli`] - Command-line interface
//! - [`config`] - Config file and environment overrides
//! - [`core`] - Error taxonomy and user-facing error reporting
//! - [`models`] - The validated `(nvr, arch)` reference
//! - [`utils`] - Atomic file writes
//!
//! # Example
//!
//! ```rust,no_run
//! use nvrmap_cli::cache::MappingCache;
//! use nvrmap_cli::catalog::{CatalogClient, CatalogClientConfig};
//! use nvrmap_cli::resolver::ContentSetResolver;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cache = Arc::new(MappingCache::new("nvr-mapping.json"));
//! let catalog = CatalogClient::new(CatalogClientConfig::default())?;
//! let resolver = ContentSetResolver::new(catalog, cache);
//!
//! let content_sets = resolver.resolve_content_sets("foo-bar-1.0-1", "x86_64").await?;
//! println!("{content_sets:?}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod resolver;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
