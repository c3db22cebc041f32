//! Integration test suite for nvrmap
//!
//! End-to-end tests against a mock catalog (`httpmock`): the library resolver
//! and the `nvrmap` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolve_flow**: resolver + mapping file behaviour through the library
//! - **concurrency**: many concurrent resolutions sharing one mapping file
//! - **cli**: the `nvrmap` binary

mod cli;
mod resolve_flow;

use httpmock::prelude::*;
use nvrmap_cli::cache::MappingCache;
use nvrmap_cli::catalog::{CatalogClient, CatalogClientConfig};
use nvrmap_cli::resolver::ContentSetResolver;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Resolver pointed at `server` and persisting to `mapping`.
pub fn resolver_for(server: &MockServer, mapping: &Path) -> ContentSetResolver {
    nvrmap_cli::test_utils::init_test_logging(None);

    let catalog = CatalogClient::new(CatalogClientConfig {
        base_url: server.url("/api/containers/v1/images/nvr"),
        timeout: Some(Duration::from_secs(10)),
    })
    .expect("catalog client");
    ContentSetResolver::new(catalog, Arc::new(MappingCache::new(mapping)))
}

/// Path the mock catalog serves `nvr` on.
pub fn nvr_path(nvr: &str) -> String {
    format!("/api/containers/v1/images/nvr/{nvr}")
}
