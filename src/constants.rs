//! Global constants used throughout the nvrmap codebase.
//!
//! This module contains the catalog endpoint, file names, timeouts and
//! parallelism parameters that are used across multiple modules. Defining
//! them centrally makes magic values more discoverable.

use std::time::Duration;

/// Production catalog endpoint for NVR lookups.
///
/// The build identifier is appended as a path segment and the architecture
/// is passed through the `filter` query parameter.
pub const DEFAULT_CATALOG_URL: &str = "https://catalog.redhat.com/api/containers/v1/images/nvr";

/// Default name of the persisted mapping file, relative to the working directory.
pub const DEFAULT_MAPPING_FILE: &str = "nvr-mapping.json";

/// Separator between build identifier and architecture in mapping keys.
///
/// Neither half of a key may contain this sequence.
pub const KEY_SEPARATOR: &str = "//";

/// Default timeout for a single catalog request (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default timeout for a single catalog request as a [`Duration`].
pub fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

/// Minimum number of parallel lookups regardless of CPU count.
///
/// Lookups are network bound, so a floor keeps batch resolution useful on
/// single-core machines.
pub const MIN_PARALLELISM: usize = 10;

/// Multiplier applied to CPU core count for default parallelism.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Default batch concurrency: `max(MIN_PARALLELISM, cores × PARALLELISM_CORE_MULTIPLIER)`.
pub fn default_max_parallel() -> usize {
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    std::cmp::max(MIN_PARALLELISM, cores * PARALLELISM_CORE_MULTIPLIER)
}

/// Environment variable pointing at an explicit config file.
pub const ENV_CONFIG_PATH: &str = "NVRMAP_CONFIG";

/// Environment variable overriding the catalog base URL.
pub const ENV_BASE_URL: &str = "NVRMAP_BASE_URL";

/// Environment variable overriding the mapping file location.
pub const ENV_MAPPING_PATH: &str = "NVRMAP_MAPPING_PATH";
