//! Client for the container image catalog.
//!
//! The catalog answers "which content sets and CPE IDs does this build have on
//! this architecture" with a JSON page of image blocks. This client issues one
//! GET per lookup, decodes the page and checks that it holds at most one block:
//!
//! - zero blocks: the build is unknown to the catalog, reported as `Ok(None)`
//! - one block: the answer, reported as `Ok(Some(image))`
//! - more than one block: [`NvrmapError::ShapeError`]
//!
//! The client holds no shared mutable state, so any number of lookups may run
//! in parallel on clones of the same client. Nothing is retried.
//!
//! # Request format
//!
//! ```text
//! GET <base_url>/<nvr>?filter=parsed_data.labels=em=(name=='architecture'andvalue=='<arch>')
//! ```

use crate::config::NvrmapConfig;
use crate::constants::{DEFAULT_CATALOG_URL, default_request_timeout};
use crate::core::{NvrmapError, Result};
use crate::models::BuildRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// One image block of a catalog response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    /// Content set (repository) names the image was built from
    #[serde(default)]
    pub content_sets: Vec<String>,
    /// CPE identifiers of the product the image belongs to
    #[serde(default)]
    pub cpe_ids: Vec<String>,
}

/// A page of catalog results.
///
/// Pagination fields are decoded but not acted on: a lookup for one NVR and
/// architecture fits on the first page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    /// Matching image blocks
    pub data: Vec<CatalogImage>,
    /// Page number
    #[serde(default)]
    pub page: u64,
    /// Page size
    #[serde(default)]
    pub page_size: u64,
    /// Total number of matches
    #[serde(default)]
    pub total: u64,
}

/// Settings for [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Catalog endpoint the NVR is appended to
    pub base_url: String,
    /// Per-request timeout, `None` for no timeout
    pub timeout: Option<Duration>,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Some(default_request_timeout()),
        }
    }
}

impl From<&NvrmapConfig> for CatalogClientConfig {
    fn from(config: &NvrmapConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.request_timeout(),
        }
    }
}

/// HTTP client for NVR lookups against the catalog.
///
/// Cloning is cheap: clones share the underlying connection pool.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::catalog::{CatalogClient, CatalogClientConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = CatalogClient::new(CatalogClientConfig::default())?;
/// if let Some(image) = client.fetch_content_sets("foo-bar-1.0-1", "x86_64").await? {
///     println!("{:?}", image.content_sets);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client from explicit settings.
    pub fn new(config: CatalogClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(NvrmapError::ConfigError {
                message: "catalog base URL must not be empty".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("nvrmap/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| NvrmapError::ConfigError {
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            base_url,
            client,
        })
    }

    /// The endpoint this client queries.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the lookup URL for a build on an architecture.
    #[must_use]
    pub fn query_url(&self, build: &BuildRef) -> String {
        format!(
            "{}/{}?filter=parsed_data.labels=em=(name=='architecture'andvalue=='{}')",
            self.base_url,
            build.nvr(),
            build.arch()
        )
    }

    /// Look up the content sets and CPE IDs of `nvr` on `arch`.
    ///
    /// Returns `Ok(None)` when the catalog has no matching image.
    ///
    /// # Errors
    ///
    /// - [`NvrmapError::InvalidIdentifier`] for an empty or `//`-containing input
    /// - [`NvrmapError::TransportError`] when the request fails or the status is not 2xx
    /// - [`NvrmapError::DecodeError`] when the body is not a catalog response
    /// - [`NvrmapError::ShapeError`] when more than one image matches
    pub async fn fetch_content_sets(&self, nvr: &str, arch: &str) -> Result<Option<CatalogImage>> {
        let build = BuildRef::new(nvr, arch)?;
        self.fetch(&build).await
    }

    /// Same as [`fetch_content_sets`](Self::fetch_content_sets) for an already validated reference.
    pub async fn fetch(&self, build: &BuildRef) -> Result<Option<CatalogImage>> {
        let url = self.query_url(build);
        debug!("Fetching content sets: {}", url);

        let body = self.get(&url).await?;
        let response: CatalogResponse =
            serde_json::from_slice(&body).map_err(|source| NvrmapError::DecodeError {
                url: url.clone(),
                source,
            })?;

        debug!(
            "Catalog returned {} block(s) for {} (total {})",
            response.data.len(),
            build,
            response.total
        );

        let mut data = response.data;
        match data.len() {
            0 => {
                info!("No content sets: {}", build);
                Ok(None)
            }
            1 => Ok(data.pop()),
            count => Err(NvrmapError::ShapeError {
                url,
                count,
            }),
        }
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let transport = |source| NvrmapError::TransportError {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}
