//! Test utilities for nvrmap
//!
//! Helpers shared by unit and integration tests: logging setup and a mock
//! catalog response builder.

use serde_json::{Value, json};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, else `RUST_LOG`,
/// else installs nothing.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Build a catalog response body with one block per `(content_sets, cpe_ids)` pair.
pub fn catalog_body(blocks: &[(&[&str], &[&str])]) -> Value {
    let data: Vec<Value> = blocks
        .iter()
        .map(|(content_sets, cpe_ids)| json!({ "content_sets": content_sets, "cpe_ids": cpe_ids }))
        .collect();
    let total = data.len();
    json!({ "data": data, "page": 0, "page_size": 100, "total": total })
}
