//! Core types and error handling for nvrmap
//!
//! This module holds the error taxonomy shared by the catalog client, the
//! mapping cache and the resolver, together with the helpers the CLI uses to
//! turn those errors into readable messages.
//!
//! # Modules
//!
//! - [`error`] - [`NvrmapError`], [`ErrorContext`] and [`user_friendly_error`]

pub mod error;

pub use error::{ErrorContext, NvrmapError, StoreOperation, user_friendly_error};

/// Result alias used by the library layer.
pub type Result<T, E = NvrmapError> = std::result::Result<T, E>;
