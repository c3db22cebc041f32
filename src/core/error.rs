//! Error handling for nvrmap
//!
//! This module provides the error taxonomy for catalog lookups and mapping
//! persistence, plus user-friendly error reporting for the CLI. The error system
//! follows two principles:
//! 1. **Strongly-typed errors** so callers can react to each failure mode
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Input**: [`NvrmapError::InvalidIdentifier`]
//! - **Catalog**: [`NvrmapError::TransportError`], [`NvrmapError::DecodeError`],
//!   [`NvrmapError::ShapeError`]
//! - **Mapping store**: [`NvrmapError::StoreError`]
//! - **Configuration**: [`NvrmapError::ConfigError`]
//!
//! An empty catalog answer is not an error: it is the "nothing known yet"
//! outcome and is reported as an empty content-set list.
//!
//! Nothing in this crate retries. A caller that wants retries or backoff wraps
//! the failing operation itself.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nvrmap_cli::core::{NvrmapError, user_friendly_error};
//!
//! let error = NvrmapError::ShapeError {
//!     url: "https://catalog.example/nvr/foo-1.0-1".to_string(),
//!     count: 2,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows coloured error with suggestion
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The operation that failed against the mapping store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    /// Reading the mapping file from disk
    Read,
    /// Parsing the mapping file contents
    Parse,
    /// Serializing the in-memory mapping
    Serialize,
    /// Writing or replacing the mapping file
    Write,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Parse => "parse",
            Self::Serialize => "serialize",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// The main error type for nvrmap operations
///
/// Each variant represents one failure mode of the lookup-and-cache flow.
/// Catalog errors carry the URL that was attempted; store errors carry the
/// mapping file path and the operation that failed.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::core::NvrmapError;
///
/// fn handle_error(error: NvrmapError) {
///     match error {
///         NvrmapError::ShapeError { count, .. } => {
///             eprintln!("catalog returned {count} images, refusing to guess");
///         }
///         NvrmapError::StoreError { path, .. } => {
///             eprintln!("mapping file {} is not usable", path.display());
///         }
///         other => eprintln!("{other}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum NvrmapError {
    /// A build identifier or architecture cannot be used as a lookup key
    ///
    /// Both halves must be non-empty and must not contain the `//` key separator.
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidIdentifier {
        /// Which input was rejected ("build id" or "architecture")
        field: &'static str,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The catalog could not be reached or answered with a failure status
    ///
    /// Covers connection failures, timeouts, TLS errors, non-success HTTP
    /// statuses and bodies that could not be read.
    #[error("HTTP error ({url})")]
    TransportError {
        /// The request URL that was attempted
        url: String,
        /// The underlying HTTP client error
        source: reqwest::Error,
    },

    /// The catalog body is not a valid catalog response
    #[error("Failed to decode catalog response from {url}")]
    DecodeError {
        /// The request URL whose response failed to decode
        url: String,
        /// The JSON decoding error
        source: serde_json::Error,
    },

    /// The catalog returned more than one matching image
    ///
    /// A lookup for one concrete build and architecture must produce at most
    /// one block. Picking one of several would cache the wrong content sets.
    #[error("Ambiguous response: more than one matching image ({count} blocks) from {url}")]
    ShapeError {
        /// The request URL
        url: String,
        /// Number of result blocks returned
        count: usize,
    },

    /// The mapping file could not be read, parsed, serialized or written
    #[error("Failed to {operation} mapping store {}", .path.display())]
    StoreError {
        /// Path of the mapping file
        path: PathBuf,
        /// The store operation that failed
        operation: StoreOperation,
        /// The underlying I/O or serialization error
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl NvrmapError {
    /// Build a [`NvrmapError::StoreError`] from any error convertible to [`std::io::Error`].
    pub fn store(
        path: impl Into<PathBuf>,
        operation: StoreOperation,
        source: impl Into<std::io::Error>,
    ) -> Self {
        Self::StoreError {
            path: path.into(),
            operation,
            source: source.into(),
        }
    }

    /// Returns `true` for errors raised while talking to the catalog.
    #[must_use]
    pub const fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            Self::TransportError { .. } | Self::DecodeError { .. } | Self::ShapeError { .. }
        )
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` pairs a [`NvrmapError`] with optional details and a
/// suggestion. It is what the CLI prints when a command fails.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::core::{ErrorContext, NvrmapError};
///
/// let context = ErrorContext::new(NvrmapError::ConfigError {
///     message: "base_url is empty".to_string(),
/// })
/// .with_suggestion("Set base_url in ~/.nvrmap/config.toml")
/// .with_details("The catalog base URL must be an absolute http(s) URL");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying nvrmap error
    pub error: NvrmapError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`NvrmapError`]
    #[must_use]
    pub const fn new(error: NvrmapError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// [`NvrmapError`] values (including ones wrapped with `anyhow` context) get
/// tailored suggestions. I/O and TOML errors get generic filesystem or config
/// guidance. Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<NvrmapError>() {
        Ok(nvrmap_error) => return create_error_context(nvrmap_error),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(NvrmapError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership and permissions of the mapping file and its directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(NvrmapError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(NvrmapError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your nvrmap config file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(NvrmapError::Other {
        message,
    })
}

/// Map each [`NvrmapError`] variant to an [`ErrorContext`] with suggestions.
fn create_error_context(error: NvrmapError) -> ErrorContext {
    match &error {
        NvrmapError::InvalidIdentifier { .. } => ErrorContext::new(error)
            .with_suggestion("Pass a non-empty NVR and architecture, neither containing '//'")
            .with_details("Mapping keys are '<nvr>//<arch>', so '//' cannot appear in either half"),

        NvrmapError::TransportError { source, .. } => {
            let details = source.to_string();
            let suggestion = if source.is_timeout() {
                "The catalog did not answer in time. Retry, or raise --timeout"
            } else if source.is_status() {
                "The catalog rejected the request. Check the NVR and the configured base URL"
            } else {
                "Check your network connection and the configured base URL (--base-url or NVRMAP_BASE_URL)"
            };
            ErrorContext::new(error).with_details(details).with_suggestion(suggestion)
        }

        NvrmapError::DecodeError { source, .. } => {
            let details = source.to_string();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Verify the base URL points at the catalog images/nvr endpoint")
        }

        NvrmapError::ShapeError { .. } => ErrorContext::new(error)
            .with_details("A lookup for one NVR and architecture must match at most one image")
            .with_suggestion("Check the NVR and architecture; nothing was cached for this lookup"),

        NvrmapError::StoreError { source, .. } => {
            let details = source.to_string();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check the mapping file is valid JSON and its directory is writable, or point --mapping elsewhere")
        }

        NvrmapError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check ~/.nvrmap/config.toml or the file passed with --config"),

        NvrmapError::Other { .. } => ErrorContext::new(error),
    }
}
