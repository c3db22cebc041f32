//! Shared data models for nvrmap.
//!
//! [`BuildRef`] names one build on one architecture. It is the unit the
//! catalog is queried for and the identity of an entry in the mapping file.

use crate::constants::KEY_SEPARATOR;
use crate::core::{NvrmapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated (build identifier, architecture) pair.
///
/// Both halves are non-empty and free of the `//` key separator, so
/// [`BuildRef::key`] is unambiguous and can be split back apart.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::models::BuildRef;
///
/// let build = BuildRef::new("foo-bar-1.0-1", "x86_64")?;
/// assert_eq!(build.key(), "foo-bar-1.0-1//x86_64");
/// # Ok::<(), nvrmap_cli::core::NvrmapError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildRef {
    nvr: String,
    arch: String,
}

impl BuildRef {
    /// Validate and build a reference.
    pub fn new(nvr: impl Into<String>, arch: impl Into<String>) -> Result<Self> {
        let nvr = nvr.into();
        let arch = arch.into();
        validate_part("build id", &nvr)?;
        validate_part("architecture", &arch)?;
        Ok(Self {
            nvr,
            arch,
        })
    }

    /// Split a mapping key (`<nvr>//<arch>`) back into a reference.
    pub fn from_key(key: &str) -> Result<Self> {
        match key.split_once(KEY_SEPARATOR) {
            Some((nvr, arch)) => Self::new(nvr, arch),
            None => Err(NvrmapError::InvalidIdentifier {
                field: "mapping key",
                value: key.to_string(),
                reason: "missing '//' separator",
            }),
        }
    }

    /// The name-version-release of the build.
    #[must_use]
    pub fn nvr(&self) -> &str {
        &self.nvr
    }

    /// The architecture label.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Composite mapping key: `<nvr>//<arch>`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.nvr, self.arch)
    }
}

impl fmt::Display for BuildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.nvr, self.arch)
    }
}

fn validate_part(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NvrmapError::InvalidIdentifier {
            field,
            value: value.to_string(),
            reason: "must not be empty",
        });
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(NvrmapError::InvalidIdentifier {
            field,
            value: value.to_string(),
            reason: "must not contain '//'",
        });
    }
    Ok(())
}
