//! Project schema versions
//!
//! Format: `{major}` or `{major}-{stage}` (e.g., `2`, `3-alpha`).
//!
//! The version is kept as the raw string so it can be used as a map key
//! exactly as written in the `PROJECT` file or on the command line.
//! Syntax is only checked on demand, by [`ProjectVersion::validate`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// The first schema generation that records a layout key in `PROJECT`
const LAYOUT_MAJOR: u32 = 3;

/// The earliest, no longer supported, schema generation
const LEGACY_MAJOR: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    #[error("project version is empty")]
    Empty,

    #[error("project version must be '{{major}}' or '{{major}}-{{stage}}', got '{0}'")]
    Malformed(String),

    #[error("project version major must be a positive integer without leading zeros, got '{0}'")]
    InvalidMajor(String),
}

/// A project schema version such as `2` or `3-alpha`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectVersion(String);

/// Hand-edited `PROJECT` files often carry `version: 2` unquoted
impl<'de> Deserialize<'de> for ProjectVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl ProjectVersion {
    /// Wraps a raw version string without validating it
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the version is syntactically well-formed
    pub fn validate(&self) -> Result<(), VersionError> {
        self.major().map(|_| ())
    }

    /// Returns the numeric major component
    pub fn major(&self) -> Result<u32, VersionError> {
        if self.0.is_empty() {
            return Err(VersionError::Empty);
        }

        let (major, stage) = match self.0.split_once('-') {
            Some((major, stage)) => (major, Some(stage)),
            None => (self.0.as_str(), None),
        };

        if let Some(stage) = stage {
            let stage_ok = !stage.is_empty()
                && stage
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
            if !stage_ok {
                return Err(VersionError::Malformed(self.0.clone()));
            }
        }

        if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
            return Err(VersionError::Malformed(self.0.clone()));
        }
        if major.starts_with('0') {
            return Err(VersionError::InvalidMajor(self.0.clone()));
        }

        major
            .parse::<u32>()
            .map_err(|_| VersionError::InvalidMajor(self.0.clone()))
    }

    /// Returns true if projects of this version persist a layout key
    pub fn supports_layout(&self) -> bool {
        matches!(self.major(), Ok(major) if major >= LAYOUT_MAJOR)
    }

    /// Returns true for the first-generation schema
    pub fn is_legacy(&self) -> bool {
        matches!(self.major(), Ok(LEGACY_MAJOR))
    }
}

impl fmt::Display for ProjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectVersion {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProjectVersion {
    fn from(s: String) -> Self {
        Self(s)
    }
}
