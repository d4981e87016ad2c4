//! Plugin identity
//!
//! Key Format:
//! - Unversioned: `{name}` (e.g., `go.scaffold.dev`)
//! - Versioned: `{name}/{version}` (e.g., `go.scaffold.dev/v3-alpha`)
//!
//! Names are DNS-1123 subdomains. Versions are `v{number}` with an optional
//! `-alpha` or `-beta` stage suffix.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, PartialEq)]
pub enum KeyError {
    #[error("plugin key is empty")]
    EmptyKey,

    #[error("plugin name '{name}' is not a DNS-1123 subdomain: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("plugin version must be 'v{{number}}' or 'v{{number}}-{{alpha|beta}}', got '{0}'")]
    InvalidVersion(String),
}

/// Splits a raw key at the first `/`
///
/// A key without a `/` yields an empty version.
pub fn split_key(key: &str) -> (&str, &str) {
    key.split_once('/').unwrap_or((key, ""))
}

/// Checks a plugin name against DNS-1123 subdomain rules
pub fn validate_name(name: &str) -> Result<(), KeyError> {
    let invalid = |reason: &str| KeyError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name is longer than 253 characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("name contains an empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid("label is longer than 63 characters"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid(
                "only lowercase alphanumerics, '-' and '.' are allowed",
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("labels must start and end with an alphanumeric"));
        }
    }

    Ok(())
}

/// Maturity of a plugin version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Stable,
    Alpha,
    Beta,
}

impl Stage {
    pub fn suffix(&self) -> &'static str {
        match self {
            Stage::Stable => "",
            Stage::Alpha => "-alpha",
            Stage::Beta => "-beta",
        }
    }
}

/// A plugin version such as `v2` or `v3-alpha`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginVersion {
    number: u64,
    stage: Stage,
}

impl PluginVersion {
    pub fn new(number: u64, stage: Stage) -> Self {
        Self { number, stage }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}{}", self.number, self.stage.suffix())
    }
}

impl FromStr for PluginVersion {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeyError::InvalidVersion(s.to_string());

        let rest = s.strip_prefix('v').ok_or_else(invalid)?;
        let (number, stage) = match rest.split_once('-') {
            Some((number, "alpha")) => (number, Stage::Alpha),
            Some((number, "beta")) => (number, Stage::Beta),
            Some(_) => return Err(invalid()),
            None => (rest, Stage::Stable),
        };

        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u64 = number.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }

        Ok(Self { number, stage })
    }
}

/// Identity of a plugin: a name with an optional version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginKey {
    name: String,
    version: Option<PluginVersion>,
}

impl PluginKey {
    pub fn new(name: impl Into<String>, version: Option<PluginVersion>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&PluginVersion> {
        self.version.as_ref()
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for PluginKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = split_key(s.trim());
        if name.is_empty() {
            return Err(KeyError::EmptyKey);
        }
        validate_name(name)?;

        let version = if version.is_empty() {
            None
        } else {
            Some(version.parse()?)
        };

        Ok(Self::new(name, version))
    }
}
