//! Project configuration handling
//!
//! Configuration is stored in a YAML `PROJECT` file at the project root.
//! Probing distinguishes three outcomes: the file is absent (the project is
//! not configured yet), the file cannot be read or parsed (fatal), or the
//! file was loaded.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ProjectVersion;

/// File name of the project configuration
pub const CONFIG_FILE: &str = "PROJECT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write config file '{path}'")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Webhooks scaffolded for a resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Webhooks {
    pub defaulting: bool,
    pub validation: bool,
}

impl Webhooks {
    pub fn is_empty(&self) -> bool {
        !self.defaulting && !self.validation
    }
}

/// An API resource recorded in the project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub group: String,
    pub version: String,
    pub kind: String,

    #[serde(default, skip_serializing_if = "Webhooks::is_empty")]
    pub webhooks: Webhooks,
}

impl Resource {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            webhooks: Webhooks::default(),
        }
    }

    /// Returns true if this resource has the given group/version/kind
    pub fn is(&self, group: &str, version: &str, kind: &str) -> bool {
        self.group == group && self.version == version && self.kind == kind
    }
}

fn legacy_version() -> ProjectVersion {
    ProjectVersion::new("1")
}

/// Contents of the `PROJECT` file
///
/// A file without a `version` field predates versioning and is treated
/// as the legacy first-generation schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "legacy_version")]
    pub version: ProjectVersion,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    /// Key of the plugin that scaffolded the project
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub layout: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl ProjectConfig {
    pub fn new(version: ProjectVersion) -> Self {
        Self {
            version,
            domain: String::new(),
            repo: String::new(),
            layout: String::new(),
            resources: Vec::new(),
        }
    }

    /// Returns the config file path for a project root
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE)
    }

    /// Loads the project configuration, if there is one
    ///
    /// Returns `Ok(None)` when the file does not exist. Any other read
    /// failure, and any parse failure, is an error.
    pub fn load(project_root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = Self::path(project_root);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path,
                message: e.to_string(),
            })
    }

    /// Writes the configuration to the project root
    pub fn save(&self, project_root: &Path) -> Result<(), ConfigError> {
        let path = Self::path(project_root);
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(&path, content).map_err(|source| ConfigError::Write { path, source })
    }

    /// Returns true for the unsupported first-generation schema
    pub fn is_legacy(&self) -> bool {
        self.version.is_legacy()
    }

    /// Returns true if this schema records a layout key
    pub fn supports_layout(&self) -> bool {
        self.version.supports_layout()
    }

    /// Returns the layout key, empty for schemas without layout support
    pub fn layout(&self) -> &str {
        if self.supports_layout() {
            self.layout.trim()
        } else {
            ""
        }
    }

    /// Finds a resource by group/version/kind
    pub fn resource_mut(&mut self, group: &str, version: &str, kind: &str) -> Option<&mut Resource> {
        self.resources
            .iter_mut()
            .find(|r| r.is(group, version, kind))
    }

    pub fn has_resource(&self, group: &str, version: &str, kind: &str) -> bool {
        self.resources.iter().any(|r| r.is(group, version, kind))
    }
}
