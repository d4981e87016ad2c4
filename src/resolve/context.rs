//! Per-invocation resolution inputs

use crate::domain::ProjectVersion;
use crate::storage::ProjectConfig;

/// What is known about the invocation before resolution starts
///
/// Built once per process from the pre-scanned arguments and the loaded
/// project configuration, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionContext {
    /// Project version after defaulting; taken from the config when configured
    pub requested_version: ProjectVersion,

    /// Trimmed `--plugins` value, empty when not supplied
    pub cli_plugin_key: String,

    /// The loaded `PROJECT` file, `None` when the project is not configured
    pub config: Option<ProjectConfig>,
}

impl ResolutionContext {
    /// Context for a directory without a `PROJECT` file
    pub fn unconfigured(requested_version: ProjectVersion, cli_plugin_key: &str) -> Self {
        Self {
            requested_version,
            cli_plugin_key: cli_plugin_key.trim().to_string(),
            config: None,
        }
    }

    /// Context for a configured project; its declared version wins
    pub fn configured(config: ProjectConfig, cli_plugin_key: &str) -> Self {
        Self {
            requested_version: config.version.clone(),
            cli_plugin_key: cli_plugin_key.trim().to_string(),
            config: Some(config),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn has_cli_plugin_key(&self) -> bool {
        !self.cli_plugin_key.is_empty()
    }

    /// The persisted layout key of a configured, layout-supporting project
    ///
    /// `Some("")` means the project should have a layout key but does not.
    pub fn layout(&self) -> Option<&str> {
        self.config
            .as_ref()
            .filter(|config| config.supports_layout())
            .map(ProjectConfig::layout)
    }

    /// True when neither a CLI key nor a layout key can select a plugin
    pub fn requires_default(&self) -> bool {
        !self.has_cli_plugin_key() && self.layout().is_none()
    }
}
