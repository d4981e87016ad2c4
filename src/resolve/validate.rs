//! Pre-resolution checks
//!
//! Rejects incoherent invocations before any plugin is resolved, so users get
//! an error about their input rather than one from deep inside resolution.

use thiserror::Error;

use super::context::ResolutionContext;
use crate::domain::{split_key, validate_name, KeyError, PluginVersion, ProjectVersion, VersionError};
use crate::plugin::PluginRegistry;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid project version '{version}': {reason}")]
    InvalidProjectVersion {
        version: ProjectVersion,
        reason: VersionError,
    },

    #[error("no plugins for project version '{0}'")]
    NoPluginsForVersion(ProjectVersion),

    #[error("no default plugins for project version '{0}'")]
    NoDefaultPluginForVersion(ProjectVersion),

    #[error("invalid plugin name '{name}': {reason}")]
    InvalidPluginName { name: String, reason: KeyError },

    #[error("invalid plugin version '{version}': {reason}")]
    InvalidPluginVersion { version: String, reason: KeyError },
}

/// Checks the context against the registry; the first failing check wins
pub fn validate(ctx: &ResolutionContext, registry: &PluginRegistry) -> Result<(), ValidationError> {
    let version = &ctx.requested_version;

    version
        .validate()
        .map_err(|reason| ValidationError::InvalidProjectVersion {
            version: version.clone(),
            reason,
        })?;

    if registry.plugins_for(version).is_empty() {
        return Err(ValidationError::NoPluginsForVersion(version.clone()));
    }

    // Without --plugins or a layout key only the version's default can be used
    if ctx.requires_default() && registry.default_for(version).is_none() {
        return Err(ValidationError::NoDefaultPluginForVersion(version.clone()));
    }

    if ctx.has_cli_plugin_key() {
        let (name, plugin_version) = split_key(&ctx.cli_plugin_key);
        validate_name(name).map_err(|reason| ValidationError::InvalidPluginName {
            name: name.to_string(),
            reason,
        })?;

        // CLI keys do not have to carry a version
        if !plugin_version.is_empty() {
            plugin_version
                .parse::<PluginVersion>()
                .map_err(|reason| ValidationError::InvalidPluginVersion {
                    version: plugin_version.to_string(),
                    reason,
                })?;
        }
    }

    Ok(())
}
