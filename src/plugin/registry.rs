//! Plugin registry
//!
//! Holds, per project version, every plugin the host made available and at
//! most one default plugin. Built once at startup and read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;

use super::traits::PluginRef;
use crate::domain::{validate_name, PluginKey, ProjectVersion};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error(
        "project version '{version}' already has default plugin '{existing}', cannot also set '{new}'"
    )]
    DuplicateDefaultPlugin {
        version: ProjectVersion,
        existing: PluginKey,
        new: PluginKey,
    },

    #[error("more than one plugin for project version '{version}' has the key '{key}'")]
    ConflictingPluginKeys {
        version: ProjectVersion,
        key: PluginKey,
    },

    #[error("invalid plugin '{key}': {reason}")]
    InvalidPlugin { key: String, reason: String },
}

/// Plugins available to the CLI, indexed by project version
///
/// Defaults are kept apart from the plugin batches. A default only shows up
/// among the candidates of a version when no batch plugin carries its key.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    by_version: BTreeMap<ProjectVersion, Vec<PluginRef>>,
    default_by_version: BTreeMap<ProjectVersion, PluginRef>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a batch of plugins under every project version they support
    ///
    /// Plain batches are appended as given, so registering the same key twice
    /// for a version is a conflict. Default batches only claim the default
    /// slot of each version; a version can have only one default.
    pub fn register_plugins<I>(&mut self, plugins: I, is_default: bool) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = PluginRef>,
    {
        for plugin in plugins {
            validate_plugin(&plugin)?;

            for version in plugin.supported_project_versions() {
                if !is_default {
                    self.by_version
                        .entry(version)
                        .or_default()
                        .push(Arc::clone(&plugin));
                    continue;
                }

                if let Some(existing) = self.default_by_version.get(&version) {
                    return Err(RegistryError::DuplicateDefaultPlugin {
                        version,
                        existing: existing.key(),
                        new: plugin.key(),
                    });
                }
                self.default_by_version.insert(version, Arc::clone(&plugin));
            }
        }

        if is_default {
            return Ok(());
        }
        self.check_conflicts()
    }

    /// Checks that no two batch plugins of a version share a key
    fn check_conflicts(&self) -> Result<(), RegistryError> {
        for (version, plugins) in &self.by_version {
            for (i, plugin) in plugins.iter().enumerate() {
                let key = plugin.key();
                if plugins[..i].iter().any(|other| other.key() == key) {
                    return Err(RegistryError::ConflictingPluginKeys {
                        version: version.clone(),
                        key,
                    });
                }
            }
        }
        Ok(())
    }

    /// All candidate plugins of a version, in registration order
    ///
    /// The default comes last, and only if no batch plugin has its key.
    pub fn plugins_for(&self, version: &ProjectVersion) -> Vec<PluginRef> {
        let mut plugins = self.by_version.get(version).cloned().unwrap_or_default();

        if let Some(default) = self.default_by_version.get(version) {
            let key = default.key();
            if !plugins.iter().any(|p| p.key() == key) {
                plugins.push(Arc::clone(default));
            }
        }
        plugins
    }

    /// The default plugin for a version
    pub fn default_for(&self, version: &ProjectVersion) -> Option<&PluginRef> {
        self.default_by_version.get(version)
    }

    /// Project versions with at least one plugin or a default
    pub fn versions(&self) -> Vec<&ProjectVersion> {
        let versions: BTreeSet<&ProjectVersion> = self
            .by_version
            .keys()
            .chain(self.default_by_version.keys())
            .collect();
        versions.into_iter().collect()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = |plugins: &[PluginRef]| -> Vec<String> {
            plugins.iter().map(|p| p.key().to_string()).collect()
        };

        let mut out = f.debug_struct("PluginRegistry");
        for (version, plugins) in &self.by_version {
            out.field(version.as_str(), &keys(plugins));
        }
        for (version, plugin) in &self.default_by_version {
            out.field(&format!("default {}", version), &plugin.key().to_string());
        }
        out.finish()
    }
}

/// Checks a plugin's identity before it is registered
fn validate_plugin(plugin: &PluginRef) -> Result<(), RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidPlugin {
        key: plugin.key().to_string(),
        reason,
    };

    validate_name(plugin.name()).map_err(|e| invalid(e.to_string()))?;

    if plugin.version().number() == 0 {
        return Err(invalid("plugin version number must be positive".to_string()));
    }

    let versions = plugin.supported_project_versions();
    if versions.is_empty() {
        return Err(invalid("plugin supports no project versions".to_string()));
    }
    for version in &versions {
        version
            .validate()
            .map_err(|e| invalid(format!("unsupported project version '{}': {}", version, e)))?;
    }

    Ok(())
}
