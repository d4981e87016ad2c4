//! Plugin key matching
//!
//! Matches a possibly partial key (`name` or `name/version`) against a set
//! of candidate plugins. Knows nothing about defaults or configuration.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::{split_key, PluginKey, ProjectVersion};
use crate::plugin::PluginRef;

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("plugin key '{0}' has an empty name")]
    EmptyPluginKey(String),

    #[error("no plugin could be resolved with key '{0}'")]
    NoMatchingPlugin(String),

    #[error(
        "plugin key '{key}' is ambiguous, it matches {}; specify a version to pick one",
        .matches.join(", ")
    )]
    AmbiguousPluginKey { key: String, matches: Vec<String> },

    #[error("config for project version '{0}' must have a layout value")]
    MissingLayoutKey(ProjectVersion),

    #[error("no default plugin for project version '{0}'")]
    NoDefaultPlugin(ProjectVersion),
}

/// The plugins selected for this invocation, never empty
#[derive(Clone)]
pub struct ResolvedPlugins(Vec<PluginRef>);

impl ResolvedPlugins {
    pub(crate) fn single(plugin: PluginRef) -> Self {
        Self(vec![plugin])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginRef> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PluginRef] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> Vec<PluginKey> {
        self.0.iter().map(|p| p.key()).collect()
    }

    /// Returns true if both lists hold the same plugin objects in the same order
    pub fn same_plugins(&self, other: &ResolvedPlugins) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// Warnings of every deprecated plugin, in order
    pub fn deprecation_warnings(&self) -> Vec<String> {
        self.0
            .iter()
            .filter_map(|p| p.deprecated().map(|d| d.deprecation_warning().to_string()))
            .collect()
    }
}

impl fmt::Debug for ResolvedPlugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|p| p.key().to_string()))
            .finish()
    }
}

/// Selects the single candidate matching `raw_key`
///
/// A bare name matches every version of that name; a `name/version` key
/// matches only that exact version. Zero or several matches are errors.
pub fn resolve_by_key(candidates: &[PluginRef], raw_key: &str) -> Result<ResolvedPlugins, ResolveError> {
    let (name, version) = split_key(raw_key);
    if name.is_empty() {
        return Err(ResolveError::EmptyPluginKey(raw_key.to_string()));
    }

    let matches: Vec<&PluginRef> = candidates
        .iter()
        .filter(|p| p.name() == name)
        .filter(|p| version.is_empty() || p.version().to_string() == version)
        .collect();

    match matches.as_slice() {
        [] => Err(ResolveError::NoMatchingPlugin(raw_key.to_string())),
        [single] => Ok(ResolvedPlugins::single(Arc::clone(single))),
        many => Err(ResolveError::AmbiguousPluginKey {
            key: raw_key.to_string(),
            matches: many.iter().map(|p| p.key().to_string()).collect(),
        }),
    }
}
