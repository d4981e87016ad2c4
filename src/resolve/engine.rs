//! Plugin resolution
//!
//! Precedence, evaluated in order:
//! 1. `--plugins` key
//! 2. layout key of a configured project whose schema records one
//! 3. the default plugin of the requested project version
//!
//! Keys are matched against the version's default plugin first and only then
//! against every plugin of the version. A short key like `go` therefore
//! resolves to the default when several `go` plugins exist.

use std::sync::Arc;

use tracing::debug;

use super::context::ResolutionContext;
use super::matcher::{resolve_by_key, ResolveError, ResolvedPlugins};
use crate::domain::ProjectVersion;
use crate::plugin::{PluginRef, PluginRegistry};

/// Selects the plugins for this invocation
///
/// Expects [`super::validate`] to have accepted the context.
pub fn resolve(ctx: &ResolutionContext, registry: &PluginRegistry) -> Result<ResolvedPlugins, ResolveError> {
    let version = &ctx.requested_version;

    if ctx.has_cli_plugin_key() {
        debug!(key = %ctx.cli_plugin_key, %version, "resolving plugins from --plugins");
        return resolve_narrow_then_wide(registry, version, &ctx.cli_plugin_key);
    }

    if let Some(layout) = ctx.layout() {
        if layout.is_empty() {
            return Err(ResolveError::MissingLayoutKey(version.clone()));
        }
        debug!(%layout, %version, "resolving plugins from project layout");
        return resolve_narrow_then_wide(registry, version, layout);
    }

    debug!(%version, "using default plugin");
    registry
        .default_for(version)
        .map(|plugin| ResolvedPlugins::single(Arc::clone(plugin)))
        .ok_or_else(|| ResolveError::NoDefaultPlugin(version.clone()))
}

/// Matches against the default plugin, then against all plugins of the version
///
/// Any failure of the narrow attempt falls through to the wide one, whose
/// error is the one reported.
fn resolve_narrow_then_wide(
    registry: &PluginRegistry,
    version: &ProjectVersion,
    key: &str,
) -> Result<ResolvedPlugins, ResolveError> {
    let defaults: Vec<PluginRef> = registry.default_for(version).cloned().into_iter().collect();

    resolve_by_key(&defaults, key).or_else(|narrow| {
        debug!(%key, error = %narrow, "default plugin did not match, trying all plugins");
        resolve_by_key(&registry.plugins_for(version), key)
    })
}
