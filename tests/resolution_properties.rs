//! Property-based tests for plugin resolution.
//!
//! Registries are generated with one plugin name and several plugin
//! versions, all supporting the same project version, and one of them
//! marked as the default.

use std::sync::Arc;

use proptest::prelude::*;

use scaffold_cli::domain::{PluginVersion, ProjectVersion, Stage};
use scaffold_cli::plugin::{Plugin, PluginRef, PluginRegistry, RegistryError};
use scaffold_cli::resolve::{resolve, validate, ResolutionContext, ResolveError};
use scaffold_cli::storage::ProjectConfig;

const PROJECT_VERSION: &str = "3-alpha";

struct FakePlugin {
    name: String,
    number: u64,
}

impl Plugin for FakePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> PluginVersion {
        PluginVersion::new(self.number, Stage::Stable)
    }

    fn supported_project_versions(&self) -> Vec<ProjectVersion> {
        vec![ProjectVersion::new(PROJECT_VERSION)]
    }
}

/// Strategy for DNS-1123 plugin names like `go.example.io`.
fn plugin_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..4).prop_map(|labels| labels.join("."))
}

/// Name, plugin count and index of the default plugin.
fn registry_shape() -> impl Strategy<Value = (String, usize, usize)> {
    (plugin_name(), 1usize..6).prop_flat_map(|(name, count)| (Just(name), Just(count), 0..count))
}

fn plugins(name: &str, count: usize) -> Vec<PluginRef> {
    (1..=count as u64)
        .map(|number| {
            Arc::new(FakePlugin {
                name: name.to_string(),
                number,
            }) as PluginRef
        })
        .collect()
}

fn registry(plugins: &[PluginRef], default: Option<usize>) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_plugins(plugins.iter().cloned(), false).unwrap();
    if let Some(index) = default {
        registry
            .register_plugins([Arc::clone(&plugins[index])], true)
            .unwrap();
    }
    registry
}

fn project_version() -> ProjectVersion {
    ProjectVersion::new(PROJECT_VERSION)
}

fn resolve_key(registry: &PluginRegistry, key: &str) -> Result<Vec<String>, ResolveError> {
    let ctx = ResolutionContext::unconfigured(project_version(), key);
    resolve(&ctx, registry).map(|resolved| resolved.keys().iter().map(ToString::to_string).collect())
}

proptest! {
    /// Without a key or layout, the default plugin is selected.
    #[test]
    fn default_is_selected_without_key((name, count, default) in registry_shape()) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, Some(default));

        let resolved = resolve_key(&registry, "").unwrap();
        prop_assert_eq!(resolved, vec![plugins[default].key().to_string()]);
    }

    /// A bare name matches the default before any other plugin.
    #[test]
    fn bare_name_narrows_to_default((name, count, default) in registry_shape()) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, Some(default));

        let resolved = resolve_key(&registry, &name).unwrap();
        prop_assert_eq!(resolved, vec![plugins[default].key().to_string()]);
    }

    /// A versioned key reaches every plugin, default or not.
    #[test]
    fn versioned_key_selects_exactly_that_plugin(
        (name, count, default) in registry_shape(),
        pick in any::<prop::sample::Index>(),
    ) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, Some(default));
        let wanted = plugins[pick.index(count)].key().to_string();

        let resolved = resolve_key(&registry, &wanted).unwrap();
        prop_assert_eq!(resolved, vec![wanted]);
    }

    /// Without a default, a bare name is ambiguous as soon as two versions exist.
    #[test]
    fn bare_name_without_default((name, count, _default) in registry_shape()) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, None);

        let result = resolve_key(&registry, &name);
        if count == 1 {
            prop_assert_eq!(result.unwrap(), vec![plugins[0].key().to_string()]);
        } else {
            let is_ambiguous = matches!(result, Err(ResolveError::AmbiguousPluginKey { .. }));
            prop_assert!(is_ambiguous);
        }
    }

    /// A layout-capable project without a layout key never falls back to the default.
    #[test]
    fn empty_layout_is_an_error((name, count, default) in registry_shape()) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, Some(default));
        let ctx = ResolutionContext::configured(ProjectConfig::new(project_version()), "");

        prop_assert!(validate(&ctx, &registry).is_ok());
        prop_assert_eq!(
            resolve(&ctx, &registry).unwrap_err(),
            ResolveError::MissingLayoutKey(project_version())
        );
    }

    /// The layout key of a configured project is honored.
    #[test]
    fn layout_key_is_honored(
        (name, count, default) in registry_shape(),
        pick in any::<prop::sample::Index>(),
    ) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, Some(default));
        let layout = plugins[pick.index(count)].key().to_string();

        let mut config = ProjectConfig::new(project_version());
        config.layout = layout.clone();
        let ctx = ResolutionContext::configured(config, "");

        let resolved = resolve(&ctx, &registry).unwrap();
        let keys: Vec<String> = resolved.keys().iter().map(ToString::to_string).collect();
        prop_assert_eq!(keys, vec![layout]);
    }

    /// Resolving twice gives the same plugin handles.
    #[test]
    fn resolution_is_idempotent(
        (name, count, default) in registry_shape(),
        use_key in any::<bool>(),
    ) {
        let plugins = plugins(&name, count);
        let registry = registry(&plugins, Some(default));
        let key = if use_key { name.as_str() } else { "" };
        let ctx = ResolutionContext::unconfigured(project_version(), key);

        let first = resolve(&ctx, &registry).unwrap();
        let second = resolve(&ctx, &registry).unwrap();
        prop_assert!(first.same_plugins(&second));
    }

    /// A project version never gets a second default.
    #[test]
    fn second_default_is_rejected((name, count, default) in registry_shape()) {
        let plugins = plugins(&name, count);
        let mut registry = registry(&plugins, Some(default));
        let other = Arc::new(FakePlugin { name: format!("{}x", name), number: 1 }) as PluginRef;

        let err = registry.register_plugins([other], true).unwrap_err();
        let is_duplicate = matches!(err, RegistryError::DuplicateDefaultPlugin { .. });
        prop_assert!(is_duplicate);
    }

    /// A default registered first never conflicts with a later, distinct plain batch.
    #[test]
    fn default_then_distinct_plain_batch((name, count, _default) in registry_shape()) {
        let default = Arc::new(FakePlugin { name: format!("{}x", name), number: 1 }) as PluginRef;
        let mut registry = PluginRegistry::new();
        registry.register_plugins([Arc::clone(&default)], true).unwrap();
        prop_assert!(registry.register_plugins(plugins(&name, count), false).is_ok());

        let resolved = resolve_key(&registry, "").unwrap();
        prop_assert_eq!(resolved, vec![default.key().to_string()]);
    }

    /// A default built separately from the plain plugin sharing its key is accepted.
    #[test]
    fn separately_built_default_is_accepted((name, count, default) in registry_shape()) {
        let plugins = plugins(&name, count);
        let mut registry = registry(&plugins, None);
        let fresh = Arc::new(FakePlugin {
            name: name.clone(),
            number: default as u64 + 1,
        }) as PluginRef;
        prop_assert!(registry.register_plugins([fresh], true).is_ok());

        let wanted = plugins[default].key().to_string();
        prop_assert_eq!(resolve_key(&registry, "").unwrap(), vec![wanted.clone()]);
        prop_assert_eq!(resolve_key(&registry, &wanted).unwrap(), vec![wanted]);
    }

    /// Registering the same plain plugin twice is a key conflict.
    #[test]
    fn same_plain_plugin_twice_conflicts((name, count, pick) in registry_shape()) {
        let plugins = plugins(&name, count);
        let mut registry = registry(&plugins, None);

        let err = registry
            .register_plugins([Arc::clone(&plugins[pick])], false)
            .unwrap_err();
        let is_conflict = matches!(err, RegistryError::ConflictingPluginKeys { .. });
        prop_assert!(is_conflict);
    }
}
