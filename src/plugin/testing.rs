//! Plugin doubles for unit tests

use std::sync::Arc;

use clap::ArgMatches;

use super::traits::{Deprecated, Plugin, PluginRef, Subcommand, SubcommandContext, SubcommandKind};
use crate::domain::{PluginVersion, ProjectVersion};

pub struct TestPlugin {
    name: String,
    version: PluginVersion,
    project_versions: Vec<ProjectVersion>,
    warning: Option<String>,
    alpha: Option<NoopSubcommand>,
    init: NoopSubcommand,
}

impl Plugin for TestPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> PluginVersion {
        self.version.clone()
    }

    fn supported_project_versions(&self) -> Vec<ProjectVersion> {
        self.project_versions.clone()
    }

    fn subcommand(&self, kind: SubcommandKind) -> Option<&dyn Subcommand> {
        match kind {
            SubcommandKind::Init => Some(&self.init),
            _ => None,
        }
    }

    fn alpha_subcommands(&self) -> Vec<(&str, &dyn Subcommand)> {
        match &self.alpha {
            Some(sub) => vec![("experiment", sub as &dyn Subcommand)],
            None => Vec::new(),
        }
    }

    fn deprecated(&self) -> Option<&dyn Deprecated> {
        self.warning.as_ref().map(|_| self as &dyn Deprecated)
    }
}

impl Deprecated for TestPlugin {
    fn deprecation_warning(&self) -> &str {
        self.warning.as_deref().unwrap_or_default()
    }
}

pub struct NoopSubcommand;

impl Subcommand for NoopSubcommand {
    fn run(&self, _ctx: &SubcommandContext, _matches: &ArgMatches) -> anyhow::Result<()> {
        Ok(())
    }
}

fn build(name: &str, version: &str, versions: &[&str]) -> TestPlugin {
    TestPlugin {
        name: name.to_string(),
        version: version.parse().unwrap(),
        project_versions: versions.iter().copied().map(ProjectVersion::new).collect(),
        warning: None,
        alpha: None,
        init: NoopSubcommand,
    }
}

/// A plugin that only provides `init`
pub fn plugin(name: &str, version: &str, versions: &[&str]) -> PluginRef {
    Arc::new(build(name, version, versions))
}

/// A deprecated plugin carrying `warning`
pub fn deprecated(name: &str, version: &str, versions: &[&str], warning: &str) -> PluginRef {
    let mut plugin = build(name, version, versions);
    plugin.warning = Some(warning.to_string());
    Arc::new(plugin)
}

/// A plugin that contributes an `alpha experiment` subcommand
pub fn with_alpha(name: &str, version: &str, versions: &[&str]) -> PluginRef {
    let mut plugin = build(name, version, versions);
    plugin.alpha = Some(NoopSubcommand);
    Arc::new(plugin)
}
