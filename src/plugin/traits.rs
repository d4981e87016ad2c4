//! Plugin capability traits
//!
//! A plugin is identified by its key and the project versions it supports.
//! Everything else it can do is exposed as an optional capability, queried
//! through the accessor methods on [`Plugin`].

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgMatches, Command};

use crate::domain::{PluginKey, PluginVersion, ProjectVersion};
use crate::storage::ProjectConfig;

/// Shared handle to a registered plugin
pub type PluginRef = Arc<dyn Plugin>;

/// Subcommands a plugin can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubcommandKind {
    Init,
    CreateApi,
    CreateWebhook,
}

/// A bundle of scaffolding behavior tied to project versions
pub trait Plugin: Send + Sync {
    /// DNS-1123 name, e.g. `go.scaffold.dev`
    fn name(&self) -> &str;

    fn version(&self) -> PluginVersion;

    /// Project versions this plugin can scaffold
    fn supported_project_versions(&self) -> Vec<ProjectVersion>;

    fn key(&self) -> PluginKey {
        PluginKey::new(self.name(), Some(self.version()))
    }

    /// Returns the handler for a subcommand, if this plugin provides one
    fn subcommand(&self, _kind: SubcommandKind) -> Option<&dyn Subcommand> {
        None
    }

    /// Named subcommands for the `alpha` command group
    fn alpha_subcommands(&self) -> Vec<(&str, &dyn Subcommand)> {
        Vec::new()
    }

    /// Returns the deprecation capability if this plugin is deprecated
    fn deprecated(&self) -> Option<&dyn Deprecated> {
        None
    }
}

/// Capability of a plugin that should no longer be used
pub trait Deprecated {
    fn deprecation_warning(&self) -> &str;
}

/// A subcommand handler contributed by a plugin
pub trait Subcommand: Send + Sync {
    /// Adds flags and help text to the command
    fn configure(&self, cmd: Command) -> Command {
        cmd
    }

    fn run(&self, ctx: &SubcommandContext, matches: &ArgMatches) -> anyhow::Result<()>;
}

/// Everything a subcommand handler knows about the current invocation
#[derive(Debug, Clone)]
pub struct SubcommandContext {
    /// Root command name, for messages
    pub command_name: String,

    pub project_dir: PathBuf,

    pub project_version: ProjectVersion,

    /// Key of the plugin running the subcommand
    pub plugin_key: PluginKey,

    /// `None` if the project has no `PROJECT` file yet
    pub config: Option<ProjectConfig>,
}
