//! CLI bootstrap
//!
//! Runs once per process, before any subcommand:
//!
//! ```text
//! pre-scan ──► config load ──► legacy guard ──► validate ──► resolve ──► command tree
//! ```
//!
//! Generic help skips validation and resolution and builds the tree without
//! plugins.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::Command;
use thiserror::Error;
use tracing::{debug, warn};

use super::prescan::PreScan;
use super::tree::{CommandTree, ExtraCommand};
use crate::domain::{ProjectVersion, VersionError};
use crate::output;
use crate::plugin::{PluginRef, PluginRegistry, RegistryError, SubcommandContext};
use crate::resolve::{self, ResolutionContext, ResolveError, ResolvedPlugins, ValidationError};
use crate::storage::{ConfigError, ProjectConfig};

pub const DEFAULT_COMMAND_NAME: &str = "scaffold";
pub const DEFAULT_PROJECT_VERSION: &str = "2";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid default project version '{version}': {reason}")]
    InvalidDefaultProjectVersion {
        version: ProjectVersion,
        reason: VersionError,
    },

    #[error("broken pre-set plugins")]
    Registry(#[from] RegistryError),

    #[error("failed to read config")]
    Config(#[from] ConfigError),

    #[error(
        "project version {0} is no longer supported; migrate the project to a newer \
         project version by re-initializing it with this tool and moving your code over"
    )]
    UnsupportedLegacyProject(ProjectVersion),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("command '{0}' already exists")]
    DuplicateCommand(String),
}

/// Host configuration for a [`Cli`]
pub struct CliBuilder {
    command_name: String,
    default_project_version: ProjectVersion,
    batches: Vec<(Vec<PluginRef>, bool)>,
    extra_commands: Vec<Box<dyn ExtraCommand>>,
    project_dir: PathBuf,
}

impl Default for CliBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CliBuilder {
    pub fn new() -> Self {
        Self {
            command_name: DEFAULT_COMMAND_NAME.to_string(),
            default_project_version: ProjectVersion::new(DEFAULT_PROJECT_VERSION),
            batches: Vec::new(),
            extra_commands: Vec::new(),
            project_dir: PathBuf::from("."),
        }
    }

    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = name.into();
        self
    }

    /// Version used when `--project-version` is absent and no project exists
    pub fn default_project_version(mut self, version: impl Into<ProjectVersion>) -> Self {
        self.default_project_version = version.into();
        self
    }

    /// Adds a batch of plugins
    pub fn plugins<I>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = PluginRef>,
    {
        self.batches.push((plugins.into_iter().collect(), false));
        self
    }

    /// Adds a batch of default plugins, at most one per project version
    pub fn default_plugins<I>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = PluginRef>,
    {
        self.batches.push((plugins.into_iter().collect(), true));
        self
    }

    pub fn extra_command(mut self, command: impl ExtraCommand + 'static) -> Self {
        self.extra_commands.push(Box::new(command));
        self
    }

    /// Directory searched for the `PROJECT` file
    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Bootstraps against the process arguments
    pub fn build(self) -> Result<Cli, BootstrapError> {
        self.build_from(env::args_os())
    }

    /// Bootstraps against `args`, which include the program name
    pub fn build_from<I, T>(self, args: I) -> Result<Cli, BootstrapError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        self.default_project_version
            .validate()
            .map_err(|reason| BootstrapError::InvalidDefaultProjectVersion {
                version: self.default_project_version.clone(),
                reason,
            })?;

        let mut registry = PluginRegistry::new();
        for (batch, is_default) in self.batches {
            registry.register_plugins(batch, is_default)?;
        }

        let scan = PreScan::scan(&args, &self.default_project_version);
        debug!(?scan, "pre-scanned arguments");

        let context = match ProjectConfig::load(&self.project_dir)? {
            Some(config) => {
                check_legacy(&config)?;
                if scan.project_version_set && scan.project_version != config.version {
                    debug!(
                        requested = %scan.project_version,
                        configured = %config.version,
                        "ignoring --project-version inside a configured project"
                    );
                }
                ResolutionContext::configured(config, &scan.cli_plugin_key)
            }
            None => ResolutionContext::unconfigured(scan.project_version.clone(), &scan.cli_plugin_key),
        };

        let resolved = if scan.generic_help {
            debug!("generic help requested, skipping plugin resolution");
            None
        } else {
            resolve::validate(&context, &registry)?;
            let resolved = resolve::resolve(&context, &registry)?;
            debug!(plugins = ?resolved.keys(), "resolved plugins");
            Some(resolved)
        };

        let plugins = resolved.as_ref().map(ResolvedPlugins::as_slice).unwrap_or(&[]);
        let tree = CommandTree::build(&self.command_name, &registry, plugins, self.extra_commands)?;

        let cli = Cli {
            command_name: self.command_name,
            project_dir: self.project_dir,
            args,
            context,
            resolved,
            tree,
        };

        let notices = cli.deprecation_notices();
        for notice in &notices {
            warn!(%notice, "resolved a deprecated plugin");
        }
        output::deprecation_notices(&notices);

        Ok(cli)
    }
}

/// Legacy projects fail before anything is validated
fn check_legacy(config: &ProjectConfig) -> Result<(), BootstrapError> {
    if config.is_legacy() {
        return Err(BootstrapError::UnsupportedLegacyProject(config.version.clone()));
    }
    Ok(())
}

/// A bootstrapped CLI, ready to parse and dispatch
pub struct Cli {
    command_name: String,
    project_dir: PathBuf,
    args: Vec<OsString>,
    context: ResolutionContext,
    resolved: Option<ResolvedPlugins>,
    tree: CommandTree,
}

impl Cli {
    pub fn builder() -> CliBuilder {
        CliBuilder::new()
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// The resolved plugins, `None` in generic help mode
    pub fn resolved_plugins(&self) -> Option<&ResolvedPlugins> {
        self.resolved.as_ref()
    }

    pub fn is_generic_help(&self) -> bool {
        self.resolved.is_none()
    }

    pub fn command(&self) -> &Command {
        self.tree.command()
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Warnings of the resolved deprecated plugins, in resolution order
    pub fn deprecation_notices(&self) -> Vec<String> {
        self.resolved
            .as_ref()
            .map(ResolvedPlugins::deprecation_warnings)
            .unwrap_or_default()
    }

    /// Parses the arguments and runs the selected command
    pub fn run(self) -> Result<()> {
        let Cli {
            command_name,
            project_dir,
            args,
            context,
            tree,
            ..
        } = self;

        tree.run(args, |plugin: &PluginRef| SubcommandContext {
            command_name: command_name.clone(),
            project_dir: project_dir.clone(),
            project_version: context.requested_version.clone(),
            plugin_key: plugin.key(),
            config: context.config.clone(),
        })
    }
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("command_name", &self.command_name)
            .field("context", &self.context)
            .field("resolved", &self.resolved)
            .finish()
    }
}
