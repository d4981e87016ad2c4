//! Command tree construction
//!
//! The tree is built after resolution. Subcommands only exist when a resolved
//! plugin provides them; in generic help mode there are no resolved plugins
//! and every subcommand is a help-only placeholder.

use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Arg, ArgMatches, Command};

use super::bootstrap::BootstrapError;
use super::prescan::{PLUGINS_FLAG, PROJECT_VERSION_FLAG};
use crate::plugin::{PluginRef, PluginRegistry, SubcommandContext, SubcommandKind};

pub const RUN_IN_PROJECT_ROOT_MSG: &str =
    "For project-specific information, run this command in the root directory of a project.";

/// A host-supplied command added next to the plugin subcommands
pub trait ExtraCommand {
    fn command(&self) -> Command;

    fn run(&self, matches: &ArgMatches) -> Result<()>;
}

/// The root command and the handlers behind its subcommands
pub struct CommandTree {
    root: Command,
    generic: bool,
    providers: HashMap<SubcommandKind, PluginRef>,
    alpha: Vec<(String, PluginRef)>,
    extras: Vec<(String, Box<dyn ExtraCommand>)>,
}

impl CommandTree {
    /// Builds the tree for the resolved plugins
    ///
    /// An empty `plugins` slice builds the generic help tree.
    pub fn build(
        command_name: &str,
        registry: &PluginRegistry,
        plugins: &[PluginRef],
        extras: Vec<Box<dyn ExtraCommand>>,
    ) -> Result<Self, BootstrapError> {
        let mut tree = Self {
            root: Command::new(command_name.to_string()),
            generic: plugins.is_empty(),
            providers: HashMap::new(),
            alpha: Vec::new(),
            extras: Vec::new(),
        };
        let mut root = root_command(command_name);

        let alpha = tree.alpha_command(plugins);
        if alpha.has_subcommands() {
            root = root.subcommand(alpha);
        }

        let create = tree.create_command(plugins);
        if create.has_subcommands() {
            root = root.subcommand(create);
        }

        root = root.subcommand(tree.init_command(registry, plugins));

        for extra in extras {
            let cmd = extra.command();
            let name = cmd.get_name().to_string();
            if root.get_subcommands().any(|c| c.get_name() == name) {
                return Err(BootstrapError::DuplicateCommand(name));
            }
            root = root.subcommand(cmd);
            tree.extras.push((name, extra));
        }

        tree.root = root;
        Ok(tree)
    }

    /// Returns the root command
    pub fn command(&self) -> &Command {
        &self.root
    }

    /// Returns the plugin wired to a subcommand
    pub fn provider(&self, kind: SubcommandKind) -> Option<&PluginRef> {
        self.providers.get(&kind)
    }

    /// Returns the names of the `alpha` subcommands
    pub fn alpha_names(&self) -> Vec<&str> {
        self.alpha.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Finds the first plugin providing `kind` and wires its handler
    fn wire(&mut self, plugins: &[PluginRef], kind: SubcommandKind, cmd: Command) -> Option<Command> {
        let plugin = plugins.iter().find(|p| p.subcommand(kind).is_some())?;
        let cmd = plugin.subcommand(kind)?.configure(cmd);
        self.providers.insert(kind, Arc::clone(plugin));
        Some(cmd)
    }

    fn init_command(&mut self, registry: &PluginRegistry, plugins: &[PluginRef]) -> Command {
        let cmd = Command::new("init").about("Initialize a new project");

        match self.wire(plugins, SubcommandKind::Init, cmd.clone()) {
            Some(cmd) => cmd,
            None => cmd.after_help(format!(
                "{}\n{}",
                plugin_table(registry),
                RUN_IN_PROJECT_ROOT_MSG
            )),
        }
    }

    fn create_command(&mut self, plugins: &[PluginRef]) -> Command {
        let mut create = Command::new("create")
            .about("Scaffold a Kubernetes API or webhook")
            .subcommand_required(true)
            .arg_required_else_help(true);

        let subcommands = [
            (SubcommandKind::CreateApi, "api", "Scaffold a Kubernetes API"),
            (
                SubcommandKind::CreateWebhook,
                "webhook",
                "Scaffold a webhook for an API resource",
            ),
        ];

        for (kind, name, about) in subcommands {
            let cmd = Command::new(name).about(about);
            if let Some(cmd) = self.wire(plugins, kind, cmd.clone()) {
                create = create.subcommand(cmd);
            } else if self.generic {
                create = create.subcommand(cmd.after_help(RUN_IN_PROJECT_ROOT_MSG));
            }
        }

        create
    }

    fn alpha_command(&mut self, plugins: &[PluginRef]) -> Command {
        let mut alpha = Command::new("alpha")
            .about("Experimental commands that may change or be removed")
            .subcommand_required(true)
            .arg_required_else_help(true);

        for plugin in plugins {
            for (name, sub) in plugin.alpha_subcommands() {
                // First plugin to claim a name keeps it
                if self.alpha.iter().any(|(existing, _)| existing == name) {
                    continue;
                }
                alpha = alpha.subcommand(sub.configure(Command::new(name.to_string())));
                self.alpha.push((name.to_string(), Arc::clone(plugin)));
            }
        }

        alpha
    }

    /// Parses `args` against the tree and runs the selected handler
    ///
    /// Parse errors and help requests are reported by clap, which exits.
    pub fn run<I, T, F>(mut self, args: I, context_for: F) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: Fn(&PluginRef) -> SubcommandContext,
    {
        let matches = self
            .root
            .try_get_matches_from_mut(args)
            .unwrap_or_else(|e| e.exit());

        let Some((name, sub_matches)) = matches.subcommand() else {
            self.root.print_help()?;
            return Ok(());
        };

        if let Some((_, extra)) = self.extras.iter().find(|(n, _)| n == name) {
            return extra.run(sub_matches);
        }

        let (label, kind, leaf) = match (name, sub_matches.subcommand()) {
            ("init", _) => ("init", SubcommandKind::Init, sub_matches),
            ("create", Some(("api", m))) => ("create api", SubcommandKind::CreateApi, m),
            ("create", Some(("webhook", m))) => {
                ("create webhook", SubcommandKind::CreateWebhook, m)
            }
            ("alpha", Some((alpha_name, m))) => return self.run_alpha(alpha_name, m, &context_for),
            _ => bail!("unknown command '{}'", name),
        };

        let Some(plugin) = self.providers.get(&kind) else {
            bail!("{}", self.unavailable(label));
        };
        let Some(sub) = plugin.subcommand(kind) else {
            bail!("{}", self.unavailable(label));
        };

        tracing::debug!(command = label, plugin = %plugin.key(), "running plugin subcommand");
        sub.run(&context_for(plugin), leaf)
    }

    fn run_alpha<F>(&self, name: &str, matches: &ArgMatches, context_for: &F) -> Result<()>
    where
        F: Fn(&PluginRef) -> SubcommandContext,
    {
        let label = format!("alpha {}", name);
        let Some((_, plugin)) = self.alpha.iter().find(|(n, _)| n == name) else {
            bail!("{}", self.unavailable(&label));
        };
        let Some(sub) = plugin
            .alpha_subcommands()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, sub)| sub)
        else {
            bail!("{}", self.unavailable(&label));
        };

        sub.run(&context_for(plugin), matches)
    }

    fn unavailable(&self, label: &str) -> String {
        if self.generic {
            format!("'{}' needs a resolved plugin. {}", label, RUN_IN_PROJECT_ROOT_MSG)
        } else {
            format!("no resolved plugin provides '{}'", label)
        }
    }
}

fn root_command(name: &str) -> Command {
    Command::new(name.to_string())
        .about("Scaffold projects from versioned plugin layouts")
        .arg(
            Arg::new(PROJECT_VERSION_FLAG)
                .long(PROJECT_VERSION_FLAG)
                .value_name("VERSION")
                .global(true)
                .help("Project version, ignored inside an existing project"),
        )
        .arg(
            Arg::new(PLUGINS_FLAG)
                .long(PLUGINS_FLAG)
                .value_name("KEY")
                .global(true)
                .help("Plugin key to scaffold with, e.g. go.scaffold.dev/v2"),
        )
        .long_about(format!(
            "Scaffold projects from versioned plugin layouts.

Every project records its project version in a PROJECT file. The version
decides which plugins can scaffold the project; projects from version 3
onwards also record the plugin that created them as their layout.

Typical project lifecycle:

- initialize a project:

  {name} init --domain example.com

- create one or more APIs and add your code to them:

  {name} create api --group <group> --version <version> --kind <Kind>"
        ))
        .after_help(format!(
            "Examples:
  # Initialize a project with the default plugin
  {name} init --domain example.com

  # Initialize a project with a specific plugin
  {name} init --project-version 3-alpha --plugins go.scaffold.dev/v3-alpha

  # Create a frigates API with Group: ship, Version: v1beta1 and Kind: Frigate
  {name} create api --group ship --version v1beta1 --kind Frigate"
        ))
}

/// Lists the plugins of every project version, marking defaults
fn plugin_table(registry: &PluginRegistry) -> String {
    let mut table = String::from("Available plugins by project version:\n");
    for version in registry.versions() {
        let default_key = registry.default_for(version).map(|d| d.key());
        let keys: Vec<String> = registry
            .plugins_for(version)
            .iter()
            .map(|p| {
                if default_key.as_ref() == Some(&p.key()) {
                    format!("{} (default)", p.key())
                } else {
                    p.key().to_string()
                }
            })
            .collect();
        table.push_str(&format!("  {:<10} {}\n", version.as_str(), keys.join(", ")));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::testing::{plugin, with_alpha};

    struct Named(&'static str);

    impl ExtraCommand for Named {
        fn command(&self) -> Command {
            Command::new(self.0)
        }

        fn run(&self, _matches: &ArgMatches) -> Result<()> {
            Ok(())
        }
    }

    fn registry(plugins: &[PluginRef]) -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_plugins(plugins.iter().cloned(), false).unwrap();
        registry
    }

    fn names(cmd: &Command) -> Vec<String> {
        cmd.get_subcommands().map(|c| c.get_name().to_string()).collect()
    }

    #[test]
    fn init_only_plugin_has_no_create_or_alpha() {
        let plugins = vec![plugin("go.example.io", "v2", &["2"])];
        let tree = CommandTree::build("scaffold", &registry(&plugins), &plugins, Vec::new()).unwrap();

        assert_eq!(names(tree.command()), vec!["init"]);
        assert!(tree.provider(SubcommandKind::Init).is_some());
        assert!(tree.provider(SubcommandKind::CreateApi).is_none());
    }

    #[test]
    fn alpha_group_when_a_plugin_contributes() {
        let plugins = vec![with_alpha("go.example.io", "v2", &["2"])];
        let tree = CommandTree::build("scaffold", &registry(&plugins), &plugins, Vec::new()).unwrap();

        assert_eq!(names(tree.command()), vec!["alpha", "init"]);
        assert_eq!(tree.alpha_names(), vec!["experiment"]);
    }

    #[test]
    fn generic_tree_has_placeholders() {
        let plugins = vec![plugin("go.example.io", "v2", &["2"])];
        let tree = CommandTree::build("scaffold", &registry(&plugins), &[], Vec::new()).unwrap();

        assert_eq!(names(tree.command()), vec!["create", "init"]);
        assert!(tree.provider(SubcommandKind::Init).is_none());

        let init = tree.command().find_subcommand("init").unwrap();
        let help = init.get_after_help().unwrap().to_string();
        assert!(help.contains("go.example.io/v2"));
        assert!(help.contains(RUN_IN_PROJECT_ROOT_MSG));
    }

    #[test]
    fn extra_commands_are_added() {
        let plugins = vec![plugin("go.example.io", "v2", &["2"])];
        let tree = CommandTree::build(
            "scaffold",
            &registry(&plugins),
            &plugins,
            vec![Box::new(Named("version"))],
        )
        .unwrap();

        assert_eq!(names(tree.command()), vec!["init", "version"]);
    }

    #[test]
    fn duplicate_extra_command_fails() {
        let plugins = vec![plugin("go.example.io", "v2", &["2"])];
        let err = CommandTree::build(
            "scaffold",
            &registry(&plugins),
            &plugins,
            vec![Box::new(Named("init"))],
        )
        .err()
        .unwrap();

        assert!(matches!(err, BootstrapError::DuplicateCommand(ref name) if name == "init"));
    }

    #[test]
    fn plugin_table_marks_defaults() {
        let go = plugin("go.example.io", "v2", &["2"]);
        let mut registry = registry(&[go.clone()]);
        registry.register_plugins([go], true).unwrap();

        let table = plugin_table(&registry);
        assert!(table.contains("go.example.io/v2 (default)"));
    }

    #[test]
    fn plugin_table_marks_separately_built_default() {
        let mut registry = registry(&[plugin("go.example.io", "v2", &["2"])]);
        registry
            .register_plugins([plugin("go.example.io", "v2", &["2"])], true)
            .unwrap();

        let table = plugin_table(&registry);
        assert_eq!(table.matches("go.example.io/v2").count(), 1);
        assert!(table.contains("go.example.io/v2 (default)"));
    }
}
