//! Built-in Go plugins
//!
//! These plugins do not render templates. They maintain the `PROJECT` file:
//! `init` records the project version, domain, repo and layout key, and the
//! `create` subcommands record API resources and their webhooks.

use anyhow::{bail, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};

use super::traits::{Plugin, Subcommand, SubcommandContext, SubcommandKind};
use crate::domain::{PluginVersion, ProjectVersion, Stage};
use crate::output;
use crate::storage::{Project, ProjectConfig, Resource};

/// Name shared by every built-in Go plugin
pub const GO_PLUGIN_NAME: &str = "go.scaffold.dev";

/// A Go project layout
pub struct GoPlugin {
    version: PluginVersion,
    project_versions: Vec<ProjectVersion>,
    init: InitSubcommand,
    create_api: CreateApiSubcommand,
    create_webhook: CreateWebhookSubcommand,
}

impl GoPlugin {
    fn new(version: PluginVersion, project_versions: &[&str]) -> Self {
        Self {
            version,
            project_versions: project_versions
                .iter()
                .copied()
                .map(ProjectVersion::new)
                .collect(),
            init: InitSubcommand,
            create_api: CreateApiSubcommand,
            create_webhook: CreateWebhookSubcommand,
        }
    }

    /// `go.scaffold.dev/v2`, for project versions 2 and 3-alpha
    pub fn v2() -> Self {
        Self::new(PluginVersion::new(2, Stage::Stable), &["2", "3-alpha"])
    }

    /// `go.scaffold.dev/v3-alpha`, for project version 3-alpha
    pub fn v3_alpha() -> Self {
        Self::new(PluginVersion::new(3, Stage::Alpha), &["3-alpha"])
    }
}

impl Plugin for GoPlugin {
    fn name(&self) -> &str {
        GO_PLUGIN_NAME
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
            SubcommandKind::CreateApi => Some(&self.create_api),
            SubcommandKind::CreateWebhook => Some(&self.create_webhook),
        }
    }
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Domain for API groups
    #[arg(long, default_value = "my.domain")]
    domain: String,

    /// Name of the Go module, e.g. github.com/user/repo
    #[arg(long, default_value = "")]
    repo: String,
}

struct InitSubcommand;

impl Subcommand for InitSubcommand {
    fn configure(&self, cmd: Command) -> Command {
        InitArgs::augment_args(cmd)
            .about("Initialize a new Go project")
            .after_help("Writes a PROJECT file recording the project version, domain and repo.")
    }

    fn run(&self, ctx: &SubcommandContext, matches: &ArgMatches) -> Result<()> {
        let args = InitArgs::from_arg_matches(matches)?;

        let mut config = ProjectConfig::new(ctx.project_version.clone());
        config.domain = args.domain;
        config.repo = args.repo;
        if ctx.project_version.supports_layout() {
            config.layout = ctx.plugin_key.to_string();
        }

        let project = Project::init(&ctx.project_dir, config)?;
        tracing::info!(root = %project.root().display(), "project initialized");

        output::success(&format!(
            "Initialized project version {} at {}",
            ctx.project_version,
            project.root().display()
        ));
        Ok(())
    }
}

#[derive(Debug, Args)]
struct ResourceArgs {
    /// Resource group
    #[arg(long)]
    group: String,

    /// Resource version, e.g. v1 or v1beta1
    #[arg(long = "version")]
    version: String,

    /// Resource kind, e.g. Frigate
    #[arg(long)]
    kind: String,
}

impl ResourceArgs {
    fn validate(&self) -> Result<()> {
        if self.group.is_empty()
            || !self
                .group
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            bail!("group '{}' must be lowercase alphanumeric", self.group);
        }
        if !self.version.starts_with('v') || self.version.len() < 2 {
            bail!("version '{}' must look like v1 or v1beta1", self.version);
        }
        if !self.kind.starts_with(|c: char| c.is_ascii_uppercase())
            || !self.kind.chars().all(|c| c.is_ascii_alphanumeric())
        {
            bail!("kind '{}' must be PascalCase", self.kind);
        }
        Ok(())
    }

    fn gvk(&self) -> String {
        format!("{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

struct CreateApiSubcommand;

impl Subcommand for CreateApiSubcommand {
    fn configure(&self, cmd: Command) -> Command {
        ResourceArgs::augment_args(cmd).about("Scaffold a Kubernetes API")
    }

    fn run(&self, ctx: &SubcommandContext, matches: &ArgMatches) -> Result<()> {
        let args = ResourceArgs::from_arg_matches(matches)?;
        args.validate()?;

        let mut project = Project::open(&ctx.project_dir)?;
        if project
            .config()
            .has_resource(&args.group, &args.version, &args.kind)
        {
            bail!("API {} already exists", args.gvk());
        }

        project
            .config_mut()
            .resources
            .push(Resource::new(&args.group, &args.version, &args.kind));
        project.save()?;

        output::success(&format!("Created API {}", args.gvk()));
        Ok(())
    }
}

#[derive(Debug, Args)]
struct WebhookArgs {
    #[command(flatten)]
    resource: ResourceArgs,

    /// Scaffold a defaulting webhook
    #[arg(long)]
    defaulting: bool,

    /// Scaffold a validating webhook
    #[arg(long)]
    programmatic_validation: bool,
}

struct CreateWebhookSubcommand;

impl Subcommand for CreateWebhookSubcommand {
    fn configure(&self, cmd: Command) -> Command {
        WebhookArgs::augment_args(cmd).about("Scaffold a webhook for an API resource")
    }

    fn run(&self, ctx: &SubcommandContext, matches: &ArgMatches) -> Result<()> {
        let args = WebhookArgs::from_arg_matches(matches)?;
        args.resource.validate()?;

        if !args.defaulting && !args.programmatic_validation {
            bail!("at least one of --defaulting or --programmatic-validation is required");
        }

        let mut project = Project::open(&ctx.project_dir)?;
        let gvk = args.resource.gvk();
        let resource = match project.config_mut().resource_mut(
            &args.resource.group,
            &args.resource.version,
            &args.resource.kind,
        ) {
            Some(resource) => resource,
            None => bail!("API {} not found, run 'create api' first", gvk),
        };

        resource.webhooks.defaulting |= args.defaulting;
        resource.webhooks.validation |= args.programmatic_validation;
        project.save()?;

        output::success(&format!("Created webhook for {}", gvk));
        Ok(())
    }
}
