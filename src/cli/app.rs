//! Main CLI application structure

use std::sync::Arc;

use anyhow::Result;

use super::bootstrap::{Cli, DEFAULT_COMMAND_NAME};
use super::version_cmd::VersionCommand;
use crate::plugin::{GoPlugin, PluginRef};

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let v2: PluginRef = Arc::new(GoPlugin::v2());
    let v3_alpha: PluginRef = Arc::new(GoPlugin::v3_alpha());

    let cli = Cli::builder()
        .command_name(DEFAULT_COMMAND_NAME)
        .plugins([v2, v3_alpha])
        .default_plugins([Arc::new(GoPlugin::v2()) as PluginRef])
        .extra_command(VersionCommand::new(DEFAULT_COMMAND_NAME))
        .build()?;

    cli.run()
}
