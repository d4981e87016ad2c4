//! `version` command bundled with the binary

use anyhow::Result;
use clap::{ArgMatches, Command};

use super::tree::ExtraCommand;

/// Prints the binary version
pub struct VersionCommand {
    command_name: String,
}

impl VersionCommand {
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
        }
    }

    fn line(&self) -> String {
        format!("{} version {}", self.command_name, env!("CARGO_PKG_VERSION"))
    }
}

impl ExtraCommand for VersionCommand {
    fn command(&self) -> Command {
        Command::new("version").about(format!("Print the {} version", self.command_name))
    }

    fn run(&self, _matches: &ArgMatches) -> Result<()> {
        println!("{}", self.line());
        Ok(())
    }
}
