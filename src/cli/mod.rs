//! # Command-Line Interface
//!
//! Bootstraps the CLI and runs the selected command.
//!
//! ## Bootstrap
//!
//! [`CliBuilder`] collects the host configuration (command name, default
//! project version, plugin batches, extra commands). Building it pre-scans
//! the arguments, loads the `PROJECT` file, resolves the plugins and
//! assembles the command tree. [`Cli::run`] then parses the arguments for
//! real and dispatches.
//!
//! ## Command Tree
//!
//! | Command | Present when |
//! |---------|--------------|
//! | `init` | always |
//! | `create api`, `create webhook` | a resolved plugin provides them |
//! | `alpha <name>` | a resolved plugin contributes alpha subcommands |
//! | extra commands | added by the host, e.g. `version` |
//!
//! ## Logging
//!
//! Resolution decisions are logged with `tracing` at debug level:
//! ```bash
//! SCAFFOLD_LOG=debug scaffold init
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to bootstrap with the built-in plugins and execute.

mod app;
mod bootstrap;
mod prescan;
mod tree;
mod version_cmd;

pub use app::run;
pub use bootstrap::{BootstrapError, Cli, CliBuilder, DEFAULT_COMMAND_NAME, DEFAULT_PROJECT_VERSION};
pub use prescan::{PreScan, HELP_FLAG, PLUGINS_FLAG, PROJECT_VERSION_FLAG};
pub use tree::{CommandTree, ExtraCommand, RUN_IN_PROJECT_ROOT_MSG};
pub use version_cmd::VersionCommand;
