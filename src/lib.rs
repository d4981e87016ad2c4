//! Scaffold CLI - Project scaffolding driven by versioned plugins
//!
//! Every project records a project version in its `PROJECT` file. Before any
//! subcommand runs, the CLI selects exactly one plugin compatible with that
//! version, from the `--plugins` flag, the project's layout key or the
//! version's default plugin, and builds the command tree from it.

pub mod domain;
pub mod storage;
pub mod plugin;
pub mod resolve;
pub mod cli;
pub mod output;

pub use domain::{PluginKey, PluginVersion, ProjectVersion};
pub use plugin::{Plugin, PluginRef, PluginRegistry};
pub use storage::ProjectConfig;
