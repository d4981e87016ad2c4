//! # Plugin System
//!
//! Scaffolding behavior is bundled into plugins, each tied to one or more
//! project schema versions.
//!
//! ## Plugin Keys
//!
//! | Form | Example | Matches |
//! |------|---------|---------|
//! | Bare | `go.scaffold.dev` | every version of that name |
//! | Versioned | `go.scaffold.dev/v2` | exactly that plugin |
//!
//! ## Capabilities
//!
//! A plugin only has to name itself and its supported project versions.
//! Subcommands (`init`, `create api`, `create webhook`, `alpha ...`) and the
//! deprecation notice are optional capabilities, looked up through
//! [`Plugin::subcommand`], [`Plugin::alpha_subcommands`] and
//! [`Plugin::deprecated`].
//!
//! ## Built-in Plugins
//!
//! - `go.scaffold.dev/v2` - project versions `2` and `3-alpha` (default)
//! - `go.scaffold.dev/v3-alpha` - project version `3-alpha`
//!
//! ## Key Types
//!
//! - [`PluginRegistry`] - Per-version plugin sets and defaults
//! - [`Plugin`] - Trait implemented by every plugin
//! - [`GoPlugin`] - The built-in Go layouts

mod golang;
mod registry;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use golang::{GoPlugin, GO_PLUGIN_NAME};
pub use registry::{PluginRegistry, RegistryError};
pub use traits::{
    Deprecated, Plugin, PluginRef, Subcommand, SubcommandContext, SubcommandKind,
};
