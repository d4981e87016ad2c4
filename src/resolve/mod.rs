//! # Plugin Resolution
//!
//! Turns the invocation (requested project version, `--plugins` key, loaded
//! `PROJECT` file) and the [`PluginRegistry`](crate::plugin::PluginRegistry)
//! into exactly one plugin list.
//!
//! ```text
//! ResolutionContext ──► validate ──► resolve ──► ResolvedPlugins
//!                          │            │
//!                  ValidationError  ResolveError
//! ```
//!
//! Both steps are pure: the same context and registry always give the same
//! result.

mod context;
mod engine;
mod matcher;
mod validate;

pub use context::ResolutionContext;
pub use engine::resolve;
pub use matcher::{resolve_by_key, ResolveError, ResolvedPlugins};
pub use validate::{validate, ValidationError};
