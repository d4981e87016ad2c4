//! # Storage Layer
//!
//! Persistence of the project configuration.
//!
//! ## Storage Format
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Project config | YAML | `PROJECT` |
//!
//! ```text
//! PROJECT
//! ├── version     # project schema version ("2", "3-alpha")
//! ├── domain
//! ├── repo
//! ├── layout      # plugin key, only for schemas that support layouts
//! └── resources   # group/version/kind entries
//! ```
//!
//! ## Key Types
//!
//! - [`ProjectConfig`] - Parsed `PROJECT` file, loaded once per invocation
//! - [`Project`] - Handle used by plugins to read and update the config

mod config;
mod project;

pub use config::{ConfigError, ProjectConfig, Resource, Webhooks, CONFIG_FILE};
pub use project::{Project, ProjectError};
