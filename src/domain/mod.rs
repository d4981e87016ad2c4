//! Domain models for scaffold-cli
//!
//! Project schema versions and plugin identities, without any I/O concerns.

mod key;
mod version;

pub use key::{split_key, validate_name, KeyError, PluginKey, PluginVersion, Stage};
pub use version::{ProjectVersion, VersionError};
