//! Tolerant pre-scan of the command line
//!
//! Runs before the command tree exists, so it only looks for the few flags
//! that decide plugin resolution and skips everything else. Full argument
//! parsing happens later, against the tree built from the resolved plugins.
//!
//! `-h` is also recognized inside a cluster of short flags such as `-vh`. A
//! cluster is any single-dash argument made only of ASCII letters, so a short
//! option with an attached value containing `h` (`-nhello`) reads as help too.

use std::ffi::OsStr;

use crate::domain::ProjectVersion;

pub const PROJECT_VERSION_FLAG: &str = "project-version";
pub const PLUGINS_FLAG: &str = "plugins";
pub const HELP_FLAG: &str = "help";

/// Flags found by [`PreScan::scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreScan {
    /// `--project-version`, or the default when absent
    pub project_version: ProjectVersion,

    /// True if `--project-version` was given explicitly
    pub project_version_set: bool,

    /// Trimmed `--plugins` value, empty when absent
    pub cli_plugin_key: String,

    pub help: bool,

    /// True if the user should get help that does not depend on a plugin
    pub generic_help: bool,
}

impl PreScan {
    /// Scans `argv` (including the program name) for bootstrap flags
    ///
    /// Unknown flags and positionals are ignored. Scanning stops at `--`.
    pub fn scan<I, S>(argv: I, default_version: &ProjectVersion) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut args = argv
            .into_iter()
            .skip(1)
            .map(|a| a.as_ref().to_string_lossy().into_owned());

        let mut project_version = None;
        let mut plugins = String::new();
        let mut help = false;
        let mut malformed = false;

        while let Some(arg) = args.next() {
            if arg == "--" {
                break;
            }
            if is_short_help(&arg) {
                help = true;
                continue;
            }

            let Some(flag) = arg.strip_prefix("--") else {
                continue;
            };
            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (flag, None),
            };

            match name {
                HELP_FLAG => match inline.as_deref() {
                    None | Some("true") => help = true,
                    Some("false") => help = false,
                    Some(_) => malformed = true,
                },
                PROJECT_VERSION_FLAG | PLUGINS_FLAG => {
                    let Some(value) = inline.or_else(|| args.next()) else {
                        malformed = true;
                        continue;
                    };
                    if name == PROJECT_VERSION_FLAG {
                        project_version = Some(ProjectVersion::new(value));
                    } else {
                        plugins = value;
                    }
                }
                _ => {}
            }
        }

        let project_version_set = project_version.is_some();

        Self {
            project_version: project_version.unwrap_or_else(|| default_version.clone()),
            project_version_set,
            cli_plugin_key: plugins.trim().to_string(),
            help,
            generic_help: malformed || (help && !project_version_set),
        }
    }
}

/// `-h` alone or within a cluster of short flags
fn is_short_help(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(cluster) if !cluster.starts_with('-') && !cluster.is_empty() => {
            cluster.bytes().all(|b| b.is_ascii_alphabetic()) && cluster.contains('h')
        }
        _ => false,
    }
}
