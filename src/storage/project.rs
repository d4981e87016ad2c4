//! Project management
//!
//! Handles project initialization and provides access to the configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::ProjectConfig;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project already initialized at {0}")]
    AlreadyExists(PathBuf),

    #[error("No PROJECT file in {0}. Run 'init' first.")]
    NotInProject(PathBuf),
}

/// A scaffolded project
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        let config = ProjectConfig::load(&root)?
            .ok_or_else(|| ProjectError::NotInProject(root.clone()))?;

        Ok(Self { root, config })
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>, config: ProjectConfig) -> Result<Self> {
        let root = root.into();

        if ProjectConfig::path(&root).exists() {
            return Err(ProjectError::AlreadyExists(root).into());
        }

        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create project directory: {}", root.display()))?;

        config.save(&root)?;

        Ok(Self { root, config })
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut ProjectConfig {
        &mut self.config
    }

    /// Writes the configuration back to disk
    pub fn save(&self) -> Result<()> {
        self.config.save(&self.root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectVersion;
    use crate::storage::CONFIG_FILE;
    use tempfile::TempDir;

    #[test]
    fn init_writes_config() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path(), ProjectConfig::new(ProjectVersion::new("2"))).unwrap();

        assert!(dir.path().join(CONFIG_FILE).is_file());
        assert_eq!(project.config().version.as_str(), "2");
    }

    #[test]
    fn init_twice_fails() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path(), ProjectConfig::new(ProjectVersion::new("2"))).unwrap();

        let err = Project::init(dir.path(), ProjectConfig::new(ProjectVersion::new("2")))
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<ProjectError>(),
            Some(ProjectError::AlreadyExists(_))
        ));
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path(), ProjectConfig::new(ProjectVersion::new("3-alpha"))).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
        assert_eq!(project.config().version.as_str(), "3-alpha");
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let err = Project::open(dir.path()).err().unwrap();

        assert!(matches!(
            err.downcast_ref::<ProjectError>(),
            Some(ProjectError::NotInProject(_))
        ));
    }

    #[test]
    fn save_persists_changes() {
        let dir = TempDir::new().unwrap();
        let mut project =
            Project::init(dir.path(), ProjectConfig::new(ProjectVersion::new("2"))).unwrap();
        project.config_mut().domain = "example.com".to_string();
        project.save().unwrap();

        let reopened = Project::open(dir.path()).unwrap();
        assert_eq!(reopened.config().domain, "example.com");
    }
}
