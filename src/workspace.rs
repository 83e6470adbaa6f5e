//! Paths and identity the tutorial operates on
//!
//! Everything that used to be read from the process environment on demand
//! (home directory, current user) is resolved once here and handed to the
//! runner and the checks.

use crate::cli::Config;
use crate::errors::{TutorialError, Result};
use crate::progress::ProgressLog;
use std::fs;
use std::path::{Path, PathBuf};

/// Explicit configuration for one tutorial session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Directory the course directory lives in
    pub base_path: PathBuf,
    /// Course directory, relative to `base_path`
    pub project_subpath: PathBuf,
    /// Progress log location
    pub log_file: PathBuf,
    /// Acting user identifier
    pub user: String,
}

impl Workspace {
    /// Create a workspace with the log at its default place inside the project
    pub fn new(base_path: impl Into<PathBuf>, project_subpath: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        let base_path = base_path.into();
        let project_subpath = project_subpath.into();
        let log_file = base_path.join(&project_subpath).join(".schnitzel.log");
        Self {
            base_path,
            project_subpath,
            log_file,
            user: user.into(),
        }
    }

    /// Use a different progress log path
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Resolve the workspace from configuration and the startup environment
    pub fn from_config(config: &Config, base_override: Option<&Path>) -> Result<Self> {
        let base_path = match base_override {
            Some(path) => path.to_path_buf(),
            None => config.base_dir(),
        };

        let user = match &config.user.name {
            Some(name) => name.clone(),
            None => current_user()?,
        };

        let workspace = Self::new(base_path, &config.paths.project_dir, user);
        let log_file = Path::new(&config.paths.log_file);
        let log_file = if log_file.is_absolute() {
            log_file.to_path_buf()
        } else {
            workspace.project_dir().join(log_file)
        };

        Ok(workspace.with_log_file(log_file))
    }

    /// Full path of the course directory
    pub fn project_dir(&self) -> PathBuf {
        self.base_path.join(&self.project_subpath)
    }

    /// Path of an entry inside the course directory
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir().join(relative)
    }

    /// Course directory name as shown to the learner
    pub fn project_name(&self) -> String {
        self.project_subpath.display().to_string()
    }

    /// Create the course directory if it is missing
    pub fn ensure_project_dir(&self) -> Result<()> {
        let dir = self.project_dir();
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
            tracing::info!(path = %dir.display(), "created course directory");
        }
        Ok(())
    }

    /// Forget saved progress; with `all` also delete the course directory
    pub async fn reset(&self, all: bool) -> Result<ResetOutcome> {
        let log_removed = ProgressLog::new(&self.log_file).clear()?;

        let dir = self.project_dir();
        let dir_removed = all && dir.exists();
        if dir_removed {
            tokio::fs::remove_dir_all(&dir).await?;
        }

        tracing::info!(log_removed, dir_removed, "reset course");
        Ok(ResetOutcome { log_removed, dir_removed })
    }
}

/// What `Workspace::reset` removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    pub log_removed: bool,
    pub dir_removed: bool,
}

/// Login name from the environment, as the shell reports it
fn current_user() -> Result<String> {
    ["USER", "LOGNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| TutorialError::ConfigError(
            "Cannot determine the current user; set USER or user.name in the config".to_string()
        ))
}
