//! Configuration management for Schnitzel
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.schnitzel/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::{TutorialError, Result};

/// Complete configuration for Schnitzel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub user: UserConfig,
}

/// Where the learner's files live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub base_dir: String,
    pub project_dir: String,
    /// Relative to the project directory unless absolute
    pub log_file: String,
}

/// Runner pacing and layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub pause_ms: u64,
    pub progress_width: usize,
}

/// Terminal display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
}

/// Acting user, taken from the environment when unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: "~".to_string(),
            project_dir: "linux-kurs".to_string(),
            log_file: ".schnitzel.log".to_string(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pause_ms: 2000,
            progress_width: 70,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color_output: true }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutorialError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| TutorialError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".schnitzel").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.paths.project_dir.trim().is_empty() {
            return Err(TutorialError::ConfigError(
                "project_dir must not be empty".to_string()
            ));
        }

        if Path::new(&self.paths.project_dir).is_absolute() {
            return Err(TutorialError::ConfigError(
                "project_dir must be relative to base_dir".to_string()
            ));
        }

        if self.paths.log_file.trim().is_empty() {
            return Err(TutorialError::ConfigError(
                "log_file must not be empty".to_string()
            ));
        }

        if !(10..=200).contains(&self.runner.progress_width) {
            return Err(TutorialError::ConfigError(
                format!("progress_width must be between 10 and 200, got {}", self.runner.progress_width)
            ));
        }

        if let Some(name) = &self.user.name {
            if name.trim().is_empty() {
                return Err(TutorialError::ConfigError(
                    "user.name must not be empty when set".to_string()
                ));
            }
        }

        Ok(())
    }

    /// Render as TOML for `schnitzel config`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TutorialError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if path == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Base directory path
    pub fn base_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.base_dir)
    }

    /// Delay after a solved exercise
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.runner.pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.project_dir, "linux-kurs");
        assert_eq!(config.paths.log_file, ".schnitzel.log");
        assert_eq!(config.runner.pause_ms, 2000);
        assert_eq!(config.runner.progress_width, 70);
        assert!(config.user.name.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_project() {
        let mut config = Config::default();
        config.paths.project_dir = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_absolute_project() {
        let mut config = Config::default();
        config.paths.project_dir = "/tmp/kurs".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_width() {
        let mut config = Config::default();
        config.runner.progress_width = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runner]\npause_ms = 0\nprogress_width = 40\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.runner.pause_ms, 0);
        assert_eq!(config.runner.progress_width, 40);
        assert_eq!(config.paths.project_dir, "linux-kurs");
        assert!(config.display.color_output);
    }

    #[test]
    fn test_single_key_section_fills_remaining_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runner]\npause_ms = 0\n\n[paths]\nproject_dir = \"kurs\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.runner.pause_ms, 0);
        assert_eq!(config.runner.progress_width, 70);
        assert_eq!(config.paths.project_dir, "kurs");
        assert_eq!(config.paths.base_dir, "~");
        assert_eq!(config.paths.log_file, ".schnitzel.log");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[paths\nbase_dir = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, TutorialError::ConfigError(_)));
    }

    #[test]
    fn test_to_toml_contains_sections() {
        let mut config = Config::default();
        config.user.name = Some("alice".to_string());
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[paths]"));
        assert!(rendered.contains("linux-kurs"));
        assert!(rendered.contains("alice"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.schnitzel");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        let expanded = Config::expand_path(path);
        assert_eq!(expanded.to_string_lossy(), path);
    }
}
