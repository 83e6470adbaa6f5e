//! Host inspection behind small capability traits
//!
//! File metadata is read through the system `stat` binary so that results
//! match what the learner sees in their own shell. Its flags differ between
//! GNU and BSD userlands; the dialect is picked once at startup.

use async_trait::async_trait;
use std::path::Path;
use sysinfo::{ProcessStatus, System};
use tokio::process::Command;

use crate::errors::{TutorialError, Result};

/// File metadata queries used by exercise checks
#[async_trait]
pub trait FileInspector: Send + Sync {
    /// Name of the owning user
    async fn owner(&self, path: &Path) -> Result<String>;

    /// Permission bits in octal, e.g. `755`
    async fn permissions(&self, path: &Path) -> Result<String>;

    /// Number of hard links
    async fn link_count(&self, path: &Path) -> Result<u64>;

    /// Short name for diagnostics
    fn name(&self) -> &'static str;
}

/// Operating system families with a known `stat` dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    MacOs,
}

impl HostOs {
    /// Detect the running host
    pub fn detect() -> Result<Self> {
        Self::from_name(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`
    pub fn from_name(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(HostOs::Linux),
            "macos" => Ok(HostOs::MacOs),
            other => Err(TutorialError::UnsupportedOs(other.to_string())),
        }
    }
}

/// `stat(1)` backed inspector
#[derive(Debug, Clone, Copy)]
pub struct StatInspector {
    os: HostOs,
}

impl StatInspector {
    pub fn new(os: HostOs) -> Self {
        Self { os }
    }

    /// Format flags for owner, permissions and link count
    fn format_args(&self, field: StatField) -> [&'static str; 2] {
        match (self.os, field) {
            (HostOs::Linux, StatField::Owner) => ["-c", "%U"],
            (HostOs::Linux, StatField::Permissions) => ["-c", "%a"],
            (HostOs::Linux, StatField::LinkCount) => ["-c", "%h"],
            (HostOs::MacOs, StatField::Owner) => ["-f", "%Su"],
            (HostOs::MacOs, StatField::Permissions) => ["-f", "%Lp"],
            (HostOs::MacOs, StatField::LinkCount) => ["-f", "%l"],
        }
    }

    async fn query(&self, field: StatField, path: &Path) -> Result<String> {
        let args = self.format_args(field);
        let output = Command::new("stat")
            .args(args)
            .arg(path)
            .output()
            .await?;

        if !output.status.success() {
            return Err(TutorialError::CommandFailed {
                command: format!("stat {} {} {}", args[0], args[1], path.display()),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(path = %path.display(), ?field, %value, "stat");
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum StatField {
    Owner,
    Permissions,
    LinkCount,
}

#[async_trait]
impl FileInspector for StatInspector {
    async fn owner(&self, path: &Path) -> Result<String> {
        self.query(StatField::Owner, path).await
    }

    async fn permissions(&self, path: &Path) -> Result<String> {
        self.query(StatField::Permissions, path).await
    }

    async fn link_count(&self, path: &Path) -> Result<u64> {
        let raw = self.query(StatField::LinkCount, path).await?;
        raw.parse::<u64>()
            .map_err(|_| TutorialError::Generic(format!("unexpected link count '{}'", raw)))
    }

    fn name(&self) -> &'static str {
        match self.os {
            HostOs::Linux => "stat (GNU)",
            HostOs::MacOs => "stat (BSD)",
        }
    }
}

/// Inspector for the running host, or `UnsupportedOs`
pub fn detect_inspector() -> Result<StatInspector> {
    let os = HostOs::detect()?;
    tracing::debug!(?os, "detected host");
    Ok(StatInspector::new(os))
}

/// Live processes whose executable name is exactly `name`
pub fn running_processes(name: &str) -> usize {
    let mut sys = System::new();
    sys.refresh_processes();

    sys.processes_by_exact_name(name)
        .filter(|p| !matches!(p.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
        .count()
}

/// Start a long sleeping process that outlives us
///
/// The `sh` wrapper backgrounds `sleep` and exits, so the sleeper is
/// re-parented and never left as our zombie.
pub async fn spawn_sleeper(seconds: u64) -> Result<()> {
    let script = format!("nohup sleep {} >/dev/null 2>&1 &", seconds);
    let status = Command::new("sh").arg("-c").arg(&script).status().await?;

    if !status.success() {
        return Err(TutorialError::CommandFailed {
            command: format!("sh -c '{}'", script),
            status: status.code().unwrap_or(-1),
            stderr: String::new(),
        });
    }

    tracing::info!(seconds, "spawned background sleeper");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_host_mapping() {
        assert_eq!(HostOs::from_name("linux").unwrap(), HostOs::Linux);
        assert_eq!(HostOs::from_name("macos").unwrap(), HostOs::MacOs);
        assert!(matches!(
            HostOs::from_name("windows"),
            Err(TutorialError::UnsupportedOs(os)) if os == "windows"
        ));
    }

    #[test]
    fn test_dialect_flags() {
        let gnu = StatInspector::new(HostOs::Linux);
        assert_eq!(gnu.format_args(StatField::Owner), ["-c", "%U"]);
        assert_eq!(gnu.format_args(StatField::LinkCount), ["-c", "%h"]);

        let bsd = StatInspector::new(HostOs::MacOs);
        assert_eq!(bsd.format_args(StatField::Permissions), ["-f", "%Lp"]);
        assert_eq!(bsd.name(), "stat (BSD)");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_stat_on_real_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).unwrap();
        std::fs::hard_link(&file, dir.path().join("b.txt")).unwrap();

        let inspector = detect_inspector().unwrap();
        assert_eq!(inspector.permissions(&file).await.unwrap(), "640");
        assert_eq!(inspector.link_count(&file).await.unwrap(), 2);
        assert!(!inspector.owner(&file).await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stat_missing_file_is_command_failure() {
        let dir = TempDir::new().unwrap();
        let inspector = detect_inspector().unwrap();
        let err = inspector.owner(&dir.path().join("nope")).await.unwrap_err();
        assert!(err.is_command_failure());
    }

    #[test]
    fn test_no_such_process() {
        assert_eq!(running_processes("schnitzel-no-such-process"), 0);
    }
}
