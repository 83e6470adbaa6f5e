//! Doctor command for environment diagnostics
//!
//! Checks that the host can run the course before the learner gets stuck
//! halfway through it.

use colored::*;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, System};

use crate::platform::{self, FileInspector, HostOs, StatInspector};
use crate::progress::ProgressLog;
use crate::workspace::Workspace;

/// Commands the exercises ask the learner to use
const REQUIRED_TOOLS: [&str; 9] = ["man", "ls", "tar", "find", "grep", "diff", "sort", "sed", "ln"];

/// Needed only for the download exercise; any one of them will do
const DOWNLOAD_TOOLS: [&str; 2] = ["wget", "curl"];

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    workspace: Workspace,
    search_path: Vec<PathBuf>,
}

impl Doctor {
    pub fn new(workspace: Workspace) -> Self {
        let search_path = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        Self {
            workspace,
            search_path,
        }
    }

    /// Use a specific executable search path instead of `$PATH`
    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = Vec::new();

        let host = HostOs::detect();
        checks.push(match &host {
            Ok(os) => {
                tracing::debug!(?os, "host detected");
                HealthCheck::new("Host OS", HealthStatus::Pass)
            }
            Err(e) => HealthCheck::new("Host OS", HealthStatus::Fail(e.to_string())),
        });
        if let Ok(os) = host {
            checks.push(self.check_stat(StatInspector::new(os)).await);
        }
        checks.push(self.check_directory());
        checks.push(self.check_progress_log());
        checks.push(self.check_tools());
        checks.push(self.check_download_tool());
        checks.push(self.check_processes());
        checks.push(self.check_disk_space());

        checks
    }

    /// `stat` answers for the base directory
    async fn check_stat(&self, inspector: StatInspector) -> HealthCheck {
        match inspector.owner(&self.workspace.base_path).await {
            Ok(_) => HealthCheck::new("stat", HealthStatus::Pass),
            Err(e) => HealthCheck::new("stat", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Course directory exists or can be created, and is writable
    fn check_directory(&self) -> HealthCheck {
        let dir = self.workspace.project_dir();
        let probe_dir = if dir.is_dir() {
            dir.clone()
        } else if self.workspace.base_path.is_dir() {
            self.workspace.base_path.clone()
        } else {
            return HealthCheck::new(
                "Course directory",
                HealthStatus::Fail(format!("{} does not exist", self.workspace.base_path.display())),
            );
        };

        let probe = probe_dir.join(".schnitzel_doctor");
        match std::fs::write(&probe, "probe") {
            Ok(()) => {
                let _ = std::fs::remove_file(&probe);
                if dir.is_dir() {
                    HealthCheck::new("Course directory", HealthStatus::Pass)
                } else {
                    HealthCheck::new(
                        "Course directory",
                        HealthStatus::Warn(format!("{} will be created", dir.display())),
                    )
                }
            }
            Err(_) => HealthCheck::new(
                "Course directory",
                HealthStatus::Fail(format!("No write permission in {}", probe_dir.display())),
            ),
        }
    }

    fn check_progress_log(&self) -> HealthCheck {
        let log = ProgressLog::new(&self.workspace.log_file);
        match log.entries() {
            Ok(_) => HealthCheck::new("Progress log", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Progress log", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_tools(&self) -> HealthCheck {
        let missing: Vec<&str> = REQUIRED_TOOLS
            .iter()
            .copied()
            .filter(|tool| self.find_executable(tool).is_none())
            .collect();

        if missing.is_empty() {
            HealthCheck::new("Shell tools", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "Shell tools",
                HealthStatus::Warn(format!("Not found in PATH: {}", missing.join(", "))),
            )
        }
    }

    fn check_download_tool(&self) -> HealthCheck {
        if DOWNLOAD_TOOLS.iter().any(|tool| self.find_executable(tool).is_some()) {
            HealthCheck::new("Download tool", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "Download tool",
                HealthStatus::Warn("Neither wget nor curl found".to_string()),
            )
        }
    }

    /// The process exercise needs a readable process table
    fn check_processes(&self) -> HealthCheck {
        let mut sys = System::new();
        sys.refresh_processes();

        if sys.processes().is_empty() {
            HealthCheck::new(
                "Process table",
                HealthStatus::Warn("Cannot list running processes".to_string()),
            )
        } else {
            let sleepers = platform::running_processes("sleep");
            if sleepers > 0 {
                tracing::info!(sleepers, "sleep processes already running");
            }
            HealthCheck::new("Process table", HealthStatus::Pass)
        }
    }

    /// The unpacked archive needs some room
    fn check_disk_space(&self) -> HealthCheck {
        let disks = Disks::new_with_refreshed_list();
        let base = &self.workspace.base_path;

        let disk = disks
            .iter()
            .filter(|d| base.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len());

        match disk {
            Some(disk) => {
                let available_mb = disk.available_space() / (1024 * 1024);
                if available_mb < 100 {
                    HealthCheck::new(
                        "Disk space",
                        HealthStatus::Fail(format!("Only {} MB available", available_mb)),
                    )
                } else if available_mb < 500 {
                    HealthCheck::new(
                        "Disk space",
                        HealthStatus::Warn(format!("Low disk space ({} MB available)", available_mb)),
                    )
                } else {
                    HealthCheck::new("Disk space", HealthStatus::Pass)
                }
            }
            None => HealthCheck::new(
                "Disk space",
                HealthStatus::Warn("Could not determine disk space".to_string()),
            ),
        }
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.search_path
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "Schnitzel System Diagnostics".bold());
        println!("{:<20} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red(),
            };
            println!("{:<20} {}", check.name, status);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doctor_in(dir: &TempDir) -> Doctor {
        Doctor::new(Workspace::new(dir.path(), "kurs", "alice"))
    }

    #[test]
    fn test_health_status_equality() {
        assert_eq!(HealthStatus::Pass, HealthStatus::Pass);
        assert_eq!(
            HealthStatus::Warn("test".to_string()),
            HealthStatus::Warn("test".to_string())
        );
        assert_ne!(HealthStatus::Pass, HealthStatus::Fail("x".to_string()));
    }

    #[test]
    fn test_overall_status() {
        let checks = vec![
            HealthCheck::new("Test 1", HealthStatus::Pass),
            HealthCheck::new("Test 2", HealthStatus::Warn("warning".to_string())),
        ];
        assert!(Doctor::overall_status(&checks));

        let checks = vec![
            HealthCheck::new("Test 1", HealthStatus::Pass),
            HealthCheck::new("Test 2", HealthStatus::Fail("error".to_string())),
        ];
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_directory_not_created_yet() {
        let dir = TempDir::new().unwrap();
        let check = doctor_in(&dir).check_directory();
        assert!(matches!(check.status, HealthStatus::Warn(_)));
    }

    #[test]
    fn test_directory_present() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("kurs")).unwrap();
        let check = doctor_in(&dir).check_directory();
        assert_eq!(check.status, HealthStatus::Pass);
    }

    #[test]
    fn test_corrupt_progress_log_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("kurs")).unwrap();
        std::fs::write(dir.path().join("kurs").join(".schnitzel.log"), "x\ty\n").unwrap();
        let check = doctor_in(&dir).check_progress_log();
        assert!(matches!(check.status, HealthStatus::Fail(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_tools_missing_from_empty_path() {
        let dir = TempDir::new().unwrap();
        let doctor = doctor_in(&dir).with_search_path(vec![dir.path().to_path_buf()]);
        match doctor.check_tools().status {
            HealthStatus::Warn(msg) => assert!(msg.contains("tar")),
            other => panic!("expected warning, got {:?}", other),
        }
        assert!(matches!(doctor.check_download_tool().status, HealthStatus::Warn(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_found_when_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let wget = dir.path().join("wget");
        std::fs::write(&wget, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&wget, std::fs::Permissions::from_mode(0o755)).unwrap();

        let doctor = doctor_in(&dir).with_search_path(vec![dir.path().to_path_buf()]);
        assert_eq!(doctor.check_download_tool().status, HealthStatus::Pass);
    }
}
