//! Reusable setup actions and checks
//!
//! Exercises in the catalog are assembled from these variants into a
//! [`Plan`], which is the `Step` the runner sees.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::exercise::{ExerciseContext, Step};
use crate::platform;

/// Decoy file names used to fill directories
pub const DECOY_NAMES: [&str; 25] = [
    "Battlefield", "BioShock", "Borderlands", "Burnout", "Castlevania",
    "Crysis", "Deponia", "Doom", "Elite", "Fallout",
    "Halo", "Hitman", "Minecraft", "Payday", "Prey",
    "Quake", "Rayman", "Risen", "Splatoon", "Thief",
    "Uncharted", "Witcher", "Wolfenstein", "Yakuza", "Zork",
];

const DECOY_CONTENT: &str = "Gehen Sie weiter, hier gibt es nichts zu sehen.";

/// Preparation performed before an exercise is shown
///
/// Paths are relative to the course directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setup {
    /// Create the course directory
    ProjectDir,
    /// Write a file, replacing any previous content
    WriteFile { path: PathBuf, contents: String },
    /// Write a file only if it does not exist yet
    WriteFileIfMissing { path: PathBuf, contents: String },
    /// Create a directory with the given mode unless it exists
    CreateDir { path: PathBuf, mode: u32 },
    /// Fill a directory with the decoy files
    FillDecoys { path: PathBuf },
    /// Create files named `a` to `z` in a directory
    Alphabet { path: PathBuf, contents: String },
    /// Start a background `sleep`
    Sleeper { seconds: u64 },
}

impl Setup {
    pub async fn apply(&self, ctx: &ExerciseContext) -> Result<()> {
        let ws = &ctx.workspace;
        match self {
            Setup::ProjectDir => ws.ensure_project_dir()?,
            Setup::WriteFile { path, contents } => {
                ws.ensure_project_dir()?;
                fs::write(ws.path(path), contents)?;
            }
            Setup::WriteFileIfMissing { path, contents } => {
                let target = ws.path(path);
                if !target.exists() {
                    ws.ensure_project_dir()?;
                    fs::write(target, contents)?;
                }
            }
            Setup::CreateDir { path, mode } => create_dir(&ws.path(path), *mode)?,
            Setup::FillDecoys { path } => {
                let dir = ws.path(path);
                for name in DECOY_NAMES {
                    fs::write(dir.join(name), DECOY_CONTENT)?;
                }
            }
            Setup::Alphabet { path, contents } => {
                let dir = ws.path(path);
                for letter in 'a'..='z' {
                    fs::write(dir.join(letter.to_string()), contents)?;
                }
            }
            Setup::Sleeper { seconds } => platform::spawn_sleeper(*seconds).await?,
        }
        tracing::debug!(setup = ?self, "applied");
        Ok(())
    }
}

#[cfg(unix)]
fn create_dir(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    if !path.is_dir() {
        fs::DirBuilder::new().recursive(true).mode(mode).create(path)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn create_dir(path: &Path, _mode: u32) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Success condition of an exercise
///
/// Paths are relative to the course directory. A missing file or a failing
/// `stat` call counts as "not solved yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Typed answer equals one of the accepted strings
    Answer(Vec<String>),
    /// Typed answer parses to this number
    Number(i64),
    /// Typed answer is the acting user's name
    CurrentUser,
    /// Trimmed file content equals the text
    FileContent { path: PathBuf, expected: String },
    /// File lines (without line endings) equal exactly
    FileLines { path: PathBuf, expected: Vec<String> },
    /// Zero-based line of a file, trimmed, is one of the accepted values
    LineAt { path: PathBuf, line: usize, accepted: Vec<String> },
    Exists(PathBuf),
    Absent(PathBuf),
    IsDir(PathBuf),
    /// Both files exist with identical bytes
    SameContent(PathBuf, PathBuf),
    Owner { path: PathBuf, user: String },
    /// Octal permission bits are one of the accepted values
    Permissions { path: PathBuf, accepted: Vec<String> },
    FileSize { path: PathBuf, bytes: u64 },
    /// Recursive count of non-hidden entries below a directory
    EntryCount { path: PathBuf, count: usize },
    Symlink(PathBuf),
    LinkCount { path: PathBuf, count: u64 },
    /// No live process with this exact name
    NoProcess(String),
    All(Vec<Check>),
}

impl Check {
    pub fn answer(accepted: &str) -> Self {
        Check::Answer(vec![accepted.to_string()])
    }

    pub fn evaluate<'a>(
        &'a self,
        ctx: &'a ExerciseContext,
        input: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            let ws = &ctx.workspace;
            let passed = match self {
                Check::Answer(accepted) => accepted.iter().any(|a| a == input),
                Check::Number(expected) => input.parse::<i64>().map_or(false, |n| n == *expected),
                Check::CurrentUser => input == ws.user,
                Check::FileContent { path, expected } => {
                    read_if_exists(&ws.path(path))?.map_or(false, |c| c.trim() == expected.as_str())
                }
                Check::FileLines { path, expected } => read_if_exists(&ws.path(path))?
                    .map_or(false, |c| c.lines().eq(expected.iter().map(String::as_str))),
                Check::LineAt { path, line, accepted } => read_if_exists(&ws.path(path))?
                    .and_then(|c| c.lines().nth(*line).map(|l| l.trim().to_string()))
                    .map_or(false, |l| accepted.contains(&l)),
                Check::Exists(path) => ws.path(path).exists(),
                Check::Absent(path) => !ws.path(path).exists(),
                Check::IsDir(path) => ws.path(path).is_dir(),
                Check::SameContent(a, b) => {
                    match (read_bytes_if_exists(&ws.path(a))?, read_bytes_if_exists(&ws.path(b))?) {
                        (Some(a), Some(b)) => a == b,
                        _ => false,
                    }
                }
                Check::Owner { path, user } => {
                    let owner = ctx.inspector.owner(&ws.path(path)).await;
                    unsolved_on_command_failure(owner)?.map_or(false, |o| o == *user)
                }
                Check::Permissions { path, accepted } => {
                    let mode = ctx.inspector.permissions(&ws.path(path)).await;
                    unsolved_on_command_failure(mode)?.map_or(false, |m| accepted.contains(&m))
                }
                Check::FileSize { path, bytes } => {
                    fs::metadata(ws.path(path)).map_or(false, |m| m.is_file() && m.len() == *bytes)
                }
                Check::EntryCount { path, count } => {
                    let dir = ws.path(path);
                    dir.is_dir() && count_entries(&dir)? == *count
                }
                Check::Symlink(path) => {
                    let link = ws.path(path);
                    fs::symlink_metadata(&link).map_or(false, |m| m.file_type().is_symlink())
                        && link.exists()
                }
                Check::LinkCount { path, count } => {
                    let links = ctx.inspector.link_count(&ws.path(path)).await;
                    unsolved_on_command_failure(links)?.map_or(false, |n| n == *count)
                }
                Check::NoProcess(name) => platform::running_processes(name) == 0,
                Check::All(checks) => {
                    for check in checks {
                        if !check.evaluate(ctx, input).await? {
                            return Ok(false);
                        }
                    }
                    true
                }
            };
            Ok(passed)
        })
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

fn read_bytes_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read(path)?))
}

fn unsolved_on_command_failure<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_command_failure() => {
            tracing::debug!(error = %e, "inspection failed, treating as unsolved");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Counts files and directories below `dir`, skipping dot entries like a shell glob
fn count_entries(dir: &Path) -> Result<usize> {
    let mut count = 0;
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            count += 1;
            if entry.file_type()?.is_dir() {
                pending.push(entry.path());
            }
        }
    }

    Ok(count)
}

/// Setup, check and teardown of one catalog exercise
#[derive(Debug, Clone)]
pub struct Plan {
    pub setup: Vec<Setup>,
    pub check: Check,
    pub teardown: Vec<Setup>,
}

impl Plan {
    pub fn check(check: Check) -> Self {
        Self {
            setup: Vec::new(),
            check,
            teardown: Vec::new(),
        }
    }

    pub fn with_setup(mut self, setup: Setup) -> Self {
        self.setup.push(setup);
        self
    }

    /// Action run once the exercise is solved
    pub fn with_teardown(mut self, teardown: Setup) -> Self {
        self.teardown.push(teardown);
        self
    }
}

#[async_trait]
impl Step for Plan {
    async fn prepare(&self, ctx: &ExerciseContext) -> Result<()> {
        for setup in &self.setup {
            setup.apply(ctx).await?;
        }
        Ok(())
    }

    async fn verify(&self, ctx: &ExerciseContext, input: &str) -> Result<bool> {
        self.check.evaluate(ctx, input).await
    }

    async fn cleanup(&self, ctx: &ExerciseContext) -> Result<()> {
        for teardown in &self.teardown {
            teardown.apply(ctx).await?;
        }
        Ok(())
    }
}
