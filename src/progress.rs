//! Progress log persistence
//!
//! One tab-separated line per solved exercise:
//! `<index>\t<user>\t'<title>'\t<timestamp>`. The file is only ever appended
//! to; the last line decides where a new session resumes.

use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{TutorialError, Result};

/// Timestamp layout written to the log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// A single completed exercise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub index: usize,
    pub user: String,
    pub title: String,
    /// Kept verbatim; only the index is needed to resume
    pub timestamp: String,
}

impl LogEntry {
    /// Entry stamped with the current local time
    pub fn now(index: usize, user: &str, title: &str) -> Self {
        Self::at(index, user, title, Local::now())
    }

    /// Entry stamped with a given time
    pub fn at(index: usize, user: &str, title: &str, time: DateTime<Local>) -> Self {
        Self {
            index,
            user: user.to_string(),
            title: title.to_string(),
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Render as a log line (without trailing newline)
    pub fn to_line(&self) -> String {
        format!("{}\t{}\t'{}'\t{}", self.index, self.user, self.title, self.timestamp)
    }

    /// Parse a log line; `line_no` is 1-based and only used for errors
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = line.split('\t').map(str::trim);

        let raw_index = fields.next().unwrap_or_default();
        let index = raw_index.parse::<usize>().map_err(|_| TutorialError::ProgressLogError {
            line: line_no,
            reason: format!("invalid exercise index '{}'", raw_index),
        })?;

        let user = fields.next().unwrap_or_default().to_string();
        let title = fields
            .next()
            .map(|t| t.trim_matches('\'').to_string())
            .unwrap_or_default();
        let timestamp = fields.next().unwrap_or_default().to_string();

        Ok(Self { index, user, title, timestamp })
    }
}

/// Append-only log of solved exercises
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// All entries in file order; a missing file has none
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        Ok(self.numbered_entries()?.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Entries with their 1-based line numbers
    fn numbered_entries(&self) -> Result<Vec<(usize, LogEntry)>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| LogEntry::parse(line, i + 1).map(|entry| (i + 1, entry)))
            .collect()
    }

    /// Index of the exercise after the last logged one, or 0
    pub fn resume_index(&self) -> Result<usize> {
        let resume = resume_after(self.numbered_entries()?.last())?;
        tracing::info!(log = %self.path.display(), resume, "computed resume index");
        Ok(resume)
    }

    /// Per-exercise state for a course of `total` exercises
    pub fn status(&self, total: usize) -> Result<StatusReport> {
        let numbered = self.numbered_entries()?;
        let next = resume_after(numbered.last())?.min(total);
        let solved: HashSet<usize> = numbered.iter().map(|(_, e)| e.index).collect();

        let states = (0..total)
            .map(|index| {
                if solved.contains(&index) {
                    ExerciseState::Solved
                } else if index == next {
                    ExerciseState::Next
                } else {
                    ExerciseState::Open
                }
            })
            .collect();

        Ok(StatusReport {
            states,
            next,
            last: numbered.into_iter().last().map(|(_, entry)| entry),
        })
    }

    /// Append one entry, creating the file and its directory on first use
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())?;

        tracing::info!(index = entry.index, title = %entry.title, "logged solved exercise");
        Ok(())
    }

    /// Remove the log; a missing file is fine
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn resume_after(last: Option<&(usize, LogEntry)>) -> Result<usize> {
    match last {
        None => Ok(0),
        Some((line, entry)) => entry.index.checked_add(1).ok_or_else(|| {
            TutorialError::ProgressLogError {
                line: *line,
                reason: format!("exercise index {} is out of range", entry.index),
            }
        }),
    }
}

/// Where one exercise stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseState {
    Solved,
    /// Where the next session starts
    Next,
    Open,
}

/// Summary of the log against the course, for `schnitzel status`
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// One state per exercise, in course order
    pub states: Vec<ExerciseState>,
    /// Resume index, capped at the number of exercises
    pub next: usize,
    pub last: Option<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quickcheck_macros::quickcheck;
    use tempfile::TempDir;

    fn create_test_log() -> (ProgressLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = ProgressLog::new(temp_dir.path().join("kurs").join(".schnitzel.log"));
        (log, temp_dir)
    }

    #[test]
    fn test_missing_log_resumes_at_zero() {
        let (log, _temp) = create_test_log();
        assert!(!log.exists());
        assert_eq!(log.resume_index().unwrap(), 0);
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_file_and_directory() {
        let (log, _temp) = create_test_log();
        log.append(&LogEntry::now(0, "alice", "Hilfe")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.starts_with("0\talice\t'Hilfe'\t"));
        assert!(contents.ends_with('\n'));
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_append_adds_exactly_one_line() {
        let (log, _temp) = create_test_log();
        log.append(&LogEntry::now(0, "alice", "Hilfe")).unwrap();
        log.append(&LogEntry::now(1, "alice", "Erstkontakt")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1\t"));
        assert!(lines[1].contains("Erstkontakt"));
        assert_eq!(log.resume_index().unwrap(), 2);
    }

    #[test]
    fn test_resume_uses_last_line_not_maximum() {
        let (log, _temp) = create_test_log();
        fs::create_dir_all(log.path().parent().unwrap()).unwrap();
        fs::write(log.path(), "7\talice\t'A'\tt\n2\talice\t'B'\tt\n").unwrap();
        assert_eq!(log.resume_index().unwrap(), 3);
    }

    #[test]
    fn test_parse_tolerates_padding() {
        let entry = LogEntry::parse("3\t alice\t'X'\t2024-01-01 10:00:00 +0100", 1).unwrap();
        assert_eq!(entry.index, 3);
        assert_eq!(entry.user, "alice");
        assert_eq!(entry.title, "X");
        assert_eq!(entry.timestamp, "2024-01-01 10:00:00 +0100");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let (log, _temp) = create_test_log();
        fs::create_dir_all(log.path().parent().unwrap()).unwrap();
        fs::write(log.path(), "0\tbob\t'A'\tt\n\n  \n").unwrap();
        assert_eq!(log.entries().unwrap().len(), 1);
        assert_eq!(log.resume_index().unwrap(), 1);
    }

    #[test]
    fn test_invalid_index_reports_line() {
        let (log, _temp) = create_test_log();
        fs::create_dir_all(log.path().parent().unwrap()).unwrap();
        fs::write(log.path(), "0\tbob\t'A'\tt\nfoo\tbob\t'B'\tt\n").unwrap();

        match log.resume_index() {
            Err(TutorialError::ProgressLogError { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected progress log error, got {:?}", other),
        }
    }

    #[test]
    fn test_timestamp_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let entry = LogEntry::at(4, "alice", "Wer bin ich?", time);
        assert!(entry.timestamp.starts_with("2024-03-05 14:07:09 "));
        assert_eq!(entry.to_line(), format!("4\talice\t'Wer bin ich?'\t{}", entry.timestamp));
    }

    #[test]
    fn test_clear() {
        let (log, _temp) = create_test_log();
        assert!(!log.clear().unwrap());
        log.append(&LogEntry::now(0, "alice", "Hilfe")).unwrap();
        assert!(log.clear().unwrap());
        assert!(!log.exists());
    }

    #[quickcheck]
    fn prop_resume_follows_last_entry(indices: Vec<u16>) -> bool {
        let (log, _temp) = create_test_log();
        for index in &indices {
            log.append(&LogEntry::now(*index as usize, "alice", "T")).unwrap();
        }
        let expected = indices.last().map_or(0, |k| *k as usize + 1);
        log.resume_index().unwrap() == expected
    }

    #[test]
    fn test_index_overflow_is_log_error() {
        let (log, _temp) = create_test_log();
        fs::create_dir_all(log.path().parent().unwrap()).unwrap();
        fs::write(log.path(), "0\talice\t'A'\tt\n\n18446744073709551615\talice\t'X'\tt\n").unwrap();

        match log.resume_index() {
            Err(TutorialError::ProgressLogError { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected progress log error, got {:?}", other),
        }
        assert!(log.status(23).is_err());
    }

    #[test]
    fn test_status_without_log() {
        let (log, _temp) = create_test_log();
        let report = log.status(3).unwrap();
        assert_eq!(report.next, 0);
        assert!(report.last.is_none());
        assert_eq!(
            report.states,
            vec![ExerciseState::Next, ExerciseState::Open, ExerciseState::Open]
        );
    }

    #[test]
    fn test_status_marks_solved_and_next() {
        let (log, _temp) = create_test_log();
        log.append(&LogEntry::now(0, "alice", "A")).unwrap();
        log.append(&LogEntry::now(1, "bob", "B")).unwrap();

        let report = log.status(4).unwrap();
        assert_eq!(report.next, 2);
        assert_eq!(report.last.unwrap().user, "bob");
        assert_eq!(
            report.states,
            vec![
                ExerciseState::Solved,
                ExerciseState::Solved,
                ExerciseState::Next,
                ExerciseState::Open,
            ]
        );
    }

    #[test]
    fn test_status_after_skipping_ahead() {
        let (log, _temp) = create_test_log();
        log.append(&LogEntry::now(0, "alice", "A")).unwrap();
        log.append(&LogEntry::now(5, "alice", "F")).unwrap();

        let report = log.status(3).unwrap();
        assert_eq!(report.next, 3);
        assert_eq!(
            report.states,
            vec![ExerciseState::Solved, ExerciseState::Open, ExerciseState::Open]
        );
    }
}
