//! Exercise model
//!
//! An exercise is static text plus a [`Step`]: the lifecycle the runner
//! drives without knowing anything about what a particular exercise checks.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::platform::FileInspector;
use crate::workspace::Workspace;

/// What to ask the learner after showing the task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Generic "press ENTER to check"; the typed line is discarded
    Confirm,
    /// A question whose trimmed answer is handed to the check
    Question(String),
}

/// Everything a step may look at or change
#[derive(Clone)]
pub struct ExerciseContext {
    pub workspace: Workspace,
    pub inspector: Arc<dyn FileInspector>,
}

impl ExerciseContext {
    pub fn new(workspace: Workspace, inspector: Arc<dyn FileInspector>) -> Self {
        Self { workspace, inspector }
    }
}

impl fmt::Debug for ExerciseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExerciseContext")
            .field("workspace", &self.workspace)
            .field("inspector", &self.inspector.name())
            .finish()
    }
}

/// Prepare / verify / cleanup lifecycle of one exercise
///
/// `verify` returns `Ok(false)` for "not solved yet"; an `Err` aborts the
/// whole tutorial.
#[async_trait]
pub trait Step: Send + Sync {
    /// Set up files or processes before the task is shown
    async fn prepare(&self, _ctx: &ExerciseContext) -> Result<()> {
        Ok(())
    }

    /// Check the learner's work. `input` is the trimmed answer, or empty
    /// for confirm prompts.
    async fn verify(&self, ctx: &ExerciseContext, input: &str) -> Result<bool>;

    /// Undo anything `prepare` left behind once the exercise is solved
    async fn cleanup(&self, _ctx: &ExerciseContext) -> Result<()> {
        Ok(())
    }
}

/// One instructional unit
pub struct Exercise {
    pub title: String,
    pub purpose: String,
    pub task: String,
    pub prompt: Prompt,
    /// Reference solution, shown nowhere during the run
    pub solution: String,
    pub step: Box<dyn Step>,
}

impl Exercise {
    pub fn new(
        title: impl Into<String>,
        purpose: impl Into<String>,
        task: impl Into<String>,
        prompt: Prompt,
        solution: impl Into<String>,
        step: impl Step + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            purpose: purpose.into(),
            task: task.into(),
            prompt,
            solution: solution.into(),
            step: Box::new(step),
        }
    }

    /// Task text with every line trimmed and surrounding blank lines removed
    pub fn task_text(&self) -> String {
        self.task
            .trim()
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exercise")
            .field("title", &self.title)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}
