//! Exercise runner
//!
//! Walks the exercise sequence from a start index. Per exercise:
//! prepare → show → (ask → verify)* → cleanup → log → pause.
//! A failed check repeats only the ask/verify part; the task text is shown
//! once per exercise.

use std::time::Duration;

use crate::console::Console;
use crate::errors::Result;
use crate::exercise::{Exercise, ExerciseContext, Prompt};
use crate::progress::{LogEntry, ProgressLog};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every exercise from the start index on was solved
    Completed,
    /// Input ended while exercise `index` was unsolved
    Interrupted { index: usize },
}

/// Drives exercises through their lifecycle
pub struct Runner<C: Console> {
    exercises: Vec<Exercise>,
    ctx: ExerciseContext,
    log: ProgressLog,
    console: C,
    pause: Duration,
}

impl<C: Console> Runner<C> {
    pub fn new(exercises: Vec<Exercise>, ctx: ExerciseContext, console: C) -> Self {
        let log = ProgressLog::new(&ctx.workspace.log_file);
        Self {
            exercises,
            ctx,
            log,
            console,
            pause: Duration::from_secs(2),
        }
    }

    /// Delay after each solved exercise
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn log(&self) -> &ProgressLog {
        &self.log
    }

    /// Where to start: the override if given, else one past the last logged entry
    pub fn resume_index(&self, start_override: Option<usize>) -> Result<usize> {
        match start_override {
            Some(index) => {
                tracing::info!(index, "start index given explicitly");
                Ok(index)
            }
            None => self.log.resume_index(),
        }
    }

    /// Run every exercise from `start` to the end
    pub async fn run(&mut self, start: usize) -> Result<RunOutcome> {
        let total = self.exercises.len();
        tracing::info!(start, total, "starting run");

        for index in start..total {
            self.console.show_progress(index, total)?;
            if !self.run_exercise(index).await? {
                self.console.show_interrupted()?;
                tracing::info!(index, "run interrupted");
                return Ok(RunOutcome::Interrupted { index });
            }

            let exercise = &self.exercises[index];
            self.log
                .append(&LogEntry::now(index, &self.ctx.workspace.user, &exercise.title))?;
            self.console.pause(self.pause).await;
        }

        self.console.show_finished(total)?;
        tracing::info!(total, "all exercises solved");
        Ok(RunOutcome::Completed)
    }

    /// One exercise until solved. `false` if input ended first.
    async fn run_exercise(&mut self, index: usize) -> Result<bool> {
        let exercise = &self.exercises[index];
        tracing::debug!(index, title = %exercise.title, "preparing exercise");

        exercise.step.prepare(&self.ctx).await?;
        self.console
            .show_exercise(&exercise.title, &exercise.purpose, &exercise.task_text())?;

        let mut attempts = 0u32;
        loop {
            let answer = match self.console.read_answer(&exercise.prompt)? {
                Some(answer) => answer,
                None => return Ok(false),
            };
            let input = match exercise.prompt {
                Prompt::Confirm => "",
                Prompt::Question(_) => answer.as_str(),
            };

            attempts += 1;
            let passed = exercise.step.verify(&self.ctx, input).await?;
            tracing::debug!(index, attempts, passed, "checked");
            self.console.show_verdict(passed)?;

            if passed {
                break;
            }
        }

        exercise.step.cleanup(&self.ctx).await?;
        Ok(true)
    }
}
