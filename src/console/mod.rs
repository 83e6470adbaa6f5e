//! Learner-facing terminal I/O
//!
//! The runner talks to a [`Console`]; `TerminalConsole` is the real one,
//! tests substitute a scripted implementation.

pub mod display;
pub mod input;
pub mod terminal;

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::Result;
use crate::exercise::Prompt;

pub use display::Display;
pub use input::InputHandler;
pub use terminal::TerminalConsole;

/// Shown for [`Prompt::Confirm`]
pub const ENTER_TEXT: &str = "Drücken Sie <ENTER>, um die Lösung zu überprüfen:";

/// Shown after a failed check
pub const WRONG_TEXT: &str = "Leider falsch. Probieren Sie es noch einmal.";

/// Shown after a passed check
pub const CORRECT_TEXT: &str = "Korrekt. Gut gemacht!";

/// Shown after the last exercise
pub const FINISHED_TEXT: &str = "Alle Aufgaben gelöst. Herzlichen Glückwunsch!";

/// Shown when the learner leaves mid-exercise
pub const INTERRUPTED_TEXT: &str = "Fortschritt gespeichert. Starten Sie das Programm erneut, um weiterzumachen.";

/// Everything the runner shows or asks
#[async_trait(?Send)]
pub trait Console {
    /// Fresh screen with the progress bar `done/total`
    fn show_progress(&mut self, done: usize, total: usize) -> Result<()>;

    /// Title, purpose and normalised task text
    fn show_exercise(&mut self, title: &str, purpose: &str, task: &str) -> Result<()>;

    /// Ask and read one line, trimmed. `None` once input has ended.
    fn read_answer(&mut self, prompt: &Prompt) -> Result<Option<String>>;

    /// Outcome of one check
    fn show_verdict(&mut self, passed: bool) -> Result<()>;

    /// Wait before moving on
    async fn pause(&mut self, duration: Duration);

    /// Final screen after the last exercise
    fn show_finished(&mut self, total: usize) -> Result<()>;

    /// Learner closed input before solving the current exercise
    fn show_interrupted(&mut self) -> Result<()>;
}
