//! Line input using rustyline
//!
//! Gives the learner line editing and recall of earlier answers within a
//! session. Nothing is persisted.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::errors::{TutorialError, Result};

/// Input handler wrapping the readline editor
pub struct InputHandler {
    editor: DefaultEditor,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| TutorialError::InputError(format!("Cannot open terminal: {}", e)))?;

        Ok(InputHandler { editor })
    }

    /// Read a line of input
    ///
    /// Returns:
    /// - Ok(Some(input)) trimmed input, possibly empty
    /// - Ok(None) on EOF (Ctrl-D) or interrupt (Ctrl-C)
    /// - Err on terminal errors
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(Some(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => {
                tracing::debug!("input interrupted");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                tracing::debug!("input closed");
                Ok(None)
            }
            Err(err) => Err(TutorialError::InputError(format!("Readline error: {}", err))),
        }
    }
}
