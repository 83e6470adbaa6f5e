//! Interactive console on the controlling terminal

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::{Console, Display, InputHandler};
use super::{CORRECT_TEXT, ENTER_TEXT, FINISHED_TEXT, INTERRUPTED_TEXT, WRONG_TEXT};
use crate::errors::Result;
use crate::exercise::Prompt;

pub struct TerminalConsole {
    display: Display,
    input: InputHandler,
    show_spinner: bool,
}

impl TerminalConsole {
    pub fn new(progress_width: usize, show_spinner: bool) -> Result<Self> {
        Ok(Self {
            display: Display::new(progress_width),
            input: InputHandler::new()?,
            show_spinner,
        })
    }

    fn spinner(&self, duration: Duration) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Weiter in {}s ...", duration.as_secs().max(1)));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

#[async_trait(?Send)]
impl Console for TerminalConsole {
    fn show_progress(&mut self, done: usize, total: usize) -> Result<()> {
        self.display.clear_screen()?;
        self.display.show_progress(done, total);
        Ok(())
    }

    fn show_exercise(&mut self, title: &str, purpose: &str, task: &str) -> Result<()> {
        self.display.show_exercise(title, purpose, task);
        Ok(())
    }

    fn read_answer(&mut self, prompt: &Prompt) -> Result<Option<String>> {
        let text = match prompt {
            Prompt::Confirm => ENTER_TEXT,
            Prompt::Question(question) => question.as_str(),
        };
        let prompt = self.display.prompt(text);
        self.display.flush();
        self.input.read_line(&prompt)
    }

    fn show_verdict(&mut self, passed: bool) -> Result<()> {
        if passed {
            self.display.show_correct(CORRECT_TEXT);
        } else {
            self.display.show_wrong(WRONG_TEXT);
        }
        Ok(())
    }

    async fn pause(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        let spinner = self.show_spinner.then(|| self.spinner(duration));
        tokio::time::sleep(duration).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    }

    fn show_finished(&mut self, total: usize) -> Result<()> {
        self.display.clear_screen()?;
        self.display.show_finished(total, FINISHED_TEXT);
        Ok(())
    }

    fn show_interrupted(&mut self) -> Result<()> {
        println!();
        self.display.show_info(INTERRUPTED_TEXT);
        Ok(())
    }
}
