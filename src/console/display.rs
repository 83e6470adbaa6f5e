//! Formatted terminal output
//!
//! Rendering is split from printing so the layout can be tested without a
//! terminal.

use colored::*;
use crossterm::{
    cursor,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

use crate::errors::Result;

/// Filled and empty cells of the progress bar
const BAR_FILLED: char = '\u{2588}';
const BAR_EMPTY: char = '\u{2591}';

/// Progress bar like `███░░░ 2/6`
///
/// An empty sequence counts as complete.
pub fn progress_bar(max: usize, actual: usize, width: usize) -> String {
    let filled = if max == 0 {
        width
    } else {
        (width * actual.min(max)) / max
    };

    let mut bar = String::with_capacity(width * 3 + 12);
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    bar.push_str(&format!(" {}/{}", actual, max));
    bar
}

/// Terminal writer for the tutorial screens
pub struct Display {
    width: usize,
}

impl Display {
    pub fn new(width: usize) -> Self {
        Display { width }
    }

    /// Globally switch ANSI colours on or off
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    pub fn clear_screen(&self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(())
    }

    pub fn show_progress(&self, done: usize, total: usize) {
        println!("{}\n", progress_bar(total, done, self.width));
    }

    pub fn show_exercise(&self, title: &str, purpose: &str, task: &str) {
        println!("{}\n", title.red());
        println!("{}\n", purpose.yellow().bold());
        println!("{}\n", task);
    }

    /// Prompt text as handed to the line editor
    pub fn prompt(&self, text: &str) -> String {
        format!("{} ", text.bold())
    }

    pub fn show_wrong(&self, message: &str) {
        println!("\n{}\n", message.red());
    }

    pub fn show_correct(&self, message: &str) {
        println!("\n{}\n", message.green());
    }

    pub fn show_finished(&self, total: usize, message: &str) {
        println!("{}", progress_bar(total, total, self.width));
        println!("\n\n{}", message.green());
    }

    pub fn show_info(&self, message: &str) {
        println!("{}", message.dimmed());
    }

    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_partial() {
        let bar = progress_bar(4, 1, 8);
        assert_eq!(bar, "██░░░░░░ 1/4");
    }

    #[test]
    fn test_progress_bar_empty_and_full() {
        assert_eq!(progress_bar(3, 0, 3), "░░░ 0/3");
        assert_eq!(progress_bar(3, 3, 3), "███ 3/3");
    }

    #[test]
    fn test_progress_bar_rounds_down() {
        let bar = progress_bar(23, 22, 70);
        let filled = bar.chars().filter(|c| *c == BAR_FILLED).count();
        let empty = bar.chars().filter(|c| *c == BAR_EMPTY).count();
        assert_eq!(filled, 66);
        assert_eq!(filled + empty, 70);
        assert!(bar.ends_with(" 22/23"));
    }

    #[test]
    fn test_progress_bar_clamps_overshoot() {
        let bar = progress_bar(2, 5, 4);
        assert!(bar.starts_with("████ "));
    }

    #[test]
    fn test_progress_bar_no_exercises() {
        assert_eq!(progress_bar(0, 0, 2), "██ 0/0");
    }
}
