//! Schnitzel - an interactive scavenger hunt through the Linux shell
//!
//! The learner works through a fixed sequence of exercises in a course
//! directory. Each exercise prepares the filesystem, explains a task, and then
//! checks the result the learner produced in a second terminal.
//!
//! # Architecture
//!
//! - **exercise / exercises**: the `Step` lifecycle and the course catalog
//! - **runner**: walks the catalog, resumes from the progress log
//! - **platform**: host detection and file/process inspection
//! - **console**: terminal rendering and line input

pub mod errors;
pub mod cli;
pub mod workspace;
pub mod progress;
pub mod platform;
pub mod exercise;
pub mod exercises;
pub mod console;
pub mod runner;
pub mod doctor;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{Result, TutorialError};
pub use exercise::{Exercise, ExerciseContext, Prompt, Step};
pub use runner::{RunOutcome, Runner};
pub use workspace::Workspace;
