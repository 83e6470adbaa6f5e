//! Command-line argument parsing for Schnitzel
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Schnitzel - an interactive scavenger hunt through the Linux shell
#[derive(Parser, Debug)]
#[command(name = "schnitzel")]
#[command(version)]
#[command(about = "Interactive scavenger hunt for learning the Linux shell", long_about = None)]
pub struct Args {
    /// Exercise index to start at (overrides the saved progress)
    #[arg(value_name = "START")]
    pub start: Option<usize>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory the course directory is created in (home by default)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (diagnostics limited to errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show which exercises are already solved
    Status,

    /// Run environment health checks
    Doctor,

    /// Forget saved progress
    Reset {
        /// Also remove the course directory with everything in it
        #[arg(long)]
        all: bool,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// A start index only makes sense for the tutorial itself
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.start.is_some() {
            return Err("Cannot specify a start index with a subcommand.".to_string());
        }

        Ok(())
    }
}

impl Verbosity {
    /// Default tracing filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if the post-exercise spinner should be drawn
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
