//! Schnitzel - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::sync::Arc;

use schnitzel::{
    cli::{Args, Commands, Config},
    console::{display::progress_bar, Display, TerminalConsole},
    doctor::Doctor,
    exercises::catalog,
    platform::{self, StatInspector},
    progress::{ExerciseState, ProgressLog},
    telemetry, ExerciseContext, RunOutcome, Runner, TutorialError, Workspace,
};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        std::process::exit(2);
    }

    telemetry::init_tracing(args.verbosity());

    let code = match run(&args, platform::detect_inspector()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            2
        }
    };

    std::process::exit(code);
}

/// Dispatch to the subcommand or the tutorial itself; returns the exit code
async fn run(args: &Args, host: schnitzel::Result<StatInspector>) -> Result<i32> {
    // host support is settled before anything else can fail
    let inspector = match &args.command {
        None => match host {
            Ok(inspector) => Some(inspector),
            Err(TutorialError::UnsupportedOs(os)) => {
                tracing::warn!(%os, "unsupported host");
                println!("Unknown operating system. Exiting...");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        },
        Some(_) => None,
    };

    let config = Config::load(args.config.as_deref()).context("loading configuration")?;
    Display::set_color(config.display.color_output);

    if let Some(Commands::Config) = &args.command {
        show_config(&config)?;
        return Ok(0);
    }

    let workspace = Workspace::from_config(&config, args.base_dir.as_deref())?;
    tracing::debug!(project = %workspace.project_dir().display(), user = %workspace.user, "workspace resolved");

    match (&args.command, inspector) {
        (Some(Commands::Status), _) => show_status(&config, &workspace).map(|_| 0),
        (Some(Commands::Doctor), _) => Ok(run_doctor(workspace).await),
        (Some(Commands::Reset { all }), _) => reset(&workspace, *all).await.map(|_| 0),
        (None, Some(inspector)) => run_tutorial(args, &config, workspace, inspector).await,
        _ => Ok(0),
    }
}

async fn run_tutorial(
    args: &Args,
    config: &Config,
    workspace: Workspace,
    inspector: StatInspector,
) -> Result<i32> {
    let exercises = catalog(&workspace.project_name());
    let ctx = ExerciseContext::new(workspace, Arc::new(inspector));

    let show_spinner = args.verbosity().show_progress() && std::io::stdout().is_terminal();
    let console = TerminalConsole::new(config.runner.progress_width, show_spinner)?;

    let mut runner = Runner::new(exercises, ctx, console).with_pause(config.pause());
    let start = runner.resume_index(args.start)?;

    match runner.run(start).await? {
        RunOutcome::Completed => tracing::info!("course completed"),
        RunOutcome::Interrupted { index } => tracing::info!(index, "stopped by learner"),
    }

    Ok(0)
}

fn show_status(config: &Config, workspace: &Workspace) -> Result<()> {
    let exercises = catalog(&workspace.project_name());
    let report = ProgressLog::new(&workspace.log_file).status(exercises.len())?;

    println!("{}", progress_bar(exercises.len(), report.next, config.runner.progress_width));
    println!();

    for ((index, exercise), state) in exercises.iter().enumerate().zip(&report.states) {
        let marker = match state {
            ExerciseState::Solved => "✓".green().to_string(),
            ExerciseState::Next => "→".yellow().to_string(),
            ExerciseState::Open => " ".to_string(),
        };
        println!(" {} {:>2}  {}", marker, index, exercise.title);
    }

    if let Some(last) = &report.last {
        println!("\nZuletzt gelöst von {} am {}", last.user, last.timestamp);
    }

    Ok(())
}

async fn run_doctor(workspace: Workspace) -> i32 {
    let doctor = Doctor::new(workspace);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    if Doctor::overall_status(&checks) {
        0
    } else {
        1
    }
}

async fn reset(workspace: &Workspace, all: bool) -> Result<()> {
    let outcome = workspace
        .reset(all)
        .await
        .with_context(|| format!("resetting {}", workspace.project_dir().display()))?;

    if outcome.log_removed {
        println!("Removed progress log {}", workspace.log_file.display());
    } else {
        println!("No progress log found");
    }
    if outcome.dir_removed {
        println!("Removed course directory {}", workspace.project_dir().display());
    }

    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    if let Some(path) = Config::default_path() {
        println!("# default location: {}", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_host_exits_before_config_is_read() {
        let args = Args::try_parse_from(["schnitzel", "-c", "/nonexistent/schnitzel.toml"]).unwrap();
        let host = Err(TutorialError::UnsupportedOs("plan9".to_string()));

        assert_eq!(run(&args, host).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_config_is_fatal_on_supported_host() {
        let args = Args::try_parse_from(["schnitzel", "-c", "/nonexistent/schnitzel.toml"]).unwrap();

        let host = Ok(StatInspector::new(platform::HostOs::Linux));

        assert!(run(&args, host).await.is_err());
    }

    #[tokio::test]
    async fn test_subcommands_ignore_host() {
        let args =
            Args::try_parse_from(["schnitzel", "-c", "/nonexistent/schnitzel.toml", "status"]).unwrap();
        let host = Err(TutorialError::UnsupportedOs("plan9".to_string()));

        assert!(run(&args, host).await.is_err());
    }
}
