//! Diagnostic logging for Schnitzel
//!
//! Diagnostics go to stderr through `tracing` so they never mix with the
//! exercise screens on stdout.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the tracing subscriber (if one is not already active).
///
/// `RUST_LOG` wins when set; otherwise the filter follows the verbosity flags.
/// Calling this function multiple times is harmless.
pub fn init_tracing(verbosity: Verbosity) {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(matches!(verbosity, Verbosity::VeryVerbose))
        .with_writer(std::io::stderr)
        .try_init();

    let _ = TRACING_INIT.set(());
}

/// Filter directive limited to this crate, quiet for dependencies
fn filter_for(verbosity: Verbosity) -> String {
    format!("warn,schnitzel={}", verbosity.filter_directive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_levels() {
        assert_eq!(filter_for(Verbosity::Normal), "warn,schnitzel=warn");
        assert_eq!(filter_for(Verbosity::VeryVerbose), "warn,schnitzel=debug");
        assert_eq!(filter_for(Verbosity::Quiet), "warn,schnitzel=error");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(Verbosity::Normal);
        init_tracing(Verbosity::Verbose);
    }
}
