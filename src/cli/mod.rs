//! CLI module for queuecalc.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested. The
//! entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command};
pub use commands::{evaluate_model, run_cli, run_scenarios};
pub use output::{
    format_law_checks, format_metrics, format_models, format_outcomes, metric_rows, metrics_json,
    outcomes_json, print_help, print_version,
};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug output for
/// this crate and everything else stays at `warn`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "warn,queuecalc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second install (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
