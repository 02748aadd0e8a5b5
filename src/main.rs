//! queuecalc CLI - closed-form queueing metrics
//!
//! Command-line interface over the evaluation engine.

use std::process::ExitCode;

use queuecalc::cli::{init_tracing, run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    run_cli(args)
}
