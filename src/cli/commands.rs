//! CLI command handlers.
//!
//! This module contains the execution logic for each CLI command.

use std::path::Path;
use std::process::ExitCode;

use super::output::{
    format_law_checks, format_metrics, format_models, format_outcomes, metrics_json,
    outcomes_json, print_help, print_version,
};
use super::{Args, Command};
use crate::config::{ModelSpec, OutputFormat, ScenarioConfig};
use crate::models::evaluate;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Evaluate {
            spec,
            format,
            precision,
        } => evaluate_model(&spec, format, precision, args.verbose),
        Command::Run {
            scenario_path,
            format_override,
        } => run_scenarios(&scenario_path, format_override),
        Command::Models => {
            print!("{}", format_models());
            ExitCode::SUCCESS
        }
        Command::Invalid { message } => {
            eprintln!("Error: {message}\n");
            print_help();
            ExitCode::from(1)
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Evaluate one model given on the command line.
///
/// # Arguments
///
/// * `spec` - Model request assembled from flags
/// * `format` - Text or JSON
/// * `precision` - Decimal places for text output
/// * `verbose` - Also print Little's Law checks
#[must_use]
pub fn evaluate_model(
    spec: &ModelSpec,
    format: OutputFormat,
    precision: usize,
    verbose: bool,
) -> ExitCode {
    let metrics = match spec.to_parameters().and_then(|params| evaluate(&params)) {
        Ok(metrics) => metrics,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    match format {
        OutputFormat::Json => match metrics_json(&metrics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(1);
            }
        },
        OutputFormat::Text => {
            print!("{}", format_metrics(&metrics, precision));
            if verbose {
                println!("\nLittle's Law:");
                print!("{}", format_law_checks(&metrics));
            }
        }
    }
    ExitCode::SUCCESS
}

/// Evaluate every scenario in a YAML file.
///
/// Exits with 1 if the file is invalid or any scenario fails.
#[must_use]
pub fn run_scenarios(path: &Path, format_override: Option<OutputFormat>) -> ExitCode {
    let config = match ScenarioConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {e}", path.display());
            return ExitCode::from(1);
        }
    };

    tracing::info!(
        path = %path.display(),
        scenarios = config.scenarios.len(),
        "running scenario file"
    );
    let outcomes = config.evaluate();

    match format_override.unwrap_or(config.output.format) {
        OutputFormat::Json => match outcomes_json(&outcomes) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(1);
            }
        },
        OutputFormat::Text => {
            print!(
                "{}",
                format_outcomes(&config.name, &outcomes, config.output.precision)
            );
        }
    }

    if outcomes.iter().all(|o| o.result.is_ok()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
