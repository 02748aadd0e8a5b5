//! CLI argument parsing.
//!
//! This module provides the argument parser for the queuecalc CLI.
//! It accepts any iterator of strings so parsing can be tested without a
//! process environment.

use std::path::PathBuf;

use crate::config::{ModelSpec, OutputFormat};
use crate::models::ModelKind;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Enable verbose (debug-level) logging.
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate one model from command-line parameters.
    Evaluate {
        /// Loose model request assembled from flags.
        spec: ModelSpec,
        /// Output format.
        format: OutputFormat,
        /// Decimal places for text output.
        precision: usize,
    },
    /// Evaluate every scenario of a YAML file.
    Run {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Overrides the file's output format.
        format_override: Option<OutputFormat>,
    },
    /// List the supported models.
    Models,
    /// Arguments could not be parsed.
    Invalid {
        /// What went wrong.
        message: String,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Internal parsing from a vector of strings.
    fn parse_from_vec(args: &[String]) -> Self {
        let verbose = args
            .iter()
            .skip(1)
            .any(|a| a == "-v" || a == "--verbose");

        if args.len() < 2 {
            return Self {
                command: Command::Help,
                verbose,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "models" | "list" => Command::Models,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            other => match other.parse::<ModelKind>() {
                Ok(kind) => Self::parse_evaluate_command(kind, &args[2..])
                    .unwrap_or_else(|message| Command::Invalid { message }),
                Err(_) => Command::Invalid {
                    message: format!("Unknown command: {other}"),
                },
            },
        };

        Self { command, verbose }
    }

    /// Parse the 'run' command arguments.
    fn parse_run_command(args: &[String]) -> Command {
        if args.len() < 3 || args[2].starts_with('-') {
            return Command::Invalid {
                message: "'run' command requires a scenario file path".to_string(),
            };
        }

        let mut format_override = None;
        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--json" => {
                    format_override = Some(OutputFormat::Json);
                    i += 1;
                }
                "--text" => {
                    format_override = Some(OutputFormat::Text);
                    i += 1;
                }
                "-v" | "--verbose" => i += 1,
                unknown => {
                    return Command::Invalid {
                        message: format!("Unknown option for 'run': {unknown}"),
                    }
                }
            }
        }

        Command::Run {
            scenario_path: PathBuf::from(&args[2]),
            format_override,
        }
    }

    /// Parse `<model> --flag value ...` into a [`ModelSpec`].
    fn parse_evaluate_command(kind: ModelKind, flags: &[String]) -> Result<Command, String> {
        let mut spec = ModelSpec::new(kind);
        let mut format = OutputFormat::Text;
        let mut precision = 6;

        let mut i = 0;
        while i < flags.len() {
            let flag = flags[i].as_str();
            match flag {
                "--json" => {
                    format = OutputFormat::Json;
                    i += 1;
                    continue;
                }
                "-v" | "--verbose" => {
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let value = flags
                .get(i + 1)
                .ok_or_else(|| format!("Option {flag} requires a value"))?;
            match flag {
                "--lambda" | "-l" => spec.lambda = Some(parse_number(flag, value)?),
                "--lambdas" => spec.lambdas = Some(parse_list(flag, value)?),
                "--mu" | "-m" => spec.mu = Some(parse_number(flag, value)?),
                "--mu1" => spec.mu1 = Some(parse_number(flag, value)?),
                "--mu2" => spec.mu2 = Some(parse_number(flag, value)?),
                "--mode" => {
                    spec.mode = Some(value.parse().map_err(|e| format!("{e}"))?);
                }
                "--capacity" | "-N" => spec.capacity = Some(parse_number(flag, value)?),
                "--variance" => spec.variance = Some(parse_number(flag, value)?),
                "--std-dev" | "--sigma" => spec.std_dev = Some(parse_number(flag, value)?),
                "--pn" => spec.pn = Some(parse_index(flag, value)?),
                "--pax" => spec.pax = Some(parse_index(flag, value)?),
                "--precision" => {
                    precision = value
                        .parse()
                        .ok()
                        .filter(|p| *p <= 15)
                        .ok_or_else(|| format!("{flag} expects an integer 0..=15, got '{value}'"))?;
                }
                unknown => return Err(format!("Unknown option for '{}': {unknown}", kind.id())),
            }
            i += 2;
        }

        Ok(Command::Evaluate {
            spec,
            format,
            precision,
        })
    }
}

fn parse_number(flag: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{flag} expects a number, got '{value}'"))
}

fn parse_index(flag: &str, value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{flag} expects a non-negative integer, got '{value}'"))
}

fn parse_list(flag: &str, value: &str) -> Result<Vec<f64>, String> {
    value
        .split(',')
        .map(|part| parse_number(flag, part))
        .collect()
}
