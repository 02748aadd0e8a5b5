//! CLI output formatting.
//!
//! Rendering functions return `String`s so they can be tested; the command
//! handlers decide where to print them.

use serde::Serialize;
use std::fmt::Write as _;

use crate::config::ScenarioOutcome;
use crate::error::QueueResult;
use crate::laws::{check_metrics, DEFAULT_TOLERANCE};
use crate::metrics::QueueMetrics;
use crate::models::ModelKind;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            println!("queuecalc {} ({hash})", env!("CARGO_PKG_VERSION"));
        }
        _ => println!("queuecalc {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"queuecalc - Steady-state metrics for classical queueing models

USAGE:
    queuecalc <COMMAND> [OPTIONS]

COMMANDS:
    mm1       --lambda <λ> --mu <μ>
    mm2       --lambda <λ> (--mu <μ> | --mu1 <μ1> --mu2 <μ2>)
              [--mode heterogeneous|symmetric]
    mm1n      --lambda <λ> --mu <μ> --capacity <N>
    mg1       --lambda <λ> --mu <μ> [--variance <σ²> | --std-dev <σ>]
    md1       --lambda <λ> --mu <μ>
    priority  --lambdas <λ1,λ2,...> --mu <μ>

    run <scenarios.yaml>        Evaluate every scenario in a file
        --json | --text         Override the file's output format

    models                      List supported models and references
    help                        Show this help message
    version                     Show version information

MODEL OPTIONS:
    --pn <n>                    Also report P(exactly n in system)
    --pax <x>                   Also report P(at least x in system)
    --precision <p>             Decimal places (default: 6)
    --json                      Print metrics as JSON
    -v, --verbose               Log debug events to stderr (see RUST_LOG)

EXAMPLES:
    queuecalc mm1 --lambda 4 --mu 5
    queuecalc mm1n --lambda 4 --mu 5 --capacity 3 --pn 3
    queuecalc mm2 --lambda 3 --mu1 2 --mu2 2.5 --mode symmetric
    queuecalc priority --lambdas 1,2 --mu 5 --json
"
    );
}

/// Labelled rows for a metrics record, in display order.
#[must_use]
pub fn metric_rows(metrics: &QueueMetrics) -> Vec<(String, f64)> {
    let mut rows = vec![
        ("Utilization factor (ρ)".to_string(), metrics.rho),
        ("Probability of empty system (P₀)".to_string(), metrics.p0),
        ("Mean number in system (L)".to_string(), metrics.l),
        ("Mean number in queue (Lq)".to_string(), metrics.lq),
        ("Mean time in system (W)".to_string(), metrics.w),
        ("Mean time in queue (Wq)".to_string(), metrics.wq),
    ];
    if let Some(lambda_eff) = metrics.lambda_eff {
        rows.push(("Effective arrival rate (λₑ)".to_string(), lambda_eff));
    }
    if let Some(service) = metrics.mean_service_time {
        rows.push(("Expected number in system (E[n])".to_string(), metrics.l));
        rows.push(("Expected time in system (E[t])".to_string(), metrics.w));
        rows.push(("Expected service time (E[s])".to_string(), service));
    }
    if let Some(pn) = metrics.pn {
        rows.push((
            format!("Probability of exactly {0} customers (P{0})", pn.n),
            pn.value,
        ));
    }
    if let Some(pax) = metrics.pax {
        rows.push((
            format!("Probability of at least {0} customers (P(N≥{0}))", pax.n),
            pax.value,
        ));
    }
    rows
}

/// Render metrics as aligned text rows with `precision` decimals.
#[must_use]
pub fn format_metrics(metrics: &QueueMetrics, precision: usize) -> String {
    let rows = metric_rows(metrics);
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{} results", metrics.model);
    for (label, value) in &rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "  {label}{:pad$}  {value:.precision$}", "");
    }

    if !metrics.classes.is_empty() {
        let _ = writeln!(out, "\n  Per class (1 = highest priority):");
        for class in &metrics.classes {
            let _ = writeln!(
                out,
                "    Class {}: λ={:.p$}  L={:.p$}  Lq={:.p$}  W={:.p$}  Wq={:.p$}",
                class.class_index,
                class.lambda,
                class.l,
                class.lq,
                class.w,
                class.wq,
                p = precision
            );
        }
    }
    out
}

/// Render Little's Law checks for a metrics record.
#[must_use]
pub fn format_law_checks(metrics: &QueueMetrics) -> String {
    let mut out = String::new();
    for check in check_metrics(metrics, DEFAULT_TOLERANCE) {
        let sym = if check.passed { "✓" } else { "✗" };
        let _ = writeln!(
            out,
            "  {sym} {} (relative error {:.2e})",
            check.name, check.relative_error
        );
    }
    out
}

/// Render metrics as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn metrics_json(metrics: &QueueMetrics) -> QueueResult<String> {
    Ok(serde_json::to_string_pretty(metrics)?)
}

#[derive(Serialize)]
struct ScenarioRecord<'a> {
    name: &'a str,
    model: ModelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<&'a QueueMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Render a batch of scenario outcomes as a JSON array.
///
/// # Errors
/// Returns error if serialization fails.
pub fn outcomes_json(outcomes: &[ScenarioOutcome]) -> QueueResult<String> {
    let records: Vec<ScenarioRecord<'_>> = outcomes
        .iter()
        .map(|o| ScenarioRecord {
            name: &o.name,
            model: o.model,
            metrics: o.result.as_ref().ok(),
            error: o.result.as_ref().err().map(ToString::to_string),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Render a batch of scenario outcomes as text.
#[must_use]
pub fn format_outcomes(title: &str, outcomes: &[ScenarioOutcome], precision: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", if title.is_empty() { "Scenarios" } else { title });
    let _ = writeln!(out, "{RULE}\n");

    for outcome in outcomes {
        let _ = writeln!(out, "[{}] {}", outcome.name, outcome.model);
        match &outcome.result {
            Ok(metrics) => {
                let _ = write!(out, "{}", format_metrics(metrics, precision));
                let _ = write!(out, "{}", format_law_checks(metrics));
            }
            Err(err) => {
                let _ = writeln!(out, "  ✗ {err}");
            }
        }
        let _ = writeln!(out);
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{} evaluated, {} failed",
        outcomes.len() - failed,
        failed
    );
    let _ = writeln!(out, "{RULE}");
    out
}

/// Render the model catalogue.
#[must_use]
pub fn format_models() -> String {
    let mut out = String::new();
    for kind in ModelKind::ALL {
        let _ = writeln!(out, "{:<9} {}", kind.id(), kind.kendall());
        let _ = writeln!(out, "          {}", kind.description());
        let _ = writeln!(out, "          {}", kind.latex());
        let _ = writeln!(out, "          {}\n", kind.reference());
    }
    out
}
