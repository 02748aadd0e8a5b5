//! Little's Law consistency checks on engine output.
//!
//! `L = λW` holds for ANY stable queueing system regardless of arrival
//! distribution, service distribution, or queue discipline, so it is a cheap
//! cross-check on every closed form in [`crate::models`]. For blocking
//! systems λ is the effective arrival rate.

use serde::Serialize;

use crate::metrics::QueueMetrics;

/// Relative tolerance used by the CLI when checking results.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Little's Law: L = λW.
#[derive(Debug, Clone, Copy, Default)]
pub struct LittlesLaw;

impl LittlesLaw {
    /// Relative error `|L − λW| / L`, falling back to `λW` as the scale when L is 0.
    #[must_use]
    pub fn relative_error(l: f64, lambda: f64, w: f64) -> f64 {
        let expected = lambda * w;
        if l.abs() > f64::EPSILON {
            (l - expected).abs() / l.abs()
        } else if expected.abs() > f64::EPSILON {
            (l - expected).abs() / expected.abs()
        } else {
            0.0
        }
    }
}

/// Outcome of one identity check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LawCheck {
    /// What was checked, e.g. `"L = λW"`.
    pub name: String,
    /// Observed relative error.
    pub relative_error: f64,
    /// Whether the error is within tolerance.
    pub passed: bool,
}

impl LawCheck {
    fn new(name: impl Into<String>, l: f64, lambda: f64, w: f64, tolerance: f64) -> Self {
        let relative_error = LittlesLaw::relative_error(l, lambda, w);
        Self {
            name: name.into(),
            relative_error,
            passed: relative_error <= tolerance,
        }
    }
}

/// Check `L = λW` and `Lq = λWq` for the system and for each priority class.
#[must_use]
pub fn check_metrics(metrics: &QueueMetrics, tolerance: f64) -> Vec<LawCheck> {
    let lambda = metrics.throughput();
    let mut checks = vec![
        LawCheck::new("L = λW", metrics.l, lambda, metrics.w, tolerance),
        LawCheck::new("Lq = λWq", metrics.lq, lambda, metrics.wq, tolerance),
    ];
    for class in &metrics.classes {
        checks.push(LawCheck::new(
            format!("L{0} = λ{0}W{0}", class.class_index),
            class.l,
            class.lambda,
            class.w,
            tolerance,
        ));
    }
    checks
}
