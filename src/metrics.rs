//! Steady-state metrics produced by the engine.

use serde::{Deserialize, Serialize};

use crate::models::ModelKind;

/// A probability attached to a state index (`n` customers in system).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateProbability {
    /// State index.
    pub n: u32,
    /// Probability value in [0, 1].
    pub value: f64,
}

/// Metrics for one priority class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// 1-based class index; 1 is the highest priority.
    pub class_index: usize,
    /// Class arrival rate.
    pub lambda: f64,
    /// Mean number of this class in system.
    pub l: f64,
    /// Mean number of this class waiting.
    pub lq: f64,
    /// Mean time in system.
    pub w: f64,
    /// Mean time waiting.
    pub wq: f64,
}

/// Flat output record of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Model that produced these metrics.
    pub model: ModelKind,
    /// Offered arrival rate λ (total over classes).
    pub lambda: f64,
    /// Utilization ρ.
    pub rho: f64,
    /// Probability the system is empty.
    pub p0: f64,
    /// Mean number in system.
    pub l: f64,
    /// Mean number in queue.
    pub lq: f64,
    /// Mean time in system.
    pub w: f64,
    /// Mean time in queue.
    pub wq: f64,
    /// Effective arrival rate after blocking (finite capacity only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_eff: Option<f64>,
    /// Mean service time E[s] (M/G/1 family).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_service_time: Option<f64>,
    /// P(exactly n in system), when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pn: Option<StateProbability>,
    /// P(at least x in system), when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pax: Option<StateProbability>,
    /// Per-class breakdown (priority model only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassMetrics>,
}

impl QueueMetrics {
    /// Headline metrics with every optional field empty.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub(crate) fn new(
        model: ModelKind,
        lambda: f64,
        rho: f64,
        p0: f64,
        l: f64,
        lq: f64,
        w: f64,
        wq: f64,
    ) -> Self {
        Self {
            model,
            lambda,
            rho,
            p0,
            l,
            lq,
            w,
            wq,
            lambda_eff: None,
            mean_service_time: None,
            pn: None,
            pax: None,
            classes: Vec::new(),
        }
    }

    /// Arrival rate that actually enters the system.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        self.lambda_eff.unwrap_or(self.lambda)
    }

    /// Check that the record is free of NaN/∞ and sign violations.
    ///
    /// Returns the name of the first offending field.
    #[must_use]
    pub fn first_invalid_field(&self) -> Option<&'static str> {
        let non_negative = [
            ("L", self.l),
            ("Lq", self.lq),
            ("W", self.w),
            ("Wq", self.wq),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < -1e-12 {
                return Some(name);
            }
        }
        let probabilities = [
            Some(("P0", self.p0)),
            self.pn.map(|p| ("Pn", p.value)),
            self.pax.map(|p| ("Pax", p.value)),
        ];
        for (name, value) in probabilities.into_iter().flatten() {
            if !(-1e-12..=1.0 + 1e-12).contains(&value) {
                return Some(name);
            }
        }
        None
    }
}
