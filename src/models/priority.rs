//! Non-preemptive priority classes sharing one exponential server.
//!
//! Cobham's formula with classes ordered 1 (highest) to k:
//!
//! ```text
//! W0     = Σ λᵢE[S²]/2 = ρ/μ
//! σ_k    = Σ_{i≤k} λᵢ/μ
//! Wq_k   = W0 / ((1 − σ_{k−1})(1 − σ_k))
//! ```
//!
//! Service is work-conserving and identical across classes, so the total
//! number in system is distributed exactly as M/M/1 at the aggregate load.

use super::{require_below, ModelKind, QueueModel};
use crate::error::QueueResult;
use crate::metrics::{ClassMetrics, QueueMetrics};
use crate::params::{PriorityParams, StateQuery};

impl PriorityParams {
    fn rho(&self) -> f64 {
        self.total_arrival_rate() / self.mu
    }

    /// Per-class metrics in priority order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let mu = self.mu;
        let residual_work = self.rho() / mu;
        let mut higher_load = 0.0;

        self.arrival_rates
            .iter()
            .enumerate()
            .map(|(i, &lambda)| {
                let cumulative_load = higher_load + lambda / mu;
                let wq = residual_work / ((1.0 - higher_load) * (1.0 - cumulative_load));
                let w = wq + 1.0 / mu;
                higher_load = cumulative_load;
                ClassMetrics {
                    class_index: i + 1,
                    lambda,
                    l: lambda * w,
                    lq: lambda * wq,
                    w,
                    wq,
                }
            })
            .collect()
    }
}

impl QueueModel for PriorityParams {
    fn kind(&self) -> ModelKind {
        ModelKind::Priority
    }

    fn check_stability(&self) -> QueueResult<()> {
        require_below(self.kind(), self.total_arrival_rate(), self.mu)
    }

    fn compute(&self) -> QueueMetrics {
        let lambda = self.total_arrival_rate();
        let rho = self.rho();
        let classes = self.class_metrics();

        let l: f64 = classes.iter().map(|c| c.l).sum();
        let lq: f64 = classes.iter().map(|c| c.lq).sum();

        let mut metrics = QueueMetrics::new(
            self.kind(),
            lambda,
            rho,
            1.0 - rho,
            l,
            lq,
            l / lambda,
            lq / lambda,
        );
        metrics.classes = classes;
        metrics
    }

    fn state_probability(&self, n: u32) -> f64 {
        let rho = self.rho();
        (1.0 - rho) * rho.powf(f64::from(n))
    }

    fn tail_probability(&self, x: u32) -> f64 {
        self.rho().powf(f64::from(x))
    }

    fn query(&self) -> StateQuery {
        self.query
    }
}
