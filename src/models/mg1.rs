//! M/G/1 and M/D/1 via the Pollaczek-Khinchine mean-value formula.
//!
//! ```text
//! Lq = (λ²σ² + ρ²) / (2(1 − ρ))
//! ```
//!
//! M/D/1 is the σ² = 0 case. The state distribution of M/G/1 has no closed
//! form in general; Pₙ = (1 − ρ)ρⁿ and P(N ≥ x) = ρˣ are the M/M/1 geometric
//! approximation, exact only for exponential service.

use super::{require_below, ModelKind, QueueModel};
use crate::error::QueueResult;
use crate::metrics::QueueMetrics;
use crate::params::{Md1Params, Mg1Params, StateQuery};

fn pollaczek_khinchine(kind: ModelKind, lambda: f64, mu: f64, variance: f64) -> QueueMetrics {
    let rho = lambda / mu;
    let lq = (lambda * lambda * variance + rho * rho) / (2.0 * (1.0 - rho));
    let l = lq + rho;

    let mut metrics = QueueMetrics::new(
        kind,
        lambda,
        rho,
        1.0 - rho,
        l,
        lq,
        l / lambda,
        lq / lambda,
    );
    metrics.mean_service_time = Some(1.0 / mu);
    metrics
}

impl QueueModel for Mg1Params {
    fn kind(&self) -> ModelKind {
        ModelKind::Mg1
    }

    fn check_stability(&self) -> QueueResult<()> {
        require_below(self.kind(), self.lambda, self.mu)
    }

    fn compute(&self) -> QueueMetrics {
        pollaczek_khinchine(self.kind(), self.lambda, self.mu, self.variance)
    }

    fn state_probability(&self, n: u32) -> f64 {
        let rho = self.lambda / self.mu;
        (1.0 - rho) * rho.powf(f64::from(n))
    }

    fn tail_probability(&self, x: u32) -> f64 {
        (self.lambda / self.mu).powf(f64::from(x))
    }

    fn query(&self) -> StateQuery {
        self.query
    }
}

impl QueueModel for Md1Params {
    fn kind(&self) -> ModelKind {
        ModelKind::Md1
    }

    fn check_stability(&self) -> QueueResult<()> {
        require_below(self.kind(), self.lambda, self.mu)
    }

    fn compute(&self) -> QueueMetrics {
        pollaczek_khinchine(self.kind(), self.lambda, self.mu, 0.0)
    }

    fn state_probability(&self, n: u32) -> f64 {
        self.as_mg1().state_probability(n)
    }

    fn tail_probability(&self, x: u32) -> f64 {
        self.as_mg1().tail_probability(x)
    }

    fn query(&self) -> StateQuery {
        self.query
    }
}
