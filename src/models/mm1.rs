//! M/M/1: Poisson arrivals, one exponential server, unlimited waiting room.
//!
//! ```text
//! ρ = λ/μ        P0 = 1 − ρ        Pₙ = (1 − ρ)ρⁿ
//! L = ρ/(1 − ρ)  Lq = ρ²/(1 − ρ)
//! W = 1/(μ − λ)  Wq = ρ/(μ − λ)
//! ```

use super::{require_below, ModelKind, QueueModel};
use crate::error::QueueResult;
use crate::metrics::QueueMetrics;
use crate::params::{Mm1Params, StateQuery};

impl QueueModel for Mm1Params {
    fn kind(&self) -> ModelKind {
        ModelKind::Mm1
    }

    fn check_stability(&self) -> QueueResult<()> {
        require_below(self.kind(), self.lambda, self.mu)
    }

    fn compute(&self) -> QueueMetrics {
        let (lambda, mu) = (self.lambda, self.mu);
        let rho = lambda / mu;

        QueueMetrics::new(
            self.kind(),
            lambda,
            rho,
            1.0 - rho,
            rho / (1.0 - rho),
            rho * rho / (1.0 - rho),
            1.0 / (mu - lambda),
            rho / (mu - lambda),
        )
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
