//! M/M/2: two parallel exponential servers sharing one queue.
//!
//! Both formulations reduce to a birth-death chain whose states n ≥ 2 are
//! served at the combined rate M = μ_fast + μ_slow, so Pₙ = P1·rⁿ⁻¹ with
//! r = λ/M. They differ only in how state 1 is served.
//!
//! Heterogeneous (default): a lone customer always occupies the faster
//! server, so λP0 = μ_fast·P1.
//!
//! Symmetric: both servers are replaced by their mean rate μ̄ = M/2 and the
//! textbook M/M/2 closed forms apply with offered load a = λ/μ̄:
//!
//! ```text
//! P0 = 1 / (1 + a + a²/(2 − a))
//! Lq = a³·P0 / (2 − a)²
//! L  = Lq + a
//! ```

use super::{require_below, ModelKind, QueueModel};
use crate::error::QueueResult;
use crate::metrics::QueueMetrics;
use crate::params::{Mm2Mode, Mm2Params, StateQuery};

/// P0, P1 and the geometric ratio of the n ≥ 2 tail.
#[derive(Debug, Clone, Copy)]
struct Chain {
    p0: f64,
    p1: f64,
    r: f64,
}

impl Chain {
    fn probability(self, n: u32) -> f64 {
        match n {
            0 => self.p0,
            1 => self.p1,
            _ => self.p1 * self.r.powf(f64::from(n - 1)),
        }
    }

    fn tail(self, x: u32) -> f64 {
        match x {
            0 => 1.0,
            1 => 1.0 - self.p0,
            _ => self.p1 * self.r.powf(f64::from(x - 1)) / (1.0 - self.r),
        }
    }

    /// Σ n·Pₙ = P1 / (1 − r)².
    fn mean_in_system(self) -> f64 {
        self.p1 / ((1.0 - self.r) * (1.0 - self.r))
    }

    /// Expected number of busy servers.
    fn mean_in_service(self) -> f64 {
        self.p1 + 2.0 * (1.0 - self.p0 - self.p1)
    }
}

impl Mm2Params {
    fn chain(&self) -> Chain {
        let r = self.lambda / self.total_rate();
        match self.mode {
            Mm2Mode::Heterogeneous => {
                let (fast, _) = self.ordered_rates();
                let ratio = self.lambda / fast;
                let p0 = 1.0 / (1.0 + ratio / (1.0 - r));
                Chain {
                    p0,
                    p1: ratio * p0,
                    r,
                }
            }
            Mm2Mode::Symmetric => {
                let a = 2.0 * r;
                let p0 = 1.0 / (1.0 + a + a * a / (2.0 - a));
                Chain { p0, p1: a * p0, r }
            }
        }
    }
}

impl QueueModel for Mm2Params {
    fn kind(&self) -> ModelKind {
        ModelKind::Mm2
    }

    fn check_stability(&self) -> QueueResult<()> {
        require_below(self.kind(), self.lambda, self.total_rate())
    }

    fn compute(&self) -> QueueMetrics {
        let lambda = self.lambda;
        let chain = self.chain();

        let (l, lq) = match self.mode {
            Mm2Mode::Heterogeneous => {
                let l = chain.mean_in_system();
                (l, (l - chain.mean_in_service()).max(0.0))
            }
            Mm2Mode::Symmetric => {
                let a = 2.0 * chain.r;
                let lq = a * a * a * chain.p0 / ((2.0 - a) * (2.0 - a));
                (lq + a, lq)
            }
        };

        QueueMetrics::new(
            self.kind(),
            lambda,
            chain.r,
            chain.p0,
            l,
            lq,
            l / lambda,
            lq / lambda,
        )
    }

    fn state_probability(&self, n: u32) -> f64 {
        self.chain().probability(n)
    }

    fn tail_probability(&self, x: u32) -> f64 {
        self.chain().tail(x).clamp(0.0, 1.0)
    }

    fn query(&self) -> StateQuery {
        self.query
    }
}
