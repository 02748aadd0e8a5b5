//! M/M/1/N: one exponential server, arrivals rejected once N are present.
//!
//! A finite buffer is always stable, so there is no stability precondition.
//! The state distribution is a geometric series truncated at N:
//!
//! ```text
//! Pₙ = P0·ρⁿ,  0 ≤ n ≤ N
//! P0 = (1 − ρ)/(1 − ρ^(N+1))     (ρ ≠ 1)
//! P0 = 1/(N + 1)                 (ρ = 1)
//! λ_eff = λ(1 − P_N)
//! ```
//!
//! Everything is evaluated in t = ln ρ through `exp_m1`, so the formulas run
//! continuously through ρ = 1 instead of switching to the uniform limit at a
//! tolerance. For ρ > 1 the distribution is read from the full end with
//! e^(−t) < 1, so large N does not overflow ρ^(N+1).

use super::{ModelKind, QueueModel};
use crate::error::QueueResult;
use crate::metrics::QueueMetrics;
use crate::params::{Mm1nParams, StateQuery};

/// Below this load the plain truncated geometric mean is exact enough.
const LIGHT_LOAD: f64 = 0.5;

/// |x| below which `excess_mean` uses its Taylor series.
const SERIES_RADIUS: f64 = 1e-2;

/// Mean of the distribution ∝ rᵏ on k = 0..=n, for r < 1.
fn truncated_geometric_mean(r: f64, n: f64) -> f64 {
    r * (1.0 - (n + 1.0) * r.powf(n) + n * r.powf(n + 1.0)) / ((1.0 - r) * (1.0 - r.powf(n + 1.0)))
}

/// 1/(1 − e^(−x)) − 1/x, finite and smooth through x = 0 where it is 1/2.
fn excess_mean(x: f64) -> f64 {
    if x.abs() < SERIES_RADIUS {
        let x2 = x * x;
        0.5 + x * (1.0 / 12.0 - x2 * (1.0 / 720.0 - x2 / 30_240.0))
    } else {
        -1.0 / (-x).exp_m1() - 1.0 / x
    }
}

/// (e^(ks) − 1)/(e^(ms) − 1): the share of Σ_{i<m} e^(is) held by its first k terms.
fn partial_sum_ratio(s: f64, k: f64, m: f64) -> f64 {
    if s.abs() < f64::MIN_POSITIVE {
        k / m
    } else {
        (k * s).exp_m1() / (m * s).exp_m1()
    }
}

impl Mm1nParams {
    fn rho(&self) -> f64 {
        self.lambda / self.mu
    }

    fn log_load(&self) -> f64 {
        self.rho().ln()
    }

    /// P(exactly n), evaluated from whichever end keeps powers below one.
    fn probability(&self, n: u32) -> f64 {
        if n > self.capacity {
            return 0.0;
        }
        let states = f64::from(self.capacity) + 1.0;
        let t = self.log_load();
        if t <= 0.0 {
            (t * f64::from(n)).exp() * partial_sum_ratio(t, 1.0, states)
        } else {
            (-t * f64::from(self.capacity - n)).exp() * partial_sum_ratio(-t, 1.0, states)
        }
    }

    /// P(at least x), 1 ≤ x ≤ N, in closed form.
    fn tail(&self, x: u32) -> f64 {
        let states = f64::from(self.capacity) + 1.0;
        let upper = f64::from(self.capacity - x) + 1.0;
        let t = self.log_load();
        if t <= 0.0 {
            (t * f64::from(x)).exp() * partial_sum_ratio(t, upper, states)
        } else {
            partial_sum_ratio(-t, upper, states)
        }
    }

    /// L = d/dt ln Σ e^(tn) = (N+1)·g((N+1)t) − g(t) with g = `excess_mean`.
    fn mean_in_system(&self) -> f64 {
        let cap = f64::from(self.capacity);
        let rho = self.rho();
        if rho < LIGHT_LOAD {
            truncated_geometric_mean(rho, cap)
        } else {
            let t = self.log_load();
            (cap + 1.0) * excess_mean((cap + 1.0) * t) - excess_mean(t)
        }
    }
}

impl QueueModel for Mm1nParams {
    fn kind(&self) -> ModelKind {
        ModelKind::Mm1n
    }

    fn check_stability(&self) -> QueueResult<()> {
        Ok(())
    }

    fn compute(&self) -> QueueMetrics {
        let (lambda, mu) = (self.lambda, self.mu);
        let p0 = self.probability(0);
        let blocking = self.probability(self.capacity);
        let lambda_eff = lambda * (1.0 - blocking);

        let l = self.mean_in_system();
        let lq = (l - lambda_eff / mu).max(0.0);

        let mut metrics = QueueMetrics::new(
            self.kind(),
            lambda,
            self.rho(),
            p0,
            l,
            lq,
            l / lambda_eff,
            lq / lambda_eff,
        );
        metrics.lambda_eff = Some(lambda_eff);
        metrics
    }

    fn state_probability(&self, n: u32) -> f64 {
        self.probability(n)
    }

    fn tail_probability(&self, x: u32) -> f64 {
        if x == 0 {
            return 1.0;
        }
        if x > self.capacity {
            return 0.0;
        }
        self.tail(x).clamp(0.0, 1.0)
    }

    fn query(&self) -> StateQuery {
        self.query
    }
}
