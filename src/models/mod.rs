//! Closed-form steady-state evaluation of classical queueing models.
//!
//! Every model implements [`QueueModel`]: a stability check, the closed-form
//! metrics, and the state distribution Pₙ. [`QueueModel::evaluate`] ties them
//! together so a caller either gets a complete [`QueueMetrics`] or a typed
//! error, never a partial result.
//!
//! # Example
//!
//! ```rust
//! use queuecalc::prelude::*;
//!
//! let params = Mm1Params::new(4.0, 5.0).unwrap();
//! let metrics = params.evaluate().unwrap();
//! assert!((metrics.l - 4.0).abs() < 1e-12);
//! ```

mod mg1;
mod mm1;
mod mm1n;
mod mm2;
mod priority;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QueueError, QueueResult};
use crate::metrics::{QueueMetrics, StateProbability};
use crate::params::{ModelParameters, StateQuery};

/// The supported models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ModelKind {
    /// Poisson arrivals, one exponential server.
    Mm1,
    /// Poisson arrivals, two exponential servers.
    Mm2,
    /// M/M/1 with at most N customers in system.
    Mm1n,
    /// Poisson arrivals, general service time.
    Mg1,
    /// Poisson arrivals, deterministic service time.
    Md1,
    /// Non-preemptive priority classes on one exponential server.
    Priority,
}

impl ModelKind {
    /// All models, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Mm1,
        Self::Mm2,
        Self::Mm1n,
        Self::Mg1,
        Self::Md1,
        Self::Priority,
    ];

    /// Kendall notation.
    #[must_use]
    pub const fn kendall(self) -> &'static str {
        match self {
            Self::Mm1 => "M/M/1",
            Self::Mm2 => "M/M/2",
            Self::Mm1n => "M/M/1/N",
            Self::Mg1 => "M/G/1",
            Self::Md1 => "M/D/1",
            Self::Priority => "M/M/1 (priority)",
        }
    }

    /// Short identifier used in scenario files and on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Mm1 => "mm1",
            Self::Mm2 => "mm2",
            Self::Mm1n => "mm1n",
            Self::Mg1 => "mg1",
            Self::Md1 => "md1",
            Self::Priority => "priority",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Mm1 => "Single exponential server, unlimited waiting room",
            Self::Mm2 => "Two parallel exponential servers, possibly at different rates",
            Self::Mm1n => "Single exponential server, arrivals blocked once N are present",
            Self::Mg1 => "Single server with arbitrary service-time variance (Pollaczek-Khinchine)",
            Self::Md1 => "Single server with constant service time",
            Self::Priority => "Single exponential server, non-preemptive priority classes",
        }
    }

    /// Headline formula.
    #[must_use]
    pub const fn latex(self) -> &'static str {
        match self {
            Self::Mm1 => r"L = \frac{\rho}{1-\rho}",
            Self::Mm2 => r"P_n = P_1 \left(\frac{\lambda}{\mu_1+\mu_2}\right)^{n-1}",
            Self::Mm1n => r"P_0 = \frac{1-\rho}{1-\rho^{N+1}}",
            Self::Mg1 => r"L_q = \frac{\lambda^2\sigma^2 + \rho^2}{2(1-\rho)}",
            Self::Md1 => r"L_q = \frac{\rho^2}{2(1-\rho)}",
            Self::Priority => {
                r"W_{q,k} = \frac{W_0}{(1-\sigma_{k-1})(1-\sigma_k)}"
            }
        }
    }

    /// Where the model's closed forms were first published.
    #[must_use]
    pub const fn reference(self) -> Reference {
        match self {
            Self::Mm1 | Self::Mm2 | Self::Mm1n => Reference {
                author: "Kleinrock, L.",
                year: 1975,
                work: "Queueing Systems, Volume 1: Theory",
                doi: None,
            },
            Self::Mg1 | Self::Md1 => Reference {
                author: "Khinchine, A.Y.",
                year: 1932,
                work: "Mathematical theory of a stationary queue",
                doi: None,
            },
            Self::Priority => Reference {
                author: "Cobham, A.",
                year: 1954,
                work: "Priority Assignment in Waiting Line Problems",
                doi: Some("10.1287/opre.2.1.70"),
            },
        }
    }
}

/// Literature source of a model's formulas, as printed by `queuecalc models`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// First author, surname first.
    pub author: &'static str,
    pub year: u16,
    /// Book or article title.
    pub work: &'static str,
    pub doi: Option<&'static str>,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}), {}", self.author, self.year, self.work)?;
        match self.doi {
            Some(doi) => write!(f, " [doi:{doi}]"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kendall())
    }
}

impl FromStr for ModelKind {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| {
                QueueError::invalid(
                    "model",
                    format!("unknown model '{s}', expected one of mm1, mm2, mm1n, mg1, md1, priority"),
                )
            })
    }
}

impl TryFrom<String> for ModelKind {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A queueing model whose steady state has a closed form.
///
/// Implementors only provide the stability check, the headline metrics and
/// the state distribution; [`QueueModel::evaluate`] sequences them.
pub trait QueueModel {
    /// Which model this is.
    fn kind(&self) -> ModelKind;

    /// Fail with `UnstableSystem` when offered load is not below capacity.
    ///
    /// # Errors
    /// `UnstableSystem` for infinite-capacity models with λ ≥ capacity.
    fn check_stability(&self) -> QueueResult<()>;

    /// Headline metrics. Only called once [`QueueModel::check_stability`] passed.
    fn compute(&self) -> QueueMetrics;

    /// P(exactly `n` in system). Only meaningful for a stable model.
    fn state_probability(&self, n: u32) -> f64;

    /// P(at least `x` in system), in closed form.
    fn tail_probability(&self, x: u32) -> f64;

    /// Optional Pₙ / Pax queries attached to the parameters.
    fn query(&self) -> StateQuery;

    /// Check stability, compute metrics and answer the attached queries.
    ///
    /// # Errors
    /// `UnstableSystem` if the model is not stable.
    fn evaluate(&self) -> QueueResult<QueueMetrics> {
        if let Err(err) = self.check_stability() {
            tracing::debug!(model = %self.kind(), error = %err, "evaluation rejected");
            return Err(err);
        }

        let mut metrics = self.compute();
        let query = self.query();
        metrics.pn = query.pn.map(|n| StateProbability {
            n,
            value: self.state_probability(n),
        });
        metrics.pax = query.pax.map(|x| StateProbability {
            n: x,
            value: self.tail_probability(x),
        });

        if let Some(field) = metrics.first_invalid_field() {
            tracing::warn!(model = %metrics.model, field, "metric out of range");
        }
        tracing::debug!(
            model = %metrics.model,
            rho = metrics.rho,
            l = metrics.l,
            w = metrics.w,
            "evaluated"
        );
        Ok(metrics)
    }
}

impl ModelParameters {
    /// The wrapped record as a trait object.
    #[must_use]
    pub fn as_model(&self) -> &dyn QueueModel {
        match self {
            Self::Mm1(p) => p,
            Self::Mm2(p) => p,
            Self::Mm1n(p) => p,
            Self::Mg1(p) => p,
            Self::Md1(p) => p,
            Self::Priority(p) => p,
        }
    }

    /// Which model the parameters select.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.as_model().kind()
    }
}

/// Evaluate whichever model `params` selects.
///
/// # Errors
/// `UnstableSystem` if the selected model is not stable.
pub fn evaluate(params: &ModelParameters) -> QueueResult<QueueMetrics> {
    params.as_model().evaluate()
}

/// Stability check shared by the single-server infinite-capacity models.
pub(crate) fn require_below(kind: ModelKind, offered: f64, capacity: f64) -> QueueResult<()> {
    if offered < capacity {
        Ok(())
    } else {
        Err(QueueError::unstable(kind.kendall(), offered, capacity))
    }
}
