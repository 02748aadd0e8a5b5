//! Validated parameter records, one per queueing model.
//!
//! Every constructor checks its inputs and returns
//! [`QueueError::InvalidParameter`] on the first violation, so a value of any
//! of these types is always safe to hand to the engine. Stability is *not*
//! checked here; that is the engine's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QueueError, QueueResult};

/// Require a finite, strictly positive value.
pub(crate) fn positive(name: &str, value: f64) -> QueueResult<f64> {
    if !value.is_finite() {
        return Err(QueueError::invalid(
            name,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value <= 0.0 {
        return Err(QueueError::invalid(
            name,
            format!("must be greater than 0, got {value}"),
        ));
    }
    Ok(value)
}

/// Require a finite, non-negative value.
pub(crate) fn non_negative(name: &str, value: f64) -> QueueResult<f64> {
    if !value.is_finite() {
        return Err(QueueError::invalid(
            name,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(QueueError::invalid(
            name,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(value)
}

/// Optional state-probability queries attached to an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateQuery {
    /// Report P(exactly n in system).
    pub pn: Option<u32>,
    /// Report P(at least x in system).
    pub pax: Option<u32>,
}

impl StateQuery {
    /// No optional queries.
    pub const NONE: Self = Self { pn: None, pax: None };
}

/// Which M/M/2 formulation to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mm2Mode {
    /// Exact birth-death chain with the faster server taking lone customers.
    #[default]
    Heterogeneous,
    /// Textbook M/M/2 using the mean of the two server rates.
    Symmetric,
}

impl fmt::Display for Mm2Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heterogeneous => write!(f, "heterogeneous"),
            Self::Symmetric => write!(f, "symmetric"),
        }
    }
}

impl FromStr for Mm2Mode {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heterogeneous" | "exact" => Ok(Self::Heterogeneous),
            "symmetric" | "approx" => Ok(Self::Symmetric),
            other => Err(QueueError::invalid(
                "mode",
                format!("expected 'heterogeneous' or 'symmetric', got '{other}'"),
            )),
        }
    }
}

macro_rules! with_query {
    () => {
        /// Also report P(exactly `n` in system).
        #[must_use]
        pub fn with_pn(mut self, n: u32) -> Self {
            self.query.pn = Some(n);
            self
        }

        /// Also report P(at least `x` in system).
        #[must_use]
        pub fn with_pax(mut self, x: u32) -> Self {
            self.query.pax = Some(x);
            self
        }

        /// Replace all optional queries.
        #[must_use]
        pub fn with_query(mut self, query: StateQuery) -> Self {
            self.query = query;
            self
        }

        /// Optional state-probability queries.
        #[must_use]
        pub const fn query(&self) -> StateQuery {
            self.query
        }
    };
}

/// M/M/1 parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Mm1Params {
    pub(crate) lambda: f64,
    pub(crate) mu: f64,
    pub(crate) query: StateQuery,
}

impl Mm1Params {
    /// Arrival rate `lambda`, service rate `mu`.
    ///
    /// # Errors
    /// `InvalidParameter` if either rate is not a positive finite number.
    pub fn new(lambda: f64, mu: f64) -> QueueResult<Self> {
        Ok(Self {
            lambda: positive("lambda", lambda)?,
            mu: positive("mu", mu)?,
            query: StateQuery::NONE,
        })
    }

    with_query!();

    /// Arrival rate λ.
    #[must_use]
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Service rate μ.
    #[must_use]
    pub const fn mu(&self) -> f64 {
        self.mu
    }
}

/// M/M/2 parameters: two parallel servers with possibly different rates.
#[derive(Debug, Clone, PartialEq)]
pub struct Mm2Params {
    pub(crate) lambda: f64,
    pub(crate) mu1: f64,
    pub(crate) mu2: f64,
    pub(crate) mode: Mm2Mode,
    pub(crate) query: StateQuery,
}

impl Mm2Params {
    /// Arrival rate and the two server rates, evaluated in the default
    /// heterogeneous mode.
    ///
    /// # Errors
    /// `InvalidParameter` if any rate is not a positive finite number.
    pub fn new(lambda: f64, mu1: f64, mu2: f64) -> QueueResult<Self> {
        Ok(Self {
            lambda: positive("lambda", lambda)?,
            mu1: positive("mu1", mu1)?,
            mu2: positive("mu2", mu2)?,
            mode: Mm2Mode::default(),
            query: StateQuery::NONE,
        })
    }

    /// Two identical servers of rate `mu`.
    ///
    /// # Errors
    /// `InvalidParameter` if either rate is not a positive finite number.
    pub fn identical(lambda: f64, mu: f64) -> QueueResult<Self> {
        Self::new(lambda, positive("mu", mu)?, mu)
    }

    /// Select the formulation.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mm2Mode) -> Self {
        self.mode = mode;
        self
    }

    with_query!();

    /// Arrival rate λ.
    #[must_use]
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Rates ordered `(fast, slow)`.
    #[must_use]
    pub fn ordered_rates(&self) -> (f64, f64) {
        if self.mu1 >= self.mu2 {
            (self.mu1, self.mu2)
        } else {
            (self.mu2, self.mu1)
        }
    }

    /// Combined rate when both servers are busy.
    #[must_use]
    pub fn total_rate(&self) -> f64 {
        self.mu1 + self.mu2
    }

    /// Selected formulation.
    #[must_use]
    pub const fn mode(&self) -> Mm2Mode {
        self.mode
    }
}

/// M/M/1/N parameters: single server, at most `capacity` customers in system.
#[derive(Debug, Clone, PartialEq)]
pub struct Mm1nParams {
    pub(crate) lambda: f64,
    pub(crate) mu: f64,
    pub(crate) capacity: u32,
    pub(crate) query: StateQuery,
}

impl Mm1nParams {
    /// # Errors
    /// `InvalidParameter` if a rate is not positive or `capacity` is zero.
    pub fn new(lambda: f64, mu: f64, capacity: u32) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::invalid(
                "capacity",
                "must be a positive integer, got 0",
            ));
        }
        Ok(Self {
            lambda: positive("lambda", lambda)?,
            mu: positive("mu", mu)?,
            capacity,
            query: StateQuery::NONE,
        })
    }

    /// Build from a capacity that arrived as a plain number.
    ///
    /// # Errors
    /// `InvalidParameter` unless `capacity` is a whole number in `1..=u32::MAX`.
    pub fn from_real_capacity(lambda: f64, mu: f64, capacity: f64) -> QueueResult<Self> {
        if !capacity.is_finite()
            || capacity.fract() != 0.0
            || capacity < 1.0
            || capacity > f64::from(u32::MAX)
        {
            return Err(QueueError::invalid(
                "capacity",
                format!("must be a positive integer, got {capacity}"),
            ));
        }
        Self::new(lambda, mu, capacity as u32)
    }

    with_query!();

    /// Arrival rate λ.
    #[must_use]
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Service rate μ.
    #[must_use]
    pub const fn mu(&self) -> f64 {
        self.mu
    }

    /// System capacity N.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// M/G/1 parameters: general service-time distribution with known variance.
#[derive(Debug, Clone, PartialEq)]
pub struct Mg1Params {
    pub(crate) lambda: f64,
    pub(crate) mu: f64,
    pub(crate) variance: f64,
    pub(crate) query: StateQuery,
}

impl Mg1Params {
    /// Service-time `variance` defaults to `1/μ²` (exponential service).
    ///
    /// # Errors
    /// `InvalidParameter` if a rate is not positive or the variance is negative.
    pub fn new(lambda: f64, mu: f64, variance: Option<f64>) -> QueueResult<Self> {
        let lambda = positive("lambda", lambda)?;
        let mu = positive("mu", mu)?;
        let variance = match variance {
            Some(v) => non_negative("variance", v)?,
            None => 1.0 / (mu * mu),
        };
        Ok(Self {
            lambda,
            mu,
            variance,
            query: StateQuery::NONE,
        })
    }

    /// Service time given by its standard deviation σ.
    ///
    /// # Errors
    /// `InvalidParameter` if a rate is not positive or σ is negative.
    pub fn with_std_dev(lambda: f64, mu: f64, std_dev: f64) -> QueueResult<Self> {
        let sigma = non_negative("std_dev", std_dev)?;
        Self::new(lambda, mu, Some(sigma * sigma))
    }

    with_query!();

    /// Arrival rate λ.
    #[must_use]
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Service rate μ.
    #[must_use]
    pub const fn mu(&self) -> f64 {
        self.mu
    }

    /// Service-time variance σ².
    #[must_use]
    pub const fn variance(&self) -> f64 {
        self.variance
    }
}

/// M/D/1 parameters: constant service time `1/μ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Md1Params {
    pub(crate) lambda: f64,
    pub(crate) mu: f64,
    pub(crate) query: StateQuery,
}

impl Md1Params {
    /// # Errors
    /// `InvalidParameter` if either rate is not a positive finite number.
    pub fn new(lambda: f64, mu: f64) -> QueueResult<Self> {
        Ok(Self {
            lambda: positive("lambda", lambda)?,
            mu: positive("mu", mu)?,
            query: StateQuery::NONE,
        })
    }

    with_query!();

    /// The equivalent M/G/1 record with zero service variance.
    #[must_use]
    pub fn as_mg1(&self) -> Mg1Params {
        Mg1Params {
            lambda: self.lambda,
            mu: self.mu,
            variance: 0.0,
            query: self.query,
        }
    }
}

/// Non-preemptive priority M/M/1 parameters.
///
/// Classes are listed from highest to lowest priority and share one
/// exponential server of rate μ.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityParams {
    pub(crate) arrival_rates: Vec<f64>,
    pub(crate) mu: f64,
    pub(crate) query: StateQuery,
}

impl PriorityParams {
    /// # Errors
    /// `InvalidParameter` if there are no classes, a class rate is negative,
    /// all class rates are zero, or μ is not positive.
    pub fn new(arrival_rates: Vec<f64>, mu: f64) -> QueueResult<Self> {
        if arrival_rates.is_empty() {
            return Err(QueueError::invalid(
                "lambdas",
                "at least one priority class is required",
            ));
        }
        for (i, &rate) in arrival_rates.iter().enumerate() {
            non_negative(&format!("lambda{}", i + 1), rate)?;
        }
        if arrival_rates.iter().all(|&rate| rate == 0.0) {
            return Err(QueueError::invalid(
                "lambdas",
                "at least one class must have a positive arrival rate",
            ));
        }
        Ok(Self {
            arrival_rates,
            mu: positive("mu", mu)?,
            query: StateQuery::NONE,
        })
    }

    /// The common two-class case.
    ///
    /// # Errors
    /// See [`PriorityParams::new`].
    pub fn two_class(lambda1: f64, lambda2: f64, mu: f64) -> QueueResult<Self> {
        Self::new(vec![lambda1, lambda2], mu)
    }

    with_query!();

    /// Per-class arrival rates, highest priority first.
    #[must_use]
    pub fn arrival_rates(&self) -> &[f64] {
        &self.arrival_rates
    }

    /// Total arrival rate over all classes.
    #[must_use]
    pub fn total_arrival_rate(&self) -> f64 {
        self.arrival_rates.iter().sum()
    }

    /// Service rate μ.
    #[must_use]
    pub const fn mu(&self) -> f64 {
        self.mu
    }
}

/// Parameters for exactly one model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelParameters {
    /// M/M/1.
    Mm1(Mm1Params),
    /// M/M/2.
    Mm2(Mm2Params),
    /// M/M/1/N.
    Mm1n(Mm1nParams),
    /// M/G/1.
    Mg1(Mg1Params),
    /// M/D/1.
    Md1(Md1Params),
    /// Priority M/M/1.
    Priority(PriorityParams),
}

impl From<Mm1Params> for ModelParameters {
    fn from(p: Mm1Params) -> Self {
        Self::Mm1(p)
    }
}

impl From<Mm2Params> for ModelParameters {
    fn from(p: Mm2Params) -> Self {
        Self::Mm2(p)
    }
}

impl From<Mm1nParams> for ModelParameters {
    fn from(p: Mm1nParams) -> Self {
        Self::Mm1n(p)
    }
}

impl From<Mg1Params> for ModelParameters {
    fn from(p: Mg1Params) -> Self {
        Self::Mg1(p)
    }
}

impl From<Md1Params> for ModelParameters {
    fn from(p: Md1Params) -> Self {
        Self::Md1(p)
    }
}

impl From<PriorityParams> for ModelParameters {
    fn from(p: PriorityParams) -> Self {
        Self::Priority(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_rejects_zero_negative_and_nan() {
        assert!(Mm1Params::new(0.0, 5.0).is_err());
        assert!(Mm1Params::new(4.0, -1.0).is_err());
        assert!(Mm1Params::new(f64::NAN, 5.0).is_err());
        assert!(Mm1Params::new(4.0, f64::INFINITY).is_err());
        assert!(Mm1Params::new(4.0, 5.0).is_ok());
    }

    #[test]
    fn test_invalid_names_offending_parameter() {
        let err = Mm2Params::new(1.0, 2.0, 0.0).unwrap_err();
        match err {
            QueueError::InvalidParameter { parameter, .. } => assert_eq!(parameter, "mu2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unstable_rates_are_accepted_at_construction() {
        // Stability belongs to evaluation.
        assert!(Mm1Params::new(5.0, 5.0).is_ok());
    }

    #[test]
    fn test_mm2_ordered_rates() {
        let p = Mm2Params::new(1.0, 2.0, 3.0).unwrap();
        assert_eq!(p.ordered_rates(), (3.0, 2.0));
        assert!((p.total_rate() - 5.0).abs() < f64::EPSILON);
        assert_eq!(p.mode(), Mm2Mode::Heterogeneous);
    }

    #[test]
    fn test_mm2_mode_from_str() {
        assert_eq!("symmetric".parse::<Mm2Mode>().unwrap(), Mm2Mode::Symmetric);
        assert_eq!(
            "Heterogeneous".parse::<Mm2Mode>().unwrap(),
            Mm2Mode::Heterogeneous
        );
        assert!("harmonic".parse::<Mm2Mode>().is_err());
    }

    #[test]
    fn test_mm1n_capacity_must_be_positive_integer() {
        assert!(Mm1nParams::new(4.0, 5.0, 0).is_err());
        assert!(Mm1nParams::from_real_capacity(4.0, 5.0, 2.5).is_err());
        assert!(Mm1nParams::from_real_capacity(4.0, 5.0, -3.0).is_err());
        assert!(Mm1nParams::from_real_capacity(4.0, 5.0, f64::NAN).is_err());
        let p = Mm1nParams::from_real_capacity(4.0, 5.0, 3.0).unwrap();
        assert_eq!(p.capacity(), 3);
    }

    #[test]
    fn test_mg1_variance_default_and_std_dev() {
        let p = Mg1Params::new(1.0, 4.0, None).unwrap();
        assert!((p.variance() - 1.0 / 16.0).abs() < 1e-15);

        let p = Mg1Params::with_std_dev(1.0, 4.0, 0.5).unwrap();
        assert!((p.variance() - 0.25).abs() < 1e-15);

        assert!(Mg1Params::new(1.0, 4.0, Some(-0.1)).is_err());
        assert!(Mg1Params::new(1.0, 4.0, Some(0.0)).is_ok());
    }

    #[test]
    fn test_md1_as_mg1_has_zero_variance() {
        let p = Md1Params::new(2.0, 3.0).unwrap().with_pn(2);
        let mg1 = p.as_mg1();
        assert!(mg1.variance().abs() < f64::EPSILON);
        assert_eq!(mg1.query().pn, Some(2));
    }

    #[test]
    fn test_priority_validation() {
        assert!(PriorityParams::new(vec![], 5.0).is_err());
        assert!(PriorityParams::two_class(0.0, 0.0, 5.0).is_err());
        assert!(PriorityParams::two_class(-1.0, 2.0, 5.0).is_err());
        assert!(PriorityParams::two_class(1.0, 2.0, 0.0).is_err());

        let p = PriorityParams::two_class(1.0, 0.0, 5.0).unwrap();
        assert!((p.total_arrival_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_query_builders() {
        let p = Mm1Params::new(1.0, 2.0).unwrap().with_pn(3).with_pax(4);
        assert_eq!(
            p.query(),
            StateQuery {
                pn: Some(3),
                pax: Some(4)
            }
        );
    }
}
