//! # queuecalc
//!
//! Closed-form steady-state metrics for classical queueing models.
//!
//! Supported models:
//! - M/M/1 and M/D/1 single-server queues
//! - M/M/2 with identical or heterogeneous servers
//! - M/M/1/N with finite system capacity
//! - M/G/1 via the Pollaczek-Khinchine formula
//! - M/M/1 with non-preemptive priority classes
//!
//! ## Example
//!
//! ```rust
//! use queuecalc::prelude::*;
//!
//! let params = Mm1nParams::new(4.0, 5.0, 3).unwrap();
//! let metrics = evaluate(&params.into()).unwrap();
//! assert!(metrics.lambda_eff.is_some());
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Formulas are written as published
    clippy::imprecise_flops,
    clippy::many_single_char_names,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod laws;
pub mod metrics;
pub mod models;
pub mod params;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ModelSpec, OutputFormat, ScenarioConfig};
    pub use crate::error::{QueueError, QueueResult};
    pub use crate::laws::LittlesLaw;
    pub use crate::metrics::{ClassMetrics, QueueMetrics, StateProbability};
    pub use crate::models::{evaluate, ModelKind, QueueModel};
    pub use crate::params::{
        Md1Params, Mg1Params, Mm1Params, Mm1nParams, Mm2Mode, Mm2Params, ModelParameters,
        PriorityParams, StateQuery,
    };
}

/// Re-export for public API
pub use error::{QueueError, QueueResult};
