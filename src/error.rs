//! Error types for queuecalc.
//!
//! Every evaluation returns `Result<T, QueueError>`; nothing in the engine
//! panics on bad input.

use thiserror::Error;

/// Result type alias for queuecalc operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Unified error type for all queuecalc operations.
///
/// The two engine kinds, [`QueueError::InvalidParameter`] and
/// [`QueueError::UnstableSystem`], are terminal for a single evaluation:
/// no partial metrics are ever returned alongside them.
#[derive(Debug, Error)]
pub enum QueueError {
    // ===== Engine Errors =====
    /// A required input is missing, non-finite, zero, negative or not an integer.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Offered load is not below service capacity.
    #[error(
        "Unstable system ({model}): offered load {offered_load:.6} must be less than capacity {capacity:.6}"
    )]
    UnstableSystem {
        /// Kendall notation of the model.
        model: String,
        /// Total arrival rate offered to the system.
        offered_load: f64,
        /// Total service capacity.
        capacity: f64,
    },

    // ===== Configuration Errors =====
    /// Invalid scenario configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueueError {
    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create an unstable-system error.
    #[must_use]
    pub fn unstable(model: impl Into<String>, offered_load: f64, capacity: f64) -> Self {
        Self::UnstableSystem {
            model: model.into(),
            offered_load,
            capacity,
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
