//! Errors surfaced by the engine and the spring-contact stepper.

use thiserror::Error;

use crate::types::Float;

/// Errors that can occur while building or stepping a simulation.
///
/// Every variant is fatal to the step that produced it: no caller state is
/// committed and nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A configuration, velocity or torque vector has the wrong length.
    #[error("{quantity} has dimension {actual}, model expects {expected}")]
    ConfigurationMismatch {
        /// Which vector was malformed, e.g. "configuration".
        quantity: String,
        /// Dimension required by the model.
        expected: usize,
        /// Dimension that was supplied.
        actual: usize,
    },

    /// A named frame does not exist in the model.
    #[error("unknown frame: {name}")]
    UnknownFrame {
        /// Name that failed to resolve.
        name: String,
    },

    /// Acceleration or velocity went non-finite, or the dynamics could not
    /// be solved.
    #[error("numerical divergence: {reason}")]
    NumericalDivergence {
        /// What went wrong.
        reason: String,
    },

    /// Invalid stepper configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The mechanism description is inconsistent.
    #[error("invalid model: {reason}")]
    InvalidModel {
        /// What is wrong with the model.
        reason: String,
    },
}

impl SimError {
    pub fn mismatch(quantity: &str, expected: usize, actual: usize) -> Self {
        Self::ConfigurationMismatch {
            quantity: quantity.to_string(),
            expected,
            actual,
        }
    }

    pub fn unknown_frame(name: impl Into<String>) -> Self {
        Self::UnknownFrame { name: name.into() }
    }

    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::NumericalDivergence {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::NumericalDivergence { .. })
    }
}

/// Fail with `ConfigurationMismatch` unless `actual == expected`.
pub fn check_dimension(quantity: &str, expected: usize, actual: usize) -> Result<(), SimError> {
    if expected != actual {
        return Err(SimError::mismatch(quantity, expected, actual));
    }
    Ok(())
}

/// Fail with `NumericalDivergence` if any entry is NaN or infinite.
pub fn check_finite<'a>(
    quantity: &str,
    values: impl IntoIterator<Item = &'a Float>,
) -> Result<(), SimError> {
    if let Some((i, x)) = values.into_iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(SimError::diverged(format!("{quantity}[{i}] = {x}")));
    }
    Ok(())
}
