//! Confidence values with calibration semantics.
//!
//! Every estimate carries a confidence in `[0.0, 1.0]`. The value the
//! estimator emits is a fixed placeholder, not a statistic, and the
//! calibration mode records that so nobody mistakes it for a probability.
//!
//! On the wire a confidence is a bare number; anything read back from JSON
//! is marked [`CalibrationMode::Reported`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How to interpret the confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Fixed constant, independent of the inputs.
    Placeholder,

    /// Received from a collaborator; provenance unknown.
    Reported,
}

impl fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "placeholder"),
            Self::Reported => write!(f, "reported"),
        }
    }
}

/// Formalized uncertainty attached to an estimate.
///
/// # Examples
///
/// ```
/// use aliensim::{CalibrationMode, Confidence};
///
/// let conf = Confidence::placeholder();
/// assert_eq!(conf.value(), 0.8);
/// assert_eq!(conf.calibration(), CalibrationMode::Placeholder);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence {
    value: f64,
    calibration: CalibrationMode,
}

impl Confidence {
    /// Minimum valid confidence value.
    pub const MIN_VALUE: f64 = 0.0;

    /// Maximum valid confidence value.
    pub const MAX_VALUE: f64 = 1.0;

    /// Value of the placeholder confidence attached to every estimate.
    pub const PLACEHOLDER_VALUE: f64 = 0.8;

    /// Creates a new confidence with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ConfidenceOutOfRange` if the value is NaN or
    /// not in [0.0, 1.0].
    pub fn new(value: f64, calibration: CalibrationMode) -> Result<Self, ValidationError> {
        Self::validate_value(value)?;
        Ok(Self { value, calibration })
    }

    /// The fixed confidence every estimate carries.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            value: Self::PLACEHOLDER_VALUE,
            calibration: CalibrationMode::Placeholder,
        }
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub const fn calibration(&self) -> CalibrationMode {
        self.calibration
    }

    /// Returns true if this value was not derived from the inputs at all.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.calibration, CalibrationMode::Placeholder)
    }

    fn validate_value(value: f64) -> Result<(), ValidationError> {
        if value.is_nan() || !(Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
            return Err(ValidationError::ConfidenceOutOfRange { value });
        }
        Ok(())
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value, CalibrationMode::Reported)
    }
}

impl From<Confidence> for f64 {
    fn from(conf: Confidence) -> Self {
        conf.value
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.value, self.calibration)
    }
}
