//! Error types for aliensim.
//!
//! The estimator itself never fails: it coerces its inputs to usable
//! defaults. Errors only come from the stateful city model, strict request
//! validation at the HTTP boundary, and the transport itself.

use thiserror::Error;

/// Validation errors that occur during input validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Confidence value {value} is out of range [0.0, 1.0]")]
    ConfidenceOutOfRange {
        value: f64,
    },

    #[error("Field '{field}' must be positive, got {value}")]
    NonPositive {
        field: String,
        value: f64,
    },

    #[error("Field '{field}' must be a finite number")]
    NotFinite {
        field: String,
    },

    #[error("Inputs would overflow '{field}' past the largest representable number")]
    Overflow {
        field: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Field '{field}' is malformed: {reason}")]
    Malformed {
        field: String,
        reason: String,
    },

    #[error("Horizon of {years} years exceeds the maximum of {max}")]
    HorizonTooLong {
        years: u32,
        max: u32,
    },

    #[error("Too many context factors: {actual} (max {max})")]
    TooManyFactors {
        actual: usize,
        max: usize,
    },

    #[error("Series '{series}' needs at least 2 points, got {points}")]
    InsufficientHistory {
        series: String,
        points: usize,
    },
}

/// Execution errors that occur while running an operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("City model has not been created yet")]
    CityModelMissing,

    #[error("Advisor failed: {reason}")]
    AdvisorFailed {
        reason: String,
    },

    #[error("Poisoned lock: {context}")]
    PoisonedLock {
        context: String,
    },
}

/// Transport errors for client-server communication.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("Failed to bind {addr}: {message}")]
    BindFailed {
        addr: String,
        message: String,
    },

    #[error("Failed to serialize payload: {message}")]
    SerializationFailed {
        message: String,
    },

    #[error("Failed to deserialize payload: {message}")]
    DeserializationFailed {
        message: String,
    },
}

/// Top-level error type for aliensim.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl SimError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if the failure means the caller asked for something that
    /// does not exist yet.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Execution(ExecutionError::CityModelMissing))
    }
}

/// Result type alias for aliensim operations.
pub type SimResult<T> = Result<T, SimError>;
