//! Error types for LoadForge

use thiserror::Error;

/// Rejected input data, raised before any model is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required numeric field was absent from an item record.
    #[error("item record {record}: missing {field}")]
    MissingField { record: usize, field: &'static str },

    /// A numeric field was below zero.
    #[error("item record {record}: {field} must not be negative (got {value})")]
    Negative {
        record: usize,
        field: &'static str,
        value: f64,
    },

    /// A numeric field was NaN or infinite.
    #[error("item record {record}: {field} is not a finite number")]
    NotFinite { record: usize, field: &'static str },

    /// A vehicle capacity was zero, negative or not finite.
    #[error("vehicle type '{code}': {field} must be a positive finite number (got {value})")]
    InvalidCapacity {
        code: String,
        field: &'static str,
        value: f64,
    },

    /// A fleet allocation referenced a code missing from the catalog.
    #[error("unknown vehicle type '{0}'")]
    UnknownVehicleType(String),

    /// Two catalog entries share a code.
    #[error("duplicate vehicle type '{0}'")]
    DuplicateVehicleType(String),

    /// Two items or two slots passed to one solve share an id.
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: usize },
}

/// Main error type for LoadForge operations
#[derive(Debug, Error)]
pub enum LoadForgeError {
    /// Input records or fleet description rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Solver was cancelled before producing any assignment
    #[error("Solver was cancelled")]
    Cancelled,

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LoadForge operations
pub type Result<T> = std::result::Result<T, LoadForgeError>;
