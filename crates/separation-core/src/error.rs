//! Error types for separation problems

use thiserror::Error;

use crate::{ConstraintId, VariableId};

/// Main error type for building and solving separation problems
#[derive(Debug, Error, PartialEq)]
pub enum SeparationError {
    /// A constraint names a variable that is not part of the problem
    #[error("Unknown variable: {0}")]
    UnknownVariable(VariableId),

    /// A constraint names the same variable on both sides
    #[error("Constraint endpoints must differ, got {0} on both sides")]
    SelfLoop(VariableId),

    /// Separation gaps are minimum distances and cannot be negative
    #[error("Negative gap {gap} between {left} and {right}")]
    NegativeGap {
        left: VariableId,
        right: VariableId,
        gap: f64,
    },

    /// A desired position, position or gap is NaN or infinite
    #[error("Non-finite value for {0}")]
    NonFinite(String),

    /// The starting configuration already violates a constraint
    #[error("Starting configuration violates {constraint} by {violation}")]
    InfeasibleStart {
        constraint: ConstraintId,
        violation: f64,
    },

    /// A structural or numerical invariant was broken while solving
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for separation operations
pub type Result<T> = std::result::Result<T, SeparationError>;
