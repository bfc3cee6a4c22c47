//! Separation Core - data model for feasible projection
//!
//! This crate provides the problem representation consumed by the solver:
//! - [`Variable`]: desired position, current position, block offset
//! - [`Constraint`]: directed separation `right - left >= gap`
//! - [`SeparationProblem`]: index-addressed arenas of both
//! - [`Partition`]: independent connected components of a problem

pub mod constraint;
pub mod error;
pub mod partition;
pub mod problem;
pub mod variable;

#[cfg(test)]
mod problem_tests;

pub use constraint::{Constraint, ConstraintId};
pub use error::{Result, SeparationError};
pub use partition::{Component, Partition};
pub use problem::SeparationProblem;
pub use variable::{Incidence, Variable, VariableId};
