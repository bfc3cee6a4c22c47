//! Directed separation constraints.
//!
//! A constraint `(left, right, gap)` requires
//! `right.position - left.position >= gap`. While a constraint is active it
//! is held as an equality inside a single block and carries a Lagrange
//! multiplier.

use std::fmt;

use crate::variable::VariableId;

/// Stable handle to a [`Constraint`] inside a [`SeparationProblem`](crate::SeparationProblem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintId(pub usize);

impl ConstraintId {
    /// Returns the arena index of this constraint.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A separation constraint `right - left >= gap`.
///
/// # Example
///
/// ```
/// use separation_core::{Constraint, VariableId};
///
/// let c = Constraint::new(VariableId(0), VariableId(1), 2.0);
/// assert!(!c.is_active());
/// assert_eq!(c.violation(0.0, 1.5), 0.5);
/// assert_eq!(c.violation(0.0, 3.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    left: VariableId,
    right: VariableId,
    gap: f64,
    active: bool,
    multiplier: f64,
}

impl Constraint {
    /// Creates an inactive constraint. Use
    /// [`SeparationProblem::add_constraint`](crate::SeparationProblem::add_constraint)
    /// to register it with its endpoints.
    pub fn new(left: VariableId, right: VariableId, gap: f64) -> Self {
        Self {
            left,
            right,
            gap,
            active: false,
            multiplier: 0.0,
        }
    }

    pub fn left(&self) -> VariableId {
        self.left
    }

    pub fn right(&self) -> VariableId {
        self.right
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// True while the constraint is enforced as an equality.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lagrange multiplier; only meaningful while active.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Returns the endpoint opposite to `v`.
    pub fn other(&self, v: VariableId) -> VariableId {
        if v == self.left {
            self.right
        } else {
            self.left
        }
    }

    /// Signed slack `right - left - gap` for the given endpoint positions.
    #[inline]
    pub fn slack(&self, left_position: f64, right_position: f64) -> f64 {
        right_position - left_position - self.gap
    }

    /// How far the given positions fall short of the gap, or zero.
    #[inline]
    pub fn violation(&self, left_position: f64, right_position: f64) -> f64 {
        (-self.slack(left_position, right_position)).max(0.0)
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.multiplier = 0.0;
        }
    }

    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
    }
}
