//! Scalar layout variables.

use std::fmt;

use smallvec::SmallVec;

use crate::constraint::ConstraintId;

/// Stable handle to a [`Variable`] inside a [`SeparationProblem`](crate::SeparationProblem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableId(pub usize);

impl VariableId {
    /// Returns the arena index of this variable.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Incident constraint list; most layout variables touch only a handful.
pub type Incidence = SmallVec<[ConstraintId; 4]>;

/// A scalar variable with a desired and a current (feasible) position.
///
/// `position` is always `reference + offset` of the block that currently
/// owns the variable; the solver keeps both fields in sync.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    desired: f64,
    position: f64,
    offset: f64,
    outgoing: Incidence,
    incoming: Incidence,
}

impl Variable {
    /// Creates a variable at `position` that would like to sit at `desired`.
    pub fn new(desired: f64, position: f64) -> Self {
        Self {
            desired,
            position,
            offset: 0.0,
            outgoing: Incidence::new(),
            incoming: Incidence::new(),
        }
    }

    pub fn desired(&self) -> f64 {
        self.desired
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Displacement from the owning block's reference position.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Constraints where this variable is the left endpoint.
    pub fn outgoing(&self) -> &[ConstraintId] {
        &self.outgoing
    }

    /// Constraints where this variable is the right endpoint.
    pub fn incoming(&self) -> &[ConstraintId] {
        &self.incoming
    }

    /// Iterates over every incident constraint, outgoing first.
    pub fn incident(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.outgoing.iter().chain(self.incoming.iter()).copied()
    }

    /// Squared deviation from the desired position.
    pub fn deviation(&self) -> f64 {
        let d = self.position - self.desired;
        d * d
    }

    pub fn set_desired(&mut self, desired: f64) {
        self.desired = desired;
    }

    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub(crate) fn push_outgoing(&mut self, c: ConstraintId) {
        self.outgoing.push(c);
    }

    pub(crate) fn push_incoming(&mut self, c: ConstraintId) {
        self.incoming.push(c);
    }
}
