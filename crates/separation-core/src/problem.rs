//! Arena holding the variables and constraints of one projection problem.

use crate::constraint::{Constraint, ConstraintId};
use crate::error::{Result, SeparationError};
use crate::variable::{Variable, VariableId};

/// Variables and separation constraints, addressed by stable index handles.
///
/// Variables and constraints are never removed, so every handle stays valid
/// for the lifetime of the problem. The same problem can be projected
/// repeatedly with updated desired positions.
///
/// # Example
///
/// ```
/// use separation_core::SeparationProblem;
///
/// let mut problem = SeparationProblem::new();
/// let a = problem.add_variable(0.0, 0.0);
/// let b = problem.add_variable(0.0, 2.0);
/// let c = problem.add_constraint(a, b, 2.0).unwrap();
///
/// assert_eq!(problem.variable(a).outgoing(), &[c]);
/// assert_eq!(problem.variable(b).incoming(), &[c]);
/// assert!(problem.is_feasible(1e-9));
/// assert_eq!(problem.objective(), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeparationProblem {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl SeparationProblem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty problem with room for the given number of elements.
    pub fn with_capacity(variables: usize, constraints: usize) -> Self {
        Self {
            variables: Vec::with_capacity(variables),
            constraints: Vec::with_capacity(constraints),
        }
    }

    /// Adds a variable currently at `position` that would like to be at `desired`.
    pub fn add_variable(&mut self, desired: f64, position: f64) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(Variable::new(desired, position));
        id
    }

    /// Adds the constraint `right - left >= gap` and registers it with both endpoints.
    ///
    /// # Errors
    ///
    /// Fails when an endpoint is unknown, when both endpoints are the same
    /// variable, or when the gap is negative or not finite.
    pub fn add_constraint(
        &mut self,
        left: VariableId,
        right: VariableId,
        gap: f64,
    ) -> Result<ConstraintId> {
        self.check_variable(left)?;
        self.check_variable(right)?;
        if left == right {
            return Err(SeparationError::SelfLoop(left));
        }
        if !gap.is_finite() {
            return Err(SeparationError::NonFinite(format!(
                "gap between {left} and {right}"
            )));
        }
        if gap < 0.0 {
            return Err(SeparationError::NegativeGap { left, right, gap });
        }

        let id = ConstraintId(self.constraints.len());
        self.constraints.push(Constraint::new(left, right, gap));
        self.variables[left.0].push_outgoing(id);
        self.variables[right.0].push_incoming(id);
        Ok(id)
    }

    fn check_variable(&self, v: VariableId) -> Result<()> {
        if v.0 < self.variables.len() {
            Ok(())
        } else {
            Err(SeparationError::UnknownVariable(v))
        }
    }

    /// Checks that every desired position and position is finite.
    pub fn validate(&self) -> Result<()> {
        for (i, v) in self.variables.iter().enumerate() {
            if !v.desired().is_finite() {
                return Err(SeparationError::NonFinite(format!("desired position of v{i}")));
            }
            if !v.position().is_finite() {
                return Err(SeparationError::NonFinite(format!("position of v{i}")));
            }
        }
        Ok(())
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        &mut self.variables[id.0]
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> &mut Constraint {
        &mut self.constraints[id.0]
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn variable_ids(&self) -> impl ExactSizeIterator<Item = VariableId> {
        (0..self.variables.len()).map(VariableId)
    }

    pub fn constraint_ids(&self) -> impl ExactSizeIterator<Item = ConstraintId> {
        (0..self.constraints.len()).map(ConstraintId)
    }

    /// Updates the target of a variable ahead of the next projection.
    pub fn set_desired(&mut self, id: VariableId, desired: f64) {
        self.variables[id.0].set_desired(desired);
    }

    /// Moves a variable. Callers must keep the configuration feasible.
    pub fn set_position(&mut self, id: VariableId, position: f64) {
        self.variables[id.0].set_position(position);
    }

    /// Current positions, indexed by variable.
    pub fn positions(&self) -> Vec<f64> {
        self.variables.iter().map(Variable::position).collect()
    }

    /// Desired positions, indexed by variable.
    pub fn desired(&self) -> Vec<f64> {
        self.variables.iter().map(Variable::desired).collect()
    }

    /// Sum of squared deviations of positions from desired positions.
    pub fn objective(&self) -> f64 {
        self.variables.iter().map(Variable::deviation).sum()
    }

    /// Signed slack of a constraint at the current positions.
    pub fn slack(&self, id: ConstraintId) -> f64 {
        let c = &self.constraints[id.0];
        c.slack(
            self.variables[c.left().0].position(),
            self.variables[c.right().0].position(),
        )
    }

    /// Largest amount by which any constraint falls short of its gap.
    pub fn max_violation(&self) -> f64 {
        self.constraint_ids()
            .map(|c| (-self.slack(c)).max(0.0))
            .fold(0.0, f64::max)
    }

    /// Constraints violated by more than `tolerance`.
    pub fn violated_constraints(&self, tolerance: f64) -> Vec<ConstraintId> {
        self.constraint_ids()
            .filter(|&c| self.slack(c) < -tolerance)
            .collect()
    }

    pub fn is_feasible(&self, tolerance: f64) -> bool {
        self.max_violation() <= tolerance
    }

    /// Number of constraints currently held as equalities.
    pub fn active_count(&self) -> usize {
        self.constraints.iter().filter(|c| c.is_active()).count()
    }

    /// Forgets the active set left behind by a previous projection.
    pub fn reset_active_set(&mut self) {
        for c in &mut self.constraints {
            c.set_active(false);
        }
    }
}
