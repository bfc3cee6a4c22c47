//! Composite termination.

use super::Termination;
use crate::scope::SolverScope;

/// Terminates when either of two terminations does.
///
/// # Examples
///
/// ```
/// use separation_solver::termination::{
///     IterationLimitTermination, OrTermination, TimeTermination,
/// };
///
/// // Stop after 1000 cycles or one second, whichever comes first
/// let term = OrTermination::new(
///     IterationLimitTermination::new(1000),
///     TimeTermination::seconds(1),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct OrTermination<A, B> {
    first: A,
    second: B,
}

impl<A, B> OrTermination<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Termination, B: Termination> Termination for OrTermination<A, B> {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        self.first.is_terminated(solver_scope) || self.second.is_terminated(solver_scope)
    }
}
