//! Outer-iteration count termination.

use super::Termination;
use crate::scope::SolverScope;

/// Terminates after a number of outer advance/split cycles.
///
/// # Example
///
/// ```
/// use separation_solver::termination::IterationLimitTermination;
///
/// // Stop after 100 cycles
/// let term = IterationLimitTermination::new(100);
/// ```
#[derive(Debug, Clone)]
pub struct IterationLimitTermination {
    limit: u64,
}

impl IterationLimitTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for IterationLimitTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        solver_scope.iterations() >= self.limit
    }
}
