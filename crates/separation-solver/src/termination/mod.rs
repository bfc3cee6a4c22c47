//! Termination conditions for the projection loop.
//!
//! Projection converges on its own for feasible input; a termination is an
//! external budget. It is checked after each outer cycle, so positions are
//! always feasible when it fires.

mod composite;
mod iteration;
mod time;

use std::fmt::Debug;

use separation_config::TerminationConfig;

use crate::scope::SolverScope;

pub use composite::OrTermination;
pub use iteration::IterationLimitTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool;
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        (**self).is_terminated(solver_scope)
    }
}

/// Builds the termination described by `config`, if it sets any limit.
pub fn from_config(config: &TerminationConfig) -> Option<Box<dyn Termination>> {
    let iterations = config.iteration_limit.map(IterationLimitTermination::new);
    let time = config.time_limit().map(TimeTermination::new);
    match (iterations, time) {
        (Some(i), Some(t)) => Some(Box::new(OrTermination::new(i, t))),
        (Some(i), None) => Some(Box::new(i)),
        (None, Some(t)) => Some(Box::new(t)),
        (None, None) => None,
    }
}
