//! Feasible projection onto separation constraints.
//!
//! Moves variables as little as possible (least squares) from their desired
//! positions while keeping every constraint `right - left >= gap` satisfied.
//!
//! # Example
//!
//! ```rust
//! use separation::prelude::*;
//!
//! let mut problem = SeparationProblem::new();
//! let a = problem.add_variable(0.0, 0.0);
//! let b = problem.add_variable(0.0, 2.0);
//! problem.add_constraint(a, b, 2.0).unwrap();
//!
//! let result = ProjectionSolver::default().solve(&mut problem).unwrap();
//! assert!(result.is_converged());
//! assert_eq!(problem.positions(), vec![-1.0, 1.0]);
//! ```

pub use separation_core::{
    Component, Constraint, ConstraintId, Partition, Result, SeparationError, SeparationProblem,
    Variable, VariableId,
};

pub use separation_config::{ConfigError, EnvironmentMode, SolverConfig, TerminationConfig};

pub use separation_solver::{
    IterationLimitTermination, OrTermination, ProjectionSolver, SolveResult, SolveStatistics,
    Termination, TimeTermination,
};

#[cfg(feature = "console")]
pub mod console;

mod solve;
pub use solve::{solve, solve_with_config_file, CONFIG_FILE};

pub mod prelude {
    pub use super::{solve, ProjectionSolver, SolveResult, SolverConfig};
    pub use super::{ConstraintId, SeparationError, SeparationProblem, VariableId};
}
