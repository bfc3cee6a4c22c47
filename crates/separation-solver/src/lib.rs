//! Separation Solver - feasible projection engine
//!
//! This crate provides the active-set projection solver:
//! - [`Block`] and [`BlockSet`]: rigid groups of variables and their partition
//! - [`safe_step`]: the feasibility-preserving step size
//! - [`ProjectionSolver`]: the advance/merge/split loop
//! - Termination conditions and solve statistics

pub mod block;
pub mod blocks;
pub mod projection;
pub mod safe_step;
pub mod scope;
pub mod statistics;
pub mod termination;


pub use block::Block;
pub use blocks::BlockSet;
pub use projection::ProjectionSolver;
pub use scope::SolverScope;
pub use statistics::{SolveResult, SolveStatistics};
pub use termination::{
    IterationLimitTermination, OrTermination, Termination, TimeTermination,
};
