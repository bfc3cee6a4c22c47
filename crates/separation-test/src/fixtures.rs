//! Small hand-built problems.
//!
//! # Example
//!
//! ```
//! use separation_test::fixtures::chain;
//!
//! let problem = chain(&[0.0, 0.0, 0.0], 1.0);
//! assert_eq!(problem.positions(), vec![0.0, 1.0, 2.0]);
//! assert_eq!(problem.constraint_count(), 2);
//! ```

use separation_core::SeparationProblem;

/// Variables with no constraints, each starting at its desired position
/// shifted by one.
pub fn unconstrained(desired: &[f64]) -> SeparationProblem {
    let mut problem = SeparationProblem::new();
    for &d in desired {
        problem.add_variable(d, d + 1.0);
    }
    problem
}

/// Two variables with `x1 - x0 >= gap`, starting at the given positions.
pub fn pair(desired: [f64; 2], positions: [f64; 2], gap: f64) -> SeparationProblem {
    let mut problem = SeparationProblem::new();
    let a = problem.add_variable(desired[0], positions[0]);
    let b = problem.add_variable(desired[1], positions[1]);
    problem
        .add_constraint(a, b, gap)
        .expect("fixture constraint is valid");
    problem
}

/// A chain `x[i+1] - x[i] >= gap`, starting tightly packed from zero.
pub fn chain(desired: &[f64], gap: f64) -> SeparationProblem {
    let mut problem = SeparationProblem::with_capacity(desired.len(), desired.len());
    let vars: Vec<_> = desired
        .iter()
        .enumerate()
        .map(|(i, &d)| problem.add_variable(d, i as f64 * gap))
        .collect();
    for w in vars.windows(2) {
        problem
            .add_constraint(w[0], w[1], gap)
            .expect("fixture constraint is valid");
    }
    problem
}
