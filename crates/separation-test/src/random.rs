//! Seeded random feasible problems.
//!
//! Starting positions are drawn first; every constraint is then given a
//! gap no larger than the separation it already has, so the starting
//! configuration is always feasible and the constraint graph is acyclic in
//! position order.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use separation_core::{SeparationProblem, VariableId};

/// Builder for random feasible problems.
///
/// # Example
///
/// ```
/// use separation_test::RandomProblem;
///
/// let problem = RandomProblem::new(7).variables(12).constraints(20).build();
/// assert_eq!(problem.variable_count(), 12);
/// assert!(problem.is_feasible(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct RandomProblem {
    seed: u64,
    variables: usize,
    constraints: usize,
    spread: f64,
    tight_probability: f64,
}

impl RandomProblem {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            variables: 8,
            constraints: 10,
            spread: 10.0,
            tight_probability: 0.3,
        }
    }

    pub fn variables(mut self, n: usize) -> Self {
        self.variables = n;
        self
    }

    /// Number of constraints to attempt; fewer are created when there are
    /// fewer than two variables.
    pub fn constraints(mut self, n: usize) -> Self {
        self.constraints = n;
        self
    }

    /// Range of desired positions around the starting layout.
    pub fn spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Probability that a constraint starts exactly tight.
    pub fn tight_probability(mut self, p: f64) -> Self {
        self.tight_probability = p;
        self
    }

    pub fn build(&self) -> SeparationProblem {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut problem = SeparationProblem::with_capacity(self.variables, self.constraints);

        let mut x = 0.0;
        let mut positions = Vec::with_capacity(self.variables);
        for _ in 0..self.variables {
            positions.push(x);
            x += rng.random_range(0.0..3.0);
        }
        // Variable ids are unrelated to position order.
        positions.shuffle(&mut rng);
        for &p in &positions {
            let desired = p + rng.random_range(-self.spread..=self.spread);
            problem.add_variable(desired, p);
        }

        if self.variables < 2 {
            return problem;
        }
        for _ in 0..self.constraints {
            let a = rng.random_range(0..self.variables);
            let mut b = rng.random_range(0..self.variables - 1);
            if b >= a {
                b += 1;
            }
            let (left, right) = if positions[a] <= positions[b] {
                (VariableId(a), VariableId(b))
            } else {
                (VariableId(b), VariableId(a))
            };
            let room = positions[right.0] - positions[left.0];
            let gap = if rng.random_bool(self.tight_probability) {
                room
            } else {
                room * rng.random_range(0.0..=1.0)
            };
            problem
                .add_constraint(left, right, gap)
                .expect("generated constraint is valid");
        }
        problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_problem() {
        let a = RandomProblem::new(3).variables(10).constraints(15).build();
        let b = RandomProblem::new(3).variables(10).constraints(15).build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_problems_are_feasible() {
        for seed in 0..20 {
            let problem = RandomProblem::new(seed).variables(15).constraints(30).build();
            assert!(problem.is_feasible(0.0), "seed {seed}");
            assert_eq!(problem.constraint_count(), 30);
        }
    }

    #[test]
    fn test_single_variable_has_no_constraints() {
        let problem = RandomProblem::new(1).variables(1).constraints(5).build();
        assert_eq!(problem.constraint_count(), 0);
    }
}
