//! Feasible projection onto separation constraints.
//!
//! Logging levels:
//! - **INFO**: Solve start/end with problem scale and outcome
//! - **DEBUG**: Every merge, split and completed cycle
//! - **TRACE**: Safe-step evaluation per constraint

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, info};

use separation_config::SolverConfig;
use separation_core::{
    ConstraintId, Partition, Result, SeparationError, SeparationProblem,
};

use crate::blocks::BlockSet;
use crate::safe_step::min_safe_alpha;
use crate::scope::SolverScope;
use crate::statistics::SolveResult;
use crate::termination::{self, Termination};

/// Moves variables from a feasible configuration as close as possible to
/// their desired positions without ever leaving the feasible region.
///
/// Each outer cycle advances every block towards its optimum, merging blocks
/// whenever an inactive constraint would otherwise be violated, then splits
/// blocks whose tree holds a constraint with a negative multiplier. Solving
/// stops once a cycle performs no split.
///
/// # Example
///
/// ```
/// use separation_core::SeparationProblem;
/// use separation_solver::ProjectionSolver;
///
/// let mut problem = SeparationProblem::new();
/// let a = problem.add_variable(0.0, 0.0);
/// let b = problem.add_variable(0.0, 2.0);
/// let c = problem.add_constraint(a, b, 2.0).unwrap();
///
/// let result = ProjectionSolver::default().solve(&mut problem).unwrap();
///
/// assert!(result.is_converged());
/// assert_eq!(problem.positions(), vec![-1.0, 1.0]);
/// assert!(problem.constraint(c).is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectionSolver {
    config: SolverConfig,
}

impl ProjectionSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Projects `problem` in place.
    ///
    /// The current positions must satisfy every constraint. Constraints
    /// left active by a previous solve are reused, so repeated solves with
    /// updated desired positions start from the previous active set.
    ///
    /// # Errors
    ///
    /// Fails on non-finite input, on an infeasible starting configuration
    /// (when `validate_start` is set), and on invariant violations detected
    /// in `full_assert` mode.
    pub fn solve(&self, problem: &mut SeparationProblem) -> Result<SolveResult> {
        problem.validate()?;
        if self.config.validate_start {
            self.check_start(problem)?;
        }

        info!(
            event = "solve_start",
            variable_count = problem.variable_count(),
            constraint_count = problem.constraint_count(),
            parallel = self.config.parallel_components,
        );

        let result = if self.config.parallel_components {
            self.solve_partitioned(problem)?
        } else {
            self.solve_component(problem)?
        };

        info!(
            event = "solve_end",
            objective = result.statistics.final_objective,
            iterations = result.statistics.iterations,
            merges = result.statistics.merges,
            splits = result.statistics.splits,
            duration_ms = result.statistics.duration.as_millis() as u64,
            terminated_early = result.terminated_early,
        );
        Ok(result)
    }

    /// Solves each connected component independently on the rayon pool and
    /// writes the results back.
    pub fn solve_partitioned(&self, problem: &mut SeparationProblem) -> Result<SolveResult> {
        let mut partition = Partition::of(problem);
        debug!(components = partition.len(), "Partitioned problem");

        let results: Vec<SolveResult> = partition
            .components
            .par_iter_mut()
            .map(|component| self.solve_component(&mut component.problem))
            .collect::<Result<_>>()?;
        partition.write_back(problem);

        let mut merged = SolveResult::default();
        for result in &results {
            merged.statistics.absorb(&result.statistics);
            merged.terminated_early |= result.terminated_early;
        }
        Ok(merged)
    }

    fn check_start(&self, problem: &SeparationProblem) -> Result<()> {
        let tolerance = self.config.feasibility_tolerance;
        match problem.violated_constraints(tolerance).first() {
            Some(&constraint) => Err(SeparationError::InfeasibleStart {
                constraint,
                violation: -problem.slack(constraint),
            }),
            None => Ok(()),
        }
    }

    fn solve_component(&self, problem: &mut SeparationProblem) -> Result<SolveResult> {
        let termination = self
            .config
            .termination
            .as_ref()
            .and_then(termination::from_config);

        let mut scope = SolverScope::new();
        scope.start_solving(problem.objective());

        let mut blocks = BlockSet::init(problem, self.config.feasibility_tolerance);
        let mut inactive: BTreeSet<ConstraintId> = problem
            .constraint_ids()
            .filter(|&c| !problem.constraint(c).is_active())
            .collect();

        let mut terminated_early = false;
        loop {
            self.make_optimal(&mut blocks, &mut inactive, problem, &mut scope)?;
            let split = self.split_blocks(&mut blocks, &mut inactive, problem, &mut scope)?;
            scope.increment_iterations();
            debug!(
                iteration = scope.iterations(),
                blocks = blocks.len(),
                inactive = inactive.len(),
                objective = problem.objective(),
                "Cycle complete"
            );
            if !split {
                break;
            }
            if termination
                .as_ref()
                .is_some_and(|t| t.is_terminated(&scope))
            {
                terminated_early = true;
                break;
            }
        }

        Ok(SolveResult {
            statistics: scope.statistics(problem.objective()),
            terminated_early,
        })
    }

    /// Phase 1: advances every block towards its optimum, activating each
    /// constraint that would be violated first, until the full step is safe.
    fn make_optimal(
        &self,
        blocks: &mut BlockSet,
        inactive: &mut BTreeSet<ConstraintId>,
        problem: &mut SeparationProblem,
        scope: &mut SolverScope,
    ) -> Result<()> {
        let tolerance = self.config.feasibility_tolerance;
        while let Some((c, alpha)) = min_safe_alpha(inactive, blocks, problem, tolerance) {
            if alpha >= 1.0 {
                break;
            }
            self.make_active(c, alpha, blocks, problem)?;
            inactive.remove(&c);
            scope.record_merge();
        }
        blocks.advance(1.0, problem);
        self.assert_feasible(blocks, problem)
    }

    /// Moves all blocks a fraction `alpha` of the way to their optima, where
    /// `c` becomes tight, and merges the blocks at both ends of `c`.
    fn make_active(
        &self,
        c: ConstraintId,
        alpha: f64,
        blocks: &mut BlockSet,
        problem: &mut SeparationProblem,
    ) -> Result<()> {
        blocks.advance(alpha, problem);
        self.assert_feasible(blocks, problem)?;
        let merged = blocks.merge(c, problem);
        debug!(
            constraint = %c,
            alpha,
            block_size = blocks.get(merged).len(),
            "Activated constraint"
        );
        self.assert_blocks(blocks, problem)
    }

    /// Phase 2: computes multipliers in every block and splits each block at
    /// its most negative multiplier. Returns true if any block was split.
    fn split_blocks(
        &self,
        blocks: &mut BlockSet,
        inactive: &mut BTreeSet<ConstraintId>,
        problem: &mut SeparationProblem,
        scope: &mut SolverScope,
    ) -> Result<bool> {
        let mut to_split = Vec::new();
        for block in blocks.iter() {
            if block.len() < 2 {
                continue;
            }
            block.compute_multipliers(problem);
            if let Some((c, lm)) = block.min_multiplier(problem) {
                if lm < -self.config.multiplier_tolerance {
                    to_split.push(c);
                }
            }
        }

        for &c in &to_split {
            self.make_inactive(c, blocks, problem)?;
            inactive.insert(c);
            scope.record_split();
        }
        Ok(!to_split.is_empty())
    }

    /// Deactivates `c` and splits its block in two.
    fn make_inactive(
        &self,
        c: ConstraintId,
        blocks: &mut BlockSet,
        problem: &mut SeparationProblem,
    ) -> Result<()> {
        let multiplier = problem.constraint(c).multiplier();
        let (left, right) = blocks.split(c, problem);
        debug!(
            constraint = %c,
            multiplier,
            left_size = blocks.get(left).len(),
            right_size = blocks.get(right).len(),
            "Deactivated constraint"
        );
        self.assert_blocks(blocks, problem)
    }

    fn assert_feasible(&self, blocks: &BlockSet, problem: &SeparationProblem) -> Result<()> {
        if !self.config.is_asserting() {
            return Ok(());
        }
        let tolerance = self.config.feasibility_tolerance;
        if let Some(&c) = problem.violated_constraints(tolerance).first() {
            return Err(SeparationError::InvariantViolation(format!(
                "constraint {c} violated by {} after a step",
                -problem.slack(c)
            )));
        }
        blocks.check_invariants(problem, tolerance)
    }

    fn assert_blocks(&self, blocks: &BlockSet, problem: &SeparationProblem) -> Result<()> {
        if self.config.is_asserting() {
            blocks.check_invariants(problem, self.config.feasibility_tolerance)
        } else {
            Ok(())
        }
    }
}
