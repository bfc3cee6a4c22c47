//! Solve statistics and results.

use std::time::Duration;

/// Counters collected over one projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveStatistics {
    /// Outer advance/split cycles.
    pub iterations: u64,
    /// Constraints activated (block merges).
    pub merges: u64,
    /// Constraints deactivated (block splits).
    pub splits: u64,
    /// Wall time spent solving.
    pub duration: Duration,
    /// Sum of squared deviations before solving.
    pub initial_objective: f64,
    /// Sum of squared deviations after solving.
    pub final_objective: f64,
}

impl SolveStatistics {
    /// Objective reduction achieved by the solve.
    pub fn improvement(&self) -> f64 {
        self.initial_objective - self.final_objective
    }

    /// Folds the statistics of an independently solved component into these.
    ///
    /// Counters and objectives add up; iterations and duration take the
    /// maximum, since components run side by side.
    pub fn absorb(&mut self, other: &SolveStatistics) {
        self.iterations = self.iterations.max(other.iterations);
        self.merges += other.merges;
        self.splits += other.splits;
        self.duration = self.duration.max(other.duration);
        self.initial_objective += other.initial_objective;
        self.final_objective += other.final_objective;
    }
}

/// Outcome of a projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveResult {
    pub statistics: SolveStatistics,
    /// True when a termination limit stopped the solve before convergence.
    /// Positions are feasible but not necessarily optimal.
    pub terminated_early: bool,
}

impl SolveResult {
    pub fn is_converged(&self) -> bool {
        !self.terminated_early
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb() {
        let mut total = SolveStatistics {
            iterations: 2,
            merges: 3,
            splits: 1,
            duration: Duration::from_millis(5),
            initial_objective: 10.0,
            final_objective: 4.0,
        };
        total.absorb(&SolveStatistics {
            iterations: 4,
            merges: 1,
            splits: 0,
            duration: Duration::from_millis(2),
            initial_objective: 1.0,
            final_objective: 1.0,
        });

        assert_eq!(total.iterations, 4);
        assert_eq!(total.merges, 4);
        assert_eq!(total.splits, 1);
        assert_eq!(total.duration, Duration::from_millis(5));
        assert_eq!(total.improvement(), 6.0);
    }

    #[test]
    fn test_default_result_is_converged() {
        assert!(SolveResult::default().is_converged());
    }
}
