//! Solver-level scope.

use std::time::{Duration, Instant};

use crate::statistics::SolveStatistics;

/// Counters and timing for one projection run.
#[derive(Debug, Clone, Default)]
pub struct SolverScope {
    start_time: Option<Instant>,
    iterations: u64,
    merges: u64,
    splits: u64,
    initial_objective: f64,
}

impl SolverScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_solving(&mut self, initial_objective: f64) {
        self.start_time = Some(Instant::now());
        self.iterations = 0;
        self.merges = 0;
        self.splits = 0;
        self.initial_objective = initial_objective;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    /// Number of completed outer advance/split cycles.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn merges(&self) -> u64 {
        self.merges
    }

    pub fn splits(&self) -> u64 {
        self.splits
    }

    pub fn increment_iterations(&mut self) {
        self.iterations += 1;
    }

    pub fn record_merge(&mut self) {
        self.merges += 1;
    }

    pub fn record_split(&mut self) {
        self.splits += 1;
    }

    /// Snapshot of the counters, closed with the final objective value.
    pub fn statistics(&self, final_objective: f64) -> SolveStatistics {
        SolveStatistics {
            iterations: self.iterations,
            merges: self.merges,
            splits: self.splits,
            duration: self.elapsed().unwrap_or_default(),
            initial_objective: self.initial_objective,
            final_objective,
        }
    }
}
