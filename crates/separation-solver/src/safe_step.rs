//! Feasibility-preserving step size.
//!
//! Every block moves along the segment from its ideal reference to its
//! target. For an inactive constraint between two blocks the largest safe
//! fraction `alpha` is where the linear slack along that segment reaches
//! zero.

use std::collections::BTreeSet;

use tracing::trace;

use separation_core::{ConstraintId, SeparationProblem};

use crate::blocks::BlockSet;

/// Largest fraction in `[0, 1]` of the move towards the block targets that
/// keeps constraint `c` satisfied.
///
/// A constraint that is satisfied (within `tolerance`) at the targets, or
/// whose endpoints share a block, or whose slack does not shrink along the
/// move, never binds and yields `1.0`.
pub fn safe_alpha(
    c: ConstraintId,
    blocks: &BlockSet,
    problem: &SeparationProblem,
    tolerance: f64,
) -> f64 {
    let constraint = problem.constraint(c);
    let (left, right) = (constraint.left(), constraint.right());
    let (lb, rb) = (blocks.block_of(left), blocks.block_of(right));
    if lb == rb {
        return 1.0;
    }
    let (lblock, rblock) = (blocks.get(lb), blocks.get(rb));
    let (bl, br) = (problem.variable(left).offset(), problem.variable(right).offset());
    let gap = constraint.gap();

    let (xl, xr) = (lblock.target(), rblock.target());
    if xl + bl + gap <= xr + br + tolerance {
        return 1.0;
    }

    let al = lblock.ideal_reference() + bl;
    let ar = rblock.ideal_reference() + br;
    let dl = xl - lblock.ideal_reference();
    let dr = xr - rblock.ideal_reference();
    let closing = dr - dl;
    if closing >= 0.0 {
        // Relative motion does not eat into the slack.
        return 1.0;
    }
    ((gap + al - ar) / closing).clamp(0.0, 1.0)
}

/// The inactive constraint that binds first, with its safe fraction.
///
/// Ties keep the constraint encountered first, i.e. the lowest id.
/// Returns `None` when there are no inactive constraints.
pub fn min_safe_alpha(
    inactive: &BTreeSet<ConstraintId>,
    blocks: &BlockSet,
    problem: &SeparationProblem,
    tolerance: f64,
) -> Option<(ConstraintId, f64)> {
    let mut best: Option<(ConstraintId, f64)> = None;
    for &c in inactive {
        let alpha = safe_alpha(c, blocks, problem, tolerance);
        trace!(constraint = %c, alpha, "Safe step");
        if best.map_or(true, |(_, a)| alpha < a) {
            best = Some((c, alpha));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blocks(
        desired: [f64; 2],
        positions: [f64; 2],
        gap: f64,
    ) -> (SeparationProblem, BlockSet, ConstraintId) {
        let mut problem = SeparationProblem::new();
        let a = problem.add_variable(desired[0], positions[0]);
        let b = problem.add_variable(desired[1], positions[1]);
        let c = problem.add_constraint(a, b, gap).unwrap();
        let blocks = BlockSet::init(&mut problem, 1e-9);
        (problem, blocks, c)
    }

    #[test]
    fn test_satisfied_at_target_is_full_step() {
        let (problem, blocks, c) = two_blocks([0.0, 5.0], [0.0, 2.0], 2.0);
        assert_eq!(safe_alpha(c, &blocks, &problem, 0.0), 1.0);
    }

    #[test]
    fn test_boundary_root() {
        // Slack 4 at the start, closing at rate 8: binds halfway.
        let (problem, blocks, c) = two_blocks([4.0, 2.0], [0.0, 6.0], 2.0);
        assert_eq!(safe_alpha(c, &blocks, &problem, 0.0), 0.5);
    }

    #[test]
    fn test_tight_start_binds_immediately() {
        let (problem, blocks, c) = two_blocks([0.0, 0.0], [0.0, 2.0], 2.0);
        assert_eq!(safe_alpha(c, &blocks, &problem, 0.0), 0.0);
    }

    #[test]
    fn test_zero_relative_motion_is_full_step() {
        // Both blocks move by +1; an already-violated pair must not divide by zero.
        let (problem, blocks, c) = two_blocks([1.0, 2.0], [0.0, 1.0], 2.0);
        assert_eq!(safe_alpha(c, &blocks, &problem, 0.0), 1.0);
    }

    #[test]
    fn test_slight_start_violation_clamps_to_zero() {
        let (problem, blocks, c) = two_blocks([0.0, 0.0], [0.0, 1.9], 2.0);
        assert_eq!(safe_alpha(c, &blocks, &problem, 0.0), 0.0);
    }

    #[test]
    fn test_violation_within_tolerance_is_full_step() {
        let (problem, blocks, c) = two_blocks([0.0, 1.99], [0.0, 2.0], 2.0);
        assert_eq!(safe_alpha(c, &blocks, &problem, 0.1), 1.0);
        assert!(safe_alpha(c, &blocks, &problem, 0.0) < 1.0);
    }

    #[test]
    fn test_min_safe_alpha_picks_first_binding() {
        let mut problem = SeparationProblem::new();
        let v: Vec<_> = [(0.0, 0.0), (0.0, 4.0), (0.0, 6.0)]
            .iter()
            .map(|&(d, x)| problem.add_variable(d, x))
            .collect();
        let c0 = problem.add_constraint(v[0], v[1], 1.0).unwrap();
        let c1 = problem.add_constraint(v[1], v[2], 1.0).unwrap();
        let blocks = BlockSet::init(&mut problem, 1e-9);
        let inactive: BTreeSet<_> = [c0, c1].into_iter().collect();

        // c0 slack 3 closing at 4, c1 slack 1 closing at 2.
        let (c, alpha) = min_safe_alpha(&inactive, &blocks, &problem, 0.0).unwrap();
        assert_eq!(c, c1);
        assert_eq!(alpha, 0.5);

        assert!(min_safe_alpha(&BTreeSet::new(), &blocks, &problem, 0.0).is_none());
    }

    #[test]
    fn test_min_safe_alpha_tie_keeps_lowest_id() {
        let mut problem = SeparationProblem::new();
        let v: Vec<_> = [(0.0, 0.0), (0.0, 2.0), (0.0, 4.0)]
            .iter()
            .map(|&(d, x)| problem.add_variable(d, x))
            .collect();
        let c0 = problem.add_constraint(v[0], v[1], 2.0).unwrap();
        let c1 = problem.add_constraint(v[1], v[2], 2.0).unwrap();
        let blocks = BlockSet::init(&mut problem, 1e-9);
        let inactive: BTreeSet<_> = [c1, c0].into_iter().collect();

        assert_eq!(
            min_safe_alpha(&inactive, &blocks, &problem, 0.0),
            Some((c0, 0.0))
        );
    }
}
