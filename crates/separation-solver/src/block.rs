//! Rigid blocks of variables joined by active constraints.

use separation_core::{ConstraintId, Result, SeparationError, SeparationProblem, VariableId};

/// A maximal set of variables held together by a spanning tree of active
/// constraints. Every member sits at `reference + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub(crate) members: Vec<VariableId>,
    pub(crate) active: Vec<ConstraintId>,
    pub(crate) reference: f64,
    pub(crate) ideal_reference: f64,
    pub(crate) target: f64,
}

impl Block {
    /// Creates a block holding only `v`, anchored at its current position.
    pub fn singleton(v: VariableId, problem: &mut SeparationProblem) -> Self {
        let var = problem.variable_mut(v);
        var.set_offset(0.0);
        let reference = var.position();
        let target = var.desired();
        Self {
            members: vec![v],
            active: Vec::new(),
            reference,
            ideal_reference: reference,
            target,
        }
    }

    pub fn members(&self) -> &[VariableId] {
        &self.members
    }

    /// Constraints forming this block's spanning tree.
    pub fn active_tree(&self) -> &[ConstraintId] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Current feasible reference position.
    pub fn reference(&self) -> f64 {
        self.reference
    }

    /// Reference held at the start of the current step.
    pub fn ideal_reference(&self) -> f64 {
        self.ideal_reference
    }

    /// Cached result of [`optimal_position`](Self::optimal_position).
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Unconstrained least-squares optimum for the reference position: the
    /// mean of `desired - offset` over all members.
    pub fn optimal_position(&self, problem: &SeparationProblem) -> f64 {
        let sum: f64 = self
            .members
            .iter()
            .map(|&v| {
                let var = problem.variable(v);
                var.desired() - var.offset()
            })
            .sum();
        sum / self.members.len() as f64
    }

    pub(crate) fn refresh_target(&mut self, problem: &SeparationProblem) {
        self.target = self.optimal_position(problem);
    }

    /// Reference position a fraction `alpha` of the way from the ideal
    /// reference to the target.
    #[inline]
    pub fn interpolate(&self, alpha: f64) -> f64 {
        self.ideal_reference + alpha * (self.target - self.ideal_reference)
    }

    /// Moves the whole block and its members to `reference`.
    pub(crate) fn move_to(&mut self, reference: f64, problem: &mut SeparationProblem) {
        self.reference = reference;
        self.update_positions(problem);
    }

    /// Writes `reference + offset` into every member's position.
    pub(crate) fn update_positions(&self, problem: &mut SeparationProblem) {
        for &v in &self.members {
            let var = problem.variable_mut(v);
            let offset = var.offset();
            var.set_position(self.reference + offset);
        }
    }

    /// Re-anchors the block on its first member, which gets offset zero.
    /// Absolute positions are unchanged.
    pub(crate) fn rebase(&mut self, problem: &mut SeparationProblem) {
        let anchor = problem.variable(self.members[0]).position();
        for &v in &self.members {
            let var = problem.variable_mut(v);
            let position = var.position();
            var.set_offset(position - anchor);
        }
        self.reference = anchor;
        self.ideal_reference = anchor;
        self.refresh_target(problem);
    }

    /// Computes the Lagrange multiplier of every constraint in the active tree.
    ///
    /// The gradient `2 (position - desired)` of each member is summed over
    /// the subtree hanging below it; the multiplier of a tree edge is that
    /// subtree sum, negated when the subtree sits on the left of the edge.
    /// Traversal uses an explicit stack, so deep blocks do not recurse.
    ///
    /// Returns the total gradient at the root, which is zero when the block
    /// sits at its optimal position.
    pub fn compute_multipliers(&self, problem: &mut SeparationProblem) -> f64 {
        for &c in &self.active {
            problem.constraint_mut(c).set_multiplier(0.0);
        }

        // Pre-order: (variable, edge to parent, index of parent in `order`).
        let mut order: Vec<(VariableId, Option<ConstraintId>, usize)> =
            Vec::with_capacity(self.members.len());
        let mut stack = vec![(self.members[0], None, 0usize)];
        while let Some((v, via, parent)) = stack.pop() {
            let index = order.len();
            order.push((v, via, parent));
            for c in problem.variable(v).incident() {
                if Some(c) == via || !problem.constraint(c).is_active() {
                    continue;
                }
                stack.push((problem.constraint(c).other(v), Some(c), index));
            }
        }

        let mut dfdv: Vec<f64> = order
            .iter()
            .map(|&(v, _, _)| {
                let var = problem.variable(v);
                2.0 * (var.position() - var.desired())
            })
            .collect();

        for i in (1..order.len()).rev() {
            let (v, via, parent) = order[i];
            let Some(c) = via else { continue };
            let constraint = problem.constraint_mut(c);
            let multiplier = if constraint.right() == v {
                dfdv[i]
            } else {
                -dfdv[i]
            };
            constraint.set_multiplier(multiplier);
            dfdv[parent] += dfdv[i];
        }

        dfdv.first().copied().unwrap_or(0.0)
    }

    /// Active-tree constraint with the most negative multiplier, if any.
    pub fn min_multiplier(&self, problem: &SeparationProblem) -> Option<(ConstraintId, f64)> {
        self.active
            .iter()
            .map(|&c| (c, problem.constraint(c).multiplier()))
            .fold(None, |best, (c, lm)| match best {
                Some((_, best_lm)) if best_lm <= lm => best,
                _ => Some((c, lm)),
            })
    }

    /// Checks `position == reference + offset` for every member and that
    /// every tree constraint is held exactly at its gap.
    pub fn check_invariants(&self, problem: &SeparationProblem, tolerance: f64) -> Result<()> {
        for &v in &self.members {
            let var = problem.variable(v);
            let drift = (var.position() - (self.reference + var.offset())).abs();
            if drift > tolerance {
                return Err(SeparationError::InvariantViolation(format!(
                    "{v} drifted {drift} from its block position"
                )));
            }
        }
        for &c in &self.active {
            let slack = problem.slack(c);
            if slack.abs() > tolerance || !problem.constraint(c).is_active() {
                return Err(SeparationError::InvariantViolation(format!(
                    "active constraint {c} has slack {slack}"
                )));
            }
        }
        if self.active.len() + 1 != self.members.len() {
            return Err(SeparationError::InvariantViolation(format!(
                "block with {} members has {} tree edges",
                self.members.len(),
                self.active.len()
            )));
        }
        Ok(())
    }
}
