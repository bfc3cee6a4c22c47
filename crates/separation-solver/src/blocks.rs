//! The evolving partition of variables into blocks.

use tracing::debug;

use separation_core::{ConstraintId, Incidence, Result, SeparationProblem, VariableId};

use crate::block::Block;

/// Blocks plus the owning block of every variable.
///
/// Blocks are stored densely; merging removes a block with `swap_remove`,
/// so block indices are only stable between merges.
#[derive(Debug, Clone, Default)]
pub struct BlockSet {
    blocks: Vec<Block>,
    owner: Vec<usize>,
}

impl BlockSet {
    /// Builds the initial partition.
    ///
    /// Constraints already marked active (left over from a previous solve)
    /// seed the block trees, so a converged configuration is picked up as is.
    /// Active constraints that are no longer tight within `tolerance`, or
    /// that would close a cycle in a tree, are deactivated first.
    pub fn init(problem: &mut SeparationProblem, tolerance: f64) -> Self {
        for c in problem.constraint_ids() {
            if problem.constraint(c).is_active() && problem.slack(c).abs() > tolerance {
                debug!(constraint = %c, slack = problem.slack(c), "Dropping stale active constraint");
                problem.constraint_mut(c).set_active(false);
            }
        }

        let mut owner = vec![usize::MAX; problem.variable_count()];
        let mut blocks = Vec::new();

        for root in problem.variable_ids() {
            if owner[root.0] != usize::MAX {
                continue;
            }
            let index = blocks.len();
            owner[root.0] = index;
            let mut block = Block::singleton(root, problem);

            let mut stack: Vec<(VariableId, Option<ConstraintId>)> = vec![(root, None)];
            while let Some((u, via)) = stack.pop() {
                let neighbours: Incidence = problem.variable(u).incident().collect();
                for c in neighbours {
                    if Some(c) == via || !problem.constraint(c).is_active() {
                        continue;
                    }
                    let constraint = problem.constraint(c);
                    let w = constraint.other(u);
                    if owner[w.0] == index {
                        debug!(constraint = %c, "Dropping active constraint that closes a cycle");
                        problem.constraint_mut(c).set_active(false);
                        continue;
                    }
                    let offset = if constraint.left() == u {
                        problem.variable(u).offset() + constraint.gap()
                    } else {
                        problem.variable(u).offset() - constraint.gap()
                    };
                    owner[w.0] = index;
                    problem.variable_mut(w).set_offset(offset);
                    block.members.push(w);
                    block.active.push(c);
                    stack.push((w, Some(c)));
                }
            }

            block.update_positions(problem);
            block.refresh_target(problem);
            blocks.push(block);
        }

        Self { blocks, owner }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    /// Index of the block owning `v`.
    #[inline]
    pub fn block_of(&self, v: VariableId) -> usize {
        self.owner[v.0]
    }

    /// The block owning `v`.
    #[inline]
    pub fn owning(&self, v: VariableId) -> &Block {
        &self.blocks[self.owner[v.0]]
    }

    /// Moves every block a fraction `alpha` towards its target and makes the
    /// result the starting point of the next step.
    pub fn advance(&mut self, alpha: f64, problem: &mut SeparationProblem) {
        for block in &mut self.blocks {
            let reference = if alpha >= 1.0 {
                block.target
            } else {
                block.interpolate(alpha)
            };
            block.move_to(reference, problem);
            block.ideal_reference = reference;
        }
    }

    /// Merges the blocks at both ends of `c` and makes `c` active.
    ///
    /// The smaller block is folded into the larger one. Its offsets are
    /// shifted so that `c` holds exactly at its gap. Returns the index of
    /// the merged block.
    pub fn merge(&mut self, c: ConstraintId, problem: &mut SeparationProblem) -> usize {
        let constraint = problem.constraint(c);
        let (left, right, gap) = (constraint.left(), constraint.right(), constraint.gap());
        let (lb, rb) = (self.owner[left.0], self.owner[right.0]);
        debug_assert_ne!(lb, rb, "merge of a constraint inside one block");

        let (keep, gone) = if self.blocks[lb].len() >= self.blocks[rb].len() {
            (lb, rb)
        } else {
            (rb, lb)
        };
        let shift = if keep == lb {
            problem.variable(left).offset() + gap - problem.variable(right).offset()
        } else {
            problem.variable(right).offset() - gap - problem.variable(left).offset()
        };

        let absorbed = self.blocks.swap_remove(gone);
        // The former last block now lives at `gone`.
        let keep = if keep == self.blocks.len() { gone } else { keep };
        if gone < self.blocks.len() {
            for &v in &self.blocks[gone].members {
                self.owner[v.0] = gone;
            }
        }

        for &v in &absorbed.members {
            let var = problem.variable_mut(v);
            let offset = var.offset();
            var.set_offset(offset + shift);
            self.owner[v.0] = keep;
        }
        problem.constraint_mut(c).set_active(true);

        let block = &mut self.blocks[keep];
        block.members.extend(absorbed.members);
        block.active.extend(absorbed.active);
        block.active.push(c);
        block.update_positions(problem);
        block.ideal_reference = block.reference;
        block.refresh_target(problem);
        keep
    }

    /// Deactivates the tree constraint `c` and splits its block in two.
    ///
    /// The side containing `c.right()` moves to a new block. Both halves are
    /// re-anchored; absolute positions do not change. Returns the indices of
    /// the left and right halves.
    pub fn split(&mut self, c: ConstraintId, problem: &mut SeparationProblem) -> (usize, usize) {
        let right = problem.constraint(c).right();
        let index = self.owner[right.0];
        let fresh = self.blocks.len();
        problem.constraint_mut(c).set_active(false);

        self.owner[right.0] = fresh;
        let mut stack = vec![right];
        while let Some(u) = stack.pop() {
            for e in problem.variable(u).incident() {
                let constraint = problem.constraint(e);
                if !constraint.is_active() {
                    continue;
                }
                let w = constraint.other(u);
                if self.owner[w.0] != fresh {
                    self.owner[w.0] = fresh;
                    stack.push(w);
                }
            }
        }

        let owner = &self.owner;
        let block = &mut self.blocks[index];
        let (moved, kept): (Vec<VariableId>, Vec<VariableId>) = block
            .members
            .iter()
            .partition(|v| owner[v.0] == fresh);
        let (moved_tree, kept_tree): (Vec<ConstraintId>, Vec<ConstraintId>) = block
            .active
            .iter()
            .filter(|&&e| e != c)
            .partition(|e| owner[problem.constraint(**e).left().0] == fresh);
        block.members = kept;
        block.active = kept_tree;
        block.rebase(problem);

        let mut other = Block {
            members: moved,
            active: moved_tree,
            reference: 0.0,
            ideal_reference: 0.0,
            target: 0.0,
        };
        other.rebase(problem);
        self.blocks.push(other);
        (index, fresh)
    }

    /// Checks every block's position and tree invariants.
    pub fn check_invariants(&self, problem: &SeparationProblem, tolerance: f64) -> Result<()> {
        self.blocks
            .iter()
            .try_for_each(|b| b.check_invariants(problem, tolerance))
    }
}
