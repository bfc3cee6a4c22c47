//! Splitting a problem into independent connected components.
//!
//! Variables that share no chain of constraints never interact during
//! projection, so each component can be solved on its own (potentially in
//! parallel) and written back afterwards.

use crate::constraint::ConstraintId;
use crate::problem::SeparationProblem;
use crate::variable::VariableId;

/// One connected component, with maps back into the original problem.
#[derive(Debug, Clone)]
pub struct Component {
    /// The sub-problem, with variables and constraints renumbered densely.
    pub problem: SeparationProblem,
    /// Original id of each sub-problem variable.
    pub variables: Vec<VariableId>,
    /// Original id of each sub-problem constraint.
    pub constraints: Vec<ConstraintId>,
}

/// A problem split into its connected components.
///
/// # Example
///
/// ```
/// use separation_core::{Partition, SeparationProblem};
///
/// let mut problem = SeparationProblem::new();
/// let a = problem.add_variable(0.0, 0.0);
/// let b = problem.add_variable(0.0, 1.0);
/// let _lonely = problem.add_variable(3.0, 3.0);
/// problem.add_constraint(a, b, 1.0).unwrap();
///
/// let partition = Partition::of(&problem);
/// assert_eq!(partition.components.len(), 2);
/// assert_eq!(partition.components[0].variables, vec![a, b]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub components: Vec<Component>,
}

impl Partition {
    /// Groups the variables of `problem` by constraint connectivity.
    ///
    /// Components are ordered by their smallest variable id, and each
    /// component keeps the original relative order of its variables and
    /// constraints, including active flags and multipliers.
    pub fn of(problem: &SeparationProblem) -> Self {
        let mut sets = DisjointSets::new(problem.variable_count());
        for c in problem.constraints() {
            sets.union(c.left().0, c.right().0);
        }

        let mut slot_of_root = vec![usize::MAX; problem.variable_count()];
        let mut local_index = vec![0usize; problem.variable_count()];
        let mut components: Vec<Component> = Vec::new();

        for v in problem.variable_ids() {
            let root = sets.find(v.0);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = components.len();
                components.push(Component {
                    problem: SeparationProblem::new(),
                    variables: Vec::new(),
                    constraints: Vec::new(),
                });
            }
            let component = &mut components[slot_of_root[root]];
            let var = problem.variable(v);
            let local = component.problem.add_variable(var.desired(), var.position());
            component.problem.variable_mut(local).set_offset(var.offset());
            local_index[v.0] = local.0;
            component.variables.push(v);
        }

        for id in problem.constraint_ids() {
            let c = problem.constraint(id);
            let component = &mut components[slot_of_root[sets.find(c.left().0)]];
            let left = VariableId(local_index[c.left().0]);
            let right = VariableId(local_index[c.right().0]);
            // Endpoints and gap were validated when the constraint was first added.
            if let Ok(local) = component.problem.add_constraint(left, right, c.gap()) {
                let copy = component.problem.constraint_mut(local);
                copy.set_active(c.is_active());
                copy.set_multiplier(c.multiplier());
                component.constraints.push(id);
            }
        }

        Self { components }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Copies positions, offsets and active-set state of every component back
    /// into the problem it was taken from.
    pub fn write_back(&self, problem: &mut SeparationProblem) {
        for component in &self.components {
            for (local, &original) in component.variables.iter().enumerate() {
                let solved = component.problem.variable(VariableId(local));
                let target = problem.variable_mut(original);
                target.set_position(solved.position());
                target.set_offset(solved.offset());
            }
            for (local, &original) in component.constraints.iter().enumerate() {
                let solved = component.problem.constraint(ConstraintId(local));
                let target = problem.constraint_mut(original);
                target.set_active(solved.is_active());
                target.set_multiplier(solved.multiplier());
            }
        }
    }
}

/// Union-find with path halving and union by size.
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_groups_connected_variables() {
        let mut problem = SeparationProblem::new();
        let v: Vec<_> = (0..5).map(|i| problem.add_variable(0.0, i as f64)).collect();
        problem.add_constraint(v[0], v[3], 1.0).unwrap();
        problem.add_constraint(v[1], v[2], 1.0).unwrap();
        problem.add_constraint(v[2], v[4], 1.0).unwrap();

        let partition = Partition::of(&problem);

        assert_eq!(partition.len(), 2);
        assert_eq!(partition.components[0].variables, vec![v[0], v[3]]);
        assert_eq!(partition.components[1].variables, vec![v[1], v[2], v[4]]);
        assert_eq!(
            partition.components[1].constraints,
            vec![ConstraintId(1), ConstraintId(2)]
        );
        let sub = &partition.components[1].problem;
        assert_eq!(sub.constraint(ConstraintId(1)).left(), VariableId(1));
        assert_eq!(sub.constraint(ConstraintId(1)).right(), VariableId(2));
    }

    #[test]
    fn test_partition_isolated_variables() {
        let mut problem = SeparationProblem::new();
        problem.add_variable(1.0, 1.0);
        problem.add_variable(2.0, 2.0);

        let partition = Partition::of(&problem);

        assert_eq!(partition.len(), 2);
        assert!(partition
            .components
            .iter()
            .all(|c| c.problem.constraint_count() == 0));
    }

    #[test]
    fn test_write_back_restores_positions_and_state() {
        let mut problem = SeparationProblem::new();
        let a = problem.add_variable(0.0, 0.0);
        let _b = problem.add_variable(0.0, 10.0);
        let c = problem.add_variable(0.0, 5.0);
        let ac = problem.add_constraint(a, c, 1.0).unwrap();

        let mut partition = Partition::of(&problem);
        {
            let first = &mut partition.components[0].problem;
            first.set_position(VariableId(0), -0.5);
            first.set_position(VariableId(1), 0.5);
            first.constraint_mut(ConstraintId(0)).set_active(true);
            first.constraint_mut(ConstraintId(0)).set_multiplier(1.0);
        }
        partition.write_back(&mut problem);

        assert_eq!(problem.positions(), vec![-0.5, 10.0, 0.5]);
        assert!(problem.constraint(ac).is_active());
        assert_eq!(problem.constraint(ac).multiplier(), 1.0);
    }

    #[test]
    fn test_empty_problem() {
        let partition = Partition::of(&SeparationProblem::new());
        assert!(partition.is_empty());
    }
}
