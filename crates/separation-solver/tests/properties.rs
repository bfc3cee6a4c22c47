//! Property tests over seeded random feasible problems.

use proptest::prelude::*;

use separation_config::{EnvironmentMode, SolverConfig};
use separation_solver::ProjectionSolver;
use separation_test::{assert_close, assert_feasible, kkt_residual, RandomProblem};

fn solver() -> ProjectionSolver {
    ProjectionSolver::new(
        SolverConfig::new()
            .with_environment_mode(EnvironmentMode::FullAssert)
            .with_iteration_limit(10_000),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn projection_is_feasible_and_optimal(
        seed in any::<u64>(),
        variables in 1usize..24,
        constraints in 0usize..48,
    ) {
        let mut problem = RandomProblem::new(seed)
            .variables(variables)
            .constraints(constraints)
            .build();
        let before = problem.objective();

        let result = solver().solve(&mut problem).unwrap();

        prop_assert!(result.is_converged());
        assert_feasible(&problem, 1e-6);
        prop_assert!(problem.objective() <= before + 1e-9);
        let residual = kkt_residual(&problem);
        prop_assert!(residual <= 1e-6, "KKT residual {}", residual);
    }

    #[test]
    fn resolve_after_convergence_changes_nothing(
        seed in any::<u64>(),
        variables in 2usize..16,
        constraints in 1usize..32,
    ) {
        let mut problem = RandomProblem::new(seed)
            .variables(variables)
            .constraints(constraints)
            .build();
        let solver = solver();
        solver.solve(&mut problem).unwrap();
        let converged = problem.positions();

        let result = solver.solve(&mut problem).unwrap();

        prop_assert_eq!(result.statistics.merges, 0);
        prop_assert_eq!(result.statistics.splits, 0);
        assert_close(&problem.positions(), &converged, 1e-9);
    }

    #[test]
    fn repeated_layout_iterations_stay_feasible(
        seed in any::<u64>(),
        rounds in 1usize..6,
    ) {
        // An outer layout loop: new desired positions each round, solved
        // from the previous round's result.
        let mut problem = RandomProblem::new(seed).variables(12).constraints(20).build();
        let solver = solver();
        for round in 0..rounds {
            let next = RandomProblem::new(seed.wrapping_add(round as u64 + 1))
                .variables(12)
                .constraints(0)
                .build();
            for v in problem.variable_ids() {
                problem.set_desired(v, next.variable(v).desired());
            }
            let before = problem.objective();

            solver.solve(&mut problem).unwrap();

            assert_feasible(&problem, 1e-6);
            prop_assert!(problem.objective() <= before + 1e-9);
            prop_assert!(kkt_residual(&problem) <= 1e-6);
        }
    }

    #[test]
    fn parallel_components_agree_with_sequential(
        seed in any::<u64>(),
        variables in 2usize..20,
        constraints in 0usize..12,
    ) {
        let original = RandomProblem::new(seed)
            .variables(variables)
            .constraints(constraints)
            .build();
        let mut sequential = original.clone();
        let mut parallel = original;

        solver().solve(&mut sequential).unwrap();
        ProjectionSolver::new(SolverConfig::new().with_parallel_components(true))
            .solve(&mut parallel)
            .unwrap();

        assert_close(&parallel.positions(), &sequential.positions(), 1e-6);
    }
}
