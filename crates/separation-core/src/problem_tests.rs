//! Tests for problem construction and measurement.

use crate::*;

fn two_variables() -> (SeparationProblem, VariableId, VariableId) {
    let mut problem = SeparationProblem::new();
    let a = problem.add_variable(5.0, 0.0);
    let b = problem.add_variable(-3.0, 4.0);
    (problem, a, b)
}

#[test]
fn test_add_constraint_registers_incidence() {
    let (mut problem, a, b) = two_variables();
    let c = problem.add_constraint(a, b, 2.0).unwrap();

    assert_eq!(problem.variable(a).outgoing(), &[c]);
    assert!(problem.variable(a).incoming().is_empty());
    assert_eq!(problem.variable(b).incoming(), &[c]);
    assert_eq!(problem.variable(b).incident().collect::<Vec<_>>(), vec![c]);
    assert_eq!(problem.constraint(c).other(a), b);
    assert_eq!(problem.constraint(c).other(b), a);
}

#[test]
fn test_add_constraint_rejects_unknown_variable() {
    let (mut problem, a, _) = two_variables();
    let err = problem.add_constraint(a, VariableId(7), 1.0).unwrap_err();
    assert_eq!(err, SeparationError::UnknownVariable(VariableId(7)));
    assert_eq!(problem.constraint_count(), 0);
}

#[test]
fn test_add_constraint_rejects_self_loop() {
    let (mut problem, a, _) = two_variables();
    let err = problem.add_constraint(a, a, 1.0).unwrap_err();
    assert_eq!(err, SeparationError::SelfLoop(a));
}

#[test]
fn test_add_constraint_rejects_bad_gap() {
    let (mut problem, a, b) = two_variables();
    assert!(matches!(
        problem.add_constraint(a, b, -1.0),
        Err(SeparationError::NegativeGap { .. })
    ));
    assert!(matches!(
        problem.add_constraint(a, b, f64::NAN),
        Err(SeparationError::NonFinite(_))
    ));
}

#[test]
fn test_validate_rejects_non_finite_positions() {
    let (mut problem, a, _) = two_variables();
    assert!(problem.validate().is_ok());
    problem.set_desired(a, f64::INFINITY);
    assert!(matches!(problem.validate(), Err(SeparationError::NonFinite(_))));
}

#[test]
fn test_objective_and_violation() {
    let (mut problem, a, b) = two_variables();
    let c = problem.add_constraint(a, b, 6.0).unwrap();

    // (0 - 5)^2 + (4 + 3)^2
    assert_eq!(problem.objective(), 74.0);
    assert_eq!(problem.slack(c), -2.0);
    assert_eq!(problem.max_violation(), 2.0);
    assert_eq!(problem.violated_constraints(1e-9), vec![c]);
    assert!(!problem.is_feasible(1e-9));

    problem.set_position(b, 6.0);
    assert!(problem.is_feasible(0.0));
    assert!(problem.violated_constraints(0.0).is_empty());
}

#[test]
fn test_reset_active_set_clears_multipliers() {
    let (mut problem, a, b) = two_variables();
    let c = problem.add_constraint(a, b, 1.0).unwrap();
    problem.constraint_mut(c).set_active(true);
    problem.constraint_mut(c).set_multiplier(3.0);
    assert_eq!(problem.active_count(), 1);

    problem.reset_active_set();

    assert_eq!(problem.active_count(), 0);
    assert_eq!(problem.constraint(c).multiplier(), 0.0);
}

#[test]
fn test_error_display() {
    let err = SeparationError::InfeasibleStart {
        constraint: ConstraintId(3),
        violation: 0.5,
    };
    assert_eq!(err.to_string(), "Starting configuration violates c3 by 0.5");
}
