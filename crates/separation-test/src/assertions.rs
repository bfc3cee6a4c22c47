//! Feasibility and optimality checks.

use separation_core::SeparationProblem;

/// Panics unless every constraint holds within `tolerance`.
pub fn assert_feasible(problem: &SeparationProblem, tolerance: f64) {
    let violated = problem.violated_constraints(tolerance);
    assert!(
        violated.is_empty(),
        "violated constraints {violated:?}, max violation {}",
        problem.max_violation()
    );
}

/// Panics unless `actual` matches `expected` element-wise within `tolerance`.
pub fn assert_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "index {i}: got {a}, expected {e} (actual {actual:?})"
        );
    }
}

/// Largest violation of the first-order optimality conditions.
///
/// Checks stationarity `2 (x - d) + sum(out) - sum(in) = 0` over active
/// multipliers for every variable, non-negativity of active multipliers,
/// tightness of active constraints and satisfaction of inactive ones. The
/// objective is convex, so a zero residual means the positions are the
/// global optimum.
pub fn kkt_residual(problem: &SeparationProblem) -> f64 {
    let mut worst: f64 = 0.0;
    for v in problem.variable_ids() {
        let var = problem.variable(v);
        let mut gradient = 2.0 * (var.position() - var.desired());
        for &c in var.outgoing() {
            let constraint = problem.constraint(c);
            if constraint.is_active() {
                gradient += constraint.multiplier();
            }
        }
        for &c in var.incoming() {
            let constraint = problem.constraint(c);
            if constraint.is_active() {
                gradient -= constraint.multiplier();
            }
        }
        worst = worst.max(gradient.abs());
    }
    for c in problem.constraint_ids() {
        let constraint = problem.constraint(c);
        let slack = problem.slack(c);
        if constraint.is_active() {
            worst = worst.max((-constraint.multiplier()).max(0.0));
            worst = worst.max(slack.abs());
        } else {
            worst = worst.max((-slack).max(0.0));
        }
    }
    worst
}

/// Panics unless the KKT residual is within `tolerance`.
pub fn assert_kkt(problem: &SeparationProblem, tolerance: f64) {
    let residual = kkt_residual(problem);
    assert!(
        residual <= tolerance,
        "KKT residual {residual} exceeds {tolerance} at {:?}",
        problem.positions()
    );
}
