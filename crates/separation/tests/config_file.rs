//! Configuration file handling of the `solve` entry points.

use std::fs;

use separation::prelude::*;
use separation::solve_with_config_file;
use separation_test::{assert_close, chain, pair};

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut problem = pair([0.0, 0.0], [0.0, 2.0], 2.0);

    let result = solve_with_config_file(&mut problem, dir.path().join("separation.toml")).unwrap();

    assert!(result.is_converged());
    assert_close(&problem.positions(), &[-1.0, 1.0], 1e-12);
}

#[test]
fn malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("separation.toml");
    fs::write(&path, "validate_start = \"nope\"\n").unwrap();
    let mut problem = pair([0.0, 0.0], [0.0, 2.0], 2.0);

    let err = solve_with_config_file(&mut problem, &path).unwrap_err();

    assert!(matches!(err, SeparationError::Config(_)));
    assert_eq!(problem.positions(), vec![0.0, 2.0]);
}

#[test]
fn invalid_tolerance_in_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("separation.toml");
    fs::write(&path, "feasibility_tolerance = -1.0\n").unwrap();
    let mut problem = pair([0.0, 0.0], [0.0, 2.0], 2.0);

    let err = solve_with_config_file(&mut problem, &path).unwrap_err();

    match err {
        SeparationError::Config(message) => assert!(message.contains("feasibility_tolerance")),
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn config_file_limits_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("separation.toml");
    fs::write(&path, "[termination]\niteration_limit = 1\n").unwrap();

    let mut problem = chain(&[0.0; 4], 1.0);
    solve_with_config_file(&mut problem, &path).unwrap();
    let ids: Vec<_> = problem.variable_ids().collect();
    for (v, d) in ids.into_iter().zip([-30.0, -10.0, 10.0, 30.0]) {
        problem.set_desired(v, d);
    }

    let result = solve_with_config_file(&mut problem, &path).unwrap();

    assert!(!result.is_converged());
    assert_eq!(result.statistics.iterations, 1);
}
