//! Solver entry point that hides the configuration wiring.

use std::io::ErrorKind;
use std::path::Path;

use separation_config::{ConfigError, SolverConfig};
use separation_core::{Result, SeparationError, SeparationProblem};
use separation_solver::{ProjectionSolver, SolveResult};

/// Configuration file picked up from the working directory.
pub const CONFIG_FILE: &str = "separation.toml";

/// Projects `problem` onto its constraints in place.
///
/// Reads `separation.toml` when it exists and uses the defaults otherwise.
///
/// # Errors
///
/// Fails with [`SeparationError::Config`] when the file exists but cannot be
/// read, parsed or validated, and with any error of
/// [`ProjectionSolver::solve`].
pub fn solve(problem: &mut SeparationProblem) -> Result<SolveResult> {
    solve_with_config_file(problem, CONFIG_FILE)
}

/// Like [`solve`], reading the configuration from `path`.
pub fn solve_with_config_file(
    problem: &mut SeparationProblem,
    path: impl AsRef<Path>,
) -> Result<SolveResult> {
    #[cfg(feature = "console")]
    crate::console::init();

    let config = load_config(path.as_ref())?;
    ProjectionSolver::new(config).solve(problem)
}

// A missing file means defaults; anything else present but broken is an error.
fn load_config(path: &Path) -> Result<SolverConfig> {
    match SolverConfig::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(SolverConfig::default()),
        Err(e) => Err(SeparationError::Config(format!("{}: {e}", path.display()))),
    }
}
