//! Configuration system for the projection solver.
//!
//! Load solver configuration from TOML or YAML files to control tolerances,
//! invariant checking and termination without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use separation_config::{EnvironmentMode, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!     multiplier_tolerance = 1e-8
//!
//!     [termination]
//!     iteration_limit = 500
//!     millis_spent_limit = 250
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.iteration_limit(), Some(500));
//! assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use separation_config::SolverConfig;
//!
//! let config = SolverConfig::load("separation.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tolerance for constraint satisfaction checks.
pub const DEFAULT_FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Default tolerance below zero before a multiplier triggers a split.
pub const DEFAULT_MULTIPLIER_TOLERANCE: f64 = 1e-9;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting invariant checking.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Slack below `-feasibility_tolerance` counts as a violated constraint.
    #[serde(default = "default_feasibility_tolerance")]
    pub feasibility_tolerance: f64,

    /// Multipliers below `-multiplier_tolerance` cause a block split.
    #[serde(default = "default_multiplier_tolerance")]
    pub multiplier_tolerance: f64,

    /// Rejects infeasible starting configurations before solving.
    #[serde(default = "default_true")]
    pub validate_start: bool,

    /// Solves independent components of the constraint graph in parallel.
    #[serde(default)]
    pub parallel_components: bool,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,
}

fn default_feasibility_tolerance() -> f64 {
    DEFAULT_FEASIBILITY_TOLERANCE
}

fn default_multiplier_tolerance() -> f64 {
    DEFAULT_MULTIPLIER_TOLERANCE
}

fn default_true() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            environment_mode: EnvironmentMode::default(),
            feasibility_tolerance: DEFAULT_FEASIBILITY_TOLERANCE,
            multiplier_tolerance: DEFAULT_MULTIPLIER_TOLERANCE,
            validate_start: true,
            parallel_components: false,
            termination: None,
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that tolerances are finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("feasibility_tolerance", self.feasibility_tolerance),
            ("multiplier_tolerance", self.multiplier_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Sets the feasibility tolerance.
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    /// Sets the multiplier tolerance.
    pub fn with_multiplier_tolerance(mut self, tolerance: f64) -> Self {
        self.multiplier_tolerance = tolerance;
        self
    }

    /// Enables or disables the starting-feasibility check.
    pub fn with_validate_start(mut self, validate: bool) -> Self {
        self.validate_start = validate;
        self
    }

    /// Enables or disables parallel solving of independent components.
    pub fn with_parallel_components(mut self, parallel: bool) -> Self {
        self.parallel_components = parallel;
        self
    }

    /// Caps the number of outer merge/split cycles.
    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.termination = Some(TerminationConfig {
            iteration_limit: Some(limit),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Returns the iteration cap, if configured.
    pub fn iteration_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.iteration_limit)
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// True when per-step invariant checks are enabled.
    pub fn is_asserting(&self) -> bool {
        self.environment_mode == EnvironmentMode::FullAssert
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// No invariant checking beyond what the algorithm needs.
    #[default]
    NonIntrusive,

    /// Re-checks feasibility after every step and block positions after
    /// every merge and split.
    FullAssert,
}

/// Termination configuration.
///
/// Projection always converges on feasible input; these limits exist for
/// callers that prefer a feasible best-effort result within a budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum number of outer merge/split cycles.
    pub iteration_limit: Option<u64>,

    /// Maximum milliseconds to spend solving.
    pub millis_spent_limit: Option<u64>,

    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any. Oversized limits
    /// saturate instead of overflowing.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self
            .millis_spent_limit
            .unwrap_or(0)
            .saturating_add(self.seconds_spent_limit.unwrap_or(0).saturating_mul(1000));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}
