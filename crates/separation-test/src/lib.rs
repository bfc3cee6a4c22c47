//! Shared test fixtures for the separation crates.
//!
//! This crate provides problem builders and assertions for testing.
//! It depends only on `separation-core`, so the solver can use it as a
//! dev-dependency.
//!
//! - [`fixtures`] - small hand-built problems (pairs, chains)
//! - [`random`] - seeded random feasible problems
//! - [`assertions`] - feasibility and optimality checks
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! separation-test = { workspace = true }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod random;

pub use assertions::{assert_close, assert_feasible, assert_kkt, kkt_residual};
pub use fixtures::{chain, pair, unconstrained};
pub use random::RandomProblem;
