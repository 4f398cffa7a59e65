//! Shared test fixtures for LoadForge crates.
//!
//! This crate provides data sets and pure functions for testing.
//! It does NOT depend on `loadforge-solver` so that the solver can use it as
//! a dev-dependency.
//!
//! - [`scenario`] - Hand-built instances with known optima
//! - [`random`] - Seeded random instances
//! - [`brute_force`] - Exhaustive optimum for small instances
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! loadforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use loadforge_test::scenario::three_items;
//! use loadforge_test::brute_force::best_volume;
//! ```

pub mod brute_force;
pub mod random;
pub mod scenario;

pub use brute_force::{best_volume, check_assignment, objective_matches};
pub use random::{random_instance, RandomInstanceSpec};
pub use scenario::{reference_fleet, three_items, Instance};
