//! LoadForge Solver
//!
//! This crate turns items and vehicle slots into a loading plan:
//! - Assignment model (binary variables, capacity rows, volume objective)
//! - Engines: exact branch-and-bound, first-fit decreasing, size-based auto
//! - Termination conditions (time, node count, external flag)
//! - Result extraction into per-slot manifests
//! - Solver manager for batch and background solving
//!
//! Most callers only need [`optimize`] or [`optimize_with_config`] followed
//! by [`extract`].

pub mod engine;
pub mod extract;
pub mod manager;
pub mod model;
pub mod optimize;
pub mod scope;
pub mod termination;

pub use engine::{
    engine_from_config, upper_bound, AutoEngine, BranchAndBoundEngine, GreedyEngine,
    ImprovementCallback, SolveContext, SolverEngine,
};
pub use extract::{extract, ExtractError, LoadPlan, SlotManifest};
pub use manager::{LoadProblem, SolverJob, SolverManager};
pub use model::{AssignmentModel, ConstraintKind, LinearConstraint, Variable, VarId};
pub use optimize::{optimize, optimize_with_config, optimize_with_context, solve_model};
pub use scope::SolveScope;
pub use termination::{
    ExternalTermination, NoTermination, NodeCountTermination, OrTermination, Termination,
    TimeTermination,
};
