//! Solver engines.
//!
//! Every engine implements [`SolverEngine`]: it receives a built
//! [`AssignmentModel`] and a [`SolveContext`] carrying the budget, and
//! returns a [`Solution`]. Engines never panic on a valid model and always
//! return within one node of their termination firing.
//!
//! - [`BranchAndBoundEngine`]: exact depth-first search with bounding
//! - [`GreedyEngine`]: first-fit decreasing
//! - [`AutoEngine`]: exact for small models, greedy above a size limit

mod auto;
mod bound;
mod branch_and_bound;
mod greedy;
mod state;

use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use loadforge_config::{EngineKind, SolverConfig};
use loadforge_core::{Solution, SolveStats, SolveStatus};

use crate::model::AssignmentModel;
use crate::scope::SolveScope;
use crate::termination::{
    ExternalTermination, NoTermination, NodeCountTermination, OrTermination, Termination,
    TimeTermination,
};

pub use auto::AutoEngine;
pub use bound::upper_bound;
pub use branch_and_bound::BranchAndBoundEngine;
pub use greedy::GreedyEngine;

/// Callback invoked with the objective of every improving incumbent.
pub type ImprovementCallback = Box<dyn Fn(f64) + Send + Sync>;

/// An algorithm that solves an assignment model.
pub trait SolverEngine: Send + Sync + Debug {
    /// Solves the model within the context's budget.
    fn solve(&self, model: &AssignmentModel, context: &SolveContext) -> Solution;

    /// Short engine name recorded in the solve stats.
    fn name(&self) -> &'static str;
}

/// Budget and observers for one solve.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use loadforge_solver::engine::SolveContext;
///
/// let context = SolveContext::with_time_limit(Duration::from_secs(5))
///     .with_improvement_callback(|objective| println!("improved to {objective}"));
/// ```
pub struct SolveContext {
    termination: Box<dyn Termination>,
    started_at: Instant,
    on_improvement: Option<ImprovementCallback>,
}

impl Debug for SolveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveContext")
            .field("termination", &self.termination)
            .field("started_at", &self.started_at)
            .field("on_improvement", &self.on_improvement.is_some())
            .finish()
    }
}

impl SolveContext {
    /// Creates a context with the given termination, starting the clock now.
    pub fn new(termination: impl Termination + 'static) -> Self {
        Self {
            termination: Box::new(termination),
            started_at: Instant::now(),
            on_improvement: None,
        }
    }

    /// Creates a context with no budget at all.
    pub fn unbounded() -> Self {
        Self::new(NoTermination)
    }

    /// Creates a context that stops after `limit`.
    pub fn with_time_limit(limit: Duration) -> Self {
        Self::new(TimeTermination::new(limit))
    }

    /// Creates a context from the configured time and node budgets.
    pub fn from_config(config: &SolverConfig) -> Self {
        let time = TimeTermination::new(config.effective_time_limit());
        match config.node_limit() {
            Some(nodes) => Self::new(OrTermination((time, NodeCountTermination::new(nodes)))),
            None => Self::new(time),
        }
    }

    /// Adds a cancellation flag on top of the existing termination.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        let existing = std::mem::replace(&mut self.termination, Box::new(NoTermination));
        self.termination = Box::new(OrTermination((existing, ExternalTermination::new(flag))));
        self
    }

    /// Registers a callback for improving incumbents.
    pub fn with_improvement_callback(mut self, callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_improvement = Some(Box::new(callback));
        self
    }

    /// Instant the time budget is measured from.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Creates a fresh scope on this context's clock.
    pub fn scope(&self) -> SolveScope {
        SolveScope::new(self.started_at)
    }

    pub fn is_terminated(&self, scope: &SolveScope) -> bool {
        self.termination.is_terminated(scope)
    }

    pub(crate) fn notify_improvement(&self, objective: f64) {
        if let Some(callback) = &self.on_improvement {
            callback(objective);
        }
    }
}

/// Packages slot positions per item into a solution, recomputing the
/// objective from the items actually placed.
pub(crate) fn solution_from_positions(
    model: &AssignmentModel,
    positions: &[Option<usize>],
    status: SolveStatus,
    stats: SolveStats,
) -> Solution {
    let objective = model
        .items()
        .iter()
        .zip(positions)
        .filter(|(_, position)| position.is_some())
        .map(|(item, _)| item.volume)
        .sum();
    Solution::new(
        status,
        model.assignment_from_positions(positions),
        objective,
        stats,
    )
}

/// Solution for a model without variables: nothing can be loaded.
pub(crate) fn trivial_solution(model: &AssignmentModel, stats: SolveStats) -> Solution {
    solution_from_positions(
        model,
        &vec![None; model.item_count()],
        SolveStatus::Optimal,
        stats,
    )
}

/// Builds the engine selected by the configuration.
pub fn engine_from_config(config: &SolverConfig) -> Box<dyn SolverEngine> {
    let exact = BranchAndBoundEngine::new()
        .with_warm_start(config.exact.warm_start)
        .with_symmetry_breaking(config.exact.symmetry_breaking)
        .with_greedy_order(config.greedy.order);
    let greedy = GreedyEngine::new(config.greedy.order);

    match config.engine {
        EngineKind::Exact => Box::new(exact),
        EngineKind::Greedy => Box::new(greedy),
        EngineKind::Auto => Box::new(AutoEngine::new(exact, greedy, config.exact.variable_limit)),
    }
}

#[cfg(test)]
mod tests;
