//! Size-based engine selection.

use tracing::debug;

use loadforge_core::Solution;

use super::{BranchAndBoundEngine, GreedyEngine, SolveContext, SolverEngine};
use crate::model::AssignmentModel;

/// Uses the exact engine up to `variable_limit` variables and the greedy
/// engine above it.
///
/// The exact search is exponential in the worst case; the limit keeps large
/// fleets on the polynomial path.
#[derive(Debug, Clone)]
pub struct AutoEngine {
    exact: BranchAndBoundEngine,
    greedy: GreedyEngine,
    variable_limit: usize,
}

impl AutoEngine {
    pub fn new(exact: BranchAndBoundEngine, greedy: GreedyEngine, variable_limit: usize) -> Self {
        Self {
            exact,
            greedy,
            variable_limit,
        }
    }

    pub fn variable_limit(&self) -> usize {
        self.variable_limit
    }

    /// Returns the engine that would solve `model`.
    pub fn select(&self, model: &AssignmentModel) -> &dyn SolverEngine {
        if model.variable_count() <= self.variable_limit {
            &self.exact
        } else {
            &self.greedy
        }
    }
}

impl Default for AutoEngine {
    fn default() -> Self {
        Self::new(BranchAndBoundEngine::new(), GreedyEngine::default(), 5000)
    }
}

impl SolverEngine for AutoEngine {
    fn solve(&self, model: &AssignmentModel, context: &SolveContext) -> Solution {
        let engine = self.select(model);
        debug!(
            event = "engine_selected",
            engine = engine.name(),
            variable_count = model.variable_count(),
            variable_limit = self.variable_limit,
        );
        engine.solve(model, context)
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}
