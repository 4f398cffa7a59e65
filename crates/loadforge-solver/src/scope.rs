//! Per-solve bookkeeping shared by engines and terminations.

use std::time::{Duration, Instant};

use loadforge_core::SolveStats;

/// Counters and timing for one engine run.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use loadforge_solver::scope::SolveScope;
///
/// let mut scope = SolveScope::new(Instant::now());
/// scope.increment_node_count();
/// scope.record_improvement(12.5);
///
/// assert_eq!(scope.nodes_explored(), 1);
/// assert_eq!(scope.best_objective(), Some(12.5));
/// ```
#[derive(Debug, Clone)]
pub struct SolveScope {
    started_at: Instant,
    nodes_explored: u64,
    nodes_pruned: u64,
    improvements: u64,
    best_objective: Option<f64>,
}

impl SolveScope {
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            nodes_explored: 0,
            nodes_pruned: 0,
            improvements: 0,
            best_objective: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn increment_node_count(&mut self) -> u64 {
        self.nodes_explored += 1;
        self.nodes_explored
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    pub fn record_prune(&mut self) {
        self.nodes_pruned += 1;
    }

    pub fn nodes_pruned(&self) -> u64 {
        self.nodes_pruned
    }

    /// Records a new incumbent. Returns false if it is not strictly better.
    pub fn record_improvement(&mut self, objective: f64) -> bool {
        if self.best_objective.is_some_and(|best| objective <= best) {
            return false;
        }
        self.best_objective = Some(objective);
        self.improvements += 1;
        true
    }

    pub fn improvements(&self) -> u64 {
        self.improvements
    }

    /// Objective of the incumbent, if any assignment exists yet.
    pub fn best_objective(&self) -> Option<f64> {
        self.best_objective
    }

    /// Freezes the counters into the stats attached to a solution.
    pub fn to_stats(&self, engine: &str) -> SolveStats {
        SolveStats {
            engine: engine.to_string(),
            nodes_explored: self.nodes_explored,
            nodes_pruned: self.nodes_pruned,
            improvements: self.improvements,
            duration_ms: u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
