//! Concurrent solving of independent problems.
//!
//! Every solve builds its own model, so problems share nothing but the
//! configuration. [`SolverManager::solve_batch`] fans a batch out over the
//! rayon pool; [`SolverManager::spawn`] runs one problem on a background
//! thread and hands back a [`SolverJob`] to watch or cancel it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use loadforge_config::SolverConfig;
use loadforge_core::domain::{Item, VehicleSlot};
use loadforge_core::{LoadForgeError, Solution, SolveStatus};

use crate::engine::SolveContext;
use crate::optimize::{optimize_with_config, optimize_with_context};

/// Items and slots for one solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadProblem {
    pub items: Vec<Item>,
    pub slots: Vec<VehicleSlot>,
}

impl LoadProblem {
    pub fn new(items: Vec<Item>, slots: Vec<VehicleSlot>) -> Self {
        Self { items, slots }
    }
}

/// Runs solves with a shared configuration.
///
/// # Examples
///
/// ```
/// use loadforge_config::SolverConfig;
/// use loadforge_core::domain::{Item, VehicleSlot};
/// use loadforge_solver::manager::{LoadProblem, SolverManager};
///
/// let manager = SolverManager::new(SolverConfig::new());
/// let problems = vec![
///     LoadProblem::new(vec![Item::new(0, 10.0, 5.0)], vec![VehicleSlot::new(0, "A", 20.0, 10.0)]),
///     LoadProblem::new(vec![Item::new(0, 30.0, 5.0)], vec![VehicleSlot::new(0, "A", 20.0, 10.0)]),
/// ];
///
/// let solutions = manager.solve_batch(&problems);
/// assert_eq!(solutions[0].objective_value(), 5.0);
/// assert_eq!(solutions[1].objective_value(), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverManager {
    config: SolverConfig,
}

impl SolverManager {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves one problem on the calling thread.
    pub fn solve(&self, problem: &LoadProblem) -> Solution {
        optimize_with_config(&problem.items, &problem.slots, &self.config)
    }

    /// Solves every problem in parallel, returning solutions in input order.
    pub fn solve_batch(&self, problems: &[LoadProblem]) -> Vec<Solution> {
        debug!(event = "batch_start", problem_count = problems.len());
        problems.par_iter().map(|problem| self.solve(problem)).collect()
    }

    /// Starts solving `problem` on a background thread.
    ///
    /// # Errors
    ///
    /// Returns [`LoadForgeError::Internal`] if the thread cannot be spawned.
    pub fn spawn(&self, problem: LoadProblem) -> Result<SolverJob, LoadForgeError> {
        let terminate = Arc::new(AtomicBool::new(false));
        let (improvement_tx, improvement_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();

        let config = self.config.clone();
        let flag = Arc::clone(&terminate);

        thread::Builder::new()
            .name("loadforge-solve".to_string())
            .spawn(move || {
                let context = SolveContext::from_config(&config)
                    .with_terminate_flag(flag)
                    .with_improvement_callback(move |objective| {
                        let _ = improvement_tx.send(objective);
                    });
                let solution = optimize_with_context(&problem.items, &problem.slots, &config, context);
                let _ = result_tx.send(solution);
            })
            .map_err(|e| LoadForgeError::Internal(format!("failed to spawn solver thread: {e}")))?;

        Ok(SolverJob {
            terminate,
            improvements: improvement_rx,
            result: result_rx,
        })
    }
}

/// Handle to a solve running in the background.
///
/// Improving objective values stream through [`next_improvement`]; the final
/// solution arrives once through [`result`] or [`blocking_result`].
///
/// [`next_improvement`]: SolverJob::next_improvement
/// [`result`]: SolverJob::result
/// [`blocking_result`]: SolverJob::blocking_result
#[derive(Debug)]
pub struct SolverJob {
    terminate: Arc<AtomicBool>,
    improvements: mpsc::UnboundedReceiver<f64>,
    result: oneshot::Receiver<Solution>,
}

impl SolverJob {
    /// Asks the engine to stop at its next node.
    ///
    /// The job still delivers a solution: the best incumbent so far, or a
    /// cancellation error if none existed yet.
    pub fn terminate_early(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    pub fn is_terminate_early_requested(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    /// Returns a pending improvement without waiting.
    pub fn try_next_improvement(&mut self) -> Option<f64> {
        self.improvements.try_recv().ok()
    }

    /// Waits for the next improvement; `None` once the solve has finished.
    pub async fn next_improvement(&mut self) -> Option<f64> {
        self.improvements.recv().await
    }

    /// Waits for the final solution, blocking the current thread.
    ///
    /// Must not be called from within an async runtime.
    pub fn blocking_result(self) -> Result<Solution, LoadForgeError> {
        let cancelled = self.is_terminate_early_requested();
        let received = self.result.blocking_recv();
        finish(received.ok(), cancelled)
    }

    /// Waits for the final solution.
    pub async fn result(self) -> Result<Solution, LoadForgeError> {
        let cancelled = self.is_terminate_early_requested();
        let received = self.result.await;
        finish(received.ok(), cancelled)
    }
}

fn finish(received: Option<Solution>, cancelled: bool) -> Result<Solution, LoadForgeError> {
    let solution = received
        .ok_or_else(|| LoadForgeError::Internal("solver thread ended without a result".to_string()))?;
    if cancelled && solution.status() == SolveStatus::Timeout {
        return Err(LoadForgeError::Cancelled);
    }
    Ok(solution)
}
