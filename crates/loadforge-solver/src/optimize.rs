//! Top-level solve entry points.
//!
//! Logging levels:
//! - **INFO**: solve start/end with problem scale and outcome
//! - **DEBUG**: model construction, engine selection, search summary
//! - **TRACE**: individual search nodes

use std::time::Duration;

use tracing::{error, info, warn};

use loadforge_config::SolverConfig;
use loadforge_core::domain::{Item, VehicleSlot};
use loadforge_core::{approx_eq, Solution, SolveStats, SolveStatus};

use crate::engine::{engine_from_config, SolveContext, SolverEngine};
use crate::model::AssignmentModel;

/// Solves the loading problem within `time_budget` using the default
/// configuration.
///
/// Never panics: invalid input yields an `Error` solution carrying a message.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use loadforge_core::domain::{Item, VehicleSlot};
/// use loadforge_core::SolveStatus;
/// use loadforge_solver::optimize;
///
/// let items = vec![
///     Item::new(0, 100.0, 10.0),
///     Item::new(1, 200.0, 20.0),
///     Item::new(2, 50.0, 5.0),
/// ];
/// let slots = vec![
///     VehicleSlot::new(0, "A", 150.0, 15.0),
///     VehicleSlot::new(1, "B", 300.0, 30.0),
/// ];
///
/// let solution = optimize(&items, &slots, Duration::from_secs(10));
/// assert_eq!(solution.status(), SolveStatus::Optimal);
/// assert_eq!(solution.objective_value(), 35.0);
/// assert_eq!(solution.slot_of(1), Some(1));
/// ```
pub fn optimize(items: &[Item], slots: &[VehicleSlot], time_budget: Duration) -> Solution {
    optimize_with_config(items, slots, &SolverConfig::new().with_time_limit(time_budget))
}

/// Solves the loading problem as configured.
pub fn optimize_with_config(items: &[Item], slots: &[VehicleSlot], config: &SolverConfig) -> Solution {
    optimize_with_context(items, slots, config, SolveContext::from_config(config))
}

/// Solves the loading problem with a caller-supplied context.
///
/// The context's termination replaces the configured one; everything else
/// (engine, pruning, engine options) comes from `config`.
pub fn optimize_with_context(
    items: &[Item],
    slots: &[VehicleSlot],
    config: &SolverConfig,
    context: SolveContext,
) -> Solution {
    if let Err(e) = config.validate() {
        warn!(event = "solve_rejected", reason = %e);
        return Solution::without_assignment(SolveStatus::Error, SolveStats::default(), e.to_string());
    }

    let model = match AssignmentModel::build(items, slots, config.prune_unfit_pairs) {
        Ok(model) => model,
        Err(e) => {
            warn!(event = "solve_rejected", reason = %e);
            return Solution::without_assignment(
                SolveStatus::Error,
                SolveStats::default(),
                format!("invalid input: {e}"),
            );
        }
    };

    info!(
        event = "solve_start",
        item_count = model.item_count(),
        slot_count = model.slot_count(),
        variable_count = model.variable_count(),
        pruned_count = model.pruned_count(),
        time_limit_ms = config.effective_time_limit().as_millis() as u64,
    );

    let engine = engine_from_config(config);
    let solution = solve_model(&model, engine.as_ref(), &context);

    info!(
        event = "solve_end",
        status = %solution.status(),
        objective = solution.objective_value(),
        assigned = solution.assigned_count(),
        nodes = solution.stats().nodes_explored,
        duration_ms = solution.stats().duration_ms,
    );
    solution
}

/// Runs `engine` on a built model and checks what it returns.
///
/// An `Infeasible` status, or an assignment that breaks a constraint or
/// misreports its objective, is turned into an `Error` solution.
pub fn solve_model(model: &AssignmentModel, engine: &dyn SolverEngine, context: &SolveContext) -> Solution {
    let solution = engine.solve(model, context);

    match solution.status() {
        SolveStatus::Infeasible => {
            error!(
                event = "internal_error",
                engine = engine.name(),
                reason = "engine reported an infeasible model",
            );
            solution.with_status(
                SolveStatus::Error,
                "engine reported infeasible, but leaving every item unassigned is always feasible",
            )
        }
        SolveStatus::Optimal | SolveStatus::Feasible => match verify(model, &solution) {
            Ok(()) => solution,
            Err(reason) => {
                error!(event = "internal_error", engine = engine.name(), reason = %reason);
                solution.with_status(SolveStatus::Error, reason)
            }
        },
        SolveStatus::Timeout | SolveStatus::Error => solution,
    }
}

/// Checks a solution's assignment against the model's constraint rows.
fn verify(model: &AssignmentModel, solution: &Solution) -> Result<(), String> {
    let positions = model
        .positions_from_assignment(solution.assignment())
        .ok_or_else(|| "assignment does not cover the model's items and slots".to_string())?;
    let values = model
        .values_from_positions(&positions)
        .ok_or_else(|| "assignment uses an item/slot pair absent from the model".to_string())?;

    let violations = model.violations_of(&values);
    if let Some(first) = violations.first() {
        return Err(format!(
            "assignment violates {} constraint(s), first {:?}",
            violations.len(),
            first.kind
        ));
    }

    let recomputed = model.objective_of(&values);
    if !approx_eq(recomputed, solution.objective_value()) {
        return Err(format!(
            "reported objective {} but the assignment packs {recomputed}",
            solution.objective_value()
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "optimize_tests.rs"]
mod tests;
