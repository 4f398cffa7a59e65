//! Configured solve entry points.

use loadforge_config::SolverConfig;
use loadforge_core::domain::{Item, VehicleSlot};
use loadforge_core::Solution;
use loadforge_solver::{extract, optimize_with_config, ExtractError, LoadPlan};

/// Solves with `config`, installing the console output first when the
/// `console` feature is enabled.
pub fn solve(items: &[Item], slots: &[VehicleSlot], config: &SolverConfig) -> Solution {
    #[cfg(feature = "console")]
    loadforge_console::init();

    optimize_with_config(items, slots, config)
}

/// Solves and extracts the loading plan under the configured leftover policy.
///
/// # Errors
///
/// Fails with [`ExtractError::NoSolution`] when the solve timed out or
/// failed.
pub fn plan(items: &[Item], slots: &[VehicleSlot], config: &SolverConfig) -> Result<LoadPlan, ExtractError> {
    let solution = solve(items, slots, config);
    extract(&solution, items, slots, config.leftover_policy)
}
