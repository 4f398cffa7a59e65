//! First-fit decreasing engine.

use tracing::{debug, info, trace};

use loadforge_config::GreedyOrder;
use loadforge_core::{Solution, SolveStatus};

use super::bound::{density_order, reaches_bound, upper_bound, volume_order};
use super::state::LoadState;
use super::{solution_from_positions, trivial_solution, SolveContext, SolverEngine};
use crate::model::AssignmentModel;
use crate::scope::SolveScope;

/// Places items one by one, largest first, into the first slot in slot
/// order with room left.
///
/// Runs in `O(items × slots)`. The result is proven optimal when every item
/// is loaded or when it meets the model's upper bound; otherwise it is
/// reported as feasible.
///
/// # Example
///
/// ```
/// use loadforge_core::domain::{Item, VehicleSlot};
/// use loadforge_core::SolveStatus;
/// use loadforge_solver::engine::{GreedyEngine, SolveContext, SolverEngine};
/// use loadforge_solver::model::AssignmentModel;
///
/// let items = vec![Item::new(0, 100.0, 10.0), Item::new(1, 200.0, 20.0)];
/// let slots = vec![VehicleSlot::new(0, "A", 300.0, 30.0)];
/// let model = AssignmentModel::build(&items, &slots, true).unwrap();
///
/// let solution = GreedyEngine::default().solve(&model, &SolveContext::unbounded());
/// assert_eq!(solution.status(), SolveStatus::Optimal);
/// assert_eq!(solution.objective_value(), 30.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyEngine {
    order: GreedyOrder,
}

/// Outcome of one greedy pass.
pub(crate) struct Construction {
    pub(crate) state: LoadState,
    /// False if the termination fired before every item was considered.
    pub(crate) completed: bool,
}

impl GreedyEngine {
    pub fn new(order: GreedyOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> GreedyOrder {
        self.order
    }

    fn item_order(&self, model: &AssignmentModel) -> Vec<usize> {
        match self.order {
            GreedyOrder::VolumeDecreasing => volume_order(model),
            GreedyOrder::DensityDecreasing => density_order(model),
        }
    }

    /// Runs one pass on the context's budget.
    ///
    /// Returns `None` if the termination fired before the first placement.
    pub(crate) fn construct(
        &self,
        model: &AssignmentModel,
        context: &SolveContext,
        scope: &mut SolveScope,
    ) -> Option<Construction> {
        let mut state = LoadState::new(model);
        let mut completed = true;

        for (step, item) in self.item_order(model).into_iter().enumerate() {
            if context.is_terminated(scope) {
                if step == 0 {
                    return None;
                }
                completed = false;
                break;
            }
            scope.increment_node_count();

            let slot = model
                .candidate_slots(item)
                .find(|&slot| state.can_place(model, item, slot));
            if let Some(slot) = slot {
                state.place(model, item, slot);
            }
            trace!(event = "place", step, item, slot = ?slot);
        }

        debug!(
            event = "construction_end",
            placed = state.placed_count(),
            packed = state.packed(),
            completed,
        );
        Some(Construction { state, completed })
    }
}

impl SolverEngine for GreedyEngine {
    fn solve(&self, model: &AssignmentModel, context: &SolveContext) -> Solution {
        info!(
            event = "engine_start",
            engine = self.name(),
            order = ?self.order,
            variable_count = model.variable_count(),
        );

        let mut scope = context.scope();
        if model.variable_count() == 0 {
            return trivial_solution(model, scope.to_stats(self.name()));
        }

        let Some(run) = self.construct(model, context, &mut scope) else {
            return Solution::without_assignment(
                SolveStatus::Timeout,
                scope.to_stats(self.name()),
                "terminated before the first item was placed",
            );
        };

        let packed = run.state.packed();
        if scope.record_improvement(packed) {
            context.notify_improvement(packed);
        }

        let status = if run.state.placed_count() == model.item_count()
            || (run.completed && reaches_bound(packed, upper_bound(model)))
        {
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        };

        solution_from_positions(
            model,
            run.state.positions(),
            status,
            scope.to_stats(self.name()),
        )
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
