//! Optimistic bound on the volume a partial assignment can still gain.
//!
//! The bound is the minimum of three relaxations over the remaining items:
//! - the volume of remaining items that still fit some slot on their own
//! - the total remaining volume capacity of the fleet
//! - a fractional knapsack over the total remaining weight capacity, taking
//!   items by decreasing volume per kilogram

use loadforge_core::CAPACITY_TOLERANCE;

use super::state::LoadState;
use crate::model::AssignmentModel;

/// Orders item positions by decreasing density, then decreasing volume.
pub(crate) fn density_order(model: &AssignmentModel) -> Vec<usize> {
    let items = model.items();
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[b]
            .density()
            .total_cmp(&items[a].density())
            .then(items[b].volume.total_cmp(&items[a].volume))
            .then(a.cmp(&b))
    });
    order
}

/// Orders item positions by decreasing volume, then decreasing weight.
pub(crate) fn volume_order(model: &AssignmentModel) -> Vec<usize> {
    let items = model.items();
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[b]
            .volume
            .total_cmp(&items[a].volume)
            .then(items[b].weight.total_cmp(&items[a].weight))
            .then(a.cmp(&b))
    });
    order
}

/// Computes optimistic bounds for one model.
#[derive(Debug, Clone)]
pub(crate) struct Bounder {
    by_density: Vec<usize>,
}

impl Bounder {
    pub(crate) fn new(model: &AssignmentModel) -> Self {
        Self {
            by_density: density_order(model),
        }
    }

    /// Largest volume the items selected by `remaining` could still add.
    pub(crate) fn remaining<F>(&self, model: &AssignmentModel, state: &LoadState, remaining: F) -> f64
    where
        F: Fn(usize) -> bool,
    {
        let mut volume_slack = 0.0;
        let mut weight_slack = 0.0;
        for (slot, vehicle) in model.slots().iter().enumerate() {
            let load = state.load(slot);
            volume_slack += (vehicle.max_volume - load.volume).max(0.0);
            weight_slack += (vehicle.max_weight - load.weight).max(0.0);
        }

        let mut fitting = 0.0;
        let mut knapsack = 0.0;
        let mut weight_left = weight_slack;
        let mut knapsack_full = false;
        for &item in &self.by_density {
            if !remaining(item) || !state.fits_somewhere(model, item) {
                continue;
            }
            let it = &model.items()[item];
            fitting += it.volume;
            if knapsack_full {
                continue;
            }
            if it.weight <= weight_left {
                knapsack += it.volume;
                weight_left -= it.weight;
            } else {
                knapsack += it.volume * weight_left / it.weight;
                knapsack_full = true;
            }
        }

        fitting.min(volume_slack).min(knapsack)
    }
}

/// Upper bound on the objective of any feasible assignment.
///
/// # Example
///
/// ```
/// use loadforge_core::domain::{Item, VehicleSlot};
/// use loadforge_solver::engine::upper_bound;
/// use loadforge_solver::model::AssignmentModel;
///
/// // one slot holding 10 cm³, items of 6, 5 and 5
/// let items = vec![Item::new(0, 1.0, 6.0), Item::new(1, 1.0, 5.0), Item::new(2, 1.0, 5.0)];
/// let slots = vec![VehicleSlot::new(0, "A", 100.0, 10.0)];
/// let model = AssignmentModel::build(&items, &slots, true).unwrap();
///
/// assert_eq!(upper_bound(&model), 10.0);
/// ```
pub fn upper_bound(model: &AssignmentModel) -> f64 {
    let state = LoadState::new(model);
    Bounder::new(model).remaining(model, &state, |_| true)
}

/// Returns true if `bound` cannot beat `best` by more than the tolerance.
#[inline]
pub(crate) fn cannot_improve(bound: f64, best: f64) -> bool {
    bound <= best + CAPACITY_TOLERANCE * best.abs().max(1.0)
}

/// Returns true if `objective` meets `bound` within the tolerance.
#[inline]
pub(crate) fn reaches_bound(objective: f64, bound: f64) -> bool {
    objective >= bound - CAPACITY_TOLERANCE * bound.abs().max(1.0)
}
