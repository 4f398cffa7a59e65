//! Turns a solution into per-slot manifests and fleet totals.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use loadforge_config::LeftoverPolicy;
use loadforge_core::domain::{Item, ItemId, SlotId, VehicleSlot};
use loadforge_core::{approx_eq, Load, Solution, SolveStatus};

/// Extraction failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("solution has no assignment (status {0})")]
    NoSolution(SolveStatus),

    #[error("assignment names unknown item {0}")]
    UnknownItem(ItemId),

    #[error("item {0} is missing from the assignment")]
    MissingItem(ItemId),

    #[error("item {item} is assigned to unknown slot {slot}")]
    UnknownSlot { item: ItemId, slot: SlotId },

    #[error("slot {0} is loaded beyond its capacity")]
    CapacityExceeded(SlotId),

    #[error("reported objective {reported} does not match packed volume {recomputed}")]
    ObjectiveMismatch { reported: f64, recomputed: f64 },
}

/// What one vehicle carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotManifest {
    pub slot_id: SlotId,
    pub type_code: String,
    pub capacity: Load,
    /// Loaded items in ascending id order.
    pub items: Vec<Item>,
    pub packed: Load,
    /// Capacity left, subject to the [`LeftoverPolicy`].
    pub leftover: Load,
    pub weight_utilization: f64,
    pub volume_utilization: f64,
}

impl SlotManifest {
    /// Returns true if at least one item was loaded.
    pub fn is_loaded(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Loading plan for the whole fleet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadPlan {
    pub status: SolveStatus,
    pub objective_value: f64,
    pub leftover_policy: LeftoverPolicy,
    /// One manifest per slot, in slot order.
    pub slots: Vec<SlotManifest>,
    pub item_count: usize,
    pub assigned_count: usize,
    /// Ids of items left behind, ascending.
    pub unassigned: Vec<ItemId>,
    pub loaded_slot_count: usize,
    pub total_packed: Load,
    pub total_leftover: Load,
    /// Packed weight over the fleet's total weight capacity.
    pub weight_utilization: f64,
    /// Packed volume over the fleet's total volume capacity.
    pub volume_utilization: f64,
}

impl LoadPlan {
    /// Manifest of the slot with `id`.
    pub fn manifest(&self, id: SlotId) -> Option<&SlotManifest> {
        self.slots.iter().find(|m| m.slot_id == id)
    }

    /// Manifests of slots holding at least one item.
    pub fn loaded_slots(&self) -> impl Iterator<Item = &SlotManifest> {
        self.slots.iter().filter(|m| m.is_loaded())
    }
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}

/// Builds the loading plan of a solution.
///
/// Every item must appear in the assignment and every slot id it names must
/// exist. The packed volume is recomputed from the items and must agree with
/// the solution's objective.
///
/// # Examples
///
/// ```
/// use loadforge_config::LeftoverPolicy;
/// use loadforge_core::domain::{Item, VehicleSlot};
/// use loadforge_solver::extract::extract;
/// use loadforge_solver::optimize;
/// use std::time::Duration;
///
/// let items = vec![Item::new(0, 100.0, 10.0), Item::new(1, 200.0, 20.0)];
/// let slots = vec![VehicleSlot::new(0, "A", 150.0, 15.0), VehicleSlot::new(1, "B", 300.0, 30.0)];
///
/// let solution = optimize(&items, &slots, Duration::from_secs(5));
/// let plan = extract(&solution, &items, &slots, LeftoverPolicy::LoadedSlotsOnly).unwrap();
///
/// assert_eq!(plan.assigned_count, 2);
/// assert_eq!(plan.total_packed.volume, 30.0);
/// ```
pub fn extract(
    solution: &Solution,
    items: &[Item],
    slots: &[VehicleSlot],
    policy: LeftoverPolicy,
) -> Result<LoadPlan, ExtractError> {
    if !solution.has_assignment() {
        return Err(ExtractError::NoSolution(solution.status()));
    }

    let assignment = solution.assignment();
    let item_by_id: HashMap<ItemId, &Item> = items.iter().map(|item| (item.id, item)).collect();
    if let Some(&id) = assignment.keys().find(|id| !item_by_id.contains_key(id)) {
        return Err(ExtractError::UnknownItem(id));
    }
    if let Some(item) = items.iter().find(|item| !assignment.contains_key(&item.id)) {
        return Err(ExtractError::MissingItem(item.id));
    }

    let slot_position: HashMap<SlotId, usize> =
        slots.iter().enumerate().map(|(j, slot)| (slot.id, j)).collect();
    let mut loaded: Vec<Vec<Item>> = vec![Vec::new(); slots.len()];
    let mut unassigned = Vec::new();

    for (&item_id, &slot_id) in assignment {
        let Some(item) = item_by_id.get(&item_id) else {
            continue;
        };
        match slot_id {
            None => unassigned.push(item_id),
            Some(slot) => {
                let &j = slot_position
                    .get(&slot)
                    .ok_or(ExtractError::UnknownSlot { item: item_id, slot })?;
                loaded[j].push(**item);
            }
        }
    }

    let mut manifests = Vec::with_capacity(slots.len());
    let mut total_packed = Load::ZERO;
    let mut total_leftover = Load::ZERO;
    let mut fleet_capacity = Load::ZERO;

    for (slot, items) in slots.iter().zip(loaded) {
        let capacity = slot.capacity();
        let packed = items.iter().fold(Load::ZERO, |acc, item| acc + item.load());
        if !packed.fits_within(&capacity) {
            return Err(ExtractError::CapacityExceeded(slot.id));
        }

        let leftover = match policy {
            LeftoverPolicy::LoadedSlotsOnly if items.is_empty() => Load::ZERO,
            _ => capacity - packed,
        };

        total_packed += packed;
        total_leftover += leftover;
        fleet_capacity += capacity;

        manifests.push(SlotManifest {
            slot_id: slot.id,
            type_code: slot.type_code.clone(),
            capacity,
            items,
            packed,
            leftover,
            weight_utilization: ratio(packed.weight, capacity.weight),
            volume_utilization: ratio(packed.volume, capacity.volume),
        });
    }

    if !approx_eq(total_packed.volume, solution.objective_value()) {
        return Err(ExtractError::ObjectiveMismatch {
            reported: solution.objective_value(),
            recomputed: total_packed.volume,
        });
    }

    let loaded_slot_count = manifests.iter().filter(|m| m.is_loaded()).count();
    debug!(
        event = "extract",
        loaded_slot_count,
        unassigned = unassigned.len(),
        packed_volume = total_packed.volume,
        leftover_volume = total_leftover.volume,
    );

    Ok(LoadPlan {
        status: solution.status(),
        objective_value: solution.objective_value(),
        leftover_policy: policy,
        item_count: items.len(),
        assigned_count: items.len() - unassigned.len(),
        unassigned,
        loaded_slot_count,
        slots: manifests,
        total_packed,
        total_leftover,
        weight_utilization: ratio(total_packed.weight, fleet_capacity.weight),
        volume_utilization: ratio(total_packed.volume, fleet_capacity.volume),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use loadforge_core::SolveStats;
    use loadforge_test::scenario;

    use super::*;

    /// Three-item optimum: items 0 and 2 in `A`, item 1 in `B`.
    fn three_item_solution() -> Solution {
        let assignment = BTreeMap::from([(0, Some(0)), (1, Some(1)), (2, Some(0))]);
        Solution::new(SolveStatus::Optimal, assignment, 35.0, SolveStats::default())
    }

    #[test]
    fn test_manifests_and_totals() {
        let instance = scenario::three_items();
        let plan = extract(
            &three_item_solution(),
            &instance.items,
            &instance.slots,
            LeftoverPolicy::LoadedSlotsOnly,
        )
        .unwrap();

        let a = plan.manifest(0).unwrap();
        assert_eq!(a.items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(a.packed, Load::new(150.0, 15.0));
        assert_eq!(a.leftover, Load::ZERO);
        assert_eq!(a.volume_utilization, 1.0);

        let b = plan.manifest(1).unwrap();
        assert_eq!(b.packed, Load::new(200.0, 20.0));
        assert_eq!(b.leftover, Load::new(100.0, 10.0));

        assert_eq!(plan.total_packed, Load::new(350.0, 35.0));
        assert_eq!(plan.assigned_count, 3);
        assert!(plan.unassigned.is_empty());
        assert_eq!(plan.loaded_slot_count, 2);
        assert_eq!(plan.volume_utilization, 35.0 / 45.0);
    }

    #[test]
    fn test_leftover_policies_differ_on_empty_slots() {
        let instance = scenario::greedy_trap();
        let mut slots = instance.slots.clone();
        slots.push(VehicleSlot::new(1, "B", 50.0, 4.0));
        let assignment = BTreeMap::from([(0, None), (1, Some(0)), (2, Some(0))]);
        let solution = Solution::new(SolveStatus::Optimal, assignment, 10.0, SolveStats::default());

        let loaded_only =
            extract(&solution, &instance.items, &slots, LeftoverPolicy::LoadedSlotsOnly).unwrap();
        assert_eq!(loaded_only.manifest(1).unwrap().leftover, Load::ZERO);
        assert_eq!(loaded_only.total_leftover, Load::new(98.0, 0.0));

        let all = extract(&solution, &instance.items, &slots, LeftoverPolicy::AllSlots).unwrap();
        assert_eq!(all.manifest(1).unwrap().leftover, Load::new(50.0, 4.0));
        assert_eq!(all.total_leftover, Load::new(148.0, 4.0));

        assert_eq!(all.unassigned, vec![0]);
        assert_eq!(all.loaded_slot_count, 1);
        assert_eq!(all.loaded_slots().count(), 1);
    }

    #[test]
    fn test_no_solution() {
        let instance = scenario::three_items();
        let timeout = Solution::without_assignment(SolveStatus::Timeout, SolveStats::default(), "budget");

        let err = extract(&timeout, &instance.items, &instance.slots, LeftoverPolicy::AllSlots).unwrap_err();
        assert_eq!(err, ExtractError::NoSolution(SolveStatus::Timeout));
    }

    #[test]
    fn test_objective_mismatch() {
        let instance = scenario::three_items();
        let assignment = BTreeMap::from([(0, Some(0)), (1, Some(1)), (2, None)]);
        let solution = Solution::new(SolveStatus::Feasible, assignment, 35.0, SolveStats::default());

        let err = extract(&solution, &instance.items, &instance.slots, LeftoverPolicy::AllSlots).unwrap_err();
        assert_eq!(
            err,
            ExtractError::ObjectiveMismatch {
                reported: 35.0,
                recomputed: 30.0
            }
        );
    }

    #[test]
    fn test_unknown_and_missing_ids() {
        let instance = scenario::three_items();

        let unknown_slot = BTreeMap::from([(0, Some(7)), (1, None), (2, None)]);
        let solution = Solution::new(SolveStatus::Feasible, unknown_slot, 10.0, SolveStats::default());
        let err = extract(&solution, &instance.items, &instance.slots, LeftoverPolicy::AllSlots).unwrap_err();
        assert_eq!(err, ExtractError::UnknownSlot { item: 0, slot: 7 });

        let missing = BTreeMap::from([(0, None), (1, None)]);
        let solution = Solution::new(SolveStatus::Feasible, missing, 0.0, SolveStats::default());
        let err = extract(&solution, &instance.items, &instance.slots, LeftoverPolicy::AllSlots).unwrap_err();
        assert_eq!(err, ExtractError::MissingItem(2));

        let unknown_item = BTreeMap::from([(0, None), (1, None), (2, None), (9, None)]);
        let solution = Solution::new(SolveStatus::Feasible, unknown_item, 0.0, SolveStats::default());
        let err = extract(&solution, &instance.items, &instance.slots, LeftoverPolicy::AllSlots).unwrap_err();
        assert_eq!(err, ExtractError::UnknownItem(9));
    }

    #[test]
    fn test_overloaded_slot() {
        let instance = scenario::three_items();
        let assignment = BTreeMap::from([(0, Some(0)), (1, Some(0)), (2, None)]);
        let solution = Solution::new(SolveStatus::Feasible, assignment, 30.0, SolveStats::default());

        let err = extract(&solution, &instance.items, &instance.slots, LeftoverPolicy::AllSlots).unwrap_err();
        assert_eq!(err, ExtractError::CapacityExceeded(0));
    }

    #[test]
    fn test_plan_serializes() {
        let instance = scenario::three_items();
        let plan = extract(
            &three_item_solution(),
            &instance.items,
            &instance.slots,
            LeftoverPolicy::LoadedSlotsOnly,
        )
        .unwrap();

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["status"], "OPTIMAL");
        assert_eq!(json["leftover_policy"], "loaded_slots_only");
        assert_eq!(json["slots"][1]["type_code"], "B");
        assert_eq!(json["total_packed"]["volume"], 35.0);
    }
}
