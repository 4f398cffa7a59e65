//! Exhaustive reference optimum and assignment checking.
//!
//! Enumerates every way of placing each item into one slot or none. Only
//! suitable for a dozen or so items.

use std::collections::BTreeMap;

use loadforge_core::domain::{Item, ItemId, SlotId, VehicleSlot};
use loadforge_core::{approx_eq, Load};

/// Returns the largest packable volume over all feasible assignments.
///
/// # Example
///
/// ```
/// use loadforge_test::{best_volume, three_items};
///
/// let instance = three_items();
/// assert_eq!(best_volume(&instance.items, &instance.slots), 35.0);
/// ```
pub fn best_volume(items: &[Item], slots: &[VehicleSlot]) -> f64 {
    let mut loads = vec![Load::ZERO; slots.len()];
    let remaining: f64 = items.iter().map(|i| i.volume).sum();
    let mut best = 0.0;
    search(items, slots, 0, &mut loads, 0.0, remaining, &mut best);
    best
}

fn search(
    items: &[Item],
    slots: &[VehicleSlot],
    depth: usize,
    loads: &mut [Load],
    packed: f64,
    remaining: f64,
    best: &mut f64,
) {
    if packed > *best {
        *best = packed;
    }
    if depth == items.len() || packed + remaining <= *best {
        return;
    }

    let item = &items[depth];
    let rest = remaining - item.volume;
    for (idx, slot) in slots.iter().enumerate() {
        let previous = loads[idx];
        let candidate = previous + item.load();
        if candidate.fits_within(&slot.capacity()) {
            loads[idx] = candidate;
            search(items, slots, depth + 1, loads, packed + item.volume, rest, best);
            loads[idx] = previous;
        }
    }
    search(items, slots, depth + 1, loads, packed, rest, best);
}

/// Checks an assignment against the loading invariants.
///
/// Every item must appear exactly once, every referenced slot must exist and
/// no slot may exceed its weight or volume capacity. Returns the recomputed
/// packed volume.
pub fn check_assignment(
    items: &[Item],
    slots: &[VehicleSlot],
    assignment: &BTreeMap<ItemId, Option<SlotId>>,
) -> Result<f64, String> {
    if assignment.len() != items.len() {
        return Err(format!(
            "assignment covers {} items, expected {}",
            assignment.len(),
            items.len()
        ));
    }

    let mut loads = vec![Load::ZERO; slots.len()];
    let mut packed = 0.0;
    for item in items {
        let slot = assignment
            .get(&item.id)
            .ok_or_else(|| format!("item {} missing from assignment", item.id))?;
        if let Some(slot) = *slot {
            let load = loads
                .get_mut(slot)
                .ok_or_else(|| format!("item {} assigned to unknown slot {slot}", item.id))?;
            *load += item.load();
            packed += item.volume;
        }
    }

    for (slot, load) in slots.iter().zip(&loads) {
        if !load.fits_within(&slot.capacity()) {
            return Err(format!(
                "slot {} over capacity: {} kg / {} cm³ loaded, {} kg / {} cm³ allowed",
                slot.id, load.weight, load.volume, slot.max_weight, slot.max_volume
            ));
        }
    }
    Ok(packed)
}

/// Returns true if `objective` matches the volume packed by `assignment`.
pub fn objective_matches(items: &[Item], assignment: &BTreeMap<ItemId, Option<SlotId>>, objective: f64) -> bool {
    let packed: f64 = items
        .iter()
        .filter(|i| matches!(assignment.get(&i.id), Some(Some(_))))
        .map(|i| i.volume)
        .sum();
    approx_eq(packed, objective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;

    #[test]
    fn test_best_volume_fixtures() {
        let cases = [
            (scenario::three_items(), 35.0),
            (scenario::overweight_item(), 10.0),
            (scenario::greedy_trap(), 10.0),
            (scenario::weight_bound(), 12.0),
            (scenario::identical_items(), 24.0),
        ];
        for (instance, expected) in cases {
            assert_eq!(best_volume(&instance.items, &instance.slots), expected);
        }
    }

    #[test]
    fn test_best_volume_without_slots() {
        let instance = scenario::three_items();
        assert_eq!(best_volume(&instance.items, &[]), 0.0);
    }

    #[test]
    fn test_check_assignment_detects_overload() {
        let instance = scenario::three_items();
        let assignment = BTreeMap::from([(0, Some(0)), (1, Some(0)), (2, None)]);

        assert!(check_assignment(&instance.items, &instance.slots, &assignment).is_err());
    }

    #[test]
    fn test_check_assignment_recomputes_volume() {
        let instance = scenario::three_items();
        let assignment = BTreeMap::from([(0, Some(0)), (1, Some(1)), (2, Some(1))]);

        let packed = check_assignment(&instance.items, &instance.slots, &assignment).unwrap();
        assert_eq!(packed, 35.0);
        assert!(objective_matches(&instance.items, &assignment, 35.0));
    }
}
