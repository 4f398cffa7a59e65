//! Hand-built loading instances.
//!
//! Each fixture documents its optimum so tests can assert against it
//! directly.

use loadforge_core::domain::{
    allocations_from_catalog, expand_fleet, reference_fleet as reference_fleet_entries,
    FleetAllocation, Item, SlotOrder, VehicleCatalog, VehicleSlot,
};

/// Items and slots for one solve.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub items: Vec<Item>,
    pub slots: Vec<VehicleSlot>,
}

impl Instance {
    pub fn new(items: Vec<Item>, slots: Vec<VehicleSlot>) -> Self {
        Self { items, slots }
    }

    /// Number of (item, slot) pairs before pruning.
    pub fn pair_count(&self) -> usize {
        self.items.len() * self.slots.len()
    }
}

/// Builds items from `(weight, volume)` pairs with positional ids.
pub fn items(pairs: &[(f64, f64)]) -> Vec<Item> {
    pairs
        .iter()
        .enumerate()
        .map(|(id, &(weight, volume))| Item::new(id, weight, volume))
        .collect()
}

/// Builds slots from `(code, max_weight, max_volume)` triples with
/// positional ids.
pub fn slots(triples: &[(&str, f64, f64)]) -> Vec<VehicleSlot> {
    triples
        .iter()
        .enumerate()
        .map(|(id, &(code, weight, volume))| VehicleSlot::new(id, code, weight, volume))
        .collect()
}

/// Three items, two slots.
///
/// Weights `[100, 200, 50]`, volumes `[10, 20, 5]`; slot `A` carries
/// 150 kg / 15 cm³, slot `B` 300 kg / 30 cm³. Everything fits: item 1 must
/// go to `B`, item 0 to `A`, item 2 to either. Optimum 35.
pub fn three_items() -> Instance {
    Instance::new(
        items(&[(100.0, 10.0), (200.0, 20.0), (50.0, 5.0)]),
        slots(&[("A", 150.0, 15.0), ("B", 300.0, 30.0)]),
    )
}

/// One item heavier than every slot next to one that fits. Optimum 10.
pub fn overweight_item() -> Instance {
    Instance::new(
        items(&[(1000.0, 1.0), (10.0, 10.0)]),
        slots(&[("A", 500.0, 100.0), ("B", 400.0, 100.0)]),
    )
}

/// Volume-bound instance where first-fit decreasing is not optimal.
///
/// One slot of 10 cm³; volumes `[6, 5, 5]`. Greedy packs 6 then nothing
/// else fits; the optimum packs both 5s for 10.
pub fn greedy_trap() -> Instance {
    Instance::new(
        items(&[(1.0, 6.0), (1.0, 5.0), (1.0, 5.0)]),
        slots(&[("A", 100.0, 10.0)]),
    )
}

/// Weight-bound instance: the lightest items are the bulkiest per kilogram.
///
/// One slot of 10 kg; `(weight, volume)` = `(10, 10)`, `(5, 6)`, `(5, 6)`.
/// The two light items give 12 against 10 for the heavy one.
pub fn weight_bound() -> Instance {
    Instance::new(
        items(&[(10.0, 10.0), (5.0, 6.0), (5.0, 6.0)]),
        slots(&[("A", 10.0, 100.0)]),
    )
}

/// Six identical items and three identical slots each holding two.
pub fn identical_items() -> Instance {
    Instance::new(
        items(&[(10.0, 4.0); 6]),
        slots(&[("T", 20.0, 8.0), ("T", 20.0, 8.0), ("T", 20.0, 8.0)]),
    )
}

/// Volumes that fill a slot exactly once rounding drift is accounted for.
pub fn exact_fill() -> Instance {
    Instance::new(
        items(&[(1.0, 0.1), (1.0, 0.2), (1.0, 0.3)]),
        slots(&[("A", 3.0, 0.6)]),
    )
}

/// The reference fleet resolved against the standard catalog.
pub fn reference_allocations() -> Vec<FleetAllocation> {
    allocations_from_catalog(&VehicleCatalog::standard(), &reference_fleet_entries())
        .expect("reference fleet uses catalog codes")
}

/// The reference fleet expanded with `order`.
pub fn reference_fleet(order: SlotOrder) -> Vec<VehicleSlot> {
    expand_fleet(&reference_allocations(), order).expect("reference fleet is valid")
}
