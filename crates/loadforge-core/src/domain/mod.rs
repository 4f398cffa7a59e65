//! Domain model: items, vehicle types, fleet slots.
//!
//! Everything here is built once from external inputs before a solve and
//! never mutated by the optimizer.

mod fleet;
mod item;
mod units;
mod vehicle;

#[cfg(test)]
mod tests;

pub use fleet::{
    allocations_from_catalog, expand_fleet, reference_fleet, FleetAllocation, FleetEntry, SlotId,
    SlotOrder, VehicleSlot,
};
pub use item::{total_volume, total_weight, Item, ItemCatalogBuilder, ItemId, ItemRecord};
pub use units::{LengthUnit, FEET_TO_CM};
pub use vehicle::{VehicleCatalog, VehicleType};
