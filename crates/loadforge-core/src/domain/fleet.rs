//! Fleet description and expansion into individual vehicle slots.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::vehicle::VehicleCatalog;
use crate::capacity::Load;
use crate::error::ValidationError;

/// Stable identifier of a slot: its position in the expanded slot list.
pub type SlotId = usize;

/// One physical vehicle unit with its type's capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSlot {
    pub id: SlotId,
    pub type_code: String,
    pub max_weight: f64,
    pub max_volume: f64,
}

impl VehicleSlot {
    /// Creates a slot without validation.
    pub fn new(id: SlotId, type_code: impl Into<String>, max_weight: f64, max_volume: f64) -> Self {
        Self {
            id,
            type_code: type_code.into(),
            max_weight,
            max_volume,
        }
    }

    /// Capacity as a [`Load`].
    #[inline]
    pub fn capacity(&self) -> Load {
        Load::new(self.max_weight, self.max_volume)
    }

    /// Returns true if two slots have identical capacity.
    #[inline]
    pub fn same_capacity(&self, other: &VehicleSlot) -> bool {
        self.max_weight == other.max_weight && self.max_volume == other.max_volume
    }
}

/// A number of vehicles of one type, with the type's capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetAllocation {
    pub type_code: String,
    pub count: usize,
    pub max_weight: f64,
    pub max_volume: f64,
}

impl FleetAllocation {
    pub fn new(type_code: impl Into<String>, count: usize, max_weight: f64, max_volume: f64) -> Self {
        Self {
            type_code: type_code.into(),
            count,
            max_weight,
            max_volume,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("max_weight", self.max_weight), ("max_volume", self.max_volume)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidCapacity {
                    code: self.type_code.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A compact fleet entry naming a catalog vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetEntry {
    #[serde(alias = "type_code")]
    pub code: String,
    #[serde(alias = "number")]
    pub count: usize,
}

impl FleetEntry {
    pub fn new(code: impl Into<String>, count: usize) -> Self {
        Self {
            code: code.into(),
            count,
        }
    }
}

/// Order in which expanded slots are listed.
///
/// The order decides which of several equally good slots an item lands in and
/// the order of the report. It never changes the optimal packed volume: the
/// objective and constraints are symmetric in the slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOrder {
    /// Keep the allocation order.
    AsGiven,
    /// Reverse the allocation order.
    Reversed,
    /// Ascending by volume, then weight capacity. Stable.
    #[default]
    SmallestFirst,
    /// Descending by volume, then weight capacity. Stable.
    LargestFirst,
}

impl std::fmt::Display for SlotOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotOrder::AsGiven => write!(f, "AsGiven"),
            SlotOrder::Reversed => write!(f, "Reversed"),
            SlotOrder::SmallestFirst => write!(f, "SmallestFirst"),
            SlotOrder::LargestFirst => write!(f, "LargestFirst"),
        }
    }
}

fn capacity_cmp(a: &FleetAllocation, b: &FleetAllocation) -> Ordering {
    a.max_volume
        .total_cmp(&b.max_volume)
        .then(a.max_weight.total_cmp(&b.max_weight))
}

/// Expands fleet allocations into one slot per vehicle unit.
///
/// Slot ids are assigned `0..n` after ordering.
///
/// # Examples
///
/// ```
/// use loadforge_core::domain::{expand_fleet, FleetAllocation, SlotOrder};
///
/// let fleet = vec![
///     FleetAllocation::new("LORRY-L", 1, 5000.0, 24_261_874.16),
///     FleetAllocation::new("VAN", 2, 500.0, 2_378_615.11),
/// ];
/// let slots = expand_fleet(&fleet, SlotOrder::SmallestFirst).unwrap();
///
/// assert_eq!(slots.len(), 3);
/// assert_eq!(slots[0].type_code, "VAN");
/// assert_eq!(slots[2].type_code, "LORRY-L");
/// assert_eq!(slots[2].id, 2);
/// ```
pub fn expand_fleet(
    allocations: &[FleetAllocation],
    order: SlotOrder,
) -> Result<Vec<VehicleSlot>, ValidationError> {
    for allocation in allocations {
        allocation.validate()?;
    }

    let mut ordered: Vec<&FleetAllocation> = allocations.iter().collect();
    match order {
        SlotOrder::AsGiven => {}
        SlotOrder::Reversed => ordered.reverse(),
        SlotOrder::SmallestFirst => ordered.sort_by(|a, b| capacity_cmp(a, b)),
        SlotOrder::LargestFirst => ordered.sort_by(|a, b| capacity_cmp(b, a)),
    }

    let total: usize = ordered.iter().map(|a| a.count).sum();
    let mut slots = Vec::with_capacity(total);
    for allocation in ordered {
        for _ in 0..allocation.count {
            slots.push(VehicleSlot::new(
                slots.len(),
                allocation.type_code.clone(),
                allocation.max_weight,
                allocation.max_volume,
            ));
        }
    }
    Ok(slots)
}

/// Resolves compact `{code, count}` entries against a catalog.
pub fn allocations_from_catalog(
    catalog: &VehicleCatalog,
    entries: &[FleetEntry],
) -> Result<Vec<FleetAllocation>, ValidationError> {
    entries
        .iter()
        .map(|entry| {
            let ty = catalog
                .get(&entry.code)
                .ok_or_else(|| ValidationError::UnknownVehicleType(entry.code.clone()))?;
            Ok(FleetAllocation::new(
                ty.code.clone(),
                entry.count,
                ty.max_weight,
                ty.max_volume(),
            ))
        })
        .collect()
}

/// The reference fleet: one 5-tonne, two 3-tonne and three 1-tonne lorries,
/// three vans and six pickups, largest first.
pub fn reference_fleet() -> Vec<FleetEntry> {
    vec![
        FleetEntry::new("LORRY-L", 1),
        FleetEntry::new("LORRY-M", 2),
        FleetEntry::new("LORRY-S", 3),
        FleetEntry::new("VAN", 3),
        FleetEntry::new("4x4", 6),
    ]
}
