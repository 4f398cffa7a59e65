//! Seeded random instances.
//!
//! Uses ChaCha8 so that a seed yields the same instance on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use loadforge_core::domain::{Item, VehicleSlot};

use crate::scenario::Instance;

/// Shape of a random instance.
#[derive(Clone, Debug)]
pub struct RandomInstanceSpec {
    pub item_count: usize,
    pub slot_count: usize,
    /// Item weight range, kg.
    pub weight: (f64, f64),
    /// Item volume range, cm³.
    pub volume: (f64, f64),
    /// Slot weight capacity range, kg.
    pub slot_weight: (f64, f64),
    /// Slot volume capacity range, cm³.
    pub slot_volume: (f64, f64),
}

impl RandomInstanceSpec {
    /// Items and slots of comparable size, so that roughly half the items fit.
    pub fn new(item_count: usize, slot_count: usize) -> Self {
        Self {
            item_count,
            slot_count,
            weight: (1.0, 50.0),
            volume: (1.0, 40.0),
            slot_weight: (40.0, 120.0),
            slot_volume: (30.0, 100.0),
        }
    }
}

fn sample(rng: &mut ChaCha8Rng, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        // two decimals keep instances readable in failure output
        (rng.random_range(lo..hi) * 100.0).round() / 100.0
    } else {
        lo
    }
}

/// Generates a deterministic instance from `seed`.
///
/// Slot capacities are drawn once per type; a third of the slots repeat the
/// previous slot's capacity so that symmetric fleets are exercised.
pub fn random_instance(seed: u64, spec: &RandomInstanceSpec) -> Instance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let items = (0..spec.item_count)
        .map(|id| {
            let weight = sample(&mut rng, spec.weight);
            let volume = sample(&mut rng, spec.volume);
            Item::new(id, weight, volume)
        })
        .collect();

    let mut slots: Vec<VehicleSlot> = Vec::with_capacity(spec.slot_count);
    for id in 0..spec.slot_count {
        let repeat = id > 0 && rng.random_range(0..3) == 0;
        let slot = match slots.last() {
            Some(prev) if repeat => VehicleSlot::new(id, prev.type_code.clone(), prev.max_weight, prev.max_volume),
            _ => VehicleSlot::new(
                id,
                format!("R{id}"),
                sample(&mut rng, spec.slot_weight),
                sample(&mut rng, spec.slot_volume),
            ),
        };
        slots.push(slot);
    }

    Instance::new(items, slots)
}
