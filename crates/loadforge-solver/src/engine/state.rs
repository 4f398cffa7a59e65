//! Mutable loading state shared by the engines.

use loadforge_core::Load;

use crate::model::AssignmentModel;

/// Per-slot loads and per-item placement for a partial assignment.
///
/// Items and slots are addressed by model position.
#[derive(Debug, Clone)]
pub(crate) struct LoadState {
    loads: Vec<Load>,
    counts: Vec<u32>,
    positions: Vec<Option<usize>>,
    packed: f64,
}

impl LoadState {
    pub(crate) fn new(model: &AssignmentModel) -> Self {
        Self {
            loads: vec![Load::ZERO; model.slot_count()],
            counts: vec![0; model.slot_count()],
            positions: vec![None; model.item_count()],
            packed: 0.0,
        }
    }

    /// Returns true if the item fits the slot's remaining capacity.
    #[inline]
    pub(crate) fn can_place(&self, model: &AssignmentModel, item: usize, slot: usize) -> bool {
        (self.loads[slot] + model.items()[item].load()).fits_within(&model.slots()[slot].capacity())
    }

    /// Returns true if some candidate slot can still take the item.
    pub(crate) fn fits_somewhere(&self, model: &AssignmentModel, item: usize) -> bool {
        model
            .candidate_slots(item)
            .any(|slot| self.can_place(model, item, slot))
    }

    pub(crate) fn place(&mut self, model: &AssignmentModel, item: usize, slot: usize) {
        let it = &model.items()[item];
        self.loads[slot] += it.load();
        self.counts[slot] += 1;
        self.positions[item] = Some(slot);
        self.packed += it.volume;
    }

    pub(crate) fn remove(&mut self, model: &AssignmentModel, item: usize) {
        if let Some(slot) = self.positions[item].take() {
            let it = &model.items()[item];
            self.loads[slot] -= it.load();
            self.counts[slot] -= 1;
            self.packed -= it.volume;
        }
    }

    /// Returns true if no item has been placed in the slot.
    #[inline]
    pub(crate) fn is_empty_slot(&self, slot: usize) -> bool {
        self.counts[slot] == 0
    }

    pub(crate) fn load(&self, slot: usize) -> Load {
        self.loads[slot]
    }

    pub(crate) fn position(&self, item: usize) -> Option<usize> {
        self.positions[item]
    }

    pub(crate) fn positions(&self) -> &[Option<usize>] {
        &self.positions
    }

    /// Volume placed so far, accumulated incrementally.
    pub(crate) fn packed(&self) -> f64 {
        self.packed
    }

    pub(crate) fn placed_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }
}
