//! Integer assignment model.
//!
//! One binary variable `x[i][j]` per (item, slot) pair, three constraint
//! families and a linear objective:
//!
//! - at most one slot per item: `Σ_j x[i][j] ≤ 1`
//! - slot weight: `Σ_i x[i][j]·weight_i ≤ max_weight_j`
//! - slot volume: `Σ_i x[i][j]·volume_i ≤ max_volume_j`
//! - maximize `Σ x[i][j]·volume_i`
//!
//! Engines read the model through its candidate lists; the explicit
//! constraint rows are used to verify what an engine returns.

use std::collections::{BTreeMap, HashSet};

use smallvec::SmallVec;
use tracing::debug;

use loadforge_core::domain::{Item, ItemId, SlotId, VehicleSlot};
use loadforge_core::{within_capacity, ValidationError};

/// Index of a variable in [`AssignmentModel::variables`].
pub type VarId = usize;

/// Candidate variables of one item, in slot order.
pub type Candidates = SmallVec<[VarId; 8]>;

/// Binary decision `x[item][slot]`, both given as positions in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub item: usize,
    pub slot: usize,
}

/// Which constraint family a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Item at model position `usize` goes to at most one slot.
    ItemAtMostOne(usize),
    /// Weight ceiling of the slot at model position `usize`.
    SlotWeight(usize),
    /// Volume ceiling of the slot at model position `usize`.
    SlotVolume(usize),
}

/// `Σ coefficient·x ≤ rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<(VarId, f64)>,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Evaluates the left-hand side for a 0/1 vector.
    pub fn lhs(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| values.get(*var).copied().unwrap_or(false))
            .map(|(_, coefficient)| coefficient)
            .sum()
    }

    /// Returns true if the row holds within the capacity tolerance.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        within_capacity(self.lhs(values), self.rhs)
    }
}

/// The assignment problem for one solve.
///
/// The variable count grows as `|items| × |slots|`; pair pruning removes
/// the pairs where a single item already exceeds the slot, which never
/// costs optimality.
#[derive(Debug, Clone)]
pub struct AssignmentModel {
    items: Vec<Item>,
    slots: Vec<VehicleSlot>,
    variables: Vec<Variable>,
    objective: Vec<f64>,
    constraints: Vec<LinearConstraint>,
    candidates: Vec<Candidates>,
    pruned: usize,
}

impl AssignmentModel {
    /// Builds the model, rejecting malformed items or slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadforge_core::domain::{Item, VehicleSlot};
    /// use loadforge_solver::model::AssignmentModel;
    ///
    /// let items = vec![Item::new(0, 100.0, 10.0), Item::new(1, 400.0, 20.0)];
    /// let slots = vec![VehicleSlot::new(0, "A", 150.0, 15.0), VehicleSlot::new(1, "B", 300.0, 30.0)];
    ///
    /// let full = AssignmentModel::build(&items, &slots, false).unwrap();
    /// assert_eq!(full.variable_count(), 4);
    ///
    /// // item 1 weighs more than either slot carries
    /// let pruned = AssignmentModel::build(&items, &slots, true).unwrap();
    /// assert_eq!(pruned.variable_count(), 2);
    /// assert_eq!(pruned.pruned_count(), 2);
    /// ```
    pub fn build(
        items: &[Item],
        slots: &[VehicleSlot],
        prune_unfit_pairs: bool,
    ) -> Result<Self, ValidationError> {
        validate_items(items)?;
        validate_slots(slots)?;

        let mut variables = Vec::with_capacity(items.len() * slots.len());
        let mut objective = Vec::with_capacity(items.len() * slots.len());
        let mut candidates = vec![Candidates::new(); items.len()];
        let mut pruned = 0;

        for (i, item) in items.iter().enumerate() {
            for (j, slot) in slots.iter().enumerate() {
                if prune_unfit_pairs && !item.load().fits_within(&slot.capacity()) {
                    pruned += 1;
                    continue;
                }
                candidates[i].push(variables.len());
                variables.push(Variable { item: i, slot: j });
                objective.push(item.volume);
            }
        }

        let constraints = build_constraints(items, slots, &variables, &candidates);

        debug!(
            event = "model_built",
            item_count = items.len(),
            slot_count = slots.len(),
            variable_count = variables.len(),
            pruned_count = pruned,
            constraint_count = constraints.len(),
        );

        Ok(Self {
            items: items.to_vec(),
            slots: slots.to_vec(),
            variables,
            objective,
            constraints,
            candidates,
            pruned,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn slots(&self) -> &[VehicleSlot] {
        &self.slots
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of binary variables after pruning.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of (item, slot) pairs omitted by pruning.
    pub fn pruned_count(&self) -> usize {
        self.pruned
    }

    /// Objective coefficient per variable: the item's volume.
    pub fn objective_coefficients(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Variables of the item at model position `item`, in slot order.
    pub fn candidates(&self, item: usize) -> &[VarId] {
        self.candidates
            .get(item)
            .map(|c| c.as_slice())
            .unwrap_or_default()
    }

    /// Slot positions the item at `item` may be loaded into, in slot order.
    pub fn candidate_slots(&self, item: usize) -> impl Iterator<Item = usize> + '_ {
        self.candidates(item).iter().map(|&var| self.variables[var].slot)
    }

    /// Variable for the pair, or `None` if pruned or out of range.
    pub fn variable_of(&self, item: usize, slot: usize) -> Option<VarId> {
        self.candidates(item)
            .iter()
            .copied()
            .find(|&var| self.variables[var].slot == slot)
    }

    /// Objective value of a 0/1 vector.
    pub fn objective_of(&self, values: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, set)| **set)
            .map(|(coefficient, _)| coefficient)
            .sum()
    }

    /// Constraint rows a 0/1 vector violates.
    pub fn violations_of(&self, values: &[bool]) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values))
            .collect()
    }

    /// Converts slot positions per item into a 0/1 vector.
    ///
    /// Returns `None` if an entry names a pair the model does not contain.
    pub fn values_from_positions(&self, positions: &[Option<usize>]) -> Option<Vec<bool>> {
        let mut values = vec![false; self.variables.len()];
        for (item, position) in positions.iter().enumerate() {
            if let Some(slot) = *position {
                values[self.variable_of(item, slot)?] = true;
            }
        }
        Some(values)
    }

    /// Converts an id-keyed assignment into slot positions per item.
    ///
    /// Returns `None` if an item is missing or a slot id is unknown.
    pub fn positions_from_assignment(
        &self,
        assignment: &BTreeMap<ItemId, Option<SlotId>>,
    ) -> Option<Vec<Option<usize>>> {
        if assignment.len() != self.items.len() {
            return None;
        }
        self.items
            .iter()
            .map(|item| match assignment.get(&item.id)? {
                None => Some(None),
                Some(slot_id) => self
                    .slots
                    .iter()
                    .position(|s| s.id == *slot_id)
                    .map(Some),
            })
            .collect()
    }

    /// Converts slot positions per item into an id-keyed assignment.
    pub fn assignment_from_positions(
        &self,
        positions: &[Option<usize>],
    ) -> BTreeMap<ItemId, Option<SlotId>> {
        self.items
            .iter()
            .zip(positions)
            .map(|(item, position)| (item.id, position.map(|j| self.slots[j].id)))
            .collect()
    }
}

fn build_constraints(
    items: &[Item],
    slots: &[VehicleSlot],
    variables: &[Variable],
    candidates: &[Candidates],
) -> Vec<LinearConstraint> {
    let mut constraints = Vec::with_capacity(items.len() + 2 * slots.len());

    for (i, vars) in candidates.iter().enumerate() {
        constraints.push(LinearConstraint {
            kind: ConstraintKind::ItemAtMostOne(i),
            terms: vars.iter().map(|&var| (var, 1.0)).collect(),
            rhs: 1.0,
        });
    }

    let mut by_slot: Vec<Vec<VarId>> = vec![Vec::new(); slots.len()];
    for (var, v) in variables.iter().enumerate() {
        by_slot[v.slot].push(var);
    }

    for (j, (slot, vars)) in slots.iter().zip(&by_slot).enumerate() {
        constraints.push(LinearConstraint {
            kind: ConstraintKind::SlotWeight(j),
            terms: vars
                .iter()
                .map(|&var| (var, items[variables[var].item].weight))
                .collect(),
            rhs: slot.max_weight,
        });
        constraints.push(LinearConstraint {
            kind: ConstraintKind::SlotVolume(j),
            terms: vars
                .iter()
                .map(|&var| (var, items[variables[var].item].volume))
                .collect(),
            rhs: slot.max_volume,
        });
    }

    constraints
}

fn validate_items(items: &[Item]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for (record, item) in items.iter().enumerate() {
        for (field, value) in [("weight", item.weight), ("volume", item.volume)] {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { record, field });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative {
                    record,
                    field,
                    value,
                });
            }
        }
        if !seen.insert(item.id) {
            return Err(ValidationError::DuplicateId {
                kind: "item",
                id: item.id,
            });
        }
    }
    Ok(())
}

fn validate_slots(slots: &[VehicleSlot]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(slots.len());
    for slot in slots {
        for (field, value) in [("max_weight", slot.max_weight), ("max_volume", slot.max_volume)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidCapacity {
                    code: slot.type_code.clone(),
                    field,
                    value,
                });
            }
        }
        if !seen.insert(slot.id) {
            return Err(ValidationError::DuplicateId {
                kind: "slot",
                id: slot.id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
