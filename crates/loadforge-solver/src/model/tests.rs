//! Tests for the assignment model.

use std::collections::BTreeMap;

use loadforge_core::domain::{Item, VehicleSlot};
use loadforge_core::ValidationError;
use loadforge_test::scenario;

use super::*;

#[test]
fn test_full_model_is_cartesian_product() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&instance.items, &instance.slots, false).unwrap();

    assert_eq!(model.variable_count(), 6);
    assert_eq!(model.pruned_count(), 0);
    assert_eq!(model.objective_coefficients(), &[10.0, 10.0, 20.0, 20.0, 5.0, 5.0]);
    // 3 at-most-one rows, 2 rows per slot
    assert_eq!(model.constraints().len(), 7);
}

#[test]
fn test_pruning_drops_pairs_that_never_fit() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&instance.items, &instance.slots, true).unwrap();

    // item 1 (200 kg, 20 cm³) exceeds slot A on both axes
    assert_eq!(model.variable_count(), 5);
    assert_eq!(model.pruned_count(), 1);
    assert_eq!(model.candidate_slots(1).collect::<Vec<_>>(), vec![1]);
    assert_eq!(model.variable_of(1, 0), None);
}

#[test]
fn test_overweight_item_has_no_candidates() {
    let instance = scenario::overweight_item();
    let model = AssignmentModel::build(&instance.items, &instance.slots, true).unwrap();

    assert!(model.candidates(0).is_empty());
    assert_eq!(model.candidates(1).len(), 2);
}

#[test]
fn test_constraint_rows() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&instance.items, &instance.slots, false).unwrap();

    let weight_b = model
        .constraints()
        .iter()
        .find(|c| c.kind == ConstraintKind::SlotWeight(1))
        .unwrap();
    assert_eq!(weight_b.rhs, 300.0);
    let coefficients: Vec<f64> = weight_b.terms.iter().map(|(_, c)| *c).collect();
    assert_eq!(coefficients, vec![100.0, 200.0, 50.0]);

    let at_most_one = &model.constraints()[0];
    assert_eq!(at_most_one.kind, ConstraintKind::ItemAtMostOne(0));
    assert_eq!(at_most_one.rhs, 1.0);
    assert_eq!(at_most_one.terms.len(), 2);
}

#[test]
fn test_objective_and_violations() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&instance.items, &instance.slots, false).unwrap();

    let good = model
        .values_from_positions(&[Some(0), Some(1), Some(1)])
        .unwrap();
    assert_eq!(model.objective_of(&good), 35.0);
    assert!(model.violations_of(&good).is_empty());

    let overloaded = model
        .values_from_positions(&[Some(0), Some(0), None])
        .unwrap();
    let kinds: Vec<ConstraintKind> = model
        .violations_of(&overloaded)
        .iter()
        .map(|c| c.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![ConstraintKind::SlotWeight(0), ConstraintKind::SlotVolume(0)]
    );
}

#[test]
fn test_double_assignment_violates_at_most_one() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&instance.items, &instance.slots, false).unwrap();

    let mut values = vec![false; model.variable_count()];
    values[model.variable_of(2, 0).unwrap()] = true;
    values[model.variable_of(2, 1).unwrap()] = true;

    let violations = model.violations_of(&values);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ConstraintKind::ItemAtMostOne(2));
}

#[test]
fn test_tolerance_accepts_rounding_drift() {
    let instance = scenario::exact_fill();
    let model = AssignmentModel::build(&instance.items, &instance.slots, true).unwrap();
    let values = model
        .values_from_positions(&[Some(0), Some(0), Some(0)])
        .unwrap();

    assert!(model.violations_of(&values).is_empty());
}

#[test]
fn test_positions_round_trip_through_ids() {
    let items = vec![Item::new(7, 1.0, 1.0), Item::new(3, 1.0, 1.0)];
    let slots = vec![VehicleSlot::new(10, "A", 5.0, 5.0), VehicleSlot::new(20, "B", 5.0, 5.0)];
    let model = AssignmentModel::build(&items, &slots, true).unwrap();

    let assignment = model.assignment_from_positions(&[Some(1), None]);
    assert_eq!(assignment, BTreeMap::from([(7, Some(20)), (3, None)]));
    assert_eq!(
        model.positions_from_assignment(&assignment),
        Some(vec![Some(1), None])
    );

    let unknown_slot = BTreeMap::from([(7, Some(99)), (3, None)]);
    assert_eq!(model.positions_from_assignment(&unknown_slot), None);
}

#[test]
fn test_pruned_pair_is_not_representable() {
    let instance = scenario::overweight_item();
    let model = AssignmentModel::build(&instance.items, &instance.slots, true).unwrap();

    assert_eq!(model.values_from_positions(&[Some(0), None]), None);
}

#[test]
fn test_rejects_duplicate_item_ids() {
    let items = vec![Item::new(1, 1.0, 1.0), Item::new(1, 2.0, 2.0)];
    let slots = vec![VehicleSlot::new(0, "A", 5.0, 5.0)];

    let err = AssignmentModel::build(&items, &slots, true).unwrap_err();
    assert_eq!(err, ValidationError::DuplicateId { kind: "item", id: 1 });
}

#[test]
fn test_rejects_negative_volume() {
    let items = vec![Item::new(0, 1.0, -1.0)];
    let err = AssignmentModel::build(&items, &[], true).unwrap_err();

    assert!(matches!(err, ValidationError::Negative { field: "volume", .. }));
}

#[test]
fn test_rejects_zero_capacity_slot() {
    let slots = vec![VehicleSlot::new(0, "A", 0.0, 5.0)];
    let err = AssignmentModel::build(&[], &slots, true).unwrap_err();

    assert!(matches!(err, ValidationError::InvalidCapacity { field: "max_weight", .. }));
}

#[test]
fn test_empty_inputs() {
    let model = AssignmentModel::build(&[], &[], true).unwrap();

    assert_eq!(model.variable_count(), 0);
    assert_eq!(model.constraints().len(), 0);
    assert_eq!(model.objective_of(&[]), 0.0);
}
