//! Tests for the domain model.

use super::*;
use crate::error::ValidationError;

fn reference_allocations() -> Vec<FleetAllocation> {
    vec![
        FleetAllocation::new("LORRY-L", 1, 5000.0, 24_261_874.16),
        FleetAllocation::new("LORRY-M", 2, 3000.0, 19_980_366.96),
        FleetAllocation::new("LORRY-S", 3, 1000.0, 7_079_211.65),
        FleetAllocation::new("VAN", 3, 500.0, 2_378_615.11),
        FleetAllocation::new("4x4", 6, 500.0, 1_189_307.56),
    ]
}

#[test]
fn test_build_items_assigns_positional_ids() {
    let records = vec![
        ItemRecord::new(10.0, 2.0, 3.0, 4.0),
        ItemRecord::new(0.0, 1.0, 1.0, 1.0),
    ];
    let items = ItemCatalogBuilder::new().build(&records).unwrap();

    assert_eq!(items[0], Item::new(0, 10.0, 24.0));
    assert_eq!(items[1], Item::new(1, 0.0, 1.0));
}

#[test]
fn test_build_items_rejects_missing_field() {
    let records = vec![
        ItemRecord::new(1.0, 1.0, 1.0, 1.0),
        ItemRecord {
            weight: Some(3.0),
            length: Some(1.0),
            width: None,
            height: Some(1.0),
        },
    ];
    let err = ItemCatalogBuilder::new().build(&records).unwrap_err();

    assert_eq!(
        err,
        ValidationError::MissingField {
            record: 1,
            field: "width"
        }
    );
}

#[test]
fn test_build_items_rejects_negative_weight() {
    let records = vec![ItemRecord::new(-1.0, 1.0, 1.0, 1.0)];
    let err = ItemCatalogBuilder::new().build(&records).unwrap_err();

    assert!(matches!(
        err,
        ValidationError::Negative {
            record: 0,
            field: "weight",
            ..
        }
    ));
}

#[test]
fn test_build_items_rejects_nan_dimension() {
    let records = vec![ItemRecord::new(1.0, 1.0, 1.0, f64::NAN)];
    let err = ItemCatalogBuilder::new().build(&records).unwrap_err();

    assert_eq!(
        err,
        ValidationError::NotFinite {
            record: 0,
            field: "height"
        }
    );
}

#[test]
fn test_item_record_accepts_spreadsheet_headers() {
    let json = r#"{"Actual Weight": 12.5, "Actual Length": 40, "Actual Width": 30, "Actual Height": 20}"#;
    let record: ItemRecord = serde_json::from_str(json).unwrap();

    assert_eq!(record, ItemRecord::new(12.5, 40.0, 30.0, 20.0));
}

#[test]
fn test_item_try_new() {
    assert!(Item::try_new(0, 1.0, 2.0).is_ok());
    assert!(Item::try_new(0, -1.0, 2.0).is_err());
    assert!(Item::try_new(0, 1.0, f64::INFINITY).is_err());
}

#[test]
fn test_item_density() {
    assert_eq!(Item::new(0, 2.0, 10.0).density(), 5.0);
    assert!(Item::new(0, 0.0, 10.0).density().is_infinite());
}

#[test]
fn test_standard_catalog_volumes() {
    let catalog = VehicleCatalog::standard();
    let expected = [
        ("4x4", 1_189_307.56),
        ("VAN", 2_378_615.11),
        ("LORRY-S", 7_079_211.65),
        ("LORRY-M", 19_980_366.96),
        ("LORRY-L", 24_261_874.16),
    ];

    assert_eq!(catalog.len(), 5);
    for (code, volume) in expected {
        let ty = catalog.get(code).unwrap();
        assert!(
            (ty.max_volume() - volume).abs() < 0.011,
            "{code}: {} != {volume}",
            ty.max_volume()
        );
    }
}

#[test]
fn test_catalog_rejects_duplicates() {
    let err = VehicleCatalog::new(vec![
        VehicleType::new("VAN", "Van", 8.0, 3.0, 3.5, 500.0),
        VehicleType::new("VAN", "Van again", 8.0, 3.0, 3.5, 500.0),
    ])
    .unwrap_err();

    assert_eq!(err, ValidationError::DuplicateVehicleType("VAN".to_string()));
}

#[test]
fn test_catalog_rejects_zero_payload() {
    let err = VehicleCatalog::new(vec![VehicleType::new("X", "", 1.0, 1.0, 1.0, 0.0)]).unwrap_err();

    assert!(matches!(err, ValidationError::InvalidCapacity { field: "max_weight", .. }));
}

#[test]
fn test_expand_fleet_length_is_sum_of_counts() {
    let slots = expand_fleet(&reference_allocations(), SlotOrder::AsGiven).unwrap();

    assert_eq!(slots.len(), 15);
    assert!(slots.iter().enumerate().all(|(idx, s)| s.id == idx));
}

#[test]
fn test_expand_fleet_reversed_lists_smallest_first() {
    let slots = expand_fleet(&reference_allocations(), SlotOrder::Reversed).unwrap();
    let codes: Vec<&str> = slots.iter().map(|s| s.type_code.as_str()).collect();

    assert_eq!(&codes[..6], &["4x4"; 6]);
    assert_eq!(&codes[6..9], &["VAN"; 3]);
    assert_eq!(codes[14], "LORRY-L");
}

#[test]
fn test_expand_fleet_smallest_and_largest_first() {
    let mut shuffled = reference_allocations();
    shuffled.swap(0, 3);

    let smallest = expand_fleet(&shuffled, SlotOrder::SmallestFirst).unwrap();
    assert!(smallest.windows(2).all(|w| w[0].max_volume <= w[1].max_volume));

    let largest = expand_fleet(&shuffled, SlotOrder::LargestFirst).unwrap();
    assert!(largest.windows(2).all(|w| w[0].max_volume >= w[1].max_volume));
}

#[test]
fn test_expand_fleet_zero_count_contributes_nothing() {
    let slots = expand_fleet(
        &[FleetAllocation::new("VAN", 0, 500.0, 10.0)],
        SlotOrder::AsGiven,
    )
    .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn test_expand_fleet_rejects_non_positive_capacity() {
    let err = expand_fleet(
        &[FleetAllocation::new("BROKEN", 1, 500.0, 0.0)],
        SlotOrder::AsGiven,
    )
    .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidCapacity { field: "max_volume", .. }));
}

#[test]
fn test_allocations_from_catalog() {
    let catalog = VehicleCatalog::standard();
    let allocations =
        allocations_from_catalog(&catalog, &[FleetEntry::new("VAN", 3), FleetEntry::new("4x4", 6)])
            .unwrap();

    assert_eq!(allocations.len(), 2);
    assert_eq!(allocations[0].count, 3);
    assert_eq!(allocations[0].max_weight, 500.0);
}

#[test]
fn test_allocations_from_catalog_unknown_code() {
    let catalog = VehicleCatalog::standard();
    let err = allocations_from_catalog(&catalog, &[FleetEntry::new("BUS", 1)]).unwrap_err();

    assert_eq!(err, ValidationError::UnknownVehicleType("BUS".to_string()));
}

#[test]
fn test_fleet_entry_accepts_legacy_field_names() {
    let entry: FleetEntry = serde_json::from_str(r#"{"type_code": "VAN", "number": 3}"#).unwrap();
    assert_eq!(entry, FleetEntry::new("VAN", 3));
}

#[test]
fn test_reference_fleet_resolves_against_standard_catalog() {
    let allocations =
        allocations_from_catalog(&VehicleCatalog::standard(), &reference_fleet()).unwrap();
    let slots = expand_fleet(&allocations, SlotOrder::AsGiven).unwrap();

    assert_eq!(slots.len(), 15);
    assert_eq!(slots[0].type_code, "LORRY-L");
    assert_eq!(slots[14].type_code, "4x4");
}
