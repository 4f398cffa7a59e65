//! Cargo items and the catalog builder that normalizes raw records.

use serde::{Deserialize, Serialize};

use super::units::LengthUnit;
use crate::capacity::Load;
use crate::error::ValidationError;

/// Stable identifier of an item: its position in the input sequence.
pub type ItemId = usize;

/// A cargo item as seen by the optimizer.
///
/// Weight is in kilograms, volume in cubic centimetres. Items are immutable
/// once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub weight: f64,
    pub volume: f64,
}

impl Item {
    /// Creates an item without validation.
    ///
    /// Prefer [`ItemCatalogBuilder`] for external data; this constructor is
    /// for callers that already hold normalized values.
    pub const fn new(id: ItemId, weight: f64, volume: f64) -> Self {
        Self { id, weight, volume }
    }

    /// Creates an item, rejecting negative or non-finite values.
    pub fn try_new(id: ItemId, weight: f64, volume: f64) -> Result<Self, ValidationError> {
        check_value(id, "weight", Some(weight))?;
        check_value(id, "volume", Some(volume))?;
        Ok(Self::new(id, weight, volume))
    }

    /// Weight and volume as a [`Load`].
    #[inline]
    pub fn load(&self) -> Load {
        Load::new(self.weight, self.volume)
    }

    /// Volume per unit of weight. Weightless items rank as infinitely dense.
    pub fn density(&self) -> f64 {
        if self.weight > 0.0 {
            self.volume / self.weight
        } else {
            f64::INFINITY
        }
    }
}

/// A raw item record with physical dimensions.
///
/// Field names accept both snake_case and the column headers of the
/// spreadsheet export (`"Actual Weight"`, `"Actual Length"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default, alias = "Actual Weight")]
    pub weight: Option<f64>,
    #[serde(default, alias = "Actual Length")]
    pub length: Option<f64>,
    #[serde(default, alias = "Actual Width")]
    pub width: Option<f64>,
    #[serde(default, alias = "Actual Height")]
    pub height: Option<f64>,
}

impl ItemRecord {
    /// Creates a complete record.
    pub fn new(weight: f64, length: f64, width: f64, height: f64) -> Self {
        Self {
            weight: Some(weight),
            length: Some(length),
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Builds [`Item`]s from raw records.
///
/// Dimensions are converted from `unit` to centimetres so that every volume
/// is in cm³, the unit shared with vehicle slots.
///
/// # Examples
///
/// ```
/// use loadforge_core::domain::{ItemCatalogBuilder, ItemRecord, LengthUnit};
///
/// let records = vec![
///     ItemRecord::new(12.0, 0.5, 0.4, 0.3),
///     ItemRecord::new(3.5, 0.2, 0.2, 0.2),
/// ];
/// let items = ItemCatalogBuilder::new()
///     .with_unit(LengthUnit::Meter)
///     .build(&records)
///     .unwrap();
///
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[1].id, 1);
/// assert!((items[0].volume - 60_000.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemCatalogBuilder {
    unit: LengthUnit,
}

impl ItemCatalogBuilder {
    /// Creates a builder reading dimensions in centimetres.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unit of the record dimensions.
    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Returns the configured dimension unit.
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Normalizes records into items, failing on the first invalid field.
    pub fn build<'a, I>(&self, records: I) -> Result<Vec<Item>, ValidationError>
    where
        I: IntoIterator<Item = &'a ItemRecord>,
    {
        records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| self.build_one(idx, record))
            .collect()
    }

    fn build_one(&self, idx: usize, record: &ItemRecord) -> Result<Item, ValidationError> {
        let weight = check_value(idx, "weight", record.weight)?;
        let length = check_value(idx, "length", record.length)?;
        let width = check_value(idx, "width", record.width)?;
        let height = check_value(idx, "height", record.height)?;

        Ok(Item::new(
            idx,
            weight,
            self.unit.box_volume_cm3(length, width, height),
        ))
    }
}

fn check_value(record: usize, field: &'static str, value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { record, field })?;
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
    Ok(value)
}

/// Sums the volume of a set of items.
pub fn total_volume(items: &[Item]) -> f64 {
    items.iter().map(|i| i.volume).sum()
}

/// Sums the weight of a set of items.
pub fn total_weight(items: &[Item]) -> f64 {
    items.iter().map(|i| i.weight).sum()
}
