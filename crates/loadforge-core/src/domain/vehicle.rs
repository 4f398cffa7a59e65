//! Vehicle types and the static vehicle catalog.

use serde::{Deserialize, Serialize};

use super::units::LengthUnit;
use crate::error::ValidationError;

/// A class of vehicle with fixed cargo-bay dimensions and payload limit.
///
/// Dimensions are expressed in `unit` (feet for the standard catalog) and
/// converted to a cm³ capacity rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub max_weight: f64,
    #[serde(default = "default_vehicle_unit")]
    pub unit: LengthUnit,
}

fn default_vehicle_unit() -> LengthUnit {
    LengthUnit::Foot
}

impl VehicleType {
    /// Creates a vehicle type with dimensions in feet.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        length: f64,
        height: f64,
        width: f64,
        max_weight: f64,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            length,
            height,
            width,
            max_weight,
            unit: LengthUnit::Foot,
        }
    }

    /// Cargo-bay volume in cm³, rounded to two decimals.
    pub fn max_volume(&self) -> f64 {
        let raw = self.unit.box_volume_cm3(self.length, self.width, self.height);
        (raw * 100.0).round() / 100.0
    }

    /// Checks that the payload and every dimension are positive and finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("max_weight", self.max_weight),
            ("length", self.length),
            ("height", self.height),
            ("width", self.width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidCapacity {
                    code: self.code.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Lookup table of vehicle types by code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleCatalog {
    types: Vec<VehicleType>,
}

impl VehicleCatalog {
    /// Creates a catalog, rejecting duplicate codes and invalid dimensions.
    pub fn new(types: Vec<VehicleType>) -> Result<Self, ValidationError> {
        for (idx, ty) in types.iter().enumerate() {
            ty.validate()?;
            if types[..idx].iter().any(|other| other.code == ty.code) {
                return Err(ValidationError::DuplicateVehicleType(ty.code.clone()));
            }
        }
        Ok(Self { types })
    }

    /// The five reference vehicle types, smallest first.
    ///
    /// | code      | description   | L × H × W (ft) | payload (kg) |
    /// |-----------|---------------|----------------|--------------|
    /// | `4x4`     | 4x4 Pickup    | 4 × 3 × 3.5    | 500          |
    /// | `VAN`     | Van           | 8 × 3 × 3.5    | 500          |
    /// | `LORRY-S` | 1-tonne lorry | 10 × 5 × 5     | 1000         |
    /// | `LORRY-M` | 3-tonne lorry | 14 × 7.2 × 7   | 3000         |
    /// | `LORRY-L` | 5-tonne lorry | 17 × 7.2 × 7   | 5000         |
    pub fn standard() -> Self {
        Self {
            types: vec![
                VehicleType::new("4x4", "4x4 Pickup", 4.0, 3.0, 3.5, 500.0),
                VehicleType::new("VAN", "Van", 8.0, 3.0, 3.5, 500.0),
                VehicleType::new("LORRY-S", "1-tonne lorry", 10.0, 5.0, 5.0, 1000.0),
                VehicleType::new("LORRY-M", "3-tonne lorry", 14.0, 7.2, 7.0, 3000.0),
                VehicleType::new("LORRY-L", "5-tonne lorry", 17.0, 7.2, 7.0, 5000.0),
            ],
        }
    }

    /// Finds a vehicle type by code.
    pub fn get(&self, code: &str) -> Option<&VehicleType> {
        self.types.iter().find(|t| t.code == code)
    }

    /// Returns all types in catalog order.
    pub fn types(&self) -> &[VehicleType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
