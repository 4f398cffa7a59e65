//! Length units accepted at the input boundary.
//!
//! The model works in kilograms and cubic centimetres only. Every other unit
//! is converted before an `Item` or `VehicleSlot` is created.

use serde::{Deserialize, Serialize};

/// Centimetres per foot.
pub const FEET_TO_CM: f64 = 30.48;

/// Unit of a linear dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Millimeter,
    #[default]
    Centimeter,
    Meter,
    Inch,
    Foot,
}

impl LengthUnit {
    /// Centimetres in one unit.
    pub const fn centimeters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.1,
            LengthUnit::Centimeter => 1.0,
            LengthUnit::Meter => 100.0,
            LengthUnit::Inch => 2.54,
            LengthUnit::Foot => FEET_TO_CM,
        }
    }

    /// Converts a length in this unit to centimetres.
    #[inline]
    pub fn to_centimeters(self, value: f64) -> f64 {
        value * self.centimeters_per_unit()
    }

    /// Volume in cm³ of a box whose sides are given in this unit.
    pub fn box_volume_cm3(self, length: f64, width: f64, height: f64) -> f64 {
        self.to_centimeters(length) * self.to_centimeters(width) * self.to_centimeters(height)
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Millimeter => write!(f, "mm"),
            LengthUnit::Centimeter => write!(f, "cm"),
            LengthUnit::Meter => write!(f, "m"),
            LengthUnit::Inch => write!(f, "in"),
            LengthUnit::Foot => write!(f, "ft"),
        }
    }
}
