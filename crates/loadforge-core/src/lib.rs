//! LoadForge Core - Domain types for cargo loading optimization
//!
//! This crate provides the data model shared by every LoadForge crate:
//! - Items and the catalog builder that normalizes raw records
//! - Vehicle types, the standard catalog and fleet expansion into slots
//! - Weight/volume load arithmetic with a shared capacity tolerance
//! - The `Solution` produced by a solve and its status taxonomy
//! - Error types
//!
//! Units are fixed: kilograms for weight, cubic centimetres for volume.

pub mod capacity;
pub mod domain;
pub mod error;
pub mod solution;

pub use capacity::{approx_eq, within_capacity, Load, CAPACITY_TOLERANCE};
pub use domain::{Item, ItemId, SlotId, SlotOrder, VehicleSlot};
pub use error::{LoadForgeError, Result, ValidationError};
pub use solution::{Solution, SolveStats, SolveStatus};
