//! LoadForge - Cargo loading optimization in Rust
//!
//! Assigns items to a heterogeneous vehicle fleet so that the loaded volume
//! is as large as possible without overloading any vehicle.
//!
//! # Example
//!
//! ```rust
//! use loadforge::prelude::*;
//!
//! let items = ItemCatalogBuilder::new()
//!     .build(&[ItemRecord::new(100.0, 50.0, 40.0, 30.0), ItemRecord::new(20.0, 10.0, 10.0, 10.0)])
//!     .unwrap();
//! let fleet = allocations_from_catalog(&VehicleCatalog::standard(), &[FleetEntry::new("VAN", 1)]).unwrap();
//! let slots = expand_fleet(&fleet, SlotOrder::SmallestFirst).unwrap();
//!
//! let config = SolverConfig::new().with_termination_seconds(5);
//! let plan = loadforge::plan(&items, &slots, &config).unwrap();
//! assert_eq!(plan.assigned_count, 2);
//! ```

// Domain types
pub use loadforge_core::domain::{
    allocations_from_catalog, expand_fleet, reference_fleet, total_volume, total_weight,
    FleetAllocation, FleetEntry, Item, ItemCatalogBuilder, ItemId, ItemRecord, LengthUnit, SlotId,
    SlotOrder, VehicleCatalog, VehicleSlot, VehicleType,
};
pub use loadforge_core::{Load, LoadForgeError, Solution, SolveStats, SolveStatus, ValidationError};

// Configuration
pub use loadforge_config::{ConfigError, EngineKind, GreedyOrder, LeftoverPolicy, SolverConfig};

// Solving
pub use loadforge_solver::{
    extract, optimize, optimize_with_config, ExtractError, LoadPlan, LoadProblem, SlotManifest,
    SolveContext, SolverEngine, SolverJob, SolverManager,
};

// Engine, model and termination building blocks
pub use loadforge_solver::{engine, manager, model, termination};

#[cfg(feature = "console")]
pub use loadforge_console as console;

mod solve;
pub use solve::{plan, solve};

pub mod prelude {
    pub use super::{
        allocations_from_catalog, expand_fleet, reference_fleet, FleetEntry, Item,
        ItemCatalogBuilder, ItemRecord, LengthUnit, SlotOrder, VehicleCatalog, VehicleSlot,
    };
    pub use super::{EngineKind, LeftoverPolicy, SolverConfig};
    pub use super::{LoadPlan, Solution, SolveStatus};
}
