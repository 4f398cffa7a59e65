//! Item and fleet files.
//!
//! Both are read as JSON, YAML or TOML depending on the file extension.
//! Item files may also be CSV with one record per row, headed either
//! `weight,length,width,height` or by the spreadsheet export columns
//! (`Actual Weight`, `Actual Length`, ...).

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use loadforge::{
    allocations_from_catalog, expand_fleet, FleetEntry, Item, ItemCatalogBuilder, ItemRecord,
    LengthUnit, SlotOrder, VehicleCatalog, VehicleSlot, VehicleType,
};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
    Toml,
    Csv,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("csv") => Ok(Self::Csv),
            _ => Err(CliError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, message: impl ToString) -> CliError {
    CliError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Reads a structured document. CSV cannot nest, so it is rejected here.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let parse: fn(&str) -> Result<T, String> = match DocumentFormat::from_path(path)? {
        DocumentFormat::Json => |text| serde_json::from_str(text).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => |text| serde_yaml::from_str(text).map_err(|e| e.to_string()),
        DocumentFormat::Toml => |text| toml::from_str(text).map_err(|e| e.to_string()),
        DocumentFormat::Csv => return Err(CliError::UnsupportedFormat(path.to_path_buf())),
    };
    parse(&read_text(path)?).map_err(|message| parse_error(path, message))
}

fn read_csv_records(path: &Path) -> Result<Vec<ItemRecord>, CliError> {
    let text = read_text(path)?;
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
        .deserialize()
        .collect::<Result<Vec<ItemRecord>, csv::Error>>()
        .map_err(|e| parse_error(path, e))
}

/// An item file: either a bare list of records or an `items` table.
///
/// TOML has no top-level arrays, so TOML files always use `[[items]]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemsDocument {
    List(Vec<ItemRecord>),
    Table { items: Vec<ItemRecord> },
}

impl ItemsDocument {
    fn into_records(self) -> Vec<ItemRecord> {
        match self {
            ItemsDocument::List(records) | ItemsDocument::Table { items: records } => records,
        }
    }
}

/// Reads item records from `path` and normalizes them to cm³.
pub fn load_items(path: &Path, unit: LengthUnit) -> Result<Vec<Item>, CliError> {
    let records = match DocumentFormat::from_path(path)? {
        DocumentFormat::Csv => read_csv_records(path)?,
        _ => read_document::<ItemsDocument>(path)?.into_records(),
    };
    let items = ItemCatalogBuilder::new().with_unit(unit).build(&records)?;
    debug!(event = "items_loaded", path = %path.display(), item_count = items.len());
    Ok(items)
}

/// A fleet file: an optional vehicle catalog and the vehicles to dispatch.
///
/// Without `vehicle_types` the standard catalog is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetFile {
    #[serde(default)]
    pub vehicle_types: Option<Vec<VehicleType>>,
    #[serde(default)]
    pub fleet: Vec<FleetEntry>,
}

impl FleetFile {
    /// The reference fleet on the standard catalog.
    pub fn reference() -> Self {
        Self {
            vehicle_types: None,
            fleet: loadforge::reference_fleet(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        read_document(path)
    }

    pub fn catalog(&self) -> Result<VehicleCatalog, CliError> {
        match &self.vehicle_types {
            Some(types) => Ok(VehicleCatalog::new(types.clone())?),
            None => Ok(VehicleCatalog::standard()),
        }
    }

    /// Expands the fleet into vehicle slots listed in `order`.
    pub fn slots(&self, order: SlotOrder) -> Result<Vec<VehicleSlot>, CliError> {
        let allocations = allocations_from_catalog(&self.catalog()?, &self.fleet)?;
        let slots = expand_fleet(&allocations, order)?;
        debug!(event = "fleet_expanded", slot_count = slots.len(), order = %order);
        Ok(slots)
    }
}
