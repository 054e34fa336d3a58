//! In-memory `VehicleCatalog` implementation.
//!
//! Loaded once at startup from the vehicle list JSON, then shared read-only
//! across workers. The file is an object whose values describe one vehicle
//! each:
//!
//! ```json
//! { "3329": { "tag": "G04_PzVI_Tiger_I", "name": "Tiger I", "tier": 7 } }
//! ```
//!
//! Entries missing `tag`, `name`, or `tier` are skipped.

use replaycodec_core::{
    catalog::{CatalogEntry, VehicleCatalog},
    error::CatalogError,
};
use serde_json::Value;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info};

const MIN_TIER: i64 = 1;
const MAX_TIER: i64 = 10;

/// Vehicle tag → [`CatalogEntry`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    by_tag: HashMap<String, CatalogEntry>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one vehicle.
    pub fn add(&mut self, tag: impl Into<String>, entry: CatalogEntry) -> Result<(), CatalogError> {
        let tag = tag.into();
        if !(MIN_TIER..=MAX_TIER).contains(&i64::from(entry.tier)) {
            return Err(CatalogError::InvalidTier {
                tag,
                tier: i64::from(entry.tier),
            });
        }
        if self.by_tag.contains_key(&tag) {
            return Err(CatalogError::DuplicateTag { tag });
        }
        self.by_tag.insert(tag, entry);
        Ok(())
    }

    /// Load a vehicle list JSON file.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded {} vehicles from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a vehicle list JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(content)?;
        let vehicles = root.as_object().ok_or(CatalogError::NotAnObject)?;

        let mut catalog = Self::new();
        for (key, details) in vehicles {
            let tag = details.get("tag").and_then(Value::as_str);
            let name = details.get("name").and_then(Value::as_str);
            let tier = details.get("tier").and_then(Value::as_i64);

            let (Some(tag), Some(name), Some(tier)) = (tag, name, tier) else {
                debug!("skipping incomplete vehicle entry '{key}'");
                continue;
            };
            if !(MIN_TIER..=MAX_TIER).contains(&tier) {
                return Err(CatalogError::InvalidTier {
                    tag: tag.to_string(),
                    tier,
                });
            }
            catalog.add(tag, CatalogEntry::new(name, tier as u8))?;
        }
        Ok(catalog)
    }

    /// Returns the number of vehicles stored.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

impl VehicleCatalog for MemoryCatalog {
    fn resolve(&self, tag: &str) -> Option<&CatalogEntry> {
        self.by_tag.get(tag)
    }
}
