//! Map identifier → display name.
//!
//! The map list JSON is an object keyed by map id. Values are either the
//! display name or an object with a `name` field.

use replaycodec_core::{catalog::MapNames, error::CatalogError};
use serde_json::Value;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    names: HashMap<String, String>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, map_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(map_id.into(), name.into());
    }

    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        info!("Loaded {} maps from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(content)?;
        let maps = root.as_object().ok_or(CatalogError::NotAnObject)?;

        let mut catalog = Self::new();
        for (id, value) in maps {
            let name = match value {
                Value::String(s) => Some(s.as_str()),
                Value::Object(o) => o.get("name").and_then(Value::as_str),
                _ => None,
            };
            match name {
                Some(name) => catalog.insert(id.as_str(), name),
                None => debug!("skipping map entry '{id}' without a name"),
            }
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl MapNames for MapCatalog {
    fn map_name(&self, map_id: &str) -> Option<&str> {
        self.names.get(map_id).map(String::as_str)
    }
}
