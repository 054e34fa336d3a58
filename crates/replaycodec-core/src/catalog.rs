//! Reference catalog interfaces consumed by the decoder.
//!
//! Concrete, file-backed implementations live in `replaycodec-registry`.
//! Lookups return `Option`: an absent tag is an expected outcome that the
//! decoder handles explicitly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display name and tier of one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Always in `1..=10` for entries loaded through the registry.
    pub tier: u8,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, tier: u8) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }
}

/// A thread-safe, read-only mapping from vehicle tag to [`CatalogEntry`].
pub trait VehicleCatalog: Send + Sync {
    /// Resolve a bare vehicle tag such as `"G04_PzVI_Tiger_I"`.
    fn resolve(&self, tag: &str) -> Option<&CatalogEntry>;
}

/// A thread-safe, read-only mapping from map identifier to display name.
pub trait MapNames: Send + Sync {
    fn map_name(&self, map_id: &str) -> Option<&str>;
}

impl VehicleCatalog for HashMap<String, CatalogEntry> {
    fn resolve(&self, tag: &str) -> Option<&CatalogEntry> {
        self.get(tag)
    }
}

impl MapNames for HashMap<String, String> {
    fn map_name(&self, map_id: &str) -> Option<&str> {
        self.get(map_id).map(String::as_str)
    }
}

/// Catalog key of a participant's `"<nation>:<tag>"` vehicle type.
///
/// Everything after the first `:` is the tag. Returns `None` when there is
/// no separator.
pub fn vehicle_type_tag(vehicle_type: &str) -> Option<&str> {
    vehicle_type.split_once(':').map(|(_, tag)| tag)
}

/// Catalog key of the player's `"<numericPrefix>-<tag>"` vehicle.
///
/// Everything up to and including the first `-` is stripped; a value with
/// no `-` is used whole.
pub fn player_vehicle_tag(player_vehicle: &str) -> &str {
    player_vehicle
        .split_once('-')
        .map_or(player_vehicle, |(_, tag)| tag)
}
