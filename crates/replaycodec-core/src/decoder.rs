//! `RecordDecoder`: block 0 JSON → enriched [`MatchRecord`].

use indexmap::IndexMap;
use serde::de::Error as _;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::{player_vehicle_tag, vehicle_type_tag, VehicleCatalog};
use crate::error::ReplayError;
use crate::record::{MatchRecord, VehicleRef};
use crate::tier::TierSpread;

/// Decodes block 0 and enriches it with tier information from a catalog.
pub struct RecordDecoder<'a> {
    catalog: &'a dyn VehicleCatalog,
}

impl<'a> RecordDecoder<'a> {
    pub fn new(catalog: &'a dyn VehicleCatalog) -> Self {
        Self { catalog }
    }

    /// Parse and enrich block 0.
    ///
    /// # Errors
    /// - [`ReplayError::JsonDecode`] if block 0 is not a JSON object of the
    ///   expected shape.
    /// - [`ReplayError::UnresolvedVehicle`] if the player's vehicle is
    ///   present but unknown to the catalog.
    pub fn decode(&self, block0: &[u8]) -> Result<MatchRecord, ReplayError> {
        let record = Self::parse(block0)?;
        self.enrich(record)
    }

    /// Parse block 0 into the base fields. Every field is optional.
    pub fn parse(block0: &[u8]) -> Result<MatchRecord, ReplayError> {
        let value: Value = serde_json::from_slice(block0)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom("block 0 is not a JSON object").into());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve the player's vehicle and classify its tier position.
    pub fn enrich(&self, record: MatchRecord) -> Result<MatchRecord, ReplayError> {
        let spread = record
            .vehicles
            .as_ref()
            .and_then(|vehicles| self.tier_spread(vehicles));

        let Some(raw) = record.player_vehicle.as_deref() else {
            return Ok(record);
        };

        let tag = player_vehicle_tag(raw);
        let entry = self
            .catalog
            .resolve(tag)
            .ok_or_else(|| ReplayError::UnresolvedVehicle {
                tag: tag.to_string(),
            })?;
        let tier = entry.tier;

        match spread {
            Some(spread) => Ok(record
                .with_player_vehicle(entry.name.clone(), tier)
                .with_tier_position(spread.classify(tier))),
            None => {
                debug!("no participant vehicle resolved; tier and tier position left unset");
                Ok(record.with_vehicle_name(entry.name.clone()))
            }
        }
    }

    /// Min/max over the distinct tiers of all participants whose vehicle
    /// resolves in the catalog. Unresolved participants are excluded.
    pub fn tier_spread(&self, vehicles: &IndexMap<String, VehicleRef>) -> Option<TierSpread> {
        let tiers: BTreeSet<u8> = vehicles
            .values()
            .filter_map(|v| v.vehicle_type.as_deref())
            .filter_map(vehicle_type_tag)
            .filter_map(|tag| self.catalog.resolve(tag))
            .map(|entry| entry.tier)
            .collect();
        TierSpread::from_tiers(tiers)
    }
}
