//! Match record types: the primary output of ReplayCodec.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::post_battle::PostBattleStats;
use crate::tier::TierPosition;

/// Outcome of the battle from the recording player's side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleResult {
    Victory,
    Defeat,
    Draw,
    #[default]
    Undefined,
}

impl BattleResult {
    /// Map the post-battle `winnerTeam` value.
    ///
    /// The recording player is assumed to be on team 1.
    pub fn from_winner_team(winner_team: Option<i64>) -> Self {
        match winner_team {
            Some(0) => BattleResult::Draw,
            Some(1) => BattleResult::Victory,
            Some(2) => BattleResult::Defeat,
            _ => BattleResult::Undefined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BattleResult::Victory => "victory",
            BattleResult::Defeat => "defeat",
            BattleResult::Draw => "draw",
            BattleResult::Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for BattleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One battle participant as it appears in block 0, before catalog
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRef {
    /// Participant (player) name
    #[serde(default)]
    pub name: Option<String>,
    /// `"<nation>:<tag>"`, e.g. `"germany:G04_PzVI_Tiger_I"`
    #[serde(default)]
    pub vehicle_type: Option<String>,
}

/// A decoded replay.
///
/// Base fields come straight from block 0. The remaining fields are derived
/// by the enrichment steps, each of which consumes the record and returns a
/// new one, so a finished record is never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Raw `"<n>-<tag>"` until resolved, then the catalog display name
    #[serde(default)]
    pub player_vehicle: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default, rename = "gameplayID")]
    pub gameplay_id: Option<String>,
    /// Raw map identifier, or its display name once resolved
    #[serde(default, rename = "mapName")]
    pub map_id: Option<String>,
    /// Participant id → vehicle reference
    #[serde(default)]
    pub vehicles: Option<IndexMap<String, VehicleRef>>,

    /// Player's vehicle tier, `1..=10` once resolved
    #[serde(skip_deserializing)]
    pub tier: Option<u8>,
    #[serde(skip_deserializing)]
    pub tier_position: Option<TierPosition>,
    #[serde(skip_deserializing)]
    pub battle_result: BattleResult,
    #[serde(skip_deserializing)]
    pub duration_seconds: Option<u64>,
    #[serde(skip_deserializing)]
    pub team_survived: Option<u32>,
    #[serde(skip_deserializing)]
    pub enemy_survived: Option<u32>,
}

impl MatchRecord {
    /// Replace the raw player vehicle with its display name and tier.
    pub fn with_player_vehicle(self, name: impl Into<String>, tier: u8) -> Self {
        Self {
            player_vehicle: Some(name.into()),
            tier: Some(tier),
            ..self
        }
    }

    /// Replace the raw player vehicle with its display name only.
    pub fn with_vehicle_name(self, name: impl Into<String>) -> Self {
        Self {
            player_vehicle: Some(name.into()),
            ..self
        }
    }

    pub fn with_tier_position(self, position: TierPosition) -> Self {
        Self {
            tier_position: Some(position),
            ..self
        }
    }

    pub fn with_map_name(self, name: impl Into<String>) -> Self {
        Self {
            map_id: Some(name.into()),
            ..self
        }
    }

    /// Merge post-battle statistics. Only the post-battle fields change.
    pub fn with_post_battle(self, stats: PostBattleStats) -> Self {
        Self {
            battle_result: stats.battle_result,
            duration_seconds: stats.duration_seconds,
            team_survived: stats.team_survived,
            enemy_survived: stats.enemy_survived,
            ..self
        }
    }

    /// Number of participants listed in block 0.
    pub fn participant_count(&self) -> usize {
        self.vehicles.as_ref().map_or(0, IndexMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_team_mapping() {
        assert_eq!(BattleResult::from_winner_team(Some(0)), BattleResult::Draw);
        assert_eq!(BattleResult::from_winner_team(Some(1)), BattleResult::Victory);
        assert_eq!(BattleResult::from_winner_team(Some(2)), BattleResult::Defeat);
        assert_eq!(BattleResult::from_winner_team(Some(3)), BattleResult::Undefined);
        assert_eq!(BattleResult::from_winner_team(None), BattleResult::Undefined);
    }

    #[test]
    fn base_fields_deserialize_and_derived_fields_stay_unset() {
        let json = r#"{
            "playerVehicle": "germany-G04_PzVI_Tiger_I",
            "playerName": "tanker",
            "gameplayID": "ctf",
            "mapName": "02_malinovka",
            "tier": 9,
            "vehicles": {
                "111": { "name": "tanker", "vehicleType": "germany:G04_PzVI_Tiger_I", "team": 1 },
                "222": { "name": "other", "vehicleType": "ussr:R04_T-34" }
            }
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.player_name.as_deref(), Some("tanker"));
        assert_eq!(record.gameplay_id.as_deref(), Some("ctf"));
        assert_eq!(record.map_id.as_deref(), Some("02_malinovka"));
        assert_eq!(record.participant_count(), 2);
        assert_eq!(record.tier, None);
        assert_eq!(record.battle_result, BattleResult::Undefined);

        let keys: Vec<&str> = record.vehicles.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["111", "222"]);
    }

    #[test]
    fn enrichment_changes_only_targeted_fields() {
        let base = MatchRecord {
            player_vehicle: Some("12-G04_Tiger".into()),
            player_name: Some("tanker".into()),
            ..Default::default()
        };

        let enriched = base.clone().with_player_vehicle("Tiger I", 7);
        assert_eq!(enriched.player_vehicle.as_deref(), Some("Tiger I"));
        assert_eq!(enriched.tier, Some(7));
        assert_eq!(enriched.player_name, base.player_name);

        let finished = enriched.with_post_battle(PostBattleStats {
            battle_result: BattleResult::Victory,
            duration_seconds: Some(412),
            team_survived: Some(3),
            enemy_survived: Some(0),
        });
        assert_eq!(finished.battle_result, BattleResult::Victory);
        assert_eq!(finished.duration_seconds, Some(412));
        assert_eq!(finished.tier, Some(7));
    }
}
