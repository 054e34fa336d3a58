//! Post-battle statistics from block 1.
//!
//! Block 1 only exists for battles that ran to completion. Its content is
//! best-effort: a malformed element leaves the corresponding fields unset
//! instead of failing the file.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::record::BattleResult;

/// Team id of the recording player's side.
const PLAYER_TEAM: i64 = 1;
/// Team id of the opposing side.
const ENEMY_TEAM: i64 = 2;

/// Outcome, duration, and survivor counts of a finished battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostBattleStats {
    pub battle_result: BattleResult,
    pub duration_seconds: Option<u64>,
    pub team_survived: Option<u32>,
    pub enemy_survived: Option<u32>,
}

/// Extracts [`PostBattleStats`] from block 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostBattleExtractor;

impl PostBattleExtractor {
    /// `None` when block 1 is absent. Otherwise whatever could be read.
    pub fn extract(block1: Option<&[u8]>) -> Option<PostBattleStats> {
        let bytes = block1?;
        let mut stats = PostBattleStats::default();

        let value: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => {
                debug!("block 1 is not valid JSON: {e}");
                return Some(stats);
            }
        };
        let Some(elements) = value.as_array() else {
            debug!("block 1 is not a JSON array");
            return Some(stats);
        };

        if let Some(common) = elements.first().and_then(|e| e.get("common")) {
            stats.battle_result =
                BattleResult::from_winner_team(common.get("winnerTeam").and_then(Value::as_i64));
            stats.duration_seconds = common.get("duration").and_then(Value::as_u64);
        }

        if let Some((team, enemy)) = elements.get(1).and_then(count_survivors) {
            stats.team_survived = Some(team);
            stats.enemy_survived = Some(enemy);
        }

        Some(stats)
    }
}

/// Count alive participants per side in the participant-results object.
/// Entries without a readable `team` or `isAlive` are ignored.
pub fn count_survivors(results: &Value) -> Option<(u32, u32)> {
    let results = results.as_object()?;
    let mut team = 0u32;
    let mut enemy = 0u32;

    for entry in results.values() {
        let Some(side) = entry.get("team").and_then(parse_int) else {
            continue;
        };
        if !entry.get("isAlive").and_then(parse_bool).unwrap_or(false) {
            continue;
        }
        match side {
            PLAYER_TEAM => team += 1,
            ENEMY_TEAM => enemy += 1,
            _ => {}
        }
    }

    Some((team, enemy))
}

/// Boolean that may be encoded as a JSON bool or as a string such as
/// `"True"`.
fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(value: Value) -> PostBattleStats {
        let bytes = serde_json::to_vec(&value).unwrap();
        PostBattleExtractor::extract(Some(&bytes)).unwrap()
    }

    #[test]
    fn absent_block_yields_nothing() {
        assert_eq!(PostBattleExtractor::extract(None), None);
    }

    #[test]
    fn full_block_is_extracted() {
        let stats = extract(json!([
            { "common": { "winnerTeam": 1, "duration": 431 } },
            {
                "p1": { "team": 1, "isAlive": true },
                "p2": { "team": 1, "isAlive": false },
                "p3": { "team": 2, "isAlive": true }
            }
        ]));
        assert_eq!(stats.battle_result, BattleResult::Victory);
        assert_eq!(stats.duration_seconds, Some(431));
        assert_eq!(stats.team_survived, Some(1));
        assert_eq!(stats.enemy_survived, Some(1));
    }

    #[test]
    fn string_encoded_alive_flags_are_parsed() {
        let stats = extract(json!([
            { "common": { "winnerTeam": 2 } },
            {
                "a": { "team": 1, "isAlive": "True" },
                "b": { "team": 2, "isAlive": "false" },
                "c": { "team": 2, "isAlive": " true " },
                "d": { "team": "2", "isAlive": true }
            }
        ]));
        assert_eq!(stats.battle_result, BattleResult::Defeat);
        assert_eq!(stats.duration_seconds, None);
        assert_eq!(stats.team_survived, Some(1));
        assert_eq!(stats.enemy_survived, Some(2));
    }

    #[test]
    fn malformed_entries_are_ignored() {
        let stats = extract(json!([
            { "common": { "winnerTeam": 0 } },
            {
                "a": { "team": 1, "isAlive": "maybe" },
                "b": { "isAlive": true },
                "c": "not an object",
                "d": { "team": 3, "isAlive": true },
                "e": { "team": 1, "isAlive": true }
            }
        ]));
        assert_eq!(stats.battle_result, BattleResult::Draw);
        assert_eq!(stats.team_survived, Some(1));
        assert_eq!(stats.enemy_survived, Some(0));
    }

    #[test]
    fn malformed_second_element_keeps_common_fields() {
        let stats = extract(json!([
            { "common": { "winnerTeam": 1, "duration": 300 } },
            [1, 2, 3]
        ]));
        assert_eq!(stats.battle_result, BattleResult::Victory);
        assert_eq!(stats.duration_seconds, Some(300));
        assert_eq!(stats.team_survived, None);
        assert_eq!(stats.enemy_survived, None);
    }

    #[test]
    fn unknown_winner_team_is_undefined() {
        let stats = extract(json!([{ "common": { "winnerTeam": 7 } }]));
        assert_eq!(stats.battle_result, BattleResult::Undefined);
        assert_eq!(stats.team_survived, None);
    }

    #[test]
    fn non_array_or_invalid_json_degrades_to_defaults() {
        assert_eq!(extract(json!({ "common": {} })), PostBattleStats::default());
        let stats = PostBattleExtractor::extract(Some(b"{not json")).unwrap();
        assert_eq!(stats, PostBattleStats::default());
    }
}
