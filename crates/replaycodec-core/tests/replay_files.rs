//! End-to-end decoding of replay files written to disk.

use replaycodec_core::{
    BattleResult, CancelToken, CatalogEntry, FailureKind, ReplayPipeline, TierPosition,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn container(blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x12, 0x32, 0x34, 0x11];
    out.extend_from_slice(&(blocks.len() as i32).to_le_bytes());
    for b in blocks {
        out.extend_from_slice(&(b.len() as i32).to_le_bytes());
        out.extend_from_slice(b);
    }
    out
}

fn pipeline() -> ReplayPipeline {
    let mut vehicles = HashMap::new();
    vehicles.insert("G03_PzV_Panther".to_string(), CatalogEntry::new("Panther", 7));
    vehicles.insert("R07_T-34-85".to_string(), CatalogEntry::new("T-34-85", 6));
    vehicles.insert("A05_M4_Sherman".to_string(), CatalogEntry::new("M4 Sherman", 5));

    let mut maps = HashMap::new();
    maps.insert("05_prohorovka".to_string(), "Prokhorovka".to_string());

    ReplayPipeline::new(Arc::new(vehicles)).with_maps(Arc::new(maps))
}

fn block0() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "playerVehicle": "germany-G03_PzV_Panther",
        "playerName": "commander",
        "gameplayID": "ctf",
        "mapName": "05_prohorovka",
        "vehicles": {
            "101": { "name": "commander", "vehicleType": "germany:G03_PzV_Panther" },
            "102": { "name": "ally", "vehicleType": "ussr:R07_T-34-85" },
            "201": { "name": "enemy", "vehicleType": "usa:A05_M4_Sherman" },
            "202": { "name": "unknown", "vehicleType": "usa:A99_Prototype" }
        }
    }))
    .unwrap()
}

#[test]
fn full_replay_is_enriched() {
    let block1 = serde_json::to_vec(&json!([
        { "common": { "winnerTeam": 2, "duration": 612 } },
        {
            "101": { "team": 1, "isAlive": false },
            "102": { "team": "1", "isAlive": "True" },
            "201": { "team": 2, "isAlive": true },
            "202": { "team": 2, "isAlive": true }
        }
    ]))
    .unwrap();
    // trailing packet stream after the JSON blocks is ignored
    let mut bytes = container(&[block0(), block1]);
    bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("20240101_prohorovka.wotreplay");
    std::fs::write(&path, bytes).unwrap();

    let record = pipeline().decode_file(&path, &CancelToken::new()).unwrap();
    assert_eq!(record.player_vehicle.as_deref(), Some("Panther"));
    assert_eq!(record.player_name.as_deref(), Some("commander"));
    assert_eq!(record.gameplay_id.as_deref(), Some("ctf"));
    assert_eq!(record.map_id.as_deref(), Some("Prokhorovka"));
    assert_eq!(record.tier, Some(7));
    assert_eq!(record.tier_position, Some(TierPosition::ThreeTierTop));
    assert_eq!(record.battle_result, BattleResult::Defeat);
    assert_eq!(record.duration_seconds, Some(612));
    assert_eq!(record.team_survived, Some(1));
    assert_eq!(record.enemy_survived, Some(2));
    assert_eq!(record.participant_count(), 4);
}

#[test]
fn unfinished_battle_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unfinished.wotreplay");
    std::fs::write(&path, container(&[block0()])).unwrap();

    let record = pipeline().decode_file(&path, &CancelToken::new()).unwrap();
    assert_eq!(record.player_vehicle.as_deref(), Some("Panther"));
    assert_eq!(record.battle_result, BattleResult::Undefined);
    assert_eq!(record.duration_seconds, None);
    assert_eq!(record.team_survived, None);
}

#[test]
fn missing_and_cancelled_files_are_classified() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.wotreplay");
    let err = pipeline()
        .decode_file(&missing, &CancelToken::new())
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::FileAccess);

    let present = dir.path().join("ok.wotreplay");
    std::fs::write(&present, container(&[block0()])).unwrap();
    let token = CancelToken::new();
    token.cancel();
    let err = pipeline().decode_file(&present, &token).unwrap_err();
    assert!(err.is_cancelled());
}
