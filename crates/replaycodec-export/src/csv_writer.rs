//! CSV writer for decoded replay batches.

use chrono::Local;
use replaycodec_batch::BatchResult;
use replaycodec_core::record::MatchRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ExportError;

/// One output row. Absent values become empty cells.
#[derive(Debug, Serialize)]
pub struct ReplayRow<'a> {
    #[serde(rename = "PlayerVehicle")]
    pub player_vehicle: Option<&'a str>,
    #[serde(rename = "PlayerName")]
    pub player_name: Option<&'a str>,
    #[serde(rename = "GameplayID")]
    pub gameplay_id: Option<&'a str>,
    #[serde(rename = "MapName")]
    pub map_name: Option<&'a str>,
    #[serde(rename = "Tier")]
    pub tier: Option<u8>,
    #[serde(rename = "TierPosition")]
    pub tier_position: Option<&'static str>,
    #[serde(rename = "BattleResult")]
    pub battle_result: &'static str,
    #[serde(rename = "Duration")]
    pub duration: Option<u64>,
    #[serde(rename = "TeamSurvived")]
    pub team_survived: Option<u32>,
    #[serde(rename = "EnemySurvived")]
    pub enemy_survived: Option<u32>,
}

impl ReplayRow<'_> {
    pub const HEADERS: [&'static str; 10] = [
        "PlayerVehicle",
        "PlayerName",
        "GameplayID",
        "MapName",
        "Tier",
        "TierPosition",
        "BattleResult",
        "Duration",
        "TeamSurvived",
        "EnemySurvived",
    ];
}

impl<'a> From<&'a MatchRecord> for ReplayRow<'a> {
    fn from(r: &'a MatchRecord) -> Self {
        Self {
            player_vehicle: r.player_vehicle.as_deref(),
            player_name: r.player_name.as_deref(),
            gameplay_id: r.gameplay_id.as_deref(),
            map_name: r.map_id.as_deref(),
            tier: r.tier,
            tier_position: r.tier_position.map(|p| p.as_str()),
            battle_result: r.battle_result.as_str(),
            duration: r.duration_seconds,
            team_survived: r.team_survived,
            enemy_survived: r.enemy_survived,
        }
    }
}

/// Writes [`BatchResult`] records as comma-separated rows with a header.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Write the header and one row per record to `writer`.
    pub fn write<W: Write>(result: &BatchResult, writer: W) -> Result<usize, ExportError> {
        Self::write_records(&result.records, writer)
    }

    pub fn write_records<W: Write>(records: &[MatchRecord], writer: W) -> Result<usize, ExportError> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv.write_record(ReplayRow::HEADERS)?;
        for record in records {
            csv.serialize(ReplayRow::from(record))?;
        }
        csv.flush()?;
        Ok(records.len())
    }

    /// Write to an explicit file path.
    pub fn write_to_path(result: &BatchResult, path: &Path) -> Result<usize, ExportError> {
        if result.records.is_empty() {
            return Err(ExportError::Empty);
        }
        let file = BufWriter::new(File::create(path)?);
        let rows = Self::write(result, file)?;
        info!("Wrote {} rows to {}", rows, path.display());
        Ok(rows)
    }

    /// Write `<dir>/<local timestamp>.csv` and return its path.
    pub fn write_to_dir(result: &BatchResult, dir: &Path) -> Result<PathBuf, ExportError> {
        let name = format!("{}.csv", Local::now().format("%Y%m%d_%H%M%S_%3f"));
        let path = dir.join(name);
        Self::write_to_path(result, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replaycodec_core::{
        post_battle::PostBattleStats,
        record::BattleResult,
        tier::TierPosition,
    };
    use std::collections::BTreeMap;

    fn result(records: Vec<MatchRecord>) -> BatchResult {
        BatchResult {
            total_input: records.len(),
            records,
            failed: 0,
            failures_by_kind: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    fn finished_record() -> MatchRecord {
        MatchRecord {
            player_vehicle: Some("12-G04_Tiger".into()),
            player_name: Some("tanker".into()),
            gameplay_id: Some("ctf".into()),
            map_id: Some("Malinovka".into()),
            ..Default::default()
        }
        .with_player_vehicle("Tiger I", 7)
        .with_tier_position(TierPosition::TwoTierTop)
        .with_post_battle(PostBattleStats {
            battle_result: BattleResult::Victory,
            duration_seconds: Some(431),
            team_survived: Some(4),
            enemy_survived: Some(0),
        })
    }

    #[test]
    fn writes_header_and_rows() {
        let unfinished = MatchRecord {
            player_name: Some("spectator, with comma".into()),
            ..Default::default()
        };
        let mut out = Vec::new();
        let rows = CsvExporter::write(&result(vec![finished_record(), unfinished]), &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "PlayerVehicle,PlayerName,GameplayID,MapName,Tier,TierPosition,BattleResult,Duration,TeamSurvived,EnemySurvived"
        );
        assert_eq!(lines[1], "Tiger I,tanker,ctf,Malinovka,7,two_tier_top,victory,431,4,0");
        assert_eq!(lines[2], ",\"spectator, with comma\",,,,,undefined,,,");
    }

    #[test]
    fn empty_batch_is_not_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvExporter::write_to_dir(&result(Vec::new()), dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_to_dir_creates_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = CsvExporter::write_to_dir(&result(vec![finished_record()]), dir.path()).unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
