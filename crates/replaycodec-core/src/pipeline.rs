//! The per-file unit of work: container → record → post-battle stats.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

use crate::cancel::{CancelToken, CancellableReader};
use crate::catalog::{MapNames, VehicleCatalog};
use crate::container::ContainerReader;
use crate::decoder::RecordDecoder;
use crate::error::{ContainerError, ReplayError};
use crate::post_battle::PostBattleExtractor;
use crate::record::MatchRecord;

/// Decodes complete replay files against shared reference catalogs.
///
/// Cheap to clone; clones share the catalogs.
#[derive(Clone)]
pub struct ReplayPipeline {
    vehicles: Arc<dyn VehicleCatalog>,
    maps: Option<Arc<dyn MapNames>>,
}

impl ReplayPipeline {
    pub fn new(vehicles: Arc<dyn VehicleCatalog>) -> Self {
        Self {
            vehicles,
            maps: None,
        }
    }

    /// Resolve map identifiers to display names. Unknown ids are kept.
    pub fn with_maps(mut self, maps: Arc<dyn MapNames>) -> Self {
        self.maps = Some(maps);
        self
    }

    /// Decode one replay file. Reads observe `cancel` and abort with
    /// [`ReplayError::Cancelled`] once it is raised.
    pub fn decode_file(&self, path: &Path, cancel: &CancelToken) -> Result<MatchRecord, ReplayError> {
        if cancel.is_cancelled() {
            return Err(ReplayError::Cancelled);
        }
        let file = File::open(path)?;
        let reader = CancellableReader::new(BufReader::new(file), cancel.clone());
        self.decode_reader(reader)
    }

    /// Decode a replay from any byte stream. Only blocks 0 and 1 are read.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<MatchRecord, ReplayError> {
        let mut container = ContainerReader::new(reader)?;
        let block0 = container.read_block()?.ok_or(ContainerError::Empty)?;

        let mut record = RecordDecoder::new(self.vehicles.as_ref()).decode(block0.as_bytes())?;
        drop(block0);

        if let Some(maps) = &self.maps {
            let resolved = record
                .map_id
                .as_deref()
                .and_then(|id| maps.map_name(id))
                .map(str::to_owned);
            if let Some(name) = resolved {
                record = record.with_map_name(name);
            }
        }

        let block1 = container.read_block()?;
        trace!(
            blocks = container.block_count(),
            has_post_battle = block1.is_some(),
            "replay blocks read"
        );

        match PostBattleExtractor::extract(block1.as_ref().map(|b| b.as_bytes())) {
            Some(stats) => Ok(record.with_post_battle(stats)),
            None => Ok(record),
        }
    }
}
