//! # replaycodec-core
//!
//! Core types and the per-file decode pipeline shared across all ReplayCodec
//! crates. A replay container is read block by block, block 0 becomes a
//! [`MatchRecord`] enriched through a [`VehicleCatalog`], and block 1 (when
//! the battle finished) contributes the post-battle statistics.

pub mod cancel;
pub mod catalog;
pub mod container;
pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod post_battle;
pub mod record;
pub mod tier;

pub use cancel::{CancelToken, CancellableReader};
pub use catalog::{CatalogEntry, MapNames, VehicleCatalog};
pub use container::{BlockReader, ContainerReader, RawBlock};
pub use decoder::RecordDecoder;
pub use error::{BatchError, CatalogError, ContainerError, FailureKind, ReplayError};
pub use pipeline::ReplayPipeline;
pub use post_battle::{PostBattleExtractor, PostBattleStats};
pub use record::{BattleResult, MatchRecord, VehicleRef};
pub use tier::{classify, TierPosition, TierSpread};
