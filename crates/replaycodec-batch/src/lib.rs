//! # replaycodec-batch
//!
//! Batch decode engine for directories of replay files.
//!
//! ## Features
//! - One independent Rayon task per file, bounded by available parallelism
//! - Per-file failure isolation: a broken file is skipped and counted
//! - Two error modes: Skip, Collect
//! - Progress callbacks
//! - Cooperative cancellation; a cancelled batch yields no result
//!
//! ## Usage
//! ```no_run
//! use replaycodec_batch::{discover_replays, BatchEngine, BatchRequest};
//! use replaycodec_core::ReplayPipeline;
//! use replaycodec_registry::MemoryCatalog;
//! use std::{path::Path, sync::Arc};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = MemoryCatalog::load_file(Path::new("tanklist.json"))?;
//! let engine = BatchEngine::new(ReplayPipeline::new(Arc::new(catalog)));
//! let paths = discover_replays(Path::new("replays"), false, "wotreplay")?;
//! let result = engine.run(BatchRequest::new(paths))?;
//! println!("{} decoded, {} failed", result.records.len(), result.failed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discover;
pub mod engine;
pub mod request;

pub use config::{BatchConfig, ErrorMode};
pub use discover::discover_replays;
pub use engine::{BatchEngine, BatchResult};
pub use request::BatchRequest;
