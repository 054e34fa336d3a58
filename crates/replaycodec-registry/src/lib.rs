//! # replaycodec-registry
//!
//! Reference catalogs for ReplayCodec.
//!
//! - [`MemoryCatalog`]: vehicle tag → display name + tier, loaded from a
//!   vehicle list JSON file
//! - [`MapCatalog`]: map identifier → display name
//!
//! Both are read-only once loaded and implement the lookup traits from
//! `replaycodec-core`, so they can be shared across worker threads behind an
//! `Arc`.

pub mod maps;
pub mod memory;

pub use maps::MapCatalog;
pub use memory::MemoryCatalog;
