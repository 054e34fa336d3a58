//! # replaycodec-observability
//!
//! Structured logging for ReplayCodec.
//!
//! Human-readable or JSON log lines, with a global level and per-component
//! overrides (e.g. `replaycodec_batch=debug`).

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
