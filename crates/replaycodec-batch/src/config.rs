//! Batch engine configuration.

use serde::{Deserialize, Serialize};

/// Controls what the engine keeps about individual file failures.
///
/// Failed files are always skipped and counted; no mode aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Count failures only. Suitable for best-effort exports.
    #[default]
    Skip,
    /// Count failures and keep `(path, error)` pairs in the result.
    Collect,
}

/// Settings for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of Rayon workers (0 = use all available CPUs)
    #[serde(default)]
    pub concurrency: usize,
    #[serde(default)]
    pub error_mode: ErrorMode,
    /// Replay file extension, matched case-insensitively
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Descend into subdirectories of the input directory
    #[serde(default)]
    pub include_subdirectories: bool,
}

fn default_extension() -> String {
    "wotreplay".into()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 0,
            error_mode: ErrorMode::Skip,
            extension: default_extension(),
            include_subdirectories: false,
        }
    }
}
