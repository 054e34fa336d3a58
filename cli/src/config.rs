//! Optional YAML configuration file for `replaycsv`.
//!
//! ```yaml
//! log:
//!   level: info
//!   components:
//!     replaycodec-batch: debug
//! batch:
//!   concurrency: 4
//!   error_mode: collect
//! catalog:
//!   vehicles: data/tanklist.json
//!   maps: data/maps.json
//! ```
//!
//! Command-line flags override values from the file.

use anyhow::{Context, Result};
use replaycodec_batch::BatchConfig;
use replaycodec_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub catalog: CatalogPaths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPaths {
    /// Vehicle list JSON
    #[serde(default = "default_vehicles")]
    pub vehicles: PathBuf,
    /// Map list JSON; map ids are kept as-is when absent
    #[serde(default)]
    pub maps: Option<PathBuf>,
}

fn default_vehicles() -> PathBuf {
    PathBuf::from("tanklist.json")
}

impl Default for CatalogPaths {
    fn default() -> Self {
        Self {
            vehicles: default_vehicles(),
            maps: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file '{}'", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parse config file '{}'", path.display()))
    }
}
