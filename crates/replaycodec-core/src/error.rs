//! Error types for the ReplayCodec decode pipeline.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

use crate::cancel::is_cancellation;

/// Framing faults detected while walking a replay container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Container header truncated: needed 8 bytes, stream ended after {read}")]
    TruncatedHeader { read: usize },

    #[error("Negative block count {0}")]
    NegativeBlockCount(i32),

    #[error("Block {index} declares a negative length ({length})")]
    NegativeBlockLength { index: u32, length: i32 },

    #[error("Container truncated: header declares {expected} blocks, stream ended after {found}")]
    Truncated { expected: u32, found: u32 },

    #[error("Block {index} declares {declared} bytes but the stream ended after {read}")]
    BlockOverrun { index: u32, declared: u32, read: u64 },

    #[error("Container declares no blocks; block 0 is required")]
    Empty,
}

/// Errors that fail the decode of a single replay file.
///
/// Every variant except [`ReplayError::Cancelled`] is recoverable at the
/// batch level: the file is skipped and the failure counter increments.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("File access error: {0}")]
    FileAccess(io::Error),

    #[error("Container format error: {0}")]
    ContainerFormat(#[from] ContainerError),

    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    #[error("Player vehicle '{tag}' is not in the vehicle catalog")]
    UnresolvedVehicle { tag: String },

    #[error("Decode cancelled")]
    Cancelled,
}

impl ReplayError {
    /// The failure category, used by the batch driver for skip-vs-abort
    /// decisions and per-kind accounting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::FileAccess(_) => FailureKind::FileAccess,
            Self::ContainerFormat(_) => FailureKind::ContainerFormat,
            Self::JsonDecode(_) => FailureKind::JsonDecode,
            Self::UnresolvedVehicle { .. } => FailureKind::UnresolvedVehicle,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Returns `true` if the error came from a raised cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classify an I/O error raised while reading framed container data.
    /// An early end of stream is a framing fault, not an access fault.
    pub(crate) fn from_framing_io(err: io::Error, on_eof: ContainerError) -> Self {
        if is_cancellation(&err) {
            Self::Cancelled
        } else if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::ContainerFormat(on_eof)
        } else {
            Self::FileAccess(err)
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(err: io::Error) -> Self {
        if is_cancellation(&err) {
            Self::Cancelled
        } else {
            Self::FileAccess(err)
        }
    }
}

/// Coarse failure category of a [`ReplayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    FileAccess,
    ContainerFormat,
    JsonDecode,
    UnresolvedVehicle,
    Cancelled,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::FileAccess => "file_access",
            FailureKind::ContainerFormat => "container_format",
            FailureKind::JsonDecode => "json_decode",
            FailureKind::UnresolvedVehicle => "unresolved_vehicle",
            FailureKind::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Errors from loading reference catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Vehicle tag '{tag}' appears more than once")]
    DuplicateTag { tag: String },

    #[error("Vehicle '{tag}' has tier {tier}, expected 1-10")]
    InvalidTier { tag: String, tier: i64 },

    #[error("Catalog is not a JSON object")]
    NotAnObject,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Batch-level outcomes that prevent a result from being produced.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Batch cancelled after {completed} of {total} files")]
    Cancelled { completed: usize, total: usize },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}
