//! Batch decode request configuration.

use replaycodec_core::CancelToken;
use std::path::PathBuf;

use crate::config::{BatchConfig, ErrorMode};

/// Configuration for a batch decode job.
pub struct BatchRequest {
    /// Replay files to decode
    pub paths: Vec<PathBuf>,
    /// Number of parallel Rayon workers (0 = use all available CPUs)
    pub concurrency: usize,
    /// What to keep about failed files
    pub error_mode: ErrorMode,
    /// Raised to abandon the batch
    pub cancel: CancelToken,
    /// Optional progress callback: `(completed, total)`
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

impl BatchRequest {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            concurrency: 0,
            error_mode: ErrorMode::Skip,
            cancel: CancelToken::new(),
            on_progress: None,
        }
    }

    /// Build a request using the worker and error settings of `config`.
    pub fn from_config(paths: Vec<PathBuf>, config: &BatchConfig) -> Self {
        Self::new(paths)
            .concurrency(config.concurrency)
            .error_mode(config.error_mode)
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn on_progress<F: Fn(usize, usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}
