//! `BatchEngine`: runs the replay pipeline over many files in parallel.

use crate::config::ErrorMode;
use crate::request::BatchRequest;
use rayon::prelude::*;
use replaycodec_core::{
    error::{BatchError, FailureKind, ReplayError},
    pipeline::ReplayPipeline,
    record::MatchRecord,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a completed (not cancelled) batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Successfully decoded records
    pub records: Vec<MatchRecord>,
    /// Number of files that failed to decode
    pub failed: usize,
    /// Failure count per kind; sums to `failed`
    pub failures_by_kind: BTreeMap<FailureKind, usize>,
    /// (path, error) pairs, only populated in Collect mode
    pub errors: Vec<(PathBuf, ReplayError)>,
    /// Total files submitted
    pub total_input: usize,
}

impl BatchResult {
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }
}

enum Outcome {
    Decoded(MatchRecord),
    Failed(PathBuf, ReplayError),
    Cancelled,
}

/// Batch decode engine.
pub struct BatchEngine {
    pipeline: ReplayPipeline,
}

impl BatchEngine {
    pub fn new(pipeline: ReplayPipeline) -> Self {
        Self { pipeline }
    }

    /// Decode every file in the request.
    ///
    /// Files are independent: a failure in one never affects another. If
    /// the request's cancel token is raised at any point, the partial
    /// result is discarded and [`BatchError::Cancelled`] is returned.
    pub fn run(&self, req: BatchRequest) -> Result<BatchResult, BatchError> {
        let total_input = req.paths.len();
        info!(
            "BatchEngine: decoding {} replays (concurrency={})",
            total_input,
            if req.concurrency == 0 {
                "auto".to_string()
            } else {
                req.concurrency.to_string()
            }
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(req.concurrency)
            .build()
            .map_err(|e| BatchError::WorkerPool(e.to_string()))?;

        let started = Instant::now();
        let completed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let outcomes: Vec<Outcome> = pool.install(|| {
            req.paths
                .par_iter()
                .map(|path| self.process(path, &req, &completed, &failed))
                .collect()
        });

        let completed = completed.into_inner();
        if req.cancel.is_cancelled() {
            warn!(
                "BatchEngine: cancelled after {} of {} replays, discarding results",
                completed, total_input
            );
            return Err(BatchError::Cancelled {
                completed,
                total: total_input,
            });
        }

        let mut records = Vec::with_capacity(outcomes.len());
        let mut failures_by_kind = BTreeMap::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Decoded(record) => records.push(record),
                Outcome::Failed(path, err) => {
                    *failures_by_kind.entry(err.kind()).or_insert(0) += 1;
                    if req.error_mode == ErrorMode::Collect {
                        errors.push((path, err));
                    }
                }
                // Only reachable when the token was raised, handled above.
                Outcome::Cancelled => {}
            }
        }

        let failed = failed.into_inner();
        info!(
            "BatchEngine: complete - {} decoded, {} failed in {}ms",
            records.len(),
            failed,
            started.elapsed().as_millis()
        );

        Ok(BatchResult {
            records,
            failed,
            failures_by_kind,
            errors,
            total_input,
        })
    }

    fn process(
        &self,
        path: &Path,
        req: &BatchRequest,
        completed: &AtomicUsize,
        failed: &AtomicUsize,
    ) -> Outcome {
        if req.cancel.is_cancelled() {
            return Outcome::Cancelled;
        }

        let outcome = match self.pipeline.decode_file(path, &req.cancel) {
            Ok(record) => {
                debug!(path = %path.display(), "replay decoded");
                Outcome::Decoded(record)
            }
            Err(e) if e.is_cancelled() => return Outcome::Cancelled,
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                warn!(path = %path.display(), kind = %e.kind(), "skipping replay: {e}");
                Outcome::Failed(path.to_path_buf(), e)
            }
        };

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(cb) = &req.on_progress {
            cb(done, req.paths.len());
        }
        outcome
    }
}
