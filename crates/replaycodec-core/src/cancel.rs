//! Cooperative cancellation for in-flight file reads.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Marker carried inside an `io::Error` when a read observed cancellation.
#[derive(Debug, Error)]
#[error("read cancelled")]
pub struct Cancelled;

/// Returns `true` if `err` was produced by a [`CancellableReader`].
pub fn is_cancellation(err: &io::Error) -> bool {
    err.get_ref().map_or(false, |inner| inner.is::<Cancelled>())
}

/// A cloneable, thread-safe cancellation flag.
///
/// Raising the token is one-way; there is no reset.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the token. Every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Read adaptor that fails the next read once its token is raised.
pub struct CancellableReader<R> {
    inner: R,
    token: CancelToken,
}

impl<R> CancellableReader<R> {
    pub fn new(inner: R, token: CancelToken) -> Self {
        Self { inner, token }
    }
}

impl<R: Read> Read for CancellableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.token.is_cancelled() {
            return Err(io::Error::new(io::ErrorKind::Other, Cancelled));
        }
        self.inner.read(buf)
    }
}
