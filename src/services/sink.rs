//! Result delivery service
//!
//! The session never knows where an accepted result ends up. Hosts hand it a
//! [`ResultSink`] and receive either the encoded output or a cancellation.

use crate::error::{MaskEditError, Result};
use crate::services::ImageIOService;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Receiver of a session's terminal outcome
///
/// Exactly one of the two methods is called per session, at most once.
pub trait ResultSink: Send + Sync {
    /// Receive the encoded, flattened result
    ///
    /// Returning an error keeps the session open so the host can retry.
    fn deliver_result(&self, bytes: Vec<u8>) -> Result<()>;

    /// The session was cancelled; no output will follow
    fn deliver_cancellation(&self);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl ResultSink for NoOpSink {
    fn deliver_result(&self, _bytes: Vec<u8>) -> Result<()> {
        Ok(())
    }

    fn deliver_cancellation(&self) {}
}

/// What a [`MemorySink`] has received so far
#[derive(Debug, Default, Clone)]
pub struct MemorySinkRecord {
    pub results: Vec<Vec<u8>>,
    pub cancellations: usize,
}

/// In-memory sink whose clones share one record
///
/// Keep a clone before boxing it into a session to inspect deliveries later.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    record: Arc<Mutex<MemorySinkRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far
    #[must_use]
    pub fn record(&self) -> MemorySinkRecord {
        match self.record.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Most recently delivered result bytes
    #[must_use]
    pub fn last_result(&self) -> Option<Vec<u8>> {
        self.record().results.last().cloned()
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.record().results.len()
    }

    #[must_use]
    pub fn cancellation_count(&self) -> usize {
        self.record().cancellations
    }
}

impl ResultSink for MemorySink {
    fn deliver_result(&self, bytes: Vec<u8>) -> Result<()> {
        let mut guard = self
            .record
            .lock()
            .map_err(|_| MaskEditError::sink("memory sink lock poisoned"))?;
        guard.results.push(bytes);
        Ok(())
    }

    fn deliver_cancellation(&self) {
        match self.record.lock() {
            Ok(mut guard) => guard.cancellations += 1,
            Err(poisoned) => poisoned.into_inner().cancellations += 1,
        }
    }
}

/// Sink writing the accepted result to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn deliver_result(&self, bytes: Vec<u8>) -> Result<()> {
        ImageIOService::save_bytes(&bytes, &self.path)
            .map_err(|e| MaskEditError::sink(format!("Failed to deliver result: {}", e)))?;
        tracing::info!(path = %self.path.display(), bytes = bytes.len(), "Result written");
        Ok(())
    }

    fn deliver_cancellation(&self) {
        tracing::info!(path = %self.path.display(), "Session cancelled, nothing written");
    }
}
