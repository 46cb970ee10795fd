//! Durable failure accounting.
//!
//! Tiles that exhaust their retry budget are appended to a failure log so an
//! operator can re-drive them later. The log is write-only from the engine's
//! perspective: it is never read back, and duplicate entries across runs are
//! expected.

use crate::coord::TileCoord;
use std::future::Future;
use std::io;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// A tile whose download attempts were exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub tile: TileCoord,
    pub url: String,
}

impl FailureRecord {
    /// One log line, newline-terminated: `z=<z>, x=<x>, y=<y>, url=<url>`.
    pub fn as_line(&self) -> String {
        format!(
            "z={}, x={}, y={}, url={}\n",
            self.tile.zoom, self.tile.x, self.tile.y, self.url
        )
    }
}

/// Destination for failure records.
///
/// The file-backed [`FailureLog`] is the stock implementation; the trait
/// keeps the destination swappable (queue, metrics sink) without touching
/// the engine.
pub trait FailureSink: Send + Sync {
    /// Durably records one failure. Implementations must be safe under
    /// concurrent callers and must never interleave two records.
    fn record(&self, record: &FailureRecord) -> impl Future<Output = io::Result<()>> + Send;
}

/// Append-only file-backed failure log.
///
/// The file is opened once at run start, created empty if absent, and never
/// truncated. Appends are serialized behind a mutex so concurrent tile
/// tasks cannot interleave partial lines.
pub struct FailureLog {
    file: Mutex<tokio::fs::File>,
}

impl FailureLog {
    /// Opens (creating if absent) the log at `path` in append mode.
    ///
    /// # Errors
    ///
    /// An open failure is a run-fatal local I/O error: without a failure
    /// log there is no durable record of exhausted tiles.
    pub async fn open(path: &Path) -> io::Result<Self> {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FailureSink for FailureLog {
    async fn record(&self, record: &FailureRecord) -> io::Result<()> {
        let line = record.as_line();
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
