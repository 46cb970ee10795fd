//! Single-tile download with retries.
//!
//! The fetcher performs one tile's worth of work: GET the URL, persist the
//! payload, retry transient failures per the configured [`RetryPolicy`].
//! The skip-because-already-valid decision is made by the engine before the
//! fetcher is ever invoked; nothing here re-checks the destination.

mod retry;

pub use retry::RetryPolicy;

use crate::provider::{AsyncHttpClient, ProviderError};
use crate::store;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from one tile fetch after the retry budget is exhausted.
///
/// Network and local I/O failures are deliberately not distinguished by the
/// retry loop: both are retried and, on exhaustion, downgraded to a recorded
/// failure by the engine.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote source failed (transport error or non-success status)
    #[error("Tile download failed: {0}")]
    Provider(#[from] ProviderError),

    /// Writing the payload (or creating its directory) failed
    #[error("Tile write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads single tiles with per-tile retry.
///
/// # Example
///
/// ```ignore
/// use tilevault::fetch::{RetryPolicy, TileFetcher};
/// use tilevault::provider::ReqwestTileClient;
///
/// let client = ReqwestTileClient::new()?;
/// let fetcher = TileFetcher::new(client, RetryPolicy::default());
/// let bytes = fetcher.fetch_tile(&url, &dest).await?;
/// ```
pub struct TileFetcher<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: AsyncHttpClient> TileFetcher<C> {
    /// Creates a fetcher over the given HTTP client and retry policy.
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// The configured retry policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Downloads one tile to `dest`, retrying failed attempts.
    ///
    /// Each attempt ensures the destination directory exists, issues the
    /// GET, and on success writes the full payload (overwriting any existing
    /// file). The file is only touched by a fully successful attempt.
    ///
    /// # Returns
    ///
    /// The payload size in bytes, or the last attempt's error once the
    /// budget is exhausted.
    pub async fn fetch_tile(&self, url: &str, dest: &Path) -> Result<usize, FetchError> {
        let mut attempt = 1;
        loop {
            match self.attempt(url, dest).await {
                Ok(bytes) => {
                    debug!(url = url, bytes, attempt, "Tile downloaded");
                    return Ok(bytes);
                }
                Err(err) if attempt < self.policy.max_attempts() => {
                    attempt += 1;
                    debug!(url = url, attempt, error = %err, "Attempt failed, retrying");
                    tokio::time::sleep(self.policy.delay_before(attempt)).await;
                }
                Err(err) => {
                    warn!(url = url, attempts = attempt, error = %err, "Retries exhausted");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(&self, url: &str, dest: &Path) -> Result<usize, FetchError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = self.client.get(url).await?;
        store::write_tile(dest, &bytes).await?;
        Ok(bytes.len())
    }
}
