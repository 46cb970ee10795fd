//! Fetch orchestration engine.
//!
//! Drives a whole run: per zoom level, enumerate the covering tile grid,
//! filter to tiles whose center lies inside the bounding box, and submit the
//! survivors to a bounded pool of download tasks in fixed-size batches.
//!
//! # Scheduling
//!
//! A [`tokio::sync::Semaphore`] holds the global in-flight ceiling; every
//! task acquires an owned permit before it is spawned, so submission
//! suspends once the pool is saturated and resumes as permits free up.
//! Batches exist purely to bound peak pending-task count: all tasks of a
//! batch are drained before the next batch is submitted, and no ordering is
//! guaranteed between tiles.
//!
//! # Failure semantics
//!
//! A tile that exhausts its retries is counted and appended to the failure
//! sink; the run continues. The only fatal paths are environment-level
//! filesystem errors: creating the output root, opening the failure log, or
//! appending to it.

mod config;
mod counters;

pub use config::{
    EngineConfig, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_REPORT_INTERVAL, DEFAULT_RETRY_DELAY_SECS, DEFAULT_THROTTLE_EVERY,
    DEFAULT_THROTTLE_PAUSE_SECS, DEFAULT_TIMEOUT_SECS,
};
pub use counters::{RunCounters, RunSummary};

use crate::coord::{tile_center, BoundingBox, CoordError, TileCoord, TileRect, ZoomRange};
use crate::failures::{FailureLog, FailureRecord, FailureSink};
use crate::fetch::TileFetcher;
use crate::provider::{AsyncHttpClient, UrlTemplate};
use crate::store;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};

/// Target region: bounding box plus the zoom levels to mirror.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub bbox: BoundingBox,
    pub zooms: ZoomRange,
}

/// Run-fatal engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Environment-level filesystem failure (output root, failure log)
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// Coordinate conversion failed
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// A download task panicked or was aborted
    #[error("Download task failed: {0}")]
    TaskJoin(String),

    /// Scheduler invariant violated
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The fetch-orchestration engine.
///
/// Generic over the HTTP client (for mock-driven tests) and the failure
/// sink (file log by default).
///
/// # Example
///
/// ```ignore
/// use tilevault::engine::{EngineConfig, FetchEngine, Region};
/// use tilevault::failures::FailureLog;
/// use tilevault::provider::{ReqwestTileClient, UrlTemplate};
///
/// let config = EngineConfig::default();
/// let client = ReqwestTileClient::with_timeout(config.timeout_secs())?;
/// let template = UrlTemplate::new("https://tiles.test/{z}/{x}/{y}.png")?;
/// let failures = FailureLog::open(Path::new("failed_tiles.log")).await?;
///
/// let engine = FetchEngine::new(client, template, "tiles", failures, config);
/// let summary = engine.run(&region).await?;
/// ```
pub struct FetchEngine<C, S = FailureLog> {
    fetcher: Arc<TileFetcher<C>>,
    template: UrlTemplate,
    output_dir: PathBuf,
    failures: Arc<S>,
    config: EngineConfig,
}

impl<C, S> FetchEngine<C, S>
where
    C: AsyncHttpClient + 'static,
    S: FailureSink + 'static,
{
    /// Creates an engine over the given client, URL template, output root
    /// and failure sink.
    pub fn new(
        client: C,
        template: UrlTemplate,
        output_dir: impl Into<PathBuf>,
        failures: S,
        config: EngineConfig,
    ) -> Self {
        Self {
            fetcher: Arc::new(TileFetcher::new(client, config.retry_policy())),
            template,
            output_dir: output_dir.into(),
            failures: Arc::new(failures),
            config,
        }
    }

    /// Runs the engine over every zoom level of the region.
    ///
    /// Processes levels lowest to highest; individual tile failures never
    /// stop the run. Returns the final outcome counts.
    pub async fn run(&self, region: &Region) -> Result<RunSummary, EngineError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let counters = Arc::new(RunCounters::new());
        let pool = Arc::new(Semaphore::new(self.config.concurrency()));

        info!(
            min_zoom = region.zooms.min_zoom(),
            max_zoom = region.zooms.max_zoom(),
            concurrency = self.config.concurrency(),
            batch_size = self.config.batch_size(),
            template = self.template.as_str(),
            "Run starting"
        );

        for zoom in region.zooms.levels() {
            self.run_level(region, zoom, &pool, &counters).await?;
        }

        let summary = counters.snapshot();
        info!(
            success = summary.success,
            failed = summary.failed,
            skipped = summary.skipped,
            "Run complete"
        );
        Ok(summary)
    }

    /// Processes one zoom level: enumerate, filter, submit in batches.
    async fn run_level(
        &self,
        region: &Region,
        zoom: u8,
        pool: &Arc<Semaphore>,
        counters: &Arc<RunCounters>,
    ) -> Result<(), EngineError> {
        let rect = TileRect::covering(&region.bbox, zoom)?;
        debug!(
            zoom,
            x_min = rect.x_min,
            x_max = rect.x_max,
            y_min = rect.y_min,
            y_max = rect.y_max,
            grid_tiles = rect.tile_count(),
            "Enumerating tile grid"
        );

        let before = counters.snapshot();
        let mut batch = Vec::with_capacity(self.config.batch_size());

        for tile in rect.iter() {
            let (lat, lon) = tile_center(&tile);
            if !region.bbox.contains(lat, lon) {
                continue;
            }

            batch.push(tile);
            if batch.len() == self.config.batch_size() {
                self.run_batch(&mut batch, pool, counters).await?;
            }
        }
        if !batch.is_empty() {
            self.run_batch(&mut batch, pool, counters).await?;
        }

        let delta = counters.snapshot().since(&before);
        info!(
            zoom,
            success = delta.success,
            failed = delta.failed,
            skipped = delta.skipped,
            "Zoom level complete"
        );
        Ok(())
    }

    /// Submits one batch of tiles and drains it to completion.
    ///
    /// Each task acquires a pool permit before spawning, so this suspends
    /// while the pool is saturated.
    async fn run_batch(
        &self,
        batch: &mut Vec<TileCoord>,
        pool: &Arc<Semaphore>,
        counters: &Arc<RunCounters>,
    ) -> Result<(), EngineError> {
        let mut tasks = JoinSet::new();

        for tile in batch.drain(..) {
            let permit = Arc::clone(pool)
                .acquire_owned()
                .await
                .map_err(|_| EngineError::Internal("download pool closed".to_string()))?;

            let url = self.template.url_for(&tile);
            let dest = store::tile_path(&self.output_dir, &tile);
            let fetcher = Arc::clone(&self.fetcher);
            let failures = Arc::clone(&self.failures);
            let counters = Arc::clone(counters);
            let config = self.config;

            tasks.spawn(async move {
                let _permit = permit;
                process_tile(tile, url, dest, fetcher, failures, counters, config).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcome?,
                Err(err) => return Err(EngineError::TaskJoin(err.to_string())),
            }
        }
        Ok(())
    }
}

/// One tile's lifecycle: probe, maybe throttle, fetch, account.
async fn process_tile<C, S>(
    tile: TileCoord,
    url: String,
    dest: PathBuf,
    fetcher: Arc<TileFetcher<C>>,
    failures: Arc<S>,
    counters: Arc<RunCounters>,
    config: EngineConfig,
) -> Result<(), EngineError>
where
    C: AsyncHttpClient,
    S: FailureSink,
{
    if !store::should_download(&dest).await {
        trace!(zoom = tile.zoom, x = tile.x, y = tile.y, "Tile already valid, skipping");
        counters.record_skip();
        report_progress(&counters, &config);
        return Ok(());
    }

    throttle_if_due(&counters, &config).await;

    match fetcher.fetch_tile(&url, &dest).await {
        Ok(_) => counters.record_success(),
        Err(err) => {
            warn!(
                zoom = tile.zoom,
                x = tile.x,
                y = tile.y,
                url = url.as_str(),
                error = %err,
                "Tile failed after retries"
            );
            counters.record_failure();
            failures.record(&FailureRecord { tile, url }).await?;
        }
    }

    report_progress(&counters, &config);
    Ok(())
}

/// Coarse global backpressure valve.
///
/// Pauses before a download whenever the success counter sits on a positive
/// multiple of the threshold. The check is deliberately not mutually
/// exclusive across tasks: several tasks near the threshold may pause at
/// once, which is accepted imprecision.
async fn throttle_if_due(counters: &RunCounters, config: &EngineConfig) {
    let successes = counters.successes();
    if successes > 0 && successes % config.throttle_every() == 0 {
        info!(
            successes,
            pause_secs = config.throttle_pause().as_secs(),
            "Throttling downloads"
        );
        tokio::time::sleep(config.throttle_pause()).await;
    }
}

/// Emits a progress summary every `report_interval` processed tiles.
fn report_progress(counters: &RunCounters, config: &EngineConfig) {
    let events = counters.record_event();
    if events % config.report_interval() == 0 {
        let summary = counters.snapshot();
        info!(
            processed = events,
            success = summary.success,
            failed = summary.failed,
            skipped = summary.skipped,
            "Progress"
        );
    }
}
