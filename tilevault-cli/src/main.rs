//! tilevault CLI - Command-line interface
//!
//! Mirrors the map tiles covering a bounding box, across a zoom range,
//! from an XYZ tile server into a local directory.

mod error;

use clap::Parser;
use std::path::PathBuf;

use error::CliError;
use tilevault::coord::{BoundingBox, ZoomRange};
use tilevault::engine::{
    EngineConfig, FetchEngine, Region, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_REPORT_INTERVAL, DEFAULT_RETRY_DELAY_SECS,
    DEFAULT_THROTTLE_EVERY, DEFAULT_THROTTLE_PAUSE_SECS, DEFAULT_TIMEOUT_SECS,
};
use tilevault::failures::FailureLog;
use tilevault::logging::{default_log_dir, default_log_file, init_logging};
use tilevault::provider::{ReqwestTileClient, UrlTemplate};

#[derive(Parser)]
#[command(name = "tilevault")]
#[command(version = tilevault::VERSION)]
#[command(about = "Mirror map tiles for a geographic region", long_about = None)]
struct Args {
    /// Southern edge of the bounding box in decimal degrees
    #[arg(long)]
    min_lat: f64,

    /// Western edge of the bounding box in decimal degrees
    #[arg(long)]
    min_lon: f64,

    /// Northern edge of the bounding box in decimal degrees
    #[arg(long)]
    max_lat: f64,

    /// Eastern edge of the bounding box in decimal degrees
    #[arg(long)]
    max_lon: f64,

    /// Lowest zoom level to mirror
    #[arg(long, default_value_t = 0)]
    min_zoom: u8,

    /// Highest zoom level to mirror
    #[arg(long)]
    max_zoom: u8,

    /// Tile server URL template with {x}, {y} and {z} placeholders
    #[arg(long)]
    url_template: String,

    /// Output directory for downloaded tiles
    #[arg(long, default_value = "tiles")]
    output: PathBuf,

    /// Append-only log of tiles that exhausted their retries
    #[arg(long, default_value = "failed_tiles.log")]
    failure_log: PathBuf,

    /// Maximum number of concurrent downloads
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Tiles submitted per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Download attempts per tile, including the first
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Delay between retry attempts in seconds
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_SECS)]
    retry_delay: u64,

    /// Pause the run once per this many successful downloads
    #[arg(long, default_value_t = DEFAULT_THROTTLE_EVERY)]
    throttle_every: u64,

    /// Duration of the periodic throttle pause in seconds
    #[arg(long, default_value_t = DEFAULT_THROTTLE_PAUSE_SECS)]
    throttle_pause: u64,

    /// Emit a progress summary once per this many processed tiles
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL)]
    report_interval: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args).await {
        err.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let _guard =
        init_logging(default_log_dir(), default_log_file()).map_err(CliError::LoggingInit)?;

    let region = Region {
        bbox: BoundingBox::new(args.min_lat, args.min_lon, args.max_lat, args.max_lon)?,
        zooms: ZoomRange::new(args.min_zoom, args.max_zoom)?,
    };
    let template = UrlTemplate::new(&args.url_template)?;

    let config = EngineConfig::new()
        .with_concurrency(args.concurrency)
        .with_batch_size(args.batch_size)
        .with_max_attempts(args.retries)
        .with_timeout_secs(args.timeout)
        .with_retry_delay_secs(args.retry_delay)
        .with_throttle_every(args.throttle_every)
        .with_throttle_pause_secs(args.throttle_pause)
        .with_report_interval(args.report_interval);

    let client = ReqwestTileClient::with_timeout(config.timeout_secs())?;
    let failures = FailureLog::open(&args.failure_log)
        .await
        .map_err(CliError::FailureLog)?;

    println!("Mirroring tiles for:");
    println!(
        "  Region: ({}, {}) .. ({}, {})",
        args.min_lat, args.min_lon, args.max_lat, args.max_lon
    );
    println!("  Zoom: {} to {}", args.min_zoom, args.max_zoom);
    println!("  Output: {}", args.output.display());
    println!();

    let engine = FetchEngine::new(client, template, args.output, failures, config);
    let summary = engine.run(&region).await?;

    println!();
    println!("Done: {}", summary);
    if summary.failed > 0 {
        println!(
            "Failed tiles were recorded in {} for a later re-run.",
            args.failure_log.display()
        );
    }

    Ok(())
}
