//! tilevault - Offline map-tile mirror for a fixed geographic region
//!
//! This library enumerates the map tiles covering a geographic bounding box
//! across a range of zoom levels and fetches each tile image from a remote
//! XYZ tile server into local storage, with bounded concurrency,
//! resumability, corruption detection and failure tracking.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilevault::coord::{BoundingBox, ZoomRange};
//! use tilevault::engine::{EngineConfig, FetchEngine, Region};
//! use tilevault::failures::FailureLog;
//! use tilevault::provider::{ReqwestTileClient, UrlTemplate};
//!
//! let region = Region {
//!     bbox: BoundingBox::new(34.2667, 112.7211, 34.9895, 114.2209)?,
//!     zooms: ZoomRange::new(0, 13)?,
//! };
//!
//! let config = EngineConfig::default();
//! let client = ReqwestTileClient::with_timeout(config.timeout_secs())?;
//! let template = UrlTemplate::new("https://tiles.test/{z}/{x}/{y}.png")?;
//! let failures = FailureLog::open(Path::new("failed_tiles.log")).await?;
//!
//! let engine = FetchEngine::new(client, template, "tiles", failures, config);
//! let summary = engine.run(&region).await?;
//! println!("{}", summary);
//! ```
//!
//! Runs are resumable: tiles already on disk with a valid PNG header are
//! skipped, so re-running after an interruption only fetches what is
//! missing or corrupt.

pub mod coord;
pub mod engine;
pub mod failures;
pub mod fetch;
pub mod logging;
pub mod provider;
pub mod store;

/// Version of the tilevault library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
