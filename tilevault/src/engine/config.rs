//! Engine configuration.

use crate::fetch::RetryPolicy;
use std::time::Duration;

/// Default maximum number of concurrent in-flight tile downloads.
pub const DEFAULT_CONCURRENCY: usize = 2000;

/// Default number of tasks submitted per batch before the batch is drained.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default number of download attempts per tile, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default delay between retry attempts in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 1;

/// Pause the run once per this many successful downloads.
pub const DEFAULT_THROTTLE_EVERY: u64 = 100_000;

/// Duration of the periodic throttle pause in seconds.
pub const DEFAULT_THROTTLE_PAUSE_SECS: u64 = 5;

/// Emit a progress summary once per this many processed tiles.
pub const DEFAULT_REPORT_INTERVAL: u64 = 2000;

/// Configuration for the fetch engine.
///
/// Groups the scheduling, retry and reporting knobs, providing the
/// documented defaults while allowing customization.
///
/// # Example
///
/// ```
/// use tilevault::engine::EngineConfig;
///
/// // Using defaults
/// let config = EngineConfig::default();
/// assert_eq!(config.concurrency(), 2000);
/// assert_eq!(config.batch_size(), 1000);
///
/// // Custom configuration
/// let config = EngineConfig::new()
///     .with_concurrency(64)
///     .with_batch_size(32)
///     .with_max_attempts(5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Global ceiling on in-flight download tasks
    concurrency: usize,
    /// Tasks submitted per batch; the batch is drained before the next
    batch_size: usize,
    /// Download attempts per tile, including the first
    max_attempts: u32,
    /// Per-request timeout in seconds
    timeout_secs: u64,
    /// Delay between retry attempts in seconds
    retry_delay_secs: u64,
    /// Throttle once per this many successes
    throttle_every: u64,
    /// Throttle pause duration in seconds
    throttle_pause_secs: u64,
    /// Progress summary cadence in processed tiles
    report_interval: u64,
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global concurrency ceiling (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the batch size (minimum 1).
    ///
    /// Batching caps peak pending-task count; it implies no ordering
    /// between tiles.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the number of download attempts per tile (minimum 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the per-request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Set the delay between retry attempts in seconds.
    pub fn with_retry_delay_secs(mut self, delay: u64) -> Self {
        self.retry_delay_secs = delay;
        self
    }

    /// Set the throttle threshold in successful downloads (minimum 1).
    pub fn with_throttle_every(mut self, successes: u64) -> Self {
        self.throttle_every = successes.max(1);
        self
    }

    /// Set the throttle pause duration in seconds.
    pub fn with_throttle_pause_secs(mut self, pause: u64) -> Self {
        self.throttle_pause_secs = pause;
        self
    }

    /// Set the progress summary cadence in processed tiles (minimum 1).
    pub fn with_report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval.max(1);
        self
    }

    /// Get the global concurrency ceiling.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Get the batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Get the number of download attempts per tile.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the per-request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Get the retry delay in seconds.
    pub fn retry_delay_secs(&self) -> u64 {
        self.retry_delay_secs
    }

    /// Get the throttle threshold in successful downloads.
    pub fn throttle_every(&self) -> u64 {
        self.throttle_every
    }

    /// Get the throttle pause duration.
    pub fn throttle_pause(&self) -> Duration {
        Duration::from_secs(self.throttle_pause_secs)
    }

    /// Get the progress summary cadence.
    pub fn report_interval(&self) -> u64 {
        self.report_interval
    }

    /// The retry policy implied by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.retry_delay_secs),
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            throttle_every: DEFAULT_THROTTLE_EVERY,
            throttle_pause_secs: DEFAULT_THROTTLE_PAUSE_SECS,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.concurrency(), DEFAULT_CONCURRENCY);
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.throttle_every(), DEFAULT_THROTTLE_EVERY);
        assert_eq!(config.report_interval(), DEFAULT_REPORT_INTERVAL);
    }

    #[test]
    fn test_builder_chain() {
        let config = EngineConfig::new()
            .with_concurrency(8)
            .with_batch_size(4)
            .with_max_attempts(2)
            .with_timeout_secs(5)
            .with_retry_delay_secs(0)
            .with_throttle_every(10)
            .with_throttle_pause_secs(1)
            .with_report_interval(100);

        assert_eq!(config.concurrency(), 8);
        assert_eq!(config.batch_size(), 4);
        assert_eq!(config.max_attempts(), 2);
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(config.retry_delay_secs(), 0);
        assert_eq!(config.throttle_every(), 10);
        assert_eq!(config.throttle_pause(), Duration::from_secs(1));
        assert_eq!(config.report_interval(), 100);
    }

    #[test]
    fn test_zero_values_clamped() {
        let config = EngineConfig::new()
            .with_concurrency(0)
            .with_batch_size(0)
            .with_max_attempts(0)
            .with_throttle_every(0)
            .with_report_interval(0);

        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.batch_size(), 1);
        assert_eq!(config.max_attempts(), 1);
        assert_eq!(config.throttle_every(), 1);
        assert_eq!(config.report_interval(), 1);
    }

    #[test]
    fn test_retry_policy_reflects_config() {
        let config = EngineConfig::new()
            .with_max_attempts(5)
            .with_retry_delay_secs(2);

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay_before(2), Duration::from_secs(2));
    }
}
