//! Retry policy for tile download attempts.

use std::time::Duration;

/// Retry policy: attempt budget plus the delay between attempts.
///
/// The backoff shape lives behind [`RetryPolicy::delay_before`] so call
/// sites stay unchanged if the strategy moves away from a fixed delay.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tilevault::fetch::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.delay_before(2), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and inter-attempt delay.
    ///
    /// An attempt budget of zero is treated as one: the fetcher always makes
    /// at least one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait before the given attempt number (2-based: there is no
    /// delay before the first attempt).
    ///
    /// The stock policy is a fixed delay independent of the attempt number.
    pub fn delay_before(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}
