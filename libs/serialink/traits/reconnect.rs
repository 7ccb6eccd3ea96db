use std::time::Duration;

/// Trait for defining reconnection behavior
///
/// The manager owns a single retry driver; a policy only answers how long
/// to wait before a given attempt and when to give up. Attempts are
/// 1-indexed: the first reopen after a link loss is attempt 1.
pub trait RetryPolicy: Send + Sync {
    /// Get the delay to wait before the given attempt
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long, then attempt to reopen
    /// * `None` - Give up; the link is exhausted
    fn delay_before(&self, attempt: usize) -> Option<Duration>;

    /// The configured attempt bound, if any (used in failure reports)
    fn max_attempts(&self) -> Option<usize>;
}

/// Fixed-interval retry policy
///
/// Waits the same amount of time before every attempt, up to an optional
/// attempt bound. This is the default policy.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
    max_attempts: Option<usize>,
}

impl FixedInterval {
    /// Create a new fixed-interval policy
    ///
    /// # Arguments
    /// * `interval` - The delay before each reopen attempt
    /// * `max_attempts` - Attempt bound (None = retry forever)
    pub fn new(interval: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl RetryPolicy for FixedInterval {
    fn delay_before(&self, attempt: usize) -> Option<Duration> {
        match self.max_attempts {
            Some(max) if attempt > max => None,
            _ => Some(self.interval),
        }
    }

    fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }
}

/// Exponential backoff retry policy
///
/// The delay doubles with every attempt, capped at `max_interval`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial_interval: Duration,
    max_interval: Duration,
    max_attempts: Option<usize>,
}

impl Backoff {
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_attempts: Option<usize>,
    ) -> Self {
        Self {
            initial_interval,
            max_interval,
            max_attempts,
        }
    }
}

impl RetryPolicy for Backoff {
    fn delay_before(&self, attempt: usize) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }
        let exponent = attempt.saturating_sub(1).min(32) as u32;
        let millis = (self.initial_interval.as_millis() as u64)
            .saturating_mul(1u64 << exponent)
            .min(self.max_interval.as_millis() as u64);
        Some(Duration::from_millis(millis))
    }

    fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }
}

/// Never-retry policy
///
/// A lost link stays lost until the operator reopens it manually.
#[derive(Debug, Clone)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn delay_before(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn max_attempts(&self) -> Option<usize> {
        Some(0)
    }
}
