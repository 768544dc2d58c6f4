//! Retry policies and backoff schedules.
//!
//! The same [`RetryConfig`] drives two loops: transport-level retries inside
//! [`OkxHttp`](super::OkxHttp) for idempotent reads, and the venue-aware
//! resubmission loop in [`crate::submit`].

use std::time::Duration;

/// Retry policy for a single venue request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// No transport retries. Order-mutating POSTs use this; resubmission
    /// is decided by the submission layer, which can see the venue's verdict.
    #[default]
    None,
    /// Retry on transport failures and 429/5xx. Default for GET endpoints.
    Idempotent,
    /// Caller-provided schedule.
    Custom(RetryConfig),
}

/// Backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Add ±25% jitter to each delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a transport retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// Schedule for idempotent reads.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 500, 502, 503, 504],
        }
    }

    /// Schedule for order placement: three attempts, 1s doubling, capped at 10s.
    pub fn order_submission() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: false,
            retryable_statuses: vec![429, 500, 502, 503, 504],
        }
    }

    /// Total number of attempts this schedule allows.
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default_is_none() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
    }

    #[test]
    fn test_order_submission_schedule() {
        let config = RetryConfig::order_submission();
        assert_eq!(config.attempts(), 3);
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(5), Duration::from_secs(10));
    }

    #[test]
    fn test_idempotent_retries_rate_limits() {
        let config = RetryConfig::idempotent();
        assert!(config.retryable_statuses.contains(&429));
        assert!(config.retryable_statuses.contains(&503));
    }

    #[test]
    fn test_jitter_stays_within_a_quarter() {
        let config = RetryConfig {
            max_retries: 1,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![],
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms), "delay {ms}ms out of range");
        }
    }
}
