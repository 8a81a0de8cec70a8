//! Retry policy for dashboard service requests.
//!
//! Only transient failures are retried: connection errors, timeouts and 5xx
//! responses. A 404 is an answer, not a failure, and is returned at once.
//!
//! # Configuration Example
//!
//! ```toml
//! [retry]
//! enabled = true
//! max_retries = 2
//! base_delay_ms = 200
//! strategy = "exponential"
//! timeout_seconds = 30
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for HTTP retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Enable automatic retries (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Retries after the first attempt (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (default: 200)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Retry strategy (default: exponential)
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            strategy: RetryStrategy::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl RetryConfig {
    /// Create a retry config with retries disabled.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Delay before retry number `attempt` (1-indexed), capped at 100x the base delay.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay_ms;
        let delay_ms = match self.strategy {
            RetryStrategy::Constant => base,
            RetryStrategy::Linear => base.saturating_mul(attempt as u64),
            RetryStrategy::Exponential => {
                base.saturating_mul(1u64 << attempt.saturating_sub(1).min(20))
            }
        };
        Duration::from_millis(delay_ms.min(base.saturating_mul(100)))
    }

    /// Whether another attempt is allowed after `retries_done` retries.
    pub fn should_retry(&self, retries_done: u32) -> bool {
        self.enabled && retries_done < self.max_retries
    }
}

/// Retry delay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    /// Same delay between each retry.
    Constant,
    /// Delay increases linearly: base * attempt.
    Linear,
    /// Delay doubles each attempt: base * 2^(attempt-1).
    #[default]
    Exponential,
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_timeout_seconds() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay_ms, 200);
        assert_eq!(config.strategy, RetryStrategy::Exponential);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_constant_strategy_delay() {
        let config = RetryConfig {
            strategy: RetryStrategy::Constant,
            base_delay_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(100));
    }

    #[test]
    fn test_linear_strategy_delay() {
        let config = RetryConfig {
            strategy: RetryStrategy::Linear,
            base_delay_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(300));
    }

    #[test]
    fn test_exponential_strategy_delay() {
        let config = RetryConfig {
            strategy: RetryStrategy::Exponential,
            base_delay_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped_at_hundred_times_base() {
        let config = RetryConfig {
            strategy: RetryStrategy::Exponential,
            base_delay_ms: 10,
            ..Default::default()
        };
        assert_eq!(config.delay_for_attempt(30), Duration::from_millis(1000));
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig {
            max_retries: 2,
            ..Default::default()
        };
        assert!(config.should_retry(0));
        assert!(config.should_retry(1));
        assert!(!config.should_retry(2));
        assert!(!RetryConfig::disabled().should_retry(0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: RetryConfig = toml::from_str("strategy = \"linear\"").unwrap();
        assert_eq!(parsed.strategy, RetryStrategy::Linear);
        assert_eq!(parsed.max_retries, 2);
        assert!(parsed.enabled);
    }
}
