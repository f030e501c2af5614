//! Retry policy and failure classification
//!
//! The policy is plain configuration (attempt budget, base delay, cap) plus
//! a classifier, so retry behavior is testable without touching a network.

use crate::error::is_retryable_status;
use std::time::Duration;

/// Type of backoff between retry attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Base delay doubling each attempt
    #[default]
    Exponential,
}

/// Retry configuration applied to every network call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first call
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
    /// How the delay grows across attempts
    pub backoff: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            backoff: BackoffType::Exponential,
        }
    }
}

impl RetryPolicy {
    /// Policy with a custom attempt budget and default backoff
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay to sleep after the given failed attempt (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = match self.backoff {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }
}

/// How a failed call should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transient: retry with backoff
    Retryable,
    /// Credentials rejected: abort immediately, never retry
    Auth,
    /// Request is wrong as issued: abort the extraction, no retry
    Fatal,
}

/// Classify an HTTP status code from a non-success response
pub fn classify_status(status: u16) -> FailureKind {
    match status {
        401 | 403 => FailureKind::Auth,
        s if is_retryable_status(s) => FailureKind::Retryable,
        400..=499 => FailureKind::Fatal,
        _ => FailureKind::Retryable,
    }
}
