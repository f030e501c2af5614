//! HTTP layer: client, retry policy, rate limiting
//!
//! # Overview
//!
//! - `HttpClient` - reqwest wrapper every API call goes through
//! - `RetryPolicy` / `BackoffType` - bounded backoff configuration
//! - `classify_status` / `FailureKind` - retryable vs fatal decisions
//! - `RateLimiter` - token bucket throttle

mod client;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{classify_status, BackoffType, FailureKind, RetryPolicy};

#[cfg(test)]
mod tests;
