//! HTTP client with retry and rate limiting
//!
//! Wraps reqwest with the pieces every extractor call needs:
//! - bounded exponential backoff on transient failures
//! - failure classification (5xx/timeout/reset retry; 401/403 abort as
//!   authentication failures; other 4xx abort as request errors)
//! - token bucket rate limiting
//!
//! Backoff sleeps are the only suspension points besides the calls
//! themselves.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::retry::{classify_status, FailureKind, RetryPolicy};
use crate::error::{Error, Result};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry behavior for transient failures
    pub retry: RetryPolicy,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("daktela-extractor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Self {
            client,
            config,
            rate_limiter,
        }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// The configured retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        self.request_json(Method::GET, path, query).await
    }

    /// POST with query parameters and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        self.request_json(Method::POST, path, query).await
    }

    /// Issue a request under the retry policy and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let policy = &self.config.retry;

        let mut last_error: Option<Error> = None;

        for attempt in 0..policy.max_attempts {
            if attempt > 0 {
                let delay = policy.delay_for(attempt - 1);
                debug!(
                    "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    last_error.as_ref().map_or_else(String::new, ToString::to_string),
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let req = self
                .client
                .request(method.clone(), &url)
                .query(query)
                .timeout(self.config.timeout);

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        debug!("Request succeeded: {} {}", method, url);
                        return response.json::<T>().await.map_err(Error::Http);
                    }

                    let body = response.text().await.unwrap_or_default();
                    match classify_status(status.as_u16()) {
                        FailureKind::Auth => {
                            return Err(Error::auth(format!(
                                "HTTP {}: {}. Make sure your credentials are correct.",
                                status.as_u16(),
                                body
                            )));
                        }
                        FailureKind::Fatal => {
                            return Err(Error::request(status.as_u16(), body));
                        }
                        FailureKind::Retryable => {
                            last_error = Some(Error::request(status.as_u16(), body));
                        }
                    }
                }
                Err(e) => {
                    if e.is_timeout() || e.is_connect() {
                        last_error = Some(Error::Http(e));
                    } else {
                        return Err(Error::Http(e));
                    }
                }
            }
        }

        let message = last_error.map_or_else(String::new, |e| e.to_string());
        Err(Error::extraction_failed(policy.max_attempts, message))
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
