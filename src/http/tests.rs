//! Tests for the HTTP layer

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        backoff: BackoffType::Exponential,
    }
}

fn test_client(base_url: &str, retry: RetryPolicy) -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(base_url)
            .retry(retry)
            .no_rate_limit()
            .build(),
    )
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.retry.max_attempts, 8);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://acme.daktela.com")
        .timeout(Duration::from_secs(60))
        .retry(RetryPolicy::with_attempts(3))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://acme.daktela.com".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_delay_doubles_and_caps() {
    let policy = RetryPolicy {
        max_attempts: 8,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(500),
        backoff: BackoffType::Exponential,
    };

    assert_eq!(policy.delay_for(0), Duration::from_millis(100));
    assert_eq!(policy.delay_for(1), Duration::from_millis(200));
    assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    // Capped from here on
    assert_eq!(policy.delay_for(3), Duration::from_millis(500));
    assert_eq!(policy.delay_for(10), Duration::from_millis(500));
}

#[test]
fn test_delay_constant_and_linear() {
    let constant = RetryPolicy {
        backoff: BackoffType::Constant,
        initial_backoff: Duration::from_millis(100),
        ..RetryPolicy::default()
    };
    assert_eq!(constant.delay_for(0), Duration::from_millis(100));
    assert_eq!(constant.delay_for(5), Duration::from_millis(100));

    let linear = RetryPolicy {
        backoff: BackoffType::Linear,
        initial_backoff: Duration::from_millis(100),
        ..RetryPolicy::default()
    };
    assert_eq!(linear.delay_for(0), Duration::from_millis(100));
    assert_eq!(linear.delay_for(2), Duration::from_millis(300));
}

#[test]
fn test_classify_status() {
    assert_eq!(classify_status(401), FailureKind::Auth);
    assert_eq!(classify_status(403), FailureKind::Auth);
    assert_eq!(classify_status(400), FailureKind::Fatal);
    assert_eq!(classify_status(404), FailureKind::Fatal);
    assert_eq!(classify_status(422), FailureKind::Fatal);
    assert_eq!(classify_status(429), FailureKind::Retryable);
    assert_eq!(classify_status(500), FailureKind::Retryable);
    assert_eq!(classify_status(503), FailureKind::Retryable);
    assert_eq!(classify_status(504), FailureKind::Retryable);
}

#[tokio::test]
async fn test_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v6/users.json"))
        .and(query_param("take", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "data": [], "total": 0 }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), RetryPolicy::default());
    let body: serde_json::Value = client
        .get_json(
            "/api/v6/users.json",
            &[("take".to_string(), "2".to_string())],
        )
        .await
        .unwrap();

    assert_eq!(body["result"]["total"], 0);
}

#[tokio::test]
async fn test_transient_failures_then_success() {
    let mock_server = MockServer::start().await;

    // Three transient failures, success on the fourth attempt
    Mock::given(method("GET"))
        .and(path("/api/v6/flaky.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v6/flaky.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), fast_retry(8));
    let body: serde_json::Value = client.get_json("/api/v6/flaky.json", &[]).await.unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_exhausted_attempts_surface_extraction_failed() {
    let mock_server = MockServer::start().await;

    // Always failing: the budget of 8 attempts must be spent, no more
    Mock::given(method("GET"))
        .and(path("/api/v6/broken.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(8)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), fast_retry(8));
    let err = client
        .get_json::<serde_json::Value>("/api/v6/broken.json", &[])
        .await
        .unwrap_err();

    match err {
        Error::ExtractionFailed { attempts, message } => {
            assert_eq!(attempts, 8);
            assert!(message.contains("503"), "last error attached: {message}");
        }
        other => panic!("expected ExtractionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v6/secret.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), fast_retry(8));
    let err = client
        .get_json::<serde_json::Value>("/api/v6/secret.json", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v6/missing.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such entity"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), fast_retry(8));
    let err = client
        .get_json::<serde_json::Value>("/api/v6/missing.json", &[])
        .await
        .unwrap_err();

    match err {
        Error::Request { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such entity");
        }
        other => panic!("expected Request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_full_url_bypasses_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v6/ping.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build());
    let url = format!("{}/api/v6/ping.json", mock_server.uri());
    let body: serde_json::Value = client.get_json(&url, &[]).await.unwrap();

    assert!(body.as_object().unwrap().is_empty());
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("config"));
}

#[test]
fn test_http_client_default_has_rate_limiter() {
    let client = HttpClient::default();
    assert!(client.has_rate_limiter());
}
