//! Integration tests using a mock Daktela instance
//!
//! Exercise the full flow: login → plan → paged extraction → transform →
//! CSV + manifest output on disk.

use daktela_extractor::client::DaktelaClient;
use daktela_extractor::daterange;
use daktela_extractor::engine::{Engine, EngineConfig};
use daktela_extractor::http::{BackoffType, HttpClient, HttpClientConfig, RetryPolicy};
use daktela_extractor::keygen;
use daktela_extractor::plan;
use daktela_extractor::sink::{CsvSink, Manifest};
use daktela_extractor::types::LoadMode;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn page_body(records: serde_json::Value, total: u64) -> serde_json::Value {
    json!({ "result": { "data": records, "total": total } })
}

async fn mock_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v6/login.json"))
        .and(query_param("only_token", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": { "accessToken": "tok-1" } })),
        )
        .mount(server)
        .await;
}

async fn connected_client(server: &MockServer) -> DaktelaClient {
    let mut client = DaktelaClient::with_http(HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .retry(RetryPolicy {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(5),
                max_backoff: Duration::from_millis(20),
                backoff: BackoffType::Constant,
            })
            .no_rate_limit()
            .build(),
    ));
    client.login("alice", "secret").await.unwrap();
    client
}

fn engine_config(mode: LoadMode) -> EngineConfig {
    // The canonical window: yesterday through half an hour ago
    let window = daterange::window("-1", "0").unwrap();
    EngineConfig {
        server: "acme".to_string(),
        window,
        mode,
        page_size: 1000,
    }
}

fn read_manifest(sink: &CsvSink, table: &str) -> Manifest {
    let raw = std::fs::read_to_string(sink.manifest_path(table)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn read_rows(sink: &CsvSink, table: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(sink.table_path(table))
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(ToString::to_string).collect())
        .collect()
}

fn column_index(manifest: &Manifest, column: &str) -> usize {
    manifest
        .columns
        .iter()
        .position(|c| c == column)
        .unwrap_or_else(|| panic!("column {column} missing from manifest"))
}

// ============================================================================
// End-to-end extraction
// ============================================================================

#[tokio::test]
async fn test_parent_child_extraction_to_csv() {
    let mock_server = MockServer::start().await;
    mock_login(&mock_server).await;

    // Two activities in the window; only act-1 carries a linked email
    Mock::given(method("GET"))
        .and(path("/api/v6/activities.json"))
        .and(query_param("accessToken", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([
                { "name": "act-1", "title": "Inbound call", "queue": { "name": "q-1" } },
                { "name": "act-2", "title": "Outbound call" }
            ]),
            2,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v6/activities/act-1/email.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{ "name": "em-1", "subject": "Quote request" }]),
            1,
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v6/activities/act-2/email.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(json!([]), 0)))
        .mount(&mock_server)
        .await;

    let client = connected_client(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path(), "acme").unwrap();
    let specs = plan::plan(&["activities", "activities_email"]).unwrap();

    let mut engine = Engine::new(&client, &sink, engine_config(LoadMode::Full));
    let stats = engine.run(&specs).await.unwrap();

    assert_eq!(stats.tables_extracted, 2);
    assert_eq!(stats.rows_written, 3);

    // Parent table: two rows keyed on [server, id]
    let manifest = read_manifest(&sink, "activities");
    assert_eq!(manifest.primary_key, vec!["server", "id"]);
    let rows = read_rows(&sink, "activities");
    assert_eq!(rows.len(), 2);

    let id_col = column_index(&manifest, "id");
    let expected_parent_key = keygen::compound_key("acme", &["act-1"]);
    assert_eq!(rows[0][id_col], expected_parent_key);

    // Child table: one row whose FK equals the parent's compound key
    let child_manifest = read_manifest(&sink, "activities_email");
    let child_rows = read_rows(&sink, "activities_email");
    assert_eq!(child_rows.len(), 1);

    let fk_col = column_index(&child_manifest, "activities_id");
    assert_eq!(child_rows[0][fk_col], expected_parent_key);

    let subject_col = column_index(&child_manifest, "subject");
    assert_eq!(child_rows[0][subject_col], "Quote request");
}

#[tokio::test]
async fn test_custom_table_passthrough_to_csv() {
    let mock_server = MockServer::start().await;
    mock_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v6/foobar_custom.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([
                { "name": "fb-1", "widgets": 3 },
                { "name": "fb-2", "widgets": 5, "note": "late column" }
            ]),
            2,
        )))
        .mount(&mock_server)
        .await;

    let client = connected_client(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path(), "acme").unwrap();
    let specs = plan::plan(&["foobar_custom"]).unwrap();

    let mut engine = Engine::new(&client, &sink, engine_config(LoadMode::Full));
    engine.run(&specs).await.unwrap();

    let manifest = read_manifest(&sink, "foobar_custom");
    assert_eq!(manifest.columns[0], "server");
    assert_eq!(manifest.columns[1], "id");
    assert!(manifest.columns.contains(&"widgets".to_string()));
    // The late-appearing field joined the end of the column order
    assert_eq!(manifest.columns.last().unwrap(), "note");

    let rows = read_rows(&sink, "foobar_custom");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "acme");
}

#[tokio::test]
async fn test_incremental_runs_append_and_keep_ids_stable() {
    let mock_server = MockServer::start().await;
    mock_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v6/queues.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{ "name": "q-1", "title": "Support" }]),
            1,
        )))
        .mount(&mock_server)
        .await;

    let client = connected_client(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path(), "acme").unwrap();
    let specs = plan::plan(&["queues"]).unwrap();

    for _ in 0..2 {
        let mut engine = Engine::new(&client, &sink, engine_config(LoadMode::Incremental));
        engine.run(&specs).await.unwrap();
    }

    let manifest = read_manifest(&sink, "queues");
    assert!(manifest.incremental);

    let rows = read_rows(&sink, "queues");
    assert_eq!(rows.len(), 2);

    // Same source row, same compound id on both runs
    let id_col = column_index(&manifest, "id");
    assert_eq!(rows[0][id_col], rows[1][id_col]);
    assert_eq!(rows[0][id_col], keygen::compound_key("acme", &["q-1"]));
}

#[tokio::test]
async fn test_full_runs_replace_prior_output() {
    let mock_server = MockServer::start().await;
    mock_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v6/queues.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{ "name": "q-1", "title": "Support" }]),
            1,
        )))
        .mount(&mock_server)
        .await;

    let client = connected_client(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path(), "acme").unwrap();
    let specs = plan::plan(&["queues"]).unwrap();

    for _ in 0..2 {
        let mut engine = Engine::new(&client, &sink, engine_config(LoadMode::Full));
        engine.run(&specs).await.unwrap();
    }

    assert_eq!(read_rows(&sink, "queues").len(), 1);
}

#[tokio::test]
async fn test_retry_then_success_survives_extraction() {
    let mock_server = MockServer::start().await;
    mock_login(&mock_server).await;

    // The first two page requests fail transiently; extraction still
    // completes without duplicating rows
    Mock::given(method("GET"))
        .and(path("/api/v6/statuses.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v6/statuses.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{ "name": "s-1", "title": "Open" }]),
            1,
        )))
        .mount(&mock_server)
        .await;

    let client = connected_client(&mock_server).await;
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path(), "acme").unwrap();
    let specs = plan::plan(&["statuses"]).unwrap();

    let mut engine = Engine::new(&client, &sink, engine_config(LoadMode::Full));
    let stats = engine.run(&specs).await.unwrap();

    assert_eq!(stats.rows_written, 1);
    assert_eq!(read_rows(&sink, "statuses").len(), 1);
}

#[tokio::test]
async fn test_bad_credentials_abort_before_extraction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v6/login.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
        .mount(&mock_server)
        .await;

    let mut client = DaktelaClient::with_http(HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(mock_server.uri())
            .no_rate_limit()
            .build(),
    ));

    let err = client.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, daktela_extractor::Error::Auth { .. }));
}
