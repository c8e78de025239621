//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: mock API → REST source → filter/validate → messages

use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tap_jsonplaceholder::cli::{Cli, Runner};
use tap_jsonplaceholder::config::TapConfig;
use tap_jsonplaceholder::engine::{Message, SyncEngine};
use tap_jsonplaceholder::error::Error;
use tap_jsonplaceholder::http::HttpClient;
use tap_jsonplaceholder::output::read_tap_output;
use tap_jsonplaceholder::source::{MemorySource, RestSource};
use tap_jsonplaceholder::stream::EntityKind;
use tap_jsonplaceholder::validation::ViolationCode;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn users() -> Value {
    json!([
        {"id": 1, "username": "Bret", "email": "Sincere@april.biz", "address": {"city": "Gwenborough"}},
        {"id": 2, "username": "Antonette", "email": "not-an-email", "address": {"city": "Wisokyburgh"}}
    ])
}

fn posts() -> Value {
    json!([
        {"id": 1, "userId": 1, "title": "odd one", "body": "quia et suscipit suscipit"},
        {"id": 2, "userId": 1, "title": "qui est esse", "body": "est rerum tempore vitae"},
        {"id": 4, "userId": 1, "title": "SHOUTING", "body": "ullam et saepe reiciendis"},
        {"id": 6, "userId": 2, "title": "dolorem eum", "body": "short"}
    ])
}

fn comments() -> Value {
    json!([
        {"id": 1, "postId": 2, "email": "Eliseo@gardner.biz", "body": "laudantium enim quasi"},
        {"id": 2, "postId": 3, "email": "Jayne@sydney.com", "body": "est natus enim nihil"},
        {"id": 3, "postId": 8, "email": "Nikita@garfield.biz", "body": "quia molestiae reprehenderit"}
    ])
}

/// Serve each collection whole
async fn mount_collections(server: &MockServer) {
    for (route, body) in [("/users", users()), ("/posts", posts()), ("/comments", comments())] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

/// Serve one page of a collection with the total count header
async fn mount_page(server: &MockServer, route: &str, page: u32, body: Value, total: usize) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("_page", page.to_string()))
        .and(query_param("_limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-count", total.to_string().as_str())
                .set_body_json(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> TapConfig {
    TapConfig {
        api_url: server.uri(),
        ..TapConfig::default()
    }
}

fn engine_for(config: &TapConfig) -> SyncEngine {
    let client = HttpClient::with_config(config.http_client_config()).unwrap();
    SyncEngine::new(RestSource::new(client).with_page_size(config.http.page_size))
        .with_config(config.sync_config(0))
        .with_validator(config.validator())
        .with_filter(config.stream_filter())
}

fn record_ids(messages: &[Message], stream: &str) -> Vec<Value> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Record { stream: s, record, .. } if s == stream => record.get("id").cloned(),
            _ => None,
        })
        .collect()
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn cli(args: &[&str]) -> Runner {
    let mut argv = vec!["tap-jsonplaceholder"];
    argv.extend_from_slice(args);
    Runner::new(Cli::parse_from(argv))
}

// ============================================================================
// Engine over REST
// ============================================================================

#[tokio::test]
async fn test_rest_advisory_run() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let mut engine = engine_for(&config_for(&server));
    let mut messages = Vec::new();
    let report = engine.run(&EntityKind::ALL, &mut messages).await.unwrap();

    assert_eq!(record_ids(&messages, "users"), vec![json!(1), json!(2)]);
    assert_eq!(record_ids(&messages, "posts"), vec![json!(2), json!(4), json!(6)]);
    assert_eq!(record_ids(&messages, "comments"), vec![json!(1), json!(3)]);

    let flagged = messages
        .iter()
        .filter(|m| m.annotation().is_some())
        .count();
    assert_eq!(flagged, 4);

    let summary = report.summary();
    assert_eq!(summary.total_seen, 7);
    assert_eq!(summary.total_invalid, 4);
    assert_eq!(summary.error_types[&ViolationCode::InvalidEmail], 1);
    assert_eq!(summary.error_types[&ViolationCode::AllUppercase], 1);
    assert_eq!(summary.error_types[&ViolationCode::TooShort], 1);
    assert_eq!(summary.error_types[&ViolationCode::UnknownPost], 1);
}

#[tokio::test]
async fn test_rest_strict_run_drops_invalid() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let mut config = config_for(&server);
    config.strict = true;

    let mut engine = engine_for(&config);
    let mut messages = Vec::new();
    let report = engine.run(&EntityKind::ALL, &mut messages).await.unwrap();

    assert_eq!(record_ids(&messages, "users"), vec![json!(1)]);
    assert_eq!(record_ids(&messages, "posts"), vec![json!(2)]);
    assert_eq!(record_ids(&messages, "comments"), vec![json!(1)]);
    assert!(messages.iter().all(|m| m.annotation().is_none()));

    let summary = report.summary();
    assert!(summary.strict);
    assert_eq!(engine.stats().records_dropped, 4);
    assert_eq!(summary.streams["comments"].dropped, 1);
}

#[tokio::test]
async fn test_rest_odd_parity() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let config = TapConfig::from_json_str(&format!(
        r#"{{"api_url": "{}", "filter": {{"post_id_parity": "odd"}}}}"#,
        server.uri()
    ))
    .unwrap();

    let mut engine = engine_for(&config);
    let mut messages = Vec::new();
    engine
        .run(&[EntityKind::Post, EntityKind::Comment], &mut messages)
        .await
        .unwrap();

    assert_eq!(record_ids(&messages, "posts"), vec![json!(1)]);
    // Post 3 was never fetched, so its comment fails the relationship check
    assert_eq!(record_ids(&messages, "comments"), vec![json!(2)]);
    let annotation = messages.last().unwrap().annotation().unwrap();
    assert_eq!(annotation.violations[0].code, ViolationCode::UnknownPost);
}

#[tokio::test]
async fn test_rest_paginated_run() {
    let server = MockServer::start().await;
    let (users, posts, comments) = (users(), posts(), comments());

    mount_page(&server, "/users", 1, users, 2).await;
    mount_page(&server, "/posts", 1, json!([posts[0], posts[1]]), 4).await;
    mount_page(&server, "/posts", 2, json!([posts[2], posts[3]]), 4).await;
    mount_page(&server, "/comments", 1, json!([comments[0], comments[1]]), 3).await;
    mount_page(&server, "/comments", 2, json!([comments[2]]), 3).await;

    let mut config = config_for(&server);
    config.http.page_size = Some(2);

    let mut engine = engine_for(&config);
    let mut messages = Vec::new();
    engine.run(&EntityKind::ALL, &mut messages).await.unwrap();

    assert_eq!(record_ids(&messages, "posts"), vec![json!(2), json!(4), json!(6)]);
    assert_eq!(record_ids(&messages, "comments"), vec![json!(1), json!(3)]);

    let stats = engine.stats();
    assert_eq!(stats.pages_fetched, 5);
    assert_eq!(stats.records_fetched, 9);
}

#[tokio::test]
async fn test_rest_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine_for(&config_for(&server));
    let mut messages = Vec::new();
    let err = engine
        .run(&EntityKind::ALL, &mut messages)
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert_eq!(record_ids(&messages, "users").len(), 2);
    assert!(record_ids(&messages, "posts").is_empty());
}

#[tokio::test]
async fn test_rest_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut engine = engine_for(&config_for(&server));
    let mut messages = Vec::new();
    let err = engine
        .run(&[EntityKind::User], &mut messages)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err:?}");
}

// ============================================================================
// CLI Runner
// ============================================================================

#[tokio::test]
async fn test_cli_read_writes_output_and_report() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let report = dir.path().join("report.json");
    let config = format!(r#"{{"api_url": "{}"}}"#, server.uri());

    cli(&[
        "--config-json",
        &config,
        "read",
        "--output",
        output.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
        "--report-cap",
        "2",
    ])
    .run()
    .await
    .unwrap();

    let captured = read_tap_output(&output).unwrap();
    assert_eq!(captured.records(EntityKind::Post).len(), 3);
    assert_eq!(captured.skipped(), 3);

    let written = read_json(&report);
    assert_eq!(written["report"]["total_seen"], 7);
    assert_eq!(written["report"]["total_invalid"], 4);
    assert_eq!(written["report"]["samples"].as_array().unwrap().len(), 2);
    assert_eq!(written["report"]["evicted_samples"], 2);
    assert_eq!(written["sync"]["records_filtered"], 2);
}

#[tokio::test]
async fn test_cli_replay_in_strict_mode() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let dir = tempdir().unwrap();
    let captured = dir.path().join("captured.jsonl");
    let replayed = dir.path().join("replayed.jsonl");
    let report = dir.path().join("report.json");
    let config = format!(r#"{{"api_url": "{}"}}"#, server.uri());

    cli(&[
        "--config-json",
        &config,
        "read",
        "--output",
        captured.to_str().unwrap(),
    ])
    .run()
    .await
    .unwrap();

    cli(&[
        "read",
        "--strict",
        "--input",
        captured.to_str().unwrap(),
        "--output",
        replayed.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ])
    .run()
    .await
    .unwrap();

    let written = read_json(&report);
    assert_eq!(written["report"]["strict"], true);
    assert_eq!(written["report"]["total_seen"], 7);
    assert_eq!(written["report"]["streams"]["comments"]["dropped"], 1);

    let output = read_tap_output(&replayed).unwrap();
    assert_eq!(output.records(EntityKind::User).len(), 1);
    assert_eq!(output.records(EntityKind::Post).len(), 1);
    assert_eq!(output.records(EntityKind::Comment).len(), 1);
}

#[tokio::test]
async fn test_cli_replay_comments_only_capture_leaves_relationships_unchecked() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let dir = tempdir().unwrap();
    let captured = dir.path().join("comments.jsonl");
    let replayed = dir.path().join("replayed.jsonl");
    let report = dir.path().join("report.json");
    let config = format!(r#"{{"api_url": "{}"}}"#, server.uri());

    cli(&[
        "--config-json",
        &config,
        "read",
        "--streams",
        "comments",
        "--output",
        captured.to_str().unwrap(),
    ])
    .run()
    .await
    .unwrap();
    assert!(!read_tap_output(&captured).unwrap().has_stream(EntityKind::Post));

    cli(&[
        "read",
        "--strict",
        "--input",
        captured.to_str().unwrap(),
        "--output",
        replayed.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ])
    .run()
    .await
    .unwrap();

    let written = read_json(&report);
    let comments = &written["report"]["streams"]["comments"];
    assert_eq!(comments["seen"], 2);
    assert_eq!(comments["unverified"], 2);
    assert_eq!(comments["invalid"], 0);
    assert_eq!(comments["dropped"], 0);

    let output = read_tap_output(&replayed).unwrap();
    assert_eq!(output.records(EntityKind::Comment).len(), 2);
}

#[tokio::test]
async fn test_cli_unknown_stream() {
    let err = cli(&["read", "--streams", "users,albums", "--input", "/dev/null"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StreamNotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_cli_analyze_missing_input() {
    let err = cli(&["analyze", "--input", "/nonexistent/captured.jsonl"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_cli_invalid_inline_config() {
    let err = cli(&["--config-json", r#"{"api_url": "ftp://example.com"}"#, "check"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }), "{err:?}");
}

// ============================================================================
// Replay without the network
// ============================================================================

#[tokio::test]
async fn test_memory_source_matches_rest() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let config = config_for(&server);
    let mut rest_messages = Vec::new();
    engine_for(&config)
        .run(&EntityKind::ALL, &mut rest_messages)
        .await
        .unwrap();

    let source = MemorySource::new()
        .with_records(EntityKind::User, users().as_array().unwrap().clone())
        .with_records(EntityKind::Post, posts().as_array().unwrap().clone())
        .with_records(EntityKind::Comment, comments().as_array().unwrap().clone());
    let mut memory_messages = Vec::new();
    SyncEngine::new(source)
        .with_config(config.sync_config(0))
        .run(&EntityKind::ALL, &mut memory_messages)
        .await
        .unwrap();

    for stream in ["users", "posts", "comments"] {
        assert_eq!(
            record_ids(&rest_messages, stream),
            record_ids(&memory_messages, stream)
        );
    }
}
