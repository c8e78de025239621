//! Tests for decoder module

use super::*;
use crate::error::Error;
use serde_json::json;

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_array() {
    let decoder = JsonDecoder::new();
    let records = decoder
        .decode(r#"[{"id": 1, "title": "a"}, {"id": 2, "title": "b"}]"#)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[1]["title"], "b");
}

#[test]
fn test_json_decoder_single_object() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(r#"{"id": 1}"#).unwrap();
    assert_eq!(records, vec![json!({"id": 1})]);
}

#[test]
fn test_json_decoder_null_body_is_empty() {
    let decoder = JsonDecoder::new();
    assert!(decoder.decode("null").unwrap().is_empty());
}

#[test]
fn test_json_decoder_with_path() {
    let decoder = JsonDecoder::with_path("$.data.items");
    let records = decoder
        .decode(r#"{"data": {"items": [{"id": 1}, {"id": 2}]}}"#)
        .unwrap();
    assert_eq!(records.len(), 2);

    let decoder = JsonDecoder::with_path("results.0");
    let records = decoder.decode(r#"{"results": [[{"id": 9}]]}"#).unwrap();
    assert_eq!(records, vec![json!({"id": 9})]);
}

#[test]
fn test_json_decoder_missing_path() {
    let decoder = JsonDecoder::with_path("data");
    let err = decoder.decode(r#"{"items": []}"#).unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { ref path, .. } if path == "data"));
}

#[test]
fn test_json_decoder_invalid_json() {
    let decoder = JsonDecoder::new();
    let err = decoder.decode("not json").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_json_decoder_raw() {
    let decoder = JsonDecoder::with_path("data");
    let raw = decoder.decode_raw(r#"{"data": [1], "meta": {}}"#).unwrap();
    assert!(raw.get("meta").is_some());
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder_skips_blank_lines() {
    let decoder = JsonlDecoder::new();
    let records = decoder
        .decode("{\"id\": 1}\n\n   \n{\"id\": 2}\n")
        .unwrap();
    assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[test]
fn test_jsonl_decoder_reports_line_number() {
    let decoder = JsonlDecoder::new();
    let err = decoder.decode("{\"id\": 1}\n{broken\n").unwrap_err();
    match err {
        Error::Decode { message } => assert!(message.contains("line 2"), "{message}"),
        other => panic!("Expected Decode, got {other:?}"),
    }
}

#[test]
fn test_jsonl_decoder_raw_is_array() {
    let decoder = JsonlDecoder::new();
    let raw = decoder.decode_raw("{\"id\": 1}\n").unwrap();
    assert_eq!(raw, json!([{"id": 1}]));
}
