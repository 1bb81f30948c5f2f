//! Integration tests for loading configuration files from disk.

mod common;

use std::io::Write;

use common::*;
use mountd_config::{load_config, read_document, ConfigError, SchemaVariant, Section};
use serde_json::json;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_valid_file() {
    let file = write_temp(&minimal_document().to_string());
    let config = load_config(file.path(), SchemaVariant::Baseline, &registry()).unwrap();
    assert_eq!(config.variant, SchemaVariant::Baseline);
    assert_eq!(config.daemon.port, 9036);
    assert_eq!(config.orientation, Section::NotConfigured);
    assert!(config.ha.endstop.get().is_none());
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(
        &dir.path().join("mount.json"),
        SchemaVariant::Baseline,
        &registry(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }), "{err}");
}

#[test]
fn test_malformed_json_is_parse_error() {
    let file = write_temp("{\"daemon\": \"mount\",");
    let err = read_document(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}

#[test]
fn test_invalid_file_reports_source_and_variant() {
    let mut doc = minimal_document();
    doc["serial_baud"] = json!(9600);
    let file = write_temp(&doc.to_string());

    let err = load_config(file.path(), SchemaVariant::Extended, &registry()).unwrap_err();
    match &err {
        ConfigError::Invalid {
            source_name,
            variant,
            violations,
        } => {
            assert_eq!(source_name, &file.path().display().to_string());
            assert_eq!(variant, "extended");
            assert!(find(violations, "/serial_baud").is_some());
            assert!(find(violations, "/ha/endstop_pin").is_some());
        }
        other => panic!("Expected Invalid, got: {other}"),
    }
}

#[test]
fn test_errors_follow_document_order() {
    let doc = json!({
        "focus": {"speed": "fast"},
        "latitude": 95,
        "daemon": 7
    });
    let file = write_temp(&serde_json::to_string_pretty(&doc).unwrap());
    let err = load_config(file.path(), SchemaVariant::Baseline, &registry()).unwrap_err();
    let violations = err.violations().unwrap();

    let observed = paths(violations);
    let focus_speed = observed.iter().position(|p| p == "/focus/speed").unwrap();
    let latitude = observed.iter().position(|p| p == "/latitude").unwrap();
    let daemon_type = observed
        .iter()
        .rposition(|p| p == "/daemon")
        .unwrap();
    assert!(focus_speed < latitude);
    assert!(latitude < daemon_type);
}
