//! Integration tests for document masking
//!
//! These tests exercise the masker end to end with the built-in providers:
//! - Masked values are consistent across fields and documents
//! - Suppressed fields never reach the output
//! - In-place mode keeps every unconfigured field untouched
//! - Rebuild mode emits only configured fields

use serde_json::{json, Value};
use std::net::Ipv4Addr;
use veil::core::run::{BatchConfig, LineEncoder, OutputFormat};
use veil::domain::document::parse_document;
use veil::domain::{Document, MaskSpecs, SuppressedFieldSet};
use veil::masking::{MaskMode, Masker, ProviderRegistry};

fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("test document must be an object")
}

fn masker(fields: &[(&str, Option<&str>)], suppress: &[&str], mode: MaskMode) -> Masker {
    Masker::new(
        &ProviderRegistry::with_builtins(),
        MaskSpecs::parse(fields.iter().copied()).unwrap(),
        SuppressedFieldSet::parse(suppress.iter().copied()).unwrap(),
        mode,
    )
    .unwrap()
}

fn assert_ipv4(value: &Value) {
    let text = value.as_str().expect("masked ip must be a string");
    assert!(text.parse::<Ipv4Addr>().is_ok(), "not an IPv4 address: {text}");
}

#[test]
fn test_in_place_masks_and_suppresses() {
    let mut masker = masker(&[("source.ip", Some("ipv4"))], &["user.name"], MaskMode::InPlace);
    let input = doc(json!({"source": {"ip": "34.70.236.26"}, "user": {"name": "alice"}}));

    let output = masker.mask_document(input).unwrap();

    assert_ipv4(&output["source"]["ip"]);
    assert_ne!(output["source"]["ip"], "34.70.236.26");
    assert!(output.get("user").is_none(), "emptied parent must be removed");
}

#[test]
fn test_rebuild_emits_only_configured_fields() {
    let mut masker = masker(&[("source.ip", Some("ipv4"))], &["user.name"], MaskMode::Rebuild);
    let input = doc(json!({"source": {"ip": "34.70.236.26"}, "user": {"name": "alice"}}));

    let output = masker.mask_document(input).unwrap();

    assert_eq!(output.keys().collect::<Vec<_>>(), vec!["source"]);
    assert_eq!(output["source"].as_object().unwrap().len(), 1);
    assert_ipv4(&output["source"]["ip"]);
}

#[test]
fn test_same_value_across_documents_masks_identically() {
    let mut masker = masker(&[("source.ip", Some("ipv4"))], &[], MaskMode::InPlace);

    let first = masker
        .mask_document(doc(json!({"source": {"ip": "10.0.0.1"}, "n": 1})))
        .unwrap();
    let second = masker
        .mask_document(doc(json!({"source": {"ip": "10.0.0.1"}, "n": 2})))
        .unwrap();

    assert_eq!(first["source"]["ip"], second["source"]["ip"]);
    assert_eq!(masker.store_stats().entries.get("ipv4"), Some(&1));
}

#[test]
fn test_consistency_is_per_mask_type_not_per_field() {
    let mut masker = masker(
        &[("source.ip", Some("ipv4")), ("related.ip", Some("ipv4"))],
        &[],
        MaskMode::InPlace,
    );

    let first = masker
        .mask_document(doc(json!({"source": {"ip": "34.70.236.26"}})))
        .unwrap();
    let second = masker
        .mask_document(doc(json!({"related": {"ip": ["34.70.236.26", "10.1.1.1"]}})))
        .unwrap();

    assert_eq!(second["related"]["ip"][0], first["source"]["ip"]);
    assert_ipv4(&second["related"]["ip"][1]);
}

#[test]
fn test_unconfigured_fields_pass_through_in_place() {
    let mut masker = masker(&[("source.ip", Some("ipv4"))], &[], MaskMode::InPlace);
    let input = json!({
        "@timestamp": "2024-05-01T10:00:00Z",
        "source": {"ip": "10.0.0.1", "port": 443},
        "event": {"kind": "alert", "tags": ["a", "b"]},
    });

    let output = Value::Object(masker.mask_document(doc(input.clone())).unwrap());

    assert_eq!(output["@timestamp"], input["@timestamp"]);
    assert_eq!(output["source"]["port"], input["source"]["port"]);
    assert_eq!(output["event"], input["event"]);
}

#[test]
fn test_identity_spec_copies_value_in_rebuild() {
    let mut masker = masker(
        &[("@timestamp", Some("none")), ("host.name", Some("service"))],
        &[],
        MaskMode::Rebuild,
    );
    let input = doc(json!({"@timestamp": "2024-05-01", "host": {"name": "web-01"}, "pid": 3}));

    let output = masker.mask_document(input).unwrap();

    assert_eq!(output["@timestamp"], "2024-05-01");
    assert!(output["host"]["name"].is_string());
    assert_ne!(output["host"]["name"], "web-01");
    assert!(output.get("pid").is_none());
}

#[test]
fn test_geo_points_with_same_coordinates_mask_identically() {
    let mut masker = masker(&[("source.geo", Some("geo_point"))], &[], MaskMode::InPlace);
    let geo = json!({"city_name": "Boston", "location": {"lat": 42.36, "lon": -71.06}});
    let other_city = json!({"city_name": "Cambridge", "location": {"lat": 42.36, "lon": -71.06}});

    let first = masker.mask_document(doc(json!({"source": {"geo": geo}}))).unwrap();
    let second = masker
        .mask_document(doc(json!({"source": {"geo": other_city}})))
        .unwrap();

    assert_eq!(first["source"]["geo"], second["source"]["geo"]);
    let masked = &first["source"]["geo"];
    assert!(masked["location"]["lat"].is_number());
    assert!(masked["location"]["lon"].is_number());
    assert!(masked["country_iso_code"].is_string());
}

#[test]
fn test_message_scrubs_embedded_addresses() {
    let mut masker = masker(&[("message", Some("message"))], &[], MaskMode::InPlace);
    let input = doc(json!({"message": "connection from 192.168.1.20 refused"}));

    let output = masker.mask_document(input).unwrap();
    let text = output["message"].as_str().unwrap();

    assert!(text.starts_with("connection from "));
    assert!(text.ends_with(" refused"));
    assert!(!text.contains("192.168.1.20"));
}

#[test]
fn test_separate_maskers_do_not_share_replacements() {
    let input = json!({"user": {"name": "alice"}});
    let mut first = masker(&[("user.name", Some("username"))], &[], MaskMode::InPlace);
    let mut second = masker(&[("user.name", Some("username"))], &[], MaskMode::InPlace);

    first.mask_document(doc(input.clone())).unwrap();
    second.mask_document(doc(input)).unwrap();

    assert_eq!(first.store().len(), 1);
    assert_eq!(second.store().len(), 1);
}

#[test]
fn test_unmasked_fields_are_written_byte_for_byte() {
    let raw = r#"{"zeta":1,"trace_id":123456789012345678901234567890,"alpha":{"y":1e2,"x":2},"source":{"ip":"1.2.3.4"},"user":{"email":"a@b.c","id":-0.50}}"#;
    let mut masker = masker(
        &[("source.ip", Some("ipv4"))],
        &["user.email"],
        MaskMode::InPlace,
    );
    let encoder = LineEncoder::new(&BatchConfig::new(10, OutputFormat::Ndjson, "documents")).unwrap();

    let masked = masker
        .mask_document(parse_document(raw, "raw:1").unwrap())
        .unwrap();
    let line = encoder.encode(&masked).unwrap().remove(0);

    let prefix = r#"{"zeta":1,"trace_id":123456789012345678901234567890,"alpha":{"y":1e2,"x":2},"source":{"ip":""#;
    let suffix = r#""},"user":{"id":-0.50}}"#;
    assert!(line.starts_with(prefix), "unexpected output: {line}");
    assert!(line.ends_with(suffix), "unexpected output: {line}");

    let ip = &line[prefix.len()..line.len() - suffix.len()];
    assert!(ip.parse::<Ipv4Addr>().is_ok(), "not an IPv4 address: {ip}");
    assert_ne!(ip, "1.2.3.4");
}
