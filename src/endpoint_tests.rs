// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the External-DNS data contract.

use super::*;

#[test]
fn test_with_ttl_trims_trailing_dots() {
    let ep = Endpoint::with_ttl("www.example.com.", "CNAME", 300, ["example.com."]);

    assert_eq!(ep.dns_name, "www.example.com");
    assert_eq!(ep.targets, vec!["example.com".to_string()]);
    assert_eq!(ep.record_type, "CNAME");
    assert_eq!(ep.record_ttl, 300);
    assert!(ep.labels.is_empty());
}

#[test]
fn test_endpoint_serializes_external_dns_field_names() {
    let mut ep = Endpoint::with_ttl("a.example.com", "A", 600, ["1.2.3.4"]);
    ep.labels.insert("owner".to_string(), "default".to_string());

    let json = serde_json::to_value(&ep).unwrap();

    assert_eq!(json["dnsName"], "a.example.com");
    assert_eq!(json["recordType"], "A");
    assert_eq!(json["recordTTL"], 600);
    assert_eq!(json["targets"][0], "1.2.3.4");
    assert_eq!(json["labels"]["owner"], "default");
    assert!(json.get("setIdentifier").is_none());
    assert!(json.get("providerSpecific").is_none());
}

#[test]
fn test_endpoint_zero_ttl_is_omitted() {
    let ep = Endpoint::with_ttl("a.example.com", "A", 0, ["1.2.3.4"]);
    let json = serde_json::to_value(&ep).unwrap();
    assert!(json.get("recordTTL").is_none());
}

#[test]
fn test_endpoint_deserializes_with_missing_fields() {
    let ep: Endpoint =
        serde_json::from_str(r#"{"dnsName":"txt.example.com","recordType":"TXT"}"#).unwrap();

    assert_eq!(ep.dns_name, "txt.example.com");
    assert!(ep.targets.is_empty());
    assert_eq!(ep.record_ttl, 0);
    assert!(ep.labels.is_empty());
}

#[test]
fn test_changes_deserialize_pascal_case() {
    let json = r#"{
        "Create": [{"dnsName":"new.example.com","targets":["1.2.3.4"],"recordType":"A","recordTTL":300}],
        "UpdateOld": [],
        "UpdateNew": null,
        "Delete": [{"dnsName":"old.example.com","targets":["5.6.7.8"],"recordType":"A"}]
    }"#;

    let changes: Changes = serde_json::from_str(json).unwrap();

    assert_eq!(changes.create.len(), 1);
    assert_eq!(changes.create[0].dns_name, "new.example.com");
    assert!(changes.update_old.is_empty());
    assert!(changes.update_new.is_empty());
    assert_eq!(changes.delete[0].targets, vec!["5.6.7.8".to_string()]);
    assert!(!changes.is_empty());
}

#[test]
fn test_endpoint_null_labels_and_targets() {
    let ep: Endpoint =
        serde_json::from_str(r#"{"dnsName":"a.example.com","targets":null,"labels":null}"#)
            .unwrap();
    assert!(ep.targets.is_empty());
    assert!(ep.labels.is_empty());
}

#[test]
fn test_empty_changes() {
    let changes: Changes = serde_json::from_str("{}").unwrap();
    assert!(changes.is_empty());
}

#[test]
fn test_domain_filter_normalizes_entries() {
    let filter = DomainFilter::new(["Example.COM.", " example.org ", ""]);
    assert_eq!(filter.include, vec!["example.com", "example.org"]);
}

#[test]
fn test_domain_filter_matches_zone_and_subdomains() {
    let filter = DomainFilter::new(["example.com"]);

    assert!(filter.matches("example.com"));
    assert!(filter.matches("www.example.com."));
    assert!(!filter.matches("badexample.com"));
    assert!(!filter.matches("example.org"));
}

#[test]
fn test_empty_domain_filter_matches_everything() {
    let filter = DomainFilter::default();
    assert!(filter.matches("anything.test"));
}

#[test]
fn test_domain_filter_exclude_wins() {
    let filter = DomainFilter {
        include: vec!["example.com".to_string()],
        exclude: vec!["internal.example.com".to_string()],
    };

    assert!(filter.matches("www.example.com"));
    assert!(!filter.matches("db.internal.example.com"));
}

#[test]
fn test_domain_filter_json_shape() {
    let filter = DomainFilter::new(["example.com"]);
    let json = serde_json::to_string(&filter).unwrap();
    assert_eq!(json, r#"{"include":["example.com"]}"#);
}
