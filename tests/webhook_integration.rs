// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end tests of the webhook against a mocked TidyDNS server.
//!
//! The full stack is wired the way `main` does it: HTTP client, zone cache,
//! provider and webhook router. Requests are sent the way External-DNS sends
//! them.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tidydns_webhook::constants::WEBHOOK_MEDIA_TYPE;
use tidydns_webhook::provider::TidyProvider;
use tidydns_webhook::tidydns::{TidyDns, TidyDnsClient};
use tidydns_webhook::webhook::webhook_router;
use tidydns_webhook::zone_cache::ZoneCache;
use tokio::net::TcpListener;
use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn tidy_client(server: &MockServer) -> Arc<dyn TidyDns> {
    Arc::new(
        TidyDnsClient::new(&server.uri(), "tidy", "secret", Duration::from_secs(5))
            .expect("client should build"),
    )
}

async fn mock_zones(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/=/zone"))
        .and(basic_auth("tidy", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"id": 1, "name": "example.com"}]"#),
        )
        .mount(server)
        .await;
}

async fn mock_records(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/=/record_merged"))
        .and(query_param("zone_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "10", "type_name": "A", "name": "www", "description": "",
             "destination": "1.2.3.4", "ttl": "300", "zone_name": "example.com", "zone_id": "1"},
            {"id": "11", "type_name": "A", "name": "www", "description": "",
             "destination": "5.6.7.8", "ttl": "300", "zone_name": "example.com", "zone_id": "1"},
            {"id": "12", "type_name": "CNAME", "name": "alias", "description": "",
             "destination": "www.example.com.", "ttl": 3600, "zone_name": "example.com", "zone_id": 1}
        ])))
        .mount(server)
        .await;
}

/// Start the webhook for a mocked TidyDNS and return its base URL.
async fn start_webhook(server: &MockServer) -> String {
    let client = tidy_client(server);
    let zones = ZoneCache::start(client.clone(), Duration::from_secs(3600))
        .await
        .expect("initial zone listing should succeed");
    let provider = Arc::new(TidyProvider::new(client, zones));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, webhook_router(provider)).await.unwrap();
    });

    format!("http://{address}")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_startup_fails_without_zone_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/=/zone"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = ZoneCache::start(tidy_client(&server), Duration::from_secs(3600)).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_negotiate_and_list_records() {
    let server = MockServer::start().await;
    mock_zones(&server).await;
    mock_records(&server).await;
    let base = start_webhook(&server).await;
    let http = reqwest::Client::new();

    let filter: Value = http
        .get(format!("{base}/"))
        .header(reqwest::header::ACCEPT, WEBHOOK_MEDIA_TYPE)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filter, json!({"include": ["example.com"]}));

    let records: Value = http
        .get(format!("{base}/records"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        records,
        json!([
            {"dnsName": "www.example.com", "targets": ["1.2.3.4", "5.6.7.8"],
             "recordType": "A", "recordTTL": 300},
            {"dnsName": "alias.example.com", "targets": ["www.example.com"],
             "recordType": "CNAME", "recordTTL": 3600}
        ])
    );
}

#[tokio::test]
async fn test_apply_changes_against_tidydns() {
    let server = MockServer::start().await;
    mock_zones(&server).await;
    mock_records(&server).await;

    Mock::given(method("POST"))
        .and(path("/=/record/new/1"))
        .and(body_string_contains("type=2"))
        .and(body_string_contains("name=new"))
        .and(body_string_contains("destination=target.example.org."))
        .and(body_string_contains("ttl=300"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/=/record/10/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base = start_webhook(&server).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/records"))
        .header(reqwest::header::CONTENT_TYPE, WEBHOOK_MEDIA_TYPE)
        .body(
            json!({
                "Create": [{"dnsName": "new.example.com", "targets": ["target.example.org"],
                            "recordType": "CNAME", "recordTTL": 120}],
                "UpdateOld": [],
                "UpdateNew": [],
                "Delete": [{"dnsName": "www.example.com", "targets": ["1.2.3.4"],
                            "recordType": "A", "recordTTL": 300}]
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_apply_changes_succeeds_when_tidydns_rejects_a_record() {
    let server = MockServer::start().await;
    mock_zones(&server).await;
    mock_records(&server).await;

    Mock::given(method("POST"))
        .and(path("/=/record/new/1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let base = start_webhook(&server).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/records"))
        .body(
            json!({
                "Create": [{"dnsName": "multi.example.com", "targets": ["1.1.1.1", "2.2.2.2"],
                            "recordType": "A"}]
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_records_skips_malformed_records() {
    let server = MockServer::start().await;
    mock_zones(&server).await;
    Mock::given(method("GET"))
        .and(path("/=/record_merged"))
        .and(query_param("zone_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "10", "type_name": "A", "name": "www", "description": null,
             "destination": "1.2.3.4", "ttl": "300", "zone_name": "example.com", "zone_id": "1"},
            {"id": "11", "type_name": "A", "name": "broken", "description": "",
             "destination": "5.6.7.8", "ttl": null, "zone_name": "example.com", "zone_id": "1"},
            {"id": "12", "type_name": "A", "name": "nottl",
             "destination": "9.9.9.9", "zone_name": "example.com", "zone_id": "1"}
        ])))
        .mount(&server)
        .await;
    let base = start_webhook(&server).await;

    let response = reqwest::get(format!("{base}/records")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let records: Value = response.json().await.unwrap();
    assert_eq!(
        records,
        json!([
            {"dnsName": "www.example.com", "targets": ["1.2.3.4"],
             "recordType": "A", "recordTTL": 300}
        ])
    );
}

#[tokio::test]
async fn test_apply_changes_with_malformed_record_in_listing() {
    let server = MockServer::start().await;
    mock_zones(&server).await;
    Mock::given(method("GET"))
        .and(path("/=/record_merged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "10", "type_name": "A", "name": "www", "description": "",
             "destination": "1.2.3.4", "ttl": "300", "zone_name": "example.com", "zone_id": "1"},
            {"id": "11", "type_name": null, "name": "broken", "description": null,
             "destination": null, "ttl": null, "zone_name": "example.com", "zone_id": "1"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/=/record/10/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let base = start_webhook(&server).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/records"))
        .body(
            json!({
                "Delete": [{"dnsName": "www.example.com", "targets": ["1.2.3.4"],
                            "recordType": "A", "recordTTL": 300}]
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
}
