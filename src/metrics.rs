// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the TidyDNS webhook.
//!
//! # Metrics Categories
//!
//! - **TidyDNS Request Metrics** - Every HTTP response received from TidyDNS
//! - **Record Operation Metrics** - Outcome of each record create/delete
//! - **Zone Cache Metrics** - Outcome of each periodic zone refresh
//!
//! Record writes during `apply_changes` are best effort and never fail the
//! call, so the record operation counters are the only place partial failure
//! shows up besides the logs.
//!
//! # Example
//!
//! ```rust,no_run
//! use tidydns_webhook::metrics::{gather_metrics, record_tidy_request};
//!
//! record_tidy_request("GET", "/zone", 200);
//! let text = gather_metrics().unwrap();
//! assert!(text.contains("tidy_requests_total"));
//! ```

use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics
const METRICS_NAMESPACE: &str = "tidy";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// TidyDNS Request Metrics
// ============================================================================

/// Total number of requests made to TidyDNS
///
/// Labels:
/// - `method`: HTTP method
/// - `endpoint`: API path without the `/=` prefix and query string
/// - `code`: HTTP status code of the response
pub static TIDY_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_requests_total"),
        "Total number of requests made to TidyDNS by method, endpoint and status code",
    );
    let counter = CounterVec::new(opts, &["method", "endpoint", "code"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Record Operation Metrics
// ============================================================================

/// Total number of record operations submitted while applying changes
///
/// Labels:
/// - `operation`: `create` or `delete`
/// - `status`: `success` or `error`
pub static RECORD_OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_operations_total"),
        "Total number of record operations by operation and outcome",
    );
    let counter = CounterVec::new(opts, &["operation", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Zone Cache Metrics
// ============================================================================

/// Total number of zone list refreshes
///
/// Labels:
/// - `status`: `success` or `error`
pub static ZONE_REFRESHES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_refreshes_total"),
        "Total number of zone list refreshes by outcome",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a response received from TidyDNS
///
/// # Arguments
/// * `method` - HTTP method of the request
/// * `endpoint` - API path without prefix and query
/// * `code` - HTTP status code
pub fn record_tidy_request(method: &str, endpoint: &str, code: u16) {
    TIDY_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &code.to_string()])
        .inc();
}

/// Record the outcome of one record create or delete
///
/// # Arguments
/// * `operation` - `create` or `delete`
/// * `success` - Whether TidyDNS accepted the operation
pub fn record_record_operation(operation: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    RECORD_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
}

/// Record the outcome of a zone list refresh
pub fn record_zone_refresh(success: bool) {
    let status = if success { "success" } else { "error" };
    ZONE_REFRESHES_TOTAL.with_label_values(&[status]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
