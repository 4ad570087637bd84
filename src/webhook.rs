// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP servers.
//!
//! Two listeners are run:
//!
//! - The **webhook** External-DNS talks to, normally bound to localhost
//!   inside the pod:
//!   - `GET /` - negotiation, returns the domain filter
//!   - `GET /records` - all records as endpoints
//!   - `POST /adjustendpoints` - endpoints rewritten to TidyDNS constraints
//!   - `POST /records` - apply a change set, `204 No Content` on success
//! - The **exposed** server for the platform:
//!   - `GET /healthz` - liveness
//!   - `GET /metrics` - Prometheus metrics
//!
//! Every webhook response carries the External-DNS webhook media type.
//! Malformed request bodies and provider errors are logged and answered with
//! `500 Internal Server Error`.

use crate::constants::WEBHOOK_MEDIA_TYPE;
use crate::endpoint::{Changes, Endpoint};
use crate::metrics::gather_metrics;
use crate::provider::TidyProvider;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Router for the External-DNS facing webhook.
pub fn webhook_router(provider: Arc<TidyProvider>) -> Router {
    Router::new()
        .route("/", get(negotiate))
        .route("/records", get(get_records).post(apply_changes))
        .route("/adjustendpoints", post(adjust_endpoints))
        .with_state(provider)
}

/// Router for health and metrics.
pub fn exposed_router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
}

/// Bind `address` and serve `router` until the server fails.
///
/// # Errors
///
/// Returns the I/O error if binding or serving fails.
pub async fn serve(name: &'static str, address: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(server = name, address = %listener.local_addr()?, "HTTP server listening");
    axum::serve(listener, router).await
}

async fn negotiate(State(provider): State<Arc<TidyProvider>>) -> Response {
    debug!("Negotiating domain filter");
    webhook_json(&provider.domain_filter().await)
}

async fn get_records(State(provider): State<Arc<TidyProvider>>) -> Response {
    match provider.records().await {
        Ok(endpoints) => webhook_json(&endpoints),
        Err(e) => {
            error!(error = %e, "Failed to list records");
            failure()
        }
    }
}

async fn adjust_endpoints(State(provider): State<Arc<TidyProvider>>, body: Bytes) -> Response {
    let Some(endpoints) = decode::<Vec<Endpoint>>(&body) else {
        return failure();
    };
    debug!(endpoint_count = endpoints.len(), "Adjusting endpoints");
    webhook_json(&provider.adjust_endpoints(endpoints))
}

async fn apply_changes(State(provider): State<Arc<TidyProvider>>, body: Bytes) -> Response {
    let Some(changes) = decode::<Changes>(&body) else {
        return failure();
    };

    match provider.apply_changes(&changes).await {
        Ok(()) => (StatusCode::NO_CONTENT, [(CONTENT_TYPE, WEBHOOK_MEDIA_TYPE)]).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to apply changes");
            failure()
        }
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics() -> Response {
    match gather_metrics() {
        Ok(text) => ([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], text).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    serde_json::from_slice(body)
        .inspect_err(|e| error!(error = %e, "Failed to decode request body"))
        .ok()
}

fn webhook_json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => ([(CONTENT_TYPE, WEBHOOK_MEDIA_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode response body");
            failure()
        }
    }
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, WEBHOOK_MEDIA_TYPE)],
    )
        .into_response()
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod webhook_tests;
