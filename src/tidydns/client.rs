// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP client for the TidyDNS API.
//!
//! TidyDNS serves its API under a `/=` prefix, authenticates with HTTP basic
//! auth and only ever answers `200 OK` on success. Request bodies are form
//! encoded, responses are JSON.

use super::types::{Record, RecordType, TidyId, Zone};
use super::TidyDns;
use crate::constants::TIDY_API_PREFIX;
use crate::errors::TidyError;
use crate::metrics::record_tidy_request;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// TidyDNS API client.
#[derive(Clone)]
pub struct TidyDnsClient {
    /// HTTP client for API requests
    client: HttpClient,
    /// Base URL without trailing slash
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for TidyDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TidyDnsClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl TidyDnsClient {
    /// Create a client for the TidyDNS instance at `endpoint`.
    ///
    /// Every request is bounded by `timeout`; a request that times out fails
    /// like any other transport error.
    ///
    /// # Errors
    ///
    /// Returns [`TidyError::InvalidEndpoint`] if the endpoint is not a valid
    /// URL or the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, TidyError> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TidyError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            endpoint = %endpoint,
            timeout = ?timeout,
            "Creating TidyDNS client"
        );

        Self::with_client(client, endpoint, username, password)
    }

    /// Create a client around an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`TidyError::InvalidEndpoint`] if the endpoint is not a valid URL.
    pub fn with_client(
        client: HttpClient,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, TidyError> {
        let base_url = build_api_url(endpoint);
        Url::parse(&base_url).map_err(|e| TidyError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Base URL all API paths are appended to.
    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the response body.
    ///
    /// Anything but `200 OK` is an error. Every response, successful or not,
    /// is counted in the request metrics.
    async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<String>,
    ) -> Result<String, TidyError> {
        let url = format!("{}{path}", self.base_url);

        debug!(method = %method, url = %url, "HTTP API request to TidyDNS");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(body) = form {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|source| TidyError::Request {
            method: method.to_string(),
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        record_tidy_request(method.as_str(), &metric_endpoint(path), status.as_u16());

        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                method = %method,
                url = %url,
                status = %status,
                error = %error_text,
                "HTTP API request failed"
            );
            return Err(TidyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| TidyError::Request {
            method: method.to_string(),
            url,
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TidyError> {
        let body = self.request(Method::GET, path, None).await?;
        serde_json::from_str(&body).map_err(|e| TidyError::Decode {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl TidyDns for TidyDnsClient {
    async fn list_zones(&self) -> Result<Vec<Zone>, TidyError> {
        self.get_json(&format!("{TIDY_API_PREFIX}/zone?type=json"))
            .await
    }

    async fn list_records(&self, zone_id: &TidyId) -> Result<Vec<Record>, TidyError> {
        self.get_json(&format!(
            "{TIDY_API_PREFIX}/record_merged?type=json&zone_id={zone_id}&showall=1"
        ))
        .await
    }

    async fn create_record(&self, zone_id: &TidyId, record: &Record) -> Result<(), TidyError> {
        let record_type = RecordType::encode(&record.record_type)?;
        let form = encode_record_form(record_type, record);

        self.request(
            Method::POST,
            &format!("{TIDY_API_PREFIX}/record/new/{zone_id}"),
            Some(form),
        )
        .await
        .map(|_| ())
    }

    async fn delete_record(&self, zone_id: &TidyId, record_id: &TidyId) -> Result<(), TidyError> {
        self.request(
            Method::DELETE,
            &format!("{TIDY_API_PREFIX}/record/{record_id}/{zone_id}"),
            None,
        )
        .await
        .map(|_| ())
    }
}

/// Build the API base URL from a configured endpoint.
///
/// Adds `http://` when no scheme is given and strips trailing slashes.
pub(crate) fn build_api_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

/// Form body TidyDNS expects when creating a record.
///
/// New records are always active (`status=0`) and use the default location.
pub(crate) fn encode_record_form(record_type: RecordType, record: &Record) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("type", &record_type.code().to_string())
        .append_pair("name", &record.name)
        .append_pair("ttl", record.ttl.as_str())
        .append_pair("description", &record.description)
        .append_pair("status", "0")
        .append_pair("destination", &record.destination)
        .append_pair("location_id", "0")
        .finish()
}

/// Endpoint label for request metrics: the `/=` prefix and query are removed.
pub(crate) fn metric_endpoint(path: &str) -> String {
    let path = path.strip_prefix(TIDY_API_PREFIX).unwrap_or(path);
    path.split_once('?').map_or(path, |(p, _)| p).to_string()
}
