// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for TidyDNS operations and the provider built on top of them.
//!
//! - [`TidyError`] covers everything the TidyDNS HTTP API can fail with
//! - [`ProviderError`] covers the "all or nothing" reads of the provider
//! - [`ConfigError`] covers command line values that cannot be used
//!
//! Write failures during `apply_changes` are deliberately never turned into a
//! [`ProviderError`]; they are logged and counted per record instead.

use thiserror::Error;

/// Errors that can occur when talking to the TidyDNS HTTP API.
#[derive(Error, Debug)]
pub enum TidyError {
    /// The request could not be sent or no response arrived (connection
    /// refused, DNS failure, timeout)
    #[error("HTTP request {method} {url} failed: {source}")]
    Request {
        /// HTTP method of the failed request
        method: String,
        /// Full URL of the failed request
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// TidyDNS answered with anything but `200 OK`
    #[error("error from tidyDNS server: {status}")]
    UnexpectedStatus {
        /// HTTP status code returned by TidyDNS
        status: u16,
    },

    /// The response body could not be decoded
    #[error("failed to decode TidyDNS response from {url}: {reason}")]
    Decode {
        /// URL whose response could not be decoded
        url: String,
        /// Decoder error message
        reason: String,
    },

    /// The record type has no TidyDNS type code
    #[error("unmapped record type {0}")]
    UnmappedRecordType(String),

    /// The configured base URL is not usable
    #[error("invalid TidyDNS endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The configured endpoint
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },
}

impl TidyError {
    /// Short category for this error, logged as `error_kind`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { source, .. } if source.is_timeout() => "timeout",
            Self::Request { .. } => "transport",
            Self::UnexpectedStatus { .. } => "status",
            Self::Decode { .. } => "decode",
            Self::UnmappedRecordType(_) => "unmapped_type",
            Self::InvalidEndpoint { .. } => "config",
        }
    }
}

/// Errors surfaced by the provider to the webhook layer.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Listing the records of a zone failed, so no consistent view exists
    #[error("failed to list records of zone {zone} ({zone_id}): {source}")]
    ListRecords {
        /// Zone name
        zone: String,
        /// TidyDNS zone ID
        zone_id: String,
        /// Underlying TidyDNS error
        #[source]
        source: TidyError,
    },
}

/// Errors in command line or environment configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration such as `--zone-update-interval` could not be parsed
    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration {
        /// The value as given
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The log level is not one of the known level names
    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}
