// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TidyDNS management via its HTTP API.
//!
//! The provider only needs four operations from TidyDNS, captured by the
//! [`TidyDns`] trait. [`TidyDnsClient`] implements them over HTTP with basic
//! authentication; tests substitute an in-memory implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tidydns_webhook::tidydns::{TidyDns, TidyDnsClient};
//!
//! # async fn example() -> Result<(), tidydns_webhook::errors::TidyError> {
//! let client = TidyDnsClient::new(
//!     "https://tidy.example.net",
//!     "user",
//!     "secret",
//!     Duration::from_secs(10),
//! )?;
//!
//! for zone in client.list_zones().await? {
//!     println!("{} ({})", zone.name, zone.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::TidyDnsClient;
pub use types::{JsonNumber, Record, RecordType, TidyId, Zone};

use crate::errors::TidyError;

/// The operations the provider needs from TidyDNS.
///
/// Each call either fully succeeds or fails; none partially succeed.
#[async_trait::async_trait]
pub trait TidyDns: Send + Sync {
    /// List every zone TidyDNS manages.
    async fn list_zones(&self) -> Result<Vec<Zone>, TidyError>;

    /// List every record of one zone.
    async fn list_records(&self, zone_id: &TidyId) -> Result<Vec<Record>, TidyError>;

    /// Create one record in a zone.
    async fn create_record(&self, zone_id: &TidyId, record: &Record) -> Result<(), TidyError>;

    /// Delete one record from a zone.
    async fn delete_record(&self, zone_id: &TidyId, record_id: &TidyId) -> Result<(), TidyError>;
}
