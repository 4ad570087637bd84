// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # tidydns-webhook - External-DNS provider for TidyDNS
//!
//! A webhook provider that lets [External-DNS](https://github.com/kubernetes-sigs/external-dns)
//! manage records in a TidyDNS server.
//!
//! ## Overview
//!
//! External-DNS works with endpoints: a fully qualified name, a record type,
//! a TTL and any number of targets. TidyDNS stores single-value records named
//! relative to their zone, refuses TTLs below 300 seconds (except `0`) and has
//! no labels. This crate translates between the two and applies External-DNS
//! change sets as independent record creates and deletes.
//!
//! ## Modules
//!
//! - [`tidydns`] - TidyDNS HTTP client and wire types
//! - [`zone_cache`] - Periodically refreshed zone list
//! - [`translate`] - Record and endpoint conversion
//! - [`provider`] - Listing, adjusting and applying changes
//! - [`webhook`] - External-DNS webhook and health/metrics servers
//! - [`endpoint`] - External-DNS data contract
//! - [`config`] - Command line and environment configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use tidydns_webhook::endpoint::Endpoint;
//! use tidydns_webhook::tidydns::{JsonNumber, Zone};
//! use tidydns_webhook::translate::endpoint_to_records;
//!
//! let zones = vec![Zone { id: JsonNumber::from("1"), name: "example.com".into() }];
//! let endpoint = Endpoint::with_ttl("www.example.com", "A", 60, ["192.0.2.1", "192.0.2.2"]);
//!
//! let records = endpoint_to_records(&endpoint, &zones);
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].name, "www");
//! assert_eq!(records[0].ttl.as_str(), "300");
//! ```

pub mod config;
pub mod constants;
pub mod endpoint;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod provider;
pub mod tidydns;
pub mod translate;
pub mod webhook;
pub mod zone_cache;

#[cfg(test)]
mod fake_tidy;
