// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! External-DNS data contract.
//!
//! These types mirror the JSON that External-DNS exchanges with webhook
//! providers: endpoints, change sets and the domain filter returned during
//! negotiation. Field names follow the External-DNS wire format exactly.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Arbitrary key/value labels External-DNS attaches to an endpoint.
pub type Labels = BTreeMap<String, String>;

/// Provider specific property attached to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    /// Property name
    pub name: String,
    /// Property value
    pub value: String,
}

/// A DNS name with one record type and one or more targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified DNS name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_name: String,

    /// Record values, e.g. IP addresses or a canonical name
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub targets: Vec<String>,

    /// Record type, e.g. `A`, `CNAME`, `TXT`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,

    /// Identifier separating records sharing name and type under routing policies
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// TTL in seconds, `0` meaning "not configured"
    #[serde(rename = "recordTTL", default, skip_serializing_if = "is_zero")]
    pub record_ttl: i64,

    /// Labels used by the External-DNS registry
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: Labels,

    /// Provider specific configuration
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

/// Go encodes empty slices and maps as `null`; read those as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(ttl: &i64) -> bool {
    *ttl == 0
}

impl Endpoint {
    /// Build an endpoint the way External-DNS does: a trailing dot is removed
    /// from the DNS name and from every target, labels start empty.
    #[must_use]
    pub fn with_ttl<I, S>(dns_name: &str, record_type: &str, ttl: i64, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            dns_name: dns_name.strip_suffix('.').unwrap_or(dns_name).to_string(),
            targets: targets
                .into_iter()
                .map(|t| {
                    let t = t.as_ref();
                    t.strip_suffix('.').unwrap_or(t).to_string()
                })
                .collect(),
            record_type: record_type.to_string(),
            record_ttl: ttl,
            ..Self::default()
        }
    }
}

/// The four-way change set External-DNS asks a provider to apply.
///
/// `update_old[i]` is superseded by `update_new[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Changes {
    /// Endpoints to create
    #[serde(default, deserialize_with = "null_as_empty")]
    pub create: Vec<Endpoint>,

    /// Endpoints as they were before an update
    #[serde(default, deserialize_with = "null_as_empty")]
    pub update_old: Vec<Endpoint>,

    /// Endpoints as they should be after an update
    #[serde(default, deserialize_with = "null_as_empty")]
    pub update_new: Vec<Endpoint>,

    /// Endpoints to delete
    #[serde(default, deserialize_with = "null_as_empty")]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// True when the change set contains nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

/// Domains a provider is responsible for, returned on negotiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFilter {
    /// Domains (and their subdomains) that are included
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Domains (and their subdomains) that are excluded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl DomainFilter {
    /// Build an include-only filter from a list of domains.
    ///
    /// Entries are trimmed, lower-cased and stripped of a trailing dot; empty
    /// entries are dropped.
    #[must_use]
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            include: prepare_filters(domains),
            exclude: Vec::new(),
        }
    }

    /// Whether `domain` is covered by this filter.
    ///
    /// An empty include list matches everything not excluded.
    #[must_use]
    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        let included =
            self.include.is_empty() || self.include.iter().any(|f| domain_matches(f, &domain));
        included && !self.exclude.iter().any(|f| domain_matches(f, &domain))
    }
}

fn prepare_filters<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    domains
        .into_iter()
        .map(|d| normalize_domain(d.as_ref()))
        .filter(|d| !d.is_empty())
        .collect()
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    domain
        .strip_suffix('.')
        .unwrap_or(domain)
        .to_ascii_lowercase()
}

fn domain_matches(filter: &str, domain: &str) -> bool {
    if filter.starts_with('.') {
        return domain.ends_with(filter);
    }
    domain == filter
        || domain
            .strip_suffix(filter)
            .is_some_and(|rest| rest.ends_with('.'))
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod endpoint_tests;
