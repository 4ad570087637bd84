// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Conversion between TidyDNS records and External-DNS endpoints.
//!
//! TidyDNS stores one value per record, names records relative to their zone
//! (`.` for the apex), enforces a TTL floor and has no notion of labels.
//! External-DNS works with fully qualified names and endpoints holding any
//! number of targets. Everything in this module is pure; grouping records
//! into multi-target endpoints is left to the provider.

use crate::constants::{APEX_RECORD_NAME, MIN_RECORD_TTL_SECS, RECORD_TYPE_CNAME, UNKNOWN_ZONE_ID};
use crate::endpoint::Endpoint;
use crate::tidydns::{JsonNumber, Record, TidyId, Zone};
use tracing::{debug, warn};
use url::Host;

/// Raise a TTL below the TidyDNS floor to the floor.
///
/// `0` means "use the zone default" and passes through unchanged.
///
/// # Example
///
/// ```rust
/// use tidydns_webhook::translate::clamp_ttl;
///
/// assert_eq!(clamp_ttl(100), 300);
/// assert_eq!(clamp_ttl(0), 0);
/// assert_eq!(clamp_ttl(600), 600);
/// ```
#[must_use]
pub fn clamp_ttl(ttl: i64) -> i64 {
    if ttl != 0 && ttl < MIN_RECORD_TTL_SECS {
        MIN_RECORD_TTL_SECS
    } else {
        ttl
    }
}

/// Fully qualified name of a record.
#[must_use]
pub fn record_fqdn(record: &Record) -> String {
    if record.name == APEX_RECORD_NAME {
        record.zone_name.clone()
    } else {
        format!("{}.{}", record.name, record.zone_name)
    }
}

/// Convert a TidyDNS record into a single-target endpoint.
///
/// Returns `None` (and logs a warning) when the record has no usable name or
/// its TTL is not an integer; callers skip such records.
#[must_use]
pub fn record_to_endpoint(record: &Record) -> Option<Endpoint> {
    let dns_name = record_fqdn(record);
    if dns_name.is_empty() {
        warn!(record_id = %record.id, "Skipping record without a DNS name");
        return None;
    }

    let Some(ttl) = record.ttl.as_i64() else {
        warn!(
            record_id = %record.id,
            dns_name = %dns_name,
            ttl = %record.ttl,
            "Skipping record with non-integer TTL"
        );
        return None;
    };

    let target = if record.record_type == RECORD_TYPE_CNAME {
        record.destination.trim_end_matches('.')
    } else {
        record.destination.as_str()
    };

    Some(Endpoint::with_ttl(
        &dns_name,
        &record.record_type,
        ttl,
        [target],
    ))
}

/// Zone a fully qualified name belongs to, with the zone relative name.
///
/// The name must equal the zone name or end with `.` plus the zone name; when
/// zones are nested the most specific one wins.
fn locate<'z, 'n>(zones: &'z [Zone], dns_name: &'n str) -> Option<(&'z Zone, &'n str)> {
    zones
        .iter()
        .filter(|zone| !zone.name.is_empty())
        .filter_map(|zone| relative_part(dns_name, &zone.name).map(|name| (zone, name)))
        .max_by_key(|(zone, _)| zone.name.len())
}

/// Name relative to `zone_name`, or `None` if `dns_name` is outside the zone.
fn relative_part<'a>(dns_name: &'a str, zone_name: &str) -> Option<&'a str> {
    let rest = dns_name.strip_suffix(zone_name)?;
    if rest.is_empty() {
        return Some(APEX_RECORD_NAME);
    }
    rest.strip_suffix('.').filter(|label| !label.is_empty())
}

/// Map a fully qualified name to its TidyDNS record name and zone ID.
///
/// The apex maps to `"."`. A name outside every known zone maps to an empty
/// name and zone ID `"0"`, which callers treat as "cannot be mapped".
///
/// Zone suffixes only match on a label boundary and the longest matching zone
/// wins: with zone `example.com`, `badexample.com` is outside the zone rather
/// than record `bad`, and with `sub.example.com` also known,
/// `www.sub.example.com` lands in the child zone.
///
/// # Example
///
/// ```rust
/// use tidydns_webhook::tidydns::{JsonNumber, Zone};
/// use tidydns_webhook::translate::zone_relative_name;
///
/// let zones = vec![Zone { id: JsonNumber::from("1"), name: "example.com".into() }];
///
/// assert_eq!(zone_relative_name(&zones, "example.com").0, ".");
/// assert_eq!(zone_relative_name(&zones, "sub.example.com").0, "sub");
/// assert_eq!(zone_relative_name(&zones, "example.org").1.as_str(), "0");
/// ```
#[must_use]
pub fn zone_relative_name(zones: &[Zone], dns_name: &str) -> (String, TidyId) {
    locate(zones, dns_name)
        .map(|(zone, name)| (name.to_string(), zone.id.clone()))
        .unwrap_or_else(|| (String::new(), JsonNumber::from(UNKNOWN_ZONE_ID)))
}

/// Value as TidyDNS should store it.
///
/// External-DNS wraps some TXT values in double quotes, which TidyDNS refuses;
/// they are removed for every type. CNAME values get a trailing dot.
#[must_use]
pub fn normalize_target(record_type: &str, target: &str) -> String {
    let target = target.trim_matches('"');
    if record_type == RECORD_TYPE_CNAME {
        format!("{target}.")
    } else {
        target.to_string()
    }
}

/// Whether an existing record holds `target`.
///
/// Both sides are compared in canonical form (no surrounding quotes, CNAME
/// values without trailing dots) so that a value stored by
/// [`normalize_target`] matches the endpoint target it came from.
#[must_use]
pub fn destination_matches(record: &Record, target: &str) -> bool {
    canonical_value(&record.record_type, &record.destination)
        == canonical_value(&record.record_type, target)
}

fn canonical_value<'a>(record_type: &str, value: &'a str) -> &'a str {
    let value = value.trim_matches('"');
    if record_type == RECORD_TYPE_CNAME {
        value.trim_end_matches('.')
    } else {
        value
    }
}

/// Expand an endpoint into one TidyDNS record per target.
///
/// The zone is taken from `zones`; an endpoint outside every known zone yields
/// no records. Labels have no TidyDNS representation and are dropped.
#[must_use]
pub fn endpoint_to_records(endpoint: &Endpoint, zones: &[Zone]) -> Vec<Record> {
    let Some((zone, name)) = locate(zones, &endpoint.dns_name) else {
        debug!(dns_name = %endpoint.dns_name, "DNS name cannot be mapped to a zone");
        return Vec::new();
    };

    let ttl = JsonNumber::from(clamp_ttl(endpoint.record_ttl));

    endpoint
        .targets
        .iter()
        .map(|target| Record {
            record_type: endpoint.record_type.clone(),
            name: name.to_string(),
            destination: normalize_target(&endpoint.record_type, target),
            ttl: ttl.clone(),
            zone_name: zone.name.clone(),
            zone_id: zone.id.clone(),
            ..Record::default()
        })
        .collect()
}

/// Encode unicode labels of a DNS name to their ASCII (punycode) form.
///
/// Names that cannot be encoded are returned unchanged.
#[must_use]
pub fn to_ascii_name(dns_name: &str) -> String {
    match Host::parse(dns_name) {
        Ok(Host::Domain(ascii)) => ascii,
        _ => dns_name.to_string(),
    }
}

/// Apply the TidyDNS constraints to an endpoint so External-DNS sees the
/// endpoint as TidyDNS will store it: TTL floor, no labels, ASCII name.
pub fn adjust_endpoint(endpoint: &mut Endpoint) {
    endpoint.record_ttl = clamp_ttl(endpoint.record_ttl);
    endpoint.labels.clear();
    endpoint.dns_name = to_ascii_name(&endpoint.dns_name);
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod translate_tests;
