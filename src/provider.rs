// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! External-DNS provider backed by TidyDNS.
//!
//! Reads are strict: if any zone cannot be listed, the whole call fails.
//! Writes are best effort: every record create/delete runs independently,
//! failures are logged and counted in metrics, and [`TidyProvider::apply_changes`]
//! still succeeds.
//!
//! TidyDNS has no in-place update. An update is a delete of the old
//! endpoint's records followed by a create of the new endpoint's records,
//! with no atomicity between the two.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tidydns_webhook::endpoint::{Changes, Endpoint};
//! use tidydns_webhook::provider::TidyProvider;
//! use tidydns_webhook::tidydns::{TidyDns, TidyDnsClient};
//! use tidydns_webhook::zone_cache::ZoneCache;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client: Arc<dyn TidyDns> = Arc::new(TidyDnsClient::new(
//!     "https://tidy.example.net",
//!     "user",
//!     "secret",
//!     Duration::from_secs(10),
//! )?);
//! let zones = ZoneCache::start(client.clone(), Duration::from_secs(600)).await?;
//! let provider = TidyProvider::new(client, zones);
//!
//! let changes = Changes {
//!     create: vec![Endpoint::with_ttl("www.example.com", "A", 300, ["192.0.2.1"])],
//!     ..Changes::default()
//! };
//! provider.apply_changes(&changes).await?;
//! # Ok(())
//! # }
//! ```

use crate::endpoint::{Changes, DomainFilter, Endpoint};
use crate::errors::ProviderError;
use crate::metrics::record_record_operation;
use crate::tidydns::{Record, TidyDns, Zone};
use crate::translate::{
    adjust_endpoint, destination_matches, endpoint_to_records, record_fqdn, record_to_endpoint,
};
use crate::zone_cache::{ZoneCache, ZoneSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

const OPERATION_CREATE: &str = "create";
const OPERATION_DELETE: &str = "delete";

/// External-DNS provider operations on top of a TidyDNS client and zone cache.
pub struct TidyProvider {
    client: Arc<dyn TidyDns>,
    zones: ZoneCache,
}

impl TidyProvider {
    /// Create a provider using `client` for record operations and `zones`
    /// for the zone list.
    pub fn new(client: Arc<dyn TidyDns>, zones: ZoneCache) -> Self {
        Self { client, zones }
    }

    /// Domain filter covering every zone TidyDNS manages.
    pub async fn domain_filter(&self) -> DomainFilter {
        let zones = self.zones.zones().await;
        DomainFilter::new(zones.iter().map(|zone| zone.name.as_str()))
    }

    /// All records of all zones as External-DNS endpoints.
    ///
    /// Records sharing a DNS name and type are merged into one endpoint whose
    /// targets keep the order the records were listed in. The TTL of the
    /// first record seen is used for the merged endpoint. Records that cannot
    /// be translated are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ListRecords`] if any zone cannot be listed.
    pub async fn records(&self) -> Result<Vec<Endpoint>, ProviderError> {
        let zones = self.zones.zones().await;
        let records = list_all_records(self.client.as_ref(), &zones).await?;

        let endpoints = group_records(&records);
        debug!(
            record_count = records.len(),
            endpoint_count = endpoints.len(),
            "Listed TidyDNS records"
        );
        Ok(endpoints)
    }

    /// Rewrite endpoints the way TidyDNS will store them.
    ///
    /// TTLs below the floor are raised, labels are removed and DNS names are
    /// punycode encoded, so External-DNS does not see a difference between
    /// desired and stored state that it can never resolve.
    #[must_use]
    pub fn adjust_endpoints(&self, mut endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
        endpoints.iter_mut().for_each(adjust_endpoint);
        endpoints
    }

    /// Apply a change set.
    ///
    /// One zone snapshot and one record listing are taken up front and used
    /// for the whole call. Creates and deletes run as concurrent tasks, one
    /// per endpoint. `update_old` deletions run one after another before the
    /// `update_new` creations are started. The call returns once every task
    /// has finished.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ListRecords`] if the record listing fails, in
    /// which case nothing is changed. Failures of individual record writes are
    /// logged and never returned.
    pub async fn apply_changes(&self, changes: &Changes) -> Result<(), ProviderError> {
        if changes.is_empty() {
            debug!("No changes to apply");
            return Ok(());
        }

        let zones = self.zones.zones().await;
        let records: Arc<[Record]> = list_all_records(self.client.as_ref(), &zones)
            .await?
            .into();

        info!(
            create = changes.create.len(),
            update = changes.update_new.len(),
            delete = changes.delete.len(),
            "Applying changes to TidyDNS"
        );

        let mut tasks = JoinSet::new();

        for endpoint in &changes.create {
            self.spawn_create(&mut tasks, &zones, endpoint);
        }

        for endpoint in &changes.delete {
            let client = Arc::clone(&self.client);
            let records = Arc::clone(&records);
            let endpoint = endpoint.clone();
            tasks.spawn(async move { delete_endpoint(client.as_ref(), &records, &endpoint).await });
        }

        for endpoint in &changes.update_old {
            delete_endpoint(self.client.as_ref(), &records, endpoint).await;
        }

        for endpoint in &changes.update_new {
            self.spawn_create(&mut tasks, &zones, endpoint);
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Record operation task did not complete");
            }
        }

        Ok(())
    }

    fn spawn_create(&self, tasks: &mut JoinSet<()>, zones: &ZoneSnapshot, endpoint: &Endpoint) {
        let client = Arc::clone(&self.client);
        let zones = Arc::clone(zones);
        let endpoint = endpoint.clone();
        tasks.spawn(async move { create_endpoint(client.as_ref(), &zones, &endpoint).await });
    }
}

/// List the records of every zone, failing on the first zone that cannot be
/// listed.
async fn list_all_records(
    client: &dyn TidyDns,
    zones: &[Zone],
) -> Result<Vec<Record>, ProviderError> {
    let mut all_records = Vec::new();

    for zone in zones {
        let records =
            client
                .list_records(&zone.id)
                .await
                .map_err(|source| ProviderError::ListRecords {
                    zone: zone.name.clone(),
                    zone_id: zone.id.to_string(),
                    source,
                })?;
        all_records.extend(records);
    }

    Ok(all_records)
}

/// Merge single-target records into endpoints keyed by DNS name and type,
/// in first-seen order.
fn group_records(records: &[Record]) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for endpoint in records.iter().filter_map(record_to_endpoint) {
        let key = (endpoint.dns_name.clone(), endpoint.record_type.clone());
        match index.get(&key) {
            Some(&i) => endpoints[i].targets.extend(endpoint.targets),
            None => {
                index.insert(key, endpoints.len());
                endpoints.push(endpoint);
            }
        }
    }

    endpoints
}

/// Existing records holding any of the endpoint's targets.
///
/// Every record matching a target is returned, so a record is listed once
/// per target it matches.
fn find_records<'a>(records: &'a [Record], endpoint: &Endpoint) -> Vec<&'a Record> {
    endpoint
        .targets
        .iter()
        .flat_map(|target| {
            records.iter().filter(move |record| {
                record.record_type == endpoint.record_type
                    && record_fqdn(record) == endpoint.dns_name
                    && destination_matches(record, target)
            })
        })
        .collect()
}

async fn create_endpoint(client: &dyn TidyDns, zones: &[Zone], endpoint: &Endpoint) {
    let records = endpoint_to_records(endpoint, zones);

    for record in &records {
        debug!(
            dns_name = %endpoint.dns_name,
            record_type = %record.record_type,
            name = %record.name,
            destination = %record.destination,
            ttl = %record.ttl,
            zone_id = %record.zone_id,
            "Creating TidyDNS record"
        );

        match client.create_record(&record.zone_id, record).await {
            Ok(()) => record_record_operation(OPERATION_CREATE, true),
            Err(e) => {
                record_record_operation(OPERATION_CREATE, false);
                error!(
                    error = %e,
                    error_kind = e.kind(),
                    dns_name = %endpoint.dns_name,
                    record_type = %record.record_type,
                    destination = %record.destination,
                    "Failed to create TidyDNS record"
                );
            }
        }
    }
}

async fn delete_endpoint(client: &dyn TidyDns, records: &[Record], endpoint: &Endpoint) {
    let found = find_records(records, endpoint);
    if found.is_empty() {
        debug!(
            dns_name = %endpoint.dns_name,
            record_type = %endpoint.record_type,
            "No TidyDNS records match endpoint, nothing to delete"
        );
        return;
    }

    for record in found {
        debug!(
            dns_name = %endpoint.dns_name,
            record_id = %record.id,
            record_type = %record.record_type,
            destination = %record.destination,
            zone_id = %record.zone_id,
            "Deleting TidyDNS record"
        );

        match client.delete_record(&record.zone_id, &record.id).await {
            Ok(()) => record_record_operation(OPERATION_DELETE, true),
            Err(e) => {
                record_record_operation(OPERATION_DELETE, false);
                error!(
                    error = %e,
                    error_kind = e.kind(),
                    dns_name = %endpoint.dns_name,
                    record_id = %record.id,
                    "Failed to delete TidyDNS record"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
