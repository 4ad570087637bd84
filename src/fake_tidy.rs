// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory `TidyDns` used by the cache, provider and webhook tests.
//!
//! Records live in a single list; created records get increasing IDs and
//! are visible to later listings. Individual operations can be made to fail.

use crate::errors::TidyError;
use crate::tidydns::{JsonNumber, Record, TidyDns, TidyId, Zone};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

const FAILURE_STATUS: u16 = 500;

#[derive(Debug, Default)]
pub struct FakeTidy {
    zones: Mutex<Vec<Zone>>,
    records: Mutex<Vec<Record>>,
    created: Mutex<Vec<(TidyId, Record)>>,
    deleted: Mutex<Vec<(TidyId, TidyId)>>,
    next_id: AtomicUsize,
    zone_listings: AtomicUsize,
    fail_list_zones: AtomicBool,
    fail_list_records: AtomicBool,
    failing_destinations: Mutex<HashSet<String>>,
    failing_record_ids: Mutex<HashSet<String>>,
}

pub fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: JsonNumber::from(id),
        name: name.to_string(),
    }
}

impl FakeTidy {
    pub fn with_zones(zones: Vec<Zone>) -> Self {
        Self {
            zones: Mutex::new(zones),
            next_id: AtomicUsize::new(1000),
            ..Self::default()
        }
    }

    /// Seed an existing record. The zone must already be registered.
    pub fn add_record(
        &self,
        id: &str,
        zone: &Zone,
        record_type: &str,
        name: &str,
        destination: &str,
        ttl: &str,
    ) {
        self.records.lock().unwrap().push(Record {
            id: JsonNumber::from(id),
            record_type: record_type.to_string(),
            name: name.to_string(),
            description: String::new(),
            destination: destination.to_string(),
            ttl: JsonNumber::from(ttl),
            zone_name: zone.name.clone(),
            zone_id: zone.id.clone(),
        });
    }

    pub fn set_zones(&self, zones: Vec<Zone>) {
        *self.zones.lock().unwrap() = zones;
    }

    pub fn fail_list_zones(&self, fail: bool) {
        self.fail_list_zones.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list_records(&self, fail: bool) {
        self.fail_list_records.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create_of(&self, destination: &str) {
        self.failing_destinations
            .lock()
            .unwrap()
            .insert(destination.to_string());
    }

    pub fn fail_delete_of(&self, record_id: &str) {
        self.failing_record_ids
            .lock()
            .unwrap()
            .insert(record_id.to_string());
    }

    pub fn zone_listings(&self) -> usize {
        self.zone_listings.load(Ordering::SeqCst)
    }

    /// Successful creates, in completion order.
    pub fn created(&self) -> Vec<(TidyId, Record)> {
        self.created.lock().unwrap().clone()
    }

    /// Successful deletes as `(zone_id, record_id)`, in completion order.
    pub fn deleted(&self) -> Vec<(TidyId, TidyId)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .deleted()
            .into_iter()
            .map(|(_, id)| id.to_string())
            .collect();
        ids.sort();
        ids
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

fn failure() -> TidyError {
    TidyError::UnexpectedStatus {
        status: FAILURE_STATUS,
    }
}

#[async_trait::async_trait]
impl TidyDns for FakeTidy {
    async fn list_zones(&self) -> Result<Vec<Zone>, TidyError> {
        self.zone_listings.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_zones.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self.zones.lock().unwrap().clone())
    }

    async fn list_records(&self, zone_id: &TidyId) -> Result<Vec<Record>, TidyError> {
        if self.fail_list_records.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| &record.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn create_record(&self, zone_id: &TidyId, record: &Record) -> Result<(), TidyError> {
        crate::tidydns::RecordType::encode(&record.record_type)?;
        if self
            .failing_destinations
            .lock()
            .unwrap()
            .contains(&record.destination)
        {
            return Err(failure());
        }

        let zone_name = self
            .zones
            .lock()
            .unwrap()
            .iter()
            .find(|zone| &zone.id == zone_id)
            .map(|zone| zone.name.clone())
            .unwrap_or_default();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        self.records.lock().unwrap().push(Record {
            id: JsonNumber::from(id as i64),
            zone_name,
            zone_id: zone_id.clone(),
            ..record.clone()
        });
        self.created
            .lock()
            .unwrap()
            .push((zone_id.clone(), record.clone()));
        Ok(())
    }

    async fn delete_record(&self, zone_id: &TidyId, record_id: &TidyId) -> Result<(), TidyError> {
        if self
            .failing_record_ids
            .lock()
            .unwrap()
            .contains(record_id.as_str())
        {
            return Err(failure());
        }

        self.records
            .lock()
            .unwrap()
            .retain(|record| !(&record.id == record_id && &record.zone_id == zone_id));
        self.deleted
            .lock()
            .unwrap()
            .push((zone_id.clone(), record_id.clone()));
        Ok(())
    }
}
