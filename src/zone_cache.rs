// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cached list of TidyDNS zones.
//!
//! Nearly every provider operation needs the zone list, so it is fetched once
//! at startup and refreshed in the background on a fixed interval. A single
//! task owns the list; reads and refreshes are funnelled through one channel,
//! so a reader always gets a complete snapshot (the one before or the one
//! after a refresh).
//!
//! A failed refresh keeps the previous list. A failed initial fetch is
//! returned to the caller, which is expected to terminate the process.

use crate::errors::TidyError;
use crate::metrics::record_zone_refresh;
use crate::tidydns::{TidyDns, Zone};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Shared, immutable snapshot of the zone list.
pub type ZoneSnapshot = Arc<[Zone]>;

/// Maximum number of readers queued on the cache task.
const REQUEST_QUEUE_SIZE: usize = 64;

type ZoneRequest = oneshot::Sender<ZoneSnapshot>;

/// Handle to the zone cache task. Cheap to clone.
///
/// The background task stops once every handle has been dropped.
#[derive(Clone, Debug)]
pub struct ZoneCache {
    requests: mpsc::Sender<ZoneRequest>,
}

impl ZoneCache {
    /// Fetch the zone list and start refreshing it every `refresh_interval`.
    ///
    /// # Errors
    ///
    /// Returns the TidyDNS error if the initial zone listing fails.
    ///
    /// # Panics
    ///
    /// Panics if `refresh_interval` is zero.
    pub async fn start(
        client: Arc<dyn TidyDns>,
        refresh_interval: Duration,
    ) -> Result<Self, TidyError> {
        let zones: ZoneSnapshot = client.list_zones().await?.into();
        record_zone_refresh(true);
        info!(
            zone_count = zones.len(),
            refresh_interval_secs = refresh_interval.as_secs(),
            "Fetched initial TidyDNS zone list"
        );

        let (requests, receiver) = mpsc::channel(REQUEST_QUEUE_SIZE);
        tokio::spawn(run(client, zones, receiver, refresh_interval));

        Ok(Self { requests })
    }

    /// Current zone list.
    ///
    /// Only waits on the cache task, never on TidyDNS, unless a refresh is in
    /// progress.
    pub async fn zones(&self) -> ZoneSnapshot {
        let (reply, response) = oneshot::channel();
        if self.requests.send(reply).await.is_err() {
            error!("Zone cache task is not running");
            return Arc::from(Vec::new());
        }
        response.await.unwrap_or_else(|_| {
            error!("Zone cache task dropped a request");
            Arc::from(Vec::new())
        })
    }
}

async fn run(
    client: Arc<dyn TidyDns>,
    mut zones: ZoneSnapshot,
    mut requests: mpsc::Receiver<ZoneRequest>,
    refresh_interval: Duration,
) {
    let mut ticker = interval_at(Instant::now() + refresh_interval, refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some(reply) = request else {
                    debug!("All zone cache handles dropped, stopping refresh loop");
                    return;
                };
                // The reader may have given up waiting.
                let _ = reply.send(Arc::clone(&zones));
            }
            _ = ticker.tick() => {
                match client.list_zones().await {
                    Ok(fresh) => {
                        record_zone_refresh(true);
                        debug!(zone_count = fresh.len(), "Refreshed TidyDNS zone list");
                        zones = fresh.into();
                    }
                    Err(e) => {
                        record_zone_refresh(false);
                        error!(
                            error = %e,
                            error_kind = e.kind(),
                            zone_count = zones.len(),
                            "Error updating zones, keeping previous zone list"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "zone_cache_tests.rs"]
mod zone_cache_tests;
