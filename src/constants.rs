// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the TidyDNS webhook.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// TidyDNS Constants
// ============================================================================

/// Lowest TTL TidyDNS accepts, apart from `0` which means "zone default"
pub const MIN_RECORD_TTL_SECS: i64 = 300;

/// Record name TidyDNS uses for the zone apex
pub const APEX_RECORD_NAME: &str = ".";

/// Zone ID returned when a DNS name cannot be mapped to any known zone
pub const UNKNOWN_ZONE_ID: &str = "0";

/// Record type name for CNAME records
pub const RECORD_TYPE_CNAME: &str = "CNAME";

/// Prefix TidyDNS puts in front of every API path
pub const TIDY_API_PREFIX: &str = "/=";

/// Default timeout for a single request to TidyDNS
pub const DEFAULT_TIDY_TIMEOUT: &str = "10s";

/// Default interval between zone list refreshes (10 minutes)
pub const DEFAULT_ZONE_UPDATE_INTERVAL: &str = "10m";

// ============================================================================
// Webhook Constants
// ============================================================================

/// Content type negotiated with External-DNS
pub const WEBHOOK_MEDIA_TYPE: &str = "application/external.dns.webhook+json;version=1";

/// Address the External-DNS facing webhook listens on
pub const DEFAULT_WEBHOOK_ADDRESS: &str = "127.0.0.1:8888";

/// Address the health and metrics endpoints listen on
pub const DEFAULT_EXPOSED_ADDRESS: &str = "0.0.0.0:8080";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of Tokio worker threads
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Name given to Tokio worker threads
pub const TOKIO_THREAD_NAME: &str = "tidydns-webhook";

/// Default log level when neither flag nor environment sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";
