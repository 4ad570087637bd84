// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command line and environment configuration.
//!
//! Every option can be given as a flag; the ones External-DNS deployments
//! traditionally set through the environment also read their variable.
//! TidyDNS credentials are only taken from `TIDYDNS_USER` and `TIDYDNS_PASS`
//! in practice, and their values are never printed in `--help`.

use crate::constants::{
    DEFAULT_EXPOSED_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_TIDY_TIMEOUT,
    DEFAULT_WEBHOOK_ADDRESS, DEFAULT_ZONE_UPDATE_INTERVAL,
};
use crate::errors::ConfigError;
use crate::logging::LogFormat;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// External-DNS webhook provider for TidyDNS
#[derive(Parser, Debug, Clone)]
#[command(name = "tidydns-webhook", version)]
pub struct Config {
    /// TidyDNS server address, e.g. `https://tidy.example.net`
    #[arg(long, env = "TIDYDNS_ENDPOINT")]
    pub tidydns_endpoint: String,

    /// TidyDNS user name
    #[arg(long, env = "TIDYDNS_USER", default_value = "", hide_env_values = true)]
    pub tidydns_user: String,

    /// TidyDNS password
    #[arg(long, env = "TIDYDNS_PASS", default_value = "", hide_env_values = true)]
    pub tidydns_pass: String,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "EXTERNAL_DNS_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Log output format
    #[arg(
        long,
        env = "RUST_LOG_FORMAT",
        value_enum,
        ignore_case = true,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Interval at which to update zone information, format 00h00m00s e.g. 1h32m
    #[arg(long, default_value = DEFAULT_ZONE_UPDATE_INTERVAL, value_parser = parse_interval)]
    pub zone_update_interval: Duration,

    /// Timeout of a single request to TidyDNS
    #[arg(long, default_value = DEFAULT_TIDY_TIMEOUT, value_parser = parse_interval)]
    pub tidydns_timeout: Duration,

    /// Address of the webhook External-DNS talks to
    #[arg(long, default_value = DEFAULT_WEBHOOK_ADDRESS)]
    pub webhook_address: SocketAddr,

    /// Address serving `/healthz` and `/metrics`
    #[arg(long, default_value = DEFAULT_EXPOSED_ADDRESS)]
    pub exposed_address: SocketAddr,
}

/// Parse a duration such as `1h32m10s`, `90s`, `1.5h` or `250ms`.
///
/// A sequence of decimal numbers, each followed by one of the units `ns`,
/// `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is also accepted.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] for anything else.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tidydns_webhook::config::parse_duration;
///
/// assert_eq!(parse_duration("1h32m10s").unwrap(), Duration::from_secs(5530));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let input = value.trim();
    if input.is_empty() {
        return Err(invalid("empty duration"));
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos = 0f64;
    let mut rest = input;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid("expected a number"));
        }
        let (number, tail) = rest.split_at(number_len);
        let amount: f64 = number.parse().map_err(|_| invalid("malformed number"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let unit_nanos = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(invalid("missing unit")),
            other => return Err(invalid(&format!("unknown unit '{other}'"))),
        };

        total_nanos += amount * unit_nanos;
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid("duration out of range"));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

/// Parse a duration that must be greater than zero.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] if the value does not parse or
/// is zero.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let duration = parse_duration(value)?;
    if duration.is_zero() {
        return Err(ConfigError::InvalidDuration {
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(duration)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
