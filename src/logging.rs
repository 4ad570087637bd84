// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Logging setup.
//!
//! Output carries file and line numbers and thread names, either as compact
//! text or as JSON. `RUST_LOG`, when set, takes precedence over the
//! configured level so individual modules can be tuned.

use crate::errors::ConfigError;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Parse a log level name.
///
/// Accepts the tracing level names plus the aliases External-DNS
/// deployments commonly use (`warning`, `err`, `fatal`, `panic`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLogLevel`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "err" | "fatal" | "panic" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}

/// Install the global tracing subscriber.
///
/// An unknown `level` is reported once logging is up, and `info` is used.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging(level: &str, format: LogFormat) {
    let (level_filter, level_error) = match parse_level(level) {
        Ok(filter) => (filter, None),
        Err(e) => (LevelFilter::INFO, Some(e)),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_filter.to_string()));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    if let Some(e) = level_error {
        error!(error = %e, "Falling back to log level info");
    }
    debug!(level = %level_filter, format = ?format, "Logging initialized");
}
