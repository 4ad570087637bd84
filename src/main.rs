// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tidydns_webhook::{
    config::Config,
    constants::{TOKIO_THREAD_NAME, TOKIO_WORKER_THREADS},
    logging::init_logging,
    provider::TidyProvider,
    tidydns::{TidyDns, TidyDnsClient},
    webhook::{exposed_router, serve, webhook_router},
    zone_cache::ZoneCache,
};
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let config = Config::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name(TOKIO_THREAD_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<()> {
    init_logging(&config.log_level, config.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        tidydns_endpoint = %config.tidydns_endpoint,
        "Starting TidyDNS webhook"
    );

    let client: Arc<dyn TidyDns> = Arc::new(TidyDnsClient::new(
        &config.tidydns_endpoint,
        &config.tidydns_user,
        &config.tidydns_pass,
        config.tidydns_timeout,
    )?);
    debug!("TidyDNS client created");

    // Nothing works without a zone list, so a failed first fetch is fatal.
    let zones = match ZoneCache::start(client.clone(), config.zone_update_interval).await {
        Ok(zones) => zones,
        Err(e) => {
            error!(
                error = %e,
                error_kind = e.kind(),
                "CRITICAL: Failed to fetch initial zone list from TidyDNS"
            );
            std::process::exit(1);
        }
    };

    let provider = Arc::new(TidyProvider::new(client, zones));

    info!(
        webhook_address = %config.webhook_address,
        exposed_address = %config.exposed_address,
        "Starting HTTP servers"
    );

    // Servers should never exit - if one fails, we log it and exit the main process
    tokio::select! {
        result = serve("webhook", config.webhook_address, webhook_router(provider)) => {
            error!("CRITICAL: Webhook server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Webhook server exited unexpectedly without error")
        }
        result = serve("exposed", config.exposed_address, exposed_router()) => {
            error!("CRITICAL: Exposed server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Exposed server exited unexpectedly without error")
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received, stopping");
            Ok(())
        }
    }
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
