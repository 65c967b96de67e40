use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::info;

use transquote::api::{create_router, AppState};
use transquote::config::Config;
use transquote::document::QuoteSequence;
use transquote::observability::{init_logging, MetricsRegistry};
use transquote::pricing::{RulesLoader, RulesWatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    init_logging(&config.log_level, config.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting transquote pricing service"
    );

    // Load rules before serving; a malformed rule set stops startup
    let loader = RulesLoader::new(&config.rules_path);
    let watcher = RulesWatcher::new(loader, config.rules_reload_interval());
    let (rules_rx, rules_handle) = watcher.start()?;

    let metrics = Arc::new(MetricsRegistry::new());

    // Count rule set changes published by the watcher
    let reload_handle = {
        let mut rx = rules_rx.clone();
        let metrics = metrics.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                metrics.record_rules_reload();
                let fingerprint = rx.borrow().fingerprint().to_string();
                info!(fingerprint = %fingerprint, "Serving new pricing rules");
            }
        })
    };

    let state = Arc::new(AppState {
        rules_rx,
        metrics,
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        validity_days: config.validity_days,
        document_sequence: QuoteSequence::new(),
    });

    let app = create_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if config.graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    info!("Shutting down...");
    rules_handle.abort();
    reload_handle.abort();

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
