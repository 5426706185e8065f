//! Price Ingestion Server
//!
//! Accepts scraped batches on POST /ingest and stores priced items in
//! InfluxDB.

use std::sync::Arc;

use anyhow::Context;
use pricewatch_server::config::ServerConfig;
use pricewatch_server::storage::InfluxWriter;
use pricewatch_server::{router, AppState, IngestService};
use tracing::info;

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env();

    let normalizer = config
        .price
        .build()
        .context("invalid PRICE_STRIP_PATTERN")?;
    let writer = InfluxWriter::new(&config.influx).context("failed to build InfluxDB client")?;
    info!(
        url = %config.influx.url,
        bucket = %config.influx.bucket,
        measurement = %config.influx.measurement,
        "time-series writer ready"
    );

    let state = Arc::new(AppState {
        ingest: IngestService::new(normalizer, Arc::new(writer), config.title_max_chars),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("ingestion server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
