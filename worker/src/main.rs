//! Listing Scrape Worker
//!
//! Runs every active scrape job once and sends the results to the
//! ingestion API. Scheduling is left to whatever starts the process.

use std::sync::Arc;

use anyhow::Context;
use pricewatch_worker::config::WorkerConfig;
use pricewatch_worker::fetch::HttpPageFetcher;
use pricewatch_worker::jobs::{FileJobSource, JobSource, PgJobSource};
use pricewatch_worker::transmit::HttpBatchSender;
use pricewatch_worker::Orchestrator;
use tracing::{info, warn};

fn build_orchestrator(config: &WorkerConfig) -> anyhow::Result<Orchestrator> {
    let jobs: Arc<dyn JobSource> = match &config.jobs_file {
        Some(path) => {
            info!("reading jobs from {}", path.display());
            Arc::new(FileJobSource::new(path))
        }
        None => {
            let options = config
                .database
                .connect_options()
                .context("invalid database settings")?;
            Arc::new(PgJobSource::new(options, config.database.connect_timeout))
        }
    };

    let pages = HttpPageFetcher::new(&config.user_agent, config.fetch_timeout)
        .context("failed to build page client")?;
    let sender = HttpBatchSender::new(&config.ingest_url, config.send_timeout)
        .context("failed to build ingest client")?;

    Ok(Orchestrator::new(jobs, Arc::new(pages), Arc::new(sender))
        .with_concurrency(config.concurrency))
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

    let config = WorkerConfig::from_env();
    info!(
        ingest_url = %config.ingest_url,
        concurrency = config.concurrency,
        "worker starting"
    );

    let orchestrator = build_orchestrator(&config)?;
    let summary = orchestrator
        .run()
        .await
        .context("could not load active jobs")?;

    if !summary.failed_jobs.is_empty() {
        warn!(failed = ?summary.failed_jobs, "some jobs failed");
    }
    info!(
        attempted = summary.jobs_attempted,
        succeeded = summary.jobs_succeeded,
        items_sent = summary.items_sent,
        items_written = summary.items_written,
        "worker run finished"
    );
    Ok(())
}
