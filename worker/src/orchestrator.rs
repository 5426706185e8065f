//! One scrape run over all active jobs.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use pricewatch_common::{Batch, JobSpec};
use tracing::{info, warn};

use crate::error::{ConfigUnavailable, JobError};
use crate::extract;
use crate::fetch::PageFetcher;
use crate::jobs::JobSource;
use crate::transmit::BatchSender;

/// What one successful job did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobOutcome {
    pub items_sent: usize,
    /// As reported by the ingestion service; lower than `items_sent` when
    /// some prices did not normalize.
    pub items_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub jobs_attempted: usize,
    pub jobs_succeeded: usize,
    pub items_sent: usize,
    pub items_written: usize,
    pub failed_jobs: Vec<i64>,
}

impl RunSummary {
    fn record(&mut self, job_id: i64, result: &Result<JobOutcome, JobError>) {
        self.jobs_attempted += 1;
        match result {
            Ok(outcome) => {
                self.jobs_succeeded += 1;
                self.items_sent += outcome.items_sent;
                self.items_written += outcome.items_written;
            }
            Err(_) => self.failed_jobs.push(job_id),
        }
    }
}

pub struct Orchestrator {
    jobs: Arc<dyn JobSource>,
    pages: Arc<dyn PageFetcher>,
    sender: Arc<dyn BatchSender>,
    concurrency: usize,
}

impl Orchestrator {
    pub fn new(
        jobs: Arc<dyn JobSource>,
        pages: Arc<dyn PageFetcher>,
        sender: Arc<dyn BatchSender>,
    ) -> Self {
        Self {
            jobs,
            pages,
            sender,
            concurrency: 1,
        }
    }

    /// Max number of jobs processed at the same time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Runs every active job once.
    ///
    /// Only a job store failure ends the run early; every per-job failure is
    /// logged and counted in the summary.
    pub async fn run(&self) -> Result<RunSummary, ConfigUnavailable> {
        let jobs = self.jobs.list_active().await?;
        info!(count = jobs.len(), "active jobs loaded");

        let results: Vec<(i64, Result<JobOutcome, JobError>)> = stream::iter(&jobs)
            .map(|job| async move { (job.id, self.run_job(job).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = RunSummary::default();
        for (job_id, result) in &results {
            if let Err(e) = result {
                warn!(job_id, error = %e, "job failed");
            }
            summary.record(*job_id, result);
        }
        summary.failed_jobs.sort_unstable();

        Ok(summary)
    }

    async fn run_job(&self, job: &JobSpec) -> Result<JobOutcome, JobError> {
        info!(job_id = job.id, url = %job.target_url, "scraping job");

        let html = self.pages.fetch(&job.target_url).await?;
        let items = extract::extract(&html, job)?;
        info!(job_id = job.id, listings = items.len(), "listings extracted");

        if items.is_empty() {
            return Ok(JobOutcome::default());
        }

        let batch = Batch {
            job_id: job.id,
            items,
        };
        let receipt = self.sender.send(&batch).await?;
        info!(
            job_id = job.id,
            sent = batch.items.len(),
            written = receipt.items_written,
            "batch delivered"
        );

        Ok(JobOutcome {
            items_sent: batch.items.len(),
            items_written: receipt.items_written,
        })
    }
}
