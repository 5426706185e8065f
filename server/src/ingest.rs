//! Batch -> normalized points -> one storage write.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use pricewatch_common::{Batch, RawRecord};
use tracing::{debug, error, info};

use crate::error::IngestError;
use crate::point::NormalizedPoint;
use crate::price::PriceNormalizer;
use crate::storage::PointWriter;

/// Counts reported back to the worker for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub items_received: usize,
    pub items_written: usize,
}

pub struct IngestService {
    normalizer: PriceNormalizer,
    writer: Arc<dyn PointWriter>,
    title_max_chars: usize,
}

impl IngestService {
    pub fn new(
        normalizer: PriceNormalizer,
        writer: Arc<dyn PointWriter>,
        title_max_chars: usize,
    ) -> Self {
        Self {
            normalizer,
            writer,
            title_max_chars,
        }
    }

    /// Normalizes every record and writes the survivors in a single call.
    ///
    /// Records whose price does not normalize are dropped; the gap between
    /// received and written makes the drops visible to the caller.
    pub async fn ingest(&self, batch: &Batch) -> Result<IngestOutcome, IngestError> {
        info!(job_id = batch.job_id, items = batch.items.len(), "batch received");
        for item in batch.items.iter().take(3) {
            debug!(
                job_id = batch.job_id,
                title = %item.title,
                price = %item.price,
                "sample item"
            );
        }

        // Points sharing a series key and timestamp overwrite each other in
        // storage, so each point in the batch gets its own nanosecond.
        let written_at = Utc::now();
        let points: Vec<NormalizedPoint> = batch
            .items
            .iter()
            .filter_map(|item| {
                let price = self.normalizer.normalize(&item.price)?;
                Some((item, price))
            })
            .enumerate()
            .map(|(i, (item, price))| {
                let timestamp = written_at + Duration::nanoseconds(i as i64);
                self.to_point(batch.job_id, item, price, timestamp)
            })
            .collect();

        let outcome = IngestOutcome {
            items_received: batch.items.len(),
            items_written: points.len(),
        };

        if points.is_empty() {
            info!(job_id = batch.job_id, "no priced items, skipping write");
            return Ok(outcome);
        }

        if let Err(e) = self.writer.write(&points).await {
            error!(job_id = batch.job_id, error = %e, "storage write failed");
            return Err(e.into());
        }

        info!(
            job_id = batch.job_id,
            received = outcome.items_received,
            written = outcome.items_written,
            "batch stored"
        );
        Ok(outcome)
    }

    fn to_point(
        &self,
        job_id: i64,
        item: &RawRecord,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> NormalizedPoint {
        NormalizedPoint {
            job_id,
            title: truncate_chars(&item.title, self.title_max_chars),
            url: item.url.clone(),
            price,
            timestamp,
        }
    }
}

/// Cuts `value` to at most `max` characters, on a char boundary.
fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
