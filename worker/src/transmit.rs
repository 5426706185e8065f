use std::time::Duration;

use async_trait::async_trait;
use pricewatch_common::{Batch, IngestResponse};

use crate::error::TransmissionError;

/// Delivers one job's batch to the ingestion service.
#[async_trait]
pub trait BatchSender: Send + Sync {
    async fn send(&self, batch: &Batch) -> Result<IngestResponse, TransmissionError>;
}

pub struct HttpBatchSender {
    client: reqwest::Client,
    ingest_url: String,
    timeout: Duration,
}

impl HttpBatchSender {
    pub fn new(ingest_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            ingest_url: ingest_url.into(),
            timeout,
        })
    }
}

#[async_trait]
impl BatchSender for HttpBatchSender {
    async fn send(&self, batch: &Batch) -> Result<IngestResponse, TransmissionError> {
        let response = self
            .client
            .post(&self.ingest_url)
            .json(batch)
            .send()
            .await
            .map_err(|e| TransmissionError::from_reqwest(self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransmissionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<IngestResponse>()
            .await
            .map_err(TransmissionError::InvalidReceipt)
    }
}
