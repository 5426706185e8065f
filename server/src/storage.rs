//! Time-series storage writes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

use crate::config::InfluxConfig;
use crate::point::{encode_lines, NormalizedPoint};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage rejected write with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Appends points to the time-series store. One call is all-or-nothing.
#[async_trait]
pub trait PointWriter: Send + Sync {
    async fn write(&self, points: &[NormalizedPoint]) -> Result<(), StorageError>;
}

/// Writes through the InfluxDB v2 HTTP write API.
pub struct InfluxWriter {
    client: reqwest::Client,
    write_url: String,
    org: String,
    bucket: String,
    token: Option<String>,
    measurement: String,
}

impl InfluxWriter {
    pub fn new(config: &InfluxConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            write_url: format!("{}/api/v2/write", config.url.trim_end_matches('/')),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
            token: config.token.clone(),
            measurement: config.measurement.clone(),
        })
    }
}

#[async_trait]
impl PointWriter for InfluxWriter {
    async fn write(&self, points: &[NormalizedPoint]) -> Result<(), StorageError> {
        let body = encode_lines(&self.measurement, points);

        let mut request = self
            .client
            .post(&self.write_url)
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(points = points.len(), bucket = %self.bucket, "points written");
        Ok(())
    }
}
