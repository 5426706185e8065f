//! Types shared by the scrape worker and the ingestion server.

use serde::{Deserialize, Serialize};

pub mod config;

/// Marker stored in a record field when its selector matched nothing.
pub const NOT_AVAILABLE: &str = "N/A";

/// One active scrape job as read from the configuration store.
///
/// The title, price and url selectors are relative to a single listing
/// container matched by `listing_selector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: i64,
    pub target_url: String,
    pub listing_selector: String,
    pub title_selector: String,
    pub price_selector: String,
    pub url_selector: String,
}

/// One scraped listing, as extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: String,
    pub price: String,
    pub url: String,
}

/// All records extracted for one job in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub job_id: i64,
    pub items: Vec<RawRecord>,
}

/// Body returned by `POST /ingest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub job_id: i64,
    pub items_received: usize,
    pub items_written: usize,
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
