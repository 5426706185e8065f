//! Price ingestion service.
//!
//! Receives scraped batches from the worker, normalizes prices and writes
//! the priced records to InfluxDB as time-series points.

pub mod config;
pub mod error;
pub mod ingest;
pub mod point;
pub mod price;
pub mod router;
pub mod storage;

pub use ingest::{IngestOutcome, IngestService};
pub use router::{router, AppState};
