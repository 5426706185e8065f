//! Listing scrape worker.
//!
//! Reads active jobs, fetches each target page, extracts listings with the
//! job's CSS selectors and posts them to the ingestion service.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod jobs;
pub mod orchestrator;
pub mod transmit;

pub use orchestrator::{JobOutcome, Orchestrator, RunSummary};
