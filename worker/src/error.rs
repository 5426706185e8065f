//! Worker error types.
//!
//! Only [`ConfigUnavailable`] ends a run. The per-job errors are collected
//! into [`JobError`] and reported in the run summary.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The list of active jobs could not be read.
#[derive(Debug, Error)]
pub enum ConfigUnavailable {
    #[error("job store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cannot read jobs file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid jobs file {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, timeout: Duration, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                after: timeout,
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid {field} selector {selector:?}: {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("ingest request timed out after {0:?}")]
    Timeout(Duration),

    #[error("ingest service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ingest request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unreadable ingest receipt: {0}")]
    InvalidReceipt(#[source] reqwest::Error),
}

impl TransmissionError {
    pub(crate) fn from_reqwest(timeout: Duration, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(e)
        }
    }
}

/// Why a single job produced nothing for this run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transmission(#[from] TransmissionError),
}
