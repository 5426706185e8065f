//! Reading active jobs from the configuration store.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use pricewatch_common::JobSpec;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::debug;

use crate::error::ConfigUnavailable;

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Every job currently marked active. Fails as a whole, never partially.
    async fn list_active(&self) -> Result<Vec<JobSpec>, ConfigUnavailable>;
}

// `id` is cast so both serial and bigserial primary keys decode as i64.
const ACTIVE_JOBS_QUERY: &str = "SELECT id::bigint AS id, target_url, \
     css_selector_listing, css_selector_title, css_selector_price, css_selector_url \
     FROM jobs_scrapejob WHERE is_active = TRUE ORDER BY id";

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    target_url: String,
    css_selector_listing: String,
    css_selector_title: String,
    css_selector_price: String,
    css_selector_url: String,
}

impl From<JobRow> for JobSpec {
    fn from(row: JobRow) -> Self {
        JobSpec {
            id: row.id,
            target_url: row.target_url,
            listing_selector: row.css_selector_listing,
            title_selector: row.css_selector_title,
            price_selector: row.css_selector_price,
            url_selector: row.css_selector_url,
        }
    }
}

/// PostgreSQL-backed job store (the admin panel's `jobs_scrapejob` table).
///
/// A pool is opened per call and closed before returning, so no connection
/// outlives the read.
pub struct PgJobSource {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgJobSource {
    pub fn new(options: PgConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            options,
            connect_timeout,
        }
    }
}

#[async_trait]
impl JobSource for PgJobSource {
    async fn list_active(&self) -> Result<Vec<JobSpec>, ConfigUnavailable> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(self.connect_timeout)
            .connect_with(self.options.clone())
            .await?;

        let rows = sqlx::query_as::<_, JobRow>(ACTIVE_JOBS_QUERY)
            .fetch_all(&pool)
            .await;
        pool.close().await;

        let jobs: Vec<JobSpec> = rows?.into_iter().map(JobSpec::from).collect();
        debug!(count = jobs.len(), "active jobs loaded from database");
        Ok(jobs)
    }
}

/// Jobs read from a JSON array of [`JobSpec`] objects, for running the
/// worker without the admin database.
pub struct FileJobSource {
    path: PathBuf,
}

impl FileJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl JobSource for FileJobSource {
    async fn list_active(&self) -> Result<Vec<JobSpec>, ConfigUnavailable> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigUnavailable::File {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| ConfigUnavailable::InvalidFile {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pricewatch-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_row_copied_verbatim() {
        let spec = JobSpec::from(JobRow {
            id: 5,
            target_url: "https://example.com/list?page=1".to_string(),
            css_selector_listing: "div.item".to_string(),
            css_selector_title: "h2 > a".to_string(),
            css_selector_price: ".price".to_string(),
            css_selector_url: "a.detail".to_string(),
        });

        assert_eq!(spec.id, 5);
        assert_eq!(spec.target_url, "https://example.com/list?page=1");
        assert_eq!(spec.listing_selector, "div.item");
        assert_eq!(spec.title_selector, "h2 > a");
        assert_eq!(spec.price_selector, ".price");
        assert_eq!(spec.url_selector, "a.detail");
    }

    #[tokio::test]
    async fn test_file_source_reads_jobs() {
        let path = temp_path("jobs");
        std::fs::write(
            &path,
            r#"[{"id": 1, "target_url": "https://example.com", "listing_selector": "li",
                 "title_selector": "h2", "price_selector": ".p", "url_selector": "a"}]"#,
        )
        .unwrap();

        let jobs = FileJobSource::new(&path).list_active().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].listing_selector, "li");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let err = FileJobSource::new(temp_path("missing"))
            .list_active()
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigUnavailable::File { .. }));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[{\"id\": \"one\"}]").unwrap();

        let err = FileJobSource::new(&path).list_active().await.unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigUnavailable::InvalidFile { .. }));
    }
}
