//! HTTP surface of the ingestion service.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use pricewatch_common::{Batch, HealthResponse, IngestResponse};

use crate::error::IngestError;
use crate::ingest::IngestService;

/// Shared application state
pub struct AppState {
    pub ingest: IngestService,
}

/// Handler for GET / (liveness)
async fn root_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Handler for POST /ingest
async fn ingest_handler(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Batch>,
) -> Result<Json<IngestResponse>, IngestError> {
    let outcome = state.ingest.ingest(&batch).await?;

    Ok(Json(IngestResponse {
        status: "success".to_string(),
        job_id: batch.job_id,
        items_received: outcome.items_received,
        items_written: outcome.items_written,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/ingest", post(ingest_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::ingest::tests::{FailingWriter, RecordingWriter};
    use crate::price::PriceNormalizer;
    use crate::storage::PointWriter;

    fn app(writer: Arc<dyn PointWriter>) -> Router {
        router(Arc::new(AppState {
            ingest: IngestService::new(PriceNormalizer::default(), writer, 255),
        }))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_ingest(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ingest")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_reports_ok() {
        let response = app(Arc::new(RecordingWriter::default()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_ingest_reports_counts() {
        let writer = Arc::new(RecordingWriter::default());
        let body = json!({
            "job_id": 12,
            "items": [
                { "title": "Kolo", "price": "4 500 Kč", "url": "/inzerat/1" },
                { "title": "Rám", "price": "Dohodou", "url": "/inzerat/2" }
            ]
        });

        let response = app(writer.clone()).oneshot(post_ingest(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "status": "success", "job_id": 12, "items_received": 2, "items_written": 1 })
        );
        assert_eq!(writer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_storage_down_is_server_error() {
        let body = json!({
            "job_id": 1,
            "items": [{ "title": "a", "price": "10", "url": "/a" }]
        });

        let response = app(Arc::new(FailingWriter)).oneshot(post_ingest(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let detail = body_json(response).await;
        assert!(detail["detail"].as_str().unwrap().contains("storage unavailable"));
    }

    #[tokio::test]
    async fn test_ingest_rejects_malformed_body() {
        let response = app(Arc::new(RecordingWriter::default()))
            .oneshot(post_ingest(json!({ "job_id": "seven" })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
