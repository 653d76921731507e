//! # Route Handlers
//!
//! ```text
//! GET  /health      → {"status":"ok"}        (503 when SQLite stops answering)
//! GET  /data        → all six sections, missing ones as []
//! PUT  /{section}   ← {"<section>": [...]}   → {"success":true}
//! POST /initialize  ← StoreData              → {"success":true,"initialized":bool}
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
use tracing::{debug, info, warn};

use devis_core::wire::{HealthResponse, InitializeResponse, SuccessResponse};
use devis_core::{Section, SectionPayload, StoreData};

use crate::error::ApiError;
use crate::AppState;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(HealthResponse::ok()))
    } else {
        warn!("Health check failed: database not answering");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable".to_string(),
            }),
        )
    }
}

/// Returns every section.
pub async fn get_data(State(state): State<AppState>) -> Result<Json<StoreData>, ApiError> {
    let data = state
        .db
        .store()
        .load_all()
        .await
        .map_err(|e| ApiError::database("Failed to fetch data", e))?;

    debug!(
        papers = data.catalog.papers.len(),
        quotes = data.quotes.len(),
        "Data served"
    );
    Ok(Json(data))
}

/// Replaces one section with the array found under its name in the body.
pub async fn put_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let context = format!("Failed to update {}", name);

    let section: Section = name
        .parse()
        .map_err(|e: devis_core::CoreError| ApiError::not_found(&context, e.to_string()))?;

    let Json(mut body) = body.map_err(|e| ApiError::validation(&context, e.body_text()))?;

    let value = body
        .get_mut(section.name())
        .map(Value::take)
        .ok_or_else(|| {
            ApiError::validation(&context, format!("body must contain '{}'", section.name()))
        })?;

    let payload = SectionPayload::from_json(section, value)
        .map_err(|e| ApiError::validation(&context, e.to_string()))?;

    state
        .db
        .store()
        .replace_section(&payload)
        .await
        .map_err(|e| ApiError::database(&context, e))?;

    info!(section = %section, records = payload.len(), "Section replaced");
    Ok(Json(SuccessResponse { success: true }))
}

/// Writes the supplied data if the store holds no paper.
pub async fn initialize(
    State(state): State<AppState>,
    body: Result<Json<StoreData>, JsonRejection>,
) -> Result<Json<InitializeResponse>, ApiError> {
    const CONTEXT: &str = "Failed to initialize data";

    let Json(data) = body.map_err(|e| ApiError::validation(CONTEXT, e.body_text()))?;

    let written = state
        .db
        .store()
        .initialize(data)
        .await
        .map_err(|e| ApiError::database(CONTEXT, e))?;

    if written {
        info!("Store initialized");
        Ok(Json(InitializeResponse::written()))
    } else {
        debug!("Initialize skipped: data already exists");
        Ok(Json(InitializeResponse::already_exists()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{build_router, AppState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use devis_core::seed;
    use devis_db::{Database, DbConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> (Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (build_router(AppState::new(db.clone())), db)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _db) = test_app().await;
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_health_reports_closed_database() {
        let (app, db) = test_app().await;
        db.close().await;

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (app, _db) = test_app().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/quotes")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "PUT")
            .header("access-control-request-headers", "content-type,authorization")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-max-age"], "600");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("PUT"));
    }

    #[tokio::test]
    async fn test_cors_header_on_response() {
        let (app, _db) = test_app().await;
        let request = Request::builder()
            .uri("/data")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_empty_store_serves_empty_sections() {
        let (app, _db) = test_app().await;
        let (status, body) = send(&app, get("/data")).await;

        assert_eq!(status, StatusCode::OK);
        for key in ["papers", "finishes", "machines", "labor", "marginRules", "quotes"] {
            assert_eq!(body[key], json!([]), "section {}", key);
        }
    }

    #[tokio::test]
    async fn test_put_then_get_section() {
        let (app, _db) = test_app().await;
        let papers = serde_json::to_value(seed::default_catalog().papers).unwrap();

        let (status, body) =
            send(&app, json_request("PUT", "/papers", json!({ "papers": papers }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, data) = send(&app, get("/data")).await;
        assert_eq!(data["papers"], papers);
        assert_eq!(data["machines"], json!([]));
    }

    #[tokio::test]
    async fn test_put_unknown_section() {
        let (app, _db) = test_app().await;
        let (status, body) =
            send(&app, json_request("PUT", "/inks", json!({ "inks": [] }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Failed to update inks");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_put_without_section_key() {
        let (app, _db) = test_app().await;
        let (status, body) =
            send(&app, json_request("PUT", "/labor", json!({ "papers": [] }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to update labor");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_put_wrong_record_shape() {
        let (app, _db) = test_app().await;
        let (status, _) = send(
            &app,
            json_request("PUT", "/machines", json!({ "machines": [{ "id": 1 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_malformed_json() {
        let (app, _db) = test_app().await;
        let request = Request::builder()
            .method("PUT")
            .uri("/quotes")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to update quotes");
    }

    #[tokio::test]
    async fn test_initialize_once() {
        let (app, _db) = test_app().await;
        let seed_body = serde_json::to_value(seed::default_store_data()).unwrap();

        let (status, body) =
            send(&app, json_request("POST", "/initialize", seed_body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "initialized": true}));

        let (_, body) = send(&app, json_request("POST", "/initialize", json!({}))).await;
        assert_eq!(
            body,
            json!({"success": true, "initialized": false, "message": "Data already exists"})
        );

        let (_, data) = send(&app, get("/data")).await;
        assert_eq!(data, seed_body);
    }

    #[tokio::test]
    async fn test_store_failure_answers_500() {
        let (app, db) = test_app().await;
        db.close().await;

        let (status, body) = send(&app, get("/data")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data");
        assert_eq!(body["code"], "DATABASE_ERROR");
    }
}
