//! # Devis Store Server
//!
//! JSON key-value store holding the quoting data, one SQLite row per section.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Server                                     │
//! │                                                                         │
//! │  QuoteSession ───► HTTP (8787) ───► request log ───► CORS               │
//! │  (devis-sync)                                           │               │
//! │                                                         ▼               │
//! │                                                      routes             │
//! │                                                         │               │
//! │                                                         ▼               │
//! │                                              devis-db StoreRepository   │
//! │                                                         │               │
//! │                                                         ▼               │
//! │                                                   SQLite kv_store       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write replaces a whole section. Concurrent writers to the same
//! section: last write wins.
//!
//! Browsers may call the store from any origin. Preflights are answered by
//! the CORS layer and cached for ten minutes.

pub mod config;
pub mod error;
pub mod routes;

use std::future::Future;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::{header, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use devis_db::Database;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorCode};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the router with every route, CORS and the request log.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/data", get(routes::get_data))
        .route("/initialize", post(routes::initialize))
        .route("/{section}", put(routes::put_section))
        .layer(cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Any origin, JSON and bearer headers.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(600))
}

/// Serves the router on `listener` until `shutdown` completes.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Store server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Logs method, path, status and latency of every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
