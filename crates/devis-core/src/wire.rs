//! # Store Service Wire Types
//!
//! JSON bodies exchanged with the store service, shared by the axum server
//! and the HTTP client.
//!
//! ```text
//! GET  /health      → HealthResponse       {"status":"ok"}
//! GET  /data        → StoreData            {"papers":[...], ..., "quotes":[...]}
//! PUT  /{section}   → SuccessResponse      {"success":true}
//! POST /initialize  → InitializeResponse   {"success":true,"initialized":false,"message":"..."}
//! any failure       → ErrorBody            {"error":"...","details":"...","code":"..."}
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        HealthResponse {
            status: "ok".to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Body of a successful section write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Body of `POST /initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InitializeResponse {
    pub success: bool,

    /// Whether the supplied data was written.
    pub initialized: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InitializeResponse {
    pub fn written() -> Self {
        InitializeResponse {
            success: true,
            initialized: true,
            message: None,
        }
    }

    pub fn already_exists() -> Self {
        InitializeResponse {
            success: true,
            initialized: false,
            message: Some("Data already exists".to_string()),
        }
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default)]
    pub details: String,

    /// Machine-readable error code, e.g. `STORE_UNAVAILABLE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
