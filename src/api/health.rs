//! Health check and API index endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{error::AppResult, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint (the book collection must be readable)
pub async fn readiness_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    state.services.catalog.all().await?;
    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Entry point listing every API version
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "success": true,
        "name": "Restlib",
        "version": env!("CARGO_PKG_VERSION"),
        "versions": {
            "v1": {"constraint": "client-server", "href": "/api/v1/books"},
            "v2": {"constraint": "uniform interface", "href": "/api/v2/books"},
            "v3": {"constraint": "stateless", "href": "/api/v3/auth/login"},
            "v4": {
                "constraint": "cacheable",
                "href": ["/api/v4/cache-control/books", "/api/v4/etag/books"]
            },
            "v5": {"constraint": "client storage", "href": "/api/v5/auth/login/cookie"}
        }
    }))
}
