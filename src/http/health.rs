//! Health endpoint.
//!
//! Bypasses the connection gate: a store outage is reported as
//! `backingStoreStatus: "disconnected"` with a 200, never a 500.

use std::time::SystemTime;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// ISO-8601 / RFC 3339.
    pub timestamp: String,
    pub environment: String,
    #[serde(rename = "backingStoreStatus")]
    pub backing_store_status: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_status = state.store.status().await;

    Json(HealthResponse {
        status: "success".to_string(),
        message: "Hospital operations gateway is running".to_string(),
        timestamp: humantime::format_rfc3339_millis(SystemTime::now()).to_string(),
        environment: state.config.environment.as_str().to_string(),
        backing_store_status: store_status.as_str().to_string(),
    })
}
