//! Connection-gate middleware.
//!
//! # Responsibilities
//! - Guarantee a live backing-store session before any resource handler runs
//! - Short-circuit with the uniform failure envelope when no session can be
//!   established; raw detail only in development mode
//!
//! The gate wraps every resource route and the `/api` fallback. The health
//! endpoint deliberately bypasses it so the probe can report "store down,
//! gateway up" (see DESIGN.md).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::http::server::AppState;

pub async fn connection_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match state.store.ensure().await {
        Ok(_) => next.run(req).await,
        Err(err) => {
            tracing::error!(
                path = %req.uri().path(),
                error = %err,
                "refusing request: no backing store session"
            );
            let mut failure = ApiError::store_unavailable();
            if state.config.expose_error_detail() {
                failure = failure.with_detail(err.to_string());
            }
            failure.into_response()
        }
    }
}
