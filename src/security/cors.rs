//! Cross-origin policy.
//!
//! # Responsibilities
//! - Reflect the requesting origin as allowed, with credentials
//! - Restrict methods to the fixed gateway set
//! - Answer every OPTIONS request immediately, before any later stage

use axum::{
    extract::Request,
    http::{header, HeaderName, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// The CORS layer: origin is mirrored (required when credentials are
/// allowed; a wildcard with credentials is rejected by browsers), methods
/// and headers are a fixed set.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Terminates any OPTIONS request that the CORS layer did not already
/// answer (bare OPTIONS without preflight headers). Runs just inside the
/// CORS layer so the response still carries the negotiated headers; nothing
/// later in the pipeline ever sees an OPTIONS request.
pub async fn preflight_short_circuit(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(req).await
}
