//! Request ID middleware.
//!
//! # Design Decisions
//! - An incoming `x-request-id` is preserved; otherwise a UUID v4 is minted
//! - Added as early as possible so every later log line can carry it
//! - Mirrored on the response for client-side correlation

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let header_name = HeaderName::from_static(X_REQUEST_ID);

    let id = match req.headers().get(&header_name) {
        Some(existing) => existing.clone(),
        None => {
            // UUID text is always a valid header value.
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        }
    };

    req.extensions_mut().insert(id.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(header_name, id);
    response
}
