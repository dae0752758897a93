//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the security pipeline in its fixed order
//! - Wire up middleware (tracing, request ID, metrics)
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! # Pipeline order (outermost first)
//! ```text
//! trace → metrics → request id → CORS (+ preflight short-circuit)
//!     → hardening headers → body cap → sanitize → pollution guard
//!     → compression → /api router (gate → route group)
//! ```
//! Each stage assumes the outputs of the previous one; the order is encoded
//! here and nowhere else.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request_id::request_id;
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::security::cors::{cors_layer, preflight_short_circuit};
use crate::security::headers::hardening_headers;
use crate::security::pollution::pollution_guard;
use crate::security::sanitize::sanitize_request;
use crate::store::ConnectionCache;

/// Application state injected into middleware and handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConnectionCache>,
    pub config: Arc<GatewayConfig>,
}

/// The gateway HTTP server.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server from validated configuration, the process's
    /// connection cache, and the assembled route table.
    pub fn new(config: GatewayConfig, store: Arc<ConnectionCache>, table: RouteTable) -> Self {
        let state = AppState {
            store,
            config: Arc::new(config.clone()),
        };
        let router = Self::build_router(&config, state, table);
        Self { router, config }
    }

    /// Build the full router. Layers listed first run closest to the
    /// routes; the request passes through them in the reverse order.
    fn build_router(config: &GatewayConfig, state: AppState, table: RouteTable) -> Router {
        let api = table.into_api_router(state.clone());

        Router::new()
            .nest("/api", api)
            .with_state(state.clone())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn_with_state(
                state.clone(),
                pollution_guard,
            ))
            .layer(middleware::from_fn_with_state(state, sanitize_request))
            .layer(DefaultBodyLimit::max(config.limits.body_cap_bytes))
            .layer(middleware::from_fn(hardening_headers))
            .layer(middleware::from_fn(preflight_short_circuit))
            .layer(cors_layer())
            .layer(middleware::from_fn(request_id))
            .layer(middleware::from_fn(track_requests))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, for driving the gateway in-process (tests).
    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = self.config.environment.as_str(),
            "Gateway HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway HTTP server stopped");
        Ok(())
    }
}

/// Per-request metrics, recorded after the response is built.
async fn track_requests(req: Request, next: axum::middleware::Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let response = next.run(req).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
