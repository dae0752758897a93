//! Route table assembly.
//!
//! # Responsibilities
//! - Hold the (prefix, route group) entries, checked for shape and
//!   uniqueness at mount time
//! - Assemble the `/api` router: inline health, nested groups behind the
//!   connection gate, uniform 404 fallback

use axum::{
    extract::OriginalUri,
    middleware,
    routing::get,
    Router,
};
use thiserror::Error;

use crate::http::error::ApiError;
use crate::http::health::health;
use crate::http::server::AppState;
use crate::security::connection_gate::connection_gate;

/// One externally-owned resource router and the prefix it answers under.
pub struct RouteGroup {
    prefix: String,
    router: Router<AppState>,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>, router: Router<AppState>) -> Self {
        Self {
            prefix: prefix.into(),
            router,
        }
    }

    /// A group with no handlers yet: every request under the prefix falls
    /// through to the uniform 404 envelope. Used by the binary until the
    /// resource crates replace it.
    pub fn placeholder(prefix: impl Into<String>) -> Self {
        Self::new(prefix, Router::new().fallback(api_not_found))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Why a mount was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route prefix {0:?}")]
    DuplicatePrefix(String),

    #[error("invalid route prefix {0:?}: must start with '/' and not end with one")]
    InvalidPrefix(String),
}

/// The static prefix table. Immutable once handed to the server.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteGroup>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with a placeholder group per prefix.
    pub fn with_placeholders(prefixes: &[&str]) -> Result<Self, RouteTableError> {
        let mut table = Self::new();
        for prefix in prefixes {
            table.mount(RouteGroup::placeholder(*prefix))?;
        }
        Ok(table)
    }

    /// Add a route group. Rejects malformed and duplicate prefixes; the
    /// table would otherwise panic deep inside router assembly instead of
    /// failing at startup with a nameable cause.
    pub fn mount(&mut self, group: RouteGroup) -> Result<(), RouteTableError> {
        let prefix = group.prefix();
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            return Err(RouteTableError::InvalidPrefix(prefix.to_string()));
        }
        if self.entries.iter().any(|e| e.prefix == prefix) {
            return Err(RouteTableError::DuplicatePrefix(prefix.to_string()));
        }
        self.entries.push(group);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the `/api` router. Resource groups and the fallback sit behind
    /// the connection gate; `/health` does not.
    pub(crate) fn into_api_router(self, state: AppState) -> Router<AppState> {
        let mut resources = Router::new();
        for group in self.entries {
            resources = resources.nest(&group.prefix, group.router);
        }
        let resources = resources
            .fallback(api_not_found)
            .layer(middleware::from_fn_with_state(state, connection_gate));

        Router::new().route("/health", get(health)).merge(resources)
    }
}

/// The catch-all responder for unmatched `/api` paths.
async fn api_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::route_not_found(uri.path())
}
