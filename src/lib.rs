//! Hospital operations record gateway library.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod security;
pub mod store;

pub use config::GatewayConfig;
pub use http::{ApiError, AppState, GatewayServer};
pub use routing::{RouteGroup, RouteTable, RESOURCE_PREFIXES};
pub use store::{ConnectionCache, Connector, MongoConnector, StoreError};
