//! Shared utilities for gateway integration tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Router;
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::Client;
use opsgate::config::{GatewayConfig, StoreConfig};
use opsgate::http::GatewayServer;
use opsgate::routing::{RouteGroup, RouteTable};
use opsgate::store::{ConnectionCache, Connector, StoreError, StoreHandle};

/// A connector that never touches the network. The driver client it hands
/// out only connects on first operation, which these tests never issue.
pub struct MockStore {
    pub reachable: bool,
}

impl Connector for MockStore {
    fn establish<'a>(
        &'a self,
        _config: &'a StoreConfig,
    ) -> Pin<Box<dyn Future<Output = Result<StoreHandle, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            if self.reachable {
                let options = ClientOptions::builder()
                    .hosts(vec![ServerAddress::Tcp {
                        host: "localhost".to_string(),
                        port: Some(27017),
                    }])
                    .build();
                Ok(StoreHandle::new(Client::with_options(options).unwrap()))
            } else {
                Err(StoreError::MissingUri)
            }
        })
    }
}

/// Build a gateway router backed by a mock store, with the given resource
/// route groups mounted.
pub fn build_gateway(
    config: GatewayConfig,
    reachable: bool,
    groups: Vec<RouteGroup>,
) -> (Router, Arc<ConnectionCache>) {
    let store = ConnectionCache::new(
        config.store.clone(),
        Box::new(MockStore { reachable }),
    );

    let mut table = RouteTable::new();
    for group in groups {
        table.mount(group).unwrap();
    }

    let server = GatewayServer::new(config, Arc::clone(&store), table);
    (server.into_router(), store)
}
