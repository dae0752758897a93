//! Process-wide connection caching.
//!
//! # Responsibilities
//! - Hold at most one live document-store session per process
//! - Return the cached handle in O(1) on warm executions
//! - Establish with bounded wait on cold executions
//! - Report connected / disconnected for the health endpoint
//!
//! # Design Decisions
//! - A single-flight mutex collapses concurrent cold-start connects into one
//!   driver handshake; redundant attempts would be harmless but wasteful
//! - `invalidate()` replaces, never partially mutates, so no further locking
//!   is needed around the state itself

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::sync::{Mutex, RwLock};

use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::store::StoreError;

/// One live session to the backing store.
///
/// Cloning is cheap: the driver client is internally pooled and reference
/// counted.
#[derive(Clone)]
pub struct StoreHandle {
    client: Client,
}

impl StoreHandle {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying driver client, for route groups issuing queries.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Connected/disconnected view exposed to the health endpoint.
///
/// Other components never see the handle's full lifecycle, only this query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Connected,
    Disconnected,
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Connected => "connected",
            StoreStatus::Disconnected => "disconnected",
        }
    }
}

/// Lifecycle of the cached session.
enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(StoreHandle),
    Failed,
}

/// Seam over the driver's connect primitive.
///
/// Production uses [`MongoConnector`]; tests substitute a counting fake to
/// assert how many handshakes actually happened.
pub trait Connector: Send + Sync + 'static {
    fn establish<'a>(
        &'a self,
        config: &'a StoreConfig,
    ) -> Pin<Box<dyn Future<Output = Result<StoreHandle, StoreError>> + Send + 'a>>;
}

impl<C: Connector> Connector for Arc<C> {
    fn establish<'a>(
        &'a self,
        config: &'a StoreConfig,
    ) -> Pin<Box<dyn Future<Output = Result<StoreHandle, StoreError>> + Send + 'a>> {
        (**self).establish(config)
    }
}

/// Connects through the official MongoDB driver and verifies the session
/// with an `admin.ping` before handing it out.
pub struct MongoConnector;

impl Connector for MongoConnector {
    fn establish<'a>(
        &'a self,
        config: &'a StoreConfig,
    ) -> Pin<Box<dyn Future<Output = Result<StoreHandle, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            if config.uri.is_empty() {
                return Err(StoreError::MissingUri);
            }

            let mut options = ClientOptions::parse(&config.uri)
                .await
                .map_err(StoreError::InvalidUri)?;
            options.max_pool_size = Some(config.max_pool_size);
            options.connect_timeout = Some(config.connect_timeout());
            options.server_selection_timeout = Some(config.connect_timeout());
            options.max_idle_time = Some(config.idle_timeout());

            let client = Client::with_options(options).map_err(StoreError::InvalidUri)?;

            // The driver connects lazily; a ping forces the handshake so a
            // dead store is discovered here, not inside a route group.
            let admin = client.database("admin");
            let ping = admin.run_command(doc! { "ping": 1 });
            match tokio::time::timeout(config.connect_timeout(), ping).await {
                Ok(Ok(_)) => Ok(StoreHandle::new(client)),
                Ok(Err(e)) => Err(StoreError::Unreachable(e)),
                Err(_) => Err(StoreError::Timeout(config.connect_timeout())),
            }
        })
    }
}

/// The process-singleton connection cache.
///
/// This is the one piece of intentional process-wide mutable state in the
/// gateway. It is owned by [`crate::http::server::AppState`] and handed to
/// request handling explicitly rather than reached as an ambient global, so
/// tests can substitute the connector.
pub struct ConnectionCache {
    config: StoreConfig,
    connector: Box<dyn Connector>,
    state: RwLock<ConnectionState>,
    connect_flight: Mutex<()>,
}

impl ConnectionCache {
    pub fn new(config: StoreConfig, connector: Box<dyn Connector>) -> Arc<Self> {
        Arc::new(Self {
            config,
            connector,
            state: RwLock::new(ConnectionState::Disconnected),
            connect_flight: Mutex::new(()),
        })
    }

    /// Return the cached handle, establishing a session first if none is
    /// live. Warm path takes a read lock and clones the handle; no I/O.
    pub async fn ensure(&self) -> Result<StoreHandle, StoreError> {
        if let ConnectionState::Connected(handle) = &*self.state.read().await {
            return Ok(handle.clone());
        }

        let _flight = self.connect_flight.lock().await;

        // Another caller may have finished connecting while we waited.
        if let ConnectionState::Connected(handle) = &*self.state.read().await {
            return Ok(handle.clone());
        }

        *self.state.write().await = ConnectionState::Connecting;
        metrics::record_store_connect_attempt();
        tracing::debug!("establishing backing store connection");

        match self.connector.establish(&self.config).await {
            Ok(handle) => {
                *self.state.write().await = ConnectionState::Connected(handle.clone());
                metrics::record_store_connected(true);
                tracing::info!("backing store connected");
                Ok(handle)
            }
            Err(err) => {
                // A half-open handle is never cached; the next request
                // triggers a fresh attempt.
                *self.state.write().await = ConnectionState::Failed;
                metrics::record_store_connected(false);
                tracing::error!(error = %err, "backing store connection failed");
                Err(err)
            }
        }
    }

    /// Drop the cached handle so the next `ensure()` reconnects.
    pub async fn invalidate(&self) {
        *self.state.write().await = ConnectionState::Disconnected;
        metrics::record_store_connected(false);
        tracing::warn!("backing store handle invalidated");
    }

    /// Connected/disconnected query for the health endpoint.
    pub async fn status(&self) -> StoreStatus {
        match &*self.state.read().await {
            ConnectionState::Connected(_) => StoreStatus::Connected,
            _ => StoreStatus::Disconnected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::options::ServerAddress;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Builds a driver client without any I/O; the driver only connects on
    /// first operation, which these tests never issue.
    fn offline_handle() -> StoreHandle {
        let options = ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: "localhost".to_string(),
                port: Some(27017),
            }])
            .build();
        StoreHandle::new(Client::with_options(options).unwrap())
    }

    struct CountingConnector {
        attempts: AtomicUsize,
        fail: bool,
    }

    impl CountingConnector {
        fn new(fail: bool) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl Connector for CountingConnector {
        fn establish<'a>(
            &'a self,
            _config: &'a StoreConfig,
        ) -> Pin<Box<dyn Future<Output = Result<StoreHandle, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    Err(StoreError::MissingUri)
                } else {
                    Ok(offline_handle())
                }
            })
        }
    }

    fn cache_with(fail: bool) -> (Arc<ConnectionCache>, Arc<CountingConnector>) {
        let connector = Arc::new(CountingConnector::new(fail));
        let cache = ConnectionCache::new(StoreConfig::default(), Box::new(connector.clone()));
        (cache, connector)
    }

    #[tokio::test]
    async fn ensure_is_idempotent_when_connected() {
        let (cache, connector) = cache_with(false);

        cache.ensure().await.unwrap();
        cache.ensure().await.unwrap();

        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status().await, StoreStatus::Connected);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (cache, connector) = cache_with(true);

        assert!(cache.ensure().await.is_err());
        assert_eq!(cache.status().await, StoreStatus::Disconnected);

        // Next request retries rather than reusing the failure.
        assert!(cache.ensure().await.is_err());
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reconnect() {
        let (cache, connector) = cache_with(false);

        cache.ensure().await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.status().await, StoreStatus::Disconnected);

        cache.ensure().await.unwrap();
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_cold_start_connects_once() {
        let (cache, connector) = cache_with(false);

        let a = cache.clone();
        let b = cache.clone();
        let (ra, rb) = tokio::join!(a.ensure(), b.ensure());
        ra.unwrap();
        rb.unwrap();

        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    }
}
