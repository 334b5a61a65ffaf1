//! Startup orchestration and ordered shutdown.
//!
//! # Responsibilities
//! - Validate configuration
//! - Connect to the store with bounded retries
//! - Bind the listener and begin accepting traffic
//! - On close: stop accepting, drain, optionally wipe, release the store
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and nothing is served
//! - Listener binds last (traffic only when the store is ready)
//! - Shutdown errors are logged, never propagated

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::validation::validate_config;
use crate::config::{BoardConfig, ConfigError, StoreBackend};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::state::{InvalidTransition, LifecycleState, StateCell};
use crate::messages::MessageGateway;
use crate::resilience::retries::{retry, RetryError};
use crate::store::{InMemoryMessageStore, MessageStore, MongoMessageStore, StoreError, StoreResult};

/// Fatal errors before the application reaches `Serving`.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connect(#[from] RetryError<StoreError>),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lifecycle(#[from] InvalidTransition),
}

/// A running message board: store connection, gateway and HTTP server.
pub struct Application {
    state: StateCell,
    store: Arc<dyn MessageStore>,
    gateway: MessageGateway,
    shutdown: Shutdown,
    server: Mutex<Option<JoinHandle<Result<(), std::io::Error>>>>,
    local_addr: SocketAddr,
    wipe_on_close: bool,
    drain_timeout: Duration,
}

impl Application {
    /// Start with the backend named in `config.store.backend`.
    pub async fn start(config: BoardConfig) -> Result<Self, StartupError> {
        match config.store.backend {
            StoreBackend::Mongodb => {
                let store_config = config.store.clone();
                Self::start_with(config, move |_| {
                    let store_config = store_config.clone();
                    async move {
                        let store = MongoMessageStore::connect(&store_config).await?;
                        Ok(Arc::new(store) as Arc<dyn MessageStore>)
                    }
                })
                .await
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; messages are lost on exit");
                Self::start_with(config, |_| async {
                    Ok(Arc::new(InMemoryMessageStore::new()) as Arc<dyn MessageStore>)
                })
                .await
            }
        }
    }

    /// Start with a custom connector. `connect` is called once per attempt
    /// with the 1-based attempt number, under `config.retry`.
    pub async fn start_with<F, Fut>(config: BoardConfig, connect: F) -> Result<Self, StartupError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = StoreResult<Arc<dyn MessageStore>>>,
    {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let state = StateCell::new();
        state.transition(LifecycleState::Connecting)?;

        let policy = config.retry.policy();
        tracing::info!(
            backend = %config.store.backend,
            max_attempts = policy.max_attempts(),
            "Connecting to store"
        );

        let store = match retry(&policy, "store connect", connect).await {
            Ok(store) => store,
            Err(e) => {
                state.transition(LifecycleState::Failed)?;
                return Err(StartupError::Connect(e));
            }
        };

        Self::serve(config, store, state).await
    }

    async fn serve(
        config: BoardConfig,
        store: Arc<dyn MessageStore>,
        state: StateCell,
    ) -> Result<Self, StartupError> {
        let address = config.listener.bind_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(source) => {
                if let Err(e) = store.close().await {
                    tracing::warn!(error = %e, "Failed to release store after bind failure");
                }
                state.transition(LifecycleState::Failed)?;
                return Err(StartupError::Bind { address, source });
            }
        };
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { address, source })?;

        let gateway = MessageGateway::new(store.clone());
        let server = HttpServer::new(&config, gateway.clone());
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

        state.transition(LifecycleState::Serving)?;
        tracing::info!(
            address = %local_addr,
            backend = gateway.backend(),
            "Message board serving"
        );

        Ok(Self {
            state,
            store,
            gateway,
            shutdown,
            server: Mutex::new(Some(handle)),
            local_addr,
            wipe_on_close: config.lifecycle.wipe_on_close,
            drain_timeout: Duration::from_secs(config.lifecycle.shutdown_timeout_secs),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Stop serving and release the store.
    ///
    /// Safe to call more than once; later calls return immediately.
    pub async fn close(&self) {
        let mut server = self.server.lock().await;
        if self.state.transition(LifecycleState::Draining).is_err() {
            tracing::debug!(state = %self.state.get(), "Close requested in non-serving state; ignoring");
            return;
        }

        self.shutdown.trigger();
        if let Some(handle) = server.take() {
            let abort = handle.abort_handle();
            match tokio::time::timeout(self.drain_timeout, handle).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => tracing::warn!(error = %e, "HTTP server exited with error"),
                Ok(Err(e)) => tracing::warn!(error = %e, "HTTP server task failed"),
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.drain_timeout.as_secs(),
                        "Drain deadline passed; aborting in-flight requests"
                    );
                    abort.abort();
                }
            }
        }

        if self.wipe_on_close {
            match self.gateway.wipe_all().await {
                Ok(()) => tracing::info!("Wiped store on close"),
                Err(e) => tracing::warn!(error = %e, "Failed to wipe store on close"),
            }
        }

        if let Err(e) = self.store.close().await {
            tracing::warn!(error = %e, "Failed to release store");
        }

        if let Err(e) = self.state.transition(LifecycleState::Closed) {
            tracing::warn!(error = %e, "Unexpected lifecycle state on close");
        }
        tracing::info!("Message board closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> BoardConfig {
        let mut config = BoardConfig::default();
        config.store.backend = StoreBackend::Memory;
        config.listener.host = "127.0.0.1".into();
        config.listener.port = 0;
        config.frontend.serve_static = false;
        config
    }

    #[tokio::test]
    async fn test_start_and_close() {
        let app = Application::start(memory_config()).await.unwrap();
        assert_eq!(app.state(), LifecycleState::Serving);
        assert_ne!(app.local_addr().port(), 0);

        app.close().await;
        assert_eq!(app.state(), LifecycleState::Closed);

        app.close().await;
        assert_eq!(app.state(), LifecycleState::Closed);
    }

    #[tokio::test]
    async fn test_invalid_config_never_connects() {
        let mut config = memory_config();
        config.store.backend = StoreBackend::Mongodb;

        let mut attempts = 0;
        let result = Application::start_with(config, |_| {
            attempts += 1;
            async { Ok(Arc::new(InMemoryMessageStore::new()) as Arc<dyn MessageStore>) }
        })
        .await;

        assert!(matches!(result, Err(StartupError::Config(ConfigError::Validation(_)))));
        assert_eq!(attempts, 0);
    }

    #[tokio::test]
    async fn test_wipe_on_close() {
        let store = Arc::new(InMemoryMessageStore::new());
        let mut config = memory_config();
        config.lifecycle.wipe_on_close = true;

        let shared = store.clone();
        let app = Application::start_with(config, move |_| {
            let store = shared.clone();
            async move { Ok(store as Arc<dyn MessageStore>) }
        })
        .await
        .unwrap();

        MessageGateway::new(store.clone())
            .insert(crate::messages::MessageText::parse("temp").unwrap())
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        app.close().await;
        assert!(store.is_empty());
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_data_kept_without_wipe() {
        let store = Arc::new(InMemoryMessageStore::new());
        let shared = store.clone();
        let app = Application::start_with(memory_config(), move |_| {
            let store = shared.clone();
            async move { Ok(store as Arc<dyn MessageStore>) }
        })
        .await
        .unwrap();

        MessageGateway::new(store.clone())
            .insert(crate::messages::MessageText::parse("keep").unwrap())
            .await
            .unwrap();
        app.close().await;

        assert_eq!(store.len(), 1);
        assert!(store.is_closed());
    }
}
