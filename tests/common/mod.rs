//! Shared utilities for integration testing.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use board_client::BoardClient;
use message_board::config::{BoardConfig, StoreBackend};
use message_board::lifecycle::Application;
use message_board::store::{InMemoryMessageStore, MessageStore, StoreError, StoreResult};

/// Memory backend on an ephemeral loopback port, fast retries, no front-end.
pub fn test_config() -> BoardConfig {
    let mut config = BoardConfig::default();
    config.store.backend = StoreBackend::Memory;
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.frontend.serve_static = false;
    config.retry.max_attempts = 3;
    config.retry.delay_ms = 10;
    config.lifecycle.shutdown_timeout_secs = 2;
    config
}

/// Start an application on `store` and return a client pointed at it.
#[allow(dead_code)]
pub async fn start_on(store: Arc<InMemoryMessageStore>) -> (Application, BoardClient) {
    let app = Application::start_with(test_config(), move |_| {
        let store = store.clone();
        async move { Ok(store as Arc<dyn MessageStore>) }
    })
    .await
    .expect("application should start");

    let client = BoardClient::new(&base_url(&app));
    (app, client)
}

pub fn base_url(app: &Application) -> String {
    format!("http://{}", app.local_addr())
}

/// Connector that fails `failures` times before handing out `store`.
/// `calls` counts every attempt.
#[allow(dead_code)]
pub fn flaky_connector(
    failures: u32,
    store: Arc<InMemoryMessageStore>,
    calls: Arc<AtomicU32>,
) -> impl FnMut(u32) -> std::pin::Pin<Box<dyn Future<Output = StoreResult<Arc<dyn MessageStore>>> + Send>> {
    move |attempt| {
        calls.fetch_add(1, Ordering::SeqCst);
        let store = store.clone();
        Box::pin(async move {
            if attempt <= failures {
                Err(StoreError::Unavailable(format!("store still booting (attempt {attempt})")))
            } else {
                Ok(store as Arc<dyn MessageStore>)
            }
        })
    }
}
