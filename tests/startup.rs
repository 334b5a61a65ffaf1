//! Startup retries, fatal startup failures and shutdown behaviour.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use board_client::BoardClient;
use message_board::lifecycle::{Application, LifecycleState, StartupError};
use message_board::store::{InMemoryMessageStore, StoreError};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_startup_survives_transient_store_outage() {
    let store = Arc::new(InMemoryMessageStore::new());
    let calls = Arc::new(AtomicU32::new(0));

    let mut config = common::test_config();
    config.retry.max_attempts = 5;

    let app = Application::start_with(config, common::flaky_connector(3, store, calls.clone()))
        .await
        .expect("startup should succeed on the fourth attempt");

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(app.state(), LifecycleState::Serving);

    let client = BoardClient::new(&common::base_url(&app));
    assert_eq!(client.health().await.unwrap().status, "ok");

    app.close().await;
}

#[tokio::test]
async fn test_startup_fails_when_store_never_comes_up() {
    let store = Arc::new(InMemoryMessageStore::new());
    let calls = Arc::new(AtomicU32::new(0));

    let mut config = common::test_config();
    config.retry.max_attempts = 3;
    config.retry.delay_ms = 20;

    let started = std::time::Instant::now();
    let result = Application::start_with(config, common::flaky_connector(u32::MAX, store, calls.clone())).await;

    match result {
        Err(StartupError::Connect(e)) => {
            assert_eq!(e.attempts, 3);
            assert!(matches!(e.source, StoreError::Unavailable(_)));
            assert!(e.to_string().contains("attempt 3"), "last error should surface: {e}");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("startup should fail"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn test_bind_failure_releases_store() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let store = Arc::new(InMemoryMessageStore::new());
    let calls = Arc::new(AtomicU32::new(0));
    let mut config = common::test_config();
    config.listener.port = port;

    let result = Application::start_with(config, common::flaky_connector(0, store.clone(), calls)).await;

    assert!(matches!(result, Err(StartupError::Bind { .. })));
    assert!(store.is_closed());
}

#[tokio::test]
async fn test_close_is_idempotent_and_stops_serving() {
    let store = Arc::new(InMemoryMessageStore::new());
    let (app, client) = common::start_on(store.clone()).await;
    client.post_message("before close").await.unwrap();

    tokio::join!(app.close(), app.close());
    app.close().await;

    assert_eq!(app.state(), LifecycleState::Closed);
    assert!(store.is_closed());
    assert_eq!(store.len(), 1);
    assert!(client.health().await.is_err(), "listener should be gone after close");
}
