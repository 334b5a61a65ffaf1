//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the message and liveness handlers
//! - Serve the static front-end when enabled
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Run on a bound listener until the shutdown signal fires

use std::path::Path;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::BoardConfig;
use crate::http::handlers::{create_message, health, list_messages};
use crate::http::request::make_request_span;
use crate::lifecycle::shutdown::ShutdownListener;
use crate::messages::MessageGateway;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: MessageGateway,
}

/// HTTP server for the message board.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &BoardConfig, gateway: MessageGateway) -> Self {
        let state = AppState { gateway };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BoardConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/messages", get(list_messages).post(create_message))
            .route("/health", get(health))
            .with_state(state);

        if config.frontend.serve_static {
            let dir = Path::new(&config.frontend.static_dir);
            if !dir.is_dir() {
                tracing::warn!(dir = %dir.display(), "Static directory not found; front-end requests will 404");
            }
            router = router.fallback_service(ServeDir::new(dir));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                // Limit sits outside the timeout: TimeoutLayer needs a `Default` response body.
                .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                .layer(TimeoutLayer::new(Duration::from_secs(config.limits.request_timeout_secs))),
        )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are allowed to finish.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
