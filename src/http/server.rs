//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, body limit, timeout)
//! - Keep the registration route free of request timeouts
//! - Bind server to listener and shut down gracefully

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::activity::ActivityLog;
use crate::config::RelayConfig;
use crate::http::handlers::{health, log_activity, register_collectible};
use crate::http::request::UuidRequestId;
use crate::lifecycle::signals::shutdown_signal;
use crate::registration::Registrar;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registrar: Arc<Registrar>,
    pub activity: ActivityLog,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &RelayConfig, registrar: Arc<Registrar>, activity: ActivityLog) -> Self {
        let state = AppState {
            registrar,
            activity,
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/register-collectible` carries no request timeout: its chain calls
    /// are each bounded by `rpc_timeout_secs`, and cutting the request short
    /// would answer before the attempt is logged.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let bounded = Router::new()
            .route("/log", post(log_activity))
            .route("/health", get(health))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        let router = Router::new()
            .route("/register-collectible", post(register_collectible))
            .merge(bounded)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size));

        let router = if config.security.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Router with all layers applied, for embedding or in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
