//! HTTP server components for ailogistics-server
//!
//! This module provides the HTTP server infrastructure including:
//! - Router configuration and route handlers
//! - Error responses and request logging
//! - Server lifecycle management

pub mod middleware;
pub mod response;
pub mod router;

pub use middleware::logging_middleware;
pub use response::ApiError;
pub use router::{build_router, AppState, HealthResponse, LoginResponse};

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ServerConfig;
use crate::database::Database;

/// HTTP Server for ailogistics-server
///
/// Manages the axum server lifecycle, including:
/// - Binding to configured address
/// - Applying middleware layers
/// - Graceful shutdown handling
pub struct Server<D: Database + 'static> {
    config: ServerConfig,
    state: AppState<D>,
}

impl<D: Database + 'static> Server<D> {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState<D>) -> Self {
        Self { config, state }
    }

    /// Resolve the configured host and port to a bind address
    ///
    /// Host names are resolved; the first address returned wins.
    pub async fn bind_addr(&self) -> Result<SocketAddr, ServerError> {
        let host = self.config.host.as_str();
        let port = self.config.port;

        tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| ServerError::Config(format!("Cannot resolve host {}: {}", host, e)))?
            .next()
            .ok_or_else(|| ServerError::Config(format!("No address found for host {}", host)))
    }

    /// Run the server until shutdown signal is received
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Future that resolves when the server should shut down
    ///
    /// # Returns
    ///
    /// Ok(()) if server shuts down gracefully, Err if there was an error
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_addr().await?;
        let app = apply_layers(build_router(self.state), &self.config)?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        let addr = listener.local_addr().unwrap_or(addr);
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wrap a router with the standard middleware stack
///
/// Request logging, the request timeout (skipped when zero), CORS,
/// tracing spans and response compression.
pub fn apply_layers(router: Router, config: &ServerConfig) -> Result<Router, ServerError> {
    let cors = build_cors_layer(&config.cors_origins)?;

    let mut app = router.layer(axum::middleware::from_fn(logging_middleware));
    if config.request_timeout_secs > 0 {
        app = with_request_timeout(app, Duration::from_secs(config.request_timeout_secs));
    }

    Ok(app
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new()))
}

/// Cut off requests that run longer than `timeout`
///
/// The timed-out response carries the usual `{"message": ...}` body.
fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router
        .layer(tower_http::timeout::TimeoutLayer::new(timeout))
        .layer(axum::middleware::map_response(timeout_response))
}

async fn timeout_response(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        ApiError::request_timeout().into_response()
    } else {
        response
    }
}

/// Build the CORS layer
///
/// An empty origin list allows any origin.
pub fn build_cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ServerError::Config(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    /// Failed to serve requests
    #[error("Server error: {0}")]
    Serve(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
