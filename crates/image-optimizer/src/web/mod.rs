//! Web layer module
//!
//! Thin axum handlers over [`ImageOptimizer`]:
//! - **Handlers**: optimize, health and liveness endpoints
//! - **Responses**: image responses and error-to-status mapping
//! - **Extractors**: query validation into a `TransformRequest`
//! - **Middleware**: request logging

use anyhow::Result;
use axum::{Router, http::HeaderValue, routing::get};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::errors::AppError;
use crate::services::ImageOptimizer;

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;

/// Web server
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub optimizer: ImageOptimizer,
    pub cache_control: HeaderValue,
}

impl AppState {
    pub fn new(config: &Config, optimizer: ImageOptimizer) -> Result<Self> {
        let cache_control = HeaderValue::from_str(&config.response.cache_control).map_err(|e| {
            AppError::configuration(format!(
                "invalid response.cache_control '{}': {}",
                config.response.cache_control, e
            ))
        })?;

        Ok(Self {
            optimizer,
            cache_control,
        })
    }
}

impl WebServer {
    pub fn new(config: Config, optimizer: ImageOptimizer) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = Self::create_router(AppState::new(&config, optimizer)?);

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::health::index))
            .route("/health", get(handlers::health::health_check))
            .route("/optimize", get(handlers::optimize::optimize))
            .route("/optimize/{filename}", get(handlers::optimize::optimize_named))
            .layer(
                ServiceBuilder::new()
                    .layer(axum::middleware::from_fn(
                        middleware::request_logging_middleware,
                    ))
                    .layer(CorsLayer::permissive()),
            )
            .with_state(state)
    }

    /// Serve with a notification when the server is actually listening or fails to bind
    ///
    /// Shuts down gracefully on SIGTERM or SIGINT.
    pub async fn serve_with_signal(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to install signal handlers: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down gracefully"),
            Err(e) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
