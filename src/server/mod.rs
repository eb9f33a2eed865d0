//! HTTP transport for the executors.
//!
//! | Route                      | Method | Executor   |
//! |----------------------------|--------|------------|
//! | `/process-single`          | POST   | sequential |
//! | `/process-concurrent`      | POST   | concurrent |
//! | `/process-pooled`          | POST   | pooled     |
//! | `/health`                  | GET    |            |
//!
//! Processing routes answer any other method with `405 Method not allowed`
//! and an undecodable body with `400 Invalid JSON payload`.

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use handlers::{decode_request, process_body};
pub use types::{SortRequest, SortResponse};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::executor::{create_executor, ExecutionMode, Executor};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Executors shared by every request. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    sequential: Arc<dyn Executor>,
    concurrent: Arc<dyn Executor>,
    pooled: Arc<dyn Executor>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let workers = config.pool_workers()?;
        Ok(Self {
            sequential: create_executor(ExecutionMode::Sequential, workers),
            concurrent: create_executor(ExecutionMode::Concurrent, workers),
            pooled: create_executor(ExecutionMode::Pooled, workers),
        })
    }

    pub fn executor(&self, mode: ExecutionMode) -> Arc<dyn Executor> {
        match mode {
            ExecutionMode::Sequential => self.sequential.clone(),
            ExecutionMode::Concurrent => self.concurrent.clone(),
            ExecutionMode::Pooled => self.pooled.clone(),
        }
    }
}

pub struct SortServer {
    config: ServerConfig,
    state: AppState,
}

impl SortServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let state = AppState::from_config(&config)?;
        Ok(Self { config, state })
    }

    /// Build the routing table.
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/process-single",
                post(handlers::process_single).fallback(handlers::method_not_allowed),
            )
            .route(
                "/process-concurrent",
                post(handlers::process_concurrent).fallback(handlers::method_not_allowed),
            )
            .route(
                "/process-pooled",
                post(handlers::process_pooled).fallback(handlers::method_not_allowed),
            )
            .route("/health", get(handlers::health_check))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let addr = listener.local_addr()?;
        info!(
            "Sort server listening on http://{} (pool workers: {})",
            addr, self.config.pool_workers
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Sort server on {} stopped", addr);
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
