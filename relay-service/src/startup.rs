//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::services::providers::perplexity::PerplexityClient;
use crate::services::providers::TextProvider;
use crate::services::{KvStore, MemoryKvStore, RedisKvStore};
use crate::{build_router, AppState};
use service_core::error::AppError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Wire the provider and store from `config` and bind the listener.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn TextProvider> = Arc::new(
            PerplexityClient::new(&config.perplexity, config.generation.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(
            model = %config.generation.model,
            base_url = %config.perplexity.base_url,
            "Initialized Perplexity client"
        );

        let kv: Arc<dyn KvStore> = match &config.store.redis_url {
            Some(url) => Arc::new(RedisKvStore::connect(url).await.map_err(|e| {
                tracing::error!("Failed to connect to Redis: {}", e);
                AppError::InternalError(e)
            })?),
            None => {
                tracing::warn!("REDIS_URL not set; word history is kept in memory");
                Arc::new(MemoryKvStore::new())
            }
        };

        Self::with_state(config.common.port, AppState::new(provider, kv)).await
    }

    /// Bind `port` (0 picks a random port) for an already assembled state.
    pub async fn with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Relay service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until_stopped(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
