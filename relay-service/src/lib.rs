pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;

use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use handlers::{pipeline, GenerateWords, RelayGenerate, WordsFetch};
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use services::providers::TextProvider;
use services::{KvStore, WordGenerator, WordStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state. Everything is behind `Arc`; no per-request
/// mutable state lives in the process.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TextProvider>,
    pub kv: Arc<dyn KvStore>,
    pub word_store: WordStore,
    pub words: WordGenerator,
}

impl AppState {
    pub fn new(provider: Arc<dyn TextProvider>, kv: Arc<dyn KvStore>) -> Self {
        let word_store = WordStore::new(kv.clone());
        let words = WordGenerator::new(provider.clone(), word_store.clone());
        Self {
            provider,
            kv,
            word_store,
            words,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .route("/api/perplexity", any(pipeline::handle::<RelayGenerate>))
        .route("/api/generate-words", any(pipeline::handle::<GenerateWords>))
        .route("/api/words", any(pipeline::handle::<WordsFetch>))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}
