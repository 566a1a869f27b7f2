//! Common test utilities for relay integration tests.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use relay_service::config::{GenerationDefaults, PerplexityConfig};
use relay_service::services::providers::perplexity::PerplexityClient;
use relay_service::services::providers::TextProvider;
use relay_service::services::{KvStore, MemoryKvStore};
use relay_service::{build_router, AppState};
use secrecy::Secret;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::util::ServiceExt;

/// A fake chat-completion API answering every call with one canned reply.
pub struct StubProvider {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubProvider {
    pub async fn spawn(status: StatusCode, reply: Value) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move || {
                let reply = reply.clone();
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, Json(reply))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub provider");
        let addr = listener.local_addr().expect("Stub provider has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub provider crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    /// Replies with a single completion whose content is `text`.
    pub async fn completing(text: &str) -> Self {
        Self::spawn(
            StatusCode::OK,
            serde_json::json!({
                "id": "stub-completion",
                "model": "mistral-7b-instruct",
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": text } }]
            }),
        )
        .await
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> Arc<dyn TextProvider> {
        let config = PerplexityConfig {
            api_key: Secret::new("test-api-key".to_string()),
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        };
        Arc::new(
            PerplexityClient::new(&config, GenerationDefaults::default())
                .expect("Failed to build Perplexity client"),
        )
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let state = AppState::new(provider, kv);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<&str>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send("POST", uri, Some(&body.to_string())).await
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not JSON")
}
