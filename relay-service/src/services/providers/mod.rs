//! Language-model provider abstractions and implementations.
//!
//! Handlers and the words orchestrator only see [`TextProvider`], so the
//! Perplexity client can be swapped for the mock in tests.

pub mod mock;
pub mod perplexity;

use crate::config::GenerationDefaults;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0}")]
    NotConfigured(String),

    /// Message reported by the remote API for a non-success status.
    #[error("{0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Caller-supplied generation parameters. Every field is optional; unset
/// fields fall back to [`GenerationDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerationOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub stream: Option<bool>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
}

/// Fully resolved request parameters, ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
}

impl GenerationOptions {
    /// Merge over `defaults`; a value set by the caller always wins.
    pub fn resolve(&self, defaults: &GenerationDefaults) -> ResolvedOptions {
        ResolvedOptions {
            model: self
                .model
                .clone()
                .unwrap_or_else(|| defaults.model.clone()),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            stream: self.stream.unwrap_or(false),
            top_p: self.top_p,
            top_k: self.top_k,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
        }
    }
}

/// A single successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Content of the first choice's message.
    pub text: String,
    /// Raw provider response.
    pub data: serde_json::Value,
}

/// Outcome of a generation call. Failures are values, never panics or `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success(Completion),
    Failure(ProviderError),
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success(_))
    }
}

/// Wire shape of a [`GenerationResult`]:
/// `{success: true, data, text}` or `{success: false, error}`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<GenerationResult> for GenerationEnvelope {
    fn from(result: GenerationResult) -> Self {
        match result {
            GenerationResult::Success(completion) => Self {
                success: true,
                data: Some(completion.data),
                text: Some(completion.text),
                error: None,
            },
            GenerationResult::Failure(err) => Self {
                success: false,
                data: None,
                text: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Trait for chat-completion providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `prompt` as a single user message.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> GenerationResult;
}
