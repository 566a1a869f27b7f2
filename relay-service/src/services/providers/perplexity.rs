//! Perplexity chat-completion client.
//!
//! One awaited POST per call, no retries. Every failure is folded into
//! [`GenerationResult::Failure`].

use super::{
    Completion, GenerationOptions, GenerationResult, ProviderError, ResolvedOptions, TextProvider,
};
use crate::config::{GenerationDefaults, PerplexityConfig};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const GENERIC_API_ERROR: &str = "API request failed";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(flatten)]
    options: ResolvedOptions,
    messages: Vec<ChatMessage<'a>>,
}

pub struct PerplexityClient {
    api_key: Secret<String>,
    base_url: String,
    defaults: GenerationDefaults,
    client: Client,
}

impl PerplexityClient {
    pub fn new(
        config: &PerplexityConfig,
        defaults: GenerationDefaults,
    ) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            defaults,
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn request(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Completion, ProviderError> {
        let request = ChatCompletionRequest {
            options: options.resolve(&self.defaults),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(
            model = %request.options.model,
            prompt_len = prompt.len(),
            "Sending request to Perplexity API"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            let message = body
                .as_ref()
                .and_then(remote_error_message)
                .unwrap_or_else(|| GENERIC_API_ERROR.to_string());

            tracing::warn!(status = %status, error = %message, "Perplexity API returned an error");
            return Err(ProviderError::ApiError(message));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = data
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ProviderError::InvalidResponse(
                    "Response did not contain a completion message".to_string(),
                )
            })?
            .to_string();

        Ok(Completion { text, data })
    }
}

/// `error` as a string, or `error.message` when the provider nests it.
fn remote_error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Object(detail) => detail
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl TextProvider for PerplexityClient {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> GenerationResult {
        match self.request(prompt, options).await {
            Ok(completion) => GenerationResult::Success(completion),
            Err(err) => {
                tracing::warn!(error = %err, "Generation failed");
                GenerationResult::Failure(err)
            }
        }
    }
}
