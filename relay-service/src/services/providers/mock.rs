//! Mock provider for tests.

use super::{Completion, GenerationOptions, GenerationResult, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replies with a fixed result and records every prompt it receives.
pub struct MockTextProvider {
    reply: GenerationResult,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    /// Succeed with `text` as the completion content.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::with_result(GenerationResult::Success(Completion {
            data: serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": text } }]
            }),
            text,
        }))
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_result(GenerationResult::Failure(ProviderError::ApiError(
            message.into(),
        )))
    }

    pub fn with_result(reply: GenerationResult) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone()
    }
}
