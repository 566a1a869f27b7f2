//! Prompt relay endpoints: forward a prompt to the provider and return its
//! result envelope as-is.

use super::pipeline::Endpoint;
use crate::dtos::RelayRequest;
use crate::services::metrics::record_generation;
use crate::services::providers::{GenerationEnvelope, GenerationOptions};
use crate::AppState;
use async_trait::async_trait;
use axum::http::Method;
use service_core::error::AppError;

pub const PROMPT_REQUIRED: &str = "Prompt is required";

/// Validated relay input.
pub struct RelayInput {
    pub prompt: String,
    pub options: GenerationOptions,
}

fn validate_relay(body: RelayRequest) -> Result<RelayInput, AppError> {
    match body.prompt {
        Some(prompt) if !prompt.is_empty() => Ok(RelayInput {
            prompt,
            options: body.options.unwrap_or_default(),
        }),
        _ => Err(AppError::BadRequest(PROMPT_REQUIRED.to_string())),
    }
}

async fn relay(
    endpoint: &'static str,
    state: &AppState,
    input: RelayInput,
) -> Result<GenerationEnvelope, AppError> {
    let result = state.provider.generate(&input.prompt, &input.options).await;
    record_generation(endpoint, result.is_success());
    Ok(result.into())
}

/// `POST /api/perplexity`
pub struct RelayGenerate;

#[async_trait]
impl Endpoint for RelayGenerate {
    const NAME: &'static str = "relay-generate";
    const METHOD: Method = Method::POST;

    type Body = RelayRequest;
    type Input = RelayInput;
    type Output = GenerationEnvelope;

    fn validate(body: RelayRequest) -> Result<RelayInput, AppError> {
        validate_relay(body)
    }

    async fn delegate(state: &AppState, input: RelayInput) -> Result<GenerationEnvelope, AppError> {
        relay(Self::NAME, state, input).await
    }
}

/// `GET /api/words`
///
/// Accepts only GET yet reads a JSON body like the POST relay. Kept that way
/// for existing clients; see DESIGN.md.
pub struct WordsFetch;

#[async_trait]
impl Endpoint for WordsFetch {
    const NAME: &'static str = "words-fetch";
    const METHOD: Method = Method::GET;

    type Body = RelayRequest;
    type Input = RelayInput;
    type Output = GenerationEnvelope;

    fn validate(body: RelayRequest) -> Result<RelayInput, AppError> {
        validate_relay(body)
    }

    async fn delegate(state: &AppState, input: RelayInput) -> Result<GenerationEnvelope, AppError> {
        relay(Self::NAME, state, input).await
    }
}
