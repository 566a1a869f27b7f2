//! Word generation endpoint: generate, persist, return.

use super::pipeline::Endpoint;
use crate::dtos::{GenerateWordsRequest, WordsResponse};
use crate::services::metrics::{record_generation, record_words_generated};
use crate::services::words::DEFAULT_LANGUAGE;
use crate::AppState;
use async_trait::async_trait;
use axum::http::Method;
use serde_json::Value;
use service_core::error::AppError;

pub const MISSING_FIELDS: &str = "Missing required fields: userId, age, count";
pub const INVALID_COUNT: &str = "Count must be a positive integer";

#[derive(Debug, PartialEq)]
pub struct WordsInput {
    pub user_id: String,
    pub age: String,
    pub count: u32,
    pub language: String,
}

/// `POST /api/generate-words`
pub struct GenerateWords;

#[async_trait]
impl Endpoint for GenerateWords {
    const NAME: &'static str = "generate-words";
    const METHOD: Method = Method::POST;

    type Body = GenerateWordsRequest;
    type Input = WordsInput;
    type Output = WordsResponse;

    fn validate(body: GenerateWordsRequest) -> Result<WordsInput, AppError> {
        let missing = || AppError::BadRequest(MISSING_FIELDS.to_string());

        let user_id = body.user_id.as_ref().and_then(scalar_text).ok_or_else(missing)?;
        let age = body.age.as_ref().and_then(scalar_text).ok_or_else(missing)?;
        let count = body.count.ok_or_else(missing)?;
        let count = positive_integer(&count)
            .ok_or_else(|| AppError::BadRequest(INVALID_COUNT.to_string()))?;
        let language = body
            .language
            .filter(|language| !language.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(WordsInput {
            user_id,
            age,
            count,
            language,
        })
    }

    async fn delegate(state: &AppState, input: WordsInput) -> Result<WordsResponse, AppError> {
        let generated = state
            .words
            .generate_new_words(&input.user_id, input.count, &input.age, &input.language)
            .await;
        record_generation(Self::NAME, generated.is_ok());
        let words = generated.map_err(|e| AppError::InternalError(e.into()))?;

        state.word_store.append_words(&input.user_id, &words).await?;
        record_words_generated(words.len());

        tracing::info!(
            user_id = %input.user_id,
            count = words.len(),
            "Generated words for user"
        );

        Ok(WordsResponse {
            success: true,
            words,
        })
    }
}

/// Non-empty strings and numbers; anything else counts as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Integral JSON numbers in `1..=u32::MAX`, including floats such as `3.0`.
fn positive_integer(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok().filter(|n| *n > 0);
    }
    let n = value.as_f64()?;
    if n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(body: Value) -> Result<WordsInput, String> {
        let body: GenerateWordsRequest = serde_json::from_value(body).unwrap();
        GenerateWords::validate(body).map_err(|e| e.to_string())
    }

    #[test]
    fn accepts_complete_body_and_defaults_language() {
        let input = validate(json!({ "userId": "u1", "age": 7, "count": 3 })).unwrap();
        assert_eq!(
            input,
            WordsInput {
                user_id: "u1".to_string(),
                age: "7".to_string(),
                count: 3,
                language: "English".to_string(),
            }
        );
    }

    #[test]
    fn missing_fields_are_reported_together() {
        assert_eq!(validate(json!({ "age": 7, "count": 3 })).unwrap_err(), MISSING_FIELDS);
        assert_eq!(validate(json!({ "userId": "u1", "count": 3 })).unwrap_err(), MISSING_FIELDS);
        assert_eq!(
            validate(json!({ "userId": "u1", "age": 7, "count": null })).unwrap_err(),
            MISSING_FIELDS
        );
    }

    #[test]
    fn count_must_be_a_positive_integer() {
        for count in [json!(0), json!(-2), json!(2.5), json!("3"), json!(true)] {
            assert_eq!(
                validate(json!({ "userId": "u1", "age": 7, "count": count })).unwrap_err(),
                INVALID_COUNT,
                "count {count} should be rejected"
            );
        }
    }

    #[test]
    fn integral_float_count_is_accepted() {
        let input = validate(json!({ "userId": "u1", "age": "6", "count": 4.0 })).unwrap();
        assert_eq!(input.count, 4);
    }
}
