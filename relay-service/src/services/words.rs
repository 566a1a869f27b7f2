//! Word list generation on top of the text provider and the word history.

use super::providers::{GenerationOptions, GenerationResult, TextProvider};
use super::word_store::WordStore;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Error)]
pub enum WordsError {
    #[error("Failed to generate words: {0}")]
    Generation(String),

    #[error("Model reply was not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct WordGenerator {
    provider: Arc<dyn TextProvider>,
    store: WordStore,
}

impl WordGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, store: WordStore) -> Self {
        Self { provider, store }
    }

    /// Ask the model for `count` words the user has not been given before.
    ///
    /// The result is not persisted; callers append it to the history.
    pub async fn generate_new_words(
        &self,
        user_id: &str,
        count: u32,
        age: &str,
        language: &str,
    ) -> Result<Vec<String>, WordsError> {
        let previous = self.store.get_words(user_id).await?;
        let prompt = build_prompt(count, age, language, &previous);

        tracing::debug!(
            user_id = %user_id,
            count,
            excluded = previous.len(),
            "Requesting word list"
        );

        match self
            .provider
            .generate(&prompt, &GenerationOptions::default())
            .await
        {
            GenerationResult::Success(completion) => {
                Ok(serde_json::from_str(completion.text.trim())?)
            }
            GenerationResult::Failure(err) => Err(WordsError::Generation(err.to_string())),
        }
    }
}

pub fn build_prompt(count: u32, age: &str, language: &str, previous: &[String]) -> String {
    let mut prompt = format!(
        "Generate {count} unique {language} words that are appropriate for a child aged {age}."
    );

    if !previous.is_empty() {
        prompt.push_str(&format!(
            " Do not include any of these previously used words: {}.",
            previous.join(", ")
        ));
    }

    prompt.push_str(
        " Respond with only a JSON array of strings, for example [\"apple\", \"river\"], \
         and no other text.",
    );
    prompt
}
