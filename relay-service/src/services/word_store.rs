//! Per-user word history kept as a JSON array in the key-value store.
//!
//! Appends are a plain read-modify-write. Two concurrent appends for the same
//! user can interleave so that the later write drops the earlier one's words.

use super::store::KvStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct WordStore {
    kv: Arc<dyn KvStore>,
}

impl WordStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn storage_key(user_id: &str) -> String {
        format!("user_{}_words", user_id)
    }

    /// Stored words for `user_id`, oldest first. Empty when nothing is stored.
    pub async fn get_words(&self, user_id: &str) -> Result<Vec<String>, anyhow::Error> {
        let key = Self::storage_key(user_id);
        match self.kv.get(&key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("Stored word list for {} is corrupt: {}", key, e)),
            None => Ok(Vec::new()),
        }
    }

    pub async fn append_words(
        &self,
        user_id: &str,
        new_words: &[String],
    ) -> Result<(), anyhow::Error> {
        let mut words = self.get_words(user_id).await?;
        words.extend_from_slice(new_words);

        let serialized = serde_json::to_string(&words)?;
        self.kv.put(&Self::storage_key(user_id), &serialized).await?;

        tracing::debug!(
            user_id = %user_id,
            appended = new_words.len(),
            total = words.len(),
            "Appended words to history"
        );
        Ok(())
    }
}
