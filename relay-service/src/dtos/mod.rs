//! Request and response bodies of the relay endpoints.

use crate::services::providers::GenerationOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the prompt relay endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RelayRequest {
    pub prompt: Option<String>,
    pub options: Option<GenerationOptions>,
}

/// Body of the word generation endpoint.
///
/// Fields stay loosely typed so that wrong types surface as validation
/// errors rather than body parse failures.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateWordsRequest {
    pub user_id: Option<Value>,
    pub age: Option<Value>,
    pub count: Option<Value>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WordsResponse {
    pub success: bool,
    pub words: Vec<String>,
}
