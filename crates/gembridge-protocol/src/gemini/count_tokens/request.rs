use serde::{Deserialize, Serialize};

use crate::gemini::types::Content;

/// Wire body POSTed to `models/{model}:countTokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensRequest {
    pub contents: Vec<Content>,
}
