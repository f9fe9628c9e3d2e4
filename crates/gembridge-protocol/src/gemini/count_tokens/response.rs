use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    pub total_tokens: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl CountTokensResponse {
    pub fn new(total_tokens: u32) -> Self {
        Self {
            total_tokens,
            extra: serde_json::Map::new(),
        }
    }
}
