use serde::{Deserialize, Serialize};

use crate::gemini::types::{Content, GenerationConfig, SafetySetting, Tool, ToolConfig};

/// Wire body POSTed to `models/{model}:generateContent` and
/// `models/{model}:streamGenerateContent`. Optional sections are omitted
/// entirely when absent; `generationConfig` in particular must never be
/// serialized as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_body_serializes_contents_only() {
        let body = GenerateContentRequest {
            contents: vec![Content::user("hi")],
            system_instruction: None,
            safety_settings: None,
            tools: None,
            tool_config: None,
            generation_config: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }
}
