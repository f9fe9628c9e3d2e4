use serde::{Deserialize, Serialize};

use crate::gemini::types::Content;

/// Wire body POSTed to `models/{model}:embedContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dimensionality: Option<u32>,
}

impl EmbedContentRequest {
    pub fn from_content(content: Content) -> Self {
        Self {
            content,
            task_type: None,
            title: None,
            output_dimensionality: None,
        }
    }
}
