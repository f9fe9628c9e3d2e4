use std::time::Duration;

use gembridge_protocol::gemini::count_tokens::CountTokensRequest;
use gembridge_protocol::gemini::embed_content::EmbedContentRequest;
use gembridge_protocol::gemini::generate_content::GenerateContentRequest;
use gembridge_protocol::gemini::types::{
    Content, GenerationConfig, SafetySetting, Tool, ToolConfig,
};

/// Client-local knobs. These never reach the wire.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
}

/// A generation call as the caller sees it: conversation turns plus
/// generation parameters plus client-local options. `wire_body` translates
/// this into the gateway's wire shape.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    /// Plain-text system instruction; promoted to a role-tagged content
    /// block on the wire.
    pub system_instruction: Option<String>,
    pub safety_settings: Option<Vec<SafetySetting>>,
    pub tools: Option<Vec<Tool>>,
    pub tool_config: Option<ToolConfig>,
    pub generation_config: GenerationConfig,
    pub options: CallOptions,
}

impl GenerateRequest {
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    pub fn wire_body(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.contents.clone(),
            system_instruction: self
                .system_instruction
                .as_ref()
                .map(|text| Content::system(text.clone())),
            safety_settings: self.safety_settings.clone(),
            tools: self.tools.clone(),
            tool_config: self.tool_config.clone(),
            generation_config: if self.generation_config.is_empty() {
                None
            } else {
                Some(self.generation_config.clone())
            },
        }
    }
}

/// A token-count call. Unlike generation, the model may be overridden per
/// request.
#[derive(Debug, Clone, Default)]
pub struct CountRequest {
    pub model: Option<String>,
    pub contents: Vec<Content>,
    pub options: CallOptions,
}

impl CountRequest {
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    pub fn wire_body(&self) -> CountTokensRequest {
        CountTokensRequest {
            contents: self.contents.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbedRequest {
    pub content: Content,
    pub task_type: Option<String>,
    pub title: Option<String>,
    pub output_dimensionality: Option<u32>,
    pub options: CallOptions,
}

impl EmbedRequest {
    pub fn new(content: Content) -> Self {
        Self {
            content,
            task_type: None,
            title: None,
            output_dimensionality: None,
            options: CallOptions::default(),
        }
    }

    pub fn wire_body(&self) -> EmbedContentRequest {
        EmbedContentRequest {
            content: self.content.clone(),
            task_type: self.task_type.clone(),
            title: self.title.clone(),
            output_dimensionality: self.output_dimensionality,
        }
    }
}
