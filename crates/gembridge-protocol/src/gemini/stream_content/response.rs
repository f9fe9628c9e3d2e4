use serde::Deserialize;

use crate::gemini::generate_content::GenerateContentResponse;

/// Body returned by `:streamGenerateContent` on a gateway without incremental
/// delivery: either a bare response object or a JSON array of chunk objects
/// delivered in one piece.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamGenerateContentResponse {
    Chunks(Vec<GenerateContentResponse>),
    Single(GenerateContentResponse),
}

impl StreamGenerateContentResponse {
    pub fn into_chunks(self) -> Vec<GenerateContentResponse> {
        match self {
            Self::Chunks(chunks) => chunks,
            Self::Single(response) => vec![response],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_object_parses_as_one_chunk() {
        let wire = json!({"candidates": [], "modelVersion": "m"});
        let parsed: StreamGenerateContentResponse = serde_json::from_value(wire).unwrap();
        assert_eq!(parsed.into_chunks().len(), 1);
    }

    #[test]
    fn array_parses_as_chunk_list() {
        let wire = json!([{"modelVersion": "a"}, {"modelVersion": "b"}]);
        let parsed: StreamGenerateContentResponse = serde_json::from_value(wire).unwrap();
        let chunks = parsed.into_chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].model_version.as_deref(), Some("b"));
    }
}
