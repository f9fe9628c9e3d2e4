use gembridge_protocol::gemini::types::Content;

// Heuristic weights. This is a character-count approximation, not a
// tokenizer, and must never be treated as exact.
const TEXT_CHARS_PER_TOKEN: usize = 4;
const INLINE_DATA_CHARS_PER_TOKEN: usize = 100;
const FUNCTION_PART_TOKENS: usize = 15;
const ROLE_OVERHEAD_TOKENS: usize = 5;
const BLOCK_OVERHEAD_TOKENS: usize = 3;

/// `ceil(len / 4)`, floored at 1.
pub fn estimate_text(text: &str) -> u32 {
    ceil_div(text.len(), TEXT_CHARS_PER_TOKEN).max(1) as u32
}

/// Estimate for an ordered list of role-tagged content blocks: per part,
/// `ceil(text/4)` or a fixed function overhead or `ceil(payload/100)`; plus 5
/// per role-tagged block and 3 per block of formatting overhead. Floored
/// at 1.
pub fn estimate_contents(contents: &[Content]) -> u32 {
    let mut tokens = 0usize;
    for content in contents {
        if content.role.is_some() {
            tokens += ROLE_OVERHEAD_TOKENS;
        }
        for part in &content.parts {
            if let Some(text) = &part.text {
                tokens += ceil_div(text.len(), TEXT_CHARS_PER_TOKEN);
            }
            if part.function_call.is_some() {
                tokens += FUNCTION_PART_TOKENS;
            }
            if part.function_response.is_some() {
                tokens += FUNCTION_PART_TOKENS;
            }
            if let Some(blob) = &part.inline_data {
                tokens += ceil_div(blob.data.len(), INLINE_DATA_CHARS_PER_TOKEN);
            }
        }
    }
    tokens += contents.len() * BLOCK_OVERHEAD_TOKENS;
    tokens.max(1) as u32
}

fn ceil_div(value: usize, divisor: usize) -> usize {
    value.div_ceil(divisor)
}
