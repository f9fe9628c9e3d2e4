use http::HeaderMap;
use serde_json::{Map, Value as JsonValue};

pub const REDACTED: &str = "[redacted]";

/// Key-name fragments that mark a header or JSON field as secret-bearing.
const SENSITIVE_FRAGMENTS: &[&str] = &[
    "authorization",
    "password",
    "token",
    "secret",
    "api_key",
    "apikey",
    "cookie",
];

pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_FRAGMENTS
        .iter()
        .any(|fragment| key.contains(fragment))
}

/// Headers as a JSON object suitable for logging, secrets replaced by
/// key-name match before anything leaves this function.
pub fn redact_headers(headers: &HeaderMap) -> JsonValue {
    let mut out = Map::new();
    for (name, value) in headers {
        let rendered = if is_sensitive_key(name.as_str()) {
            REDACTED.to_string()
        } else {
            value.to_str().unwrap_or("<binary>").to_string()
        };
        out.insert(name.as_str().to_string(), JsonValue::String(rendered));
    }
    JsonValue::Object(out)
}

/// Deep copy of a JSON value with every secret-bearing field replaced.
pub fn redact_json(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, entry) in map {
                if is_sensitive_key(key) {
                    out.insert(key.clone(), JsonValue::String(REDACTED.to_string()));
                } else {
                    out.insert(key.clone(), redact_json(entry));
                }
            }
            JsonValue::Object(out)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(redact_json).collect()),
        other => other.clone(),
    }
}

const MAX_BODY_SNIPPET: usize = 2048;

/// Response body rendered for an error message or a log line: JSON bodies are
/// redacted field-by-field, anything else passes through lossily, and the
/// result is bounded.
pub fn redact_body_text(body: &[u8]) -> String {
    let text = match serde_json::from_slice::<JsonValue>(body) {
        Ok(value) => redact_json(&value).to_string(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };
    truncate(text, MAX_BODY_SNIPPET)
}

fn truncate(mut text: String, limit: usize) -> String {
    if text.len() > limit {
        let mut cut = limit;
        while cut > 0 && !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
