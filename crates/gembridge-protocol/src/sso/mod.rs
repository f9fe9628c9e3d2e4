use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Credentials POSTed to the SSO endpoint. Field names follow the identity
/// provider's wire contract verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct TokenExchangeRequest {
    pub userid: String,
    pub password: String,
    pub otp: String,
    pub otp_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub id_token: String,
    pub expires_in: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exchange_request_uses_provider_field_names() {
        let request = TokenExchangeRequest {
            userid: "svc-account".into(),
            password: "secret".into(),
            otp: String::new(),
            otp_type: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"userid": "svc-account", "password": "secret", "otp": "", "otp_type": ""})
        );
    }

    #[test]
    fn exchange_response_parses_token_and_expiry() {
        let parsed: TokenExchangeResponse = serde_json::from_value(
            json!({"id_token": "jwt-ish", "expires_in": 3600, "token_type": "Bearer"}),
        )
        .unwrap();
        assert_eq!(parsed.id_token, "jwt-ish");
        assert_eq!(parsed.expires_in, 3600);
    }
}
