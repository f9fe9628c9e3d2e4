use std::path::PathBuf;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use gembridge_core::{GatewayConfig, GatewayError, Result};

use crate::redact::{redact_headers, redact_json};

#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub proxy: Option<String>,
    pub ca_bundle: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub log_requests: bool,
}

impl From<&GatewayConfig> for TransportOptions {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            proxy: config.proxy.clone(),
            ca_bundle: config.ca_bundle.clone(),
            timeout: Some(config.timeout),
            log_requests: config.log_requests,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<JsonValue>,
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    pub fn post_json(url: Url, headers: HeaderMap, body: JsonValue) -> Self {
        Self {
            method: Method::POST,
            url,
            headers,
            body: Some(body),
            timeout: None,
        }
    }
}

#[derive(Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| GatewayError::Parse(err.to_string()))
    }
}

/// Outbound HTTP with the enterprise trimmings: optional proxy, optional
/// extra root CA, a default deadline with per-request override, and
/// redaction-aware request/response logging. Errors stay typed; a non-2xx
/// response is returned for inspection, never swallowed.
pub struct HttpTransport {
    client: reqwest::Client,
    log_requests: bool,
}

impl HttpTransport {
    pub fn new(options: TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|err| GatewayError::Configuration(format!("invalid proxy URL: {err}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(path) = &options.ca_bundle {
            match std::fs::read(path) {
                Ok(pem) => match reqwest::Certificate::from_pem(&pem) {
                    Ok(certificate) => {
                        builder = builder.add_root_certificate(certificate);
                    }
                    Err(err) => {
                        warn!(
                            event = "ca_bundle_invalid",
                            path = %path.display(),
                            error = %err,
                            "custom CA bundle is not valid PEM, using default trust material"
                        );
                    }
                },
                Err(err) => {
                    warn!(
                        event = "ca_bundle_unreadable",
                        path = %path.display(),
                        error = %err,
                        "custom CA bundle is unreadable, using default trust material"
                    );
                }
            }
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Configuration(format!("http client build failed: {err}")))?;
        Ok(Self {
            client,
            log_requests: options.log_requests,
        })
    }

    pub async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let trace_id = Uuid::new_v4();
        if self.log_requests {
            info!(
                event = "outbound_request",
                trace_id = %trace_id,
                method = %request.method,
                url = %request.url,
                headers = %redact_headers(&request.headers),
                body = %request
                    .body
                    .as_ref()
                    .map(|body| redact_json(body).to_string())
                    .unwrap_or_default(),
            );
        }

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let started_at = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let mapped = map_send_error(err, &request.url);
                if self.log_requests {
                    warn!(
                        event = "outbound_response",
                        trace_id = %trace_id,
                        url = %request.url,
                        elapsed_ms = started_at.elapsed().as_millis() as u64,
                        error = %mapped,
                    );
                }
                return Err(mapped);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_send_error(err, &request.url))?;
        if self.log_requests {
            info!(
                event = "outbound_response",
                trace_id = %trace_id,
                url = %request.url,
                status = status.as_u16(),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                bytes = body.len(),
            );
        }
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_send_error(err: reqwest::Error, url: &Url) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout {
            url: url.to_string(),
        }
    } else {
        GatewayError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_bundle_falls_back_to_default_trust() {
        let transport = HttpTransport::new(TransportOptions {
            ca_bundle: Some(PathBuf::from("/does/not/exist.pem")),
            ..TransportOptions::default()
        });
        assert!(transport.is_ok());
    }

    #[test]
    fn invalid_proxy_is_a_configuration_error() {
        let transport = HttpTransport::new(TransportOptions {
            proxy: Some("::not a proxy::".into()),
            ..TransportOptions::default()
        });
        assert!(matches!(transport, Err(GatewayError::Configuration(_))));
    }
}
