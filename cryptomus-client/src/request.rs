//! Signed request transport.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::ClientError;
use crate::sign;

/// Production API base URL.
pub const API_URL: &str = "https://api.cryptomus.com/";

/// Builds and sends signed POST requests.
///
/// One instance per credential pair. Holds no mutable state, so a single
/// instance is safe to use from concurrent tasks.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    merchant_uuid: String,
    api_key: String,
    http: reqwest::Client,
}

impl RequestBuilder {
    /// Creates a builder pointed at the production API.
    pub fn new(merchant_uuid: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(API_URL, merchant_uuid, api_key)
    }

    /// Creates a builder with a custom base URL, for tests and staging.
    pub fn with_base_url(
        base_url: impl Into<String>,
        merchant_uuid: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            merchant_uuid: merchant_uuid.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Sends a signed POST request and returns the provider envelope.
    ///
    /// The payload is serialized exactly once and the signature covers
    /// that byte sequence; the body goes on the wire unmodified. The
    /// envelope is returned as raw JSON - callers interpret the `state`
    /// and `result` fields themselves. Exactly one attempt, no retries.
    pub async fn send_request<B: Serialize>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_string(payload)?;
        let signature = sign::sign(&body, &self.api_key);
        let url = format!("{}{}", self.base_url, endpoint);

        debug!(endpoint, "sending signed request");

        let response = self
            .http
            .post(&url)
            .header("merchant", &self.merchant_uuid)
            .header("sign", signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        debug!(endpoint, status = status.as_u16(), "received response");

        if status.is_success() {
            Ok(serde_json::from_str(&text)?)
        } else {
            Err(api_error(status.as_u16(), endpoint, &text))
        }
    }
}

/// Maps a non-2xx provider response to [`ClientError::Api`].
///
/// Error bodies look like
/// `{"state":1,"message":"...","errors":{"field":["msg"]}}`;
/// every field may be absent.
fn api_error(status: u16, endpoint: &str, body: &str) -> ClientError {
    let parsed = serde_json::from_str::<Value>(body).ok();

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message").and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {}", status));

    let errors = parsed
        .as_ref()
        .and_then(|v| v.get("errors").and_then(Value::as_object))
        .map(|fields| {
            fields
                .iter()
                .flat_map(|(field, messages)| match messages {
                    Value::Array(list) => list
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|msg| format!("{}: {}", field, msg))
                        .collect::<Vec<_>>(),
                    other => vec![format!("{}: {}", field, other)],
                })
                .collect()
        })
        .unwrap_or_default();

    ClientError::Api {
        status,
        endpoint: endpoint.to_string(),
        message,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_flattens_validation_errors() {
        let body = r#"{"state":1,"message":"Validation error","errors":{"amount":["required"],"currency":["required","invalid"]}}"#;
        let err = api_error(422, "v1/payment", body);

        match err {
            ClientError::Api {
                status,
                endpoint,
                message,
                errors,
            } => {
                assert_eq!(status, 422);
                assert_eq!(endpoint, "v1/payment");
                assert_eq!(message, "Validation error");
                assert!(errors.contains(&"amount: required".to_string()));
                assert!(errors.contains(&"currency: invalid".to_string()));
                assert_eq!(errors.len(), 3);
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_without_json_body() {
        let err = api_error(502, "v1/payout", "Bad Gateway");

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.endpoint(), Some("v1/payout"));
        assert_eq!(err.to_string(), "API error on v1/payout: 502 - HTTP 502");
        assert!(err.errors().is_empty());
    }

    #[test]
    fn test_api_error_message_only() {
        let err = api_error(401, "v1/payment/info", r#"{"message":"Unauthorized"}"#);

        match err {
            ClientError::Api {
                message, errors, ..
            } => {
                assert_eq!(message, "Unauthorized");
                assert!(errors.is_empty());
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
