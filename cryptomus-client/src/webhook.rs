//! Webhook signature verification.

use serde_json::{Map, Value};
use subtle::ConstantTimeEq;

use crate::sign;

/// The provider's published webhook source address.
///
/// A single literal, per the provider's documentation. There is no
/// rotation surface; a changed source address means an SDK update.
pub const ALLOWED_WEBHOOK_IP: &str = "91.227.144.54";

/// Error for webhook payloads that cannot be verified at all.
///
/// A signature mismatch is the `false` outcome of
/// [`Webhook::verify_signature`], not an error; this type covers input
/// that is structurally unusable.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook payload has no usable sign field")]
    MissingSignature,
}

/// Verifies inbound webhook payloads against the webhook API key.
pub struct Webhook {
    api_key: String,
    check_client_ip: bool,
}

impl Webhook {
    /// Creates a verifier. With `check_client_ip` set, verification also
    /// requires the delivering request to originate from
    /// [`ALLOWED_WEBHOOK_IP`].
    pub fn new(api_key: impl Into<String>, check_client_ip: bool) -> Self {
        Self {
            api_key: api_key.into(),
            check_client_ip,
        }
    }

    /// Verifies the `sign` field of an inbound webhook payload.
    ///
    /// The expected signature is recomputed over the payload with `sign`
    /// removed, serialized with the same canonical rule as outbound
    /// requests, and compared constant-time against the received value.
    /// The caller's map is never mutated.
    ///
    /// Returns `Ok(false)` on mismatch or on a rejected source IP, and
    /// errors only when the payload carries no usable `sign` field.
    pub fn verify_signature(
        &self,
        payload: &Map<String, Value>,
        client_ip: Option<&str>,
    ) -> Result<bool, WebhookError> {
        let received = payload
            .get("sign")
            .and_then(Value::as_str)
            .ok_or(WebhookError::MissingSignature)?;

        // A signature that does not hex-decode to the digest width cannot
        // match anything; fail closed rather than aborting the caller's
        // webhook handler.
        let Ok(received_raw) = hex::decode(received) else {
            return Ok(false);
        };

        let mut scrubbed = payload.clone();
        scrubbed.remove("sign");
        let body = Value::Object(scrubbed).to_string();

        let expected = sign::digest(&body, &self.api_key);
        // ct_eq on slices yields false for mismatched lengths; length is
        // not secret.
        let signature_ok: bool = expected.as_slice().ct_eq(received_raw.as_slice()).into();

        let ip_ok = !self.check_client_ip || client_ip == Some(ALLOWED_WEBHOOK_IP);

        Ok(signature_ok && ip_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Builds a payload carrying a valid signature for `api_key`.
    fn signed_payload(api_key: &str) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("uuid".to_string(), json!("26109ba0-b05b-4ee0-93d1"));
        payload.insert("order_id".to_string(), json!("42"));
        payload.insert("status".to_string(), json!("paid"));

        let body = Value::Object(payload.clone()).to_string();
        let signature = sign::sign(&body, api_key);
        payload.insert("sign".to_string(), json!(signature));
        payload
    }

    #[test]
    fn test_roundtrip_verifies() {
        let payload = signed_payload("webhookkey");
        let webhook = Webhook::new("webhookkey", false);

        assert_eq!(webhook.verify_signature(&payload, None), Ok(true));
    }

    #[test]
    fn test_known_vector_verifies() {
        let mut payload = Map::new();
        payload.insert(
            "uuid".to_string(),
            json!("8f40f1d6-4dbc-4711-b680-1a9c6e0a1a86"),
        );
        payload.insert("order_id".to_string(), json!("42"));
        payload.insert("status".to_string(), json!("paid"));
        payload.insert(
            "sign".to_string(),
            json!("58a3e3f253568ad51d7355db23fcd2ca"),
        );

        let webhook = Webhook::new("webhookkey", false);
        assert_eq!(webhook.verify_signature(&payload, None), Ok(true));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let mut payload = signed_payload("webhookkey");
        payload.insert("order_id".to_string(), json!("43"));

        let webhook = Webhook::new("webhookkey", false);
        assert_eq!(webhook.verify_signature(&payload, None), Ok(false));
    }

    #[test]
    fn test_wrong_key_fails() {
        let payload = signed_payload("webhookkey");
        let webhook = Webhook::new("otherkey", false);

        assert_eq!(webhook.verify_signature(&payload, None), Ok(false));
    }

    #[test]
    fn test_ip_check_rejects_unknown_source() {
        let payload = signed_payload("webhookkey");
        let webhook = Webhook::new("webhookkey", true);

        assert_eq!(
            webhook.verify_signature(&payload, Some("10.0.0.1")),
            Ok(false)
        );
        assert_eq!(webhook.verify_signature(&payload, None), Ok(false));
        assert_eq!(
            webhook.verify_signature(&payload, Some(ALLOWED_WEBHOOK_IP)),
            Ok(true)
        );
    }

    #[test]
    fn test_ip_check_disabled_ignores_source() {
        let payload = signed_payload("webhookkey");
        let webhook = Webhook::new("webhookkey", false);

        assert_eq!(
            webhook.verify_signature(&payload, Some("10.0.0.1")),
            Ok(true)
        );
    }

    #[test]
    fn test_missing_sign_is_an_error() {
        let mut payload = Map::new();
        payload.insert("order_id".to_string(), json!("42"));

        let webhook = Webhook::new("webhookkey", false);
        assert_eq!(
            webhook.verify_signature(&payload, None),
            Err(WebhookError::MissingSignature)
        );
    }

    #[test]
    fn test_non_string_sign_is_an_error() {
        let mut payload = Map::new();
        payload.insert("order_id".to_string(), json!("42"));
        payload.insert("sign".to_string(), json!(12345));

        let webhook = Webhook::new("webhookkey", false);
        assert_eq!(
            webhook.verify_signature(&payload, None),
            Err(WebhookError::MissingSignature)
        );
    }

    #[test]
    fn test_non_hex_sign_fails_closed() {
        let mut payload = signed_payload("webhookkey");
        payload.insert("sign".to_string(), json!("not-hex-at-all"));

        let webhook = Webhook::new("webhookkey", false);
        assert_eq!(webhook.verify_signature(&payload, None), Ok(false));
    }

    #[test]
    fn test_truncated_sign_fails_closed() {
        let mut payload = signed_payload("webhookkey");
        let truncated = payload["sign"].as_str().unwrap()[..16].to_string();
        payload.insert("sign".to_string(), json!(truncated));

        let webhook = Webhook::new("webhookkey", false);
        assert_eq!(webhook.verify_signature(&payload, None), Ok(false));
    }

    #[test]
    fn test_callers_payload_is_not_mutated() {
        let payload = signed_payload("webhookkey");
        let before = payload.clone();

        let webhook = Webhook::new("webhookkey", false);
        webhook.verify_signature(&payload, None).unwrap();

        assert_eq!(payload, before);
        assert!(payload.contains_key("sign"));
    }
}
