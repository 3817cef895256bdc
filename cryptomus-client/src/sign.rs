//! Request signing for the Cryptomus API.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use md5::{Digest, Md5};

/// Signs a serialized request body with an API key.
///
/// The provider's scheme: base64-encode the body, append the API key, MD5
/// the concatenation, return the digest as lowercase hex. MD5 is the
/// mandated wire protocol for this shared-secret hash, not a local choice;
/// any other digest does not interoperate with the gateway.
pub fn sign(body: &str, api_key: &str) -> String {
    hex::encode(digest(body, api_key))
}

/// Raw 16-byte digest, for constant-time comparison against a received
/// signature.
pub(crate) fn digest(body: &str, api_key: &str) -> [u8; 16] {
    let encoded = STANDARD.encode(body.as_bytes());
    let mut hasher = Md5::new();
    hasher.update(encoded.as_bytes());
    hasher.update(api_key.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_is_deterministic() {
        let body = r#"{"order_id":"123","amount":"10.00"}"#;
        assert_eq!(sign(body, "testkey"), sign(body, "testkey"));
    }

    #[test]
    fn test_sign_known_vector() {
        // base64 of the body is eyJvcmRlcl9pZCI6IjEyMyIsImFtb3VudCI6IjEwLjAwIn0=
        let body = r#"{"order_id":"123","amount":"10.00"}"#;
        assert_eq!(sign(body, "testkey"), "ff9f339f2403a15c696a722e536f0114");
    }

    #[test]
    fn test_sign_empty_object() {
        assert_eq!(sign("{}", "testkey"), "2af25709e6ed6edc1988bc8305cae51a");
    }

    #[test]
    fn test_sign_is_lowercase_hex() {
        let signature = sign("{}", "testkey");
        assert_eq!(signature.len(), 32);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_different_keys_different_signatures() {
        let body = r#"{"order_id":"123"}"#;
        assert_ne!(sign(body, "key-a"), sign(body, "key-b"));
    }

    #[test]
    fn test_different_bodies_different_signatures() {
        assert_ne!(
            sign(r#"{"order_id":"123"}"#, "testkey"),
            sign(r#"{"order_id":"124"}"#, "testkey")
        );
    }
}
