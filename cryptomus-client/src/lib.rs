//! # Cryptomus Client SDK
//!
//! A Rust client for the Cryptomus cryptocurrency payment gateway.
//!
//! Every outbound request is a signed POST: the JSON body is signed with
//! the product-specific API key and sent with `merchant` and `sign`
//! headers. Inbound webhooks carry the same signature scheme and are
//! checked by [`Webhook`].
//!
//! ```no_run
//! use cryptomus_client::CryptomusClient;
//! use cryptomus_types::InfoRequest;
//!
//! # async fn run() -> Result<(), cryptomus_client::ClientError> {
//! let client = CryptomusClient::new("merchant-uuid");
//! let payment = client.payment("payment-api-key");
//! let envelope = payment.info(&InfoRequest::by_order_id("42")).await?;
//! println!("{}", envelope["result"]["status"]);
//! # Ok(())
//! # }
//! ```
//!
//! The SDK makes exactly one attempt per call; retry policy belongs to
//! the caller.

pub mod payment;
pub mod payout;
pub mod request;
pub mod sign;
pub mod webhook;

pub use payment::Payment;
pub use payout::Payout;
pub use request::{API_URL, RequestBuilder};
pub use webhook::{ALLOWED_WEBHOOK_IP, Webhook, WebhookError};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network-level failure; the provider never answered.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response from the provider.
    #[error("API error on {endpoint}: {status} - {message}")]
    Api {
        status: u16,
        endpoint: String,
        message: String,
        /// Provider-reported validation errors, flattened to
        /// `"field: message"` entries.
        errors: Vec<String>,
    },

    /// Payload serialization or response parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Endpoint of the call that failed.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Transport { endpoint, .. } | Self::Api { endpoint, .. } => Some(endpoint),
            Self::Json(_) => None,
        }
    }

    /// Validation errors reported by the provider, if any.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Entry point: hands out per-product API façades.
///
/// The merchant UUID is shared; each façade carries its own API key and
/// is immutable after construction.
pub struct CryptomusClient {
    merchant_uuid: String,
    base_url: String,
}

impl CryptomusClient {
    /// Creates a client for the given merchant, pointed at production.
    pub fn new(merchant_uuid: impl Into<String>) -> Self {
        Self {
            merchant_uuid: merchant_uuid.into(),
            base_url: request::API_URL.to_string(),
        }
    }

    /// Overrides the API base URL, for tests and staging.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Payment façade, authenticated with the payment API key.
    pub fn payment(&self, api_payment_key: impl Into<String>) -> Payment {
        Payment::new(RequestBuilder::with_base_url(
            self.base_url.clone(),
            self.merchant_uuid.clone(),
            api_payment_key,
        ))
    }

    /// Payout façade, authenticated with the payout API key.
    pub fn payout(&self, api_payout_key: impl Into<String>) -> Payout {
        Payout::new(RequestBuilder::with_base_url(
            self.base_url.clone(),
            self.merchant_uuid.clone(),
            api_payout_key,
        ))
    }

    /// Webhook verifier for the given webhook API key.
    pub fn webhook(&self, api_key: impl Into<String>, check_client_ip: bool) -> Webhook {
        Webhook::new(api_key, check_client_ip)
    }
}
