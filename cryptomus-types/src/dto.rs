//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a payment invoice.
///
/// Amounts travel as strings: the provider validates the exact decimal
/// representation, not a float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount in `currency`, e.g. "10.00"
    pub amount: String,
    /// Invoice currency code, e.g. "USD" or "USDT"
    pub currency: String,
    /// Blockchain network, e.g. "TRON"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Merchant-side order identifier, unique per invoice
    pub order_id: String,
    /// URL the payer is returned to after payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_return: Option<String>,
    /// URL that receives the webhook for this invoice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_callback: Option<String>,
    /// Whether the payer may pay the invoice in several transactions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_payment_multiple: Option<bool>,
    /// Invoice lifetime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<String>,
    /// Currency the merchant wants to receive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_currency: Option<String>,
}

/// Lookup by provider UUID or merchant order id.
///
/// At least one of the two should be set; the provider rejects an empty
/// lookup with a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl InfoRequest {
    /// Lookup by the provider-assigned invoice UUID.
    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            order_id: None,
        }
    }

    /// Lookup by the merchant-side order id.
    pub fn by_order_id(order_id: impl Into<String>) -> Self {
        Self {
            uuid: None,
            order_id: Some(order_id.into()),
        }
    }
}

/// Request to create a static wallet address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    pub network: String,
    pub currency: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_callback: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payout DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a payout to an external address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayoutRequest {
    pub amount: String,
    pub currency: String,
    pub network: String,
    pub order_id: String,
    /// Destination address on `network`
    pub address: String,
    /// "1" to subtract the fee from the amount, "0" to add it on top
    pub is_subtract: String,
    pub url_callback: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response types
// ─────────────────────────────────────────────────────────────────────────────
//
// The client returns the provider envelope as raw JSON; these types are
// deserialization targets for callers that want the payment shape typed.

/// Provider envelope for payment responses: `state` 0 means success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub state: i64,
    pub result: PaymentInfo,
}

/// A payment invoice as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub uuid: String,
    pub order_id: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<String>,
    pub discount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_currency: Option<String>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "from", skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    pub payment_status: String,
    /// Hosted payment page URL
    pub url: String,
    /// Unix timestamp after which the invoice expires
    pub expired_at: i64,
    pub status: String,
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}
