//! Payout API façade.

use serde_json::Value;

use cryptomus_types::{CreatePayoutRequest, InfoRequest};

use crate::ClientError;
use crate::request::RequestBuilder;

const API_VERSION: &str = "v1";

/// Client for the payout side of the API.
///
/// Authenticated with the merchant's payout API key, which is distinct
/// from the payment key.
pub struct Payout {
    request: RequestBuilder,
}

impl Payout {
    pub(crate) fn new(request: RequestBuilder) -> Self {
        Self { request }
    }

    /// Creates a payout to an external address.
    pub async fn create(&self, data: &CreatePayoutRequest) -> Result<Value, ClientError> {
        self.request
            .send_request(&format!("{}/payout", API_VERSION), data)
            .await
    }

    /// Gets payout information by UUID or order id.
    pub async fn info(&self, query: &InfoRequest) -> Result<Value, ClientError> {
        self.request
            .send_request(&format!("{}/payout/info", API_VERSION), query)
            .await
    }
}
