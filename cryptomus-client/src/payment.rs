//! Payment API façade.

use serde_json::{Map, Value};

use cryptomus_types::{CreatePaymentRequest, CreateWalletRequest, InfoRequest};

use crate::ClientError;
use crate::request::RequestBuilder;

const API_VERSION: &str = "v1";

/// Client for the payment side of the API.
///
/// Authenticated with the merchant's payment API key. Every method is a
/// thin mapping to one endpoint; the provider envelope is passed through
/// as raw JSON.
pub struct Payment {
    request: RequestBuilder,
}

impl Payment {
    pub(crate) fn new(request: RequestBuilder) -> Self {
        Self { request }
    }

    /// Lists the payment services available to the merchant.
    pub async fn services(&self, parameters: Map<String, Value>) -> Result<Value, ClientError> {
        self.request
            .send_request(&format!("{}/payment/services", API_VERSION), &parameters)
            .await
    }

    /// Creates a payment invoice.
    pub async fn create(&self, data: &CreatePaymentRequest) -> Result<Value, ClientError> {
        self.request
            .send_request(&format!("{}/payment", API_VERSION), data)
            .await
    }

    /// Gets payment information by UUID or order id.
    pub async fn info(&self, query: &InfoRequest) -> Result<Value, ClientError> {
        self.request
            .send_request(&format!("{}/payment/info", API_VERSION), query)
            .await
    }

    /// Gets one page of payment history.
    ///
    /// The page lands in the request as the `cursor` field, next to any
    /// extra filter parameters the caller supplies.
    pub async fn history(
        &self,
        page: impl Into<String>,
        parameters: Map<String, Value>,
    ) -> Result<Value, ClientError> {
        let mut data = parameters;
        data.insert("cursor".to_string(), Value::String(page.into()));
        self.request
            .send_request(&format!("{}/payment/list", API_VERSION), &data)
            .await
    }

    /// Creates a static wallet address.
    pub async fn create_wallet(&self, data: &CreateWalletRequest) -> Result<Value, ClientError> {
        self.request
            .send_request(&format!("{}/wallet", API_VERSION), data)
            .await
    }
}
