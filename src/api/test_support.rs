//! Doubles shared by the unit tests across the crate.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use super::{
    client::PaypalClient,
    environment::ClientConfig,
    http_client::{ApiRequest, HttpError, Transport},
};

pub const TOKEN_URL: &str = "https://api.sandbox.paypal.com/v1/oauth2/token";
pub const ORDERS_URL: &str = "https://api.sandbox.paypal.com/v2/checkout/orders";
pub const ACCESS_TOKEN: &str = "A21AAF";

/// Records every request and replays canned responses in order.
/// Once the canned responses run out, every request gets `{}`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<Value, HttpError>>>>,
}

impl RecordingTransport {
    pub fn replying(responses: Vec<Result<Value, HttpError>>) -> Self {
        Self {
            requests: Arc::default(),
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| request.url.to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub fn token_response() -> Result<Value, HttpError> {
    Ok(json!({
        "scope": "https://uri.paypal.com/services/payments/payment",
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "app_id": "APP-80W284485P519543T",
        "expires_in": 31668,
    }))
}

pub fn sandbox_client(responses: Vec<Result<Value, HttpError>>) -> PaypalClient<RecordingTransport> {
    let config = ClientConfig::new("sandbox", "client", "secret").unwrap();
    PaypalClient::with_transport(config, RecordingTransport::replying(responses))
}
