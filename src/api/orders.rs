use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use super::{
    client::{json_body, ApiError, OrderResponse, PaypalClient},
    http_client::{RequestBody, Transport},
};

const ORDERS_RESOURCE: &str = "checkout/orders";

impl<T: Transport> PaypalClient<T> {
    /// Creates an order from the given payload, e.g. `{"intent": "CAPTURE", ...}`.
    ///
    /// PayPal's response is returned as-is.
    #[instrument(skip_all)]
    pub async fn create_order<P: Serialize + ?Sized>(
        &mut self,
        payload: &P,
    ) -> Result<OrderResponse, ApiError> {
        let body = json_body(payload)?;
        let request = self
            .authorized_request(Method::POST, ORDERS_RESOURCE, &[])
            .await?
            .body(body);

        let response = self.send(request).await?;
        info!(
            order_id = response.get("id").and_then(|id| id.as_str()),
            "created order"
        );
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&mut self, order_id: &str) -> Result<OrderResponse, ApiError> {
        let request = self
            .authorized_request(Method::GET, ORDERS_RESOURCE, &[order_id])
            .await?;
        self.send(request).await
    }

    /// Applies a patch document (a list of JSON Patch operations) to an existing order.
    #[instrument(skip(self, payload))]
    pub async fn patch_order<P: Serialize + ?Sized>(
        &mut self,
        payload: &P,
        order_id: &str,
    ) -> Result<OrderResponse, ApiError> {
        let body = json_body(payload)?;
        let request = self
            .authorized_request(Method::PATCH, ORDERS_RESOURCE, &[order_id])
            .await?
            .body(body);
        self.send(request).await
    }

    /// Captures payment for a previously approved order.
    #[instrument(skip(self))]
    pub async fn capture_order(&mut self, order_id: &str) -> Result<OrderResponse, ApiError> {
        let request = self
            .authorized_request(Method::POST, ORDERS_RESOURCE, &[order_id, "capture"])
            .await?
            .body(RequestBody::Json(json!({})));

        let response = self.send(request).await?;
        info!(
            status = response.get("status").and_then(|status| status.as_str()),
            "captured order"
        );
        Ok(response)
    }
}
