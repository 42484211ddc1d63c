use reqwest::{
    header::{self, HeaderName, HeaderValue},
    Method,
};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{
    environment::{ClientConfig, Environment},
    http_client::{ApiRequest, HttpError, ReqwestTransport, RequestBody, Transport},
    oauth_client::{self, AuthError},
};

/// Attribution sent with every request so PayPal can identify this integration.
pub const PARTNER_ATTRIBUTION_ID: &str = "PP-DemoPortal-EC-Psdk-ORDv2-php";

/// PayPal's response to an order operation, exactly as it was returned.
pub type OrderResponse = Value;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown environment `{0}` (expected `sandbox` or `production`)")]
    Configuration(String),
    #[error("`{0}` cannot be used as an API base URL (expected http or https)")]
    InvalidBaseUrl(String),
    #[error("`{0}` is not a usable order ID")]
    InvalidPathSegment(String),
    #[error("unable to authenticate with PayPal: {0}")]
    Authentication(#[from] AuthError),
    #[error(transparent)]
    Request(#[from] HttpError),
    #[error("unable to serialize request payload: {0}")]
    Payload(#[source] serde_json::Error),
}

pub(crate) fn partner_attribution_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("paypal-partner-attribution-id"),
        HeaderValue::from_static(PARTNER_ATTRIBUTION_ID),
    )
}

/// A client for PayPal's Orders API.
///
/// The access token is obtained lazily before the first operation
/// and reused for the lifetime of the client. It is never refreshed.
pub struct PaypalClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
    /// The bearer token across API requests, once we have one.
    access_token: Option<String>,
}

impl PaypalClient<ReqwestTransport> {
    /// Creates a new client talking to PayPal over `reqwest`.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> PaypalClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            access_token: None,
        }
    }

    pub fn environment(&self) -> Environment {
        self.config.environment()
    }

    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Obtains an access token if we don't already hold one.
    async fn ensure_token(&mut self) -> Result<String, ApiError> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }

        // Tokens are validated as header values before we hold on to them.
        let token = oauth_client::obtain_access_token(&self.transport, &self.config).await?;
        self.access_token = Some(token.clone());
        Ok(token)
    }

    /// Builds an authenticated JSON request against a `v2` resource.
    pub(crate) async fn authorized_request(
        &mut self,
        method: Method,
        resource: &str,
        extra_segments: &[&str],
    ) -> Result<ApiRequest, ApiError> {
        // Bad IDs are rejected before we spend a round trip on a token.
        let url = self.config.api_url(resource, extra_segments)?;
        let token = self.ensure_token().await?;
        let bearer = oauth_client::bearer_header(&token)?;
        let (name, value) = partner_attribution_header();

        Ok(ApiRequest::new(method, url)
            .header(name, value)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(header::AUTHORIZATION, bearer))
    }

    /// Sends a business request. Failures are handed back untouched.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<OrderResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "calling PayPal");
        Ok(self.transport.send(request).await?)
    }
}

/// Serializes a caller-provided payload into a JSON body.
pub(crate) fn json_body<P: serde::Serialize + ?Sized>(payload: &P) -> Result<RequestBody, ApiError> {
    serde_json::to_value(payload)
        .map(RequestBody::Json)
        .map_err(ApiError::Payload)
}
