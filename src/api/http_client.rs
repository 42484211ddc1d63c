use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method, StatusCode,
};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Possible HTTP issues.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unable to reach PayPal: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("PayPal responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unable to parse PayPal response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// HTTP Basic credentials, formatted as `user:password` once encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// The full `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        let user_pass = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(user_pass))
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What we send along with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A single, fully-described request to PayPal.
///
/// These are built fresh for every call and never reused,
/// so nothing from one request can bleed into the next.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub basic_auth: Option<BasicCredentials>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            basic_auth: None,
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn basic_auth(mut self, credentials: BasicCredentials) -> Self {
        self.basic_auth = Some(credentials);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// Something capable of delivering an [`ApiRequest`] and handing back parsed JSON.
///
/// Implementations must report any non-2xx response as [`HttpError::Status`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError>;
}

/// The default transport, backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client, e.g. one configured with timeouts or a proxy.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        let ApiRequest {
            method,
            url,
            headers,
            basic_auth,
            body,
        } = request;
        debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method.clone(), url.clone()).headers(headers);
        if let Some(credentials) = basic_auth {
            builder = builder.header(header::AUTHORIZATION, credentials.header_value());
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.json(&json),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        let result = builder.send().await?;

        // We assume any request resulting in an error will have a non-2xx response code.
        let status = result.status();
        if !status.is_success() {
            let body = result.text().await.unwrap_or_default();
            warn!(%method, %url, %status, "request failed");
            return Err(HttpError::Status { status, body });
        }

        // Some endpoints (e.g. PATCH) reply with 204 and nothing else.
        let response_text = result.text().await?;
        if response_text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response_text)?)
    }
}
