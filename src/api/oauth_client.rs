use reqwest::{header::HeaderValue, Method};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::{
    client::{partner_attribution_header, ApiError},
    environment::ClientConfig,
    http_client::{ApiRequest, BasicCredentials, HttpError, RequestBody, Transport},
};

/// The resource used to exchange client credentials for an access token.
pub const TOKEN_RESOURCE: &str = "oauth2/token";

/// Reasons we may have been unable to obtain an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("token response did not contain an access_token")]
    MissingAccessToken,
    #[error("access token cannot be sent as a header")]
    InvalidAccessToken,
}

/// The bits of PayPal's token response we care about.
/// Only `access_token` is required; the rest is informational.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
}

/// Builds the client credentials grant request for the given configuration.
pub fn access_token_request(config: &ClientConfig) -> Result<ApiRequest, ApiError> {
    let (name, value) = partner_attribution_header();
    Ok(ApiRequest::new(Method::POST, config.api_url(TOKEN_RESOURCE, &[])?)
        .header(name, value)
        .basic_auth(BasicCredentials {
            username: config.client_id().to_string(),
            password: config.client_secret().to_string(),
        })
        .body(RequestBody::Form(vec![(
            "grant_type".to_string(),
            "client_credentials".to_string(),
        )])))
}

/// The `Authorization` header value carrying the given access token.
pub fn bearer_header(access_token: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::try_from(format!("Bearer {access_token}"))
        .map_err(|_| AuthError::InvalidAccessToken)
}

/// Attempt to obtain an access token via the OAuth2 client credentials grant.
///
/// A token is only returned once we know it can be sent back as a bearer header.
pub async fn obtain_access_token<T: Transport + ?Sized>(
    transport: &T,
    config: &ClientConfig,
) -> Result<String, ApiError> {
    let request = access_token_request(config)?;
    debug!(client_id = config.client_id(), "requesting access token");
    let response = transport.send(request).await.map_err(AuthError::Http)?;

    // Anything that isn't shaped like a token response is treated as missing a token.
    let token_response: TokenResponse =
        serde_json::from_value(response).map_err(|_| AuthError::MissingAccessToken)?;
    let Some(access_token) = token_response.access_token else {
        return Err(AuthError::MissingAccessToken.into());
    };
    bearer_header(&access_token)?;

    info!(
        token_type = token_response.token_type.as_deref().unwrap_or("unknown"),
        expires_in = token_response.expires_in,
        "obtained access token"
    );
    Ok(access_token)
}
