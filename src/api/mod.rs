mod client;
mod environment;
mod http_client;
mod oauth_client;
mod orders;
#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiError, OrderResponse, PaypalClient, PARTNER_ATTRIBUTION_ID};
pub use environment::{ClientConfig, Environment};
pub use http_client::{
    ApiRequest, BasicCredentials, HttpError, ReqwestTransport, RequestBody, Transport,
};
pub use oauth_client::AuthError;
