use std::{fmt, str::FromStr};
use url::Url;

use super::{oauth_client::TOKEN_RESOURCE, ApiError};

/// PayPal environments we know how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// The REST API host for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://api.sandbox.paypal.com",
            Environment::Production => "https://api.paypal.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(ApiError::Configuration(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to talk to PayPal on behalf of a single REST app.
#[derive(Clone)]
pub struct ClientConfig {
    environment: Environment,
    base_url: Url,
    client_id: String,
    client_secret: String,
}

impl ClientConfig {
    /// Resolves the environment tag into its base URL.
    ///
    /// Only `sandbox` and `production` are accepted.
    pub fn new(
        environment: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let environment: Environment = environment.parse()?;
        Ok(Self::for_environment(environment, client_id, client_secret))
    }

    pub fn for_environment(
        environment: Environment,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        // Both hosts are constants above, so this cannot fail.
        let base_url = Url::parse(environment.base_url()).expect("environment URLs should be valid");
        Self {
            environment,
            base_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Points this configuration at another host, such as a local proxy or mock server.
    ///
    /// The URL must be `http` or `https`.
    pub fn with_base_url(mut self, base_url: Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        self.base_url = base_url;
        Ok(self)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Builds the endpoint URL for a resource (e.g. `checkout/orders`),
    /// followed by any extra path segments such as an order ID.
    ///
    /// The token endpoint is versioned `v1`; every other resource is `v2`.
    /// Each extra segment must survive as exactly one path component: `/` is escaped,
    /// while empty, `.` and `..` segments are rejected.
    pub fn api_url(&self, resource: &str, extra_segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(segment) = extra_segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ApiError::InvalidPathSegment(segment.to_string()));
        }
        let version = if resource == TOKEN_RESOURCE { "v1" } else { "v2" };

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(version)
            .extend(resource.split('/'))
            .extend(extra_segments);
        Ok(url)
    }
}

// We'd rather not have the client secret end up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
