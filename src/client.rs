//! Mingle API client.
//!
//! Low-level HTTP client that handles request signing and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::sync::Arc;

use reqwest::header::{HeaderValue, DATE};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::auth;
use crate::config::SystemConfiguration;
use crate::error::{MingleError, Result};

const USER_AGENT: &str = concat!("mingle-metrics/", env!("CARGO_PKG_VERSION"));

/// Low-level Mingle API client.
///
/// Signs every request with the HMAC key pair it was built with. Entity
/// operations are implemented via the [`List`](crate::List) trait on model
/// types.
///
/// # Example
///
/// ```no_run
/// use mingle_metrics::MingleClient;
///
/// # fn example() -> mingle_metrics::Result<()> {
/// let client = MingleClient::new("my_login", "my_secret", "https://mingle.example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MingleClient {
    http: Client,
    base_url: Arc<Url>,
    login: String,
    secret: String,
}

impl std::fmt::Debug for MingleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MingleClient")
            .field("base_url", &self.base_url.as_str())
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl MingleClient {
    /// Create a client from a stored configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MingleError::ConfigMissing`] if any of the login, secret,
    /// endpoint or project identifier is empty.
    pub fn from_config(config: &SystemConfiguration) -> Result<Self> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(MingleError::ConfigMissing(format!(
                "{} not set. Use the \"config\" command to configure the application",
                missing.join(", ")
            )));
        }

        Self::new(&config.login, &config.secret, &config.endpoint)
    }

    /// Create a new client with the provided HMAC key pair and endpoint.
    ///
    /// # Arguments
    ///
    /// * `login` - HMAC access key id
    /// * `secret` - HMAC secret access key
    /// * `endpoint` - URL of the Mingle instance (e.g., `https://instance.company.com`)
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn new(login: &str, secret: &str, endpoint: &str) -> Result<Self> {
        // Keep any path prefix when joining API paths
        let base_url_str = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{endpoint}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(MingleError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            login: login.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a signed GET request with query parameters.
    ///
    /// The query is part of the signed request URI, so it is serialized
    /// before signing.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;
        self.execute_signed(self.http.get(url).query(query)).await
    }

    /// Stamp, sign and send a request.
    async fn execute_signed(&self, builder: RequestBuilder) -> Result<Response> {
        let date = HeaderValue::from_str(&auth::date())
            .map_err(|e| MingleError::Signing(e.to_string()))?;

        let mut request = builder
            .header(DATE, date)
            .build()
            .map_err(MingleError::HttpError)?;
        auth::sign(&mut request, &self.login, &self.secret)?;

        tracing::debug!(url = %request.url(), "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(MingleError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = match response.text().await {
            Ok(body) if !body.trim().is_empty() => body,
            _ => format!("HTTP {status}"),
        };
        Err(MingleError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }
}
