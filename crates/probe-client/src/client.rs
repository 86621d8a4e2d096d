use std::fmt;

use probe_config::{CLIENT_ENDPOINT, TargetConfig, join_endpoint};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{ClientError, Result};
use crate::types::{ApiRequest, ApiResponse, Probe, RawResponse};

/// HTTP client bound to one base address and endpoint path
///
/// Owns its connection pool. Each contract case creates its own client and
/// the pool is closed when the value is dropped.
pub struct ContractClient {
    base_url: Url,
    endpoint: String,
    http: reqwest::Client,
    api_key: Option<SecretString>,
}

impl fmt::Debug for ContractClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractClient")
            .field("base_url", &self.base_url)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ContractClient {
    /// Create a client pointing at the given base URL and the default endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        Ok(Self::with_http(base_url, CLIENT_ENDPOINT.to_owned(), reqwest::Client::new()))
    }

    /// Create a client from target configuration
    ///
    /// Applies the configured timeout, user agent, extra headers and API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout or a header is invalid, or the
    /// underlying HTTP client cannot be built
    pub fn from_config(target: &TargetConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = target.timeout().map_err(|e| ClientError::Config(e.to_string()))? {
            builder = builder.timeout(timeout);
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &target.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Config(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("invalid value for header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        if let Some(ref agent) = target.user_agent {
            let value = HeaderValue::from_str(agent)
                .map_err(|e| ClientError::Config(format!("invalid user agent: {e}")))?;
            headers.insert(USER_AGENT, value);
        }

        let http = builder
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        let mut client = Self::with_http(target.base_url.clone(), target.endpoint.clone(), http);
        client.api_key.clone_from(&target.api_key);

        Ok(client)
    }

    fn with_http(base_url: Url, endpoint: String, http: reqwest::Client) -> Self {
        tracing::debug!(base_url = %base_url, endpoint = %endpoint, "acquired contract client");

        Self {
            base_url,
            endpoint,
            http,
            api_key: None,
        }
    }

    /// Set the bearer token sent with every request
    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Target a different endpoint path on the same base address
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        endpoint.clone_into(&mut self.endpoint);
        self
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL requests are posted to
    pub fn endpoint_url(&self) -> Url {
        join_endpoint(&self.base_url, &self.endpoint)
    }

    /// POST a probe and return the exchange whatever its status
    ///
    /// # Errors
    ///
    /// Returns an error only when no complete response was received
    pub async fn send(&self, probe: &Probe) -> Result<RawResponse> {
        let url = self.endpoint_url();

        tracing::debug!(
            url = %url,
            content_type = %probe.content_type(),
            body_len = probe.body().len(),
            "sending probe"
        );

        let response = self
            .make_request(&url)
            .header(CONTENT_TYPE, probe.content_type().header_value())
            .body(probe.body().to_owned())
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let body = response.bytes().await?;

        tracing::debug!(url = %url, status = status.as_u16(), "probe answered");

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    /// POST a well-formed request and decode the success body
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body cannot be parsed
    pub async fn submit(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self.send(&Probe::json(request)?).await?;

        if !response.is_success() {
            return Err(ClientError::Api {
                status: response.status.as_u16(),
                message: parse_error_body(&response.text()),
            });
        }

        response.json()
    }

    /// Build a request, attaching the bearer token when one is set
    fn make_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(url.as_str());

        if let Some(ref key) = self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()));
        }

        builder
    }
}

impl Drop for ContractClient {
    fn drop(&mut self) {
        tracing::debug!(base_url = %self.base_url, "released contract client");
    }
}

// -- Helper functions --

/// Pull a human-readable message out of an error body
///
/// Understands problem-details (`title`), `message`, and `error` as either a
/// string or an object with its own `message`. Anything else is returned as is.
fn parse_error_body(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_owned();
    };

    let message = json["title"]
        .as_str()
        .or_else(|| json["message"].as_str())
        .or_else(|| json["error"].as_str())
        .or_else(|| json["error"]["message"].as_str());

    message.map_or_else(|| body.to_owned(), ToOwned::to_owned)
}
