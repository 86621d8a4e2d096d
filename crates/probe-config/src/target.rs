use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Path of the endpoint under test when none is configured
pub const CLIENT_ENDPOINT: &str = "/client";

/// The endpoint every case is sent to
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Scheme and authority of the service, e.g. `https://test.lan`
    pub base_url: Url,
    /// Path joined onto `base_url`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in `duration-str` syntax (`"30s"`, `"1m"`)
    ///
    /// When unset the transport default applies.
    #[serde(default)]
    pub timeout: Option<String>,
    /// Override the `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Bearer token sent in the `Authorization` header
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Extra headers attached to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl TargetConfig {
    /// Target with the default endpoint and no extras
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            endpoint: default_endpoint(),
            timeout: None,
            user_agent: None,
            api_key: None,
            headers: BTreeMap::new(),
        }
    }

    /// Full URL cases are posted to
    pub fn endpoint_url(&self) -> Url {
        join_endpoint(&self.base_url, &self.endpoint)
    }

    /// Parsed request timeout, if one is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|s| duration_str::parse(s).map_err(|e| anyhow::anyhow!("invalid target.timeout '{s}': {e}")))
            .transpose()
    }
}

/// Join an endpoint path onto any path prefix the base URL carries
pub fn join_endpoint(base_url: &Url, endpoint: &str) -> Url {
    let mut url = base_url.clone();
    let prefix = base_url.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{endpoint}"));
    url
}

fn default_endpoint() -> String {
    CLIENT_ENDPOINT.to_string()
}
