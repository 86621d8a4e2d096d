#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod suite;
pub mod target;
pub mod telemetry;

use serde::Deserialize;

pub use suite::*;
pub use target::*;
pub use telemetry::TelemetryConfig;

/// Top-level probe configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Endpoint under test
    pub target: TargetConfig,
    /// Case selection and tuning
    #[serde(default)]
    pub suite: SuiteConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Build a configuration for a base URL with every other setting defaulted
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed
    pub fn for_base_url(base_url: &str) -> anyhow::Result<Self> {
        let base_url = base_url
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid base URL '{base_url}': {e}"))?;

        Ok(Self {
            target: TargetConfig::new(base_url),
            suite: SuiteConfig::default(),
            telemetry: None,
        })
    }
}
