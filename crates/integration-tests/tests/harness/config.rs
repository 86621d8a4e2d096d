//! Programmatic configuration builder for integration tests

use probe_config::{Config, SuiteConfig, TargetConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Target `base_url` with defaults otherwise
    ///
    /// The oversized case is shortened to keep test traffic small while
    /// still exceeding the mock's body limit.
    pub fn new(base_url: &str) -> Self {
        Self {
            config: Config {
                target: TargetConfig::new(base_url.parse().expect("valid URL")),
                suite: SuiteConfig {
                    oversized_name_length: 100_000,
                    ..SuiteConfig::default()
                },
                telemetry: None,
            },
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.config.target.endpoint = endpoint.to_owned();
        self
    }

    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.target.timeout = Some(timeout.to_owned());
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.config.target.api_key = Some(SecretString::from(key));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.config.target.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn with_user_agent(mut self, agent: &str) -> Self {
        self.config.target.user_agent = Some(agent.to_owned());
        self
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.config.suite.repeat = repeat;
        self
    }

    pub fn with_oversized_name_length(mut self, length: usize) -> Self {
        self.config.suite.oversized_name_length = length;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.config.suite.concurrency = concurrency;
        self
    }

    pub fn with_cases(mut self, cases: &[&str]) -> Self {
        self.config.suite.cases = cases.iter().map(|&case| case.to_owned()).collect();
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("valid test config");
        self.config
    }
}
