use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be addressed or suite
    /// settings are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_target()?;
        self.validate_suite()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_target(&self) -> anyhow::Result<()> {
        let target = &self.target;

        if !matches!(target.base_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "target.base_url must use http or https, got '{}'",
                target.base_url.scheme()
            );
        }

        if target.base_url.host().is_none() {
            anyhow::bail!("target.base_url must include a host");
        }

        if !target.endpoint.starts_with('/') {
            anyhow::bail!("target.endpoint must start with '/', got '{}'", target.endpoint);
        }

        target.timeout()?;

        for (name, value) in &target.headers {
            http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| anyhow::anyhow!("invalid header name '{name}': {e}"))?;
            http::HeaderValue::from_str(value)
                .map_err(|e| anyhow::anyhow!("invalid value for header '{name}': {e}"))?;
        }

        Ok(())
    }

    fn validate_suite(&self) -> anyhow::Result<()> {
        let suite = &self.suite;

        if suite.concurrency == 0 {
            anyhow::bail!("suite.concurrency must be greater than 0");
        }

        // One send cannot be compared against anything
        if suite.repeat < 2 {
            anyhow::bail!("suite.repeat must be at least 2");
        }

        if suite.oversized_name_length == 0 {
            anyhow::bail!("suite.oversized_name_length must be greater than 0");
        }

        if let Some(case) = suite.cases.iter().find(|case| suite.skip.contains(case)) {
            anyhow::bail!("case '{case}' is listed in both suite.cases and suite.skip");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&telemetry.sampling_rate) {
            anyhow::bail!("telemetry.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use indoc::indoc;
    use secrecy::ExposeSecret;

    use crate::{CLIENT_ENDPOINT, Config};
    use crate::telemetry::exporters::ExportProtocol;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"
        "#})
        .unwrap();

        assert_eq!(config.target.base_url.as_str(), "https://test.lan/");
        assert_eq!(config.target.endpoint, CLIENT_ENDPOINT);
        assert_eq!(config.target.timeout().unwrap(), None);
        assert_eq!(config.suite.concurrency, 4);
        assert_eq!(config.suite.repeat, 3);
        assert_eq!(config.suite.oversized_name_length, 1_000_000);
        assert!(config.suite.cases.is_empty());
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_toml(indoc! {r#"
            [target]
            base_url = "http://127.0.0.1:8080"
            endpoint = "/v2/client"
            timeout = "2s"
            user_agent = "probe-ci"
            api_key = "secret"
            headers = { "X-Request-Source" = "ci" }

            [suite]
            concurrency = 1
            repeat = 5
            oversized_name_length = 2048
            cases = ["valid_request", "empty_body"]

            [telemetry]
            service_name = "probe-ci"
            sampling_rate = 0.5
            exporter = { endpoint = "http://localhost:4318", protocol = "http_proto" }
        "#})
        .unwrap();

        assert_eq!(config.target.endpoint, "/v2/client");
        assert_eq!(config.target.timeout().unwrap(), Some(Duration::from_secs(2)));
        assert_eq!(config.target.user_agent.as_deref(), Some("probe-ci"));
        assert_eq!(config.target.api_key.as_ref().unwrap().expose_secret(), "secret");
        assert_eq!(config.target.headers["X-Request-Source"], "ci");
        assert_eq!(config.suite.concurrency, 1);
        assert_eq!(config.suite.repeat, 5);
        assert_eq!(config.suite.oversized_name_length, 2048);
        assert_eq!(config.suite.cases, ["valid_request", "empty_body"]);

        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.service_name, "probe-ci");
        let exporter = telemetry.exporter.unwrap();
        assert_eq!(exporter.protocol, ExportProtocol::HttpProto);
        assert_eq!(exporter.export_interval, 5);
    }

    #[test]
    fn base_url_expanded_from_environment() {
        temp_env::with_var("PROBE_LOADER_BASE_URL", Some("http://localhost:5000"), || {
            let config = Config::from_toml(indoc! {r#"
                [target]
                base_url = "{{ env.PROBE_LOADER_BASE_URL }}"
            "#})
            .unwrap();

            assert_eq!(config.target.base_url.as_str(), "http://localhost:5000/");
        });
    }

    #[test]
    fn missing_target_is_rejected() {
        let err = Config::from_toml("[suite]\nrepeat = 2\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"), "{err}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"
            host = "test.lan"
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("failed to parse config"), "{err}");
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "ftp://test.lan"
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("http or https"), "{err}");
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"
            endpoint = "client"
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("must start with '/'"), "{err}");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"
            timeout = "soon"
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("invalid target.timeout"), "{err}");
    }

    #[test]
    fn bad_header_name_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"
            headers = { "bad header" = "x" }
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("invalid header name"), "{err}");
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"

            [suite]
            concurrency = 0
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("suite.concurrency"), "{err}");
    }

    #[test]
    fn single_repeat_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"

            [suite]
            repeat = 1
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("suite.repeat"), "{err}");
    }

    #[test]
    fn zero_oversized_name_length_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"

            [suite]
            oversized_name_length = 0
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("suite.oversized_name_length"), "{err}");
    }

    #[test]
    fn case_in_both_lists_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"

            [suite]
            cases = ["empty_body"]
            skip = ["empty_body"]
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("both suite.cases and suite.skip"), "{err}");
    }

    #[test]
    fn sampling_rate_out_of_range_is_rejected() {
        let err = Config::from_toml(indoc! {r#"
            [target]
            base_url = "https://test.lan"

            [telemetry]
            sampling_rate = 1.5
        "#})
        .unwrap_err();

        assert!(err.to_string().contains("sampling_rate"), "{err}");
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[target]\nbase_url = \"https://test.lan\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.target.base_url.host_str(), Some("test.lan"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/probe.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"), "{err}");
    }

    #[test]
    fn for_base_url_defaults_everything_else() {
        let config = Config::for_base_url("https://test.lan").unwrap();
        assert_eq!(config.target.endpoint, CLIENT_ENDPOINT);
        assert_eq!(config.suite.repeat, 3);
        assert!(Config::for_base_url("not a url").is_err());
    }
}
