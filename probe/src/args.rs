use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

/// Endpoint contract checker
#[derive(Debug, Parser)]
#[command(name = "probe", about = "Check an HTTP endpoint against its request/response contract")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "probe.toml", env = "PROBE_CONFIG")]
    pub config: PathBuf,

    /// Override the target base URL
    #[arg(long, env = "PROBE_BASE_URL")]
    pub base_url: Option<Url>,

    /// Override the endpoint path
    #[arg(long, env = "PROBE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Run only these cases (repeatable)
    #[arg(long = "case", value_name = "ID")]
    pub cases: Vec<String>,

    /// List case ids and exit
    #[arg(long)]
    pub list: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Log filter directive
    #[arg(long, default_value = "info", env = "PROBE_LOG")]
    pub log_filter: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for probe_telemetry::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}
