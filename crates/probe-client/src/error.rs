/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the contract client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// Request payload could not be serialized
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body did not match the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the failure happened before any response was received
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
