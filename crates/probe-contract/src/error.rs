use probe_client::ClientError;
use serde::Serialize;
use thiserror::Error;

/// Errors raised before any case runs
#[derive(Debug, Error)]
pub enum ContractError {
    /// The injected configuration breaks a validation rule
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A selected or skipped case id does not exist
    #[error("unknown case '{0}'")]
    UnknownCase(String),

    /// Selection and skip lists leave nothing to run
    #[error("no cases selected")]
    NoCases,
}

/// Why a single case failed
///
/// Every variant is terminal for its case; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseFailure {
    /// The client could not be built or the request could not be encoded
    #[error("setup failed: {message}")]
    Setup { message: String },

    /// No response arrived (connection refused, timeout, reset)
    #[error("transport failed: {message}")]
    Transport { message: String },

    /// Status code differs from the contract
    #[error("expected status {expected}, got {actual}: {body}")]
    StatusMismatch {
        expected: String,
        actual: u16,
        /// Leading part of the response body
        body: String,
    },

    /// Success status, but the body is not a valid response document
    #[error("malformed success body: {message}")]
    MalformedBody { message: String },

    /// Response field differs from the contract
    #[error("field {field}: expected {expected}, got {actual}")]
    FieldMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// A repeated identical request produced a different answer
    #[error("attempt {attempt} differs from attempt 1: expected {expected}, got {actual}")]
    Inconsistent {
        attempt: u32,
        expected: String,
        actual: String,
    },
}

impl CaseFailure {
    /// Short machine-friendly name, used as a metric attribute
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Setup { .. } => "setup",
            Self::Transport { .. } => "transport",
            Self::StatusMismatch { .. } => "status_mismatch",
            Self::MalformedBody { .. } => "malformed_body",
            Self::FieldMismatch { .. } => "field_mismatch",
            Self::Inconsistent { .. } => "inconsistent",
        }
    }
}

impl From<ClientError> for CaseFailure {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Http(e) => Self::Transport { message: e.to_string() },
            ClientError::Parse(message) => Self::MalformedBody { message },
            ClientError::Api { status, message } => Self::StatusMismatch {
                expected: "2xx".to_owned(),
                actual: status,
                body: message,
            },
            error @ (ClientError::Encode(_) | ClientError::Config(_)) => Self::Setup {
                message: error.to_string(),
            },
        }
    }
}
