use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Marker the endpoint puts in `Adi` on every successful response
pub const ADDITIONAL_INFO: &str = "addition_info";

// -- Wire types --

/// Request body accepted by the client endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiRequest {
    /// Client identifier, echoed back as `Age`
    pub id: i32,
    /// Client name, echoed back as `Name`
    pub name: String,
}

impl ApiRequest {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse {
    pub name: String,
    /// Derived from the request `Id`
    pub age: i32,
    /// Additional-info marker, see [`ADDITIONAL_INFO`]
    pub adi: String,
}

// -- Request construction --

/// Content type declared on a probe request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Json,
    PlainText,
}

impl ContentType {
    /// Header value including the charset parameter
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::Json => "application/json; charset=utf-8",
            Self::PlainText => "text/plain; charset=utf-8",
        }
    }

    /// Bare media type
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}

/// Serialized body plus declared content type for one request
///
/// The body is always JSON text; only the declared type varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    body: String,
    content_type: ContentType,
}

impl Probe {
    /// Serialize a typed payload as `application/json`
    pub fn json<T: Serialize>(payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload).map_err(ClientError::Encode)?;

        Ok(Self {
            body,
            content_type: ContentType::Json,
        })
    }

    /// Send an arbitrary JSON value, used for payloads that break the request shape
    pub fn raw(payload: &serde_json::Value) -> Self {
        Self {
            body: payload.to_string(),
            content_type: ContentType::Json,
        }
    }

    /// Replace the declared content type, keeping the body
    #[must_use]
    pub const fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }
}

// -- Response --

/// Status and body of one exchange, whatever the status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}
