use std::str::FromStr;

use http::StatusCode;
use probe_client::{ADDITIONAL_INFO, ApiRequest, ApiResponse, ContentType, Probe};
use probe_config::SuiteConfig;
use serde::Serialize;
use serde_json::json;
use strum::IntoEnumIterator;

use crate::error::ContractError;
use crate::expectation::Expectation;

/// `Id` wider than the 32-bit integer the endpoint binds to
const OUT_OF_RANGE_ID: i64 = 123_456_789_012_345_678;

/// One request/assert scenario against the client endpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, strum::Display, strum::EnumIter,
    strum::EnumString, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Case {
    /// `Id=1, Name="test"` is echoed back with the marker
    ValidRequest,
    /// Valid body declared as `text/plain` is refused with 415
    InvalidContentType,
    /// Body without `Id` is refused with 400
    MissingRequiredField,
    /// Text `Id` and numeric `Name` are refused with 400
    WrongFieldTypes,
    /// `{}` is refused with 400
    EmptyBody,
    /// A very long `Name` is refused with 431
    OversizedField,
    /// An `Id` past the 32-bit range is refused with 400
    OutOfRangeId,
    /// Repeating the valid request gives the same answer each time
    IdempotentValidRequest,
}

impl Case {
    /// Every case in declaration order
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Stable snake_case identifier
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// One-line description for listings
    pub const fn description(self) -> &'static str {
        match self {
            Self::ValidRequest => "valid request is echoed with Age and Adi",
            Self::InvalidContentType => "text/plain body is rejected with 415",
            Self::MissingRequiredField => "request without Id is rejected with 400",
            Self::WrongFieldTypes => "text Id and numeric Name are rejected with 400",
            Self::EmptyBody => "empty object is rejected with 400",
            Self::OversizedField => "oversized Name is rejected with 431",
            Self::OutOfRangeId => "Id beyond 32 bits is rejected with 400",
            Self::IdempotentValidRequest => "repeated valid request yields identical responses",
        }
    }

    /// Build the request this case sends
    pub fn probe(self, suite: &SuiteConfig) -> probe_client::Result<Probe> {
        let probe = match self {
            Self::ValidRequest | Self::IdempotentValidRequest => Probe::json(&valid_request())?,
            Self::InvalidContentType => Probe::json(&valid_request())?.with_content_type(ContentType::PlainText),
            Self::MissingRequiredField => Probe::raw(&json!({ "Name": "test" })),
            Self::WrongFieldTypes => Probe::raw(&json!({ "Id": "one", "Name": 123 })),
            Self::EmptyBody => Probe::raw(&json!({})),
            Self::OversizedField => Probe::json(&ApiRequest::new(1, "a".repeat(suite.oversized_name_length)))?,
            Self::OutOfRangeId => Probe::raw(&json!({ "Id": OUT_OF_RANGE_ID, "Name": "test" })),
        };

        Ok(probe)
    }

    /// What the endpoint must answer
    pub fn expectation(self) -> Expectation {
        match self {
            Self::ValidRequest | Self::IdempotentValidRequest => Expectation::Success(ApiResponse {
                name: "test".to_owned(),
                age: 1,
                adi: ADDITIONAL_INFO.to_owned(),
            }),
            Self::InvalidContentType => Expectation::Status(StatusCode::UNSUPPORTED_MEDIA_TYPE),
            Self::MissingRequiredField | Self::WrongFieldTypes | Self::EmptyBody | Self::OutOfRangeId => {
                Expectation::Status(StatusCode::BAD_REQUEST)
            }
            Self::OversizedField => Expectation::Status(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
        }
    }

    /// Number of requests the case sends
    pub const fn attempts(self, suite: &SuiteConfig) -> u32 {
        match self {
            Self::IdempotentValidRequest => suite.repeat,
            _ => 1,
        }
    }

    /// Resolve the configured allow and skip lists into cases
    ///
    /// An empty allow list selects every case. Order follows declaration
    /// order, not configuration order.
    pub fn select(suite: &SuiteConfig) -> Result<Vec<Self>, ContractError> {
        let parse = |id: &String| Self::from_str(id).map_err(|_| ContractError::UnknownCase(id.clone()));

        let mut selected = if suite.cases.is_empty() {
            Self::all()
        } else {
            suite.cases.iter().map(parse).collect::<Result<Vec<_>, _>>()?
        };

        let skipped = suite.skip.iter().map(parse).collect::<Result<Vec<_>, _>>()?;

        selected.retain(|case| !skipped.contains(case));
        selected.sort_unstable();
        selected.dedup();

        if selected.is_empty() {
            return Err(ContractError::NoCases);
        }

        Ok(selected)
    }
}

fn valid_request() -> ApiRequest {
    ApiRequest::new(1, "test")
}
