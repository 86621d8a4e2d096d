use http::StatusCode;
use probe_client::{ApiResponse, RawResponse};

use crate::error::CaseFailure;

/// Longest body prefix carried in a failure message
const BODY_EXCERPT_CHARS: usize = 200;

/// What the endpoint must answer for a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Exactly this status; the body is not inspected
    Status(StatusCode),
    /// Any 2xx status with a body equal to these fields
    Success(ApiResponse),
}

impl Expectation {
    /// Check one response against the contract
    ///
    /// Fields are compared in wire order and the first mismatch is reported.
    pub fn evaluate(&self, response: &RawResponse) -> Result<(), CaseFailure> {
        match self {
            Self::Status(expected) => {
                if response.status == *expected {
                    Ok(())
                } else {
                    Err(status_mismatch(&expected.to_string(), response))
                }
            }
            Self::Success(expected) => {
                if !response.is_success() {
                    return Err(status_mismatch("2xx", response));
                }

                let actual: ApiResponse = response.json()?;
                compare_fields(expected, &actual)
            }
        }
    }
}

fn status_mismatch(expected: &str, response: &RawResponse) -> CaseFailure {
    CaseFailure::StatusMismatch {
        expected: expected.to_owned(),
        actual: response.status.as_u16(),
        body: excerpt(&response.text()),
    }
}

/// Compare two response documents field by field
pub(crate) fn compare_fields(expected: &ApiResponse, actual: &ApiResponse) -> Result<(), CaseFailure> {
    if expected.name != actual.name {
        return Err(CaseFailure::FieldMismatch {
            field: "Name",
            expected: format!("{:?}", expected.name),
            actual: format!("{:?}", excerpt(&actual.name)),
        });
    }

    if expected.age != actual.age {
        return Err(CaseFailure::FieldMismatch {
            field: "Age",
            expected: expected.age.to_string(),
            actual: actual.age.to_string(),
        });
    }

    if expected.adi != actual.adi {
        return Err(CaseFailure::FieldMismatch {
            field: "Adi",
            expected: format!("{:?}", expected.adi),
            actual: format!("{:?}", excerpt(&actual.adi)),
        });
    }

    Ok(())
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
