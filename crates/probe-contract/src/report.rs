use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::case::Case;
use crate::error::CaseFailure;

/// Outcome of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub case: Case,
    /// `None` when the case passed
    pub failure: Option<CaseFailure>,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl CaseReport {
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Outcome label used in logs and metrics
    pub fn outcome(&self) -> &'static str {
        self.failure.as_ref().map_or("passed", CaseFailure::kind)
    }
}

/// Reports for every case in a run, in case declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub(crate) fn new(mut cases: Vec<CaseReport>) -> Self {
        cases.sort_by_key(|report| report.case);
        Self { cases }
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|report| report.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed cases only
    pub fn failures(&self) -> impl Iterator<Item = (Case, &CaseFailure)> {
        self.cases
            .iter()
            .filter_map(|report| report.failure.as_ref().map(|failure| (report.case, failure)))
    }

    /// Report for a specific case, if it ran
    pub fn get(&self, case: Case) -> Option<&CaseReport> {
        self.cases.iter().find(|report| report.case == case)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.cases {
            match report.failure {
                None => writeln!(f, "ok   {}", report.case)?,
                Some(ref failure) => writeln!(f, "FAIL {}: {failure}", report.case)?,
            }
        }

        write!(
            f,
            "{} cases: {} passed, {} failed",
            self.cases.len(),
            self.passed(),
            self.failed()
        )
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
