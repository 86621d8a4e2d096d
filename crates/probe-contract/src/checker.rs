use std::time::Instant;

use futures::stream::{self, StreamExt};
use probe_client::{ApiResponse, ContractClient, Probe};
use probe_config::Config;
use probe_telemetry::metrics::{ATTR_CASE, ATTR_OUTCOME, CASE_COUNT, CASE_DURATION, record_duration};
use probe_telemetry::{Counter, Histogram, KeyValue};
use tracing::Instrument;

use crate::case::Case;
use crate::error::{CaseFailure, ContractError};
use crate::expectation::{Expectation, compare_fields};
use crate::report::{CaseReport, SuiteReport};

/// Runs contract cases against the configured endpoint
///
/// Holds only immutable configuration; every case builds and drops its own
/// client, so cases share no connection state.
pub struct Checker {
    config: Config,
    selected: Vec<Case>,
    case_count: Counter<u64>,
    case_duration: Histogram<f64>,
}

impl Checker {
    /// Create a checker, validating the configuration and resolving the case selection
    pub fn new(config: Config) -> Result<Self, ContractError> {
        config
            .validate()
            .map_err(|e| ContractError::InvalidConfig(format!("{e:#}")))?;
        let selected = Case::select(&config.suite)?;

        let meter = probe_telemetry::meter();
        let case_count = meter
            .u64_counter(CASE_COUNT)
            .with_description("Contract cases run, by outcome")
            .build();
        let case_duration = meter
            .f64_histogram(CASE_DURATION)
            .with_description("Wall time per contract case")
            .with_unit("s")
            .build();

        Ok(Self {
            config,
            selected,
            case_count,
            case_duration,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Cases chosen by the suite configuration
    pub fn selected(&self) -> &[Case] {
        &self.selected
    }

    /// Run the configured selection
    pub async fn run_selected(&self) -> SuiteReport {
        self.run(&self.selected).await
    }

    /// Run cases with at most `suite.concurrency` in flight
    ///
    /// A failing case never stops the others.
    pub async fn run(&self, cases: &[Case]) -> SuiteReport {
        tracing::info!(
            url = %self.config.target.endpoint_url(),
            cases = cases.len(),
            concurrency = self.config.suite.concurrency,
            "running contract cases"
        );

        let reports = stream::iter(cases.iter().copied())
            .map(|case| self.run_case(case))
            .buffer_unordered(self.config.suite.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let report = SuiteReport::new(reports);

        tracing::info!(passed = report.passed(), failed = report.failed(), "contract run finished");

        report
    }

    /// Run one case and record its outcome
    pub async fn run_case(&self, case: Case) -> CaseReport {
        let start = Instant::now();

        let result = self
            .execute(case)
            .instrument(tracing::info_span!("case", case = case.id()))
            .await;

        let report = CaseReport {
            case,
            failure: result.err(),
            duration: start.elapsed(),
        };

        let attributes = [
            KeyValue::new(ATTR_CASE, case.id()),
            KeyValue::new(ATTR_OUTCOME, report.outcome()),
        ];
        self.case_count.add(1, &attributes);
        record_duration(&self.case_duration, report.duration, &attributes);

        match report.failure {
            None => tracing::info!(
                case = case.id(),
                elapsed_ms = report.duration.as_millis(),
                "case passed"
            ),
            Some(ref failure) => tracing::warn!(
                case = case.id(),
                kind = failure.kind(),
                error = %failure,
                "case failed"
            ),
        }

        report
    }

    /// Acquire a client, send, assert; the client is dropped on every return path
    async fn execute(&self, case: Case) -> Result<(), CaseFailure> {
        let client = ContractClient::from_config(&self.config.target)?;
        let probe = case.probe(&self.config.suite)?;
        let expectation = case.expectation();

        match case {
            Case::IdempotentValidRequest => {
                check_repeated(&client, &probe, &expectation, case.attempts(&self.config.suite)).await
            }
            _ => {
                let response = client.send(&probe).await?;
                expectation.evaluate(&response)
            }
        }
    }
}

/// Send the same probe `attempts` times and require identical answers
///
/// Only the first answer is checked against the expectation; later answers
/// must equal it, so any drift is reported as an inconsistency.
async fn check_repeated(
    client: &ContractClient,
    probe: &Probe,
    expectation: &Expectation,
    attempts: u32,
) -> Result<(), CaseFailure> {
    if attempts < 2 {
        return Err(CaseFailure::Setup {
            message: format!("idempotence needs at least 2 attempts, got {attempts}"),
        });
    }

    let mut first: Option<(u16, ApiResponse)> = None;

    for attempt in 1..=attempts {
        let response = client.send(probe).await?;
        let status = response.status.as_u16();

        match first {
            None => {
                expectation.evaluate(&response)?;
                first = Some((status, response.json()?));
            }
            Some((first_status, ref first_body)) => {
                if status != first_status {
                    return Err(CaseFailure::Inconsistent {
                        attempt,
                        expected: format!("status {first_status}"),
                        actual: format!("status {status}"),
                    });
                }

                let body: ApiResponse = response.json()?;
                if let Err(CaseFailure::FieldMismatch { field, expected, actual }) = compare_fields(first_body, &body) {
                    return Err(CaseFailure::Inconsistent {
                        attempt,
                        expected: format!("{field} {expected}"),
                        actual: format!("{field} {actual}"),
                    });
                }
            }
        }

        tracing::debug!(attempt, status, "repeat answered");
    }

    Ok(())
}
