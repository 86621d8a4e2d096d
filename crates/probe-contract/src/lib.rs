#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Contract cases for the client endpoint
//!
//! Each [`Case`] crafts one request (or a short series, for idempotence),
//! sends it through its own [`probe_client::ContractClient`], and checks the
//! answer against an [`Expectation`]. The [`Checker`] runs a selection of
//! cases concurrently and collects a [`SuiteReport`].

mod case;
mod checker;
pub mod error;
mod expectation;
mod report;

pub use case::Case;
pub use checker::Checker;
pub use error::{CaseFailure, ContractError};
pub use expectation::Expectation;
pub use report::{CaseReport, SuiteReport};
