#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed HTTP client for the client endpoint
//!
//! Builds request payloads (well-formed or deliberately broken), posts them
//! with a declared content type, and hands back either the raw exchange or a
//! decoded [`ApiResponse`]

mod client;
pub mod error;
pub mod types;

pub use client::ContractClient;
pub use error::{ClientError, Result};
pub use types::*;
