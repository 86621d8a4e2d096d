use serde::Deserialize;

/// Case selection and per-case tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Maximum number of cases in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// How many times the idempotence case resends the valid request
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Length of the `Name` field in the oversized-field case
    #[serde(default = "default_oversized_name_length")]
    pub oversized_name_length: usize,
    /// Case ids to run; empty runs every case
    #[serde(default)]
    pub cases: Vec<String>,
    /// Case ids to leave out
    #[serde(default)]
    pub skip: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            repeat: default_repeat(),
            oversized_name_length: default_oversized_name_length(),
            cases: Vec::new(),
            skip: Vec::new(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_concurrency() -> usize {
    4
}

#[allow(clippy::missing_const_for_fn)]
fn default_repeat() -> u32 {
    3
}

#[allow(clippy::missing_const_for_fn)]
fn default_oversized_name_length() -> usize {
    1_000_000
}
