//! Metric name constants and recording helpers

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry::metrics::Histogram;

/// Record a duration in seconds on a histogram
pub fn record_duration(histogram: &Histogram<f64>, elapsed: Duration, attributes: &[KeyValue]) {
    histogram.record(elapsed.as_secs_f64(), attributes);
}

// Contract case metric names
pub const CASE_COUNT: &str = "probe.case.count";
pub const CASE_DURATION: &str = "probe.case.duration";

// Attribute keys
pub const ATTR_CASE: &str = "probe.case";
pub const ATTR_OUTCOME: &str = "probe.outcome";
