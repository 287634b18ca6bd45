//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (request volume, latency, errors, availability)
//! - Install the Prometheus recorder backing the `/metrics` endpoint
//!
//! # Metrics
//! - `translator_requests_total` (counter): requests by endpoint, method, status_code
//! - `translator_request_latency_seconds` (histogram): latency by endpoint
//! - `translator_errors_total` (counter): translate failures by endpoint, error_category
//! - `translator_translations_total` (counter): successful translations by model
//! - `translator_model_available` (gauge): 1=all models loadable, 0=a load failed
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Histogram buckets tuned for model inference latencies

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::pipeline::ErrorCategory;

pub const REQUESTS_TOTAL: &str = "translator_requests_total";
pub const REQUEST_LATENCY_SECONDS: &str = "translator_request_latency_seconds";
pub const ERRORS_TOTAL: &str = "translator_errors_total";
pub const TRANSLATIONS_TOTAL: &str = "translator_translations_total";
pub const MODEL_AVAILABLE: &str = "translator_model_available";

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Install the process-wide Prometheus recorder.
///
/// Safe to call more than once: later calls return the handle installed by
/// the first one.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let mut slot = HANDLE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_LATENCY_SECONDS.to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;
    describe_metrics();

    *slot = Some(handle.clone());
    Ok(handle)
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, Unit::Count, "Total number of HTTP requests");
    describe_histogram!(
        REQUEST_LATENCY_SECONDS,
        Unit::Seconds,
        "Request latency in seconds"
    );
    describe_counter!(ERRORS_TOTAL, Unit::Count, "Total number of translation errors");
    describe_counter!(
        TRANSLATIONS_TOTAL,
        Unit::Count,
        "Total number of successful translations"
    );
    describe_gauge!(MODEL_AVAILABLE, "Whether the translation model is available");
}

/// Record a completed HTTP request.
pub fn record_request(endpoint: &str, method: &str, status: u16, start: Instant) {
    let latency = start.elapsed().as_secs_f64();
    counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string(),
        "status_code" => status.to_string()
    )
    .increment(1);
    histogram!(REQUEST_LATENCY_SECONDS, "endpoint" => endpoint.to_string()).record(latency);
}

/// Record a failed translation.
pub fn record_error(endpoint: &str, category: ErrorCategory) {
    counter!(
        ERRORS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "error_category" => category.as_str()
    )
    .increment(1);
}

/// Record a successful translation.
pub fn record_translation(model_id: &str) {
    counter!(TRANSLATIONS_TOTAL, "model" => model_id.to_string()).increment(1);
}

/// Update the model availability gauge.
pub fn set_model_available(available: bool) {
    gauge!(MODEL_AVAILABLE).set(if available { 1.0 } else { 0.0 });
}
