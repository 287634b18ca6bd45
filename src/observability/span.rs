//! Per-request translate log span.
//!
//! # States
//! ```text
//! TranslateLogSpan (created) --start()--> StartedSpan --success()--> closed
//!                                                   \--failure()--> closed
//! ```
//!
//! Terminal transitions consume the span, so a span can never emit two
//! terminal events. Every event carries the same base field set.

use std::time::Instant;

use sha2::{Digest, Sha256};

use crate::pipeline::ErrorCategory;

/// Target used for all translate span events.
pub const TRANSLATE_TARGET: &str = "translator::translate";

pub const EVENT_START: &str = "translate_start";
pub const EVENT_SUCCESS: &str = "translate_success";
pub const EVENT_FAILURE: &str = "translate_failure";

/// Stable, non-reversible fingerprint of request text for log correlation.
pub fn stable_text_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(&digest[..8])
}

/// Fields attached to every event of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseFields {
    pub request_id: String,
    /// `request_id` supplied in the request body, if any.
    pub client_request_id: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub model_id: String,
    pub text_length: usize,
    pub text_hash: String,
    pub app_version: String,
}

macro_rules! emit {
    ($level:ident, $event:expr, $fields:ident, $status:expr, $latency:expr, $category:expr, $error:expr) => {
        tracing::$level!(
            target: TRANSLATE_TARGET,
            event = $event,
            request_id = %$fields.request_id,
            client_request_id = $fields.client_request_id.as_deref(),
            source_lang = %$fields.source_lang,
            target_lang = %$fields.target_lang,
            model_id = %$fields.model_id,
            text_length = $fields.text_length as u64,
            text_hash = %$fields.text_hash,
            app_version = %$fields.app_version,
            status_code = $status as u64,
            latency_ms = $latency,
            error_category = $category,
            error = $error,
            "{}",
            $event
        )
    };
}

/// A span that has been created but not started.
#[derive(Debug)]
pub struct TranslateLogSpan {
    fields: BaseFields,
}

impl TranslateLogSpan {
    pub fn new(fields: BaseFields) -> Self {
        Self { fields }
    }

    /// Emit the start event and begin measuring latency.
    pub fn start(self) -> StartedSpan {
        let fields = &self.fields;
        emit!(info, EVENT_START, fields, 0u16, None::<u64>, None::<&str>, None::<&str>);
        StartedSpan {
            fields: self.fields,
            started: Instant::now(),
            closed: false,
        }
    }
}

/// A running span. Must be closed with [`success`](Self::success) or
/// [`failure`](Self::failure).
#[derive(Debug)]
pub struct StartedSpan {
    fields: BaseFields,
    started: Instant,
    closed: bool,
}

impl StartedSpan {
    /// Milliseconds since `start()`, rounded down.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Close the span successfully. Returns the latency in milliseconds.
    pub fn success(mut self, status_code: u16) -> u64 {
        let latency_ms = self.elapsed_ms();
        let fields = &self.fields;
        emit!(
            info,
            EVENT_SUCCESS,
            fields,
            status_code,
            Some(latency_ms),
            None::<&str>,
            None::<&str>
        );
        self.closed = true;
        latency_ms
    }

    /// Close the span with a failure. Internal errors are logged at `error`
    /// together with `cause`; client errors at `info`.
    pub fn failure(mut self, status_code: u16, category: ErrorCategory, cause: Option<&str>) -> u64 {
        let latency_ms = self.elapsed_ms();
        let fields = &self.fields;
        match category {
            ErrorCategory::InternalError => emit!(
                error,
                EVENT_FAILURE,
                fields,
                status_code,
                Some(latency_ms),
                Some(category.as_str()),
                cause
            ),
            ErrorCategory::BadRequest => emit!(
                info,
                EVENT_FAILURE,
                fields,
                status_code,
                Some(latency_ms),
                Some(category.as_str()),
                cause
            ),
        }
        self.closed = true;
        latency_ms
    }
}

impl Drop for StartedSpan {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(
                target: TRANSLATE_TARGET,
                request_id = %self.fields.request_id,
                elapsed_ms = self.elapsed_ms(),
                "translate span dropped before completion"
            );
        }
    }
}
