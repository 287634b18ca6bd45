//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!     → span.rs (translate start/success/failure events per request)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every translate event
//! - Metrics are cheap (atomic increments)
//! - Request text never reaches the logs, only its length and hash

pub mod logging;
pub mod metrics;
pub mod span;

pub use span::{stable_text_hash, BaseFields, StartedSpan, TranslateLogSpan};
