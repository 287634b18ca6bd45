//! Machine translation service library.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (request id, metrics middleware, handlers)
//!                        │
//!                        ▼
//!                     pipeline (validation, span, error mapping)
//!                        │
//!                        ▼
//!                     provider (registry → lazy model load → generate)
//!
//!     Cross-cutting: config, observability (logs, span, metrics),
//!                    lifecycle (startup, signals, shutdown), admin
//! ```

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod provider;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
