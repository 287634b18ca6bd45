//! Translate request pipeline.
//!
//! # Data Flow
//! ```text
//! POST /translate (validated TranslationRequest, request id)
//!     → handler.rs (base fields, span start)
//!     → handler.rs (same-language check, no provider call on failure)
//!     → provider (blocking pool, bounded by inference timeout)
//!     → error.rs (ProviderError → TranslateError → status + category)
//!     → span success/failure + metrics
//!     → TranslationResponse | {"detail": ...}
//! ```
//!
//! # Design Decisions
//! - The pipeline is HTTP-agnostic: it returns typed results and the http
//!   layer renders them
//! - Languages are compared and logged normalized, but echoed as sent
//! - Internal causes go to the logs only; callers get a generic message

pub mod error;
pub mod handler;
pub mod types;

pub use error::{ErrorCategory, TranslateError, INTERNAL_MESSAGE, SAME_LANGUAGE_MESSAGE};
pub use handler::{TranslatePipeline, TRANSLATE_ENDPOINT};
pub use types::{
    RequestValidationError, StatusBody, SupportedLanguages, TranslationRequest,
    TranslationResponse,
};
