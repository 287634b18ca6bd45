//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (read or generate X-Request-ID)
//!     → middleware/metrics.rs (request count + latency per route)
//!     → handlers.rs (health, ready, languages, metrics, translate)
//!     → pipeline (translate only)
//!     → response.rs (errors as {"detail": ...})
//!     → Send to client, X-Request-ID echoed
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
