//! Request ID handling.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the caller did not send one
//! - Echo `X-Request-ID` on every response
//! - Expose the ID to handlers as an extractor
//!
//! # Design Decisions
//! - Request ID added as early as possible (outermost layer) for tracing
//! - A caller-supplied header is kept as is, never replaced

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps a UUID v4 `X-Request-ID` on requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request's `X-Request-ID` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// The request ID of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Ok(RequestId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RequestId {
        let (mut parts, _) = request.into_parts();
        RequestId::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_header_is_used() {
        let request = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_str(), "abc-123");
    }

    #[tokio::test]
    async fn test_missing_header_generates_uuid() {
        let request = Request::builder().body(()).unwrap();
        let id = extract(request).await;
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
