//! Request identification.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the caller sent none
//! - Echo the ID on the response for correlation
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied `x-request-id` is kept as-is

use axum::http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Produces a fresh UUID v4 per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_generates_distinct_uuids() {
        let request = Request::new(Body::empty());
        let mut make = MakeRequestUuidV4;

        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();

        let a = a.header_value().to_str().unwrap().to_string();
        let b = b.header_value().to_str().unwrap().to_string();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
