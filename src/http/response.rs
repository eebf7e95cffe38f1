//! Error-to-status mapping.
//!
//! # Responsibilities
//! - Map the error taxonomy to HTTP status codes
//! - Log each failure once, at the boundary
//!
//! # Design Decisions
//! - `NotFound` keeps its own status; it is never folded into upstream failures
//! - Upstream failure details stay in the log, the body is generic

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::ServiceError;

const UPSTREAM_BODY: &str = "external dependency failure";

impl ServiceError {
    /// Status code exposed to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Upstream(_) => StatusCode::BAD_REQUEST,
            ServiceError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ServiceError::Upstream(e) => {
                tracing::error!(provider = e.service(), error = %e, "Upstream failure");
                UPSTREAM_BODY.to_string()
            }
            ServiceError::MalformedRequest(reason) => {
                tracing::warn!(reason = %reason, "Malformed request body");
                self.to_string()
            }
            ServiceError::InvalidInput | ServiceError::NotFound => {
                tracing::info!(status = status.as_u16(), "{}", self);
                self.to_string()
            }
        };
        (status, body).into_response()
    }
}
