//! Error taxonomy shared by both services.

use thiserror::Error;

/// Failure classes surfaced by the pipeline.
///
/// The HTTP layer is the only place these become status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The postal code is not exactly eight decimal digits.
    #[error("invalid zipcode")]
    InvalidInput,

    /// The address provider has no match for the postal code.
    #[error("cannot find zipcode")]
    NotFound,

    /// Any other failure talking to a collaborator.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The request body could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedRequest(String),
}

/// Errors raised while calling an external collaborator.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, I/O or body read failure.
    #[error("{service} transport error: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The collaborator answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    /// The body did not match the expected schema.
    #[error("{service} returned an invalid payload: {reason}")]
    Payload {
        service: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    /// Name of the collaborator that failed.
    pub fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. }
            | Self::Status { service, .. }
            | Self::Payload { service, .. } => service,
        }
    }
}

/// Result type for pipeline operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
