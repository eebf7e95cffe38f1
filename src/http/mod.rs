//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → edge.rs / downstream.rs (extract cep + traceparent, call the service)
//!     → response.rs (error taxonomy → status code)
//!     → Send to client
//! ```

pub mod downstream;
pub mod edge;
pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
