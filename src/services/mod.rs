//! The two request pipelines.
//!
//! # Data Flow
//! ```text
//! caller
//!     → edge.rs (validate, open span, forward with traceparent)
//!     → downstream.rs (validate again, address → weather → conversion)
//!     → back up the chain as TemperatureConversion or ServiceError
//! ```

pub mod downstream;
pub mod edge;

pub use downstream::DownstreamService;
pub use edge::EdgeService;
