//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (spans with parent linkage, traceparent propagation)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//!     → Span sink (log by default)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{
    FinishedSpan, LogSink, RecordingSink, Span, SpanContext, SpanSink, Tracer,
};
