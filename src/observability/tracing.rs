//! Distributed tracing support.
//!
//! # Responsibilities
//! - Create spans for pipeline operations, nested under a parent when one exists
//! - Extract trace context from incoming requests
//! - Propagate trace context to outbound requests
//! - Hand finished spans to an export sink
//!
//! # Design Decisions
//! - No global tracer: a `Tracer` is built at startup and passed to each component
//! - `Span` is a guard; it is closed exactly once, on `end()` or on drop
//! - W3C Trace Context `traceparent` header across the network hop
//! - Export is behind `SpanSink`; the backend wiring is not this crate's concern

use axum::http::{HeaderMap, HeaderValue};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};
use thiserror::Error;

/// Header carrying the W3C trace context.
pub const TRACEPARENT: &str = "traceparent";

const TRACEPARENT_VERSION: &str = "00";
const FLAG_SAMPLED: u8 = 0x01;

/// 128-bit trace identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(u128);

impl TraceId {
    fn generate() -> Self {
        Self(fastrand::u128(1..))
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// 64-bit span identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(u64);

impl SpanId {
    fn generate() -> Self {
        Self(fastrand::u64(1..))
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors decoding a `traceparent` header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceContextError {
    #[error("malformed traceparent: {0}")]
    Malformed(String),

    #[error("unsupported traceparent version {0}")]
    UnsupportedVersion(String),

    #[error("traceparent carries an all-zero id")]
    ZeroId,
}

/// The part of a span that crosses process boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub sampled: bool,
}

impl SpanContext {
    /// Encode as `00-<trace id>-<span id>-<flags>`.
    pub fn to_traceparent(&self) -> String {
        let flags = if self.sampled { FLAG_SAMPLED } else { 0 };
        format!(
            "{}-{}-{}-{:02x}",
            TRACEPARENT_VERSION, self.trace_id, self.span_id, flags
        )
    }

    /// Decode a `traceparent` header value.
    pub fn from_traceparent(value: &str) -> Result<Self, TraceContextError> {
        let malformed = || TraceContextError::Malformed(value.to_string());

        let parts: Vec<&str> = value.trim().split('-').collect();
        if parts.len() < 4 {
            return Err(malformed());
        }
        let (version, trace_id, span_id, flags) = (parts[0], parts[1], parts[2], parts[3]);

        if version.len() != 2 || !is_lower_hex(version) {
            return Err(malformed());
        }
        if version == "ff" {
            return Err(TraceContextError::UnsupportedVersion(version.to_string()));
        }
        // Version 00 has exactly four fields; later versions may append more.
        if version == TRACEPARENT_VERSION && parts.len() != 4 {
            return Err(malformed());
        }
        if trace_id.len() != 32 || span_id.len() != 16 || flags.len() != 2 {
            return Err(malformed());
        }
        if !is_lower_hex(trace_id) || !is_lower_hex(span_id) || !is_lower_hex(flags) {
            return Err(malformed());
        }

        let trace_id = u128::from_str_radix(trace_id, 16).map_err(|_| malformed())?;
        let span_id = u64::from_str_radix(span_id, 16).map_err(|_| malformed())?;
        let flags = u8::from_str_radix(flags, 16).map_err(|_| malformed())?;
        if trace_id == 0 || span_id == 0 {
            return Err(TraceContextError::ZeroId);
        }

        Ok(Self {
            trace_id: TraceId(trace_id),
            span_id: SpanId(span_id),
            sampled: flags & FLAG_SAMPLED != 0,
        })
    }
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Write `ctx` onto outbound request headers.
pub fn inject(ctx: &SpanContext, headers: &mut HeaderMap) {
    if let Ok(value) = HeaderValue::from_str(&ctx.to_traceparent()) {
        headers.insert(TRACEPARENT, value);
    }
}

/// Read the caller's trace context from incoming headers.
///
/// A missing or invalid header yields `None`; the receiver then starts a new trace.
pub fn extract(headers: &HeaderMap) -> Option<SpanContext> {
    let value = headers.get(TRACEPARENT)?.to_str().ok()?;
    match SpanContext::from_traceparent(value) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring incoming trace context");
            None
        }
    }
}

/// A closed span as handed to the export sink.
#[derive(Debug, Clone)]
pub struct FinishedSpan {
    pub name: String,
    pub service: String,
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub parent_span_id: Option<SpanId>,
    pub started_at: SystemTime,
    pub duration: Duration,
}

/// Destination for finished spans.
pub trait SpanSink: Send + Sync {
    fn export(&self, span: FinishedSpan);
}

/// Emits each finished span as a structured log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SpanSink for LogSink {
    fn export(&self, span: FinishedSpan) {
        tracing::info!(
            target: "spans",
            service = %span.service,
            span = %span.name,
            trace_id = %span.trace_id,
            span_id = %span.span_id,
            parent_span_id = %span.parent_span_id.map(|id| id.to_string()).unwrap_or_default(),
            duration_ms = span.duration.as_secs_f64() * 1000.0,
            "Span finished"
        );
    }
}

/// Keeps finished spans in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    spans: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every span finished so far, in closing order.
    pub fn finished(&self) -> Vec<FinishedSpan> {
        self.spans
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SpanSink for RecordingSink {
    fn export(&self, span: FinishedSpan) {
        self.spans
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(span);
    }
}

/// Span factory for one service.
#[derive(Clone)]
pub struct Tracer {
    service: Arc<str>,
    sink: Arc<dyn SpanSink>,
}

impl Tracer {
    pub fn new(service: impl Into<String>, sink: Arc<dyn SpanSink>) -> Self {
        Self {
            service: Arc::from(service.into()),
            sink,
        }
    }

    /// Tracer exporting to the log.
    pub fn logging(service: impl Into<String>) -> Self {
        Self::new(service, Arc::new(LogSink))
    }

    /// Open a span. With a parent, the span joins the parent's trace.
    pub fn start(&self, name: &str, parent: Option<&SpanContext>) -> Span {
        let context = SpanContext {
            trace_id: parent.map_or_else(TraceId::generate, |p| p.trace_id),
            span_id: SpanId::generate(),
            sampled: parent.map_or(true, |p| p.sampled),
        };
        let log_span = tracing::info_span!(
            "trace_span",
            span_name = %name,
            trace_id = %context.trace_id,
            span_id = %context.span_id,
        );

        Span {
            name: name.to_string(),
            tracer: self.clone(),
            context,
            parent_span_id: parent.map(|p| p.span_id),
            started_at: SystemTime::now(),
            started: Instant::now(),
            log_span,
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("service", &self.service)
            .finish()
    }
}

/// An open span. Closed when ended or dropped, whichever comes first.
pub struct Span {
    name: String,
    tracer: Tracer,
    context: SpanContext,
    parent_span_id: Option<SpanId>,
    started_at: SystemTime,
    started: Instant,
    log_span: tracing::Span,
}

impl Span {
    pub fn context(&self) -> SpanContext {
        self.context
    }

    /// The `tracing` span carrying this span's ids, for log correlation.
    pub fn log_span(&self) -> &tracing::Span {
        &self.log_span
    }

    pub fn end(self) {
        drop(self);
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        self.tracer.sink.export(FinishedSpan {
            name: std::mem::take(&mut self.name),
            service: self.tracer.service.to_string(),
            trace_id: self.context.trace_id,
            span_id: self.context.span_id,
            parent_span_id: self.parent_span_id,
            started_at: self.started_at,
            duration: self.started.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_tracer() -> (Tracer, RecordingSink) {
        let sink = RecordingSink::new();
        (Tracer::new("test-service", Arc::new(sink.clone())), sink)
    }

    #[test]
    fn test_traceparent_known_value() {
        let value = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
        let ctx = SpanContext::from_traceparent(value).unwrap();
        assert!(ctx.sampled);
        assert_eq!(ctx.trace_id.to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
        assert_eq!(ctx.span_id.to_string(), "00f067aa0ba902b7");
        assert_eq!(ctx.to_traceparent(), value);
    }

    #[test]
    fn test_traceparent_rejects_invalid() {
        let cases = [
            "",
            "garbage",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7",
            "00-4BF92F3577B34DA6A3CE929D0E0E4736-00f067aa0ba902b7-01",
            "00-4bf92f3577b34da6a3ce929d0e0e473-00f067aa0ba902b7-01",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-extra",
        ];
        for value in cases {
            assert!(
                matches!(
                    SpanContext::from_traceparent(value),
                    Err(TraceContextError::Malformed(_))
                ),
                "{value:?} should be malformed"
            );
        }

        assert_eq!(
            SpanContext::from_traceparent(
                "ff-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
            ),
            Err(TraceContextError::UnsupportedVersion("ff".into()))
        );
        assert_eq!(
            SpanContext::from_traceparent(
                "00-00000000000000000000000000000000-00f067aa0ba902b7-01"
            ),
            Err(TraceContextError::ZeroId)
        );
    }

    #[test]
    fn test_inject_then_extract_headers() {
        let (tracer, _sink) = recording_tracer();
        let span = tracer.start("outbound", None);

        let mut headers = HeaderMap::new();
        inject(&span.context(), &mut headers);
        assert_eq!(extract(&headers), Some(span.context()));
    }

    #[test]
    fn test_extract_ignores_missing_or_bad_header() {
        assert_eq!(extract(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(TRACEPARENT, HeaderValue::from_static("not-a-trace"));
        assert_eq!(extract(&headers), None);
    }

    #[test]
    fn test_child_span_joins_parent_trace() {
        let (tracer, sink) = recording_tracer();

        let parent = tracer.start("start", None);
        let child = tracer.start("getting location", Some(&parent.context()));
        assert_eq!(child.context().trace_id, parent.context().trace_id);
        assert_ne!(child.context().span_id, parent.context().span_id);

        let parent_id = parent.context().span_id;
        child.end();
        parent.end();

        let spans = sink.finished();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name, "getting location");
        assert_eq!(spans[0].parent_span_id, Some(parent_id));
        assert_eq!(spans[1].name, "start");
        assert_eq!(spans[1].parent_span_id, None);
        assert_eq!(spans[1].service, "test-service");
    }

    #[test]
    fn test_span_closed_once_on_early_return() {
        let (tracer, sink) = recording_tracer();

        fn fails(tracer: &Tracer) -> Result<(), &'static str> {
            let _span = tracer.start("fallible", None);
            Err::<(), _>("boom")?;
            Ok(())
        }

        assert!(fails(&tracer).is_err());
        assert_eq!(sink.finished().len(), 1);
    }

    #[test]
    fn test_unsampled_parent_propagates_flag() {
        let (tracer, _sink) = recording_tracer();
        let parent = SpanContext::from_traceparent(
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00",
        )
        .unwrap();

        let span = tracer.start("start", Some(&parent));
        assert!(!span.context().sampled);
        assert!(span.context().to_traceparent().ends_with("-00"));
    }
}
