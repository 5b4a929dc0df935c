//! Module: obs
//! Responsibility: operation tracing sinks.
//! Boundary: session logic must not print or measure on its own; all
//! instrumentation flows through TraceEvent and TraceSink.

mod sink;

pub use sink::{LogSink, TraceEvent, TraceOp, TraceSink};

pub(crate) use sink::OpSpan;
