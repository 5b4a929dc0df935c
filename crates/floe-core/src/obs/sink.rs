use std::time::{Duration, Instant};

///
/// TraceOp
///
/// The session operations a sink can observe.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TraceOp {
    Get,
    GetOne,
    Page,
    Save,
    Delete,
}

impl TraceOp {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::GetOne => "get_one",
            Self::Page => "page",
            Self::Save => "save",
            Self::Delete => "delete",
        }
    }
}

///
/// TraceEvent
///
/// Tracing is optional, injected by the caller, and must not affect
/// operation semantics.
///

#[derive(Clone, Debug)]
pub enum TraceEvent {
    Started {
        op: TraceOp,
        collection: String,
    },
    Finished {
        op: TraceOp,
        collection: String,
        rows: u64,
        elapsed: Duration,
    },
    Failed {
        op: TraceOp,
        collection: String,
        elapsed: Duration,
    },
}

///
/// TraceSink
///

pub trait TraceSink: Send + Sync {
    fn on_event(&self, event: TraceEvent);
}

///
/// LogSink
///
/// Writes one line per completed operation to stderr. Meant for debug
/// harnesses; production callers bring their own sink.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn on_event(&self, event: TraceEvent) {
        match event {
            TraceEvent::Started { .. } => {}
            TraceEvent::Finished {
                op,
                collection,
                rows,
                elapsed,
            } => {
                eprintln!(
                    "floe: {} {collection} rows={rows} elapsed={elapsed:?}",
                    op.label()
                );
            }
            TraceEvent::Failed {
                op,
                collection,
                elapsed,
            } => {
                eprintln!(
                    "floe: {} {collection} failed elapsed={elapsed:?}",
                    op.label()
                );
            }
        }
    }
}

///
/// OpSpan
///
/// Measures one operation and reports it to an optional sink.
///

pub(crate) struct OpSpan<'a> {
    sink: Option<&'a dyn TraceSink>,
    op: TraceOp,
    collection: &'a str,
    started: Instant,
}

impl<'a> OpSpan<'a> {
    pub(crate) fn start(sink: Option<&'a dyn TraceSink>, op: TraceOp, collection: &'a str) -> Self {
        if let Some(sink) = sink {
            sink.on_event(TraceEvent::Started {
                op,
                collection: collection.to_string(),
            });
        }

        Self {
            sink,
            op,
            collection,
            started: Instant::now(),
        }
    }

    pub(crate) fn finish(self, rows: u64) {
        if let Some(sink) = self.sink {
            sink.on_event(TraceEvent::Finished {
                op: self.op,
                collection: self.collection.to_string(),
                rows,
                elapsed: self.started.elapsed(),
            });
        }
    }

    pub(crate) fn fail(self) {
        if let Some(sink) = self.sink {
            sink.on_event(TraceEvent::Failed {
                op: self.op,
                collection: self.collection.to_string(),
                elapsed: self.started.elapsed(),
            });
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<TraceEvent>>);

    impl TraceSink for Recorder {
        fn on_event(&self, event: TraceEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn span_reports_start_and_finish() {
        let recorder = Recorder::default();

        let span = OpSpan::start(Some(&recorder), TraceOp::Get, "users");
        span.finish(3);

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            TraceEvent::Started {
                op: TraceOp::Get,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            TraceEvent::Finished { rows: 3, .. }
        ));
    }

    #[test]
    fn span_reports_failure() {
        let recorder = Recorder::default();

        let span = OpSpan::start(Some(&recorder), TraceOp::Save, "users");
        span.fail();

        let events = recorder.0.lock().unwrap();
        assert!(matches!(
            events[1],
            TraceEvent::Failed {
                op: TraceOp::Save,
                ..
            }
        ));
    }

    #[test]
    fn absent_sink_is_a_no_op() {
        let span = OpSpan::start(None, TraceOp::Delete, "users");
        span.finish(1);
    }
}
