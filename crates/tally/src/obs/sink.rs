//! Metrics sink boundary.
//!
//! The evaluator MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between fold execution
//! and the thread-local metrics state.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    FoldStart {
        reducer: &'static str,
    },
    FoldFinish {
        reducer: &'static str,
        docs_scanned: u64,
        docs_matched: u64,
        reduce_steps: u64,
    },
    FoldRejected {
        reducer: &'static str,
        docs_matched: u64,
        reduce_steps: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::FoldStart { reducer } => {
                metrics::with_state_mut(|m| {
                    m.ops.fold_calls = m.ops.fold_calls.saturating_add(1);

                    let entry = m.reducers.entry(reducer.to_string()).or_default();
                    entry.fold_calls = entry.fold_calls.saturating_add(1);
                });
            }

            MetricsEvent::FoldFinish {
                reducer,
                docs_scanned,
                docs_matched,
                reduce_steps,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.folds_finished = m.ops.folds_finished.saturating_add(1);
                    m.ops.docs_scanned = m.ops.docs_scanned.saturating_add(docs_scanned);
                    m.ops.docs_matched = m.ops.docs_matched.saturating_add(docs_matched);
                    m.ops.reduce_steps = m.ops.reduce_steps.saturating_add(reduce_steps);

                    let entry = m.reducers.entry(reducer.to_string()).or_default();
                    entry.docs_matched = entry.docs_matched.saturating_add(docs_matched);
                    entry.reduce_steps = entry.reduce_steps.saturating_add(reduce_steps);
                });
            }

            MetricsEvent::FoldRejected {
                reducer,
                docs_matched,
                reduce_steps,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.folds_rejected = m.ops.folds_rejected.saturating_add(1);
                    m.ops.docs_matched = m.ops.docs_matched.saturating_add(docs_matched);
                    m.ops.reduce_steps = m.ops.reduce_steps.saturating_add(reduce_steps);

                    let entry = m.reducers.entry(reducer.to_string()).or_default();
                    entry.folds_rejected = entry.folds_rejected.saturating_add(1);
                    entry.docs_matched = entry.docs_matched.saturating_add(docs_matched);
                    entry.reduce_steps = entry.reduce_steps.saturating_add(reduce_steps);
                });
            }
        }
    }
}

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state for the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
/// The previous sink is restored on every exit, unwinding included.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// FoldSpan
/// RAII guard that emits start/finish events for one evaluator call.
/// A span dropped without `finish` is reported as rejected.
///

pub(crate) struct FoldSpan {
    reducer: &'static str,
    docs_scanned: u64,
    docs_matched: u64,
    reduce_steps: u64,
    finished: bool,
}

impl FoldSpan {
    #[must_use]
    pub(crate) fn new(reducer: &'static str, docs_scanned: u64) -> Self {
        record(MetricsEvent::FoldStart { reducer });

        Self {
            reducer,
            docs_scanned,
            docs_matched: 0,
            reduce_steps: 0,
            finished: false,
        }
    }

    pub(crate) const fn set_progress(&mut self, docs_matched: u64, reduce_steps: u64) {
        self.docs_matched = docs_matched;
        self.reduce_steps = reduce_steps;
    }

    pub(crate) fn finish(mut self) {
        record(MetricsEvent::FoldFinish {
            reducer: self.reducer,
            docs_scanned: self.docs_scanned,
            docs_matched: self.docs_matched,
            reduce_steps: self.reduce_steps,
        });
        self.finished = true;
    }
}

impl Drop for FoldSpan {
    fn drop(&mut self) {
        if !self.finished {
            record(MetricsEvent::FoldRejected {
                reducer: self.reducer,
                docs_matched: self.docs_matched,
                reduce_steps: self.reduce_steps,
            });
            self.finished = true;
        }
    }
}
