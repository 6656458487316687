//! Observability: fold telemetry (metrics) and sink abstractions.
//!
//! Aggregation logic never touches `obs::metrics` directly; every
//! counter update flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EventOps, EventReport, EventState, ReducerCounters, ReducerSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
