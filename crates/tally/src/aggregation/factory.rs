//! Preconfigured aggregations over a single field.
//!
//! The field name is not validated; `""` is accepted and simply looks up
//! the empty-named field at evaluation time.

use crate::aggregation::{Aggregation, AggregationConfig, Reducer};

fn single_field(reducer: Reducer, field: impl Into<String>) -> Aggregation {
    Aggregation::new(AggregationConfig {
        initial: reducer.initial(),
        fields: vec![field.into()],
        reducer,
        ..AggregationConfig::default()
    })
}

/// Count documents per distinct truthy value of `field`.
///
/// Produces a histogram keyed by value, e.g. `{red: 2, blue: 1}`.
#[must_use]
pub fn count(field: impl Into<String>) -> Aggregation {
    single_field(Reducer::Count, field)
}

/// Sum `field` across documents into `{sum}`.
#[must_use]
pub fn sum(field: impl Into<String>) -> Aggregation {
    single_field(Reducer::Sum, field)
}

/// Smallest value of `field` into `{min}`, seeded at +∞.
#[must_use]
pub fn min(field: impl Into<String>) -> Aggregation {
    single_field(Reducer::Min, field)
}

/// Largest value of `field` into `{max}`, seeded at −∞.
#[must_use]
pub fn max(field: impl Into<String>) -> Aggregation {
    single_field(Reducer::Max, field)
}

/// Streaming mean of `field` into `{count, average}`.
#[must_use]
pub fn average(field: impl Into<String>) -> Aggregation {
    single_field(Reducer::Average, field)
}
