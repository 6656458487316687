//! Tally: aggregation descriptions (filter, seed, grouping fields, reducer),
//! the factories for common reductions, and a local evaluator.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregation;
pub mod error;
pub mod obs;
pub mod query;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        aggregation::{
            Accumulator, Aggregation, AggregationConfig, Reducer, average, count, max, min, sum,
        },
        query::{Predicate, Query},
        value::{Document, NumericPolicy, Value},
    };
}
