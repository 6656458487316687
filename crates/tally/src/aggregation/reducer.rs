//! Module: aggregation::reducer
//! Responsibility: the closed set of reduction strategies and their fold step.
//! Does not own: document selection or fold orchestration.
//! Boundary: one `step` call folds one document field into an accumulator.

use crate::{
    aggregation::Accumulator,
    error::ReduceError,
    value::{Document, NumericPolicy, Value, coerce_number},
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

///
/// CONSTANTS
///

pub const SUM_KEY: &str = "sum";
pub const MIN_KEY: &str = "min";
pub const MAX_KEY: &str = "max";
pub const COUNT_KEY: &str = "count";
pub const AVERAGE_KEY: &str = "average";

type ReduceFn = dyn Fn(&mut Accumulator, &Document, &str) -> Result<(), ReduceError> + Send + Sync;

///
/// CustomReducer
///
/// Caller-supplied fold step. Identity is the shared closure, so clones
/// compare equal and independently built reducers never do.
///

#[derive(Clone)]
pub struct CustomReducer {
    name: &'static str,
    func: Arc<ReduceFn>,
}

impl CustomReducer {
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&mut Accumulator, &Document, &str) -> Result<(), ReduceError> + Send + Sync + 'static,
    {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for CustomReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomReducer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomReducer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

///
/// Reducer
///
/// Reduction strategy applied once per (document, field) pair.
/// Built-ins deserialize from their snake_case names; `Custom` is code-only.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    /// Contributes nothing; the accumulator passes through unchanged.
    #[default]
    Noop,
    /// Histogram of truthy field values keyed by their bucket key.
    Count,
    Sum,
    Min,
    Max,
    /// Streaming mean with its running count.
    Average,
    #[serde(skip)]
    Custom(CustomReducer),
}

impl Reducer {
    /// Wrap a closure as a custom reducer.
    pub fn custom<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&mut Accumulator, &Document, &str) -> Result<(), ReduceError> + Send + Sync + 'static,
    {
        Self::Custom(CustomReducer::new(name, func))
    }

    /// Stable label used by diagnostics and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Average => "average",
            Self::Custom(custom) => custom.name(),
        }
    }

    /// Identity accumulator for this strategy.
    #[must_use]
    pub fn initial(&self) -> Accumulator {
        match self {
            Self::Noop | Self::Count | Self::Custom(_) => Accumulator::new(),
            Self::Sum => Accumulator::new().with(SUM_KEY, 0.0),
            Self::Min => Accumulator::new().with(MIN_KEY, f64::INFINITY),
            Self::Max => Accumulator::new().with(MAX_KEY, f64::NEG_INFINITY),
            Self::Average => Accumulator::new()
                .with(COUNT_KEY, Value::Int(0))
                .with(AVERAGE_KEY, 0.0),
        }
    }

    /// Fold `doc[field]` into `acc`.
    pub fn step(
        &self,
        acc: &mut Accumulator,
        doc: &Document,
        field: &str,
        policy: NumericPolicy,
    ) -> Result<(), ReduceError> {
        match self {
            Self::Noop => Ok(()),
            Self::Count => match doc.field(field) {
                Some(value) if value.is_truthy() => acc.bump_bucket(&value.bucket_key(), policy),
                _ => Ok(()),
            },
            Self::Sum => {
                let x = operand(doc, field, policy)?;
                let sum = acc.number(SUM_KEY, policy)?;
                acc.set_number(SUM_KEY, sum + x);
                Ok(())
            }
            Self::Min => {
                let x = operand(doc, field, policy)?;
                let min = acc.number(MIN_KEY, policy)?;
                acc.set_number(MIN_KEY, nan_min(min, x));
                Ok(())
            }
            Self::Max => {
                let x = operand(doc, field, policy)?;
                let max = acc.number(MAX_KEY, policy)?;
                acc.set_number(MAX_KEY, nan_max(max, x));
                Ok(())
            }
            Self::Average => {
                let x = operand(doc, field, policy)?;
                let count = acc.number(COUNT_KEY, policy)?;
                let average = acc.number(AVERAGE_KEY, policy)?;
                acc.set_number(AVERAGE_KEY, average.mul_add(count, x) / (count + 1.0));
                acc.increment(COUNT_KEY, policy)
            }
            Self::Custom(custom) => (custom.func)(acc, doc, field),
        }
    }
}

// Read the document operand as a number, naming the field on rejection.
fn operand(doc: &Document, field: &str, policy: NumericPolicy) -> Result<f64, ReduceError> {
    let value = doc.field(field);

    coerce_number(value, policy).ok_or_else(|| ReduceError::NonNumeric {
        field: field.to_string(),
        found: value.map_or("absent", Value::kind),
    })
}

// f64::min/max drop NaN operands; these propagate them instead.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
