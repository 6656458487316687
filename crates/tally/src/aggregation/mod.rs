//! Module: aggregation
//! Responsibility: the aggregation description (filter, seed, fields, reducer)
//! and its mutation surface.
//! Does not own: document selection semantics (`query`) or telemetry (`obs`).
//! Boundary: validated configuration consumed by the evaluator in `fold`.

mod accumulator;
mod factory;
mod fold;
mod reducer;


use crate::{error::AggregationError, query::Query, value::NumericPolicy};
use serde::Deserialize;
use serde_json::Value as JsonValue;

// re-exports
pub use accumulator::Accumulator;
pub use factory::{average, count, max, min, sum};
pub use fold::AggregationFold;
pub use reducer::{AVERAGE_KEY, COUNT_KEY, CustomReducer, MAX_KEY, MIN_KEY, Reducer, SUM_KEY};

///
/// AggregationConfig
///
/// Construction input for `Aggregation::new`. Every key is optional;
/// unset keys take the defaults below.
///
/// - `query`: none
/// - `initial`: empty accumulator
/// - `fields`: empty
/// - `reducer`: `Reducer::Noop`
/// - `numeric`: `NumericPolicy::Lenient`
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub query: Option<Query>,
    pub initial: Accumulator,
    pub fields: Vec<String>,
    pub reducer: Reducer,
    pub numeric: NumericPolicy,
}

///
/// Aggregation
///
/// Describes how to group/reduce a document collection into a summary.
///
/// The typed API cannot produce a malformed aggregation. The JSON surface
/// (`from_json`, `try_set_query_json`, `try_set_fields_json`) re-validates
/// `query` and `fields` at every mutation point.
///

#[derive(Clone, Debug, Default)]
pub struct Aggregation {
    query: Option<Query>,
    initial: Accumulator,
    fields: Vec<String>,
    reducer: Reducer,
    numeric: NumericPolicy,
}

impl Aggregation {
    #[must_use]
    pub fn new(config: AggregationConfig) -> Self {
        let AggregationConfig {
            query,
            initial,
            fields,
            reducer,
            numeric,
        } = config;

        Self {
            query,
            initial,
            fields,
            reducer,
            numeric,
        }
    }

    /// Build an aggregation from a JSON-shaped configuration object.
    ///
    /// Recognised keys: `query`, `initial`, `fields`, `reducer`, `numeric`.
    /// Other keys are ignored.
    pub fn from_json(config: &JsonValue) -> Result<Self, AggregationError> {
        let JsonValue::Object(map) = config else {
            return Err(AggregationError::invalid_argument(
                "aggregation config must be an object",
            ));
        };

        let mut aggregation = Self::default();

        if let Some(query) = map.get("query") {
            aggregation.try_set_query_json(query)?;
        }
        if let Some(fields) = map.get("fields") {
            aggregation.try_set_fields_json(fields)?;
        }
        if let Some(initial) = map.get("initial") {
            aggregation.initial = Accumulator::deserialize(initial).map_err(|err| {
                AggregationError::invalid_argument(format!("initial must be an object: {err}"))
            })?;
        }
        if let Some(reducer) = map.get("reducer") {
            aggregation.reducer = Reducer::deserialize(reducer).map_err(|err| {
                AggregationError::invalid_argument(format!("unknown reducer: {err}"))
            })?;
        }
        if let Some(numeric) = map.get("numeric") {
            aggregation.numeric = NumericPolicy::deserialize(numeric).map_err(|err| {
                AggregationError::invalid_argument(format!("unknown numeric policy: {err}"))
            })?;
        }

        Ok(aggregation)
    }

    // ------------------------------------------------------------------
    // query
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn set_query(&mut self, query: Option<Query>) {
        self.query = query;
    }

    /// Replace the query from JSON; `null` clears it.
    ///
    /// A query object carries at least one query key, so a bare `{}` is
    /// rejected along with non-objects.
    pub fn try_set_query_json(&mut self, query: &JsonValue) -> Result<(), AggregationError> {
        self.query = match query {
            JsonValue::Null => None,
            JsonValue::Object(map) if !map.is_empty() => {
                Some(Query::deserialize(query).map_err(|_| AggregationError::query_not_query())?)
            }
            _ => return Err(AggregationError::query_not_query()),
        };

        Ok(())
    }

    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    // ------------------------------------------------------------------
    // fields
    // ------------------------------------------------------------------

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn set_fields<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
    }

    /// Replace the fields from JSON; only an array of strings is accepted.
    pub fn try_set_fields_json(&mut self, fields: &JsonValue) -> Result<(), AggregationError> {
        let JsonValue::Array(items) = fields else {
            return Err(AggregationError::fields_not_strings());
        };

        self.fields = items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(AggregationError::fields_not_strings)
            })
            .collect::<Result<_, _>>()?;

        Ok(())
    }

    /// Append a field and return `self` for chaining.
    /// Duplicates are kept in order.
    pub fn by(&mut self, field: impl Into<String>) -> &mut Self {
        self.fields.push(field.into());
        self
    }

    /// Owned form of `by` for builder-style construction.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.by(field);
        self
    }

    // ------------------------------------------------------------------
    // initial / reducer / numeric policy
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn initial(&self) -> &Accumulator {
        &self.initial
    }

    pub fn set_initial(&mut self, initial: Accumulator) {
        self.initial = initial;
    }

    #[must_use]
    pub const fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    pub fn set_reducer(&mut self, reducer: Reducer) {
        self.reducer = reducer;
    }

    #[must_use]
    pub const fn numeric_policy(&self) -> NumericPolicy {
        self.numeric
    }

    #[must_use]
    pub const fn with_numeric_policy(mut self, numeric: NumericPolicy) -> Self {
        self.numeric = numeric;
        self
    }
}

impl From<AggregationConfig> for Aggregation {
    fn from(config: AggregationConfig) -> Self {
        Self::new(config)
    }
}

impl TryFrom<JsonValue> for Aggregation {
    type Error = AggregationError;

    fn try_from(config: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json(&config)
    }
}
