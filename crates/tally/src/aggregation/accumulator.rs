use crate::{
    error::ReduceError,
    value::{NumericPolicy, Value, coerce_number},
};
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Accumulator
///
/// Running result threaded through successive reduction steps.
/// An aggregation's `initial` accumulator is a template; every fold works
/// on its own clone.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, Deserialize, IntoIterator, PartialEq, Serialize,
)]
#[into_iterator(owned, ref)]
#[serde(transparent)]
pub struct Accumulator(BTreeMap<String, Value>);

impl Accumulator {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Read a slot as a number under `policy`.
    pub(crate) fn number(&self, key: &str, policy: NumericPolicy) -> Result<f64, ReduceError> {
        coerce_number(self.0.get(key), policy).ok_or_else(|| ReduceError::AccumulatorType {
            key: key.to_string(),
        })
    }

    pub(crate) fn set_number(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), Value::Float(value));
    }

    /// Add one to a counter slot. Integer slots stay integers; anything
    /// else, an absent slot included, is read through `number` first.
    pub(crate) fn increment(
        &mut self,
        key: &str,
        policy: NumericPolicy,
    ) -> Result<(), ReduceError> {
        let next = match self.0.get(key) {
            Some(Value::Int(n)) => Value::Int(n.saturating_add(1)),
            _ => Value::Float(self.number(key, policy)? + 1.0),
        };
        self.0.insert(key.to_string(), next);

        Ok(())
    }

    /// Bump a histogram bucket, creating it at 1 on first sight.
    pub(crate) fn bump_bucket(
        &mut self,
        key: &str,
        policy: NumericPolicy,
    ) -> Result<(), ReduceError> {
        if self.0.contains_key(key) {
            return self.increment(key, policy);
        }
        self.0.insert(key.to_string(), Value::Int(1));

        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Accumulator {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
