//! Module: query
//! Responsibility: filter/sort/window specification referenced by aggregations.
//! Does not own: aggregation reduction or any transport encoding.
//! Boundary: `Query::apply` selects the documents an evaluator folds.

mod predicate;

#[cfg(test)]
mod tests;

use crate::value::{Document, Value, compare_order};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// re-exports
pub use predicate::{
    CompareOp, ComparePredicate, Predicate, eq, exists, gt, gte, in_list, is_null, lt, lte, ne,
};

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

///
/// SortField
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

///
/// Query
///
/// Filter, sort, and skip/limit window over a document collection.
/// Unknown keys are rejected on deserialization so an arbitrary object is
/// never mistaken for a query.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Query {
    filter: Option<Predicate>,
    sort: Vec<SortField>,
    skip: usize,
    limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter predicate.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// AND a predicate into the current filter.
    #[must_use]
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(current) => current & predicate,
            None => predicate,
        });
        self
    }

    /// OR a predicate into the current filter.
    #[must_use]
    pub fn or(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(current) => current | predicate,
            None => predicate,
        });
        self
    }

    #[must_use]
    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort_by(field, SortDirection::Asc)
    }

    #[must_use]
    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort_by(field, SortDirection::Desc)
    }

    fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortField {
            field: field.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub const fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn sort_fields(&self) -> &[SortField] {
        &self.sort
    }

    #[must_use]
    pub const fn skip_count(&self) -> usize {
        self.skip
    }

    #[must_use]
    pub const fn limit_count(&self) -> Option<usize> {
        self.limit
    }

    /// Return true when `doc` passes the filter (or there is none).
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.filter.as_ref().is_none_or(|p| p.matches(doc))
    }

    /// Select documents: filter, stable sort, then skip and limit.
    #[must_use]
    pub fn apply<'a>(&self, docs: &'a [Document]) -> Vec<&'a Document> {
        let mut selected: Vec<&Document> = docs.iter().filter(|doc| self.matches(doc)).collect();

        if !self.sort.is_empty() {
            selected.sort_by(|a, b| self.compare_docs(a, b));
        }

        selected
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }

    fn compare_docs(&self, a: &Document, b: &Document) -> Ordering {
        for key in &self.sort {
            let ord = sort_cmp(a.field(&key.field), b.field(&key.field));
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        Ordering::Equal
    }
}

// Absent sorts first, then null, then by variant family; same-family values
// use the comparison order and otherwise tie.
fn sort_cmp(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let rank = sort_rank(left).cmp(&sort_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    match (left, right) {
        (Some(l), Some(r)) => compare_order(l, r).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

const fn sort_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Int(_) | Value::Float(_)) => 3,
        Some(Value::Text(_)) => 4,
        Some(Value::List(_)) => 5,
        Some(Value::Map(_)) => 6,
    }
}
