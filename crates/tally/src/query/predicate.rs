//! Module: query::predicate
//! Responsibility: filter predicate AST, its builders, and row evaluation.
//! Does not own: sort/skip/limit windowing.
//! Boundary: pure, schema-agnostic filtering over `Document` fields.

use crate::value::{Document, Value, compare_eq, compare_order};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    ops::{BitAnd, BitOr, Not},
};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    fn eval(&self, actual: &Value) -> bool {
        match self.op {
            CompareOp::Eq => compare_eq(actual, &self.value),
            CompareOp::Ne => !compare_eq(actual, &self.value),
            CompareOp::Lt => compare_order(actual, &self.value) == Some(Ordering::Less),
            CompareOp::Lte => matches!(
                compare_order(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            CompareOp::Gt => compare_order(actual, &self.value) == Some(Ordering::Greater),
            CompareOp::Gte => matches!(
                compare_order(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompareOp::In => self
                .list()
                .is_some_and(|items| items.iter().any(|item| compare_eq(actual, item))),
            CompareOp::NotIn => self
                .list()
                .is_some_and(|items| !items.iter().any(|item| compare_eq(actual, item))),
        }
    }

    fn list(&self) -> Option<&[Value]> {
        match &self.value {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

///
/// Predicate
///
/// Filter tree evaluated against one document at a time.
/// Comparisons against an absent field are always false; `Ne` included.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    IsNull { field: String },
    Exists { field: String },
}

impl Predicate {
    /// Evaluate this predicate against one document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::And(children) => children.iter().all(|child| child.matches(doc)),
            Self::Or(children) => children.iter().any(|child| child.matches(doc)),
            Self::Not(inner) => !inner.matches(doc),
            Self::Compare(cmp) => doc.field(&cmp.field).is_some_and(|v| cmp.eval(v)),
            Self::IsNull { field } => matches!(doc.field(field), Some(Value::Null)),
            Self::Exists { field } => doc.field(field).is_some(),
        }
    }

    // Flatten same-kind nodes so chained builders stay shallow.
    fn join(self, rhs: Self, and: bool) -> Self {
        match (self, and) {
            (Self::And(mut children), true) => {
                children.push(rhs);
                Self::And(children)
            }
            (Self::Or(mut children), false) => {
                children.push(rhs);
                Self::Or(children)
            }
            (lhs, true) => Self::And(vec![lhs, rhs]),
            (lhs, false) => Self::Or(vec![lhs, rhs]),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.join(rhs, true)
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.join(rhs, false)
    }
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

// ------------------------------------------------------------------
// Builders
// ------------------------------------------------------------------

fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Predicate {
    Predicate::Compare(ComparePredicate::new(field, op, value))
}

#[must_use]
pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Predicate {
    compare(field, CompareOp::Eq, value)
}

#[must_use]
pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Predicate {
    compare(field, CompareOp::Ne, value)
}

#[must_use]
pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Predicate {
    compare(field, CompareOp::Lt, value)
}

#[must_use]
pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Predicate {
    compare(field, CompareOp::Lte, value)
}

#[must_use]
pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Predicate {
    compare(field, CompareOp::Gt, value)
}

#[must_use]
pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Predicate {
    compare(field, CompareOp::Gte, value)
}

/// Membership test against a fixed list.
#[must_use]
pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Predicate
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    compare(
        field,
        CompareOp::In,
        Value::List(values.into_iter().map(Into::into).collect()),
    )
}

/// Field is present and explicitly null.
#[must_use]
pub fn is_null(field: impl Into<String>) -> Predicate {
    Predicate::IsNull {
        field: field.into(),
    }
}

/// Field is present, whatever its value.
#[must_use]
pub fn exists(field: impl Into<String>) -> Predicate {
    Predicate::Exists {
        field: field.into(),
    }
}
