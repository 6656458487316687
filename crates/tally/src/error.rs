//! Module: error
//! Responsibility: construction and evaluation error taxonomy.
//! Does not own: recovery policy; every error surfaces to the caller as-is.

use thiserror::Error as ThisError;

///
/// AggregationError
///
/// Construction-time failure for an aggregation description.
/// Raised when configuration or a later mutation would leave the
/// aggregation malformed.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AggregationError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl AggregationError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn query_not_query() -> Self {
        Self::invalid_argument("query must be a query object")
    }

    pub(crate) fn fields_not_strings() -> Self {
        Self::invalid_argument("fields must be an array of strings")
    }
}

///
/// ReduceError
///
/// Evaluation-time failure raised while folding documents.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum ReduceError {
    #[error("field '{field}' is not numeric (found {found})")]
    NonNumeric { field: String, found: &'static str },

    #[error("accumulator slot '{key}' does not hold a number")]
    AccumulatorType { key: String },

    #[error("{message}")]
    Custom { message: String },
}

impl ReduceError {
    /// Construct a custom reducer failure.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}
