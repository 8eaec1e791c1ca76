//! Collection query shape.
//!
//! A query names one collection and a conjunction of field filters. It is
//! plain data; `DocumentRepository` implementations decide how to execute it.

use crate::repo::document::FieldValue;

/// Comparison operator of one field filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl FilterOp {
    pub(crate) fn sql_operator(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }
}

/// `field op value` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FieldValue,
}

/// Filtered read against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub collection: String,
    /// All filters must hold (logical AND).
    pub filters: Vec<FieldFilter>,
}

impl CollectionQuery {
    /// Creates an unfiltered query over `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
        }
    }

    /// Adds one filter and returns the extended query.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Whether the query has no filters.
    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty()
    }
}
