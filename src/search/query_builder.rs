// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Builder - typed filter AST
//!
//! A filter is either a single-field leaf or an `OR` / `AND` combinator over
//! child filters, nested to any depth.
//!
//! # Example
//!
//! ```rust
//! use search_index::search::QueryFilter;
//!
//! // Simple leaf
//! let adults = QueryFilter::field("age").greater_than_or_equals(18);
//!
//! // Boolean combinations
//! let filter = QueryFilter::or([
//!     QueryFilter::field("name").equals("Alice"),
//!     QueryFilter::field("name").equals("Bob"),
//! ])
//! .and(adults);
//! ```
//!
//! The same AST can be parsed from its JSON form:
//!
//! ```text
//! {"age": {"greaterThan": 18}}
//! {"OR": [{"name": {"equals": "A"}}, {"name": {"equals": "B"}}]}
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

use crate::error::SearchError;
use crate::schema::FlattenedField;

/// Filter AST node
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    /// Single-field condition: {field: {operation: value}}
    Leaf(FieldFilter),
    /// At least one child matches
    Or(Vec<QueryFilter>),
    /// All children match
    And(Vec<QueryFilter>),
}

impl QueryFilter {
    /// Start a leaf on `field` (dot-path for nested fields).
    pub fn field(field: impl Into<String>) -> FieldFilter {
        FieldFilter::new(field)
    }

    pub fn or(filters: impl IntoIterator<Item = QueryFilter>) -> Self {
        QueryFilter::Or(filters.into_iter().collect())
    }

    pub fn and(self, other: impl Into<QueryFilter>) -> Self {
        QueryFilter::And(vec![self, other.into()])
    }

    pub fn all(filters: impl IntoIterator<Item = QueryFilter>) -> Self {
        QueryFilter::And(filters.into_iter().collect())
    }

    /// Parse the JSON filter form.
    ///
    /// Rejects unknown operation names and operations without a value
    /// (`null`), before anything is sent.
    pub fn from_value(value: &Value) -> Result<Self, SearchError> {
        let map = value
            .as_object()
            .ok_or_else(|| SearchError::InvalidFilter(format!("expected an object, got {value}")))?;

        if let Some(children) = map.get("OR") {
            return Ok(QueryFilter::Or(parse_children("OR", children)?));
        }
        if let Some(children) = map.get("AND") {
            return Ok(QueryFilter::And(parse_children("AND", children)?));
        }

        let mut entries = map.iter();
        let (field, operations) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (None, _) => return Err(SearchError::InvalidFilter("empty filter object".into())),
            (Some(_), Some(_)) => {
                return Err(SearchError::InvalidFilter(
                    "a filter leaf must name exactly one field".into(),
                ))
            }
        };

        let operations = operations.as_object().ok_or_else(|| {
            SearchError::InvalidFilter(format!("operations for field '{field}' must be an object"))
        })?;

        let mut leaf = FieldFilter::new(field.clone());
        for (name, raw) in operations {
            let operation: Operation = name.parse()?;
            let value = FilterValue::from_json(field, raw)?;
            leaf.conditions.push(Condition { operation, value });
        }
        Ok(QueryFilter::Leaf(leaf))
    }

    /// Check range operations against the declared field types.
    ///
    /// Fields missing from `fields` are not checked.
    pub fn validate(&self, fields: &[FlattenedField]) -> Result<(), SearchError> {
        match self {
            QueryFilter::Or(children) | QueryFilter::And(children) => {
                children.iter().try_for_each(|child| child.validate(fields))
            }
            QueryFilter::Leaf(leaf) => {
                let Some(declared) = fields.iter().find(|f| f.path == leaf.field) else {
                    return Ok(());
                };
                match leaf.conditions.iter().find(|c| c.operation.is_range()) {
                    Some(condition) if !declared.field_type.supports_range() => {
                        Err(SearchError::UnsupportedOperation {
                            field: leaf.field.clone(),
                            operation: condition.operation.to_string(),
                            field_type: declared.field_type.to_string(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

fn parse_children(combinator: &str, value: &Value) -> Result<Vec<QueryFilter>, SearchError> {
    value
        .as_array()
        .ok_or_else(|| SearchError::InvalidFilter(format!("{combinator} expects an array")))?
        .iter()
        .map(QueryFilter::from_value)
        .collect()
}

impl From<FieldFilter> for QueryFilter {
    fn from(leaf: FieldFilter) -> Self {
        QueryFilter::Leaf(leaf)
    }
}

/// Conditions on a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub conditions: Vec<Condition>,
}

/// One operation with its operand. `value` is `None` when the caller gave
/// no operand; compiling such a condition fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operation: Operation,
    pub value: Option<FilterValue>,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            conditions: Vec::new(),
        }
    }

    fn with(mut self, operation: Operation, value: impl Into<FilterValue>) -> QueryFilter {
        self.conditions.push(Condition {
            operation,
            value: Some(value.into()),
        });
        QueryFilter::Leaf(self)
    }

    pub fn equals(self, value: impl Into<FilterValue>) -> QueryFilter {
        self.with(Operation::Equals, value)
    }

    pub fn less_than(self, value: impl Into<FilterValue>) -> QueryFilter {
        self.with(Operation::LessThan, value)
    }

    pub fn less_than_or_equals(self, value: impl Into<FilterValue>) -> QueryFilter {
        self.with(Operation::LessThanOrEquals, value)
    }

    pub fn greater_than(self, value: impl Into<FilterValue>) -> QueryFilter {
        self.with(Operation::GreaterThan, value)
    }

    pub fn greater_than_or_equals(self, value: impl Into<FilterValue>) -> QueryFilter {
        self.with(Operation::GreaterThanOrEquals, value)
    }

    /// Bounded range in one leaf: `{"$range": {"$gte": min, "$lte": max}}`.
    pub fn between(mut self, min: impl Into<FilterValue>, max: impl Into<FilterValue>) -> QueryFilter {
        self.conditions.push(Condition {
            operation: Operation::GreaterThanOrEquals,
            value: Some(min.into()),
        });
        self.with(Operation::LessThanOrEquals, max)
    }
}

/// Filter operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Equals,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Equals => "equals",
            Operation::LessThan => "lessThan",
            Operation::LessThanOrEquals => "lessThanOrEquals",
            Operation::GreaterThan => "greaterThan",
            Operation::GreaterThanOrEquals => "greaterThanOrEquals",
        }
    }

    /// Engine operator inside `$range`; `None` for equality.
    pub fn range_operator(&self) -> Option<&'static str> {
        match self {
            Operation::Equals => None,
            Operation::LessThan => Some("$lt"),
            Operation::LessThanOrEquals => Some("$lte"),
            Operation::GreaterThan => Some("$gt"),
            Operation::GreaterThanOrEquals => Some("$gte"),
        }
    }

    pub fn is_range(&self) -> bool {
        self.range_operator().is_some()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(Operation::Equals),
            "lessThan" => Ok(Operation::LessThan),
            "lessThanOrEquals" => Ok(Operation::LessThanOrEquals),
            "greaterThan" => Ok(Operation::GreaterThan),
            "greaterThanOrEquals" => Ok(Operation::GreaterThanOrEquals),
            other => Err(SearchError::UnknownOperation(other.to_string())),
        }
    }
}

/// Filter operand
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(Number),
    Float(f64),
    Bool(bool),
    /// Sent as an ISO-8601 string
    Date(DateTime<Utc>),
}

impl FilterValue {
    fn from_json(field: &str, raw: &Value) -> Result<Option<Self>, SearchError> {
        match raw {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(FilterValue::Text(s.clone()))),
            Value::Number(n) => Ok(Some(FilterValue::Number(n.clone()))),
            Value::Bool(b) => Ok(Some(FilterValue::Bool(*b))),
            other => Err(SearchError::InvalidFilter(format!(
                "unsupported value {other} for field '{field}'"
            ))),
        }
    }

    /// JSON form sent to the engine. Dates become ISO-8601 strings with
    /// millisecond precision; everything else passes through unchanged.
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Text(s) => Value::String(s.clone()),
            FilterValue::Number(n) => Value::Number(n.clone()),
            FilterValue::Float(f) => Value::from(*f),
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(d: DateTime<Utc>) -> Self {
        FilterValue::Date(d)
    }
}

macro_rules! impl_integer_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(n: $t) -> Self {
                    FilterValue::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_integer_value!(i32, i64, u32, u64, usize);
