// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Translator
//!
//! Compiles a [`QueryFilter`] into the engine's JSON query object.
//!
//! # Engine Query Syntax
//!
//! ```text
//! {"name": "Alice"}                        - Equality (direct field: value)
//! {"age": {"$range": {"$gt": 18}}}         - Range ($gt, $gte, $lt, $lte)
//! {"$or": [q1, q2]}                        - OR
//! {"name": "A", "age": {...}}              - AND (children merged into one object)
//! ```

use serde_json::{Map, Value};
use tracing::warn;

use super::query_builder::{FieldFilter, Operation, QueryFilter};
use crate::error::SearchError;

/// JSON query translator
pub struct QueryTranslator;

impl QueryTranslator {
    /// Translate a filter to its JSON string, the single query argument of
    /// SEARCH.QUERY / SEARCH.COUNT. Keys keep their construction order.
    pub fn translate(filter: &QueryFilter) -> Result<String, SearchError> {
        Ok(Self::translate_value(filter)?.to_string())
    }

    /// Translate a filter to a JSON object.
    pub fn translate_value(filter: &QueryFilter) -> Result<Value, SearchError> {
        match filter {
            QueryFilter::Or(children) => {
                let compiled = children
                    .iter()
                    .map(Self::translate_value)
                    .collect::<Result<Vec<_>, _>>()?;
                let mut obj = Map::new();
                obj.insert("$or".to_string(), Value::Array(compiled));
                Ok(Value::Object(obj))
            }
            QueryFilter::And(children) => {
                // Shallow merge: a field repeated across branches keeps the last value.
                let mut merged = Map::new();
                for child in children {
                    if let Value::Object(obj) = Self::translate_value(child)? {
                        for (key, value) in obj {
                            if merged.contains_key(&key) {
                                warn!(field = %key, "AND branches target the same key, last one wins");
                            }
                            merged.insert(key, value);
                        }
                    }
                }
                Ok(Value::Object(merged))
            }
            QueryFilter::Leaf(leaf) => Self::translate_leaf(leaf),
        }
    }

    fn translate_leaf(leaf: &FieldFilter) -> Result<Value, SearchError> {
        if leaf.conditions.is_empty() {
            return Err(SearchError::EmptyOperations {
                field: leaf.field.clone(),
            });
        }

        let undefined = || SearchError::UndefinedValue {
            field: leaf.field.clone(),
        };

        let mut obj = Map::new();

        if let Some(eq) = leaf
            .conditions
            .iter()
            .find(|c| c.operation == Operation::Equals)
        {
            let value = eq.value.as_ref().ok_or_else(undefined)?;
            obj.insert(leaf.field.clone(), value.to_json());
            return Ok(Value::Object(obj));
        }

        let mut range = Map::new();
        for condition in &leaf.conditions {
            let value = condition.value.as_ref().ok_or_else(undefined)?;
            if let Some(op) = condition.operation.range_operator() {
                range.insert(op.to_string(), value.to_json());
            }
        }

        let mut wrapped = Map::new();
        wrapped.insert("$range".to_string(), Value::Object(range));
        obj.insert(leaf.field.clone(), Value::Object(wrapped));
        Ok(Value::Object(obj))
    }
}
