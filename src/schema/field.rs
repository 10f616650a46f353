// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Field Type Model
//!
//! A closed set of scalar field types plus a "detailed" variant that layers
//! per-field index flags on top of a base type.
//!
//! ```text
//! SchemaNode
//!   ├─ Field(FieldType)            "TEXT"
//!   ├─ Detailed(DetailedField)     {"type": "U64", "fast": true}
//!   └─ Nested(Schema)              {"profile": {...}}
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::SearchError;

/// Path separator used when flattening nested schemas.
pub const PATH_SEPARATOR: &str = ".";

/// Scalar field types understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    /// Full-text searchable field
    Text,
    /// Unsigned 64-bit integer
    U64,
    /// Signed 64-bit integer
    I64,
    /// 64-bit float
    F64,
    /// Boolean
    Bool,
    /// ISO-8601 date
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::U64,
        FieldType::I64,
        FieldType::F64,
        FieldType::Bool,
        FieldType::Date,
    ];

    /// Wire token for this type (exact casing).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::U64 => "U64",
            FieldType::I64 => "I64",
            FieldType::F64 => "F64",
            FieldType::Bool => "BOOL",
            FieldType::Date => "DATE",
        }
    }

    /// U64, I64 and F64.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::U64 | FieldType::I64 | FieldType::F64)
    }

    /// Whether range operations (`$gt`, `$lte`, ...) apply to this type.
    pub fn supports_range(&self) -> bool {
        self.is_numeric() || *self == FieldType::Date
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SearchError::InvalidSchema(format!("unknown field type '{s}'")))
    }
}

/// A base type with index flags.
///
/// Unset flags stay `None` so that a record with no flags is
/// indistinguishable from the bare type once flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Sortable / range-filterable storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast: Option<bool>,
    /// Exact match only, no tokenization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_tokenize: Option<bool>,
    /// Disable stemming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_stem: Option<bool>,
    /// Source attribute the field is indexed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl DetailedField {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            fast: None,
            no_tokenize: None,
            no_stem: None,
            from: None,
        }
    }

    pub fn has_flags(&self) -> bool {
        self.fast.is_some()
            || self.no_tokenize.is_some()
            || self.no_stem.is_some()
            || self.from.is_some()
    }
}

/// One node of a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Field(FieldType),
    Detailed(DetailedField),
    Nested(Schema),
}

impl SchemaNode {
    pub fn is_field_type(&self) -> bool {
        matches!(self, SchemaNode::Field(_))
    }

    pub fn is_detailed_field(&self) -> bool {
        matches!(self, SchemaNode::Detailed(_))
    }

    pub fn is_nested_schema(&self) -> bool {
        matches!(self, SchemaNode::Nested(_))
    }

    /// Classify a JSON value as a schema node.
    ///
    /// The `type` key is checked before anything structural: a detailed
    /// field's `type` value is itself a valid bare type, so an object is
    /// only treated as nested when it has no `type` key naming a field type.
    pub fn from_value(value: &Value) -> Result<Self, SearchError> {
        match value {
            Value::String(tag) => tag.parse().map(SchemaNode::Field),
            Value::Object(map) if is_detailed_field(map) => {
                let detailed: DetailedField = serde_json::from_value(value.clone())
                    .map_err(|e| SearchError::InvalidSchema(e.to_string()))?;
                Ok(SchemaNode::Detailed(detailed))
            }
            Value::Object(map) => Schema::from_map(map).map(SchemaNode::Nested),
            other => Err(SearchError::InvalidSchema(format!(
                "expected a field type or an object, got {other}"
            ))),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::Field(t) => Value::String(t.as_str().to_string()),
            SchemaNode::Detailed(d) => {
                serde_json::to_value(d).unwrap_or_else(|_| Value::String(d.field_type.to_string()))
            }
            SchemaNode::Nested(schema) => schema.to_value(),
        }
    }
}

fn dotted_key(key: &str) -> SearchError {
    SearchError::InvalidSchema(format!("key '{key}' must not contain '{PATH_SEPARATOR}'"))
}

fn is_detailed_field(map: &Map<String, Value>) -> bool {
    matches!(map.get("type"), Some(Value::String(t)) if t.parse::<FieldType>().is_ok())
}

impl From<FieldType> for SchemaNode {
    fn from(t: FieldType) -> Self {
        SchemaNode::Field(t)
    }
}

impl From<DetailedField> for SchemaNode {
    fn from(d: DetailedField) -> Self {
        SchemaNode::Detailed(d)
    }
}

impl From<Schema> for SchemaNode {
    fn from(s: Schema) -> Self {
        SchemaNode::Nested(s)
    }
}

/// Ordered mapping of identifiers to schema nodes.
///
/// Declaration order is preserved: the SCHEMA clause is order-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, SchemaNode>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing (in place) any earlier one with the same key.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<SchemaNode>) {
        self.fields.insert(key.into(), node.into());
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that no key, at any depth, contains the path separator.
    ///
    /// Builders accept any key; a dotted key would collide with a nested
    /// path once flattened.
    pub fn check_keys(&self) -> Result<(), SearchError> {
        for (key, node) in &self.fields {
            if key.contains(PATH_SEPARATOR) {
                return Err(dotted_key(key));
            }
            if let SchemaNode::Nested(nested) = node {
                nested.check_keys()?;
            }
        }
        Ok(())
    }

    pub fn from_value(value: &Value) -> Result<Self, SearchError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(SearchError::InvalidSchema(format!(
                "schema must be an object, got {other}"
            ))),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, SearchError> {
        let mut schema = Schema::new();
        for (key, value) in map {
            if key.contains(PATH_SEPARATOR) {
                return Err(dotted_key(key));
            }
            schema.insert(key.clone(), SchemaNode::from_value(value)?);
        }
        Ok(schema)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a String, &'a SchemaNode);
    type IntoIter = indexmap::map::Iter<'a, String, SchemaNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SchemaNode::from_value(&value).map_err(D::Error::custom)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Schema::from_value(&value).map_err(D::Error::custom)
    }
}
