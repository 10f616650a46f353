// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema Flattener
//!
//! Converts a (possibly nested) schema into the single-level, dot-path field
//! list used by the SCHEMA clause.
//!
//! ```text
//! {name: TEXT, profile: {age: U64, city: TEXT}}
//!     ↓ pre-order, declaration order
//! name TEXT | profile.age U64 | profile.city TEXT
//! ```

use serde::Serialize;

use super::field::{FieldType, Schema, SchemaNode, PATH_SEPARATOR};

/// A schema leaf addressed by its dot-joined path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedField {
    pub path: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_tokenize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_stem: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl FlattenedField {
    pub fn new(path: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            path: path.into(),
            field_type,
            fast: None,
            no_tokenize: None,
            no_stem: None,
            from: None,
        }
    }
}

/// Flatten `schema` depth-first in declaration order.
///
/// An empty schema yields an empty list.
pub fn flatten_schema(schema: &Schema) -> Vec<FlattenedField> {
    let mut fields = Vec::new();
    flatten_into(schema, &mut Vec::new(), &mut fields);
    fields
}

fn flatten_into<'a>(schema: &'a Schema, prefix: &mut Vec<&'a str>, out: &mut Vec<FlattenedField>) {
    for (key, node) in schema {
        prefix.push(key);
        match node {
            SchemaNode::Field(field_type) => {
                out.push(FlattenedField::new(join_path(prefix), *field_type));
            }
            SchemaNode::Detailed(detailed) => out.push(FlattenedField {
                path: join_path(prefix),
                field_type: detailed.field_type,
                fast: detailed.fast,
                no_tokenize: detailed.no_tokenize,
                no_stem: detailed.no_stem,
                from: detailed.from.clone(),
            }),
            SchemaNode::Nested(nested) => flatten_into(nested, prefix, out),
        }
        prefix.pop();
    }
}

fn join_path(parts: &[&str]) -> String {
    parts.join(PATH_SEPARATOR)
}
