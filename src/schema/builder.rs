// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema Builder
//!
//! Chainable construction of a [`Schema`]. Every option method takes the
//! builder by value and returns a new one; clone a builder to branch it.
//!
//! # Example
//!
//! ```rust
//! use search_index::schema;
//! use search_index::schema::s;
//!
//! let schema = schema! {
//!     name: s::text(),
//!     title: s::text().no_tokenize().no_stem(),
//!     profile: schema! {
//!         age: s::unsigned_integer(),
//!         joined: s::date().fast(),
//!     },
//! };
//!
//! assert_eq!(schema.len(), 3);
//! ```
//!
//! A builder with no options finalizes to the bare type tag (`"TEXT"`);
//! one or more options produce a [`DetailedField`] record.

use super::field::{DetailedField, FieldType, Schema, SchemaNode};

/// Builder for TEXT fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFieldBuilder {
    no_tokenize: bool,
    no_stem: bool,
    from: Option<String>,
}

impl TextFieldBuilder {
    /// Exact match only.
    #[must_use]
    pub fn no_tokenize(self) -> Self {
        Self {
            no_tokenize: true,
            ..self
        }
    }

    /// Disable stemming.
    #[must_use]
    pub fn no_stem(self) -> Self {
        Self {
            no_stem: true,
            ..self
        }
    }

    /// Index the value of another attribute.
    #[must_use]
    pub fn from(self, source: impl Into<String>) -> Self {
        Self {
            from: Some(source.into()),
            ..self
        }
    }

    pub fn finalize(self) -> SchemaNode {
        if !self.no_tokenize && !self.no_stem && self.from.is_none() {
            return SchemaNode::Field(FieldType::Text);
        }
        let mut field = DetailedField::new(FieldType::Text);
        field.no_tokenize = self.no_tokenize.then_some(true);
        field.no_stem = self.no_stem.then_some(true);
        field.from = self.from;
        SchemaNode::Detailed(field)
    }
}

/// Builder for U64, I64 and F64 fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericFieldBuilder {
    field_type: FieldType,
    fast: bool,
    from: Option<String>,
}

impl NumericFieldBuilder {
    fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            fast: false,
            from: None,
        }
    }

    /// Enable sorting and range queries.
    #[must_use]
    pub fn fast(self) -> Self {
        Self { fast: true, ..self }
    }

    /// Index the value of another attribute.
    #[must_use]
    pub fn from(self, source: impl Into<String>) -> Self {
        Self {
            from: Some(source.into()),
            ..self
        }
    }

    pub fn finalize(self) -> SchemaNode {
        finalize_fast(self.field_type, self.fast, self.from)
    }
}

/// Builder for BOOL fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolFieldBuilder {
    fast: bool,
    from: Option<String>,
}

impl BoolFieldBuilder {
    #[must_use]
    pub fn fast(self) -> Self {
        Self { fast: true, ..self }
    }

    #[must_use]
    pub fn from(self, source: impl Into<String>) -> Self {
        Self {
            from: Some(source.into()),
            ..self
        }
    }

    pub fn finalize(self) -> SchemaNode {
        finalize_fast(FieldType::Bool, self.fast, self.from)
    }
}

/// Builder for DATE fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFieldBuilder {
    fast: bool,
    from: Option<String>,
}

impl DateFieldBuilder {
    #[must_use]
    pub fn fast(self) -> Self {
        Self { fast: true, ..self }
    }

    #[must_use]
    pub fn from(self, source: impl Into<String>) -> Self {
        Self {
            from: Some(source.into()),
            ..self
        }
    }

    pub fn finalize(self) -> SchemaNode {
        finalize_fast(FieldType::Date, self.fast, self.from)
    }
}

fn finalize_fast(field_type: FieldType, fast: bool, from: Option<String>) -> SchemaNode {
    if !fast && from.is_none() {
        return SchemaNode::Field(field_type);
    }
    let mut field = DetailedField::new(field_type);
    field.fast = fast.then_some(true);
    field.from = from;
    SchemaNode::Detailed(field)
}

/// Any field builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldBuilder {
    Text(TextFieldBuilder),
    Numeric(NumericFieldBuilder),
    Bool(BoolFieldBuilder),
    Date(DateFieldBuilder),
}

impl FieldBuilder {
    pub fn finalize(self) -> SchemaNode {
        match self {
            FieldBuilder::Text(b) => b.finalize(),
            FieldBuilder::Numeric(b) => b.finalize(),
            FieldBuilder::Bool(b) => b.finalize(),
            FieldBuilder::Date(b) => b.finalize(),
        }
    }
}

/// A value accepted by [`object`]: either a builder (finalized on the way
/// in) or an already-built node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEntry {
    Builder(FieldBuilder),
    Node(SchemaNode),
}

impl SchemaEntry {
    fn into_node(self) -> SchemaNode {
        match self {
            SchemaEntry::Builder(b) => b.finalize(),
            SchemaEntry::Node(n) => n,
        }
    }
}

macro_rules! impl_builder_entry {
    ($($builder:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$builder> for SchemaEntry {
                fn from(b: $builder) -> Self {
                    SchemaEntry::Builder(FieldBuilder::$variant(b))
                }
            }
        )*
    };
}

impl_builder_entry!(
    TextFieldBuilder => Text,
    NumericFieldBuilder => Numeric,
    BoolFieldBuilder => Bool,
    DateFieldBuilder => Date,
);

impl From<FieldBuilder> for SchemaEntry {
    fn from(b: FieldBuilder) -> Self {
        SchemaEntry::Builder(b)
    }
}

impl From<Schema> for SchemaEntry {
    fn from(s: Schema) -> Self {
        SchemaEntry::Node(SchemaNode::Nested(s))
    }
}

impl From<SchemaNode> for SchemaEntry {
    fn from(n: SchemaNode) -> Self {
        SchemaEntry::Node(n)
    }
}

impl From<FieldType> for SchemaEntry {
    fn from(t: FieldType) -> Self {
        SchemaEntry::Node(SchemaNode::Field(t))
    }
}

impl From<DetailedField> for SchemaEntry {
    fn from(d: DetailedField) -> Self {
        SchemaEntry::Node(SchemaNode::Detailed(d))
    }
}

/// Build a schema from `(key, entry)` pairs, finalizing builders and
/// passing nested schemas through. Keys keep their iteration order.
pub fn object<I, K, V>(fields: I) -> Schema
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<SchemaEntry>,
{
    let mut schema = Schema::new();
    for (key, value) in fields {
        schema.insert(key, value.into().into_node());
    }
    schema
}

/// Field builder constructors.
pub mod s {
    use super::*;

    /// Full-text search field (TEXT).
    pub fn text() -> TextFieldBuilder {
        TextFieldBuilder::default()
    }

    /// Unsigned 64-bit integer (U64).
    pub fn unsigned_integer() -> NumericFieldBuilder {
        NumericFieldBuilder::new(FieldType::U64)
    }

    /// Signed 64-bit integer (I64).
    pub fn integer() -> NumericFieldBuilder {
        NumericFieldBuilder::new(FieldType::I64)
    }

    /// 64-bit float (F64).
    pub fn float() -> NumericFieldBuilder {
        NumericFieldBuilder::new(FieldType::F64)
    }

    /// Boolean (BOOL).
    pub fn bool() -> BoolFieldBuilder {
        BoolFieldBuilder::default()
    }

    /// ISO-8601 date (DATE).
    pub fn date() -> DateFieldBuilder {
        DateFieldBuilder::default()
    }

    pub use super::object;
}

/// Declarative form of [`object`].
///
/// Keys are identifiers or string literals; values are anything that
/// converts into a [`SchemaEntry`].
#[macro_export]
macro_rules! schema {
    (@key $key:ident) => {
        stringify!($key)
    };
    (@key $key:literal) => {
        $key
    };
    () => {
        $crate::schema::Schema::new()
    };
    ($($key:tt : $value:expr),+ $(,)?) => {
        $crate::schema::object([
            $( ($crate::schema!(@key $key), $crate::schema::SchemaEntry::from($value)) ),+
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::s;
    use super::*;
    use crate::schema;
    use serde_json::json;

    #[test]
    fn test_no_options_is_bare_tag() {
        assert_eq!(s::text().finalize(), SchemaNode::Field(FieldType::Text));
        assert_eq!(s::unsigned_integer().finalize(), SchemaNode::Field(FieldType::U64));
        assert_eq!(s::integer().finalize(), SchemaNode::Field(FieldType::I64));
        assert_eq!(s::float().finalize(), SchemaNode::Field(FieldType::F64));
        assert_eq!(s::bool().finalize(), SchemaNode::Field(FieldType::Bool));
        assert_eq!(s::date().finalize(), SchemaNode::Field(FieldType::Date));
    }

    #[test]
    fn test_options_produce_detailed_record() {
        assert_eq!(
            s::text().no_tokenize().finalize().to_value(),
            json!({"type": "TEXT", "noTokenize": true})
        );
        assert_eq!(
            s::text().no_stem().no_tokenize().finalize().to_value(),
            json!({"type": "TEXT", "noTokenize": true, "noStem": true})
        );
        assert_eq!(
            s::float().fast().finalize().to_value(),
            json!({"type": "F64", "fast": true})
        );
        assert_eq!(
            s::date().fast().finalize().to_value(),
            json!({"type": "DATE", "fast": true})
        );
    }

    #[test]
    fn test_from_source_makes_detailed_record() {
        assert_eq!(
            s::text().from("headline").finalize().to_value(),
            json!({"type": "TEXT", "from": "headline"})
        );
        assert_eq!(
            s::integer().fast().from("stats.views").finalize().to_value(),
            json!({"type": "I64", "fast": true, "from": "stats.views"})
        );
        assert_eq!(
            s::bool().from("flags.active").finalize().to_value(),
            json!({"type": "BOOL", "from": "flags.active"})
        );
        assert_eq!(
            s::date().from("created_at").fast().finalize().to_value(),
            json!({"type": "DATE", "fast": true, "from": "created_at"})
        );
    }

    #[test]
    fn test_chaining_is_idempotent() {
        assert_eq!(s::bool().fast().fast(), s::bool().fast());
        assert_eq!(s::text().no_stem().no_stem().finalize(), s::text().no_stem().finalize());
    }

    #[test]
    fn test_builders_are_not_mutated() {
        let base = s::text();
        let exact = base.clone().no_tokenize();
        assert_eq!(base.finalize(), SchemaNode::Field(FieldType::Text));
        assert!(exact.finalize().is_detailed_field());
    }

    #[test]
    fn test_object_passes_nested_schemas_through() {
        let schema = schema! {
            name: s::text(),
            profile: schema! {
                age: s::unsigned_integer().fast(),
                city: s::text(),
            },
        };

        assert_eq!(
            schema.to_value(),
            json!({
                "name": "TEXT",
                "profile": {"age": {"type": "U64", "fast": true}, "city": "TEXT"}
            })
        );
    }

    #[test]
    fn test_object_with_pairs_and_literal_keys() {
        let from_pairs = object([
            ("id", SchemaEntry::from(s::text())),
            ("score", SchemaEntry::from(FieldType::F64)),
        ]);
        let from_macro = schema! { "id": s::text(), "score": FieldType::F64 };
        assert_eq!(from_pairs, from_macro);
        assert!(schema!().is_empty());
    }
}
