// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index Schema
//!
//! Declarative description of document fields and their index-time treatment.
//!
//! # Architecture
//!
//! ```text
//! s::text() / s::integer().fast() / ...   (FieldBuilder)
//!     ↓ object() / schema!{}
//! Schema (ordered tree of SchemaNode)
//!     ↓ flatten_schema()
//! Vec<FlattenedField>  →  SCHEMA clause of SEARCH.CREATE
//! ```
//!
//! A schema is built once when the index is defined and never mutated
//! afterwards; flattening is a pure function re-run for every command.

mod builder;
mod field;
mod flatten;

pub use builder::{
    object, s, BoolFieldBuilder, DateFieldBuilder, FieldBuilder, NumericFieldBuilder,
    SchemaEntry, TextFieldBuilder,
};
pub use field::{DetailedField, FieldType, Schema, SchemaNode, PATH_SEPARATOR};
pub use flatten::{flatten_schema, FlattenedField};
