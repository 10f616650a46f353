// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Commands
//!
//! Filters, query options, wire command construction and reply parsing.
//!
//! # Architecture
//!
//! ```text
//! QueryFilter (AST)                  QueryOptions
//!     ↓ QueryTranslator                  ↓
//! JSON query string ─────→ build_query_command() → ["SEARCH.QUERY", ...]
//!
//! CreateIndexParams + Schema → build_create_index_command() → ["SEARCH.CREATE", ...]
//!
//! engine reply → parse_query_response / parse_count / parse_describe_response
//! ```
//!
//! # Query Language
//!
//! ```text
//! {"name": "Alice"}                          - Field equals
//! {"age": {"$range": {"$gte": 25, "$lte": 40}}}  - Range
//! {"$or": [{...}, {...}]}                    - Boolean OR
//! {"name": "Alice", "age": {...}}            - Boolean AND (merged)
//! ```
//!
//! Everything here is pure; sending commands is the client's job.

mod command_builder;
mod json_translator;
mod options;
mod query_builder;
mod response;

pub use command_builder::{
    build_create_index_command, build_query_command, CreateIndexParams, DataType, Language,
    Prefixes, QueryCommand,
};
pub use json_translator::QueryTranslator;
pub use options::{
    CombineMode, FieldValueScore, Highlight, Modifier, OrderBy, QueryDialect, QueryOptions,
    ScoreFunction, ScoreMode, SortDirection,
};
pub use query_builder::{Condition, FieldFilter, FilterValue, Operation, QueryFilter};
pub use response::{
    parse_aliases, parse_count, parse_describe_response, parse_query_response,
    IndexDescription, QueryResult,
};

/// Wire command names.
pub mod commands {
    pub use super::command_builder::{
        ALIASADD, ALIASDEL, COMMIT, COUNT, CREATE, DESCRIBE, DROP, LISTALIASES, QUERY,
        WAITINDEXING,
    };
}
