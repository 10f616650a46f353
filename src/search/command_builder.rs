// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Command Builder
//!
//! Serializes index definitions and queries into the flat token lists the
//! engine expects.
//!
//! ```text
//! SEARCH.CREATE <name> [SKIPINITIALSCAN] [EXISTSOK] ON {HASH|STRING|JSON}
//!     PREFIX <n> <prefix>... [LANGUAGE <lang>]
//!     SCHEMA (<path> <TYPE> [FAST] [NOTOKENIZE] [NOSTEM])...
//!
//! {SEARCH.QUERY|SEARCH.COUNT} <name> <json>
//!     [LIMIT n] [OFFSET n] [NOCONTENT] [ORDERBY f [ASC|DESC]]
//!     [HIGHLIGHT FIELDS k f... [TAGS pre post]] [SELECT k f...] [SCOREFUNC ...]
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::json_translator::QueryTranslator;
use super::options::{CombineMode, QueryDialect, QueryOptions, ScoreFunction};
use super::query_builder::QueryFilter;
use crate::error::SearchError;
use crate::schema::{flatten_schema, Schema};

/// Command names
pub const CREATE: &str = "SEARCH.CREATE";
pub const QUERY: &str = "SEARCH.QUERY";
pub const COUNT: &str = "SEARCH.COUNT";
pub const COMMIT: &str = "SEARCH.COMMIT";
pub const DROP: &str = "SEARCH.DROP";
pub const DESCRIBE: &str = "SEARCH.DESCRIBE";
pub const WAITINDEXING: &str = "SEARCH.WAITINDEXING";
pub const ALIASADD: &str = "SEARCH.ALIASADD";
pub const ALIASDEL: &str = "SEARCH.ALIASDEL";
pub const LISTALIASES: &str = "SEARCH.LISTALIASES";

/// Storage layout of the indexed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Hash,
    String,
    Json,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Hash => "HASH",
            DataType::String => "STRING",
            DataType::Json => "JSON",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SearchError;

    /// Case-insensitive; the engine reports it in either casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(DataType::Hash),
            "string" => Ok(DataType::String),
            "json" => Ok(DataType::Json),
            _ => Err(SearchError::InvalidDataType(s.to_string())),
        }
    }
}

/// Stemming / tokenization language of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Arabic,
    Danish,
    Dutch,
    Finnish,
    French,
    German,
    Greek,
    Hungarian,
    Italian,
    Norwegian,
    Portuguese,
    Romanian,
    Russian,
    Spanish,
    Swedish,
    Tamil,
    Turkish,
}

impl Language {
    pub const ALL: [Language; 18] = [
        Language::English,
        Language::Arabic,
        Language::Danish,
        Language::Dutch,
        Language::Finnish,
        Language::French,
        Language::German,
        Language::Greek,
        Language::Hungarian,
        Language::Italian,
        Language::Norwegian,
        Language::Portuguese,
        Language::Romanian,
        Language::Russian,
        Language::Spanish,
        Language::Swedish,
        Language::Tamil,
        Language::Turkish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Arabic => "arabic",
            Language::Danish => "danish",
            Language::Dutch => "dutch",
            Language::Finnish => "finnish",
            Language::French => "french",
            Language::German => "german",
            Language::Greek => "greek",
            Language::Hungarian => "hungarian",
            Language::Italian => "italian",
            Language::Norwegian => "norwegian",
            Language::Portuguese => "portuguese",
            Language::Romanian => "romanian",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Swedish => "swedish",
            Language::Tamil => "tamil",
            Language::Turkish => "turkish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.as_str() == lower)
            .ok_or_else(|| SearchError::InvalidLanguage(s.to_string()))
    }
}

/// Everything needed to define an index.
///
/// # Example
///
/// ```rust
/// use search_index::schema::s;
/// use search_index::schema;
/// use search_index::search::{CreateIndexParams, DataType};
///
/// let params = CreateIndexParams::new(
///     "users",
///     schema! { name: s::text(), age: s::unsigned_integer() },
/// )
/// .data_type(DataType::Hash)
/// .prefix("user:");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexParams {
    pub name: String,
    pub schema: Schema,
    pub data_type: DataType,
    /// Key prefixes covered by the index
    pub prefix: Vec<String>,
    pub language: Option<Language>,
    /// Don't index keys that already exist
    pub skip_initial_scan: bool,
    /// Succeed if the index already exists
    pub exists_ok: bool,
}

impl CreateIndexParams {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            data_type: DataType::default(),
            prefix: Vec::new(),
            language: None,
            skip_initial_scan: false,
            exists_ok: false,
        }
    }

    #[must_use]
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Set the prefixes; accepts a single prefix or any list of them.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<Prefixes>) -> Self {
        self.prefix = prefix.into().0;
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn skip_initial_scan(mut self) -> Self {
        self.skip_initial_scan = true;
        self
    }

    #[must_use]
    pub fn exists_ok(mut self) -> Self {
        self.exists_ok = true;
        self
    }
}

/// One or many key prefixes, normalized to a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes(pub Vec<String>);

impl From<&str> for Prefixes {
    fn from(p: &str) -> Self {
        Prefixes(vec![p.to_string()])
    }
}

impl From<String> for Prefixes {
    fn from(p: String) -> Self {
        Prefixes(vec![p])
    }
}

impl<S: Into<String>> From<Vec<S>> for Prefixes {
    fn from(p: Vec<S>) -> Self {
        Prefixes(p.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Prefixes {
    fn from(p: [S; N]) -> Self {
        Prefixes(p.into_iter().map(Into::into).collect())
    }
}

/// Build the full `SEARCH.CREATE` command.
///
/// Numeric fields are always sent with FAST; BOOL and DATE only when the
/// schema asks for it. A schema key containing `.` is rejected with
/// [`SearchError::InvalidSchema`].
pub fn build_create_index_command(params: &CreateIndexParams) -> Result<Vec<String>, SearchError> {
    params.schema.check_keys()?;

    let mut cmd = vec![CREATE.to_string(), params.name.clone()];

    if params.skip_initial_scan {
        cmd.push("SKIPINITIALSCAN".to_string());
    }
    if params.exists_ok {
        cmd.push("EXISTSOK".to_string());
    }

    cmd.push("ON".to_string());
    cmd.push(params.data_type.as_str().to_string());

    cmd.push("PREFIX".to_string());
    cmd.push(params.prefix.len().to_string());
    cmd.extend(params.prefix.iter().cloned());

    if let Some(language) = params.language {
        cmd.push("LANGUAGE".to_string());
        cmd.push(language.as_str().to_string());
    }

    cmd.push("SCHEMA".to_string());
    for field in flatten_schema(&params.schema) {
        cmd.push(field.path);
        cmd.push(field.field_type.as_str().to_string());

        if field.fast == Some(true) || field.field_type.is_numeric() {
            cmd.push("FAST".to_string());
        }
        if field.no_tokenize == Some(true) {
            cmd.push("NOTOKENIZE".to_string());
        }
        if field.no_stem == Some(true) {
            cmd.push("NOSTEM".to_string());
        }
        if let Some(source) = field.from {
            cmd.push("FROM".to_string());
            cmd.push(source);
        }
    }

    Ok(cmd)
}

/// Which read command to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCommand {
    Query,
    Count,
}

impl QueryCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCommand::Query => QUERY,
            QueryCommand::Count => COUNT,
        }
    }
}

/// Build a `SEARCH.QUERY` or `SEARCH.COUNT` command.
///
/// A missing filter matches everything and is sent as `{}`. Clause order
/// is fixed regardless of how the options were assembled.
pub fn build_query_command(
    command: QueryCommand,
    index_name: &str,
    filter: Option<&QueryFilter>,
    options: &QueryOptions,
    dialect: QueryDialect,
) -> Result<Vec<String>, SearchError> {
    let query = match filter {
        Some(filter) => QueryTranslator::translate(filter)?,
        None => "{}".to_string(),
    };

    let mut cmd = vec![command.as_str().to_string(), index_name.to_string(), query];

    if let Some(limit) = options.limit {
        cmd.push("LIMIT".to_string());
        cmd.push(limit.to_string());
    }

    if let Some(offset) = options.offset {
        cmd.push("OFFSET".to_string());
        cmd.push(offset.to_string());
    }

    if options.returns_no_content() {
        cmd.push("NOCONTENT".to_string());
    }

    if let Some(order) = &options.order_by {
        cmd.push(dialect.order_keyword().to_string());
        cmd.push(order.field.clone());
        if let Some(direction) = order.direction {
            cmd.push(direction.as_str().to_string());
        }
    }

    if let Some(highlight) = &options.highlight {
        cmd.push("HIGHLIGHT".to_string());
        cmd.push("FIELDS".to_string());
        cmd.push(highlight.fields.len().to_string());
        cmd.extend(highlight.fields.iter().cloned());
        if let (Some(pre), Some(post)) = (&highlight.pre_tag, &highlight.post_tag) {
            cmd.push("TAGS".to_string());
            cmd.push(pre.clone());
            cmd.push(post.clone());
        }
    }

    if let Some(select) = options.select.as_ref().filter(|s| !s.is_empty()) {
        cmd.push(dialect.select_keyword().to_string());
        cmd.push(select.len().to_string());
        cmd.extend(select.iter().cloned());
    }

    if let Some(score_func) = &options.score_func {
        push_score_function(&mut cmd, score_func);
    }

    Ok(cmd)
}

fn push_score_function(cmd: &mut Vec<String>, func: &ScoreFunction) {
    cmd.push("SCOREFUNC".to_string());

    if func.fields.len() > 1 {
        cmd.push("COMBINEMODE".to_string());
        cmd.push(
            func.combine_mode
                .unwrap_or(CombineMode::Multiply)
                .as_str()
                .to_string(),
        );
    }

    if let Some(mode) = func.score_mode {
        cmd.push("SCOREMODE".to_string());
        cmd.push(mode.as_str().to_string());
    }

    for field in &func.fields {
        cmd.push("FIELDVALUE".to_string());
        cmd.push(field.field.clone());
        if let Some(modifier) = field.modifier {
            cmd.push("MODIFIER".to_string());
            cmd.push(modifier.as_str().to_string());
        }
        if let Some(factor) = field.factor {
            cmd.push("FACTOR".to_string());
            cmd.push(factor.to_string());
        }
        if let Some(missing) = field.missing {
            cmd.push("MISSING".to_string());
            cmd.push(missing.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use crate::schema::s;
    use crate::search::options::{FieldValueScore, Highlight, Modifier, ScoreMode, SortDirection};

    fn tokens(cmd: &[String]) -> Vec<&str> {
        cmd.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_create_simple_index() {
        let params = CreateIndexParams::new(
            "users",
            schema! { name: s::text(), age: s::unsigned_integer() },
        )
        .data_type(DataType::Hash)
        .prefix("user:");

        assert_eq!(
            tokens(&build_create_index_command(&params).unwrap()),
            [
                "SEARCH.CREATE", "users", "ON", "HASH", "PREFIX", "1", "user:", "SCHEMA", "name",
                "TEXT", "age", "U64", "FAST"
            ]
        );
    }

    #[test]
    fn test_create_full_options() {
        let params = CreateIndexParams::new(
            "products",
            schema! {
                title: s::text().no_stem().no_tokenize(),
                active: s::bool(),
                meta: schema! { created: s::date().fast(), price: s::float() },
            },
        )
        .data_type(DataType::String)
        .prefix(["p:", "product:"])
        .language(Language::German)
        .exists_ok()
        .skip_initial_scan();

        assert_eq!(
            tokens(&build_create_index_command(&params).unwrap()),
            [
                "SEARCH.CREATE", "products", "SKIPINITIALSCAN", "EXISTSOK", "ON", "STRING",
                "PREFIX", "2", "p:", "product:", "LANGUAGE", "german", "SCHEMA", "title", "TEXT",
                "NOTOKENIZE", "NOSTEM", "active", "BOOL", "meta.created", "DATE", "FAST",
                "meta.price", "F64", "FAST"
            ]
        );
    }

    #[test]
    fn test_create_sends_from_after_flags() {
        let params = CreateIndexParams::new(
            "articles",
            schema! {
                title: s::text().no_stem().from("headline"),
                views: s::unsigned_integer().from("stats.views"),
                published: s::date().fast().from("meta.date"),
            },
        )
        .data_type(DataType::Json)
        .prefix("article:");

        assert_eq!(
            tokens(&build_create_index_command(&params).unwrap()),
            [
                "SEARCH.CREATE", "articles", "ON", "JSON", "PREFIX", "1", "article:", "SCHEMA",
                "title", "TEXT", "NOSTEM", "FROM", "headline", "views", "U64", "FAST", "FROM",
                "stats.views", "published", "DATE", "FAST", "FROM", "meta.date"
            ]
        );
    }

    #[test]
    fn test_create_rejects_dotted_schema_key() {
        let params = CreateIndexParams::new(
            "users",
            schema! { a: schema! { b: s::text() }, "a.b": s::unsigned_integer() },
        )
        .prefix("user:");

        assert_eq!(
            build_create_index_command(&params).unwrap_err(),
            SearchError::InvalidSchema("key 'a.b' must not contain '.'".into())
        );
    }

    #[test]
    fn test_data_type_and_language_parsing() {
        assert_eq!("hash".parse::<DataType>().unwrap(), DataType::Hash);
        assert_eq!("JSON".parse::<DataType>().unwrap(), DataType::Json);
        assert_eq!(
            "xml".parse::<DataType>().unwrap_err(),
            SearchError::InvalidDataType("xml".into())
        );
        assert_eq!("Turkish".parse::<Language>().unwrap(), Language::Turkish);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_query_without_filter_or_options() {
        let cmd = build_query_command(
            QueryCommand::Count,
            "users",
            None,
            &QueryOptions::default(),
            QueryDialect::Current,
        )
        .unwrap();
        assert_eq!(tokens(&cmd), ["SEARCH.COUNT", "users", "{}"]);
    }

    #[test]
    fn test_query_clause_order() {
        let filter = QueryFilter::field("age").greater_than(18);
        let options = QueryOptions::new()
            .select(["name", "age"])
            .score_func(ScoreFunction::field(FieldValueScore::new("age")))
            .highlight(Highlight::fields(["name"]).tags("<b>", "</b>"))
            .order_by("age", Some(SortDirection::Desc))
            .offset(5)
            .limit(10);

        let cmd = build_query_command(
            QueryCommand::Query,
            "users",
            Some(&filter),
            &options,
            QueryDialect::Current,
        )
        .unwrap();

        assert_eq!(
            tokens(&cmd),
            [
                "SEARCH.QUERY", "users", r#"{"age":{"$range":{"$gt":18}}}"#, "LIMIT", "10",
                "OFFSET", "5", "ORDERBY", "age", "DESC", "HIGHLIGHT", "FIELDS", "1", "name",
                "TAGS", "<b>", "</b>", "SELECT", "2", "name", "age", "SCOREFUNC", "FIELDVALUE",
                "age"
            ]
        );
    }

    #[test]
    fn test_legacy_dialect_keywords() {
        let options = QueryOptions::new().order_by("age", None).select(["name"]);
        let cmd = build_query_command(
            QueryCommand::Query,
            "users",
            None,
            &options,
            QueryDialect::Legacy,
        )
        .unwrap();
        assert_eq!(
            tokens(&cmd),
            ["SEARCH.QUERY", "users", "{}", "SORTBY", "age", "RETURN", "1", "name"]
        );
    }

    #[test]
    fn test_empty_select_sends_nocontent_only() {
        let options = QueryOptions::new().select(Vec::<String>::new()).limit(3);
        let cmd = build_query_command(
            QueryCommand::Query,
            "idx",
            None,
            &options,
            QueryDialect::Current,
        )
        .unwrap();
        assert_eq!(tokens(&cmd), ["SEARCH.QUERY", "idx", "{}", "LIMIT", "3", "NOCONTENT"]);
    }

    #[test]
    fn test_highlight_tags_require_both() {
        let mut highlight = Highlight::fields(["a", "b"]);
        highlight.pre_tag = Some("<em>".into());
        let options = QueryOptions::new().highlight(highlight);
        let cmd = build_query_command(
            QueryCommand::Query,
            "idx",
            None,
            &options,
            QueryDialect::Current,
        )
        .unwrap();
        assert_eq!(
            tokens(&cmd),
            ["SEARCH.QUERY", "idx", "{}", "HIGHLIGHT", "FIELDS", "2", "a", "b"]
        );
    }

    #[test]
    fn test_single_field_score_function() {
        let func = ScoreFunction::field(
            FieldValueScore::new("popularity")
                .modifier(Modifier::Log1p)
                .factor(1.5)
                .missing(0.0),
        )
        .score_mode(ScoreMode::Sum);
        let cmd = build_query_command(
            QueryCommand::Query,
            "idx",
            None,
            &QueryOptions::new().score_func(func),
            QueryDialect::Current,
        )
        .unwrap();
        assert_eq!(
            tokens(&cmd[3..]),
            [
                "SCOREFUNC", "SCOREMODE", "SUM", "FIELDVALUE", "popularity", "MODIFIER", "LOG1P",
                "FACTOR", "1.5", "MISSING", "0"
            ]
        );
    }

    #[test]
    fn test_multi_field_score_function() {
        let func = ScoreFunction::fields([
            FieldValueScore::new("a").modifier(Modifier::Sqrt),
            FieldValueScore::new("b").factor(2.0),
        ])
        .combine_mode(CombineMode::Sum)
        .score_mode(ScoreMode::Replace);
        let cmd = build_query_command(
            QueryCommand::Query,
            "idx",
            None,
            &QueryOptions::new().score_func(func),
            QueryDialect::Current,
        )
        .unwrap();
        assert_eq!(
            tokens(&cmd[3..]),
            [
                "SCOREFUNC", "COMBINEMODE", "SUM", "SCOREMODE", "REPLACE", "FIELDVALUE", "a",
                "MODIFIER", "SQRT", "FIELDVALUE", "b", "FACTOR", "2"
            ]
        );
    }

    #[test]
    fn test_multi_field_score_function_defaults_combine_mode() {
        let func = ScoreFunction::fields([FieldValueScore::new("a"), FieldValueScore::new("b")]);
        let cmd = build_query_command(
            QueryCommand::Query,
            "idx",
            None,
            &QueryOptions::new().score_func(func),
            QueryDialect::Current,
        )
        .unwrap();
        assert_eq!(
            tokens(&cmd[3..]),
            ["SCOREFUNC", "COMBINEMODE", "MULTIPLY", "FIELDVALUE", "a", "FIELDVALUE", "b"]
        );
    }

    #[test]
    fn test_invalid_filter_fails_before_building() {
        let filter = QueryFilter::Leaf(crate::search::query_builder::FieldFilter::new("x"));
        let result = build_query_command(
            QueryCommand::Query,
            "idx",
            Some(&filter),
            &QueryOptions::default(),
            QueryDialect::Current,
        );
        assert!(matches!(result, Err(SearchError::EmptyOperations { .. })));
    }
}
