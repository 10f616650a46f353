// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Response Parser
//!
//! Turns positional engine replies into structured values. Parsing never
//! fails: shapes that don't match produce empty or partial results.
//!
//! ```text
//! QUERY     [[key, score, [[name, value], ...]?], ...]
//! COUNT     42 | "42"
//! DESCRIBE  ["name", n, "type", t, "prefixes", [...], "language", l, "schema", [[name, TYPE, flags...], ...]]
//! ALIASES   [[alias, index], ...] | 0
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{FieldType, PATH_SEPARATOR};

/// Key holding the whole document when a result returns it as one value.
const WHOLE_DOCUMENT: &str = "$";

/// One query hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub key: String,
    /// Relevance score, exactly as returned by the engine
    pub score: String,
    /// Field values in reply order. `None` when the reply carried no field
    /// list at all (NOCONTENT queries).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, Value>>,
}

impl QueryResult {
    /// Score as a number, if it parses.
    pub fn score_value(&self) -> Option<f64> {
        self.score.parse().ok()
    }

    /// Rebuild the document from dot-path field names.
    ///
    /// A `$` field holds the whole document and replaces everything else.
    pub fn document(&self) -> Option<Value> {
        let fields = self.fields.as_ref()?;
        let mut doc = Map::new();

        for (path, value) in fields {
            let mut parts: Vec<&str> = path.split(PATH_SEPARATOR).collect();
            let Some(last) = parts.pop() else {
                continue;
            };

            let mut current = &mut doc;
            for part in parts {
                let slot = current
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                current = slot.as_object_mut()?;
            }
            current.insert(last.to_string(), value.clone());
        }

        match doc.remove(WHOLE_DOCUMENT) {
            Some(whole) => Some(whole),
            None => Some(Value::Object(doc)),
        }
    }
}

/// Parse a `SEARCH.QUERY` reply.
///
/// Entries that aren't arrays are skipped; a field list that isn't an
/// array becomes an empty field map.
pub fn parse_query_response(raw: &Value) -> Vec<QueryResult> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let parts = item.as_array()?;
            let key = parts.first().map(scalar_to_string)?;
            let score = parts.get(1).map(scalar_to_string).unwrap_or_default();
            let fields = parts.get(2).map(parse_field_pairs);
            Some(QueryResult { key, score, fields })
        })
        .collect()
}

fn parse_field_pairs(raw: &Value) -> IndexMap<String, Value> {
    let mut fields = IndexMap::new();
    let Some(pairs) = raw.as_array() else {
        return fields;
    };
    for pair in pairs {
        if let Some([name, value, ..]) = pair.as_array().map(Vec::as_slice) {
            // Duplicates keep their first position with the last value
            fields.insert(scalar_to_string(name), value.clone());
        }
    }
    fields
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a `SEARCH.COUNT` reply: a number, or a string read like an
/// integer prefix (`"42"`, `" 17 docs"`).
pub fn parse_count(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign = usize::from(s.starts_with(['-', '+']));
    let end = s[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + sign);
    s[..end].parse().ok()
}

/// Server-side view of an index.
///
/// The schema is reduced to `path -> type`; FAST / NOTOKENIZE / NOSTEM
/// flags in the reply are not carried over.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescription {
    pub index_name: String,
    /// Lowercased (`hash`, `string`, `json`)
    pub data_type: String,
    pub prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub schema: IndexMap<String, FieldType>,
}

/// Parse a `SEARCH.DESCRIBE` reply, given either as a flat key/value array
/// or as an object. Returns `None` for a null or empty reply.
pub fn parse_describe_response(raw: &Value) -> Option<IndexDescription> {
    let pairs: Vec<(String, &Value)> = match raw {
        Value::Array(items) if !items.is_empty() => items
            .chunks(2)
            .filter_map(|chunk| match chunk {
                [key, value] => Some((scalar_to_string(key), value)),
                _ => None,
            })
            .collect(),
        Value::Object(map) if !map.is_empty() => {
            map.iter().map(|(k, v)| (k.clone(), v)).collect()
        }
        _ => return None,
    };

    let mut description = IndexDescription::default();
    for (key, value) in pairs {
        match key.as_str() {
            "name" | "indexName" => description.index_name = scalar_to_string(value),
            "type" | "dataType" => {
                description.data_type = scalar_to_string(value).to_lowercase()
            }
            "prefixes" => description.prefixes = string_list(value),
            "language" => description.language = value.as_str().map(str::to_string),
            "schema" => description.schema = parse_describe_schema(value),
            _ => {}
        }
    }
    Some(description)
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(scalar_to_string).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn parse_describe_schema(value: &Value) -> IndexMap<String, FieldType> {
    let mut schema = IndexMap::new();
    match value {
        // [[name, TYPE, flags...], ...]
        Value::Array(entries) => {
            for entry in entries {
                let Some([name, tag, ..]) = entry.as_array().map(Vec::as_slice) else {
                    continue;
                };
                if let Some(field_type) = tag.as_str().and_then(|t| t.parse().ok()) {
                    schema.insert(scalar_to_string(name), field_type);
                }
            }
        }
        // {name: TYPE} or {name: {"type": TYPE, ...}}
        Value::Object(map) => {
            for (name, info) in map {
                let tag = match info {
                    Value::String(t) => Some(t.as_str()),
                    Value::Object(detail) => detail.get("type").and_then(Value::as_str),
                    _ => None,
                };
                if let Some(field_type) = tag.and_then(|t| t.parse().ok()) {
                    schema.insert(name.clone(), field_type);
                }
            }
        }
        _ => {}
    }
    schema
}

/// Parse a `SEARCH.LISTALIASES` reply into `alias -> index`.
///
/// `0`, an empty array, or any non-array reply yields an empty map;
/// malformed pairs are skipped.
pub fn parse_aliases(raw: &Value) -> IndexMap<String, String> {
    let mut aliases = IndexMap::new();
    let Some(pairs) = raw.as_array() else {
        return aliases;
    };
    for pair in pairs {
        if let Some([alias, index]) = pair.as_array().map(Vec::as_slice) {
            aliases.insert(scalar_to_string(alias), scalar_to_string(index));
        }
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_response_with_fields() {
        let results = parse_query_response(&json!([["doc:1", "0.95", [["name", "John"]]]]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, "doc:1");
        assert_eq!(results[0].score, "0.95");
        assert_eq!(results[0].score_value(), Some(0.95));
        assert_eq!(
            serde_json::to_value(&results[0]).unwrap(),
            json!({"key": "doc:1", "score": "0.95", "fields": {"name": "John"}})
        );
    }

    #[test]
    fn test_query_response_without_fields() {
        let results = parse_query_response(&json!([["doc:1", "0.95"]]));
        assert_eq!(results[0].fields, None);
        assert_eq!(
            serde_json::to_value(&results[0]).unwrap(),
            json!({"key": "doc:1", "score": "0.95"})
        );
    }

    #[test]
    fn test_non_array_field_list_is_empty() {
        let results = parse_query_response(&json!([["doc:1", "1", "garbage"]]));
        assert_eq!(results[0].fields, Some(IndexMap::new()));
    }

    #[test]
    fn test_duplicate_field_last_write_wins() {
        let results =
            parse_query_response(&json!([["k", "1", [["a", 1], ["b", 2], ["a", 3]]]]));
        let fields = results[0].fields.as_ref().unwrap();
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(fields["a"], json!(3));
    }

    #[test]
    fn test_non_array_reply_is_empty() {
        assert!(parse_query_response(&json!(null)).is_empty());
        assert!(parse_query_response(&json!("OK")).is_empty());
        assert!(parse_query_response(&json!([1, "x"])).is_empty());
    }

    #[test]
    fn test_document_nests_dot_paths() {
        let results = parse_query_response(&json!([[
            "k",
            "1",
            [["name", "Ann"], ["profile.age", 30], ["profile.city", "Oslo"]]
        ]]));
        assert_eq!(
            results[0].document().unwrap(),
            json!({"name": "Ann", "profile": {"age": 30, "city": "Oslo"}})
        );
    }

    #[test]
    fn test_document_whole_value_key() {
        let results = parse_query_response(&json!([["k", "1", [["$", {"a": 1}]]]]));
        assert_eq!(results[0].document().unwrap(), json!({"a": 1}));
        assert_eq!(
            parse_query_response(&json!([["k", "1"]]))[0].document(),
            None
        );
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&json!("42")), Some(42));
        assert_eq!(parse_count(&json!(42)), Some(42));
        assert_eq!(parse_count(&json!(" 7 docs")), Some(7));
        assert_eq!(parse_count(&json!("-3")), Some(-3));
        assert_eq!(parse_count(&json!("abc")), None);
        assert_eq!(parse_count(&json!(null)), None);
    }

    #[test]
    fn test_describe_array_form() {
        let raw = json!([
            "name", "users",
            "type", "HASH",
            "prefixes", ["user:"],
            "language", "english",
            "schema", [["name", "TEXT", "NOSTEM"], ["age", "U64", "FAST"], ["bad", "NOPE"]]
        ]);
        let description = parse_describe_response(&raw).unwrap();
        assert_eq!(description.index_name, "users");
        assert_eq!(description.data_type, "hash");
        assert_eq!(description.prefixes, ["user:"]);
        assert_eq!(description.language.as_deref(), Some("english"));
        let schema: Vec<(&str, FieldType)> = description
            .schema
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(schema, [("name", FieldType::Text), ("age", FieldType::U64)]);
    }

    #[test]
    fn test_describe_object_form() {
        let raw = json!({
            "name": "docs",
            "type": "String",
            "prefixes": ["d:"],
            "schema": {"title": {"type": "TEXT", "noStem": true}, "n": "F64"}
        });
        let description = parse_describe_response(&raw).unwrap();
        assert_eq!(description.data_type, "string");
        assert_eq!(description.language, None);
        assert_eq!(description.schema["title"], FieldType::Text);
        assert_eq!(description.schema["n"], FieldType::F64);
    }

    #[test]
    fn test_describe_empty_reply() {
        assert_eq!(parse_describe_response(&json!(null)), None);
        assert_eq!(parse_describe_response(&json!([])), None);
    }

    #[test]
    fn test_parse_aliases() {
        let aliases = parse_aliases(&json!([["a1", "idx1"], ["a2", "idx2"], ["broken"]]));
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases["a2"], "idx2");
        assert!(parse_aliases(&json!(0)).is_empty());
        assert!(parse_aliases(&json!([])).is_empty());
    }
}
