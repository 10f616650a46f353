//! Property-based tests (fuzzing) for schema flattening and reply parsing.
//!
//! Uses proptest to generate random schemas and malformed engine replies and
//! verify that flattening is a faithful pre-order walk and that parsers
//! never panic.
//!
//! Run with: `cargo test --test proptest_fuzz`

use proptest::prelude::*;
use serde_json::{json, Value};

use search_index::schema::{flatten_schema, DetailedField, FieldType, Schema, SchemaNode};
use search_index::search::{
    build_query_command, parse_aliases, parse_count, parse_describe_response,
    parse_query_response, QueryCommand, QueryDialect, QueryOptions, QueryTranslator,
};
use search_index::QueryFilter;

// =============================================================================
// Strategies for generating test data
// =============================================================================

fn field_type_strategy() -> impl Strategy<Value = FieldType> {
    prop::sample::select(FieldType::ALL.to_vec())
}

fn flag_strategy() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![Just(None), any::<bool>().prop_map(Some)]
}

fn leaf_node_strategy() -> impl Strategy<Value = SchemaNode> {
    prop_oneof![
        field_type_strategy().prop_map(SchemaNode::Field),
        (
            field_type_strategy(),
            flag_strategy(),
            flag_strategy(),
            flag_strategy(),
            prop::option::of("[a-z_.]{1,8}"),
        )
            .prop_map(|(field_type, fast, no_tokenize, no_stem, from)| {
                SchemaNode::Detailed(DetailedField {
                    field_type,
                    fast,
                    no_tokenize,
                    no_stem,
                    from,
                })
            }),
    ]
}

/// Random schema trees up to a few levels deep
fn schema_strategy() -> impl Strategy<Value = Schema> {
    let leaf = leaf_node_strategy();
    let node = leaf.prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec((key_strategy(), inner), 1..4)
            .prop_map(|entries| SchemaNode::Nested(build_schema(entries)))
    });
    prop::collection::vec((key_strategy(), node), 0..6).prop_map(build_schema)
}

/// Field names; never `type`, which would make a nested object read back
/// as a detailed field
fn key_strategy() -> impl Strategy<Value = String> {
    "k[a-z]{0,5}"
}

fn build_schema(entries: Vec<(String, SchemaNode)>) -> Schema {
    let mut schema = Schema::new();
    for (key, node) in entries {
        schema.insert(key, node);
    }
    schema
}

/// Generate arbitrary JSON values (including invalid structures)
fn arbitrary_json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        4,   // depth
        64,  // max nodes
        10,  // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Value::Array),
                prop::collection::hash_map(".*", inner, 0..10)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Reference pre-order walk, independent of the library's flattener
fn expected_paths(schema: &Schema, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in schema {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match node {
            SchemaNode::Nested(inner) => expected_paths(inner, &path, out),
            _ => out.push(path),
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn flatten_is_preorder(schema in schema_strategy()) {
        let mut expected = Vec::new();
        expected_paths(&schema, "", &mut expected);

        let paths: Vec<String> = flatten_schema(&schema).into_iter().map(|f| f.path).collect();
        prop_assert_eq!(paths, expected);
    }

    #[test]
    fn flagless_detailed_field_flattens_like_bare_type(field_type in field_type_strategy()) {
        let mut bare = Schema::new();
        bare.insert("f", SchemaNode::Field(field_type));
        let mut detailed = Schema::new();
        detailed.insert("f", SchemaNode::Detailed(DetailedField::new(field_type)));

        prop_assert_eq!(flatten_schema(&bare), flatten_schema(&detailed));
    }

    #[test]
    fn schema_json_round_trips(schema in schema_strategy()) {
        let value = serde_json::to_value(&schema).unwrap();
        let back: Schema = serde_json::from_value(value).unwrap();
        prop_assert_eq!(flatten_schema(&back), flatten_schema(&schema));
    }

    #[test]
    fn parsers_never_panic(raw in arbitrary_json_strategy()) {
        let results = parse_query_response(&raw);
        for result in &results {
            let _ = result.document();
            let _ = result.score_value();
        }
        let _ = parse_count(&raw);
        let _ = parse_describe_response(&raw);
        let _ = parse_aliases(&raw);
    }

    #[test]
    fn query_items_are_kept_in_order(keys in prop::collection::vec("[a-z0-9:]{1,12}", 0..20)) {
        let raw = Value::Array(keys.iter().map(|k| json!([k, "1"])).collect());
        let parsed: Vec<String> = parse_query_response(&raw).into_iter().map(|r| r.key).collect();
        prop_assert_eq!(parsed, keys);
    }

    #[test]
    fn filter_parsing_never_panics(raw in arbitrary_json_strategy()) {
        if let Ok(filter) = QueryFilter::from_value(&raw) {
            let _ = QueryTranslator::translate(&filter);
        }
    }

    #[test]
    fn count_of_integer_strings(n in any::<i64>()) {
        prop_assert_eq!(parse_count(&json!(n.to_string())), Some(n));
        prop_assert_eq!(parse_count(&json!(n)), Some(n));
    }

    #[test]
    fn query_command_always_starts_with_name_and_json(
        name in "[a-z]{1,10}",
        limit in prop::option::of(0u64..1000),
        offset in prop::option::of(0u64..1000),
    ) {
        let mut options = QueryOptions::new();
        options.limit = limit;
        options.offset = offset;
        let cmd = build_query_command(QueryCommand::Query, &name, None, &options, QueryDialect::Current)
            .unwrap();

        prop_assert_eq!(&cmd[0], "SEARCH.QUERY");
        prop_assert_eq!(&cmd[1], &name);
        prop_assert_eq!(&cmd[2], "{}");
        let expected_len = 3 + 2 * usize::from(limit.is_some()) + 2 * usize::from(offset.is_some());
        prop_assert_eq!(cmd.len(), expected_len);
    }
}
