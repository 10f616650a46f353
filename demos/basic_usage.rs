// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic search-index usage example.
//!
//! Demonstrates:
//! 1. Defining a nested schema and creating an index
//! 2. Querying with a filter, ordering, highlighting and a score function
//! 3. Counting and describing the index
//! 4. Displaying metrics
//! 5. Dropping the index
//!
//! Without `SEARCH_INDEX_URL` the example runs dry against an in-memory
//! transport and prints the commands it would send.
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! SEARCH_INDEX_URL=redis://localhost:6379 cargo run --example basic_usage
//! ```

use std::sync::Arc;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::json;

use search_index::schema::s;
use search_index::search::{
    CreateIndexParams, DataType, FieldValueScore, Highlight, Modifier, QueryFilter, QueryOptions,
    ScoreFunction, SortDirection,
};
use search_index::{schema, RecordingTransport, SearchClient, SearchClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_index=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║           search-index: Basic Usage Example                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Connect (or run dry)
    // ─────────────────────────────────────────────────────────────────────────
    let dry_run = match std::env::var("SEARCH_INDEX_URL") {
        Ok(url) => {
            println!("🔌 Connecting to {url}...");
            let client = SearchClient::connect(SearchClientConfig {
                redis_url: url,
                ..Default::default()
            })
            .await?;
            run(&client).await?;
            None
        }
        Err(_) => {
            println!("🧪 No SEARCH_INDEX_URL set, running against an in-memory transport");
            let transport = Arc::new(scripted_transport());
            let client = SearchClient::new(transport.clone(), SearchClientConfig::default());
            run(&client).await?;
            Some(transport)
        }
    };

    if let Some(transport) = dry_run {
        println!("\n📜 Commands sent:");
        for command in transport.commands() {
            println!("   {}", command.join(" "));
        }
    }

    println!("\n📊 Metrics:");
    dump_metrics(&snapshotter);
    Ok(())
}

async fn run(client: &SearchClient) -> Result<(), Box<dyn std::error::Error>> {
    // ─────────────────────────────────────────────────────────────────────────
    // 2. Create the index
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📦 Creating index 'products'...");
    let products = client
        .create_index(
            CreateIndexParams::new(
                "products",
                schema! {
                    name: s::text(),
                    description: s::text().no_stem(),
                    price: s::float(),
                    rating: s::unsigned_integer(),
                    stock: schema! {
                        available: s::bool().fast(),
                        restocked: s::date(),
                    },
                },
            )
            .data_type(DataType::Json)
            .prefix("product:")
            .exists_ok(),
        )
        .await?;
    products.wait_indexing().await?;

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Query
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🔎 Querying available products under 100...");
    let filter = QueryFilter::field("price")
        .less_than(100)
        .and(QueryFilter::field("stock.available").equals(true));
    let options = QueryOptions::new()
        .limit(5)
        .order_by("price", Some(SortDirection::Asc))
        .highlight(Highlight::fields(["description"]).tags("<b>", "</b>"))
        .score_func(ScoreFunction::field(
            FieldValueScore::new("rating").modifier(Modifier::Log1p),
        ));

    for hit in products.query(Some(&filter), &options).await? {
        println!("   {} (score {}) → {}", hit.key, hit.score, hit.document().unwrap_or_default());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Count and describe
    // ─────────────────────────────────────────────────────────────────────────
    let count = products.count(Some(&filter)).await?;
    println!("\n🔢 Matching documents: {}", count.unwrap_or(0));

    if let Some(description) = products.describe().await? {
        println!("\n📋 Index '{}' on {}", description.index_name, description.data_type);
        for (path, field_type) in &description.schema {
            println!("   {path}: {field_type}");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Clean up
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🧹 Dropping index...");
    products.drop_index().await?;
    Ok(())
}

/// Replies for the dry run, in command order.
fn scripted_transport() -> RecordingTransport {
    let transport = RecordingTransport::new();
    transport.reply_with(json!("OK"));
    transport.reply_with(json!(1));
    transport.reply_with(json!([
        ["product:2", "1.7", [["name", "Desk lamp"], ["price", 39.9], ["stock.available", true]]],
        ["product:9", "1.2", [["name", "Bookshelf"], ["price", 89.0], ["stock.available", true]]]
    ]));
    transport.reply_with(json!("2"));
    transport.reply_with(json!([
        "name", "products",
        "type", "JSON",
        "prefixes", ["product:"],
        "schema", [
            ["name", "TEXT"],
            ["description", "TEXT", "NOSTEM"],
            ["price", "F64", "FAST"],
            ["rating", "U64", "FAST"],
            ["stock.available", "BOOL", "FAST"],
            ["stock.restocked", "DATE"]
        ]
    ]));
    transport.reply_with(json!(1));
    transport
}

fn dump_metrics(snapshotter: &Snapshotter) {
    let mut counters: Vec<_> = vec![];
    let mut histograms: Vec<_> = vec![];

    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let (_, key) = composite_key.into_parts();
        let name = key.name().to_string();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };

        match value {
            DebugValue::Counter(v) => counters.push((name, label_str, v)),
            DebugValue::Histogram(samples) => {
                let count = samples.len();
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                histograms.push((name, label_str, count, sum));
            }
            DebugValue::Gauge(_) => {}
        }
    }

    counters.sort();
    histograms.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

    if !counters.is_empty() {
        println!("   ┌─ Counters");
        for (name, labels, value) in &counters {
            println!("   │  └─ {}{} = {}", name, labels, value);
        }
    }
    if !histograms.is_empty() {
        println!("   └─ Histograms");
        for (name, labels, count, sum) in &histograms {
            println!("      └─ {}{} count={} sum={:.4}", name, labels, count, sum);
        }
    }
    if counters.is_empty() && histograms.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
}
