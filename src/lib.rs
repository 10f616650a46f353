// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Search Index
//!
//! A typed client for a document search engine that speaks a RESP command
//! dialect (`SEARCH.CREATE`, `SEARCH.QUERY`, `SEARCH.COUNT`, ...).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Schema Layer                         │
//! │  • s::text() / s::integer().fast() / schema!{...}          │
//! │  • Nested schemas flattened to dot-paths                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Command Layer                         │
//! │  • QueryFilter AST → JSON query ($or / $range)             │
//! │  • QueryOptions → LIMIT / ORDERBY / SELECT / SCOREFUNC     │
//! │  • Replies parsed into QueryResult / IndexDescription      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Index Facade                         │
//! │  • SearchClient / SearchIndex                              │
//! │  • Transport: redis ConnectionManager or in-memory         │
//! │  • tracing spans + metrics per command                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use search_index::{schema, SearchClient, SearchClientConfig};
//! use search_index::schema::s;
//! use search_index::search::{CreateIndexParams, QueryFilter, QueryOptions, SortDirection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), search_index::SearchError> {
//!     let client = SearchClient::connect(SearchClientConfig::default()).await?;
//!
//!     let products = client
//!         .create_index(
//!             CreateIndexParams::new(
//!                 "products",
//!                 schema! {
//!                     name: s::text(),
//!                     price: s::float(),
//!                     meta: schema! { in_stock: s::bool().fast() },
//!                 },
//!             )
//!             .prefix("product:")
//!             .exists_ok(),
//!         )
//!         .await?;
//!
//!     let filter = QueryFilter::field("price")
//!         .less_than(50)
//!         .and(QueryFilter::field("meta.in_stock").equals(true));
//!     let options = QueryOptions::new()
//!         .limit(10)
//!         .order_by("price", Some(SortDirection::Asc));
//!
//!     for hit in products.query(Some(&filter), &options).await? {
//!         println!("{} ({}) {:?}", hit.key, hit.score, hit.document());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See [`SearchClientConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`schema`]: Field types, schema builders, flattening
//! - [`search`]: Filters, query options, command builders, reply parsers
//! - [`transport`]: How commands reach the engine
//! - [`client`]: [`SearchClient`] and [`SearchIndex`]
//! - [`metrics`]: Command counters and latency histograms

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod schema;
pub mod search;
pub mod transport;

pub use client::{SearchClient, SearchIndex};
pub use config::SearchClientConfig;
pub use error::SearchError;
pub use schema::{FieldType, Schema};
pub use search::{QueryFilter, QueryOptions, QueryResult};
pub use transport::{RawReply, RecordingTransport, RedisTransport, Transport};
