// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index Facade
//!
//! Binds the pure command builders and reply parsers to a [`Transport`].
//!
//! ```text
//! SearchClient ── create_index(params) ──→ SEARCH.CREATE ──→ SearchIndex
//!      │                                                        │
//!      ├─ index(name, schema?)  (no wire call) ─────────────────┤
//!      └─ add_alias / del_alias / list_aliases                  ├─ query / count
//!                                                               ├─ describe / wait_indexing
//!                                                               └─ commit / drop_index
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # use search_index::{schema, SearchClient, SearchClientConfig};
//! # use search_index::schema::s;
//! # use search_index::search::{CreateIndexParams, QueryFilter, QueryOptions};
//! # async fn example() -> Result<(), search_index::SearchError> {
//! let client = SearchClient::connect(SearchClientConfig::default()).await?;
//!
//! let users = client
//!     .create_index(
//!         CreateIndexParams::new("users", schema! { name: s::text(), age: s::unsigned_integer() })
//!             .prefix("user:"),
//!     )
//!     .await?;
//!
//! let filter = QueryFilter::field("age").greater_than(18);
//! let hits = users.query(Some(&filter), &QueryOptions::new().limit(10)).await?;
//! # Ok(())
//! # }
//! ```

mod search_api;

pub use search_api::SearchIndex;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SearchClientConfig;
use crate::error::SearchError;
use crate::metrics::{self, LatencyTimer};
use crate::schema::Schema;
use crate::search::{
    build_create_index_command, commands, parse_aliases, parse_count, CreateIndexParams,
};
use crate::transport::{RedisTransport, Transport};

/// Entry point: owns the transport and hands out [`SearchIndex`] handles.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
    config: Arc<SearchClientConfig>,
}

impl SearchClient {
    pub fn new(transport: Arc<dyn Transport>, config: SearchClientConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Connect over redis to `config.redis_url`.
    pub async fn connect(config: SearchClientConfig) -> Result<Self, SearchError> {
        let transport = RedisTransport::connect(&config.redis_url).await?;
        Ok(Self::new(Arc::new(transport), config))
    }

    #[must_use]
    pub fn config(&self) -> &SearchClientConfig {
        &self.config
    }

    /// Create an index and return a handle to it.
    pub async fn create_index(&self, params: CreateIndexParams) -> Result<SearchIndex, SearchError> {
        let command = build_create_index_command(&params)?;
        dispatch(self.transport.as_ref(), &command).await?;

        info!(
            index = %params.name,
            data_type = %params.data_type,
            prefixes = ?params.prefix,
            "Search index created"
        );

        Ok(self.index(params.name, Some(params.schema)))
    }

    /// Handle to an existing index. No command is sent.
    ///
    /// With a schema, filters are validated before sending (see
    /// [`SearchClientConfig::validate_filters`]).
    #[must_use]
    pub fn index(&self, name: impl Into<String>, schema: Option<Schema>) -> SearchIndex {
        SearchIndex::new(
            name.into(),
            schema,
            Arc::clone(&self.transport),
            Arc::clone(&self.config),
        )
    }

    /// Point `alias` at `index_name`. Returns the engine's status code.
    pub async fn add_alias(&self, index_name: &str, alias: &str) -> Result<i64, SearchError> {
        let command = vec![
            commands::ALIASADD.to_string(),
            alias.to_string(),
            index_name.to_string(),
        ];
        let reply = dispatch(self.transport.as_ref(), &command).await?;
        Ok(parse_count(&reply).unwrap_or(0))
    }

    /// Remove `alias`. Returns whether it existed.
    pub async fn del_alias(&self, alias: &str) -> Result<bool, SearchError> {
        let command = vec![commands::ALIASDEL.to_string(), alias.to_string()];
        let reply = dispatch(self.transport.as_ref(), &command).await?;
        Ok(parse_count(&reply).unwrap_or(0) == 1)
    }

    /// All aliases as `alias -> index`.
    pub async fn list_aliases(&self) -> Result<IndexMap<String, String>, SearchError> {
        let command = vec![commands::LISTALIASES.to_string()];
        let reply = dispatch(self.transport.as_ref(), &command).await?;
        Ok(parse_aliases(&reply))
    }
}

/// Send one command with logging and metrics around it.
pub(crate) async fn dispatch(
    transport: &dyn Transport,
    command: &[String],
) -> Result<Value, SearchError> {
    let name = command.first().map(String::as_str).unwrap_or_default();
    let subject = command.get(1).map(String::as_str).unwrap_or_default();
    debug!(command = name, index = subject, args = command.len(), "Sending search command");

    let result = {
        let _timer = LatencyTimer::new(name);
        transport.execute(command).await
    };

    metrics::record_command(name, result.is_ok());
    if let Err(e) = &result {
        warn!(command = name, index = subject, error = %e, "Search command failed");
    }
    result
}
