// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Per-index operations.

use std::sync::Arc;

use tracing::{debug, info};

use super::dispatch;
use crate::config::SearchClientConfig;
use crate::error::SearchError;
use crate::metrics;
use crate::schema::{flatten_schema, Schema};
use crate::search::{
    build_query_command, commands, parse_count, parse_describe_response, parse_query_response,
    IndexDescription, QueryCommand, QueryFilter, QueryOptions, QueryResult,
};
use crate::transport::Transport;

/// Handle to one named index.
///
/// Cheap to clone; all handles share the client's transport.
#[derive(Clone)]
pub struct SearchIndex {
    name: String,
    schema: Option<Schema>,
    transport: Arc<dyn Transport>,
    config: Arc<SearchClientConfig>,
}

impl SearchIndex {
    pub(crate) fn new(
        name: String,
        schema: Option<Schema>,
        transport: Arc<dyn Transport>,
        config: Arc<SearchClientConfig>,
    ) -> Self {
        Self {
            name,
            schema,
            transport,
            config,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema this handle was created with, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Run a query. `None` matches every document.
    pub async fn query(
        &self,
        filter: Option<&QueryFilter>,
        options: &QueryOptions,
    ) -> Result<Vec<QueryResult>, SearchError> {
        let command = self.read_command(QueryCommand::Query, filter, options)?;
        let reply = dispatch(self.transport.as_ref(), &command).await?;

        let results = parse_query_response(&reply);
        metrics::record_query_results(results.len());
        debug!(index = %self.name, hits = results.len(), "Query completed");
        Ok(results)
    }

    /// Count matching documents. `None` when the reply isn't a number.
    pub async fn count(&self, filter: Option<&QueryFilter>) -> Result<Option<i64>, SearchError> {
        let command = self.read_command(QueryCommand::Count, filter, &QueryOptions::default())?;
        let reply = dispatch(self.transport.as_ref(), &command).await?;
        Ok(parse_count(&reply))
    }

    /// Server-side description, or `None` if the engine returned nothing.
    pub async fn describe(&self) -> Result<Option<IndexDescription>, SearchError> {
        let reply = self.simple(commands::DESCRIBE).await?;
        Ok(parse_describe_response(&reply))
    }

    /// Make pending writes visible to queries.
    pub async fn commit(&self) -> Result<(), SearchError> {
        self.simple(commands::COMMIT).await?;
        Ok(())
    }

    /// Drop the index. Returns whether it existed.
    pub async fn drop_index(&self) -> Result<bool, SearchError> {
        let reply = self.simple(commands::DROP).await?;
        let dropped = parse_count(&reply).unwrap_or(0) == 1;
        info!(index = %self.name, dropped, "Search index dropped");
        Ok(dropped)
    }

    /// Block until queued documents are indexed.
    pub async fn wait_indexing(&self) -> Result<bool, SearchError> {
        let reply = self.simple(commands::WAITINDEXING).await?;
        Ok(parse_count(&reply).unwrap_or(0) == 1)
    }

    /// Point `alias` at this index.
    pub async fn add_alias(&self, alias: &str) -> Result<i64, SearchError> {
        let command = vec![
            commands::ALIASADD.to_string(),
            alias.to_string(),
            self.name.clone(),
        ];
        let reply = dispatch(self.transport.as_ref(), &command).await?;
        Ok(parse_count(&reply).unwrap_or(0))
    }

    fn read_command(
        &self,
        command: QueryCommand,
        filter: Option<&QueryFilter>,
        options: &QueryOptions,
    ) -> Result<Vec<String>, SearchError> {
        if let (Some(filter), Some(schema), true) =
            (filter, &self.schema, self.config.validate_filters)
        {
            filter.validate(&flatten_schema(schema))?;
        }
        build_query_command(command, &self.name, filter, options, self.config.query_dialect)
    }

    async fn simple(&self, command: &str) -> Result<serde_json::Value, SearchError> {
        let command = vec![command.to_string(), self.name.clone()];
        dispatch(self.transport.as_ref(), &command).await
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
