// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Redis transport.
//!
//! Sends each token list as a raw command over a multiplexed
//! [`ConnectionManager`] and decodes the RESP reply into JSON:
//!
//! ```text
//! bulk / simple string  → string      integer → number
//! array / set           → array       map     → object
//! nil                   → null        OK      → "OK"
//! ```

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::traits::Transport;
use crate::error::SearchError;

pub struct RedisTransport {
    connection: ConnectionManager,
}

impl RedisTransport {
    /// Connect to the engine.
    ///
    /// ```rust,no_run
    /// # use search_index::transport::RedisTransport;
    /// # async fn example() -> Result<(), search_index::SearchError> {
    /// let transport = RedisTransport::connect("redis://127.0.0.1:6379").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self, SearchError> {
        let client = Client::open(url).map_err(|e| SearchError::Connection(e.to_string()))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| SearchError::Connection(e.to_string()))?;
        debug!(url, "Connected to search engine");
        Ok(Self { connection })
    }

    /// Clone of the underlying connection manager
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

#[async_trait]
impl Transport for RedisTransport {
    async fn execute(&self, command: &[String]) -> Result<Value, SearchError> {
        let (name, args) = command.split_first().ok_or(SearchError::InvalidCommand)?;

        let mut cmd = redis::cmd(name);
        for arg in args {
            cmd.arg(arg);
        }

        let mut conn = self.connection.clone();
        let reply: redis::Value = cmd.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(redis_to_json(reply))
    }
}

fn map_redis_error(e: RedisError) -> SearchError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
    {
        return SearchError::Connection(e.to_string());
    }
    // Keep the server text as sent: "<CODE> <detail>"
    match (e.code(), e.detail()) {
        (Some(code), Some(detail)) => SearchError::Server(format!("{code} {detail}")),
        (None, Some(detail)) => SearchError::Server(detail.to_string()),
        _ => SearchError::Server(e.to_string()),
    }
}

fn redis_to_json(value: redis::Value) -> Value {
    match value {
        redis::Value::Nil => Value::Null,
        redis::Value::Int(n) => Value::from(n),
        redis::Value::BulkString(bytes) => {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        redis::Value::SimpleString(s) => Value::String(s),
        redis::Value::Okay => Value::String("OK".to_string()),
        redis::Value::Array(items) | redis::Value::Set(items) => {
            Value::Array(items.into_iter().map(redis_to_json).collect())
        }
        redis::Value::Map(pairs) => {
            let mut map = Map::new();
            for (k, v) in pairs {
                let key = match redis_to_json(k) {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                map.insert(key, redis_to_json(v));
            }
            Value::Object(map)
        }
        redis::Value::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        redis::Value::Boolean(b) => Value::Bool(b),
        redis::Value::VerbatimString { text, .. } => Value::String(text),
        redis::Value::Attribute { data, .. } => redis_to_json(*data),
        redis::Value::BigNumber(n) => Value::String(n.to_string()),
        // Nested error entries keep the server text: "<CODE> <detail>"
        redis::Value::ServerError(err) => Value::String(match err.details() {
            Some(detail) => format!("{} {detail}", err.code()),
            None => err.code().to_string(),
        }),
        _ => Value::Null,
    }
}
