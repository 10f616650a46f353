// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// Reply envelope: exactly one of `result` / `error` is expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RawReply {
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// An `error` wins over a `result`; a reply with neither is `null`.
    pub fn into_result(self) -> Result<Value, SearchError> {
        match self.error {
            Some(message) => Err(SearchError::Server(message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Sends one command (an ordered token list) and returns its decoded reply.
///
/// Implementations map a server error reply to [`SearchError::Server`] with
/// the server's message, and reject an empty token list with
/// [`SearchError::InvalidCommand`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, command: &[String]) -> Result<Value, SearchError>;
}
