// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the search client.
//!
//! # Example
//!
//! ```
//! use search_index::SearchClientConfig;
//! use search_index::search::QueryDialect;
//!
//! // Minimal config (uses defaults)
//! let config = SearchClientConfig::default();
//! assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
//!
//! // Full config
//! let config = SearchClientConfig {
//!     redis_url: "redis://search.internal:6379".into(),
//!     query_dialect: QueryDialect::Legacy,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

use crate::search::QueryDialect;

/// Configuration for [`SearchClient`](crate::SearchClient).
///
/// All fields have defaults; an empty config document is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchClientConfig {
    /// Engine connection string
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Keywords used for ordering and projection
    #[serde(default)]
    pub query_dialect: QueryDialect,

    /// Check filters against the index schema (when known) before sending
    #[serde(default = "default_validate_filters")]
    pub validate_filters: bool,
}

fn default_redis_url() -> String { "redis://127.0.0.1:6379".to_string() }
fn default_validate_filters() -> bool { true }

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            query_dialect: QueryDialect::default(),
            validate_filters: default_validate_filters(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: SearchClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.query_dialect, QueryDialect::Current);
        assert!(config.validate_filters);
    }

    #[test]
    fn test_overrides() {
        let config: SearchClientConfig = serde_json::from_str(
            r#"{"redis_url": "redis://other:1", "query_dialect": "legacy", "validate_filters": false}"#,
        )
        .unwrap();
        assert_eq!(config.redis_url, "redis://other:1");
        assert_eq!(config.query_dialect, QueryDialect::Legacy);
        assert!(!config.validate_filters);
    }
}
