// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use thiserror::Error;

/// Errors raised while compiling commands or talking to the engine.
///
/// Everything except [`SearchError::Server`] and [`SearchError::Connection`]
/// is raised synchronously, before any command reaches the wire.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("No value provided for field '{field}'")]
    UndefinedValue { field: String },
    #[error("Unsupported operation: {0}")]
    UnknownOperation(String),
    #[error("No operations provided for field '{field}'")]
    EmptyOperations { field: String },
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Operation '{operation}' is not supported on {field_type} field '{field}'")]
    UnsupportedOperation {
        field: String,
        operation: String,
        field_type: String,
    },
    #[error("Invalid data type '{0}', expected one of: hash, string, json")]
    InvalidDataType(String),
    #[error("Invalid language '{0}'")]
    InvalidLanguage(String),
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    #[error("{0}")]
    Server(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Cannot send an empty command")]
    InvalidCommand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_carries_message_verbatim() {
        let err = SearchError::Server("ERR index already exists".into());
        assert_eq!(err.to_string(), "ERR index already exists");
    }

    #[test]
    fn test_filter_error_messages() {
        let err = SearchError::UndefinedValue { field: "age".into() };
        assert_eq!(err.to_string(), "No value provided for field 'age'");

        let err = SearchError::UnknownOperation("between".into());
        assert_eq!(err.to_string(), "Unsupported operation: between");
    }
}
