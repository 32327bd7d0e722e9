//! Error hierarchy for nosql-core.
//!
//! Each layer has its own error enum; [`AppError`] wraps them so callers can
//! use a single `Result` type with `?`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("ClientError: {0}")]
    Client(#[from] ClientError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("QueryError: {0}")]
    Query(#[from] QueryError),
}

/// Errors raised by the database client façade.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("Request timed out after {timeout_secs}s ({endpoint})")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{mode} mode is not supported")]
    UnsupportedMode { mode: String },
    #[error("Client is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("Statement is empty")]
    EmptyStatement,
    #[error("No table name found in statement")]
    NoTableName,
}
