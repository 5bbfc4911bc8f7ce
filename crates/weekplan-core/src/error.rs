//! Core error types for weekplan-core.
//!
//! Each concern gets its own thiserror enum; [`CoreError`] unifies the ones
//! that can fail while opening a session from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weekplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Planning model errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the key-value persistence layer.
///
/// None of these are fatal: the caller keeps its in-memory week and may
/// retry the save later.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Storage is unavailable (locked, full, read-only)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Snapshot could not be encoded
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing an exported snapshot failed
    #[error("Failed to write export to {path}: {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by planning model edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Weekday index outside 0..=6
    #[error("day index {0} out of range (expected 0-6)")]
    DayOutOfRange(u8),

    /// Week offset whose dates fall outside the supported calendar
    #[error("week offset {0} is out of range")]
    OffsetOutOfRange(i64),

    /// Priority slot outside 0..=2
    #[error("priority slot {0} out of range (expected 0-2)")]
    SlotOutOfRange(u8),

    /// No item with this id in the targeted collection
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// An item with this id already exists in the targeted collection
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Failures inside a quote provider. Never shown to the user; the quote
/// service replaces them with a fallback string.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// No API key available
    #[error("no API key found in ${0}")]
    MissingApiKey(String),

    /// Quote generation is disabled in config
    #[error("quote generation is disabled")]
    Disabled,

    /// The HTTP client could not be constructed
    #[error("HTTP client unavailable")]
    ClientUnavailable,

    /// Network or HTTP failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// Response did not contain usable text
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Errors the quote service does surface to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteRequestError {
    /// A quote request is already in flight
    #[error("a quote request is already in progress")]
    Busy,

    /// Could not start an async runtime for a blocking request
    #[error("failed to start runtime: {0}")]
    Runtime(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => match e.code {
                rusqlite::ErrorCode::DatabaseLocked
                | rusqlite::ErrorCode::DatabaseBusy
                | rusqlite::ErrorCode::DiskFull
                | rusqlite::ErrorCode::ReadOnly
                | rusqlite::ErrorCode::CannotOpen => StoreError::Unavailable(err.to_string()),
                _ => StoreError::QueryFailed(err.to_string()),
            },
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
