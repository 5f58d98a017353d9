//! Error types for the Gitcoin MCP server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when talking to an external data provider
/// (gas API, FX conversion, subgraph).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Provider returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// A GraphQL query did not come back with a 200
    #[error("Query failed. return code is {status}. {query}")]
    QueryFailed { status: u16, query: String },

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Errors raised by the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A lookup matched no record
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The record failed field validation before it was written
    #[error("Invalid record: {0}")]
    Invalid(String),

    /// The database driver reported an error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be decoded
    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    /// The connection cannot be used (e.g. its lock was poisoned)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors surfaced by view handlers.
#[derive(Error, Debug)]
pub enum ViewError {
    /// Request parameters were rejected
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A data provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The persistence layer failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The context could not be rendered
    #[error("Render error: {0}")]
    Render(String),
}

/// Errors that abort an import run as a whole.
///
/// Failures of a single row never surface here; they are recorded in the
/// run's report instead.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The input file could not be read as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The upstream source failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The persistence layer failed outside a row
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for Results with ProviderError
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ViewError
pub type ViewResult<T> = Result<T, ViewError>;

/// Convenience type alias for Results with ImportError
pub type ImportResult<T> = Result<T, ImportError>;
