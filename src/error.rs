//! Error types for the scoring pipeline.

use std::time::Duration;

use thiserror::Error;

/// Errors from the UniEval evaluation service.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Authentication failed for {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Errors from the tabular storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Unknown table: {name}")]
    UnknownTable { name: String },
}

/// Errors from running a pipeline operator.
#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Column not found: {key}")]
    ColumnNotFound { key: String },

    #[error("Unknown metric: {name}")]
    UnknownMetric { name: String },

    #[error("Unknown operator: {name}")]
    UnknownOperator { name: String },
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: String, reason: String },
}
