// Copyright 2026 Cowboy AI, LLC.

//! Error types for graph synchronization

use thiserror::Error;

/// Result type for graph synchronization operations
pub type Result<T> = std::result::Result<T, GraphSyncError>;

/// Errors that can occur during graph synchronization
#[derive(Debug, Error)]
pub enum GraphSyncError {
    /// Neo4j database error
    #[error("Neo4j database error: {0}")]
    Database(#[from] neo4rs::Error),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Schema rejected at construction time
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// Record is not a flat key-value object
    #[error("Record {0} is not a JSON object")]
    RecordNotObject(usize),

    /// Record is missing a field the schema requires
    #[error("Record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: String },

    /// One-to-many field resolved to something other than a list
    #[error("Record {index} field '{field}' must resolve to a list")]
    ExpectedList { index: usize, field: String },

    /// Keyword binding referenced by the schema was not supplied
    #[error("Missing keyword binding '{0}'")]
    MissingBinding(String),

    /// Batch size must be positive
    #[error("Batch size must be greater than 0, got {0}")]
    BatchSize(usize),

    /// Statement rejected by a contract check
    #[error("Invalid statement: {0}")]
    Statement(String),
}
