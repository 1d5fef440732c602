// Copyright 2026 Cowboy AI, LLC.

//! Graph store connection

use neo4rs::{DetachedRowStream, Graph, Query};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{GraphSyncError, Result};
use crate::query::INDEX_PREFIX;

/// Graph store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Bolt URI (e.g., "bolt://localhost:7687")
    pub uri: String,

    /// Username for authentication
    pub user: String,

    /// Password for authentication
    pub password: String,

    /// Optional database name (defaults to "neo4j")
    pub database: Option<String>,

    /// Records per batched write statement
    pub batch_size: usize,

    /// Rows removed per cleanup pass
    pub cleanup_limit: usize,
}

impl GraphConfig {
    /// Create a new graph store configuration
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the database name
    pub fn with_database(mut self, database: String) -> Self {
        self.database = Some(database);
        self
    }

    /// Set the write batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the per-pass cleanup row limit
    pub fn with_cleanup_limit(mut self, cleanup_limit: usize) -> Self {
        self.cleanup_limit = cleanup_limit;
        self
    }

    /// Get the database name (defaults to "neo4j" if not set)
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or("neo4j")
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "".to_string(), // No auth by default
            password: "".to_string(),
            database: None,
            batch_size: 10_000,
            cleanup_limit: 10_000,
        }
    }
}

/// Every statement handed to [`GraphClient::ensure_indexes`] must be an
/// index creation
fn validate_index_statements(statements: &[String]) -> Result<()> {
    for statement in statements {
        if !statement.starts_with(INDEX_PREFIX) {
            return Err(GraphSyncError::Statement(format!(
                "expected an index creation, got '{}'",
                statement
            )));
        }
    }
    Ok(())
}

/// Shared handle to the graph store
#[derive(Clone)]
pub struct GraphClient {
    graph: Arc<Graph>,
}

impl GraphClient {
    /// Connect to the graph store
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        info!("Connecting to graph store at {}", config.uri);

        let graph = Graph::new(&config.uri, &config.user, &config.password)
            .await
            .map_err(|e| GraphSyncError::Connection(e.to_string()))?;

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Run a write statement, discarding any rows it returns
    pub async fn run(&self, query: Query) -> Result<()> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a statement and stream its rows back
    pub async fn execute(&self, query: Query) -> Result<DetachedRowStream> {
        Ok(self.graph.execute(query).await?)
    }

    /// Create the given indexes if they do not already exist
    pub async fn ensure_indexes(&self, statements: &[String]) -> Result<()> {
        validate_index_statements(statements)?;
        for statement in statements {
            self.graph.run(Query::new(statement.clone())).await?;
        }
        Ok(())
    }

    /// Get the underlying graph connection
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.database(), "neo4j");
        assert_eq!(config.batch_size, 10_000);
        assert_eq!(config.cleanup_limit, 10_000);
    }

    #[test]
    fn test_config_builders() {
        let config = GraphConfig::new("bolt://graph.internal:7687", "sync", "secret")
            .with_database("assets".to_string())
            .with_batch_size(500)
            .with_cleanup_limit(50);
        assert_eq!(config.database(), "assets");
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.cleanup_limit, 50);
    }

    #[test]
    fn test_index_statement_validation() {
        let good = vec!["CREATE INDEX IF NOT EXISTS FOR (n:Host) ON (n.id)".to_string()];
        assert!(validate_index_statements(&good).is_ok());

        let bad = vec!["MATCH (n) DETACH DELETE n".to_string()];
        let err = validate_index_statements(&bad).unwrap_err();
        assert!(err.to_string().contains("index creation"));
    }
}
