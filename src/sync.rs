// Copyright 2026 Cowboy AI, LLC.

//! Synchronization run context
//!
//! A run stamps everything it writes with one marker, then removes
//! whatever still carries an older one. Data-source modules plug in as
//! [`SyncStage`] implementations and are driven strictly in sequence.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info};

use crate::client::GraphClient;
use crate::error::Result;

/// Invocation context shared by every load and cleanup call in one run
///
/// Runs targeting the same scope must execute sequentially with one
/// marker each: cleanup compares a single marker per scope, so two
/// interleaved runs with different markers would delete each other's
/// freshly written state.
#[derive(Debug, Clone)]
pub struct SyncParams {
    pub(crate) marker: i64,
    pub(crate) bindings: HashMap<String, Value>,
}

impl SyncParams {
    /// Start a run at the given marker
    pub fn new(marker: i64) -> Self {
        Self {
            marker,
            bindings: HashMap::new(),
        }
    }

    /// Add a batch-wide keyword binding
    pub fn with_binding(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    /// The run's synchronization marker
    pub fn marker(&self) -> i64 {
        self.marker
    }

    /// The run's keyword bindings
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }
}

impl Default for SyncParams {
    /// A fresh run marked with the current Unix timestamp
    fn default() -> Self {
        Self::new(Utc::now().timestamp())
    }
}

/// The ownership boundary a load or cleanup call operates within
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Label of the boundary node (e.g., "AWSAccount")
    pub label: String,
    /// Identifier of the boundary node
    pub id: String,
}

impl Scope {
    /// Create a scope for one boundary node
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

/// One named unit of a synchronization run
///
/// A stage fetches records from its source, loads them, and cleans up
/// its own stale state before returning.
#[async_trait]
pub trait SyncStage: Send + Sync {
    /// Stage name used in run logs
    fn label(&self) -> &str;

    /// Fetch, load and reconcile this stage's slice of the graph
    async fn run(&self, client: &GraphClient, params: &SyncParams) -> Result<()>;
}

/// Execute stages in order, aborting on the first failure
pub async fn run_stages(
    client: &GraphClient,
    params: &SyncParams,
    stages: &[Box<dyn SyncStage>],
) -> Result<()> {
    info!("Starting sync with marker '{}'", params.marker);
    for stage in stages {
        info!("Starting sync stage '{}'", stage.label());
        if let Err(e) = stage.run(client, params).await {
            error!("Sync stage '{}' failed: {}", stage.label(), e);
            return Err(e);
        }
        info!("Finishing sync stage '{}'", stage.label());
    }
    info!("Finishing sync with marker '{}'", params.marker);
    Ok(())
}
