// Copyright 2026 Cowboy AI, LLC.

//! Load orchestration
//!
//! Drives resolve, compile and execute for one schema at a time. Node
//! loads must run before the relationship or matchlink loads that target
//! them, because endpoint matching requires the target to already exist.
//! Large batches are chunked into bounded write units; a failed chunk
//! leaves earlier chunks committed and aborts the rest unmodified.

use neo4rs::{BoltType, Query};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::bolt::json_to_bolt;
use crate::cleanup::{build_cleanup_statements, build_matchlink_cleanup_statement};
use crate::client::{GraphClient, GraphConfig};
use crate::error::{GraphSyncError, Result};
use crate::query::{
    build_ingest_statement, build_matchlink_index_statements, build_matchlink_statement,
    build_node_index_statements,
};
use crate::resolve::{resolve_links, resolve_nodes, ResolvedBatch};
use crate::schema::property::PropertySource;
use crate::schema::{CleanupMode, MatchLinkSchema, NodeSchema};
use crate::sync::{Scope, SyncParams};

/// Upsert a batch of records against a node schema
///
/// Ensures the schema's indexes exist, resolves the records, then writes
/// them chunk by chunk. Every written node and relationship is stamped
/// with the run's marker.
pub async fn load_nodes(
    client: &GraphClient,
    config: &GraphConfig,
    schema: &NodeSchema,
    records: &[Value],
    params: &SyncParams,
) -> Result<()> {
    if config.batch_size == 0 {
        return Err(GraphSyncError::BatchSize(0));
    }
    if records.is_empty() {
        debug!("No {} records to load", schema.label());
        return Ok(());
    }

    client
        .ensure_indexes(&build_node_index_statements(schema))
        .await?;

    let batch = resolve_nodes(schema, records, params.bindings())?;
    let statement = build_ingest_statement(schema);
    execute_batched(client, config, &statement, &batch, params, &[]).await?;

    info!("Loaded {} {} records", records.len(), schema.label());
    Ok(())
}

/// Merge a batch of matchlink records between two existing node sets
///
/// Records whose source or target endpoint is not found are skipped
/// silently. Every written edge carries the scope so cleanup for one
/// scope never touches another's links.
pub async fn load_links(
    client: &GraphClient,
    config: &GraphConfig,
    schema: &MatchLinkSchema,
    records: &[Value],
    scope: &Scope,
    params: &SyncParams,
) -> Result<()> {
    if config.batch_size == 0 {
        return Err(GraphSyncError::BatchSize(0));
    }
    if records.is_empty() {
        debug!("No {} links to load", schema.rel_type());
        return Ok(());
    }

    client
        .ensure_indexes(&build_matchlink_index_statements(schema))
        .await?;

    let batch = resolve_links(schema, records, params.bindings())?;
    let statement = build_matchlink_statement(schema);
    let extra = [
        ("_scope_label", BoltType::from(scope.label.clone())),
        ("_scope_id", BoltType::from(scope.id.clone())),
    ];
    execute_batched(client, config, &statement, &batch, params, &extra).await?;

    info!("Loaded {} {} links", records.len(), schema.rel_type());
    Ok(())
}

/// Delete graph state a node schema no longer reports
///
/// Runs the schema's cleanup statements in order, draining each one in
/// `cleanup_limit`-sized passes until it deletes fewer rows than the
/// limit.
pub async fn run_cleanup(
    client: &GraphClient,
    config: &GraphConfig,
    schema: &NodeSchema,
    params: &SyncParams,
) -> Result<()> {
    if config.cleanup_limit == 0 {
        return Err(GraphSyncError::BatchSize(0));
    }
    let statements = build_cleanup_statements(schema);
    if statements.is_empty() {
        debug!("No cleanup statements for {}", schema.label());
        return Ok(());
    }

    let bindings = scope_bindings(schema, params)?;
    let mut total = 0;
    for statement in &statements {
        total += drain_statement(client, config, statement, &bindings, params, "deleted").await?;
    }

    info!("Cleaned up {} stale {} rows", total, schema.label());
    Ok(())
}

/// Delete matchlink edges the current run no longer reports, within one scope
pub async fn cleanup_links(
    client: &GraphClient,
    config: &GraphConfig,
    schema: &MatchLinkSchema,
    scope: &Scope,
    params: &SyncParams,
) -> Result<()> {
    if config.cleanup_limit == 0 {
        return Err(GraphSyncError::BatchSize(0));
    }

    let statement = build_matchlink_cleanup_statement(schema);
    let bindings = HashMap::from([
        ("_scope_label".to_string(), BoltType::from(scope.label.clone())),
        ("_scope_id".to_string(), BoltType::from(scope.id.clone())),
    ]);
    let total = drain_statement(client, config, &statement, &bindings, params, "deleted").await?;

    info!("Cleaned up {} stale {} links", total, schema.rel_type());
    Ok(())
}

/// Write a resolved batch in `batch_size` chunks
async fn execute_batched(
    client: &GraphClient,
    config: &GraphConfig,
    statement: &str,
    batch: &ResolvedBatch,
    params: &SyncParams,
    extra: &[(&str, BoltType)],
) -> Result<()> {
    for (number, chunk) in batch.items.chunks(config.batch_size).enumerate() {
        let items: Vec<BoltType> = chunk.iter().cloned().map(BoltType::from).collect();
        let mut query = Query::new(statement.to_string())
            .param("items", items)
            .param("sync_marker", params.marker());
        for (name, value) in &batch.bindings {
            query = query.param(name.as_str(), value.clone());
        }
        for (name, value) in extra {
            query = query.param(name, value.clone());
        }
        client.run(query).await?;
        debug!("Wrote batch {} ({} records)", number + 1, chunk.len());
    }
    Ok(())
}

/// Run one LIMIT-batched statement until a pass affects fewer rows than
/// the limit, summing the counts it reports under `counter`
pub(crate) async fn drain_statement(
    client: &GraphClient,
    config: &GraphConfig,
    statement: &str,
    bindings: &HashMap<String, BoltType>,
    params: &SyncParams,
    counter: &str,
) -> Result<i64> {
    let limit = config.cleanup_limit as i64;
    let mut total = 0;
    loop {
        let mut query = Query::new(statement.to_string())
            .param("sync_marker", params.marker())
            .param("limit", limit);
        for (name, value) in bindings {
            query = query.param(name.as_str(), value.clone());
        }
        let mut stream = client.execute(query).await?;
        let affected: i64 = match stream.next().await? {
            Some(row) => row.get(counter).unwrap_or(0),
            None => 0,
        };
        total += affected;
        if affected < limit {
            break;
        }
    }
    Ok(total)
}

/// Keyword bindings a scoped cleanup's boundary matcher references
fn scope_bindings(schema: &NodeSchema, params: &SyncParams) -> Result<HashMap<String, BoltType>> {
    let mut bindings = HashMap::new();
    if schema.cleanup_mode() != CleanupMode::Scoped {
        return Ok(bindings);
    }
    if let Some(sub) = schema.sub_resource() {
        for clause in &sub.matcher.clauses {
            if let PropertySource::Binding(name) = &clause.value.source {
                let value = params
                    .bindings()
                    .get(name)
                    .ok_or_else(|| GraphSyncError::MissingBinding(name.clone()))?;
                bindings.insert(name.clone(), json_to_bolt(value));
            }
        }
    }
    Ok(bindings)
}
