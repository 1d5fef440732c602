// Copyright 2026 Cowboy AI, LLC.

//! Canonical entity materialization
//!
//! Reads every mapped source label back out of the graph, projects each
//! row through its module's field mappings, merges rows that share a
//! canonical identifier, and loads the result through the ordinary node
//! pipeline so canonical entities get the same stamping and cleanup
//! treatment as any other schema.

use std::collections::{BTreeMap, HashMap};

use neo4rs::Query;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::client::{GraphClient, GraphConfig};
use crate::error::{GraphSyncError, Result};
use crate::loader::{drain_statement, load_nodes};
use crate::ontology::mapping::{NodeMapping, OntologyMapping};
use crate::schema::property::PropertySource;
use crate::schema::NodeSchema;
use crate::sync::SyncParams;

/// Read-back statement for one source label, one canonical column per
/// field mapping
fn read_statement(node: &NodeMapping) -> String {
    let columns: Vec<String> = node
        .fields
        .iter()
        .map(|field| {
            format!(
                "{} AS {}",
                field.transform.render("n", &field.source_field),
                field.canonical_field
            )
        })
        .collect();
    format!("MATCH (n:{})\nRETURN {}", node.source_label, columns.join(", "))
}

/// Record field the canonical schema reads its identifier from
///
/// Merging needs a per-row identifier, so a canonical schema whose id
/// comes from a batch-wide binding cannot be unified.
fn canonical_id_key(schema: &NodeSchema) -> Result<&str> {
    match &schema.id_property().source {
        PropertySource::Field(key) => Ok(key),
        PropertySource::Binding(_) => Err(GraphSyncError::Schema(format!(
            "canonical schema '{}' must bind id to a record field",
            schema.label()
        ))),
    }
}

fn ensure_id_mapped(node: &NodeMapping, id_key: &str, module: &str) -> Result<()> {
    if node.fields.iter().any(|f| f.canonical_field == id_key) {
        return Ok(());
    }
    Err(GraphSyncError::Schema(format!(
        "module '{}' mapping of '{}' never fills canonical id field '{}'",
        module, node.source_label, id_key
    )))
}

/// Mappings to read, in precedence order
///
/// An empty allow-list means every mapping participates in declaration
/// order. A non-empty allow-list restricts and reorders; entries without
/// a mapping are skipped with a warning rather than failing the run.
fn active_mappings<'a>(
    mappings: &'a [OntologyMapping],
    sources_of_truth: &[String],
) -> Vec<&'a OntologyMapping> {
    if sources_of_truth.is_empty() {
        return mappings.iter().collect();
    }
    let mut active = Vec::new();
    for source in sources_of_truth {
        match mappings.iter().find(|m| m.module() == source) {
            Some(mapping) => active.push(mapping),
            None => warn!("Source of truth '{}' has no ontology mapping", source),
        }
    }
    for mapping in mappings {
        if !sources_of_truth.iter().any(|s| s == mapping.module()) {
            debug!(
                "Module '{}' is not a source of truth here, its rows only link",
                mapping.module()
            );
        }
    }
    active
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Fold one projected row into the per-identifier merge, earlier sources
/// winning and later sources filling only null gaps
fn merge_record(
    merged: &mut BTreeMap<String, Map<String, Value>>,
    id: String,
    record: Map<String, Value>,
) {
    let entry = merged.entry(id).or_default();
    for (key, value) in record {
        match entry.get(&key) {
            Some(current) if !current.is_null() => {}
            _ => {
                entry.insert(key, value);
            }
        }
    }
}

/// Materialize canonical nodes from every mapped source label
///
/// Each eligible source label is read back through its field mappings,
/// rows missing a required field or the canonical identifier are dropped,
/// and rows sharing an identifier are merged across sources in
/// `sources_of_truth` order. The merged records then go through
/// [`load_nodes`] against `canonical`, so stale canonical nodes age out
/// by sync marker like any other schema.
pub async fn unify_canonical_nodes(
    client: &GraphClient,
    config: &GraphConfig,
    canonical: &NodeSchema,
    mappings: &[OntologyMapping],
    sources_of_truth: &[String],
    params: &SyncParams,
) -> Result<()> {
    let id_key = canonical_id_key(canonical)?;
    let active = active_mappings(mappings, sources_of_truth);
    let mut merged: BTreeMap<String, Map<String, Value>> = BTreeMap::new();

    for mapping in &active {
        for node in &mapping.nodes {
            if !node.eligible_for_source {
                debug!(
                    "Label '{}' is link-only in module '{}', not reading it",
                    node.source_label,
                    mapping.module()
                );
                continue;
            }
            ensure_id_mapped(node, id_key, mapping.module())?;

            let mut rows = 0usize;
            let mut stream = client.execute(Query::new(read_statement(node))).await?;
            while let Some(row) = stream.next().await? {
                let mut record = Map::new();
                let mut gated = false;
                for field in &node.fields {
                    let value = row
                        .get::<Value>(field.canonical_field.as_str())
                        .unwrap_or(Value::Null);
                    if field.required && value.is_null() {
                        debug!(
                            "Skipping a '{}' row with no '{}'",
                            node.source_label, field.canonical_field
                        );
                        gated = true;
                        break;
                    }
                    record.insert(field.canonical_field.clone(), value);
                }
                if gated {
                    continue;
                }
                match record.get(id_key).and_then(id_string) {
                    Some(id) => {
                        merge_record(&mut merged, id, record);
                        rows += 1;
                    }
                    None => {
                        debug!("Skipping a '{}' row with no identifier", node.source_label)
                    }
                }
            }
            debug!(
                "Read {} '{}' rows for module '{}'",
                rows,
                node.source_label,
                mapping.module()
            );
        }
    }

    let records: Vec<Value> = merged.into_values().map(Value::Object).collect();
    info!(
        "Unified {} {} records from {} mappings",
        records.len(),
        canonical.label(),
        active.len()
    );
    load_nodes(client, config, canonical, &records, params).await
}

/// Run every mapping's link statements to fence canonical nodes back to
/// their sources
///
/// Linkage runs over all mappings regardless of any source-of-truth
/// restriction applied during unification: a source excluded from field
/// precedence still gets its nodes attached. Each statement is driven
/// until a pass modifies fewer rows than the configured limit.
pub async fn link_canonical_nodes(
    client: &GraphClient,
    config: &GraphConfig,
    mappings: &[OntologyMapping],
    params: &SyncParams,
) -> Result<()> {
    if config.cleanup_limit == 0 {
        return Err(GraphSyncError::BatchSize(0));
    }
    let bindings = HashMap::new();
    for mapping in mappings {
        for statement in &mapping.links {
            let modified =
                drain_statement(client, config, statement, &bindings, params, "modified").await?;
            info!(
                "Link statement for module '{}' touched {} rows",
                mapping.module(),
                modified
            );
        }
    }
    Ok(())
}
