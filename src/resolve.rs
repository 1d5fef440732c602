// Copyright 2026 Cowboy AI, LLC.

//! Property resolution for record batches
//!
//! Resolution is a pure transformation: it checks every value a schema
//! references against the invocation's records and keyword bindings, then
//! produces the Bolt parameter maps compiled statements consume. Statements
//! reference per-record values as `item.<field>` and keyword values as
//! `$<binding>`, so each record converts whole and keeps its source field
//! keys.

use std::collections::HashMap;

use neo4rs::BoltType;
use serde_json::Value;

use crate::bolt::{bolt_null, json_object_to_bolt_map, json_to_bolt};
use crate::error::{GraphSyncError, Result};
use crate::schema::property::{MatchMode, PropertyRef, PropertySource};
use crate::schema::{MatchLinkSchema, NodeSchema};

/// A record batch resolved against a schema, ready for execution
#[derive(Debug, Clone, Default)]
pub struct ResolvedBatch {
    /// One Bolt map per input record, keyed by source field key
    pub(crate) items: Vec<HashMap<String, BoltType>>,
    /// Batch-level parameters for keyword-bound values
    pub(crate) bindings: HashMap<String, BoltType>,
}

impl ResolvedBatch {
    /// Number of resolved records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch holds no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolved per-record parameter maps, in input order
    pub fn items(&self) -> &[HashMap<String, BoltType>] {
        &self.items
    }

    /// Resolved batch-level keyword parameters
    pub fn bindings(&self) -> &HashMap<String, BoltType> {
        &self.bindings
    }
}

/// One schema value reference checked against every record
struct RefCheck<'a> {
    value: &'a PropertyRef,
    list: bool,
}

/// Resolve a node batch: declared properties plus every relationship
/// matcher and relationship property
pub fn resolve_nodes(
    schema: &NodeSchema,
    records: &[Value],
    bindings: &HashMap<String, Value>,
) -> Result<ResolvedBatch> {
    resolve(&node_checks(schema), records, bindings)
}

/// Resolve a matchlink batch: both endpoint matchers plus the
/// relationship properties
pub fn resolve_links(
    schema: &MatchLinkSchema,
    records: &[Value],
    bindings: &HashMap<String, Value>,
) -> Result<ResolvedBatch> {
    resolve(&link_checks(schema), records, bindings)
}

fn node_checks(schema: &NodeSchema) -> Vec<RefCheck<'_>> {
    let mut checks = Vec::new();
    for (_, value) in schema.properties.iter() {
        checks.push(RefCheck { value, list: false });
    }
    for rel in schema.all_relationships() {
        for clause in &rel.matcher.clauses {
            checks.push(RefCheck {
                value: &clause.value,
                list: clause.mode == MatchMode::AnyOf,
            });
        }
        for (_, value) in rel.properties.iter() {
            checks.push(RefCheck { value, list: false });
        }
    }
    checks
}

fn link_checks(schema: &MatchLinkSchema) -> Vec<RefCheck<'_>> {
    let mut checks = Vec::new();
    let clauses = schema
        .source_matcher
        .clauses
        .iter()
        .chain(schema.target_matcher.clauses.iter());
    for clause in clauses {
        checks.push(RefCheck {
            value: &clause.value,
            list: false,
        });
    }
    for (_, value) in schema.properties.iter() {
        checks.push(RefCheck { value, list: false });
    }
    checks
}

fn resolve(
    checks: &[RefCheck<'_>],
    records: &[Value],
    bindings: &HashMap<String, Value>,
) -> Result<ResolvedBatch> {
    // Keyword bindings fail loudly regardless of the batch contents
    let mut resolved_bindings: HashMap<String, BoltType> = HashMap::new();
    for check in checks {
        if let PropertySource::Binding(name) = &check.value.source {
            if !resolved_bindings.contains_key(name) {
                let value = bindings
                    .get(name)
                    .ok_or_else(|| GraphSyncError::MissingBinding(name.clone()))?;
                resolved_bindings.insert(name.clone(), json_to_bolt(value));
            }
        }
    }

    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let obj = record
            .as_object()
            .ok_or(GraphSyncError::RecordNotObject(index))?;

        for check in checks {
            let key = match &check.value.source {
                PropertySource::Field(key) => key,
                PropertySource::Binding(_) => continue,
            };
            match obj.get(key) {
                None if !check.value.optional => {
                    return Err(GraphSyncError::MissingField {
                        index,
                        field: key.clone(),
                    });
                }
                Some(v) if check.list && !v.is_null() && !v.is_array() => {
                    return Err(GraphSyncError::ExpectedList {
                        index,
                        field: key.clone(),
                    });
                }
                _ => {}
            }
        }

        let mut item = json_object_to_bolt_map(obj);
        // Optional absent fields become explicit nulls so statements can
        // still reference them
        for check in checks {
            if let PropertySource::Field(key) = &check.value.source {
                if check.value.optional && !obj.contains_key(key) {
                    item.insert(key.clone(), bolt_null());
                }
            }
        }
        items.push(item);
    }

    Ok(ResolvedBatch {
        items,
        bindings: resolved_bindings,
    })
}
