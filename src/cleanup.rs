// Copyright 2026 Cowboy AI, LLC.

//! Stale-state reconciliation
//!
//! Compiles the delete statements that remove graph state the current
//! sync no longer reports. Anything whose `sync_marker` differs from the
//! run's marker is stale. Every statement deletes at most `$limit` rows
//! and reports the count as `deleted` so the executor can loop until a
//! pass comes back short.

use crate::query::match_map;
use crate::schema::{CleanupMode, MatchLinkSchema, NodeSchema, RelSchema};

/// Filter, cap, delete and count one variable bound by the preceding MATCHes
fn delete_tail(var: &str, detach: bool) -> String {
    let delete = if detach { "DETACH DELETE" } else { "DELETE" };
    format!(
        "WHERE {}.sync_marker <> $sync_marker\nWITH {} LIMIT $limit\n{} {}\nRETURN COUNT(*) AS deleted",
        var, var, delete, var
    )
}

/// `MATCH (n:Label)<-[s:TYPE]-(:Scope {key: $binding})` pinning n to its scope
fn scope_anchor(schema: &NodeSchema, rel: &RelSchema) -> String {
    let (left, right) = rel.direction.arrows();
    format!(
        "MATCH (n:{}){}[s:{}]{}(:{} {{{}}})",
        schema.label,
        left,
        rel.rel_type,
        right,
        rel.target_label,
        match_map(&rel.matcher)
    )
}

/// `MATCH (n)-[r:TYPE]->(:Target)` for one declared relationship
fn rel_match(rel: &RelSchema) -> String {
    let (left, right) = rel.direction.arrows();
    format!(
        "MATCH (n){}[r:{}]{}(:{})",
        left, rel.rel_type, right, rel.target_label
    )
}

/// Compile the cleanup statements for a node schema, in execution order
///
/// Scoped mode deletes stale nodes inside the scope boundary first, then
/// stale ownership edges, then each declared relationship's stale edges.
/// Global mode does the same without a boundary. RelationshipsOnly never
/// deletes nodes and may compile to nothing.
pub fn build_cleanup_statements(schema: &NodeSchema) -> Vec<String> {
    let mut statements = Vec::new();
    match schema.cleanup_mode {
        CleanupMode::Scoped => {
            // Builder guarantees a keyword-bound sub-resource here
            if let Some(sub) = &schema.sub_resource {
                let anchor = scope_anchor(schema, sub);
                statements.push(format!("{}\n{}", anchor, delete_tail("n", true)));
                statements.push(format!("{}\n{}", anchor, delete_tail("s", false)));
                for rel in &schema.relationships {
                    statements.push(format!(
                        "{}\n{}\n{}",
                        anchor,
                        rel_match(rel),
                        delete_tail("r", false)
                    ));
                }
            }
        }
        CleanupMode::Global => {
            let anchor = format!("MATCH (n:{})", schema.label);
            statements.push(format!("{}\n{}", anchor, delete_tail("n", true)));
            for rel in &schema.relationships {
                statements.push(format!(
                    "{}\n{}\n{}",
                    anchor,
                    rel_match(rel),
                    delete_tail("r", false)
                ));
            }
        }
        CleanupMode::RelationshipsOnly => {
            let anchor = format!("MATCH (n:{})", schema.label);
            for rel in schema.all_relationships() {
                statements.push(format!(
                    "{}\n{}\n{}",
                    anchor,
                    rel_match(rel),
                    delete_tail("r", false)
                ));
            }
        }
    }
    statements
}

/// Compile the cleanup statement for a matchlink schema
///
/// Only edges stamped with the run's scope are candidates, so one
/// source's stale links never touch another's.
pub fn build_matchlink_cleanup_statement(schema: &MatchLinkSchema) -> String {
    let (left, right) = schema.direction.arrows();
    format!(
        "MATCH (:{}){}[r:{}]{}(:{})\n\
         WHERE r.sync_marker <> $sync_marker\n\
         AND r._scope_label = $_scope_label\n\
         AND r._scope_id = $_scope_id\n\
         WITH r LIMIT $limit\n\
         DELETE r\n\
         RETURN COUNT(*) AS deleted",
        schema.source_label, left, schema.rel_type, right, schema.target_label
    )
}
