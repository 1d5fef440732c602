// Copyright 2026 Cowboy AI, LLC.

//! Statement compilation
//!
//! Turns schemas into parameterized Cypher. Every ingest statement is a
//! single batch upsert over `$items`; relationship branches run as
//! UNION-joined unit subqueries so a missed endpoint skips that branch
//! without blocking the others. All writes stamp `last_updated` and
//! `sync_marker`; `first_seen` is set only on creation.

use crate::schema::property::{MatchMode, Matcher};
use crate::schema::{MatchLinkSchema, NodeSchema, RelSchema};

/// Prefix every index statement must carry before execution
pub const INDEX_PREFIX: &str = "CREATE INDEX IF NOT EXISTS";

/// Render a string as a quoted Cypher literal
pub(crate) fn escape_literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Inline match map for an all-exact matcher: `key: ref, key2: ref2`
pub(crate) fn match_map(matcher: &Matcher) -> String {
    let pairs: Vec<String> = matcher
        .clauses
        .iter()
        .map(|c| format!("{}: {}", c.key, c.value.cypher_ref()))
        .collect();
    pairs.join(", ")
}

/// WHERE predicates for a matcher that needs more than exact equality
fn where_predicates(node_var: &str, matcher: &Matcher) -> String {
    let preds: Vec<String> = matcher
        .clauses
        .iter()
        .map(|c| {
            let value = c.value.cypher_ref();
            match c.mode {
                MatchMode::Exact => format!("{}.{} = {}", node_var, c.key, value),
                MatchMode::IgnoreCase => {
                    format!("toLower({}.{}) = toLower({})", node_var, c.key, value)
                }
                MatchMode::Contains => {
                    format!("toLower({}.{}) CONTAINS toLower({})", node_var, c.key, value)
                }
                MatchMode::AnyOf => format!("{}.{} IN {}", node_var, c.key, value),
            }
        })
        .collect();
    preds.join(" AND ")
}

/// Compile the batch upsert statement for a node schema
///
/// Parameters: `$items` (the resolved batch), `$sync_marker`, plus any
/// keyword bindings the schema declares.
pub fn build_ingest_statement(schema: &NodeSchema) -> String {
    let mut lines = vec![
        "UNWIND $items AS item".to_string(),
        format!(
            "MERGE (i:{} {{id: {}}})",
            schema.label,
            schema.id_property().cypher_ref()
        ),
        "ON CREATE SET i.first_seen = timestamp()".to_string(),
        "SET".to_string(),
    ];

    let mut assignments = Vec::new();
    if let Some(provenance) = &schema.provenance {
        assignments.push(format!(
            "i._module_name = {}",
            escape_literal(&provenance.module)
        ));
        assignments.push(format!(
            "i._module_version = {}",
            escape_literal(&provenance.version)
        ));
    }
    for (name, value) in schema.properties.iter() {
        // MERGE already set id
        if name == "id" {
            continue;
        }
        assignments.push(format!("i.{} = {}", name, value.cypher_ref()));
    }
    if let Some(overlay) = &schema.semantic {
        assignments.push(format!(
            "i._ont_source = {}",
            escape_literal(&overlay.source_module)
        ));
        for (field, expr) in &overlay.assignments {
            assignments.push(format!("i._ont_{} = {}", field, expr));
        }
    }
    assignments.push("i.last_updated = timestamp()".to_string());
    assignments.push("i.sync_marker = $sync_marker".to_string());

    let mut labels: Vec<&str> = schema.extra_labels.iter().map(String::as_str).collect();
    if let Some(overlay) = &schema.semantic {
        labels.push(&overlay.label);
    }
    if !labels.is_empty() {
        assignments.push(format!("i:{}", labels.join(":")));
    }
    lines.push(assignments.join(",\n"));

    let rels: Vec<&RelSchema> = schema.all_relationships().collect();
    if !rels.is_empty() {
        lines.push("WITH i, item".to_string());
        lines.push("CALL {".to_string());
        let branches: Vec<String> = rels
            .iter()
            .enumerate()
            .map(|(k, rel)| rel_branch(k, rel, schema))
            .collect();
        for line in branches.join("\nUNION\n").lines() {
            lines.push(format!("    {}", line));
        }
        lines.push("}".to_string());
    }

    lines.join("\n")
}

/// One UNION branch attaching a declared relationship
fn rel_branch(k: usize, rel: &RelSchema, schema: &NodeSchema) -> String {
    let node_var = format!("n{}", k);
    let rel_var = format!("r{}", k);

    let mut lines = vec!["WITH i, item".to_string()];
    if rel.matcher.all_exact() {
        lines.push(format!(
            "OPTIONAL MATCH ({}:{} {{{}}})",
            node_var,
            rel.target_label,
            match_map(&rel.matcher)
        ));
    } else {
        lines.push(format!("OPTIONAL MATCH ({}:{})", node_var, rel.target_label));
        lines.push(format!("WHERE {}", where_predicates(&node_var, &rel.matcher)));
    }
    lines.push(format!(
        "WITH i, item, {} WHERE {} IS NOT NULL",
        node_var, node_var
    ));
    let (left, right) = rel.direction.arrows();
    lines.push(format!(
        "MERGE (i){}[{}:{}]{}({})",
        left, rel_var, rel.rel_type, right, node_var
    ));
    lines.push(format!(
        "ON CREATE SET {}.first_seen = timestamp()",
        rel_var
    ));
    lines.push("SET".to_string());

    let mut assignments = Vec::new();
    if let Some(provenance) = &schema.provenance {
        assignments.push(format!(
            "{}._module_name = {}",
            rel_var,
            escape_literal(&provenance.module)
        ));
        assignments.push(format!(
            "{}._module_version = {}",
            rel_var,
            escape_literal(&provenance.version)
        ));
    }
    for (name, value) in rel.properties.iter() {
        assignments.push(format!("{}.{} = {}", rel_var, name, value.cypher_ref()));
    }
    assignments.push(format!("{}.last_updated = timestamp()", rel_var));
    assignments.push(format!("{}.sync_marker = $sync_marker", rel_var));
    lines.push(assignments.join(",\n"));

    lines.join("\n")
}

/// Compile the batch upsert statement for a matchlink schema
///
/// Both endpoints are plain MATCHes: a record whose source or target does
/// not exist merges nothing and is skipped without error. Parameters:
/// `$items`, `$sync_marker`, `$_scope_label`, `$_scope_id`.
pub fn build_matchlink_statement(schema: &MatchLinkSchema) -> String {
    let (left, right) = schema.direction.arrows();
    let mut lines = vec![
        "UNWIND $items AS item".to_string(),
        format!(
            "MATCH (from:{} {{{}}})",
            schema.source_label,
            match_map(&schema.source_matcher)
        ),
        format!(
            "MATCH (to:{} {{{}}})",
            schema.target_label,
            match_map(&schema.target_matcher)
        ),
        format!("MERGE (from){}[r:{}]{}(to)", left, schema.rel_type, right),
        "ON CREATE SET r.first_seen = timestamp()".to_string(),
        "SET".to_string(),
    ];

    let mut assignments = Vec::new();
    if let Some(provenance) = &schema.provenance {
        assignments.push(format!(
            "r._module_name = {}",
            escape_literal(&provenance.module)
        ));
        assignments.push(format!(
            "r._module_version = {}",
            escape_literal(&provenance.version)
        ));
    }
    for (name, value) in schema.properties.iter() {
        assignments.push(format!("r.{} = {}", name, value.cypher_ref()));
    }
    assignments.push("r.last_updated = timestamp()".to_string());
    assignments.push("r.sync_marker = $sync_marker".to_string());
    assignments.push("r._scope_label = $_scope_label".to_string());
    assignments.push("r._scope_id = $_scope_id".to_string());
    lines.push(assignments.join(",\n"));

    lines.join("\n")
}

fn node_index(label: &str, prop: &str) -> String {
    format!("{} FOR (n:{}) ON (n.{})", INDEX_PREFIX, label, prop)
}

fn push_unique(statements: &mut Vec<String>, statement: String) {
    if !statements.contains(&statement) {
        statements.push(statement);
    }
}

/// Index statements covering a node schema: identifier and marker on the
/// main label, identifier on every extra label, every matcher key on its
/// target label, and each property flagged for indexing
pub fn build_node_index_statements(schema: &NodeSchema) -> Vec<String> {
    let mut statements = Vec::new();
    push_unique(&mut statements, node_index(&schema.label, "id"));
    push_unique(&mut statements, node_index(&schema.label, "sync_marker"));
    for label in &schema.extra_labels {
        push_unique(&mut statements, node_index(label, "id"));
    }
    if let Some(overlay) = &schema.semantic {
        push_unique(&mut statements, node_index(&overlay.label, "id"));
    }
    for (name, value) in schema.properties.iter() {
        if value.indexed {
            push_unique(&mut statements, node_index(&schema.label, name));
        }
    }
    for rel in schema.all_relationships() {
        for clause in &rel.matcher.clauses {
            push_unique(&mut statements, node_index(&rel.target_label, &clause.key));
        }
    }
    statements
}

/// Index statements covering a matchlink schema: endpoint matcher keys on
/// their labels plus a composite index on the relationship bookkeeping
pub fn build_matchlink_index_statements(schema: &MatchLinkSchema) -> Vec<String> {
    let mut statements = Vec::new();
    for clause in &schema.source_matcher.clauses {
        push_unique(&mut statements, node_index(&schema.source_label, &clause.key));
    }
    for clause in &schema.target_matcher.clauses {
        push_unique(&mut statements, node_index(&schema.target_label, &clause.key));
    }
    // Index patterns are undirected regardless of the schema direction
    push_unique(
        &mut statements,
        format!(
            "{} FOR ()-[r:{}]-() ON (r.sync_marker, r._scope_label, r._scope_id)",
            INDEX_PREFIX, schema.rel_type
        ),
    );
    statements
}
