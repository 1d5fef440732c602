// Copyright 2026 Cowboy AI, LLC.
//! Property-Based Tests for Statement Compilation
//!
//! Compiled statements are the engine's only write path, so a handful of
//! shape invariants must hold for every schema: all writes are stamped,
//! all deletes are fenced by sync marker and paged by limit, and values
//! travel as parameters rather than spliced text.

use infragraph::cleanup::{build_cleanup_statements, build_matchlink_cleanup_statement};
use infragraph::query::{
    build_ingest_statement, build_matchlink_index_statements, build_matchlink_statement,
    build_node_index_statements,
};
use infragraph::{
    CleanupMode, Direction, MatchLinkSchema, Matcher, NodeSchema, PropertyRef, RelSchema,
};
use proptest::prelude::*;

// ============================================================================
// Schema Strategies
// ============================================================================

fn label() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z][A-Za-z0-9]{2,12}").expect("valid regex")
}

/// Property names prefixed to stay clear of `id` and the engine-reserved
/// names
fn field_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("f_[a-z][a-z0-9_]{0,10}").expect("valid regex")
}

/// Generate a valid node schema across all three cleanup modes
fn node_schema() -> impl Strategy<Value = NodeSchema> {
    (
        label(),
        prop::collection::hash_set(field_name(), 0..4),
        0usize..3,
        any::<bool>(),
    )
        .prop_map(|(label, extras, mode, with_rel)| {
            let mut builder =
                NodeSchema::builder(label).property("id", PropertyRef::field("f_id"));
            for name in &extras {
                builder = builder.property(name, PropertyRef::field(name));
            }
            match mode {
                0 => {
                    builder = builder.sub_resource(RelSchema::new(
                        "Tenant",
                        "RESOURCE",
                        Direction::Inward,
                        Matcher::on("id", PropertyRef::binding("b_tenant")),
                    ));
                }
                1 => {
                    builder = builder.cleanup_mode(CleanupMode::Global);
                }
                _ => {}
            }
            if with_rel {
                builder = builder.relationship(RelSchema::new(
                    "HostGroup",
                    "MEMBER_OF",
                    Direction::Outward,
                    Matcher::on("id", PropertyRef::field("f_group")),
                ));
            }
            builder.build().expect("generated schema is valid")
        })
}

fn link_schema() -> impl Strategy<Value = MatchLinkSchema> {
    (label(), label(), "L[A-Z_]{2,10}", any::<bool>())
        .prop_map(|(source, target, rel_type, outward)| {
            let direction = if outward {
                Direction::Outward
            } else {
                Direction::Inward
            };
            MatchLinkSchema::builder(source, rel_type, target)
                .direction(direction)
                .source_matcher(Matcher::on("id", PropertyRef::field("f_source")))
                .target_matcher(Matcher::on("id", PropertyRef::field("f_target")))
                .build()
                .expect("generated link schema is valid")
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Every ingest statement stamps every write
    ///
    /// first_seen on create, last_updated and sync_marker on every pass,
    /// for any schema shape.
    #[test]
    fn prop_ingest_always_stamps(schema in node_schema()) {
        let statement = build_ingest_statement(&schema);

        prop_assert!(statement.starts_with("UNWIND $items AS item\n"));
        prop_assert!(statement.contains("ON CREATE SET i.first_seen = timestamp()"));
        prop_assert!(statement.contains("i.last_updated = timestamp()"));
        prop_assert!(statement.contains("i.sync_marker = $sync_marker"));
    }

    /// Property: Ingest merges on the identifier alone
    ///
    /// Other properties never join the MERGE key, so value changes update
    /// the node in place instead of forking a duplicate.
    #[test]
    fn prop_ingest_merges_only_on_id(schema in node_schema()) {
        let statement = build_ingest_statement(&schema);
        let merge = statement.lines().nth(1).expect("MERGE line present");

        prop_assert_eq!(
            merge,
            format!("MERGE (i:{} {{id: item.f_id}})", schema.label())
        );
    }

    /// Property: Every cleanup statement is fenced and paged
    ///
    /// No delete runs without a sync-marker guard, a row limit, and a
    /// deleted-count report for the pagination loop.
    #[test]
    fn prop_cleanup_statements_fenced_and_paged(schema in node_schema()) {
        for statement in build_cleanup_statements(&schema) {
            prop_assert!(
                statement.contains("sync_marker <> $sync_marker"),
                "unfenced delete:\n{}", statement
            );
            prop_assert!(statement.contains("LIMIT $limit"), "unpaged delete:\n{}", statement);
            prop_assert!(
                statement.ends_with("RETURN COUNT(*) AS deleted"),
                "unreported delete:\n{}", statement
            );
        }
    }

    /// Property: Node deletion comes first, and only once
    ///
    /// Modes that delete nodes do so in the leading statement; the
    /// follow-up edge sweeps never detach anything.
    #[test]
    fn prop_node_delete_leads_and_edges_follow(schema in node_schema()) {
        let statements = build_cleanup_statements(&schema);

        match schema.cleanup_mode() {
            CleanupMode::Scoped | CleanupMode::Global => {
                prop_assert!(statements[0].contains("DETACH DELETE n"));
                for statement in &statements[1..] {
                    prop_assert!(!statement.contains("DETACH"), "stray detach:\n{}", statement);
                }
            }
            CleanupMode::RelationshipsOnly => {
                for statement in &statements {
                    prop_assert!(!statement.contains("DETACH"), "node delete leaked in:\n{}", statement);
                    prop_assert!(statement.contains("DELETE r"));
                }
            }
        }
    }

    /// Property: Scoped cleanup always anchors on the boundary match
    ///
    /// Every statement of a scoped schema restricts itself to the
    /// sub-resource boundary before deleting anything.
    #[test]
    fn prop_scoped_cleanup_anchors_on_boundary(schema in node_schema()) {
        if schema.cleanup_mode() != CleanupMode::Scoped {
            return Ok(());
        }
        for statement in build_cleanup_statements(&schema) {
            prop_assert!(
                statement.contains("(:Tenant {id: $b_tenant})"),
                "unanchored scoped delete:\n{}", statement
            );
        }
    }

    /// Property: Index statements only ever create indexes
    #[test]
    fn prop_index_statements_are_create_only(
        schema in node_schema(),
        link in link_schema(),
    ) {
        for statement in build_node_index_statements(&schema) {
            prop_assert!(statement.starts_with("CREATE INDEX IF NOT EXISTS"));
        }
        for statement in build_matchlink_index_statements(&link) {
            prop_assert!(statement.starts_with("CREATE INDEX IF NOT EXISTS"));
        }
    }

    /// Property: Matchlink writes are stamped and scope-tagged
    #[test]
    fn prop_matchlink_statement_is_scope_tagged(link in link_schema()) {
        let statement = build_matchlink_statement(&link);

        prop_assert!(statement.contains("r.sync_marker = $sync_marker"));
        prop_assert!(statement.contains("r._scope_label = $_scope_label"));
        prop_assert!(statement.contains("r._scope_id = $_scope_id"));
        match link.direction() {
            Direction::Outward => prop_assert!(statement.contains("MERGE (from)-[r:")),
            Direction::Inward => prop_assert!(statement.contains("MERGE (from)<-[r:")),
        }
    }

    /// Property: Matchlink cleanup deletes only within its scope tag
    #[test]
    fn prop_matchlink_cleanup_is_scope_fenced(link in link_schema()) {
        let statement = build_matchlink_cleanup_statement(&link);

        prop_assert!(statement.contains("r.sync_marker <> $sync_marker"));
        prop_assert!(statement.contains("r._scope_label = $_scope_label"));
        prop_assert!(statement.contains("r._scope_id = $_scope_id"));
        prop_assert!(statement.contains("LIMIT $limit"));
        prop_assert!(statement.ends_with("RETURN COUNT(*) AS deleted"));
        prop_assert!(!statement.contains("DETACH"), "matchlink cleanup must never touch nodes");
    }
}
