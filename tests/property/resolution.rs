// Copyright 2026 Cowboy AI, LLC.
//! Property-Based Tests for Record Resolution
//!
//! Resolution turns raw JSON records into Bolt parameter maps. These tests
//! verify the contracts callers rely on: valid batches resolve whole,
//! invalid records are reported by index and field, and keyword bindings
//! fail loudly before any record is inspected.

use std::collections::HashMap;

use infragraph::resolve::{resolve_links, resolve_nodes};
use infragraph::{
    Direction, GraphSyncError, MatchLinkSchema, Matcher, NodeSchema, PropertyRef, RelSchema,
};
use neo4rs::BoltType;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Fixtures and Strategies
// ============================================================================

/// Node schema with a required field, an optional field, and a keyword
/// binding
fn host_schema() -> NodeSchema {
    NodeSchema::builder("Host")
        .property("id", PropertyRef::field("hostname"))
        .property("os", PropertyRef::field("os").optional())
        .property("region", PropertyRef::binding("region"))
        .build()
        .expect("host schema is valid")
}

/// Node schema whose relationship matcher expects a list value
fn membership_schema() -> NodeSchema {
    NodeSchema::builder("Host")
        .property("id", PropertyRef::field("hostname"))
        .relationship(RelSchema::new(
            "HostGroup",
            "MEMBER_OF",
            Direction::Outward,
            Matcher::new().any_of("id", PropertyRef::field("group_ids")),
        ))
        .build()
        .expect("membership schema is valid")
}

/// Generate one valid host record; `os` is present in roughly half of them
/// and `cores` is never mapped by the schema at all
fn host_record() -> impl Strategy<Value = Value> {
    (
        "[a-z][a-z0-9-]{0,16}",
        proptest::option::of("[a-z]{2,8}"),
        1u32..512,
    )
        .prop_map(|(hostname, os, cores)| match os {
            Some(os) => json!({"hostname": hostname, "os": os, "cores": cores}),
            None => json!({"hostname": hostname, "cores": cores}),
        })
}

fn record_batch() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(host_record(), 0..30)
}

fn non_empty_record_batch() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(host_record(), 1..30)
}

/// Generate a scalar that is not a JSON object
fn non_object() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn region_bindings(region: &str) -> HashMap<String, Value> {
    HashMap::from([("region".to_string(), json!(region))])
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Valid batches resolve completely
    ///
    /// Every well-formed record produces exactly one parameter map, in
    /// input order.
    #[test]
    fn prop_valid_batches_resolve_whole(
        records in record_batch(),
        region in "[a-z]{2}-[a-z]{4,8}-[0-9]",
    ) {
        let batch = resolve_nodes(&host_schema(), &records, &region_bindings(&region))
            .expect("valid batch must resolve");

        prop_assert_eq!(batch.len(), records.len(), "one item per record");
    }

    /// Property: Records pass through whole
    ///
    /// Resolution keeps every source field of a record, including fields
    /// no schema property references, so compiled statements can reach
    /// any of them as `item.<field>`.
    #[test]
    fn prop_records_pass_through_whole(
        records in record_batch(),
        region in "[a-z]{2}-[a-z]{4,8}-[0-9]",
    ) {
        let batch = resolve_nodes(&host_schema(), &records, &region_bindings(&region))
            .expect("valid batch must resolve");

        for (record, item) in records.iter().zip(batch.items()) {
            for key in record.as_object().expect("record is an object").keys() {
                prop_assert!(
                    item.contains_key(key),
                    "source field '{}' must survive resolution", key
                );
            }
        }
    }

    /// Property: Absent optional fields become explicit nulls
    ///
    /// A record missing an optional field still gets the key, bound to
    /// null, so statements referencing it never hit a missing property.
    #[test]
    fn prop_optional_gap_becomes_explicit_null(
        records in record_batch(),
        region in "[a-z]{2}-[a-z]{4,8}-[0-9]",
    ) {
        let batch = resolve_nodes(&host_schema(), &records, &region_bindings(&region))
            .expect("valid batch must resolve");

        for (record, item) in records.iter().zip(batch.items()) {
            let had_os = record.as_object().expect("record is an object").contains_key("os");
            match item.get("os") {
                Some(BoltType::Null(_)) => prop_assert!(!had_os, "present value must not null out"),
                Some(_) => prop_assert!(had_os, "absent field must resolve to null"),
                None => prop_assert!(false, "optional field must always have a key"),
            }
        }
    }

    /// Property: Keyword bindings resolve to batch parameters
    ///
    /// A binding referenced by the schema appears once in the batch-level
    /// parameters with its bound value.
    #[test]
    fn prop_keyword_bindings_resolve(
        records in record_batch(),
        region in "[a-z]{2}-[a-z]{4,8}-[0-9]",
    ) {
        let batch = resolve_nodes(&host_schema(), &records, &region_bindings(&region))
            .expect("valid batch must resolve");

        prop_assert_eq!(
            batch.bindings().get("region"),
            Some(&BoltType::from(region)),
            "binding value must pass through unchanged"
        );
    }

    /// Property: Missing bindings fail before any record is read
    ///
    /// Binding resolution is batch-wide, so it fails loudly even for an
    /// empty batch.
    #[test]
    fn prop_missing_binding_fails_loudly(records in record_batch()) {
        let result = resolve_nodes(&host_schema(), &records, &HashMap::new());

        match result {
            Err(GraphSyncError::MissingBinding(name)) => {
                prop_assert_eq!(name, "region");
            }
            other => prop_assert!(false, "expected MissingBinding, got {:?}", other),
        }
    }

    /// Property: The first invalid record is reported by index and field
    #[test]
    fn prop_missing_field_is_reported_by_index(
        records in non_empty_record_batch(),
        pick in any::<prop::sample::Index>(),
        region in "[a-z]{2}-[a-z]{4,8}-[0-9]",
    ) {
        let corrupt = pick.index(records.len());
        let mut records = records;
        records[corrupt]
            .as_object_mut()
            .expect("record is an object")
            .remove("hostname");

        let result = resolve_nodes(&host_schema(), &records, &region_bindings(&region));

        match result {
            Err(GraphSyncError::MissingField { index, field }) => {
                prop_assert_eq!(index, corrupt, "error must name the bad record");
                prop_assert_eq!(field, "hostname");
            }
            other => prop_assert!(false, "expected MissingField, got {:?}", other),
        }
    }

    /// Property: Non-object records are reported by index
    #[test]
    fn prop_non_object_record_is_reported(
        records in non_empty_record_batch(),
        pick in any::<prop::sample::Index>(),
        scalar in non_object(),
        region in "[a-z]{2}-[a-z]{4,8}-[0-9]",
    ) {
        let corrupt = pick.index(records.len());
        let mut records = records;
        records[corrupt] = scalar;

        let result = resolve_nodes(&host_schema(), &records, &region_bindings(&region));

        match result {
            Err(GraphSyncError::RecordNotObject(index)) => {
                prop_assert_eq!(index, corrupt, "error must name the bad record");
            }
            other => prop_assert!(false, "expected RecordNotObject, got {:?}", other),
        }
    }

    /// Property: List matchers accept lists and reject scalars
    ///
    /// A one-to-many matcher field must hold a list (or null); a scalar
    /// would silently fan out to nothing, so it fails resolution instead.
    #[test]
    fn prop_list_matcher_rejects_scalars(
        hostname in "[a-z][a-z0-9-]{0,16}",
        groups in prop::collection::vec("[a-z]{1,8}", 0..5),
        scalar in non_object(),
    ) {
        let schema = membership_schema();

        let list_record = vec![json!({"hostname": &hostname, "group_ids": groups})];
        prop_assert!(
            resolve_nodes(&schema, &list_record, &HashMap::new()).is_ok(),
            "list values must resolve"
        );

        let scalar_record = vec![json!({"hostname": &hostname, "group_ids": scalar})];
        match resolve_nodes(&schema, &scalar_record, &HashMap::new()) {
            Err(GraphSyncError::ExpectedList { index, field }) => {
                prop_assert_eq!(index, 0);
                prop_assert_eq!(field, "group_ids");
            }
            other => prop_assert!(false, "expected ExpectedList, got {:?}", other),
        }
    }

    /// Property: Integers beyond i64 survive as strings
    ///
    /// Bolt integers are signed 64-bit, so larger values are carried as
    /// decimal strings instead of being truncated.
    #[test]
    fn prop_big_integers_become_strings(
        hostname in "[a-z][a-z0-9-]{0,16}",
        big in (i64::MAX as u64 + 1)..u64::MAX,
    ) {
        let records = vec![json!({"hostname": hostname, "cores": big})];
        let batch = resolve_nodes(&host_schema(), &records, &region_bindings("eu-west-1"))
            .expect("valid batch must resolve");

        prop_assert_eq!(
            batch.items()[0].get("cores"),
            Some(&BoltType::from(big.to_string())),
            "oversized integer must become its decimal string"
        );
    }

    /// Property: Matchlink resolution checks both endpoint matchers
    #[test]
    fn prop_matchlink_resolution_checks_both_sides(
        email in "[a-z]{2,10}@corp\\.com",
        login in "[a-z]{2,10}",
    ) {
        let schema = MatchLinkSchema::builder("Employee", "IDENTITY_OF", "Account")
            .source_matcher(Matcher::on("email", PropertyRef::field("email")))
            .target_matcher(Matcher::on("login", PropertyRef::field("login")))
            .build()
            .expect("link schema is valid");

        let complete = vec![json!({"email": &email, "login": &login})];
        prop_assert!(resolve_links(&schema, &complete, &HashMap::new()).is_ok());

        let half = vec![json!({"email": &email})];
        match resolve_links(&schema, &half, &HashMap::new()) {
            Err(GraphSyncError::MissingField { index, field }) => {
                prop_assert_eq!(index, 0);
                prop_assert_eq!(field, "login");
            }
            other => prop_assert!(false, "expected MissingField, got {:?}", other),
        }
    }
}

// ============================================================================
// Standard Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_empty_batch_resolves_empty() {
        let batch = resolve_nodes(&host_schema(), &[], &region_bindings("eu-west-1"))
            .expect("empty batch must resolve");
        assert!(batch.is_empty());
        assert_eq!(batch.bindings().len(), 1);
    }

    #[test]
    fn test_null_list_value_is_allowed() {
        // Null fans out to nothing at match time; only scalars are rejected
        let records = vec![json!({"hostname": "web-01", "group_ids": null})];
        assert!(resolve_nodes(&membership_schema(), &records, &HashMap::new()).is_ok());
    }
}
