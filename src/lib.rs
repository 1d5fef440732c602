// Copyright 2026 Cowboy AI, LLC.

//! Declarative graph synchronization for infrastructure inventories
//!
//! This crate ingests heterogeneous infrastructure records and keeps a
//! property graph in step with them. Callers describe node and
//! relationship shapes as data ([`NodeSchema`], [`MatchLinkSchema`]); the
//! engine compiles each description into batched upsert statements, stamps
//! every written row with the run's sync marker, and afterwards deletes
//! whatever the current run did not touch. Repeated runs converge on the
//! source of record instead of accumulating history.
//!
//! ## Graph Model
//!
//! Every node and relationship the engine writes carries three stamps:
//!
//! - **first_seen**: set once when the row is created, never overwritten
//! - **last_updated**: refreshed on every write
//! - **sync_marker**: the run identifier; cleanup deletes rows whose
//!   marker does not match the current run
//!
//! Nodes may additionally carry `_module_name` / `_module_version`
//! provenance and `_ont_`-prefixed canonical fields from the ontology
//! layer. Relationships created by [`MatchLinkSchema`] record the scope
//! that produced them as `_scope_label` / `_scope_id`, so independent
//! scopes age out their own links without touching each other's.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use infragraph::{
//!     Direction, GraphClient, GraphConfig, Matcher, NodeSchema, PropertyRef, RelSchema,
//!     SyncParams,
//! };
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GraphConfig::new("bolt://localhost:7687", "", "");
//!     let client = GraphClient::connect(&config).await?;
//!
//!     let schema = NodeSchema::builder("EC2Instance")
//!         .property("id", PropertyRef::field("instance_id"))
//!         .property("state", PropertyRef::field("state").optional())
//!         .sub_resource(RelSchema::new(
//!             "AWSAccount",
//!             "RESOURCE",
//!             Direction::Inward,
//!             Matcher::on("id", PropertyRef::binding("account_id")),
//!         ))
//!         .build()?;
//!
//!     let records = vec![json!({"instance_id": "i-01", "state": "running"})];
//!     let params = SyncParams::default().with_binding("account_id", json!("000000000000"));
//!
//!     infragraph::load_nodes(&client, &config, &schema, &records, &params).await?;
//!     infragraph::run_cleanup(&client, &config, &schema, &params).await?;
//!     Ok(())
//! }
//! ```

pub mod bolt;
pub mod cleanup;
pub mod client;
pub mod error;
pub mod loader;
pub mod ontology;
pub mod query;
pub mod resolve;
pub mod schema;
pub mod sync;

pub use client::{GraphClient, GraphConfig};
pub use error::{GraphSyncError, Result};
pub use loader::{cleanup_links, load_links, load_nodes, run_cleanup};
pub use ontology::{
    link_canonical_nodes, unify_canonical_nodes, FieldMapping, FieldTransform, NodeMapping,
    OntologyMapping,
};
pub use schema::{
    CleanupMode, Direction, MatchLinkSchema, Matcher, NodeSchema, PropertyRef, RelSchema,
    SemanticOverlay,
};
pub use sync::{run_stages, Scope, SyncParams, SyncStage};
