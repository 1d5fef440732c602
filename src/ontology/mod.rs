// Copyright 2026 Cowboy AI, LLC.

//! Cross-source entity unification
//!
//! Different data sources describe the same real-world entity under
//! different labels with different property names. This layer closes the
//! gap in two steps:
//!
//! - [`OntologyMapping`] declares, per source module, which labels project
//!   onto a canonical entity and how their properties translate
//! - [`unify_canonical_nodes`] reads the mapped labels back from the
//!   graph, merges rows by canonical identifier, and loads the result as
//!   ordinary nodes; [`link_canonical_nodes`] then attaches canonical
//!   nodes to their source nodes via each mapping's link statements
//!
//! Mappings can also project in place: [`OntologyMapping::overlay_for`]
//! turns one source label's field mappings into a [`SemanticOverlay`] for
//! that source's own schema, stamping the canonical label and fields
//! during ingest instead of in a separate pass.
//!
//! [`SemanticOverlay`]: crate::schema::SemanticOverlay

pub mod mapping;
pub mod unify;

pub use mapping::{FieldMapping, FieldTransform, NodeMapping, OntologyMapping};
pub use unify::{link_canonical_nodes, unify_canonical_nodes};
