// Copyright 2026 Cowboy AI, LLC.

//! Declarative schema vocabulary
//!
//! Schemas are immutable value objects constructed once and reused across
//! runs; everything mutable (record values, the sync marker) is supplied
//! per invocation. Builders validate the whole definition and fail loudly
//! on anything the engine cannot compile.
//!
//! - [`NodeSchema`] - node label, property bindings, ownership boundary,
//!   relationships
//! - [`RelSchema`] - relationship to an already-persisted target node
//! - [`MatchLinkSchema`] - relationship between two independently-matched
//!   node sets
//! - [`PropertyRef`] / [`Matcher`] - value sources and target matching

pub mod link;
pub mod node;
pub mod property;
pub mod rel;

pub use link::{MatchLinkSchema, MatchLinkSchemaBuilder};
pub use node::{CleanupMode, NodeSchema, NodeSchemaBuilder, Provenance, SemanticOverlay};
pub use property::{
    MatchClause, MatchMode, Matcher, PropertyRef, PropertySet, PropertySource, RESERVED_PROPERTIES,
};
pub use rel::{Direction, RelSchema};
