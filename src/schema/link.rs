// Copyright 2026 Cowboy AI, LLC.

//! MatchLink descriptors
//!
//! A MatchLink connects two node sets that were persisted by unrelated
//! loaders, matching both endpoints independently per input record. It is
//! the highest-cost load path; prefer a relationship on the owning
//! [`NodeSchema`](crate::schema::NodeSchema) whenever one can express the
//! link.

use crate::error::{GraphSyncError, Result};
use crate::schema::node::Provenance;
use crate::schema::property::{
    validate_identifier, validate_property_set, validate_source, MatchMode, Matcher, PropertyRef,
    PropertySet,
};
use crate::schema::rel::Direction;

/// Descriptor of a relationship between two independently-matched node sets
#[derive(Debug, Clone, PartialEq)]
pub struct MatchLinkSchema {
    pub(crate) source_label: String,
    pub(crate) source_matcher: Matcher,
    pub(crate) target_label: String,
    pub(crate) target_matcher: Matcher,
    pub(crate) rel_type: String,
    pub(crate) direction: Direction,
    pub(crate) properties: PropertySet,
    pub(crate) provenance: Option<Provenance>,
}

impl MatchLinkSchema {
    /// Start building a `(source)-[rel_type]->(target)` link
    pub fn builder(
        source_label: impl Into<String>,
        rel_type: impl Into<String>,
        target_label: impl Into<String>,
    ) -> MatchLinkSchemaBuilder {
        MatchLinkSchemaBuilder {
            source_label: source_label.into(),
            source_matcher: Matcher::new(),
            target_label: target_label.into(),
            target_matcher: Matcher::new(),
            rel_type: rel_type.into(),
            direction: Direction::Outward,
            properties: PropertySet::new(),
            provenance: None,
        }
    }

    /// Label of the source node set
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Label of the target node set
    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    /// Type tag of the created relationship
    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    /// Direction relative to the source node
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Builder for [`MatchLinkSchema`]; `build` validates the whole definition
pub struct MatchLinkSchemaBuilder {
    source_label: String,
    source_matcher: Matcher,
    target_label: String,
    target_matcher: Matcher,
    rel_type: String,
    direction: Direction,
    properties: PropertySet,
    provenance: Option<Provenance>,
}

impl MatchLinkSchemaBuilder {
    /// Matcher locating the source node of each record
    pub fn source_matcher(mut self, matcher: Matcher) -> Self {
        self.source_matcher = matcher;
        self
    }

    /// Matcher locating the target node of each record
    pub fn target_matcher(mut self, matcher: Matcher) -> Self {
        self.target_matcher = matcher;
        self
    }

    /// Override the default outward direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Declare a relationship property binding
    pub fn property(mut self, name: impl Into<String>, value: PropertyRef) -> Self {
        self.properties = self.properties.with(name, value);
        self
    }

    /// Stamp writes with the originating module name and version
    pub fn provenance(mut self, module: impl Into<String>, version: impl Into<String>) -> Self {
        self.provenance = Some(Provenance {
            module: module.into(),
            version: version.into(),
        });
        self
    }

    /// Validate and build the schema
    ///
    /// Both matchers are required and must use exact equality: endpoints
    /// are matched by concrete identity, and a record whose endpoints do
    /// not both match is skipped at load time rather than errored.
    pub fn build(self) -> Result<MatchLinkSchema> {
        validate_identifier("label", &self.source_label)?;
        validate_identifier("label", &self.target_label)?;
        validate_identifier("relationship type", &self.rel_type)?;
        for (what, matcher) in [
            ("source", &self.source_matcher),
            ("target", &self.target_matcher),
        ] {
            if matcher.is_empty() {
                return Err(GraphSyncError::Schema(format!(
                    "matchlink '{}' has an empty {} matcher",
                    self.rel_type, what
                )));
            }
            for clause in &matcher.clauses {
                validate_identifier("matcher key", &clause.key)?;
                validate_source(&clause.value)?;
                if clause.mode != MatchMode::Exact {
                    return Err(GraphSyncError::Schema(format!(
                        "matchlink '{}' {} matcher on '{}' must use exact equality",
                        self.rel_type, what, clause.key
                    )));
                }
            }
        }
        validate_property_set(&self.properties)?;

        Ok(MatchLinkSchema {
            source_label: self.source_label,
            source_matcher: self.source_matcher,
            target_label: self.target_label,
            target_matcher: self.target_matcher,
            rel_type: self.rel_type,
            direction: self.direction,
            properties: self.properties,
            provenance: self.provenance,
        })
    }
}
