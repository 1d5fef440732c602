// Copyright 2026 Cowboy AI, LLC.

//! Relationship descriptors

use crate::error::{GraphSyncError, Result};
use crate::schema::property::{
    validate_identifier, validate_property_set, validate_source, MatchMode, Matcher, PropertySet,
    PropertySource,
};

/// Direction of a relationship relative to the owning node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(owner)-[r]->(target)`
    Outward,
    /// `(owner)<-[r]-(target)`
    Inward,
}

impl Direction {
    /// Arrow fragments on either side of the bracketed relationship
    pub(crate) fn arrows(&self) -> (&'static str, &'static str) {
        match self {
            Direction::Outward => ("-", "->"),
            Direction::Inward => ("<-", "-"),
        }
    }
}

/// Descriptor of a relationship from a schema's node to an already-persisted
/// target node
///
/// The matcher finds the target; it never creates one. A target that does
/// not match is skipped without error.
#[derive(Debug, Clone, PartialEq)]
pub struct RelSchema {
    pub(crate) target_label: String,
    pub(crate) rel_type: String,
    pub(crate) direction: Direction,
    pub(crate) matcher: Matcher,
    pub(crate) properties: PropertySet,
}

impl RelSchema {
    /// Describe a relationship to nodes labeled `target_label`, found via
    /// `matcher`
    pub fn new(
        target_label: impl Into<String>,
        rel_type: impl Into<String>,
        direction: Direction,
        matcher: Matcher,
    ) -> Self {
        Self {
            target_label: target_label.into(),
            rel_type: rel_type.into(),
            direction,
            matcher,
            properties: PropertySet::new(),
        }
    }

    /// Attach properties set on the relationship at every write
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Label of the target node
    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    /// Type tag of the created relationship
    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    /// Direction relative to the owning node
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_identifier("label", &self.target_label)?;
        validate_identifier("relationship type", &self.rel_type)?;
        if self.matcher.is_empty() {
            return Err(GraphSyncError::Schema(format!(
                "relationship '{}' has an empty matcher",
                self.rel_type
            )));
        }
        for clause in &self.matcher.clauses {
            validate_identifier("matcher key", &clause.key)?;
            validate_source(&clause.value)?;
            if clause.mode == MatchMode::AnyOf
                && !matches!(clause.value.source, PropertySource::Field(_))
            {
                return Err(GraphSyncError::Schema(format!(
                    "relationship '{}' one-to-many matcher on '{}' must bind a record field",
                    self.rel_type, clause.key
                )));
            }
        }
        validate_property_set(&self.properties)
    }
}
