// Copyright 2026 Cowboy AI, LLC.

//! Node schema descriptors

use crate::error::{GraphSyncError, Result};
use crate::schema::property::{
    validate_identifier, validate_property_set, PropertyRef, PropertySet, PropertySource,
};
use crate::schema::rel::RelSchema;

/// What cleanup removes for this schema after a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    /// Delete stale nodes and their declared relationships inside the
    /// ownership scope; requires a sub-resource relationship
    Scoped,
    /// Delete stale nodes label-wide with no scope filter; the schema
    /// cannot declare a sub-resource relationship
    Global,
    /// Never delete nodes of this label, only stale relationships the
    /// schema declares
    RelationshipsOnly,
}

/// Module name and version stamped on every write for provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub(crate) module: String,
    pub(crate) version: String,
}

/// Normalized ontology assignments attached in place on a source node
///
/// Each assignment maps a canonical field name to a Cypher expression over
/// the batch `item`; the compiler writes it as `_ont_<field>` together with
/// the overlay's extra label and an `_ont_source` stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticOverlay {
    pub(crate) label: String,
    pub(crate) source_module: String,
    pub(crate) assignments: Vec<(String, String)>,
}

impl SemanticOverlay {
    /// Overlay applying `label` on behalf of `source_module`
    pub fn new(label: impl Into<String>, source_module: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source_module: source_module.into(),
            assignments: Vec::new(),
        }
    }

    /// Assign a canonical field from a Cypher expression over `item`
    pub fn assign(mut self, field: impl Into<String>, expr: impl Into<String>) -> Self {
        self.assignments.push((field.into(), expr.into()));
        self
    }

    fn validate(&self) -> Result<()> {
        validate_identifier("semantic label", &self.label)?;
        for (field, _) in &self.assignments {
            validate_identifier("semantic field", field)?;
        }
        Ok(())
    }
}

/// Immutable descriptor of a node type: label, property bindings, ownership
/// boundary, and relationships to already-persisted nodes
///
/// Instances are stateless and reusable across runs; everything mutable
/// (record values, the sync marker) arrives per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    pub(crate) label: String,
    pub(crate) extra_labels: Vec<String>,
    pub(crate) properties: PropertySet,
    pub(crate) sub_resource: Option<RelSchema>,
    pub(crate) relationships: Vec<RelSchema>,
    pub(crate) cleanup_mode: CleanupMode,
    pub(crate) provenance: Option<Provenance>,
    pub(crate) semantic: Option<SemanticOverlay>,
}

impl NodeSchema {
    /// Start building a schema for nodes labeled `label`
    pub fn builder(label: impl Into<String>) -> NodeSchemaBuilder {
        NodeSchemaBuilder {
            label: label.into(),
            extra_labels: Vec::new(),
            properties: PropertySet::new(),
            sub_resource: None,
            relationships: Vec::new(),
            cleanup_mode: None,
            provenance: None,
            semantic: None,
        }
    }

    /// Label applied to nodes of this schema
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cleanup behavior for this schema
    pub fn cleanup_mode(&self) -> CleanupMode {
        self.cleanup_mode
    }

    /// Ownership relationship to the tenant-like boundary entity
    pub fn sub_resource(&self) -> Option<&RelSchema> {
        self.sub_resource.as_ref()
    }

    /// Copy of this schema restricted to the named relationship types
    ///
    /// The sub-resource relationship is always kept. Naming a type the
    /// schema does not declare is an error.
    pub fn select_relationships(&self, rel_types: &[&str]) -> Result<NodeSchema> {
        for rel_type in rel_types {
            if !self.relationships.iter().any(|r| r.rel_type == *rel_type) {
                return Err(GraphSyncError::Schema(format!(
                    "'{}' does not declare relationship '{}'",
                    self.label, rel_type
                )));
            }
        }
        let mut selected = self.clone();
        selected
            .relationships
            .retain(|r| rel_types.contains(&r.rel_type.as_str()));
        Ok(selected)
    }

    /// Sub-resource relationship first, then the declared relationships
    pub(crate) fn all_relationships(&self) -> impl Iterator<Item = &RelSchema> {
        self.sub_resource.iter().chain(self.relationships.iter())
    }

    /// The identifier binding; the builder guarantees an `id` entry
    pub(crate) fn id_property(&self) -> &PropertyRef {
        match self.properties.get("id") {
            Some(id) => id,
            None => unreachable!("NodeSchema built without an 'id' property"),
        }
    }
}

/// Builder for [`NodeSchema`]; `build` validates the whole definition
pub struct NodeSchemaBuilder {
    label: String,
    extra_labels: Vec<String>,
    properties: PropertySet,
    sub_resource: Option<RelSchema>,
    relationships: Vec<RelSchema>,
    cleanup_mode: Option<CleanupMode>,
    provenance: Option<Provenance>,
    semantic: Option<SemanticOverlay>,
}

impl NodeSchemaBuilder {
    /// Apply an additional label alongside the main one on every write
    pub fn extra_label(mut self, label: impl Into<String>) -> Self {
        self.extra_labels.push(label.into());
        self
    }

    /// Declare a property binding
    pub fn property(mut self, name: impl Into<String>, value: PropertyRef) -> Self {
        self.properties = self.properties.with(name, value);
        self
    }

    /// Declare the ownership relationship to the schema's boundary entity
    pub fn sub_resource(mut self, rel: RelSchema) -> Self {
        self.sub_resource = Some(rel);
        self
    }

    /// Declare an additional relationship
    pub fn relationship(mut self, rel: RelSchema) -> Self {
        self.relationships.push(rel);
        self
    }

    /// Override the default cleanup mode
    pub fn cleanup_mode(mut self, mode: CleanupMode) -> Self {
        self.cleanup_mode = Some(mode);
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

    /// Attach an ontology semantic overlay applied on every write
    pub fn semantics(mut self, overlay: SemanticOverlay) -> Self {
        self.semantic = Some(overlay);
        self
    }

    /// Validate and build the schema
    pub fn build(self) -> Result<NodeSchema> {
        validate_identifier("label", &self.label)?;
        for label in &self.extra_labels {
            validate_identifier("label", label)?;
        }
        validate_property_set(&self.properties)?;
        if self.properties.get("id").is_none() {
            return Err(GraphSyncError::Schema(format!(
                "'{}' must declare an 'id' property",
                self.label
            )));
        }
        if let Some(rel) = &self.sub_resource {
            rel.validate()?;
        }
        for rel in &self.relationships {
            rel.validate()?;
        }
        if let Some(overlay) = &self.semantic {
            overlay.validate()?;
        }

        let cleanup_mode = self.cleanup_mode.unwrap_or(if self.sub_resource.is_some() {
            CleanupMode::Scoped
        } else {
            CleanupMode::RelationshipsOnly
        });
        match cleanup_mode {
            CleanupMode::Scoped if self.sub_resource.is_none() => {
                return Err(GraphSyncError::Schema(format!(
                    "'{}' requests scoped cleanup without a sub-resource relationship",
                    self.label
                )));
            }
            CleanupMode::Global if self.sub_resource.is_some() => {
                return Err(GraphSyncError::Schema(format!(
                    "'{}' requests global cleanup but declares a sub-resource relationship",
                    self.label
                )));
            }
            _ => {}
        }
        // Scoped cleanup matches the boundary node without record context,
        // so the scope matcher can only carry exact keyword bindings
        if cleanup_mode == CleanupMode::Scoped {
            if let Some(rel) = &self.sub_resource {
                let scope_ok = rel.matcher.all_exact()
                    && rel
                        .matcher
                        .clauses
                        .iter()
                        .all(|c| matches!(c.value.source, PropertySource::Binding(_)));
                if !scope_ok {
                    return Err(GraphSyncError::Schema(format!(
                        "'{}' scoped cleanup requires an exact keyword-bound sub-resource matcher",
                        self.label
                    )));
                }
            }
        }

        Ok(NodeSchema {
            label: self.label,
            extra_labels: self.extra_labels,
            properties: self.properties,
            sub_resource: self.sub_resource,
            relationships: self.relationships,
            cleanup_mode,
            provenance: self.provenance,
            semantic: self.semantic,
        })
    }
}
