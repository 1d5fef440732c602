// Copyright 2026 Cowboy AI, LLC.

//! Cross-source mapping declarations
//!
//! An [`OntologyMapping`] describes how one data-source module's nodes
//! project onto a canonical entity: which source labels participate,
//! which source properties feed which canonical fields, and any post-load
//! statements that wire canonical nodes back to their sources.

use serde_json::Value;

use crate::error::{GraphSyncError, Result};
use crate::query::escape_literal;
use crate::schema::property::validate_identifier;
use crate::schema::SemanticOverlay;

/// Value rewrite applied when a source property crosses into the ontology
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTransform {
    /// Copy the source value unchanged
    Identity,
    /// Coerced-boolean negation; absent and null coerce to false first
    InvertBoolean,
    /// Coerce to boolean; a non-boolean value counts as simple presence
    ToBoolean,
    /// True when the source value equals any of the given literals
    EqualsAny(Vec<String>),
    /// Ignore the source column and write a constant
    Static(Value),
    /// Coerced-boolean OR of the bound field and the named extra fields
    OrBoolean(Vec<String>),
    /// True only when the bound field and every named extra field coerce
    /// to false
    NorBoolean(Vec<String>),
}

impl FieldTransform {
    /// Render as a Cypher expression over `<prefix>.<field>` column refs
    pub(crate) fn render(&self, prefix: &str, field: &str) -> String {
        let operand = format!("{}.{}", prefix, field);
        match self {
            FieldTransform::Identity => operand,
            FieldTransform::InvertBoolean => {
                format!("(NOT(coalesce(toBooleanOrNull({}), false)))", operand)
            }
            FieldTransform::ToBoolean => {
                format!(
                    "coalesce(toBooleanOrNull({}), ({} IS NOT NULL))",
                    operand, operand
                )
            }
            FieldTransform::EqualsAny(values) => {
                let literals: Vec<String> =
                    values.iter().map(|v| escape_literal(v)).collect();
                format!("({} IN [{}])", operand, literals.join(", "))
            }
            FieldTransform::Static(value) => static_literal(value),
            FieldTransform::OrBoolean(extra) => {
                format!("({})", coerced_booleans(prefix, field, extra).join(" OR "))
            }
            FieldTransform::NorBoolean(extra) => {
                let negated: Vec<String> = coerced_booleans(prefix, field, extra)
                    .into_iter()
                    .map(|clause| format!("NOT({})", clause))
                    .collect();
                format!("({})", negated.join(" AND "))
            }
        }
    }
}

/// One coerced-boolean clause per operand field, bound field first
fn coerced_booleans(prefix: &str, field: &str, extra: &[String]) -> Vec<String> {
    std::iter::once(field)
        .chain(extra.iter().map(String::as_str))
        .map(|f| format!("coalesce(toBooleanOrNull({}.{}), false)", prefix, f))
        .collect()
}

fn static_literal(value: &Value) -> String {
    match value {
        Value::String(s) => escape_literal(s),
        other => other.to_string(),
    }
}

/// One canonical field fed from one source property
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub(crate) canonical_field: String,
    pub(crate) source_field: String,
    pub(crate) required: bool,
    pub(crate) transform: FieldTransform,
}

impl FieldMapping {
    /// Feed `canonical_field` from `source_field` on the source node
    pub fn new(canonical_field: impl Into<String>, source_field: impl Into<String>) -> Self {
        Self {
            canonical_field: canonical_field.into(),
            source_field: source_field.into(),
            required: false,
            transform: FieldTransform::Identity,
        }
    }

    /// Write a constant into `canonical_field`, reading nothing
    pub fn constant(canonical_field: impl Into<String>, value: Value) -> Self {
        Self {
            canonical_field: canonical_field.into(),
            source_field: String::new(),
            required: false,
            transform: FieldTransform::Static(value),
        }
    }

    /// Exclude source rows where this field is absent or null
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Apply a transform before the canonical value is written
    pub fn transform(mut self, transform: FieldTransform) -> Self {
        self.transform = transform;
        self
    }

    fn validate(&self) -> Result<()> {
        validate_identifier("canonical field", &self.canonical_field)?;
        if !matches!(self.transform, FieldTransform::Static(_)) {
            validate_identifier("source field", &self.source_field)?;
        }
        match &self.transform {
            FieldTransform::EqualsAny(values) if values.is_empty() => {
                Err(GraphSyncError::Schema(format!(
                    "field '{}' equals-any transform needs at least one value",
                    self.canonical_field
                )))
            }
            FieldTransform::Static(value)
                if !matches!(
                    value,
                    Value::String(_) | Value::Bool(_) | Value::Number(_)
                ) =>
            {
                Err(GraphSyncError::Schema(format!(
                    "field '{}' static transform value must be a scalar",
                    self.canonical_field
                )))
            }
            FieldTransform::OrBoolean(fields) | FieldTransform::NorBoolean(fields) => {
                for field in fields {
                    validate_identifier("source field", field)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// How one source label's nodes project onto the canonical entity
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMapping {
    pub(crate) source_label: String,
    pub(crate) eligible_for_source: bool,
    pub(crate) fields: Vec<FieldMapping>,
}

impl NodeMapping {
    /// Map nodes carrying `source_label`
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            eligible_for_source: true,
            fields: Vec::new(),
        }
    }

    /// Never create canonical nodes from this label; its rows only serve
    /// the mapping's link statements
    pub fn link_only(mut self) -> Self {
        self.eligible_for_source = false;
        self
    }

    /// Declare one field projection
    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }
}

/// Everything one data-source module contributes to a canonical entity
#[derive(Debug, Clone, PartialEq)]
pub struct OntologyMapping {
    pub(crate) module: String,
    pub(crate) nodes: Vec<NodeMapping>,
    pub(crate) links: Vec<String>,
}

impl OntologyMapping {
    /// Start building the mapping for one module
    pub fn builder(module: impl Into<String>) -> OntologyMappingBuilder {
        OntologyMappingBuilder {
            module: module.into(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Name of the contributing module
    pub fn module(&self) -> &str {
        &self.module
    }

    /// In-place semantic overlay for one of this module's source labels
    ///
    /// The returned overlay attaches `canonical_label` and the mapped
    /// `_ont_` fields to the source schema's own ingest statement, so the
    /// source node doubles as its canonical projection without a second
    /// entity.
    pub fn overlay_for(
        &self,
        canonical_label: impl Into<String>,
        source_label: &str,
    ) -> Result<SemanticOverlay> {
        let node = self
            .nodes
            .iter()
            .find(|n| n.source_label == source_label)
            .ok_or_else(|| {
                GraphSyncError::Schema(format!(
                    "module '{}' has no mapping for label '{}'",
                    self.module, source_label
                ))
            })?;
        let mut overlay = SemanticOverlay::new(canonical_label, &self.module);
        for field in &node.fields {
            overlay = overlay.assign(
                &field.canonical_field,
                field.transform.render("item", &field.source_field),
            );
        }
        Ok(overlay)
    }
}

/// Builder for [`OntologyMapping`]; `build` validates the whole mapping
pub struct OntologyMappingBuilder {
    module: String,
    nodes: Vec<NodeMapping>,
    links: Vec<String>,
}

impl OntologyMappingBuilder {
    /// Add one source label projection
    pub fn node(mut self, node: NodeMapping) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a post-load link statement
    ///
    /// The statement must delete or merge at most `$limit` rows per pass
    /// and report the count as `RETURN COUNT(*) AS modified`; the engine
    /// re-runs it until a pass comes back short.
    pub fn link(mut self, statement: impl Into<String>) -> Self {
        self.links.push(statement.into());
        self
    }

    /// Validate and build the mapping
    pub fn build(self) -> Result<OntologyMapping> {
        if self.module.is_empty() {
            return Err(GraphSyncError::Schema(
                "ontology mapping needs a module name".to_string(),
            ));
        }
        for node in &self.nodes {
            validate_identifier("label", &node.source_label)?;
            if node.fields.is_empty() {
                return Err(GraphSyncError::Schema(format!(
                    "mapping of '{}' declares no fields",
                    node.source_label
                )));
            }
            for (position, field) in node.fields.iter().enumerate() {
                field.validate()?;
                let duplicate = node.fields[..position]
                    .iter()
                    .any(|f| f.canonical_field == field.canonical_field);
                if duplicate {
                    return Err(GraphSyncError::Schema(format!(
                        "mapping of '{}' binds canonical field '{}' twice",
                        node.source_label, field.canonical_field
                    )));
                }
            }
        }
        for statement in &self.links {
            if !statement.contains("$limit")
                || !statement.trim_end().ends_with("RETURN COUNT(*) AS modified")
            {
                return Err(GraphSyncError::Statement(format!(
                    "link statement for '{}' must page on $limit and end \
                     'RETURN COUNT(*) AS modified'",
                    self.module
                )));
            }
        }

        Ok(OntologyMapping {
            module: self.module,
            nodes: self.nodes,
            links: self.links,
        })
    }
}
