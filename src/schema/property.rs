// Copyright 2026 Cowboy AI, LLC.

//! Property bindings and matchers

use crate::error::{GraphSyncError, Result};

/// Property names the engine stamps on every node and relationship it
/// writes. Schemas cannot declare properties with these names.
pub const RESERVED_PROPERTIES: &[&str] = &[
    "first_seen",
    "last_updated",
    "sync_marker",
    "_scope_label",
    "_scope_id",
    "_module_name",
    "_module_version",
];

/// Statement parameters the engine supplies itself; schemas cannot bind
/// keyword values under these names.
pub const RESERVED_BINDINGS: &[&str] =
    &["items", "sync_marker", "limit", "_scope_label", "_scope_id"];

/// Where a property value comes from at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    /// Read from the named key of each input record
    Field(String),
    /// Read once from the named batch-wide keyword binding
    Binding(String),
}

/// Declarative binding from a schema property to its value source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    pub(crate) source: PropertySource,
    pub(crate) optional: bool,
    pub(crate) indexed: bool,
}

impl PropertyRef {
    /// Bind to a per-record field key
    pub fn field(key: impl Into<String>) -> Self {
        Self {
            source: PropertySource::Field(key.into()),
            optional: false,
            indexed: false,
        }
    }

    /// Bind to a batch-wide keyword binding
    pub fn binding(name: impl Into<String>) -> Self {
        Self {
            source: PropertySource::Binding(name.into()),
            optional: false,
            indexed: false,
        }
    }

    /// An absent field resolves to null instead of failing the batch
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Request a secondary index on this property
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Cypher reference to this value inside a compiled batch statement
    pub(crate) fn cypher_ref(&self) -> String {
        match &self.source {
            PropertySource::Field(key) => format!("item.{}", key),
            PropertySource::Binding(name) => format!("${}", name),
        }
    }
}

/// How a matcher clause compares its resolved value to the target property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Exact equality
    Exact,
    /// Case-insensitive equality
    IgnoreCase,
    /// Case-insensitive substring containment
    Contains,
    /// Membership in a list value, producing one relationship per element
    AnyOf,
}

/// One comparison between a target node property and a resolved value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchClause {
    pub(crate) key: String,
    pub(crate) value: PropertyRef,
    pub(crate) mode: MatchMode,
}

/// Property comparisons used to find an existing node, never to create one
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matcher {
    pub(crate) clauses: Vec<MatchClause>,
}

impl Matcher {
    /// Empty matcher; add clauses with the chaining methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher with a single exact-equality clause
    pub fn on(key: impl Into<String>, value: PropertyRef) -> Self {
        Self::new().eq(key, value)
    }

    /// Add an exact-equality clause
    pub fn eq(self, key: impl Into<String>, value: PropertyRef) -> Self {
        self.push(key, value, MatchMode::Exact)
    }

    /// Add a case-insensitive equality clause
    pub fn eq_ignore_case(self, key: impl Into<String>, value: PropertyRef) -> Self {
        self.push(key, value, MatchMode::IgnoreCase)
    }

    /// Add a case-insensitive containment clause
    pub fn contains(self, key: impl Into<String>, value: PropertyRef) -> Self {
        self.push(key, value, MatchMode::Contains)
    }

    /// Add a list-membership clause; the bound value must resolve to a
    /// list, and matching fans out to one relationship per element
    pub fn any_of(self, key: impl Into<String>, value: PropertyRef) -> Self {
        self.push(key, value, MatchMode::AnyOf)
    }

    fn push(mut self, key: impl Into<String>, value: PropertyRef, mode: MatchMode) -> Self {
        self.clauses.push(MatchClause {
            key: key.into(),
            value,
            mode,
        });
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when every clause can be expressed as an inline match map
    pub(crate) fn all_exact(&self) -> bool {
        self.clauses.iter().all(|c| c.mode == MatchMode::Exact)
    }
}

/// Ordered set of named property bindings
///
/// Order is preserved so compiled statements are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertySet {
    pub(crate) entries: Vec<(String, PropertyRef)>,
}

impl PropertySet {
    /// Empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named property binding
    pub fn with(mut self, name: impl Into<String>, value: PropertyRef) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    /// Whether any properties are declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(String, PropertyRef)> {
        self.entries.iter()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&PropertyRef> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }
}

/// Validate a name that will be spliced into Cypher text (labels,
/// relationship types, property names, record field keys)
pub(crate) fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(GraphSyncError::Schema(format!(
            "{} '{}' is not a valid identifier",
            kind, name
        )))
    }
}

/// Validate a schema-declared property name, rejecting reserved names
pub(crate) fn validate_property_name(name: &str) -> Result<()> {
    validate_identifier("property", name)?;
    if RESERVED_PROPERTIES.contains(&name) {
        return Err(GraphSyncError::Schema(format!(
            "property name '{}' is reserved",
            name
        )));
    }
    Ok(())
}

/// Validate the spliced side of a property binding
pub(crate) fn validate_source(value: &PropertyRef) -> Result<()> {
    match &value.source {
        PropertySource::Field(key) => validate_identifier("record field", key),
        PropertySource::Binding(name) => {
            validate_identifier("binding", name)?;
            if RESERVED_BINDINGS.contains(&name.as_str()) {
                return Err(GraphSyncError::Schema(format!(
                    "binding name '{}' is reserved",
                    name
                )));
            }
            Ok(())
        }
    }
}

/// Validate every entry of a property set, rejecting duplicate names
pub(crate) fn validate_property_set(set: &PropertySet) -> Result<()> {
    for (i, (name, value)) in set.entries.iter().enumerate() {
        validate_property_name(name)?;
        validate_source(value)?;
        if set.entries[..i].iter().any(|(n, _)| n == name) {
            return Err(GraphSyncError::Schema(format!(
                "property '{}' is declared twice",
                name
            )));
        }
    }
    Ok(())
}
