//! Schema catalog: entities, their fields and their named relationships.
//!
//! The engine never looks schema information up ambiently; a [`Catalog`] is
//! injected by the caller. Two sources ship with the crate:
//!
//! - [`InMemoryCatalog`], built with a fluent API or loaded from TOML/JSON
//! - [`introspect_sqlite`], which derives a catalog from SQLite table info
//!   and foreign keys

mod introspect;
mod memory;

pub use introspect::introspect_sqlite;
pub use memory::{CatalogError, InMemoryCatalog, InMemoryCatalogBuilder};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Text,
    Integer,
    Float,
    Boolean,
    /// Date/time values; stored and compared as text or numbers.
    Timestamp,
    /// Type not declared (e.g. untyped SQLite columns); any operand is accepted.
    Unknown,
}

impl DataType {
    /// Whether ordered comparisons make sense for this type.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            DataType::Integer
                | DataType::Float
                | DataType::Text
                | DataType::Timestamp
                | DataType::Unknown
        )
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// How many target records one source record joins to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// belongs-to / has-one
    #[default]
    One,
    /// has-many: joining fans rows out
    Many,
}

/// Columns an edge joins on: `source.source_column = target.target_column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey {
    pub source_column: String,
    pub target_column: String,
}

/// A named relationship from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipEdge {
    pub source: String,
    pub name: String,
    pub target: String,
    pub join_key: JoinKey,
    pub cardinality: Cardinality,
}

/// A scalar field on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub data_type: DataType,
}

/// An entity (record type) with its fields and outgoing relationships.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct EntityDef {
    pub name: String,
    /// Physical table name, if different from the entity name.
    pub table: Option<String>,
    fields: IndexMap<String, FieldDef>,
    relationships: IndexMap<String, RelationshipEdge>,
}

impl EntityDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields: IndexMap::new(),
            relationships: IndexMap::new(),
        }
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, name: &str, data_type: DataType) -> Self {
        self.fields.insert(
            name.into(),
            FieldDef {
                name: name.into(),
                data_type,
            },
        );
        self
    }

    /// Add a to-one relationship: `self.foreign_key = target.id`.
    pub fn belongs_to(self, name: &str, target: &str, foreign_key: &str) -> Self {
        self.relationship(name, target, foreign_key, "id", Cardinality::One)
    }

    /// Add a to-many relationship: `self.id = target.foreign_key`.
    pub fn has_many(self, name: &str, target: &str, foreign_key: &str) -> Self {
        self.relationship(name, target, "id", foreign_key, Cardinality::Many)
    }

    pub fn relationship(
        mut self,
        name: &str,
        target: &str,
        source_column: &str,
        target_column: &str,
        cardinality: Cardinality,
    ) -> Self {
        let edge = RelationshipEdge {
            source: self.name.clone(),
            name: name.into(),
            target: target.into(),
            join_key: JoinKey {
                source_column: source_column.into(),
                target_column: target_column.into(),
            },
            cardinality,
        };
        self.relationships.insert(name.into(), edge);
        self
    }

    /// Table name to query: the explicit table or the entity name.
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipEdge> {
        self.relationships.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.relationships.values()
    }
}

/// Read-only schema source.
///
/// Implementations shared across threads should be `Sync`; the engine only
/// ever borrows a catalog immutably.
pub trait Catalog {
    /// Look up an entity by name.
    fn entity(&self, name: &str) -> Option<&EntityDef>;

    /// Resolve a relationship of `entity` by name.
    fn resolve(&self, entity: &str, relationship: &str) -> Option<&RelationshipEdge> {
        self.entity(entity)?.get_relationship(relationship)
    }

    fn field(&self, entity: &str, field: &str) -> Option<&FieldDef> {
        self.entity(entity)?.get_field(field)
    }

    fn has_field(&self, entity: &str, field: &str) -> bool {
        self.field(entity, field).is_some()
    }
}
