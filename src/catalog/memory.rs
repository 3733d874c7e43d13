//! In-memory catalog, built in code or loaded from a TOML/JSON file.
//!
//! File format:
//!
//! ```toml
//! [entities.tracks]
//! fields = { id = "integer", title = "text", track_number = "integer", album_id = "integer" }
//!
//! [entities.tracks.relationships.album]
//! target = "albums"
//! source_column = "album_id"
//!
//! [entities.albums]
//! fields = { id = "integer", title = "text" }
//!
//! [entities.albums.relationships.tracks]
//! target = "tracks"
//! source_column = "id"
//! target_column = "album_id"
//! cardinality = "many"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use super::{Cardinality, Catalog, DataType, EntityDef};

/// Errors raised while building or loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate entity: '{0}'")]
    DuplicateEntity(String),

    #[error("Relationship '{entity}.{relationship}' targets unknown entity '{target}'")]
    UnknownTarget {
        entity: String,
        relationship: String,
        target: String,
    },

    #[error("Relationship '{entity}.{relationship}' joins on unknown column '{table}.{column}'")]
    UnknownJoinColumn {
        entity: String,
        relationship: String,
        table: String,
        column: String,
    },

    #[error("Failed to read catalog file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Catalog holding all entity definitions in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entities: IndexMap<String, EntityDef>,
}

impl InMemoryCatalog {
    pub fn builder() -> InMemoryCatalogBuilder {
        InMemoryCatalogBuilder::default()
    }

    /// Load a catalog file, picking the format from the extension
    /// (`.json` is JSON, anything else TOML).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        file.into_catalog()
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        file.into_catalog()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }
}

/// Collects entity definitions and validates relationships on `build`.
#[derive(Debug, Default)]
#[must_use = "builders have no effect until used"]
pub struct InMemoryCatalogBuilder {
    entities: Vec<EntityDef>,
}

impl InMemoryCatalogBuilder {
    pub fn entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Build the catalog.
    ///
    /// Every relationship must target a known entity and join on columns
    /// that exist on both sides.
    pub fn build(self) -> Result<InMemoryCatalog, CatalogError> {
        let mut entities = IndexMap::with_capacity(self.entities.len());
        for entity in self.entities {
            if entities.contains_key(&entity.name) {
                return Err(CatalogError::DuplicateEntity(entity.name));
            }
            entities.insert(entity.name.clone(), entity);
        }

        for entity in entities.values() {
            for edge in entity.relationships() {
                let target =
                    entities
                        .get(&edge.target)
                        .ok_or_else(|| CatalogError::UnknownTarget {
                            entity: entity.name.clone(),
                            relationship: edge.name.clone(),
                            target: edge.target.clone(),
                        })?;
                for (owner, column) in [
                    (entity, &edge.join_key.source_column),
                    (target, &edge.join_key.target_column),
                ] {
                    if owner.get_field(column).is_none() {
                        return Err(CatalogError::UnknownJoinColumn {
                            entity: entity.name.clone(),
                            relationship: edge.name.clone(),
                            table: owner.name.clone(),
                            column: column.clone(),
                        });
                    }
                }
            }
        }

        Ok(InMemoryCatalog { entities })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    entities: IndexMap<String, EntityFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityFile {
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    fields: IndexMap<String, DataType>,
    #[serde(default)]
    relationships: IndexMap<String, RelationshipFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationshipFile {
    target: String,
    source_column: String,
    #[serde(default = "default_target_column")]
    target_column: String,
    #[serde(default)]
    cardinality: Cardinality,
}

fn default_target_column() -> String {
    "id".to_string()
}

impl CatalogFile {
    fn into_catalog(self) -> Result<InMemoryCatalog, CatalogError> {
        let mut builder = InMemoryCatalog::builder();
        for (name, file) in self.entities {
            let mut entity = EntityDef::new(&name);
            if let Some(table) = &file.table {
                entity = entity.with_table(table);
            }
            for (field, data_type) in &file.fields {
                entity = entity.field(field, *data_type);
            }
            for (rel, spec) in &file.relationships {
                entity = entity.relationship(
                    rel,
                    &spec.target,
                    &spec.source_column,
                    &spec.target_column,
                    spec.cardinality,
                );
            }
            builder = builder.entity(entity);
        }
        builder.build()
    }
}
