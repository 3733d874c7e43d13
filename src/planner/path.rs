//! Path resolution against the catalog.

use tracing::trace;

use crate::catalog::{Catalog, EntityDef, FieldDef, RelationshipEdge};
use crate::error::{QueryError, QueryResult};
use crate::spec::FieldPath;

/// A field path checked against the catalog.
#[derive(Debug, Clone)]
pub struct ResolvedPath<'c> {
    pub path: FieldPath,
    /// One edge per relationship segment, in traversal order.
    pub hops: Vec<&'c RelationshipEdge>,
    /// Entity the terminal field lives on.
    pub entity: &'c EntityDef,
    pub field: &'c FieldDef,
}

/// Resolves dotted paths left to right from a root entity.
pub struct PathResolver<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
}

impl<'c, C: Catalog + ?Sized> PathResolver<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// Look up the root entity.
    pub fn root(&self, name: &str) -> QueryResult<&'c EntityDef> {
        self.catalog
            .entity(name)
            .ok_or_else(|| QueryError::UnknownEntity(name.to_string()))
    }

    /// Resolve `path` starting at `root`.
    ///
    /// Each relationship segment must exist on the entity reached so far and
    /// the terminal segment must be a field of the last entity. Cycles in the
    /// schema are fine: traversal is bounded by the path length.
    pub fn resolve(&self, root: &str, path: &FieldPath) -> QueryResult<ResolvedPath<'c>> {
        let mut entity = self.root(root)?;
        let mut hops = Vec::with_capacity(path.depth());

        for rel in path.relationships() {
            let edge = self.catalog.resolve(&entity.name, rel).ok_or_else(|| {
                QueryError::UnknownRelationship {
                    path: path.key(),
                    entity: entity.name.clone(),
                    relationship: rel.clone(),
                }
            })?;
            entity = self.catalog.entity(&edge.target).ok_or_else(|| {
                QueryError::UnknownEntity(edge.target.clone())
            })?;
            hops.push(edge);
        }

        let field = self
            .catalog
            .field(&entity.name, path.field())
            .ok_or_else(|| QueryError::UnknownField {
                path: path.key(),
                entity: entity.name.clone(),
                field: path.field().to_string(),
            })?;

        trace!(path = %path, hops = hops.len(), entity = %entity.name, "radhoc.compile.resolve");

        Ok(ResolvedPath {
            path: path.clone(),
            hops,
            entity,
            field,
        })
    }
}
