//! Derive a catalog from a live SQLite database.
//!
//! Fields come from `pragma_table_info`, relationships from
//! `pragma_foreign_key_list`. A foreign key `tracks.album_id → albums.id`
//! yields:
//!
//! - `tracks.album` (one): named after the column minus its `_id` suffix,
//!   or the singular of the parent table when there is no such suffix
//! - `albums.tracks` (many): named after the child table

use inflector::Inflector;
use rusqlite::Connection;
use tracing::debug;

use super::{Cardinality, CatalogError, DataType, EntityDef, InMemoryCatalog};

struct ForeignKey {
    child: String,
    column: String,
    parent: String,
    parent_column: String,
}

/// Build an [`InMemoryCatalog`] from the tables of `conn`.
pub fn introspect_sqlite(conn: &Connection) -> Result<InMemoryCatalog, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = Vec::with_capacity(tables.len());
    let mut foreign_keys = Vec::new();
    for table in &tables {
        let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
        let cols = stmt
            .query_map([table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        columns.push(cols);

        let mut stmt = conn.prepare(
            "SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
        )?;
        let fks = stmt.query_map([table], |row| {
            Ok(ForeignKey {
                child: table.clone(),
                column: row.get(0)?,
                parent: row.get(1)?,
                parent_column: row
                    .get::<_, Option<String>>(2)?
                    .unwrap_or_else(|| "id".to_string()),
            })
        })?;
        for fk in fks {
            foreign_keys.push(fk?);
        }
    }

    let mut builder = InMemoryCatalog::builder();
    for (table, cols) in tables.iter().zip(columns) {
        let mut entity = EntityDef::new(table);
        for (name, declared) in &cols {
            entity = entity.field(name, affinity(declared));
        }

        for fk in foreign_keys.iter().filter(|fk| &fk.child == table) {
            let name = belongs_to_name(fk);
            if entity.get_relationship(&name).is_some() {
                debug!(table = %table, relationship = %name, "catalog.introspect.skip_duplicate");
                continue;
            }
            entity = entity.relationship(
                &name,
                &fk.parent,
                &fk.column,
                &fk.parent_column,
                Cardinality::One,
            );
        }

        for fk in foreign_keys.iter().filter(|fk| &fk.parent == table) {
            if entity.get_relationship(&fk.child).is_some() {
                debug!(table = %table, relationship = %fk.child, "catalog.introspect.skip_duplicate");
                continue;
            }
            entity = entity.relationship(
                &fk.child,
                &fk.child,
                &fk.parent_column,
                &fk.column,
                Cardinality::Many,
            );
        }

        debug!(
            table = %table,
            fields = cols.len(),
            relationships = entity.relationships().count(),
            "catalog.introspect.table"
        );
        builder = builder.entity(entity);
    }

    builder.build()
}

fn belongs_to_name(fk: &ForeignKey) -> String {
    match fk.column.strip_suffix("_id") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => fk.parent.to_singular(),
    }
}

/// Map a declared SQLite column type to a [`DataType`], following SQLite's
/// affinity rules with extra cases for booleans and dates.
fn affinity(declared: &str) -> DataType {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("BOOL") {
        DataType::Boolean
    } else if upper.contains("INT") {
        DataType::Integer
    } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        DataType::Text
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        DataType::Float
    } else if upper.contains("DATE") || upper.contains("TIME") {
        DataType::Timestamp
    } else {
        DataType::Unknown
    }
}
