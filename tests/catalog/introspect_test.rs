//! Catalog introspection from SQLite, and catalogs loaded from files.

#[path = "../common/mod.rs"]
mod common;

use common::{spec, MusicDb};
use radhoc::catalog::{introspect_sqlite, Cardinality, CatalogError, DataType};
use radhoc::{Catalog, Engine, InMemoryCatalog, SqliteExecutor, Value};

#[test]
fn test_tables_and_fields() {
    let db = MusicDb::new();
    let catalog = introspect_sqlite(&db.conn).unwrap();

    assert_eq!(catalog.len(), 3);
    let tracks = catalog.entity("tracks").unwrap();
    let fields: Vec<_> = tracks
        .fields()
        .map(|f| (f.name.as_str(), f.data_type))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("id", DataType::Integer),
            ("title", DataType::Text),
            ("track_number", DataType::Integer),
            ("album_id", DataType::Integer),
        ]
    );
}

#[test]
fn test_foreign_keys_become_both_directions() {
    let db = MusicDb::new();
    let catalog = introspect_sqlite(&db.conn).unwrap();

    let album = catalog.resolve("tracks", "album").unwrap();
    assert_eq!(album.target, "albums");
    assert_eq!(album.cardinality, Cardinality::One);
    assert_eq!(album.join_key.source_column, "album_id");
    assert_eq!(album.join_key.target_column, "id");

    let tracks = catalog.resolve("albums", "tracks").unwrap();
    assert_eq!(tracks.target, "tracks");
    assert_eq!(tracks.cardinality, Cardinality::Many);
    assert_eq!(tracks.join_key.source_column, "id");
    assert_eq!(tracks.join_key.target_column, "album_id");

    assert!(catalog.resolve("albums", "performer").is_some());
    assert!(catalog.resolve("performers", "albums").is_some());
    assert!(catalog.resolve("tracks", "performer").is_none());
}

#[test]
fn test_boolean_columns_come_back_as_booleans() {
    let db = MusicDb::new();
    db.conn
        .execute_batch(
            "ALTER TABLE tracks ADD COLUMN explicit BOOLEAN;
             INSERT INTO tracks (title, track_number, explicit) VALUES ('Loud', 1, 1);",
        )
        .unwrap();
    let catalog = introspect_sqlite(&db.conn).unwrap();
    assert_eq!(
        catalog.field("tracks", "explicit").unwrap().data_type,
        DataType::Boolean
    );

    let engine = Engine::new(&catalog, SqliteExecutor::new(&db.conn));
    let rows = engine
        .run_raw(&spec(
            "table: tracks\nfields:\n  explicit:\nfilter:\n  - explicit:\n      exactly: true\n",
        ))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["explicit"], Value::Bool(true));
}

#[test]
fn test_introspected_catalog_runs_nested_query() {
    let db = MusicDb::new();
    db.create_track();
    let catalog = introspect_sqlite(&db.conn).unwrap();

    let result = Engine::new(&catalog, SqliteExecutor::new(&db.conn))
        .run(&spec(
            "table: performers\nfields:\n  name:\n  albums.tracks.title:\n",
        ))
        .unwrap();

    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0]["name"], Value::from("Ron Paul"));
    assert_eq!(result.data[0]["albums.tracks.title"], Value::from("Some Track"));
}

#[test]
fn test_catalog_from_toml() {
    let catalog = InMemoryCatalog::from_toml(
        r#"
[entities.tracks]
table = "music_tracks"
fields = { id = "integer", title = "text", album_id = "integer" }

[entities.tracks.relationships.album]
target = "albums"
source_column = "album_id"

[entities.albums]
fields = { id = "integer", title = "text" }
"#,
    )
    .unwrap();

    let tracks = catalog.entity("tracks").unwrap();
    assert_eq!(tracks.table_name(), "music_tracks");
    let album = catalog.resolve("tracks", "album").unwrap();
    assert_eq!(album.join_key.target_column, "id");
    assert_eq!(album.cardinality, Cardinality::One);
}

#[test]
fn test_catalog_rejects_dangling_relationship() {
    let err = InMemoryCatalog::from_json(
        r#"{
            "entities": {
                "tracks": {
                    "fields": {"id": "integer", "label_id": "integer"},
                    "relationships": {
                        "label": {"target": "labels", "source_column": "label_id"}
                    }
                }
            }
        }"#,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::UnknownTarget { ref target, .. } if target == "labels"
    ));
}
