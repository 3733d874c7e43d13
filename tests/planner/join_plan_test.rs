//! Join deduplication across field and filter paths.

use radhoc::catalog::{Cardinality, DataType, EntityDef};
use radhoc::planner::{Condition, QueryAssembler};
use radhoc::{InMemoryCatalog, QueryPlan, QuerySpec, Value};

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::builder()
        .entity(
            EntityDef::new("performers")
                .field("id", DataType::Integer)
                .field("title", DataType::Text)
                .field("name", DataType::Text)
                .has_many("albums", "albums", "performer_id"),
        )
        .entity(
            EntityDef::new("albums")
                .field("id", DataType::Integer)
                .field("title", DataType::Text)
                .field("performer_id", DataType::Integer)
                .field("producer_id", DataType::Integer)
                .belongs_to("performer", "performers", "performer_id")
                .belongs_to("producer", "performers", "producer_id")
                .has_many("tracks", "tracks", "album_id"),
        )
        .entity(
            EntityDef::new("tracks")
                .field("id", DataType::Integer)
                .field("title", DataType::Text)
                .field("track_number", DataType::Integer)
                .field("album_id", DataType::Integer)
                .belongs_to("album", "albums", "album_id"),
        )
        .build()
        .unwrap()
}

fn plan(yaml: &str) -> QueryPlan {
    let spec = QuerySpec::from_yaml(yaml).unwrap();
    QueryAssembler::new(&catalog()).assemble(&spec).unwrap()
}

fn join_summary(plan: &QueryPlan) -> Vec<(String, String, String)> {
    plan.joins()
        .iter()
        .map(|n| (n.prefix_key(), n.table.clone(), n.alias.clone()))
        .collect()
}

fn selection_columns(plan: &QueryPlan) -> Vec<String> {
    plan.selections()
        .iter()
        .map(|s| format!("{}.{}", s.column.alias, s.column.column))
        .collect()
}

#[test]
fn test_root_only_query_has_no_joins() {
    let plan = plan("table: tracks\nfields:\n  title:\n  track_number:\n");
    assert!(plan.joins().is_empty());
    assert_eq!(plan.root().alias, "t0");
    assert_eq!(plan.root().table, "tracks");
    assert_eq!(selection_columns(&plan), ["t0.title", "t0.track_number"]);
}

#[test]
fn test_shared_prefix_joined_once() {
    let plan = plan(
        "table: tracks
fields:
  album.title:
  album.id:
  album.performer.title:
  album.performer.name:
",
    );

    assert_eq!(
        join_summary(&plan),
        vec![
            ("album".to_string(), "albums".to_string(), "t1".to_string()),
            (
                "album.performer".to_string(),
                "performers".to_string(),
                "t2".to_string()
            ),
        ]
    );
    assert_eq!(
        selection_columns(&plan),
        ["t1.title", "t1.id", "t2.title", "t2.name"]
    );
}

#[test]
fn test_sibling_relationships_to_same_table_get_own_aliases() {
    let plan = plan(
        "table: albums\nfields:\n  performer.name:\n  producer.name:\n",
    );

    assert_eq!(
        join_summary(&plan),
        vec![
            (
                "performer".to_string(),
                "performers".to_string(),
                "t1".to_string()
            ),
            (
                "producer".to_string(),
                "performers".to_string(),
                "t2".to_string()
            ),
        ]
    );
    assert_eq!(selection_columns(&plan), ["t1.name", "t2.name"]);
}

#[test]
fn test_same_table_reached_by_different_prefixes_is_not_merged() {
    // tracks → album → performer and tracks → album → producer both land on
    // performers, but through different edges.
    let plan = plan(
        "table: tracks\nfields:\n  album.performer.name:\n  album.producer.name:\n",
    );
    assert_eq!(plan.joins().len(), 3);
    assert_eq!(selection_columns(&plan), ["t2.name", "t3.name"]);
}

#[test]
fn test_filter_reuses_field_join() {
    let plan = plan(
        "table: tracks
fields:
  album.title:
filter:
  - album.title:
      exactly: \"My great album!\"
",
    );

    assert_eq!(plan.joins().len(), 1);
    let predicate = &plan.predicates()[0];
    assert_eq!(predicate.column.alias, "t1");
    assert_eq!(
        predicate.condition,
        Condition::Eq(Value::from("My great album!"))
    );
}

#[test]
fn test_filter_introduces_join_after_fields() {
    let plan = plan(
        "table: tracks
fields:
  title:
  album.title:
filter:
  - album.performer.name:
      exactly: \"Ron Paul\"
",
    );

    assert_eq!(
        join_summary(&plan)
            .into_iter()
            .map(|(prefix, _, alias)| (prefix, alias))
            .collect::<Vec<_>>(),
        vec![
            ("album".to_string(), "t1".to_string()),
            ("album.performer".to_string(), "t2".to_string()),
        ]
    );
    assert_eq!(plan.predicates()[0].column.alias, "t2");
}

#[test]
fn test_cyclic_path_joins_each_hop() {
    let plan = plan("table: tracks\nfields:\n  album.tracks.album.title:\n  title:\n");

    let joins = plan.joins();
    assert_eq!(joins.len(), 3);
    assert_eq!(joins[1].table, "tracks");
    assert_eq!(joins[1].edge.as_ref().unwrap().cardinality, Cardinality::Many);
    assert_eq!(selection_columns(&plan), ["t3.title", "t0.title"]);
    assert!(plan.join_plan().fans_out());
}

#[test]
fn test_join_keys_follow_relationship_direction() {
    let plan = plan("table: performers\nfields:\n  albums.title:\n");

    let edge = plan.joins()[0].edge.as_ref().unwrap();
    assert_eq!(edge.join_key.source_column, "id");
    assert_eq!(edge.join_key.target_column, "performer_id");
    assert_eq!(plan.joins()[0].parent, Some(plan.root().id));
}

#[test]
fn test_duplicate_field_paths_share_everything() {
    let plan = plan(
        "table: tracks
fields:
  album.title:
filter:
  - album.title:
      contains: great
  - album.title:
      not: \"Greatest hits\"
",
    );

    assert_eq!(plan.joins().len(), 1);
    assert!(plan.predicates().iter().all(|p| p.column.alias == "t1"));
}
