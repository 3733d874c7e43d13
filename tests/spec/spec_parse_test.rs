//! Parsing and validation of query spec text.

use radhoc::spec::FilterSpec;
use radhoc::{FieldPath, Operator, QueryError, QuerySpec, Value};

fn filter(spec: &QuerySpec, index: usize) -> &FilterSpec {
    &spec.filters[index]
}

#[test]
fn test_full_yaml_spec() {
    let spec = QuerySpec::from_yaml(
        "table: tracks
fields:
  title:
    label: \"Name\"
  album.performer.title:
filter:
  - album.title:
      exactly: \"My great album!\"
  - track_number:
      greater_than: 2
",
    )
    .unwrap();

    assert_eq!(spec.table, "tracks");
    assert_eq!(spec.fields.len(), 2);
    assert_eq!(spec.fields[0].path.key(), "title");
    assert_eq!(spec.fields[0].label.as_deref(), Some("Name"));
    assert_eq!(spec.fields[1].path.relationships(), ["album", "performer"]);
    assert_eq!(spec.fields[1].path.field(), "title");
    assert_eq!(spec.fields[1].label, None);

    assert_eq!(filter(&spec, 0).path.key(), "album.title");
    assert_eq!(filter(&spec, 0).operator, Operator::Exactly);
    assert_eq!(filter(&spec, 0).operand, Value::from("My great album!"));
    assert_eq!(filter(&spec, 1).operator, Operator::GreaterThan);
    assert_eq!(filter(&spec, 1).operand, Value::Int(2));
}

#[test]
fn test_json_and_yaml_agree() {
    let yaml = QuerySpec::from_yaml(
        "table: tracks\nfields:\n  album.title:\nfilter:\n  - title:\n      contains: Some\n",
    )
    .unwrap();
    let json = QuerySpec::from_json(
        r#"{"table": "tracks", "fields": {"album.title": {}}, "filter": [{"title": {"contains": "Some"}}]}"#,
    )
    .unwrap();
    assert_eq!(yaml, json);
}

#[test]
fn test_from_str_reads_yaml() {
    let spec: QuerySpec = "table: albums\nfields:\n  title:\n".parse().unwrap();
    assert_eq!(spec.table, "albums");
}

#[test]
fn test_missing_fields_means_empty_list() {
    let spec = QuerySpec::from_yaml("table: tracks\n").unwrap();
    assert!(spec.fields.is_empty());
    assert!(spec.filters.is_empty());
}

#[test]
fn test_null_operator_operands() {
    let spec = QuerySpec::from_json(
        r#"{"table": "tracks", "fields": {"id": null}, "filter": [{"album_id": {"null": true}}]}"#,
    )
    .unwrap();
    assert_eq!(filter(&spec, 0).operator, Operator::Null);
    assert_eq!(filter(&spec, 0).operand, Value::Bool(true));
}

#[test]
fn test_unknown_operator_rejected() {
    let err = QuerySpec::from_yaml(
        "table: tracks\nfields:\n  title:\nfilter:\n  - title:\n      like: \"%x%\"\n",
    )
    .unwrap_err();
    match err {
        QueryError::UnsupportedOperator { path, operator } => {
            assert_eq!(path, "title");
            assert_eq!(operator, "like");
        }
        other => panic!("expected unsupported operator, got {:?}", other),
    }
}

#[test]
fn test_filter_entry_with_two_paths_rejected() {
    let err = QuerySpec::from_yaml(
        "table: tracks
fields:
  title:
filter:
  - title:
      exactly: a
    album.title:
      exactly: b
",
    )
    .unwrap_err();
    assert!(matches!(err, QueryError::Parse(_)));
}

#[test]
fn test_filter_without_operator_rejected() {
    let err = QuerySpec::from_yaml("table: tracks\nfields:\n  title:\nfilter:\n  - title:\n")
        .unwrap_err();
    assert!(matches!(err, QueryError::Parse(_)));
}

#[test]
fn test_unknown_top_level_key_rejected() {
    let err = QuerySpec::from_yaml("table: tracks\nfields:\n  title:\nsort: title\n").unwrap_err();
    assert!(matches!(err, QueryError::Parse(_)));
}

#[test]
fn test_blank_table_rejected() {
    let err = QuerySpec::from_yaml("table: \"  \"\nfields:\n  title:\n").unwrap_err();
    assert!(matches!(err, QueryError::Parse(_)));
}

#[test]
fn test_malformed_paths_rejected() {
    for bad in ["album..title", ".title", "album.", "album title", "1album.title"] {
        let err = FieldPath::parse(bad).unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)), "{:?} should not parse", bad);
    }
}

#[test]
fn test_path_display_round_trips() {
    let path = FieldPath::parse("album.performer.title").unwrap();
    assert_eq!(path.to_string(), "album.performer.title");
    assert_eq!(path.depth(), 2);
}

#[test]
fn test_read_from_file_by_extension() {
    let dir = std::env::temp_dir().join(format!("radhoc-spec-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let yaml_path = dir.join("tracks.yaml");
    std::fs::write(&yaml_path, "table: tracks\nfields:\n  title:\n").unwrap();
    let json_path = dir.join("tracks.json");
    std::fs::write(&json_path, r#"{"table": "tracks", "fields": {"title": null}}"#).unwrap();

    let from_yaml = QuerySpec::from_file(&yaml_path).unwrap();
    let from_json = QuerySpec::from_file(&json_path).unwrap();
    assert_eq!(from_yaml, from_json);

    let missing = QuerySpec::from_file(dir.join("nope.yaml")).unwrap_err();
    assert!(matches!(missing, QueryError::Parse(_)));

    std::fs::remove_dir_all(&dir).unwrap();
}
