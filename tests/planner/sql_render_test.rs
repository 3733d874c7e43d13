//! Rendered SQL for each dialect, checked against snapshots and parsed back
//! with sqlparser.

use insta::assert_snapshot;
use radhoc::catalog::{DataType, EntityDef};
use radhoc::planner::QueryAssembler;
use radhoc::sql::{render, SqlStatement};
use radhoc::{Dialect, InMemoryCatalog, JoinType, QuerySpec, Value};
use sqlparser::dialect::{DuckDbDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::builder()
        .entity(
            EntityDef::new("performers")
                .field("id", DataType::Integer)
                .field("title", DataType::Text),
        )
        .entity(
            EntityDef::new("albums")
                .field("id", DataType::Integer)
                .field("title", DataType::Text)
                .field("performer_id", DataType::Integer)
                .belongs_to("performer", "performers", "performer_id"),
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

fn compile(yaml: &str, dialect: Dialect, join_type: JoinType) -> SqlStatement {
    let spec = QuerySpec::from_yaml(yaml).unwrap();
    let plan = QueryAssembler::new(&catalog()).assemble(&spec).unwrap();
    let stmt = render(&plan, dialect, join_type);
    parse(&stmt.sql, dialect);
    stmt
}

fn parse(sql: &str, dialect: Dialect) {
    let result = match dialect {
        Dialect::Sqlite => Parser::parse_sql(&SQLiteDialect {}, sql),
        Dialect::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, sql),
        Dialect::MySql => Parser::parse_sql(&MySqlDialect {}, sql),
        Dialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql),
    };
    if let Err(e) = result {
        panic!("{} rejected generated SQL: {}\n{}", dialect, e, sql);
    }
}

const NESTED: &str = "table: tracks
fields:
  title:
  album.title:
  album.performer.title:
filter:
  - album.title:
      exactly: \"My great album!\"
";

#[test]
fn test_nested_titles_sqlite() {
    let stmt = compile(NESTED, Dialect::Sqlite, JoinType::Inner);
    assert_snapshot!(stmt.sql, @r#"SELECT "t0"."title", "t1"."title", "t2"."title" FROM "tracks" AS "t0" INNER JOIN "albums" AS "t1" ON "t1"."id" = "t0"."album_id" INNER JOIN "performers" AS "t2" ON "t2"."id" = "t1"."performer_id" WHERE "t1"."title" = ?"#);
    assert_eq!(stmt.params, vec![Value::from("My great album!")]);
}

#[test]
fn test_nested_titles_mysql() {
    let stmt = compile(NESTED, Dialect::MySql, JoinType::Inner);
    assert_snapshot!(stmt.sql, @"SELECT `t0`.`title`, `t1`.`title`, `t2`.`title` FROM `tracks` AS `t0` INNER JOIN `albums` AS `t1` ON `t1`.`id` = `t0`.`album_id` INNER JOIN `performers` AS `t2` ON `t2`.`id` = `t1`.`performer_id` WHERE `t1`.`title` = ?");
}

#[test]
fn test_numbered_placeholders_postgres() {
    let stmt = compile(
        "table: tracks
fields:
  title:
filter:
  - album.title:
      contains: \"50%\"
  - track_number:
      greater_than: 3
      less_than: 10
",
        Dialect::Postgres,
        JoinType::Left,
    );
    assert_snapshot!(stmt.sql, @r#"SELECT "t0"."title" FROM "tracks" AS "t0" LEFT JOIN "albums" AS "t1" ON "t1"."id" = "t0"."album_id" WHERE strpos("t1"."title", $1) > 0 AND "t0"."track_number" > $2 AND "t0"."track_number" < $3"#);
    assert_eq!(
        stmt.params,
        vec![Value::from("50%"), Value::Int(3), Value::Int(10)]
    );
}

#[test]
fn test_contains_compares_bytes_mysql() {
    let stmt = compile(
        "table: tracks\nfields:\n  title:\nfilter:\n  - title:\n      contains: Pure\n",
        Dialect::MySql,
        JoinType::Inner,
    );
    assert_snapshot!(stmt.sql, @"SELECT `t0`.`title` FROM `tracks` AS `t0` WHERE INSTR(CAST(`t0`.`title` AS BINARY), ?) > 0");
    assert_eq!(stmt.params, vec![Value::from("Pure")]);
}

#[test]
fn test_contains_sqlite_and_duckdb_use_instr() {
    for dialect in [Dialect::Sqlite, Dialect::DuckDb] {
        let stmt = compile(
            "table: tracks\nfields:\n  title:\nfilter:\n  - title:\n      contains: Pure\n",
            dialect,
            JoinType::Inner,
        );
        assert!(stmt.sql.ends_with(r#"WHERE instr("t0"."title", ?) > 0"#));
    }
}

#[test]
fn test_null_checks_bind_nothing_duckdb() {
    let stmt = compile(
        "table: tracks
fields:
  id:
filter:
  - track_number:
      \"null\": true
  - album.performer.title:
      \"null\": false
  - title:
      not: Intro
",
        Dialect::DuckDb,
        JoinType::Inner,
    );
    assert_snapshot!(stmt.sql, @r#"SELECT "t0"."id" FROM "tracks" AS "t0" INNER JOIN "albums" AS "t1" ON "t1"."id" = "t0"."album_id" INNER JOIN "performers" AS "t2" ON "t2"."id" = "t1"."performer_id" WHERE "t0"."track_number" IS NULL AND "t2"."title" IS NOT NULL AND "t0"."title" <> ?"#);
    assert_eq!(stmt.params, vec![Value::from("Intro")]);
}

#[test]
fn test_operands_never_inlined() {
    let stmt = compile(
        "table: tracks
fields:
  title:
filter:
  - title:
      exactly: \"x' OR '1'='1\"
",
        Dialect::Sqlite,
        JoinType::Inner,
    );
    assert!(!stmt.sql.contains("OR"));
    assert_eq!(stmt.params, vec![Value::from("x' OR '1'='1")]);
}

#[test]
fn test_every_dialect_parses() {
    for dialect in Dialect::ALL {
        compile(NESTED, dialect, JoinType::Inner);
        compile(NESTED, dialect, JoinType::Left);
    }
}
