// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::query::{self, Column, ColumnType, SqlValue};

#[test]
fn test_create_database_is_exact() {
    assert_eq!(query::create_database("foo"), "CREATE DATABASE foo;");
}

#[test]
fn test_create_table_with_primary_key() {
    let sql = query::create_table(
        "postfix.forwards",
        &["source VARCHAR(512) NOT NULL", "destination VARCHAR(512)"],
        &["source"],
    );
    assert_eq!(
        sql,
        "CREATE TABLE postfix.forwards (source VARCHAR(512) NOT NULL, destination VARCHAR(512), PRIMARY KEY (source));"
    );
}

#[test]
fn test_create_table_with_composite_key() {
    let sql = query::create_table("t", &["a INT", "b INT"], &["a", "b"]);
    assert_eq!(sql, "CREATE TABLE t (a INT, b INT, PRIMARY KEY (a,b));");
}

#[test]
fn test_create_table_without_primary_key() {
    let sql = query::create_table("t", &[String::from("a INT")], &[]);
    assert_eq!(sql, "CREATE TABLE t (a INT);");
}

#[test]
fn test_create_user_defaults_to_localhost() {
    let sql = query::create_user("postfix", "s3cret", &["SELECT"], "postfix.forwards");
    assert_eq!(
        sql,
        "GRANT SELECT ON postfix.forwards TO postfix@localhost IDENTIFIED BY 's3cret';"
    );
}

#[test]
fn test_create_user_keeps_explicit_host() {
    let sql = query::create_user(
        "editor@'%'",
        "pw",
        &["SELECT", "INSERT", "UPDATE", "DELETE"],
        "postfix.forwards",
    );
    assert_eq!(
        sql,
        "GRANT SELECT, INSERT, UPDATE, DELETE ON postfix.forwards TO editor@'%' IDENTIFIED BY 'pw';"
    );
}

#[test]
fn test_upsert_repeats_parameters_in_field_order() {
    let statement = query::upsert(
        "forwards",
        &[
            ("source", "a@example.org".into()),
            ("destination", "b@example.net".into()),
            ("enabled", true.into()),
        ],
    );

    assert_eq!(
        statement.sql,
        "INSERT INTO forwards(source,destination,enabled) VALUES(?,?,?) ON DUPLICATE KEY UPDATE source=?, destination=?, enabled=?;"
    );
    assert_eq!(statement.params.len(), 6);
    let (insert, update) = statement.params.split_at(3);
    assert_eq!(insert, update);
    assert_eq!(insert[0], SqlValue::Text(String::from("a@example.org")));
    assert_eq!(insert[2], SqlValue::Bool(true));
}

#[test]
fn test_select_without_filter_has_no_where_clause() {
    let statement = query::select("forwards", &["source", "destination"], &[]);
    assert_eq!(statement.sql, "SELECT source,destination FROM forwards;");
    assert!(statement.params.is_empty());
}

#[test]
fn test_select_placeholders_follow_filter_order() {
    let statement = query::select(
        "forwards",
        &["source"],
        &[("source", "a@example.org".into()), ("enabled", false.into())],
    );
    assert_eq!(
        statement.sql,
        "SELECT source FROM forwards WHERE source=? AND enabled=?;"
    );
    assert_eq!(
        statement.params,
        vec![
            SqlValue::Text(String::from("a@example.org")),
            SqlValue::Bool(false)
        ]
    );
}

#[test]
fn test_reversed_filter_reverses_placeholders_and_params() {
    let statement = query::select(
        "forwards",
        &["source"],
        &[("enabled", false.into()), ("source", "a@example.org".into())],
    );
    assert_eq!(
        statement.sql,
        "SELECT source FROM forwards WHERE enabled=? AND source=?;"
    );
    assert_eq!(
        statement.params,
        vec![
            SqlValue::Bool(false),
            SqlValue::Text(String::from("a@example.org"))
        ]
    );

    let removal = query::delete(
        "forwards",
        &[("destination", "b@example.net".into()), ("source", "a@example.org".into())],
    );
    assert_eq!(
        removal.sql,
        "DELETE FROM forwards WHERE destination=? AND source=?;"
    );
    assert_eq!(
        removal.params,
        vec![
            SqlValue::Text(String::from("b@example.net")),
            SqlValue::Text(String::from("a@example.org"))
        ]
    );
}

#[test]
fn test_delete_with_and_without_filter() {
    let all = query::delete("forwards", &[]);
    assert_eq!(all.sql, "DELETE FROM forwards;");
    assert!(all.params.is_empty());

    let one = query::delete("forwards", &[("source", "a@example.org".into())]);
    assert_eq!(one.sql, "DELETE FROM forwards WHERE source=?;");
    assert_eq!(one.sql.matches('?').count(), one.params.len());
}

#[test]
fn test_optional_values_become_null() {
    assert_eq!(SqlValue::from(None::<&str>), SqlValue::Null);
    assert_eq!(SqlValue::from(Some(7_i64)), SqlValue::Int(7));
}

#[test]
fn test_literals_escape_quotes() {
    assert_eq!(SqlValue::from("o'brien").literal(), "'o''brien'");
    assert_eq!(SqlValue::Bool(false).literal(), "0");
    assert_eq!(SqlValue::Null.literal(), "NULL");
}

#[test]
fn test_column_definitions() {
    assert_eq!(
        Column::varchar("source").not_null().definition(),
        "source VARCHAR(512) NOT NULL"
    );
    assert_eq!(
        Column::boolean("enabled")
            .not_null()
            .default_value(true)
            .definition(),
        "enabled BOOLEAN NOT NULL DEFAULT 1"
    );
    assert_eq!(
        Column::varchar("note")
            .length(64)
            .default_value("none")
            .definition(),
        "note VARCHAR(64) DEFAULT 'none'"
    );
}

#[test]
fn test_length_ignores_non_varchar_columns() {
    let column = Column::boolean("enabled").length(10);
    assert_eq!(column.definition(), "enabled BOOLEAN");
    assert_eq!(ColumnType::Varchar(10).to_string(), "VARCHAR(10)");
}
