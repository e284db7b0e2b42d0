#![allow(dead_code)]

use sqltrip::{parse, render, Dialect, Node, ParseOptions, Program, Statement};

/// Options under which rendering must reproduce the input byte-for-byte.
pub fn preserve_all(dialect: Dialect) -> ParseOptions {
    ParseOptions::preserve_all(dialect)
}

pub fn parse_sql(sql: &str, dialect: Dialect) -> Node<Program> {
    parse(sql, &preserve_all(dialect))
        .unwrap_or_else(|err| panic!("parse failed for {sql:?}: {err}"))
}

pub fn parse_stmt(sql: &str, dialect: Dialect) -> Statement {
    let program = parse_sql(sql, dialect);
    let statements: Vec<_> = program
        .inner
        .statements
        .into_iter()
        .filter(|s| !matches!(s.inner, Statement::Empty))
        .collect();
    assert_eq!(statements.len(), 1, "expected one statement in {sql:?}");
    statements.into_iter().next().expect("one statement").inner
}

/// The round-trip law: full preservation reproduces the source exactly.
pub fn assert_roundtrip_in(sql: &str, dialect: Dialect) {
    assert_eq!(
        render(&parse_sql(sql, dialect)),
        sql,
        "round-trip mismatch for {sql:?} under {dialect}"
    );
}

pub fn assert_roundtrip(sql: &str) {
    assert_roundtrip_in(sql, Dialect::Sqlite);
}

/// Round-trip an expression in SELECT position, as the original grammar's
/// tests exercise expressions.
pub fn assert_expr_roundtrip(expr: &str) {
    assert_roundtrip(&format!("SELECT {expr}"));
}

pub fn assert_expr_roundtrip_in(expr: &str, dialect: Dialect) {
    assert_roundtrip_in(&format!("SELECT {expr}"), dialect);
}
