//! Byte-exact round-trips for SELECT statements and expressions.

mod common;

use common::{assert_expr_roundtrip, assert_expr_roundtrip_in, assert_roundtrip, assert_roundtrip_in};
use sqltrip::{parse, render, Dialect, ParseOptions};

#[test]
fn simple_selects() {
    assert_roundtrip("SELECT 'hello'");
    assert_roundtrip("SELECT 1, 2, 3");
    assert_roundtrip("select 123");
    assert_roundtrip("SELECT /*c0*/ 1 /*c1*/, /*c2*/ 2");
}

#[test]
fn set_quantifiers() {
    assert_roundtrip("SELECT ALL foo");
    assert_roundtrip("SELECT DISTINCT foo");
}

#[test]
fn mysql_select_options() {
    for option in [
        "DISTINCTROW",
        "HIGH_PRIORITY",
        "STRAIGHT_JOIN",
        "SQL_SMALL_RESULT",
        "SQL_BIG_RESULT",
        "SQL_BUFFER_RESULT",
        "SQL_NO_CACHE",
        "SQL_CALC_FOUND_ROWS",
    ] {
        assert_roundtrip_in(&format!("SELECT {option} foo AS x"), Dialect::Mysql);
    }
    assert_roundtrip_in("SELECT DISTINCT STRAIGHT_JOIN SQL_NO_CACHE foo", Dialect::Mysql);
}

#[test]
fn column_aliases() {
    assert_roundtrip("SELECT 'hello' AS foo");
    assert_roundtrip("SELECT 1 as bar, 2 baz");
    assert_roundtrip("SELECT 1 /*c1*/ as /*c2*/ bar");
    assert_roundtrip("SELECT 1 /*c*/ bar");
    assert_roundtrip("SELECT col AS 'foo'");
    assert_roundtrip("SELECT col AS \"foo\"");
    assert_roundtrip("SELECT col 'foo'");
    assert_roundtrip("SELECT col \"foo\"");
}

#[test]
fn select_star() {
    assert_roundtrip("SELECT *");
    assert_roundtrip("SELECT *, foo, bar");
    assert_roundtrip("SELECT foo, *, bar");
    assert_roundtrip("SELECT /*c*/ *");
    assert_roundtrip("SELECT tbl.*");
    assert_roundtrip("SELECT tbl1.*, tbl2.*");
    assert_roundtrip("SELECT tbl /*c1*/./*c2*/ *");
}

#[test]
fn from_and_joins() {
    assert_roundtrip("SELECT * FROM t");
    assert_roundtrip("SELECT * FROM schema1.t AS alias1");
    assert_roundtrip("SELECT * FROM a LEFT JOIN b ON a.id = b.a_id");
    assert_roundtrip("SELECT * FROM a LEFT /*c*/ OUTER JOIN b USING (id)");
    assert_roundtrip("SELECT * FROM a, b, c");
    assert_roundtrip("SELECT * FROM (SELECT a FROM b) AS t");
    assert_roundtrip("SELECT * FROM (a JOIN b ON TRUE)");
    assert_roundtrip("SELECT * FROM generate_series(1, 10) AS gs");
}

#[test]
fn clause_sequences() {
    assert_roundtrip(
        "SELECT a, count(*) FROM t WHERE a > 0 GROUP BY a HAVING count(*) > 1 \
         ORDER BY a DESC NULLS LAST LIMIT 10 OFFSET 2",
    );
    assert_roundtrip("SELECT a FROM t LIMIT 5, 10");
    assert_roundtrip("SELECT a FROM t LIMIT 10");
}

#[test]
fn multiline_statements_keep_their_layout() {
    assert_roundtrip(
        "SELECT\n  a,\n  b -- second column\nFROM t\nWHERE\n  a = 1\n  AND b = 2\n",
    );
    assert_roundtrip("\n\nSELECT 1\n\n");
}

#[test]
fn compound_selects() {
    assert_roundtrip("SELECT 1 UNION SELECT 2");
    assert_roundtrip("SELECT 1 UNION ALL SELECT 2");
    assert_roundtrip("SELECT 1 INTERSECT SELECT 2 EXCEPT SELECT 3");
    assert_roundtrip_in("SELECT 1 UNION DISTINCT SELECT 2", Dialect::Mysql);
}

#[test]
fn arithmetic_expressions() {
    assert_expr_roundtrip("1 + 2 * 3 - 4 / 5 % 6");
    assert_expr_roundtrip("'a' || 'b' || 'c'");
    assert_expr_roundtrip("a & b | c << 2 >> 1");
    assert_expr_roundtrip("(6 + 7) * 3");
}

#[test]
fn logical_expressions() {
    assert_expr_roundtrip("a AND b OR c");
    assert_expr_roundtrip("NOT a");
    assert_expr_roundtrip("NOT NOT a");
    assert_expr_roundtrip("a IS NULL");
    assert_expr_roundtrip("a IS NOT NULL");
}

#[test]
fn mysql_specific_expressions() {
    assert_expr_roundtrip_in("_utf8'hello'", Dialect::Mysql);
    assert_expr_roundtrip_in("a <=> b", Dialect::Mysql);
    assert_expr_roundtrip_in("INTERVAL 7 DAY", Dialect::Mysql);
    assert_expr_roundtrip_in("TIMESTAMP '2020-01-01 00:00:00'", Dialect::Mysql);
    assert_expr_roundtrip_in("a REGEXP 'x.*'", Dialect::Mysql);
}

#[test]
fn subqueries() {
    assert_expr_roundtrip("(SELECT 1)");
    assert_expr_roundtrip("a IN (SELECT b FROM t)");
    assert_expr_roundtrip("EXISTS (SELECT 1 FROM t WHERE t.a = x.a)");
}

#[test]
fn window_clauses() {
    assert_roundtrip("SELECT row_number() OVER (ORDER BY x) FROM t");
    assert_roundtrip("SELECT sum(y) OVER w1 FROM t WINDOW w1 AS (PARTITION BY z)");
    assert_roundtrip(
        "SELECT first_value(v) OVER (ROWS BETWEEN UNBOUNDED PRECEDING AND 1 FOLLOWING) FROM t",
    );
}

#[test]
fn canonicalization_is_idempotent() {
    let corpus = [
        "SELECT   a ,   b   FROM t  WHERE a =  1",
        "select /*c*/ 1\n,2  -- x\n",
        "CREATE TABLE t ( a  INT ,  b TEXT )",
        "INSERT INTO t VALUES ( 1 , 2 )",
    ];
    let options = ParseOptions::new(Dialect::Sqlite);
    for sql in corpus {
        let once = render(&parse(sql, &options).expect("parse"));
        let twice = render(&parse(&once, &options).expect("re-parse of rendered output"));
        assert_eq!(once, twice, "canonical form of {sql:?} must be stable");
    }
}

#[test]
fn full_preservation_roundtrip_is_the_identity_on_a_mixed_corpus() {
    let corpus = [
        "SELECT x'ff', X'CAFE', 0x10, .5, 1e9 FROM t",
        "WITH a AS (SELECT 1), b AS (SELECT 2) SELECT * FROM a, b",
        "SELECT CASE WHEN a THEN 1 WHEN b THEN 2 ELSE 3 END FROM t",
        "UPDATE t SET a = CASE WHEN b THEN 1 ELSE 0 END",
        "SELECT a FROM t WHERE b LIKE '%x%' ESCAPE '!'",
        "SELECT 1;\n\n-- trailing commentary\n",
    ];
    for sql in corpus {
        assert_roundtrip(sql);
    }
}
