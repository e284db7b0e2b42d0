//! Configuration handling, dialect gating, whitespace policies, and error
//! reporting.

mod common;

use std::str::FromStr;

use common::{parse_sql, preserve_all};
use sqltrip::{
    parse, parse_expr, render, render_all, ConfigError, Dialect, Error, Node, ParamType,
    ParseOptions, Program,
};

#[test]
fn unknown_dialect_name_is_a_config_error() {
    let err = Dialect::from_str("oracle").expect_err("oracle is not recognized");
    assert!(matches!(err, ConfigError::UnknownDialect { name } if name == "oracle"));
}

#[test]
fn incompatible_param_style_is_rejected_before_parsing() {
    let options = ParseOptions::new(Dialect::Mysql).with_param_types([ParamType::Dollar]);
    let err = parse("SELECT 1", &options).expect_err("config must be validated first");
    assert!(matches!(err, Error::Config(ConfigError::UnsupportedParamType { .. })));
}

#[test]
fn dialect_gating_yields_syntax_errors_not_partial_parses() {
    let sql = "CREATE ROLE my_role WITH LOGIN";
    assert!(parse(sql, &ParseOptions::new(Dialect::Postgresql)).is_ok());
    for dialect in [Dialect::Mysql, Dialect::Sqlite] {
        let err = parse(sql, &ParseOptions::new(dialect)).expect_err("gated construct");
        assert!(matches!(err, Error::Syntax(_)));
    }

    assert!(parse("SELECT * FROM t INDEXED BY i", &ParseOptions::new(Dialect::Sqlite)).is_ok());
    assert!(parse("SELECT * FROM t INDEXED BY i", &ParseOptions::new(Dialect::Postgresql)).is_err());

    assert!(parse_expr("INTERVAL 1 DAY", &ParseOptions::new(Dialect::Mysql)).is_ok());
    assert!(parse_expr("INTERVAL 1 DAY", &ParseOptions::new(Dialect::Sqlite)).is_err());
}

#[test]
fn param_styles_follow_dialect_defaults() {
    assert!(parse_expr("?", &ParseOptions::new(Dialect::Sqlite)).is_ok());
    assert!(parse_expr("?", &ParseOptions::new(Dialect::Mysql)).is_ok());
    assert!(parse_expr("?", &ParseOptions::new(Dialect::Postgresql)).is_err());
    assert!(parse_expr("$1", &ParseOptions::new(Dialect::Postgresql)).is_ok());

    // An explicit set narrows recognition.
    let narrowed = ParseOptions::new(Dialect::Sqlite).with_param_types([ParamType::Question]);
    assert!(parse_expr("?", &narrowed).is_ok());
    assert!(parse_expr(":name", &narrowed).is_err());
}

#[test]
fn error_carries_position_expectations_and_found_token() {
    let err = parse("SELECT 1 FROM", &ParseOptions::new(Dialect::Sqlite))
        .expect_err("dangling FROM");
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert!(err.offset >= 13);
    assert_eq!(err.found, None);
    assert!(err.expected.iter().any(|e| e.contains("table")));
    let message = err.to_string();
    assert!(message.contains("line 1"), "got: {message}");
    assert!(message.contains("end of input"), "got: {message}");
}

#[test]
fn error_position_tracks_lines_and_columns() {
    let err = parse("SELECT 1\nFROM t\nWHERE +", &ParseOptions::new(Dialect::Sqlite))
        .expect_err("incomplete WHERE");
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error");
    };
    assert_eq!(err.line, 3);
    assert!(err.column >= 7);
}

#[test]
fn preserve_flags_are_applied_at_collection_time() {
    let sql = "SELECT  1 /*c*/ ,\n 2";

    let full = ParseOptions::preserve_all(Dialect::Sqlite);
    assert_eq!(render(&parse(sql, &full).expect("parse")), sql);

    let no_comments = ParseOptions {
        preserve_comments: false,
        ..full.clone()
    };
    assert_eq!(
        render(&parse(sql, &no_comments).expect("parse")),
        "SELECT  1  ,\n 2"
    );

    let minimal = ParseOptions::new(Dialect::Sqlite);
    assert_eq!(render(&parse(sql, &minimal).expect("parse")), "SELECT 1,2");
}

#[test]
fn minimal_output_always_reparses() {
    let corpus = [
        "SELECT a -- comment\n + b FROM t",
        "SELECT - -1",
        "SELECT 'a' 'b'",
        "INSERT INTO t VALUES (1 , 2)",
    ];
    let minimal = ParseOptions::new(Dialect::Sqlite);
    for sql in corpus {
        let once = render(&parse(sql, &minimal).expect("parse"));
        let reparsed = parse(&once, &minimal)
            .unwrap_or_else(|err| panic!("minimal output {once:?} must re-parse: {err}"));
        assert_eq!(render(&reparsed), once);
    }
}

#[test]
fn ranges_are_optional_diagnostics() {
    let with_ranges = parse(
        "SELECT 1",
        &ParseOptions::new(Dialect::Sqlite).with_ranges(),
    )
    .expect("parse");
    assert!(with_ranges.inner.statements[0].range.is_some());

    let without = parse("SELECT 1", &ParseOptions::new(Dialect::Sqlite)).expect("parse");
    assert!(without.inner.statements[0].range.is_none());
}

#[test]
fn tree_serializes_to_json() {
    let program = parse_sql("SELECT 'x' AS y", Dialect::Sqlite);
    let json = serde_json::to_value(&program).expect("tree is serializable");
    let statements = json["inner"]["statements"]
        .as_array()
        .expect("statements array");
    assert_eq!(statements.len(), 1);
}

#[test]
fn trees_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}
    let program = parse_sql("SELECT 1", Dialect::Sqlite);
    assert_send_sync(&program);

    let rendered: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| render(&program)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("render thread"))
            .collect()
    });
    assert!(rendered.iter().all(|r| r == "SELECT 1"));
}

#[test]
fn render_all_matches_program_joining() {
    let a: Node<Program> = parse_sql("SELECT 1", Dialect::Sqlite);
    let b: Node<Program> = parse_sql(" SELECT 2", Dialect::Sqlite);
    assert_eq!(render_all(&[a, b], ";"), "SELECT 1; SELECT 2");
}

#[test]
fn fresh_options_per_call_do_not_leak_state() {
    let options = preserve_all(Dialect::Sqlite);
    let first = parse("SELECT /*a*/ 1", &options).expect("parse");
    let second = parse("SELECT 2", &options).expect("parse");
    assert_eq!(render(&first), "SELECT /*a*/ 1");
    assert_eq!(render(&second), "SELECT 2");
}
