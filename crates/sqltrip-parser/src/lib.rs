//! Multi-dialect SQL parser producing lossless concrete syntax trees.
//!
//! The grammar is shared between dialects; dialect-specific productions are
//! admitted at parse time by consulting [`ParseOptions`]. Everything the
//! lexer sees — keyword casing, quote styles, whitespace, comments — is
//! carried into the tree, so rendering a tree parsed under
//! [`ParseOptions::preserve_all`] reproduces the input byte-for-byte.

mod ddl;
mod expr;
pub mod keywords;
pub mod lexer;
pub mod options;
mod parser;
pub mod token;

pub use options::{Dialect, ParamType, ParseOptions};
pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use sqltrip_cst::*;

    fn parse_with(sql: &str, dialect: Dialect) -> Node<Program> {
        Parser::new(sql, ParseOptions::preserve_all(dialect))
            .expect("valid options")
            .parse_program()
            .expect("parse should succeed")
    }

    fn parse_sqlite(sql: &str) -> Node<Program> {
        parse_with(sql, Dialect::Sqlite)
    }

    fn assert_roundtrip_dialect(sql: &str, dialect: Dialect) {
        let program = parse_with(sql, dialect);
        assert_eq!(render(&program), sql, "round-trip mismatch for {sql:?}");
    }

    fn assert_roundtrip(sql: &str) {
        assert_roundtrip_dialect(sql, Dialect::Sqlite);
    }

    fn first_statement(program: &Node<Program>) -> &Statement {
        &program.inner.statements[0].inner
    }

    #[test]
    fn parses_simple_select() {
        let program = parse_sqlite("SELECT 1");
        assert!(matches!(first_statement(&program), Statement::Select(_)));
    }

    #[test]
    fn roundtrips_whitespace_and_casing() {
        assert_roundtrip("select  1 ,\t2");
        assert_roundtrip("SELECT * FROM t WHERE a > 1 ORDER BY a LIMIT 10 OFFSET 5");
        assert_roundtrip("SeLeCt 1");
    }

    #[test]
    fn roundtrips_comments_between_list_items() {
        assert_roundtrip("SELECT /*c0*/ 1 /*c1*/, /*c2*/ 2");
    }

    #[test]
    fn roundtrips_line_comments() {
        assert_roundtrip("SELECT 1 -- one\n, 2");
        assert_roundtrip("SELECT 1;\n-- done\n");
    }

    #[test]
    fn roundtrips_statement_separators() {
        assert_roundtrip("SELECT 1; SELECT 2");
        assert_roundtrip("SELECT 1;");
        assert_roundtrip(";;");
        assert_roundtrip("  ");
    }

    #[test]
    fn roundtrips_joins() {
        assert_roundtrip("SELECT * FROM a JOIN b ON a.id = b.id");
        assert_roundtrip("SELECT * FROM a NATURAL LEFT OUTER JOIN b");
        assert_roundtrip("SELECT * FROM a, b CROSS JOIN c USING (id)");
        assert_roundtrip("SELECT * FROM t INDEXED BY idx");
        assert_roundtrip("SELECT * FROM t NOT INDEXED");
        assert_roundtrip("SELECT * FROM (SELECT 1) AS sub");
    }

    #[test]
    fn roundtrips_aliases() {
        assert_roundtrip("SELECT 1 AS foo");
        assert_roundtrip("SELECT 1 as bar, 2 baz");
        assert_roundtrip("SELECT col 'foo'");
        assert_roundtrip("SELECT tbl.*, foo");
    }

    #[test]
    fn roundtrips_compound_selects() {
        assert_roundtrip("SELECT 1 UNION SELECT 2");
        assert_roundtrip("SELECT 1 UNION ALL SELECT 2 EXCEPT SELECT 3");
        assert_roundtrip("(SELECT 1) UNION (SELECT 2)");
    }

    #[test]
    fn roundtrips_insert_update_delete() {
        assert_roundtrip("INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')");
        assert_roundtrip("INSERT OR IGNORE INTO t VALUES (1)");
        assert_roundtrip("INSERT INTO t DEFAULT VALUES");
        assert_roundtrip("INSERT INTO t (a) SELECT a FROM s");
        assert_roundtrip(
            "INSERT INTO t (a) VALUES (1) ON CONFLICT (a) DO UPDATE SET a = 2 WHERE a > 0",
        );
        assert_roundtrip("UPDATE t SET a = 1, b = 2 WHERE c = 3 RETURNING a");
        assert_roundtrip("DELETE FROM t WHERE a = 1");
        assert_roundtrip("DELETE FROM t AS x WHERE x.a = 1 RETURNING *");
    }

    #[test]
    fn roundtrips_create_table() {
        assert_roundtrip("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)");
        assert_roundtrip(
            "CREATE TABLE IF NOT EXISTS s.t (a VARCHAR(255) NOT NULL DEFAULT 'x', \
             CONSTRAINT pk PRIMARY KEY (a ASC) ON CONFLICT REPLACE)",
        );
        assert_roundtrip(
            "CREATE TABLE t (a INT, b INT REFERENCES o (c) ON DELETE SET NULL MATCH FULL, \
             FOREIGN KEY (a) REFERENCES p (q) ON UPDATE CASCADE)",
        );
        assert_roundtrip("CREATE TABLE t (a TEXT COLLATE nocase CHECK (a <> ''))");
        assert_roundtrip(
            "CREATE TEMP TABLE t (a INTEGER GENERATED ALWAYS AS (b * 2) STORED)",
        );
    }

    #[test]
    fn roundtrips_alter_table() {
        assert_roundtrip("ALTER TABLE t RENAME TO u");
        assert_roundtrip("ALTER TABLE t RENAME COLUMN a TO b");
        assert_roundtrip("ALTER TABLE t RENAME a TO b");
        assert_roundtrip("ALTER TABLE t ADD COLUMN c TEXT");
        assert_roundtrip("ALTER TABLE t DROP COLUMN c");
        assert_roundtrip_dialect("ALTER TABLE t RENAME AS u", Dialect::Mysql);
        assert_roundtrip_dialect("ALTER TABLE t RENAME u", Dialect::Mysql);
        assert_roundtrip_dialect(
            "ALTER TABLE t ALTER COLUMN c SET DEFAULT 0, ALTER c DROP NOT NULL",
            Dialect::Postgresql,
        );
        assert_roundtrip_dialect("ALTER TABLE t OWNER TO admin", Dialect::Postgresql);
    }

    #[test]
    fn roundtrips_views_indexes_triggers() {
        assert_roundtrip("CREATE VIEW v (a, b) AS SELECT 1, 2");
        assert_roundtrip("DROP VIEW IF EXISTS v");
        assert_roundtrip("CREATE UNIQUE INDEX IF NOT EXISTS i ON t (a DESC) WHERE a > 0");
        assert_roundtrip("DROP INDEX i");
        assert_roundtrip(
            "CREATE TRIGGER trg AFTER UPDATE OF a, b ON t FOR EACH ROW WHEN NEW.a > 0 \
             BEGIN UPDATE s SET n = n + 1; END",
        );
        assert_roundtrip("DROP TRIGGER IF EXISTS trg");
    }

    #[test]
    fn roundtrips_transactions() {
        assert_roundtrip("BEGIN");
        assert_roundtrip("BEGIN IMMEDIATE TRANSACTION");
        assert_roundtrip("COMMIT");
        assert_roundtrip("END TRANSACTION");
        assert_roundtrip("ROLLBACK TO SAVEPOINT sp");
        assert_roundtrip("SAVEPOINT sp; RELEASE sp");
    }

    #[test]
    fn roundtrips_sqlite_admin_statements() {
        assert_roundtrip("ATTACH DATABASE 'file.db' AS aux");
        assert_roundtrip("DETACH aux");
        assert_roundtrip("VACUUM main INTO 'backup.db'");
        assert_roundtrip("REINDEX t");
        assert_roundtrip("PRAGMA foreign_keys = ON");
        assert_roundtrip("PRAGMA schema.page_size");
        assert_roundtrip("PRAGMA integrity_check(10)");
        assert_roundtrip("CREATE VIRTUAL TABLE ft USING fts5(content, tokenize)");
        assert_roundtrip("ANALYZE main.t");
        assert_roundtrip("EXPLAIN QUERY PLAN SELECT 1");
    }

    #[test]
    fn roundtrips_window_functions() {
        assert_roundtrip(
            "SELECT sum(x) OVER (PARTITION BY y ORDER BY z ROWS BETWEEN 1 PRECEDING \
             AND CURRENT ROW) FROM t",
        );
        assert_roundtrip(
            "SELECT count(*) OVER w FROM t WINDOW w AS (ORDER BY a RANGE UNBOUNDED PRECEDING)",
        );
        assert_roundtrip(
            "SELECT avg(x) OVER (GROUPS CURRENT ROW EXCLUDE NO OTHERS) FROM t",
        );
    }

    #[test]
    fn roundtrips_with_clauses() {
        assert_roundtrip("WITH cte AS (SELECT 1) SELECT * FROM cte");
        assert_roundtrip("WITH RECURSIVE cte (n) AS NOT MATERIALIZED (SELECT 1) SELECT n FROM cte");
        assert_roundtrip("WITH cte AS (SELECT 1) INSERT INTO t SELECT * FROM cte");
    }

    #[test]
    fn roundtrips_mysql_specifics() {
        assert_roundtrip_dialect("SELECT DISTINCT STRAIGHT_JOIN SQL_NO_CACHE foo", Dialect::Mysql);
        assert_roundtrip_dialect("SELECT _utf8'abc'", Dialect::Mysql);
        assert_roundtrip_dialect("SELECT INTERVAL 1 DAY + NOW()", Dialect::Mysql);
        assert_roundtrip_dialect("SELECT \"a string\"", Dialect::Mysql);
        assert_roundtrip_dialect(
            "CREATE TABLE t (a INT AUTO_INCREMENT COMMENT 'id' INVISIBLE, \
             FULLTEXT INDEX (a))",
            Dialect::Mysql,
        );
        assert_roundtrip_dialect("SELECT a FROM t ORDER BY a WITH ROLLUP", Dialect::Mysql);
        assert_roundtrip_dialect("SELECT * FROM a STRAIGHT_JOIN b", Dialect::Mysql);
    }

    #[test]
    fn roundtrips_role_statements() {
        for sql in [
            "CREATE ROLE my_role WITH LOGIN",
            "CREATE USER u PASSWORD 'secret' CONNECTION LIMIT 3",
            "CREATE ROLE r SYSID 42 VALID UNTIL '2030-01-01' IN ROLE a, b",
        ] {
            assert_roundtrip_dialect(sql, Dialect::Postgresql);
        }
        assert_roundtrip_dialect("ALTER ROLE ALL IN DATABASE db WITH NOSUPERUSER", Dialect::Postgresql);
        assert_roundtrip_dialect("ALTER ROLE r WITH NOLOGIN", Dialect::Postgresql);
        assert_roundtrip_dialect("ALTER ROLE r RENAME TO s", Dialect::Postgresql);
        assert_roundtrip_dialect("DROP ROLE IF EXISTS r, s", Dialect::Postgresql);
        assert_roundtrip_dialect("SET SESSION ROLE NONE", Dialect::Postgresql);
        assert_roundtrip_dialect("SET ROLE 'r'", Dialect::Postgresql);
        assert_roundtrip_dialect("RESET ROLE", Dialect::Postgresql);
    }

    #[test]
    fn dialect_gating_rejects_foreign_constructs() {
        for dialect in [Dialect::Mysql, Dialect::Sqlite] {
            let result = Parser::new(
                "CREATE ROLE my_role WITH LOGIN",
                ParseOptions::preserve_all(dialect),
            )
            .expect("valid options")
            .parse_program();
            assert!(result.is_err(), "CREATE ROLE must fail under {dialect}");
        }
        let result = Parser::new("ATTACH 'f' AS a", ParseOptions::new(Dialect::Mysql))
            .expect("valid options")
            .parse_program();
        assert!(result.is_err());
        let result = Parser::new(
            "ALTER TABLE t RENAME u",
            ParseOptions::new(Dialect::Sqlite),
        )
        .expect("valid options")
        .parse_program();
        assert!(result.is_err(), "bare RENAME is the MySQL table form");
    }

    #[test]
    fn error_reports_furthest_position_and_expectations() {
        let err = Parser::new("SELECT 1 FROM", ParseOptions::new(Dialect::Sqlite))
            .expect("valid options")
            .parse_program()
            .expect_err("dangling FROM");
        let sqltrip_error::Error::Syntax(err) = err else {
            unreachable!("expected a syntax error");
        };
        assert!(err.offset >= 13, "failure at or after FROM, got {}", err.offset);
        assert!(err.found.is_none());
        assert!(
            err.expected.iter().any(|e| e.contains("table")),
            "expected set should mention a table, got {:?}",
            err.expected
        );
    }

    #[test]
    fn error_merges_expectations_at_same_position() {
        let err = Parser::new("CREATE bogus", ParseOptions::new(Dialect::Sqlite))
            .expect("valid options")
            .parse_program()
            .expect_err("unknown CREATE object");
        let sqltrip_error::Error::Syntax(err) = err else {
            unreachable!("expected a syntax error");
        };
        assert!(err.expected.len() >= 2, "got {:?}", err.expected);
        assert_eq!(err.found.as_deref(), Some("bogus"));
    }

    #[test]
    fn no_partial_tree_on_failure() {
        let result = Parser::new("SELECT 1; SELECT FROM", ParseOptions::new(Dialect::Sqlite))
            .expect("valid options")
            .parse_program();
        assert!(result.is_err(), "one bad statement invalidates the input");
    }

    #[test]
    fn minimal_mode_canonicalizes_whitespace() {
        let program = Parser::new("SELECT   1 ,  2  FROM   t", ParseOptions::new(Dialect::Sqlite))
            .expect("valid options")
            .parse_program()
            .expect("parse");
        assert_eq!(render(&program), "SELECT 1,2 FROM t");
    }

    #[test]
    fn minimal_mode_output_reparses_to_same_text() {
        let sql = "SELECT a /*c*/ , b FROM t -- tail\nWHERE a = 1";
        let opts = ParseOptions::new(Dialect::Sqlite);
        let once = render(
            &Parser::new(sql, opts.clone())
                .expect("valid options")
                .parse_program()
                .expect("parse"),
        );
        let twice = render(
            &Parser::new(&once, opts)
                .expect("valid options")
                .parse_program()
                .expect("re-parse of own output"),
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn comments_are_dropped_at_collection_time() {
        let opts = ParseOptions {
            preserve_comments: false,
            preserve_newlines: true,
            preserve_spaces: true,
            ..ParseOptions::new(Dialect::Sqlite)
        };
        let program = Parser::new("SELECT /*gone*/ 1", opts)
            .expect("valid options")
            .parse_program()
            .expect("parse");
        assert_eq!(render(&program), "SELECT  1");
    }

    #[test]
    fn ranges_are_recorded_when_requested() {
        let program = Parser::new("SELECT 1", ParseOptions::new(Dialect::Sqlite).with_ranges())
            .expect("valid options")
            .parse_program()
            .expect("parse");
        let stmt = &program.inner.statements[0];
        assert_eq!(stmt.range, Some(Span::new(0, 8)));
        let without = Parser::new("SELECT 1", ParseOptions::new(Dialect::Sqlite))
            .expect("valid options")
            .parse_program()
            .expect("parse");
        assert_eq!(without.inner.statements[0].range, None);
    }

    #[test]
    fn nonreserved_keywords_fall_back_to_identifiers() {
        assert_roundtrip("SELECT temp, action FROM plan");
        let program = parse_sqlite("SELECT temp FROM t");
        let Statement::Select(select) = first_statement(&program) else {
            unreachable!("expected a select");
        };
        let SelectPart::Select(clause) = &select.clauses[0].inner else {
            unreachable!("expected the select clause first");
        };
        assert!(matches!(
            &clause.columns.items[0].inner,
            Aliased::Bare(Expr::Ident(id)) if id.text == "temp"
        ));
    }

    #[test]
    fn reserved_keywords_never_parse_as_identifiers() {
        let result = Parser::new("SELECT select", ParseOptions::new(Dialect::Sqlite))
            .expect("valid options")
            .parse_program();
        assert!(result.is_err());
    }

    #[test]
    fn quoted_identifiers_keep_their_quotes() {
        assert_roundtrip("SELECT \"col name\", [other], `third` FROM t");
    }
}
