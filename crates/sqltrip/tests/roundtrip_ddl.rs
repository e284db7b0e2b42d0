//! Byte-exact round-trips for DDL, DML, transactions, and role statements.

mod common;

use common::{assert_roundtrip, assert_roundtrip_in, parse_stmt};
use sqltrip::{Dialect, Statement};

fn assert_alter(alter: &str) {
    assert_roundtrip(&format!("ALTER TABLE t {alter}"));
}

#[test]
fn alter_table_basics() {
    assert_roundtrip("ALTER TABLE schm.my_tbl RENAME TO new_name");
    assert_roundtrip("ALTER /*c1*/ TABLE /*c2*/ my_tbl /*c3*/ RENAME TO new_name");
}

#[test]
fn rename_table_variants() {
    assert_alter("RENAME TO new_name");
    assert_alter("RENAME /*c1*/ TO /*c2*/ new_name");
    assert_roundtrip_in("ALTER TABLE t RENAME new_name", Dialect::Mysql);
    assert_roundtrip_in("ALTER TABLE t RENAME AS new_name", Dialect::Mysql);
}

#[test]
fn rename_column_variants() {
    assert_alter("RENAME COLUMN col1 TO col2");
    assert_alter("RENAME /*c1*/ COLUMN /*c2*/ col1 /*c3*/ TO /*c4*/ col2");
    assert_alter("RENAME col1 TO col2");
    assert_roundtrip_in("ALTER TABLE t RENAME COLUMN col1 AS col2", Dialect::Mysql);
}

#[test]
fn add_and_drop_column() {
    assert_alter("ADD COLUMN c TEXT NOT NULL");
    assert_alter("ADD c INTEGER DEFAULT 0");
    assert_alter("DROP COLUMN c");
    assert_alter("DROP c");
    assert_roundtrip_in(
        "ALTER TABLE t ADD CONSTRAINT uq UNIQUE (a), DROP CONSTRAINT old_uq",
        Dialect::Postgresql,
    );
}

#[test]
fn alter_column_actions() {
    for (dialect, alter) in [
        (Dialect::Postgresql, "ALTER COLUMN c SET DEFAULT 7"),
        (Dialect::Postgresql, "ALTER COLUMN c DROP DEFAULT"),
        (Dialect::Postgresql, "ALTER COLUMN c SET NOT NULL"),
        (Dialect::Postgresql, "ALTER COLUMN c DROP NOT NULL"),
        (Dialect::Postgresql, "ALTER COLUMN c SET DATA TYPE TEXT"),
        (Dialect::Postgresql, "ALTER COLUMN c TYPE TEXT"),
        (Dialect::Mysql, "ALTER COLUMN c SET VISIBLE"),
        (Dialect::Mysql, "ALTER COLUMN c SET INVISIBLE"),
    ] {
        assert_roundtrip_in(&format!("ALTER TABLE t {alter}"), dialect);
    }
}

#[test]
fn create_table_forms() {
    assert_roundtrip("CREATE TABLE t (a)");
    assert_roundtrip("CREATE TABLE t (a INTEGER, b TEXT, c)");
    assert_roundtrip("CREATE TEMPORARY TABLE t (a INT)");
    assert_roundtrip("CREATE TABLE IF NOT EXISTS t (a INT)");
    assert_roundtrip("CREATE TABLE t (a DECIMAL(10, 2), b DOUBLE PRECISION)");
    assert_roundtrip(
        "CREATE TABLE t (id INTEGER CONSTRAINT pk PRIMARY KEY ON CONFLICT ABORT AUTOINCREMENT)",
    );
    assert_roundtrip(
        "CREATE TABLE t (a INT NOT NULL UNIQUE CHECK (a > 0) DEFAULT 1 COLLATE binary)",
    );
    assert_roundtrip_in(
        "CREATE TABLE t (a INT NULL AUTO_INCREMENT COMMENT 'counter' VISIBLE)",
        Dialect::Mysql,
    );
    assert_roundtrip_in(
        "CREATE TABLE t (a ENUM('x', 'y') NOT NULL, KEY (a), FULLTEXT KEY (a))",
        Dialect::Mysql,
    );
}

#[test]
fn foreign_keys_and_deferrability() {
    assert_roundtrip(
        "CREATE TABLE t (a INT REFERENCES p (id) ON DELETE CASCADE ON UPDATE NO ACTION \
         DEFERRABLE INITIALLY DEFERRED)",
    );
    assert_roundtrip(
        "CREATE TABLE t (a INT, FOREIGN KEY (a) REFERENCES p (id) MATCH SIMPLE \
         NOT DEFERRABLE)",
    );
}

#[test]
fn drop_table_forms() {
    assert_roundtrip("DROP TABLE t");
    assert_roundtrip("DROP TABLE IF EXISTS a, b");
    assert_roundtrip_in("DROP TEMPORARY TABLE t CASCADE", Dialect::Mysql);
    assert_roundtrip_in("DROP TABLE t RESTRICT", Dialect::Postgresql);
}

#[test]
fn views_and_indexes() {
    assert_roundtrip("CREATE VIEW v AS SELECT a, b FROM t");
    assert_roundtrip("CREATE TEMP VIEW IF NOT EXISTS v (x) AS SELECT 1");
    assert_roundtrip("DROP VIEW v1, v2");
    assert_roundtrip("CREATE INDEX i ON t (a, b DESC)");
    assert_roundtrip("CREATE UNIQUE INDEX IF NOT EXISTS i ON t (a) WHERE a IS NOT NULL");
    assert_roundtrip_in("CREATE FULLTEXT INDEX i ON t (a)", Dialect::Mysql);
    assert_roundtrip("DROP INDEX IF EXISTS i");
    assert_roundtrip_in("DROP INDEX i ON t", Dialect::Mysql);
}

#[test]
fn triggers() {
    assert_roundtrip(
        "CREATE TRIGGER trg BEFORE DELETE ON t BEGIN SELECT 1; END",
    );
    assert_roundtrip(
        "CREATE TEMP TRIGGER IF NOT EXISTS trg INSTEAD OF UPDATE OF a ON v \
         FOR EACH ROW WHEN old.a <> new.a BEGIN UPDATE log SET n = n + 1; SELECT 2; END",
    );
    assert_roundtrip("DROP TRIGGER schm.trg");
    let stmt = parse_stmt(
        "CREATE TRIGGER trg AFTER INSERT ON t BEGIN SELECT 1; END",
        Dialect::Sqlite,
    );
    let Statement::CreateTrigger(trigger) = stmt else {
        panic!("expected a CREATE TRIGGER statement");
    };
    assert_eq!(trigger.body.inner.program.inner.statements.len(), 2);
}

#[test]
fn insert_statements() {
    assert_roundtrip("INSERT INTO t VALUES (1, 2)");
    assert_roundtrip("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)");
    assert_roundtrip("REPLACE INTO t VALUES (1)");
    assert_roundtrip("INSERT OR ROLLBACK INTO t VALUES (1)");
    assert_roundtrip("INSERT INTO t DEFAULT VALUES");
    assert_roundtrip("INSERT INTO t SELECT * FROM s");
    assert_roundtrip("INSERT INTO t (a) VALUES (1) ON CONFLICT DO NOTHING");
    assert_roundtrip(
        "INSERT INTO t (a) VALUES (1) ON CONFLICT (a) WHERE a > 0 DO UPDATE SET a = 2 RETURNING *",
    );
    assert_roundtrip_in("INSERT LOW_PRIORITY IGNORE INTO t VALUES (DEFAULT)", Dialect::Mysql);
}

#[test]
fn update_and_delete_statements() {
    assert_roundtrip("UPDATE t SET a = 1");
    assert_roundtrip("UPDATE t SET t.a = 1, b = DEFAULT WHERE c IS NULL");
    assert_roundtrip_in("UPDATE t1, t2 SET t1.a = t2.a", Dialect::Mysql);
    assert_roundtrip("DELETE FROM t");
    assert_roundtrip("DELETE FROM t AS x WHERE x.a > 0 RETURNING x.a");
}

#[test]
fn transactions() {
    assert_roundtrip("BEGIN; COMMIT");
    assert_roundtrip("BEGIN EXCLUSIVE TRANSACTION; ROLLBACK TRANSACTION");
    assert_roundtrip("begin deferred; end");
    assert_roundtrip("SAVEPOINT s1; ROLLBACK TO s1; RELEASE SAVEPOINT s1");
    assert_roundtrip_in("START TRANSACTION; COMMIT WORK", Dialect::Mysql);
}

#[test]
fn sqlite_admin() {
    assert_roundtrip("ATTACH 'x.db' AS x; DETACH DATABASE x");
    assert_roundtrip("VACUUM");
    assert_roundtrip("VACUUM aux");
    assert_roundtrip("REINDEX");
    assert_roundtrip("PRAGMA user_version");
    assert_roundtrip("PRAGMA main.user_version = 7");
    assert_roundtrip("PRAGMA wal_checkpoint(TRUNCATE)");
    assert_roundtrip("CREATE VIRTUAL TABLE IF NOT EXISTS ft USING fts5(body)");
    assert_roundtrip("ANALYZE");
    assert_roundtrip("ANALYZE t");
    assert_roundtrip("EXPLAIN SELECT 1");
    assert_roundtrip("EXPLAIN QUERY PLAN SELECT * FROM t");
}

#[test]
fn role_statements() {
    for sql in [
        "CREATE ROLE my_role WITH LOGIN",
        "CREATE ROLE r LOGIN CREATEDB NOSUPERUSER",
        "CREATE USER u WITH ENCRYPTED PASSWORD 'pw' VALID UNTIL '2031-01-01'",
        "CREATE GROUP g WITH SYSID 10 IN ROLE base",
        "CREATE ROLE r CONNECTION LIMIT 5 ADMIN a, b ROLE c",
        "CREATE ROLE r PASSWORD NULL",
        "ALTER ROLE r WITH NOLOGIN CONNECTION LIMIT 0",
        "ALTER USER u RENAME TO v",
        "ALTER ROLE ALL IN DATABASE db WITH NOCREATEDB",
        "DROP ROLE r",
        "DROP USER IF EXISTS u1, u2",
        "SET ROLE manager",
        "SET LOCAL ROLE 'manager'",
        "SET SESSION ROLE NONE",
        "RESET ROLE",
    ] {
        assert_roundtrip_in(sql, Dialect::Postgresql);
    }
}
