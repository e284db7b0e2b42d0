//! The statement union, the program root, DML, transactions, and the
//! dialect-specific statement families.

use serde::Serialize;

use crate::ddl::{
    AlterTableStmt, CreateIndexStmt, CreateTableStmt, CreateTriggerStmt, CreateViewStmt,
    DropIndexStmt, DropTableStmt, DropTriggerStmt, DropViewStmt,
};
use crate::expr::{Expr, FuncCall, TableRef};
use crate::select::{
    CompoundSelectStmt, ReturningClause, SelectStmt, SortSpecification, SubSelect, WhereClause,
    WithClause,
};
use crate::{
    Aliased, Ident, Keyword, ListExpr, Node, NullLiteral, NumberLiteral, ParenExpr, StringLiteral,
};

/// The root of a parse: statements in source order.
///
/// Statements render joined by `;`. A trailing empty statement absorbs the
/// trivia after the final separator, so files that end in a semicolon or a
/// comment round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Node<Statement>>,
}

/// The statement union — one variant per statement shape the grammar can
/// produce, dialect-specific shapes included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// Nothing between two separators (or before end of input).
    Empty,

    // DML
    Select(SelectStmt),
    CompoundSelect(CompoundSelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),

    // DDL
    CreateTable(CreateTableStmt),
    AlterTable(AlterTableStmt),
    DropTable(DropTableStmt),
    CreateView(CreateViewStmt),
    DropView(DropViewStmt),
    CreateIndex(CreateIndexStmt),
    DropIndex(DropIndexStmt),
    CreateTrigger(CreateTriggerStmt),
    DropTrigger(DropTriggerStmt),
    CreateVirtualTable(CreateVirtualTableStmt),

    // Meta
    Analyze(AnalyzeStmt),
    Explain(ExplainStmt),

    // Transactions
    StartTransaction(StartTransactionStmt),
    CommitTransaction(CommitTransactionStmt),
    RollbackTransaction(RollbackTransactionStmt),
    Savepoint(SavepointStmt),
    ReleaseSavepoint(ReleaseSavepointStmt),

    // SQLite database administration
    Attach(AttachDatabaseStmt),
    Detach(DetachDatabaseStmt),
    Vacuum(VacuumStmt),
    Reindex(ReindexStmt),
    Pragma(PragmaStmt),

    // PostgreSQL roles
    CreateRole(CreateRoleStmt),
    AlterRole(AlterRoleStmt),
    DropRole(DropRoleStmt),
    SetRole(SetRoleStmt),
    ResetRole(ResetRoleStmt),
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

/// `INSERT|REPLACE [options] [INTO] table [(columns)] source
///  [ON CONFLICT …] [RETURNING …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStmt {
    pub with: Option<Node<WithClause>>,
    pub insert_kw: Node<Keyword>,
    pub options: Vec<Node<InsertOption>>,
    pub into_kw: Option<Node<Keyword>>,
    pub table: Node<TableRef>,
    pub columns: Option<Node<ParenExpr<ListExpr<Ident>>>>,
    pub source: Node<InsertSource>,
    pub upsert: Option<Node<UpsertClause>>,
    pub returning: Option<Node<ReturningClause>>,
}

/// An insert modifier: SQLite `OR ABORT|FAIL|IGNORE|REPLACE|ROLLBACK`,
/// MySQL `LOW_PRIORITY|DELAYED|HIGH_PRIORITY|IGNORE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertOption {
    pub kw: Vec<Node<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    Values(ValuesClause),
    Select(SubSelect),
    Default(DefaultValues),
}

/// `VALUES (row) [, (row) …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuesClause {
    pub values_kw: Node<Keyword>,
    pub rows: ListExpr<ParenExpr<ListExpr<ValueItem>>>,
}

/// A value position that also admits the `DEFAULT` keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueItem {
    Expr(Expr),
    Default(DefaultExpr),
}

/// The bare `DEFAULT` keyword in value position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultExpr {
    pub default_kw: Node<Keyword>,
}

/// `DEFAULT VALUES`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultValues {
    pub default_values_kw: Vec<Node<Keyword>>,
}

/// SQLite `ON CONFLICT [(target) [WHERE …]] DO NOTHING|UPDATE SET …`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertClause {
    pub on_conflict_kw: Vec<Node<Keyword>>,
    pub target: Option<Node<ParenExpr<ListExpr<SortSpecification>>>>,
    pub target_where: Option<Node<WhereClause>>,
    pub do_kw: Node<Keyword>,
    pub action: Node<UpsertAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UpsertAction {
    Nothing(UpsertDoNothing),
    Update(UpsertDoUpdate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertDoNothing {
    pub nothing_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertDoUpdate {
    pub update_kw: Node<Keyword>,
    pub set_kw: Node<Keyword>,
    pub assignments: ListExpr<ColumnAssignment>,
    pub where_clause: Option<Node<WhereClause>>,
}

// ---------------------------------------------------------------------------
// UPDATE / DELETE
// ---------------------------------------------------------------------------

/// `UPDATE tables SET assignments [WHERE …] [RETURNING …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStmt {
    pub with: Option<Node<WithClause>>,
    pub update_kw: Node<Keyword>,
    pub tables: ListExpr<TableRef>,
    pub set_kw: Node<Keyword>,
    pub assignments: ListExpr<ColumnAssignment>,
    pub where_clause: Option<Node<WhereClause>>,
    pub returning: Option<Node<ReturningClause>>,
}

/// `column = value`; the `=` belongs to this node, its surrounding trivia to
/// the column's trailing and the value's leading runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAssignment {
    pub column: Node<Expr>,
    pub value: Node<ValueItem>,
}

/// `DELETE FROM table [WHERE …] [RETURNING …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStmt {
    pub with: Option<Node<WithClause>>,
    pub delete_kw: Node<Keyword>,
    pub from_kw: Node<Keyword>,
    pub table: Node<Aliased<TableRef>>,
    pub where_clause: Option<Node<WhereClause>>,
    pub returning: Option<Node<ReturningClause>>,
}

// ---------------------------------------------------------------------------
// Meta statements
// ---------------------------------------------------------------------------

/// `ANALYZE [TABLE] [tables]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeStmt {
    pub analyze_kw: Node<Keyword>,
    pub table_kw: Option<Node<Keyword>>,
    pub tables: Option<ListExpr<TableRef>>,
}

/// `EXPLAIN [QUERY PLAN] statement`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainStmt {
    pub explain_kw: Node<Keyword>,
    pub query_plan_kw: Vec<Node<Keyword>>,
    pub statement: Box<Node<Statement>>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// `BEGIN|START [DEFERRED|IMMEDIATE|EXCLUSIVE] [TRANSACTION|WORK]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartTransactionStmt {
    pub start_kw: Node<Keyword>,
    pub behavior_kw: Option<Node<Keyword>>,
    pub transaction_kw: Option<Node<Keyword>>,
}

/// `COMMIT|END [TRANSACTION|WORK]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitTransactionStmt {
    pub commit_kw: Node<Keyword>,
    pub transaction_kw: Option<Node<Keyword>>,
}

/// `ROLLBACK [TRANSACTION] [TO [SAVEPOINT] name]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollbackTransactionStmt {
    pub rollback_kw: Node<Keyword>,
    pub transaction_kw: Option<Node<Keyword>>,
    pub savepoint: Option<Node<RollbackToSavepoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollbackToSavepoint {
    pub to_kw: Node<Keyword>,
    pub savepoint_kw: Option<Node<Keyword>>,
    pub savepoint: Node<Ident>,
}

/// `SAVEPOINT name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavepointStmt {
    pub savepoint_kw: Node<Keyword>,
    pub savepoint: Node<Ident>,
}

/// `RELEASE [SAVEPOINT] name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseSavepointStmt {
    pub release_kw: Node<Keyword>,
    pub savepoint_kw: Option<Node<Keyword>>,
    pub savepoint: Node<Ident>,
}

// ---------------------------------------------------------------------------
// SQLite database administration
// ---------------------------------------------------------------------------

/// `ATTACH [DATABASE] file AS schema`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachDatabaseStmt {
    pub attach_kw: Node<Keyword>,
    pub database_kw: Option<Node<Keyword>>,
    pub file: Node<Expr>,
    pub as_kw: Node<Keyword>,
    pub schema: Node<Ident>,
}

/// `DETACH [DATABASE] schema`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetachDatabaseStmt {
    pub detach_kw: Node<Keyword>,
    pub database_kw: Option<Node<Keyword>>,
    pub schema: Node<Ident>,
}

/// `VACUUM [schema] [INTO file]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacuumStmt {
    pub vacuum_kw: Node<Keyword>,
    pub schema: Option<Node<Ident>>,
    pub into_kw: Option<Node<Keyword>>,
    pub file: Option<Node<StringLiteral>>,
}

/// `REINDEX [name]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReindexStmt {
    pub reindex_kw: Node<Keyword>,
    pub table: Option<Node<TableRef>>,
}

/// `PRAGMA name`, `PRAGMA name = value`, `PRAGMA name(value)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PragmaStmt {
    pub pragma_kw: Node<Keyword>,
    pub pragma: Node<PragmaValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PragmaValue {
    Ref(TableRef),
    Assignment(PragmaAssignment),
    Func(PragmaFuncCall),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PragmaAssignment {
    pub name: Node<TableRef>,
    pub value: Node<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PragmaFuncCall {
    pub name: Node<TableRef>,
    pub args: Node<ParenExpr<Expr>>,
}

/// `CREATE VIRTUAL TABLE [IF NOT EXISTS] name USING module[(args)]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVirtualTableStmt {
    pub create_virtual_table_kw: Vec<Node<Keyword>>,
    pub if_not_exists_kw: Vec<Node<Keyword>>,
    pub table: Node<TableRef>,
    pub using_kw: Node<Keyword>,
    pub module: Node<FuncCall>,
}

// ---------------------------------------------------------------------------
// PostgreSQL roles
// ---------------------------------------------------------------------------

/// `CREATE ROLE|USER|GROUP name [WITH] [options…]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRoleStmt {
    pub create_role_kw: Vec<Node<Keyword>>,
    pub name: Node<Ident>,
    pub with_kw: Option<Node<Keyword>>,
    pub options: Vec<Node<RoleOption>>,
}

/// One role option; options are space-separated, not comma-separated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RoleOption {
    Keyword(RoleOptionKeyword),
    ConnectionLimit(RoleOptionConnectionLimit),
    Password(RoleOptionPassword),
    ValidUntil(RoleOptionValidUntil),
    InRole(RoleOptionInRole),
    Role(RoleOptionRole),
    Admin(RoleOptionAdmin),
    SysId(RoleOptionSysId),
}

/// A single-keyword option: `LOGIN`, `NOSUPERUSER`, `CREATEDB`, ….
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionKeyword {
    pub kw: Node<Keyword>,
}

/// `CONNECTION LIMIT n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionConnectionLimit {
    pub connection_limit_kw: Vec<Node<Keyword>>,
    pub limit: Node<NumberLiteral>,
}

/// `[ENCRYPTED] PASSWORD '…'` or `PASSWORD NULL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionPassword {
    pub encrypted_kw: Option<Node<Keyword>>,
    pub password_kw: Node<Keyword>,
    pub password: Node<PasswordValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PasswordValue {
    String(StringLiteral),
    Null(NullLiteral),
}

/// `VALID UNTIL '…'`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionValidUntil {
    pub valid_until_kw: Vec<Node<Keyword>>,
    pub timestamp: Node<StringLiteral>,
}

/// `IN ROLE names`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionInRole {
    pub in_role_kw: Vec<Node<Keyword>>,
    pub names: ListExpr<Ident>,
}

/// `ROLE names`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionRole {
    pub role_kw: Node<Keyword>,
    pub names: ListExpr<Ident>,
}

/// `ADMIN names`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionAdmin {
    pub admin_kw: Node<Keyword>,
    pub names: ListExpr<Ident>,
}

/// `SYSID n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOptionSysId {
    pub sysid_kw: Node<Keyword>,
    pub id: Node<NumberLiteral>,
}

/// `ALTER ROLE|USER|GROUP name [IN DATABASE db] action`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterRoleStmt {
    pub alter_role_kw: Vec<Node<Keyword>>,
    pub name: Node<RoleName>,
    pub database: Option<Node<InDatabaseClause>>,
    pub action: Node<AlterRoleAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RoleName {
    Ident(Ident),
    /// `ALTER ROLE ALL …`.
    All(Keyword),
}

/// `IN DATABASE name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InDatabaseClause {
    pub in_database_kw: Vec<Node<Keyword>>,
    pub name: Node<Ident>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlterRoleAction {
    /// `[WITH] option…`.
    Options(AlterRoleOptions),
    /// `RENAME TO new_name`.
    Rename(AlterRoleRename),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterRoleOptions {
    pub with_kw: Option<Node<Keyword>>,
    pub options: Vec<Node<RoleOption>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterRoleRename {
    pub rename_to_kw: Vec<Node<Keyword>>,
    pub new_name: Node<Ident>,
}

/// `DROP ROLE|USER|GROUP [IF EXISTS] names`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropRoleStmt {
    pub drop_role_kw: Vec<Node<Keyword>>,
    pub if_exists_kw: Vec<Node<Keyword>>,
    pub names: ListExpr<Ident>,
}

/// `SET [SESSION|LOCAL] ROLE name|'name'|NONE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetRoleStmt {
    pub set_kw: Node<Keyword>,
    pub scope_kw: Option<Node<Keyword>>,
    pub role_kw: Node<Keyword>,
    pub name: Node<SetRoleTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SetRoleTarget {
    Ident(Ident),
    String(StringLiteral),
    None(Keyword),
}

/// `RESET ROLE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetRoleStmt {
    pub reset_role_kw: Vec<Node<Keyword>>,
}
