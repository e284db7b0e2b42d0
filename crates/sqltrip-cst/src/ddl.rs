//! DDL statements: tables, constraints, views, indexes, triggers.

use serde::Serialize;

use crate::expr::{Expr, TableRef};
use crate::select::{SortSpecification, SubSelect, WhereClause};
use crate::stmt::Program;
use crate::{Ident, Keyword, ListExpr, Node, ParenExpr, StringLiteral};

// ---------------------------------------------------------------------------
// CREATE TABLE
// ---------------------------------------------------------------------------

/// `CREATE [TEMPORARY] TABLE [IF NOT EXISTS] name (entries)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTableStmt {
    pub create_kw: Node<Keyword>,
    pub temporary_kw: Option<Node<Keyword>>,
    pub table_kw: Node<Keyword>,
    pub if_not_exists_kw: Vec<Node<Keyword>>,
    pub table: Node<TableRef>,
    pub columns: Option<Node<ParenExpr<ListExpr<TableEntry>>>>,
}

/// One entry of a CREATE TABLE body: a column or a table constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableEntry {
    Column(ColumnDefinition),
    Constraint(TableConstraint),
}

/// `name [type] [constraints…]`.
///
/// SQLite admits columns without a declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: Node<Ident>,
    pub data_type: Option<Node<DataType>>,
    pub constraints: Vec<Node<ColumnConstraint>>,
}

/// A type name as written: one or more keywords plus optional parameters
/// (`VARCHAR(255)`, `DOUBLE PRECISION`, `DECIMAL(10, 2)`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataType {
    pub name_kw: Vec<Node<Keyword>>,
    pub params: Option<Node<ParenExpr<ListExpr<Expr>>>>,
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

pub type ColumnConstraint = Constraint<ColumnConstraintKind>;
pub type TableConstraint = Constraint<TableConstraintKind>;

/// A constraint with its optional `CONSTRAINT name` prefix and
/// deferrability suffix, generic over column/table constraint kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint<T> {
    pub name: Option<Node<ConstraintName>>,
    pub kind: Node<T>,
    pub deferrable: Option<Node<ConstraintDeferrable>>,
}

/// `CONSTRAINT [name]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintName {
    pub constraint_kw: Node<Keyword>,
    pub name: Option<Node<Ident>>,
}

/// `[NOT] DEFERRABLE [INITIALLY DEFERRED|IMMEDIATE]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintDeferrable {
    pub deferrable_kw: Vec<Node<Keyword>>,
    pub initially_kw: Vec<Node<Keyword>>,
}

/// Constraint kinds legal on a column definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnConstraintKind {
    Null(ConstraintNull),
    NotNull(ConstraintNotNull),
    AutoIncrement(ConstraintAutoIncrement),
    Default(ConstraintDefault),
    /// MySQL `COMMENT '…'`.
    Comment(ConstraintComment),
    PrimaryKey(ConstraintPrimaryKey),
    References(Node<ReferencesSpecification>),
    Unique(ConstraintUnique),
    Check(ConstraintCheck),
    Generated(ConstraintGenerated),
    Collate(ConstraintCollate),
    /// MySQL `VISIBLE`.
    Visible(ConstraintVisible),
    /// MySQL `INVISIBLE`.
    Invisible(ConstraintInvisible),
}

/// Constraint kinds legal at table level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableConstraintKind {
    PrimaryKey(ConstraintPrimaryKey),
    ForeignKey(ConstraintForeignKey),
    Unique(ConstraintUnique),
    Check(ConstraintCheck),
    /// MySQL `[FULLTEXT|SPATIAL] INDEX|KEY (…)`.
    Index(ConstraintIndex),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintNull {
    pub null_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintNotNull {
    pub not_null_kw: Vec<Node<Keyword>>,
    pub on_conflict: Option<Node<OnConflictClause>>,
}

/// SQLite `AUTOINCREMENT` / MySQL `AUTO_INCREMENT`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintAutoIncrement {
    pub auto_increment_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintDefault {
    pub default_kw: Node<Keyword>,
    pub expr: Node<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintComment {
    pub comment_kw: Node<Keyword>,
    pub value: Node<StringLiteral>,
}

/// `PRIMARY KEY [(columns)] [ON CONFLICT …]`; columns absent at column level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintPrimaryKey {
    pub primary_key_kw: Vec<Node<Keyword>>,
    pub columns: Option<Node<ParenExpr<ListExpr<SortSpecification>>>>,
    pub on_conflict: Option<Node<OnConflictClause>>,
}

/// `FOREIGN KEY (columns) REFERENCES …`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintForeignKey {
    pub foreign_key_kw: Vec<Node<Keyword>>,
    pub columns: Node<ParenExpr<ListExpr<Ident>>>,
    pub references: Node<ReferencesSpecification>,
}

/// `REFERENCES table [(columns)] [ON DELETE …] [MATCH …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferencesSpecification {
    pub references_kw: Node<Keyword>,
    pub table: Node<TableRef>,
    pub columns: Option<Node<ParenExpr<ListExpr<Ident>>>>,
    pub options: Vec<Node<RefOption>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RefOption {
    Action(ReferentialAction),
    Match(ReferentialMatch),
}

/// `ON DELETE|UPDATE CASCADE|SET NULL|SET DEFAULT|RESTRICT|NO ACTION`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferentialAction {
    pub on_kw: Node<Keyword>,
    pub event_kw: Node<Keyword>,
    pub action_kw: Vec<Node<Keyword>>,
}

/// `MATCH FULL|PARTIAL|SIMPLE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferentialMatch {
    pub match_kw: Node<Keyword>,
    pub type_kw: Node<Keyword>,
}

/// `UNIQUE [KEY|INDEX] [(columns)] [ON CONFLICT …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintUnique {
    pub unique_kw: Vec<Node<Keyword>>,
    pub columns: Option<Node<ParenExpr<ListExpr<SortSpecification>>>>,
    pub on_conflict: Option<Node<OnConflictClause>>,
}

/// `CHECK (expr) [ON CONFLICT …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintCheck {
    pub check_kw: Node<Keyword>,
    pub expr: Node<ParenExpr<Expr>>,
    pub on_conflict: Option<Node<OnConflictClause>>,
}

/// MySQL `[FULLTEXT|SPATIAL] INDEX|KEY (columns)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintIndex {
    pub index_type_kw: Option<Node<Keyword>>,
    pub index_kw: Node<Keyword>,
    pub columns: Node<ParenExpr<ListExpr<SortSpecification>>>,
}

/// `[GENERATED ALWAYS] AS (expr) [STORED|VIRTUAL]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintGenerated {
    pub generated_kw: Vec<Node<Keyword>>,
    pub as_kw: Node<Keyword>,
    pub expr: Node<ParenExpr<Expr>>,
    pub storage_kw: Option<Node<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintCollate {
    pub collate_kw: Node<Keyword>,
    pub collation: Node<Ident>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintVisible {
    pub visible_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintInvisible {
    pub invisible_kw: Node<Keyword>,
}

/// SQLite `ON CONFLICT ROLLBACK|ABORT|FAIL|IGNORE|REPLACE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnConflictClause {
    pub on_conflict_kw: Vec<Node<Keyword>>,
    pub resolution_kw: Node<Keyword>,
}

// ---------------------------------------------------------------------------
// ALTER TABLE
// ---------------------------------------------------------------------------

/// `ALTER TABLE name action [, action …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterTableStmt {
    pub alter_table_kw: Vec<Node<Keyword>>,
    pub table: Node<TableRef>,
    pub actions: ListExpr<AlterAction>,
}

/// The alter-action union; dialect-specific actions are extra variants here,
/// not subclasses, so the printer's exhaustiveness covers them all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlterAction {
    RenameTable(AlterActionRenameTable),
    RenameColumn(AlterActionRenameColumn),
    AddColumn(AlterActionAddColumn),
    DropColumn(AlterActionDropColumn),
    AlterColumn(AlterActionAlterColumn),
    AddConstraint(AlterActionAddConstraint),
    DropConstraint(AlterActionDropConstraint),
    /// PostgreSQL `OWNER TO name`.
    OwnerTo(AlterActionOwnerTo),
}

/// `RENAME [TO|AS] new_name` (`AS` and the bare form under MySQL).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionRenameTable {
    pub rename_kw: Vec<Node<Keyword>>,
    pub new_name: Node<TableRef>,
}

/// `RENAME [COLUMN] old TO new` (bare column rename under SQLite).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionRenameColumn {
    pub rename_kw: Vec<Node<Keyword>>,
    pub old_name: Node<Ident>,
    pub to_kw: Node<Keyword>,
    pub new_name: Node<Ident>,
}

/// `ADD [COLUMN] definition`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionAddColumn {
    pub add_kw: Vec<Node<Keyword>>,
    pub column: Node<ColumnDefinition>,
}

/// `DROP [COLUMN] name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionDropColumn {
    pub drop_kw: Vec<Node<Keyword>>,
    pub column: Node<Ident>,
}

/// `ALTER [COLUMN] name action`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionAlterColumn {
    pub alter_kw: Vec<Node<Keyword>>,
    pub column: Node<Ident>,
    pub action: Node<AlterColumnAction>,
}

/// Per-column alter actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlterColumnAction {
    SetDefault(AlterActionSetDefault),
    DropDefault(AlterActionDropDefault),
    SetNotNull(AlterActionSetNotNull),
    DropNotNull(AlterActionDropNotNull),
    SetDataType(AlterActionSetDataType),
    /// MySQL `SET VISIBLE`.
    SetVisible(AlterActionSetVisible),
    /// MySQL `SET INVISIBLE`.
    SetInvisible(AlterActionSetInvisible),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionSetDefault {
    pub set_default_kw: Vec<Node<Keyword>>,
    pub expr: Node<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionDropDefault {
    pub drop_default_kw: Vec<Node<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionSetNotNull {
    pub set_not_null_kw: Vec<Node<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionDropNotNull {
    pub drop_not_null_kw: Vec<Node<Keyword>>,
}

/// `SET DATA TYPE type` or PostgreSQL's short `TYPE type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionSetDataType {
    pub set_data_type_kw: Vec<Node<Keyword>>,
    pub data_type: Node<DataType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionSetVisible {
    pub set_visible_kw: Vec<Node<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionSetInvisible {
    pub set_invisible_kw: Vec<Node<Keyword>>,
}

/// `ADD constraint`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionAddConstraint {
    pub add_kw: Node<Keyword>,
    pub constraint: Node<TableConstraint>,
}

/// `DROP CONSTRAINT [IF EXISTS] name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionDropConstraint {
    pub drop_constraint_kw: Vec<Node<Keyword>>,
    pub if_exists_kw: Vec<Node<Keyword>>,
    pub constraint: Node<Ident>,
}

/// PostgreSQL `OWNER TO owner`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterActionOwnerTo {
    pub owner_to_kw: Vec<Node<Keyword>>,
    pub owner: Node<Ident>,
}

// ---------------------------------------------------------------------------
// DROP TABLE
// ---------------------------------------------------------------------------

/// `DROP [TEMPORARY] TABLE [IF EXISTS] tables [CASCADE|RESTRICT]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropTableStmt {
    pub drop_kw: Node<Keyword>,
    pub temporary_kw: Option<Node<Keyword>>,
    pub table_kw: Node<Keyword>,
    pub if_exists_kw: Vec<Node<Keyword>>,
    pub tables: ListExpr<TableRef>,
    pub behavior_kw: Option<Node<Keyword>>,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// `CREATE [TEMPORARY] VIEW [IF NOT EXISTS] name [(columns)] AS select`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateViewStmt {
    pub create_kw: Node<Keyword>,
    pub temporary_kw: Option<Node<Keyword>>,
    pub view_kw: Node<Keyword>,
    pub if_not_exists_kw: Vec<Node<Keyword>>,
    pub name: Node<TableRef>,
    pub columns: Option<Node<ParenExpr<ListExpr<Ident>>>>,
    pub as_kw: Node<Keyword>,
    pub expr: Node<SubSelect>,
}

/// `DROP VIEW [IF EXISTS] views [CASCADE|RESTRICT]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropViewStmt {
    pub drop_view_kw: Vec<Node<Keyword>>,
    pub if_exists_kw: Vec<Node<Keyword>>,
    pub views: ListExpr<TableRef>,
    pub behavior_kw: Option<Node<Keyword>>,
}

// ---------------------------------------------------------------------------
// Indexes
// ---------------------------------------------------------------------------

/// `CREATE [UNIQUE|FULLTEXT|SPATIAL] INDEX [IF NOT EXISTS] name
///  ON table (columns) [WHERE …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIndexStmt {
    pub create_kw: Node<Keyword>,
    pub index_type_kw: Option<Node<Keyword>>,
    pub index_kw: Node<Keyword>,
    pub if_not_exists_kw: Vec<Node<Keyword>>,
    pub name: Node<TableRef>,
    pub on_kw: Node<Keyword>,
    pub table: Node<TableRef>,
    pub columns: Node<ParenExpr<ListExpr<SortSpecification>>>,
    pub where_clause: Option<Node<WhereClause>>,
}

/// `DROP INDEX [IF EXISTS] indexes [ON table]` (`ON` under MySQL).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropIndexStmt {
    pub drop_index_kw: Vec<Node<Keyword>>,
    pub if_exists_kw: Vec<Node<Keyword>>,
    pub indexes: ListExpr<TableRef>,
    pub on_kw: Option<Node<Keyword>>,
    pub table: Option<Node<TableRef>>,
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// `CREATE [TEMPORARY] TRIGGER [IF NOT EXISTS] name event ON table
///  [FOR EACH ROW] [WHEN …] BEGIN … END`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTriggerStmt {
    pub create_kw: Node<Keyword>,
    pub temporary_kw: Option<Node<Keyword>>,
    pub trigger_kw: Node<Keyword>,
    pub if_not_exists_kw: Vec<Node<Keyword>>,
    pub name: Node<TableRef>,
    pub event: Node<TriggerEvent>,
    pub on_kw: Node<Keyword>,
    pub table: Node<TableRef>,
    pub for_each_row_kw: Vec<Node<Keyword>>,
    pub condition: Option<Node<TriggerCondition>>,
    pub body: Node<TriggerBody>,
}

/// `[BEFORE|AFTER|INSTEAD OF] INSERT|DELETE|UPDATE [OF columns]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerEvent {
    pub time_kw: Vec<Node<Keyword>>,
    pub event_kw: Node<Keyword>,
    pub of_kw: Option<Node<Keyword>>,
    pub columns: Option<ListExpr<Ident>>,
}

/// `WHEN expr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerCondition {
    pub when_kw: Node<Keyword>,
    pub expr: Node<Expr>,
}

/// `BEGIN statements END`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerBody {
    pub begin_kw: Node<Keyword>,
    pub program: Node<Program>,
    pub end_kw: Node<Keyword>,
}

/// `DROP TRIGGER [IF EXISTS] name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropTriggerStmt {
    pub drop_trigger_kw: Vec<Node<Keyword>>,
    pub if_exists_kw: Vec<Node<Keyword>>,
    pub trigger: Node<TableRef>,
}
