//! SELECT statements, their clauses, joins, and window frames.

use serde::Serialize;

use crate::expr::{Expr, TableRef};
use crate::{Alias, Aliased, Ident, Keyword, ListExpr, Node, ParenExpr};

/// A SELECT statement as an ordered sequence of clauses.
///
/// Clause order is whatever the source had; the parser enforces grammatical
/// order, the tree just records it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStmt {
    pub clauses: Vec<Node<SelectPart>>,
}

/// One clause of a SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectPart {
    With(WithClause),
    Select(SelectClause),
    From(FromClause),
    Where(WhereClause),
    GroupBy(GroupByClause),
    Having(HavingClause),
    Window(WindowClause),
    OrderBy(OrderByClause),
    Limit(LimitClause),
}

/// `left UNION|EXCEPT|INTERSECT [ALL|DISTINCT] right`, folded left-deep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundSelectStmt {
    pub left: Box<Node<SubSelect>>,
    pub operator_kw: Vec<Node<Keyword>>,
    pub right: Box<Node<SubSelect>>,
}

/// A select usable as a sub-query: plain, compound, or parenthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SubSelect {
    Select(SelectStmt),
    Compound(Box<CompoundSelectStmt>),
    Paren(Box<ParenExpr<SubSelect>>),
}

/// `WITH [RECURSIVE] cte [, cte …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithClause {
    pub with_kw: Node<Keyword>,
    pub recursive_kw: Option<Node<Keyword>>,
    pub tables: ListExpr<CommonTableExpression>,
}

/// `name [(columns)] AS [NOT MATERIALIZED] (select)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonTableExpression {
    pub table: Node<Ident>,
    pub columns: Option<Node<ParenExpr<ListExpr<Ident>>>>,
    pub as_kw: Node<Keyword>,
    pub option_kw: Vec<Node<Keyword>>,
    pub expr: Node<Expr>,
}

/// `SELECT [options] columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectClause {
    pub select_kw: Node<Keyword>,
    /// `ALL`/`DISTINCT` everywhere; `DISTINCTROW`, `STRAIGHT_JOIN` and the
    /// `SQL_*` modifiers under MySQL only.
    pub options: Vec<Node<Keyword>>,
    pub columns: ListExpr<Aliased<Expr>>,
}

/// `FROM table-expression`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromClause {
    pub from_kw: Node<Keyword>,
    pub expr: Node<TableExpr>,
}

/// Anything that can stand in table position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableExpr {
    Table(TableRef),
    Func(TableFuncCall),
    /// SQLite `tbl INDEXED BY idx`.
    Indexed(Box<IndexedTableRef>),
    /// SQLite `tbl NOT INDEXED`.
    NotIndexed(Box<NotIndexedTableRef>),
    Join(Box<JoinExpr>),
    Subquery(Box<ParenExpr<SubSelect>>),
    Paren(Box<ParenExpr<TableExpr>>),
    Aliased(Box<Alias<TableExpr>>),
}

/// A table-valued function call in FROM position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableFuncCall {
    pub name: Node<Ident>,
    pub args: Node<ParenExpr<ListExpr<Expr>>>,
}

/// One join step; chains fold left-deep like binary operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinExpr {
    pub left: Node<TableExpr>,
    pub operator: JoinOperator,
    pub right: Node<TableExpr>,
    pub specification: Option<Node<JoinSpec>>,
}

/// The join operator: a bare comma or a keyword sequence
/// (`NATURAL LEFT OUTER JOIN`, `CROSS JOIN`, MySQL `STRAIGHT_JOIN`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinOperator {
    Comma,
    Kw(Vec<Node<Keyword>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinSpec {
    On(JoinOnSpecification),
    Using(JoinUsingSpecification),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinOnSpecification {
    pub on_kw: Node<Keyword>,
    pub expr: Node<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinUsingSpecification {
    pub using_kw: Node<Keyword>,
    pub columns: Node<ParenExpr<ListExpr<Ident>>>,
}

/// SQLite `tbl INDEXED BY index_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedTableRef {
    pub table: Node<TableExpr>,
    pub indexed_by_kw: Vec<Node<Keyword>>,
    pub index: Node<Ident>,
}

/// SQLite `tbl NOT INDEXED`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotIndexedTableRef {
    pub table: Node<TableExpr>,
    pub not_indexed_kw: Vec<Node<Keyword>>,
}

/// `WHERE expr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhereClause {
    pub where_kw: Node<Keyword>,
    pub expr: Node<Expr>,
}

/// `GROUP BY columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupByClause {
    pub group_by_kw: Vec<Node<Keyword>>,
    pub columns: ListExpr<Expr>,
}

/// `HAVING expr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HavingClause {
    pub having_kw: Node<Keyword>,
    pub expr: Node<Expr>,
}

/// `WINDOW name AS (…) [, …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowClause {
    pub window_kw: Node<Keyword>,
    pub windows: ListExpr<NamedWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedWindow {
    pub name: Node<Ident>,
    pub as_kw: Node<Keyword>,
    pub window: Node<ParenExpr<WindowDefinition>>,
}

/// The body of an OVER clause or a named window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDefinition {
    pub base_window: Option<Node<Ident>>,
    pub partition_by: Option<Node<PartitionByClause>>,
    pub order_by: Option<Node<OrderByClause>>,
    pub frame: Option<Node<FrameClause>>,
}

/// `ORDER BY spec [, …] [WITH ROLLUP]` (rollup under MySQL).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByClause {
    pub order_by_kw: Vec<Node<Keyword>>,
    pub specifications: ListExpr<SortSpecification>,
    pub with_rollup_kw: Vec<Node<Keyword>>,
}

/// `PARTITION BY expr [, …]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionByClause {
    pub partition_by_kw: Vec<Node<Keyword>>,
    pub specifications: ListExpr<Expr>,
}

/// `expr [ASC|DESC] [NULLS FIRST|LAST]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortSpecification {
    pub expr: Node<Expr>,
    pub order_kw: Option<Node<Keyword>>,
    pub nulls_kw: Vec<Node<Keyword>>,
}

/// `LIMIT count`, `LIMIT count OFFSET offset`, or `LIMIT offset, count`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitClause {
    pub limit_kw: Node<Keyword>,
    pub count: Box<Node<Expr>>,
    pub offset_kw: Option<Node<Keyword>>,
    pub offset: Option<Box<Node<Expr>>>,
}

/// `RETURNING columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturningClause {
    pub returning_kw: Node<Keyword>,
    pub columns: ListExpr<Aliased<Expr>>,
}

// ---------------------------------------------------------------------------
// Window frames
// ---------------------------------------------------------------------------

/// `ROWS|RANGE|GROUPS extent [exclusion]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameClause {
    pub unit_kw: Node<Keyword>,
    pub extent: Node<FrameExtent>,
    pub exclusion: Option<Node<FrameExclusion>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameExtent {
    Between(FrameBetween),
    Bound(FrameBound),
}

/// `BETWEEN bound AND bound`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameBetween {
    pub between_kw: Node<Keyword>,
    pub begin: Box<Node<FrameBound>>,
    pub and_kw: Node<Keyword>,
    pub end: Box<Node<FrameBound>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameBound {
    CurrentRow(FrameBoundCurrentRow),
    Preceding(FrameBoundPreceding),
    Following(FrameBoundFollowing),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameBoundCurrentRow {
    pub current_row_kw: Vec<Node<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameBoundPreceding {
    pub limit: Node<FrameLimit>,
    pub preceding_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameBoundFollowing {
    pub limit: Node<FrameLimit>,
    pub following_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameLimit {
    Unbounded(FrameUnbounded),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameUnbounded {
    pub unbounded_kw: Node<Keyword>,
}

/// `EXCLUDE CURRENT ROW | EXCLUDE NO OTHERS | EXCLUDE GROUP | EXCLUDE TIES`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameExclusion {
    pub exclude_kw: Node<Keyword>,
    pub kind_kw: Vec<Node<Keyword>>,
}
