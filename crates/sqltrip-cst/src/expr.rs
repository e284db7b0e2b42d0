//! Expression nodes.

use serde::Serialize;

use crate::ddl::DataType;
use crate::select::{SubSelect, WindowDefinition};
use crate::{
    AllColumns, BlobLiteral, BoolLiteral, Ident, Keyword, ListExpr, Node, NullLiteral,
    NumberLiteral, Param, ParenExpr, StringLiteral,
};

/// The expression union.
///
/// Every concrete shape an expression position can hold, dialect-specific
/// shapes included. The printer's exhaustive `match` over this enum is what
/// guarantees no expression kind can silently drop text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Ident(Ident),
    Column(ColumnRef),
    String(StringLiteral),
    Number(NumberLiteral),
    Bool(BoolLiteral),
    Null(NullLiteral),
    Blob(BlobLiteral),
    Datetime(DatetimeLiteral),
    /// MySQL `_utf8'…'`.
    CharsetString(StringWithCharset),
    Param(Param),
    AllColumns(AllColumns),
    List(ListExpr<Expr>),
    Paren(Box<ParenExpr<Expr>>),
    /// A parenthesized subquery in expression position.
    Subquery(Box<ParenExpr<SubSelect>>),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    /// SQLite `expr ISNULL` / `expr NOTNULL` / `expr NOT NULL`.
    Postfix(PostfixExpr),
    Between(BetweenExpr),
    Case(CaseExpr),
    Collate(CollateExpr),
    Cast(CastExpr),
    Func(FuncCall),
    /// MySQL `INTERVAL expr unit`.
    Interval(IntervalExpr),
}

/// A binary operator application.
///
/// Chains are folded left-deep by the parser according to the precedence
/// table; the whitespace seen before the operator belongs to the left
/// operand's trailing trivia, not to this node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub left: Box<Node<Expr>>,
    pub op: Operator,
    pub right: Box<Node<Expr>>,
}

/// A prefix operator application (`-x`, `NOT x`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub op: Operator,
    pub expr: Box<Node<Expr>>,
}

/// An operator spelling: punctuation stored verbatim, or one or more
/// keywords each carrying their own trivia (`IS NOT`, `NOT IN`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Operator {
    Punct(String),
    Kw(Vec<Node<Keyword>>),
}

/// A postfix keyword operator (SQLite `x ISNULL`, `x NOT NULL`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostfixExpr {
    pub expr: Box<Node<Expr>>,
    pub op_kw: Vec<Node<Keyword>>,
}

/// `left [NOT] BETWEEN begin AND end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetweenExpr {
    pub left: Box<Node<Expr>>,
    pub between_kw: Vec<Node<Keyword>>,
    pub begin: Box<Node<Expr>>,
    pub and_kw: Node<Keyword>,
    pub end: Box<Node<Expr>>,
}

/// `CASE [subject] WHEN … THEN … [ELSE …] END`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseExpr {
    pub case_kw: Node<Keyword>,
    pub subject: Option<Box<Node<Expr>>>,
    pub clauses: Vec<Node<CaseClause>>,
    pub end_kw: Node<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CaseClause {
    When(CaseWhen),
    Else(CaseElse),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseWhen {
    pub when_kw: Node<Keyword>,
    pub condition: Node<Expr>,
    pub then_kw: Node<Keyword>,
    pub result: Node<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseElse {
    pub else_kw: Node<Keyword>,
    pub result: Node<Expr>,
}

/// `expr COLLATE collation` — postfix, chainable in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollateExpr {
    pub expr: Box<Node<Expr>>,
    pub collate_kw: Node<Keyword>,
    pub collation: Node<Ident>,
}

/// `CAST(expr AS type)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastExpr {
    pub cast_kw: Node<Keyword>,
    pub args: Node<ParenExpr<CastArg>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastArg {
    pub expr: Node<Expr>,
    pub as_kw: Node<Keyword>,
    pub data_type: Node<DataType>,
}

/// A function call, with optional arguments and window (`OVER`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncCall {
    pub name: Node<Ident>,
    pub args: Option<Node<ParenExpr<ListExpr<FuncArg>>>>,
    pub over: Option<Node<OverArg>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FuncArg {
    Expr(Expr),
    Distinct(DistinctArg),
}

/// `DISTINCT value` inside a function argument list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctArg {
    pub distinct_kw: Node<Keyword>,
    pub value: Box<Node<Expr>>,
}

/// `OVER (window-definition)` or `OVER window_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverArg {
    pub over_kw: Node<Keyword>,
    pub window: OverWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OverWindow {
    Definition(Box<Node<ParenExpr<WindowDefinition>>>),
    Named(Node<Ident>),
}

/// MySQL `INTERVAL expr DAY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalExpr {
    pub interval_kw: Node<Keyword>,
    pub expr: Box<Node<Expr>>,
    pub unit_kw: Node<Keyword>,
}

/// `TIME '…'`, `DATE '…'`, `TIMESTAMP '…'`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatetimeLiteral {
    pub kw: Node<Keyword>,
    pub value: Node<StringLiteral>,
}

/// MySQL charset-introduced string: `_utf8'text'`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringWithCharset {
    /// The charset name without the leading underscore.
    pub charset: String,
    pub value: Node<StringLiteral>,
}

/// A possibly table-qualified column position: `col`, `tbl.col`, `tbl.*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRef {
    pub table: Option<Node<Ident>>,
    pub column: Node<ColumnTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnTarget {
    Ident(Ident),
    AllColumns(AllColumns),
}

/// A possibly schema-qualified table name: `users`, `main.users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRef {
    pub schema: Option<Node<Ident>>,
    pub name: Node<Ident>,
}
