//! Rendering the tree back to SQL text.
//!
//! [`Render`] is a pure structural fold: every node kind appends, in source
//! order, its leading trivia, its own content (children plus the punctuation
//! the node itself owns), and its trailing trivia. It never consults parse
//! options, which makes it the round-trip correctness anchor regardless of
//! how a tree was produced.
//!
//! Every union type renders through an exhaustive `match` with no wildcard
//! arm; adding a node shape without a rendering rule is a compile error, not
//! a silently dropped piece of text.

use crate::ddl::*;
use crate::expr::*;
use crate::select::*;
use crate::stmt::*;
use crate::{
    Alias, AliasName, Aliased, AllColumns, BlobLiteral, BoolLiteral, Ident, Keyword, ListExpr,
    Node, NullLiteral, NumberLiteral, Param, ParenExpr, StringLiteral,
};

/// A node that can reconstruct its source text.
///
/// This trait is also the tree-walking extension point: any analysis pass
/// can be written as its own exhaustive fold over the same public unions.
pub trait Render {
    /// Append this node's text to `out`.
    fn render_into(&self, out: &mut String);
}

/// Render a node to a fresh string.
#[must_use]
pub fn render<R: Render + ?Sized>(node: &R) -> String {
    let mut out = String::new();
    node.render_into(&mut out);
    out
}

/// Render a sequence, inserting `join` between consecutive elements.
///
/// Statements in a program join with `";"`, list items with `","`, clause
/// sequences with `""`.
#[must_use]
pub fn render_all<R: Render>(nodes: &[R], join: &str) -> String {
    let mut out = String::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str(join);
        }
        node.render_into(&mut out);
    }
    out
}

// ---------------------------------------------------------------------------
// Generic carriers
// ---------------------------------------------------------------------------

impl<T: Render> Render for Node<T> {
    fn render_into(&self, out: &mut String) {
        for ws in &self.leading {
            out.push_str(ws.text());
        }
        self.inner.render_into(out);
        for ws in &self.trailing {
            out.push_str(ws.text());
        }
    }
}

impl<T: Render> Render for Option<T> {
    fn render_into(&self, out: &mut String) {
        if let Some(node) = self {
            node.render_into(out);
        }
    }
}

impl<T: Render> Render for Vec<T> {
    fn render_into(&self, out: &mut String) {
        for node in self {
            node.render_into(out);
        }
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render_into(&self, out: &mut String) {
        (**self).render_into(out);
    }
}

impl Render for str {
    fn render_into(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl<T: Render> Render for ListExpr<T> {
    fn render_into(&self, out: &mut String) {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            item.render_into(out);
        }
        if self.trailing_comma {
            out.push(',');
        }
    }
}

impl<T: Render> Render for ParenExpr<T> {
    fn render_into(&self, out: &mut String) {
        out.push('(');
        self.expr.render_into(out);
        out.push(')');
    }
}

impl<T: Render> Render for Alias<T> {
    fn render_into(&self, out: &mut String) {
        self.expr.render_into(out);
        self.as_kw.render_into(out);
        self.name.render_into(out);
    }
}

impl<T: Render> Render for Aliased<T> {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Bare(inner) => inner.render_into(out),
            Self::Alias(alias) => alias.render_into(out),
        }
    }
}

impl<T: Render> Render for Constraint<T> {
    fn render_into(&self, out: &mut String) {
        self.name.render_into(out);
        self.kind.render_into(out);
        self.deferrable.render_into(out);
    }
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

/// Leaf nodes render their stored source text unchanged.
macro_rules! render_text {
    ($($ty:ty),+ $(,)?) => {$(
        impl Render for $ty {
            fn render_into(&self, out: &mut String) {
                out.push_str(&self.text);
            }
        }
    )+};
}

render_text!(
    Keyword,
    Ident,
    StringLiteral,
    NumberLiteral,
    BoolLiteral,
    NullLiteral,
    BlobLiteral,
    Param,
);

impl Render for AllColumns {
    fn render_into(&self, out: &mut String) {
        out.push('*');
    }
}

// ---------------------------------------------------------------------------
// Structs whose content is the concatenation of their fields
// ---------------------------------------------------------------------------

macro_rules! render_fields {
    ($($ty:ty { $($field:ident),+ $(,)? })+) => {$(
        impl Render for $ty {
            fn render_into(&self, out: &mut String) {
                $( self.$field.render_into(out); )+
            }
        }
    )+};
}

render_fields! {
    // Expressions
    BinaryExpr { left, op, right }
    UnaryExpr { op, expr }
    PostfixExpr { expr, op_kw }
    BetweenExpr { left, between_kw, begin, and_kw, end }
    CaseExpr { case_kw, subject, clauses, end_kw }
    CaseWhen { when_kw, condition, then_kw, result }
    CaseElse { else_kw, result }
    CollateExpr { expr, collate_kw, collation }
    CastExpr { cast_kw, args }
    CastArg { expr, as_kw, data_type }
    FuncCall { name, args, over }
    DistinctArg { distinct_kw, value }
    OverArg { over_kw, window }
    IntervalExpr { interval_kw, expr, unit_kw }
    DatetimeLiteral { kw, value }

    // Select
    SelectStmt { clauses }
    CompoundSelectStmt { left, operator_kw, right }
    WithClause { with_kw, recursive_kw, tables }
    CommonTableExpression { table, columns, as_kw, option_kw, expr }
    SelectClause { select_kw, options, columns }
    FromClause { from_kw, expr }
    TableFuncCall { name, args }
    JoinExpr { left, operator, right, specification }
    JoinOnSpecification { on_kw, expr }
    JoinUsingSpecification { using_kw, columns }
    IndexedTableRef { table, indexed_by_kw, index }
    NotIndexedTableRef { table, not_indexed_kw }
    WhereClause { where_kw, expr }
    GroupByClause { group_by_kw, columns }
    HavingClause { having_kw, expr }
    WindowClause { window_kw, windows }
    NamedWindow { name, as_kw, window }
    WindowDefinition { base_window, partition_by, order_by, frame }
    OrderByClause { order_by_kw, specifications, with_rollup_kw }
    PartitionByClause { partition_by_kw, specifications }
    SortSpecification { expr, order_kw, nulls_kw }
    ReturningClause { returning_kw, columns }

    // Window frames
    FrameClause { unit_kw, extent, exclusion }
    FrameBetween { between_kw, begin, and_kw, end }
    FrameBoundCurrentRow { current_row_kw }
    FrameBoundPreceding { limit, preceding_kw }
    FrameBoundFollowing { limit, following_kw }
    FrameUnbounded { unbounded_kw }
    FrameExclusion { exclude_kw, kind_kw }

    // CREATE TABLE & constraints
    CreateTableStmt { create_kw, temporary_kw, table_kw, if_not_exists_kw, table, columns }
    ColumnDefinition { name, data_type, constraints }
    DataType { name_kw, params }
    ConstraintName { constraint_kw, name }
    ConstraintDeferrable { deferrable_kw, initially_kw }
    ConstraintNull { null_kw }
    ConstraintNotNull { not_null_kw, on_conflict }
    ConstraintAutoIncrement { auto_increment_kw }
    ConstraintDefault { default_kw, expr }
    ConstraintComment { comment_kw, value }
    ConstraintPrimaryKey { primary_key_kw, columns, on_conflict }
    ConstraintForeignKey { foreign_key_kw, columns, references }
    ReferencesSpecification { references_kw, table, columns, options }
    ReferentialAction { on_kw, event_kw, action_kw }
    ReferentialMatch { match_kw, type_kw }
    ConstraintUnique { unique_kw, columns, on_conflict }
    ConstraintCheck { check_kw, expr, on_conflict }
    ConstraintIndex { index_type_kw, index_kw, columns }
    ConstraintGenerated { generated_kw, as_kw, expr, storage_kw }
    ConstraintCollate { collate_kw, collation }
    ConstraintVisible { visible_kw }
    ConstraintInvisible { invisible_kw }
    OnConflictClause { on_conflict_kw, resolution_kw }

    // ALTER TABLE
    AlterTableStmt { alter_table_kw, table, actions }
    AlterActionRenameTable { rename_kw, new_name }
    AlterActionRenameColumn { rename_kw, old_name, to_kw, new_name }
    AlterActionAddColumn { add_kw, column }
    AlterActionDropColumn { drop_kw, column }
    AlterActionAlterColumn { alter_kw, column, action }
    AlterActionSetDefault { set_default_kw, expr }
    AlterActionDropDefault { drop_default_kw }
    AlterActionSetNotNull { set_not_null_kw }
    AlterActionDropNotNull { drop_not_null_kw }
    AlterActionSetDataType { set_data_type_kw, data_type }
    AlterActionSetVisible { set_visible_kw }
    AlterActionSetInvisible { set_invisible_kw }
    AlterActionAddConstraint { add_kw, constraint }
    AlterActionDropConstraint { drop_constraint_kw, if_exists_kw, constraint }
    AlterActionOwnerTo { owner_to_kw, owner }

    // Other DDL
    DropTableStmt { drop_kw, temporary_kw, table_kw, if_exists_kw, tables, behavior_kw }
    CreateViewStmt { create_kw, temporary_kw, view_kw, if_not_exists_kw, name, columns, as_kw, expr }
    DropViewStmt { drop_view_kw, if_exists_kw, views, behavior_kw }
    CreateIndexStmt { create_kw, index_type_kw, index_kw, if_not_exists_kw, name, on_kw, table, columns, where_clause }
    DropIndexStmt { drop_index_kw, if_exists_kw, indexes, on_kw, table }
    CreateTriggerStmt { create_kw, temporary_kw, trigger_kw, if_not_exists_kw, name, event, on_kw, table, for_each_row_kw, condition, body }
    TriggerEvent { time_kw, event_kw, of_kw, columns }
    TriggerCondition { when_kw, expr }
    TriggerBody { begin_kw, program, end_kw }
    DropTriggerStmt { drop_trigger_kw, if_exists_kw, trigger }

    // DML
    InsertStmt { with, insert_kw, options, into_kw, table, columns, source, upsert, returning }
    InsertOption { kw }
    ValuesClause { values_kw, rows }
    DefaultExpr { default_kw }
    DefaultValues { default_values_kw }
    UpsertClause { on_conflict_kw, target, target_where, do_kw, action }
    UpsertDoNothing { nothing_kw }
    UpsertDoUpdate { update_kw, set_kw, assignments, where_clause }
    UpdateStmt { with, update_kw, tables, set_kw, assignments, where_clause, returning }
    DeleteStmt { with, delete_kw, from_kw, table, where_clause, returning }

    // Meta
    AnalyzeStmt { analyze_kw, table_kw, tables }
    ExplainStmt { explain_kw, query_plan_kw, statement }

    // Transactions
    StartTransactionStmt { start_kw, behavior_kw, transaction_kw }
    CommitTransactionStmt { commit_kw, transaction_kw }
    RollbackTransactionStmt { rollback_kw, transaction_kw, savepoint }
    RollbackToSavepoint { to_kw, savepoint_kw, savepoint }
    SavepointStmt { savepoint_kw, savepoint }
    ReleaseSavepointStmt { release_kw, savepoint_kw, savepoint }

    // SQLite administration
    AttachDatabaseStmt { attach_kw, database_kw, file, as_kw, schema }
    DetachDatabaseStmt { detach_kw, database_kw, schema }
    VacuumStmt { vacuum_kw, schema, into_kw, file }
    ReindexStmt { reindex_kw, table }
    PragmaStmt { pragma_kw, pragma }
    PragmaFuncCall { name, args }
    CreateVirtualTableStmt { create_virtual_table_kw, if_not_exists_kw, table, using_kw, module }

    // Roles
    CreateRoleStmt { create_role_kw, name, with_kw, options }
    RoleOptionKeyword { kw }
    RoleOptionConnectionLimit { connection_limit_kw, limit }
    RoleOptionPassword { encrypted_kw, password_kw, password }
    RoleOptionValidUntil { valid_until_kw, timestamp }
    RoleOptionInRole { in_role_kw, names }
    RoleOptionRole { role_kw, names }
    RoleOptionAdmin { admin_kw, names }
    RoleOptionSysId { sysid_kw, id }
    AlterRoleStmt { alter_role_kw, name, database, action }
    InDatabaseClause { in_database_kw, name }
    AlterRoleOptions { with_kw, options }
    AlterRoleRename { rename_to_kw, new_name }
    DropRoleStmt { drop_role_kw, if_exists_kw, names }
    SetRoleStmt { set_kw, scope_kw, role_kw, name }
    ResetRoleStmt { reset_role_kw }
}

// ---------------------------------------------------------------------------
// Structs that own punctuation of their own
// ---------------------------------------------------------------------------

impl Render for Program {
    fn render_into(&self, out: &mut String) {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            stmt.render_into(out);
        }
    }
}

impl Render for ColumnRef {
    fn render_into(&self, out: &mut String) {
        if let Some(table) = &self.table {
            table.render_into(out);
            out.push('.');
        }
        self.column.render_into(out);
    }
}

impl Render for TableRef {
    fn render_into(&self, out: &mut String) {
        if let Some(schema) = &self.schema {
            schema.render_into(out);
            out.push('.');
        }
        self.name.render_into(out);
    }
}

impl Render for ColumnAssignment {
    fn render_into(&self, out: &mut String) {
        self.column.render_into(out);
        out.push('=');
        self.value.render_into(out);
    }
}

impl Render for PragmaAssignment {
    fn render_into(&self, out: &mut String) {
        self.name.render_into(out);
        out.push('=');
        self.value.render_into(out);
    }
}

impl Render for StringWithCharset {
    fn render_into(&self, out: &mut String) {
        out.push('_');
        out.push_str(&self.charset);
        self.value.render_into(out);
    }
}

impl Render for LimitClause {
    fn render_into(&self, out: &mut String) {
        self.limit_kw.render_into(out);
        if self.offset_kw.is_some() {
            // LIMIT count OFFSET offset
            self.count.render_into(out);
            self.offset_kw.render_into(out);
            self.offset.render_into(out);
        } else if self.offset.is_some() {
            // LIMIT offset, count
            self.offset.render_into(out);
            out.push(',');
            self.count.render_into(out);
        } else {
            self.count.render_into(out);
        }
    }
}

impl Render for Operator {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Punct(text) => out.push_str(text),
            Self::Kw(kws) => kws.render_into(out),
        }
    }
}

impl Render for JoinOperator {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Comma => out.push(','),
            Self::Kw(kws) => kws.render_into(out),
        }
    }
}

// ---------------------------------------------------------------------------
// Unions — exhaustive by construction
// ---------------------------------------------------------------------------

/// Every variant delegates to its payload; the `match` has no wildcard arm,
/// so a new variant without a rule fails to compile.
macro_rules! render_union {
    ($($ty:ty { $($variant:ident),+ $(,)? })+) => {$(
        impl Render for $ty {
            fn render_into(&self, out: &mut String) {
                match self {
                    $( Self::$variant(inner) => inner.render_into(out), )+
                }
            }
        }
    )+};
}

render_union! {
    AliasName { Ident, String }
    ColumnTarget { Ident, AllColumns }
    CaseClause { When, Else }
    FuncArg { Expr, Distinct }
    OverWindow { Definition, Named }
    SelectPart { With, Select, From, Where, GroupBy, Having, Window, OrderBy, Limit }
    SubSelect { Select, Compound, Paren }
    TableExpr { Table, Func, Indexed, NotIndexed, Join, Subquery, Paren, Aliased }
    JoinSpec { On, Using }
    FrameExtent { Between, Bound }
    FrameBound { CurrentRow, Preceding, Following }
    FrameLimit { Unbounded, Expr }
    TableEntry { Column, Constraint }
    ColumnConstraintKind {
        Null, NotNull, AutoIncrement, Default, Comment, PrimaryKey, References,
        Unique, Check, Generated, Collate, Visible, Invisible,
    }
    TableConstraintKind { PrimaryKey, ForeignKey, Unique, Check, Index }
    RefOption { Action, Match }
    AlterAction {
        RenameTable, RenameColumn, AddColumn, DropColumn, AlterColumn,
        AddConstraint, DropConstraint, OwnerTo,
    }
    AlterColumnAction {
        SetDefault, DropDefault, SetNotNull, DropNotNull, SetDataType,
        SetVisible, SetInvisible,
    }
    InsertSource { Values, Select, Default }
    ValueItem { Expr, Default }
    UpsertAction { Nothing, Update }
    PragmaValue { Ref, Assignment, Func }
    RoleOption {
        Keyword, ConnectionLimit, Password, ValidUntil, InRole, Role, Admin, SysId,
    }
    PasswordValue { String, Null }
    RoleName { Ident, All }
    SetRoleTarget { Ident, String, None }
    AlterRoleAction { Options, Rename }
}

impl Render for Expr {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Ident(n) => n.render_into(out),
            Self::Column(n) => n.render_into(out),
            Self::String(n) => n.render_into(out),
            Self::Number(n) => n.render_into(out),
            Self::Bool(n) => n.render_into(out),
            Self::Null(n) => n.render_into(out),
            Self::Blob(n) => n.render_into(out),
            Self::Datetime(n) => n.render_into(out),
            Self::CharsetString(n) => n.render_into(out),
            Self::Param(n) => n.render_into(out),
            Self::AllColumns(n) => n.render_into(out),
            Self::List(n) => n.render_into(out),
            Self::Paren(n) => n.render_into(out),
            Self::Subquery(n) => n.render_into(out),
            Self::Binary(n) => n.render_into(out),
            Self::Unary(n) => n.render_into(out),
            Self::Postfix(n) => n.render_into(out),
            Self::Between(n) => n.render_into(out),
            Self::Case(n) => n.render_into(out),
            Self::Collate(n) => n.render_into(out),
            Self::Cast(n) => n.render_into(out),
            Self::Func(n) => n.render_into(out),
            Self::Interval(n) => n.render_into(out),
        }
    }
}

impl Render for Statement {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Select(n) => n.render_into(out),
            Self::CompoundSelect(n) => n.render_into(out),
            Self::Insert(n) => n.render_into(out),
            Self::Update(n) => n.render_into(out),
            Self::Delete(n) => n.render_into(out),
            Self::CreateTable(n) => n.render_into(out),
            Self::AlterTable(n) => n.render_into(out),
            Self::DropTable(n) => n.render_into(out),
            Self::CreateView(n) => n.render_into(out),
            Self::DropView(n) => n.render_into(out),
            Self::CreateIndex(n) => n.render_into(out),
            Self::DropIndex(n) => n.render_into(out),
            Self::CreateTrigger(n) => n.render_into(out),
            Self::DropTrigger(n) => n.render_into(out),
            Self::CreateVirtualTable(n) => n.render_into(out),
            Self::Analyze(n) => n.render_into(out),
            Self::Explain(n) => n.render_into(out),
            Self::StartTransaction(n) => n.render_into(out),
            Self::CommitTransaction(n) => n.render_into(out),
            Self::RollbackTransaction(n) => n.render_into(out),
            Self::Savepoint(n) => n.render_into(out),
            Self::ReleaseSavepoint(n) => n.render_into(out),
            Self::Attach(n) => n.render_into(out),
            Self::Detach(n) => n.render_into(out),
            Self::Vacuum(n) => n.render_into(out),
            Self::Reindex(n) => n.render_into(out),
            Self::Pragma(n) => n.render_into(out),
            Self::CreateRole(n) => n.render_into(out),
            Self::AlterRole(n) => n.render_into(out),
            Self::DropRole(n) => n.render_into(out),
            Self::SetRole(n) => n.render_into(out),
            Self::ResetRole(n) => n.render_into(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::Whitespace;

    fn kw(text: &str) -> Node<Keyword> {
        Node::new(Keyword::new(text))
    }

    fn spaced_kw(text: &str) -> Node<Keyword> {
        kw(text).with_leading(vec![Whitespace::Space(" ".to_owned())])
    }

    fn num(text: &str) -> Node<Expr> {
        Node::new(Expr::Number(NumberLiteral {
            text: text.to_owned(),
        }))
    }

    #[test]
    fn node_renders_leading_content_trailing() {
        let n = num("42")
            .with_leading(vec![Whitespace::BlockComment("/*a*/".to_owned())])
            .with_trailing(vec![Whitespace::Space(" ".to_owned())]);
        assert_eq!(render(&n), "/*a*/42 ");
    }

    #[test]
    fn list_renders_commas_between_items() {
        let list = ListExpr::new(vec![
            num("1"),
            num("2").with_leading(vec![Whitespace::Space(" ".to_owned())]),
        ]);
        assert_eq!(render(&list), "1, 2");
    }

    #[test]
    fn trailing_comma_is_preserved() {
        let mut list = ListExpr::new(vec![num("1")]);
        list.trailing_comma = true;
        assert_eq!(render(&list), "1,");
    }

    #[test]
    fn paren_expr_owns_its_parens() {
        let paren = ParenExpr::new(num("7"));
        assert_eq!(render(&paren), "(7)");
    }

    #[test]
    fn limit_comma_form_renders_offset_first() {
        let limit = LimitClause {
            limit_kw: kw("LIMIT"),
            count: Box::new(num("10").with_leading(vec![Whitespace::Space(" ".to_owned())])),
            offset_kw: None,
            offset: Some(Box::new(
                num("5").with_leading(vec![Whitespace::Space(" ".to_owned())]),
            )),
        };
        assert_eq!(render(&limit), "LIMIT 5, 10");
    }

    #[test]
    fn program_joins_statements_with_semicolon() {
        let select = |n: &str| {
            Node::new(Statement::Select(SelectStmt {
                clauses: vec![Node::new(SelectPart::Select(SelectClause {
                    select_kw: kw("SELECT"),
                    options: Vec::new(),
                    columns: ListExpr::new(vec![Node::new(Aliased::Bare(Expr::Number(
                        NumberLiteral {
                            text: n.to_owned(),
                        },
                    )))
                    .with_leading(vec![Whitespace::Space(" ".to_owned())])]),
                }))],
            }))
        };
        let program = Program {
            statements: vec![
                select("1"),
                select("2").with_leading(vec![Whitespace::Space(" ".to_owned())]),
            ],
        };
        assert_eq!(render(&program), "SELECT 1; SELECT 2");
    }

    #[test]
    fn empty_statement_renders_nothing_but_carries_trivia() {
        let program = Program {
            statements: vec![Node::new(Statement::Empty)
                .with_leading(vec![Whitespace::LineComment("-- done".to_owned())])],
        };
        assert_eq!(render(&program), "-- done");
    }

    #[test]
    fn keyword_sequence_keeps_spacing_per_keyword() {
        let group_by = vec![kw("GROUP"), spaced_kw("BY")];
        assert_eq!(render(&group_by), "GROUP BY");
    }
}
