//! Hand-written recursive descent parser. Expression parsing lives in
//! expr.rs.
//!
//! Every grammar rule builds CST nodes that keep the exact source text, and
//! routes each token's captured trivia to the node it belongs to: a token
//! that becomes a leaf keeps its trivia as that leaf's leading run, while
//! punctuation owned by a parent (commas, closing parens, semicolons, dots)
//! donates its trivia to the preceding sibling's trailing run.
//!
//! Dialect-specific productions are admitted by consulting the options
//! *before* any token is consumed, so a construct illegal in the active
//! dialect fails with the expectations of the shared rule, never with a
//! half-consumed alternative. Failures are recorded at the furthest position
//! any alternative reached, with the expectation sets merged.

use std::collections::BTreeSet;

use tracing::trace;

use sqltrip_cst::*;
use sqltrip_error::{Error, SyntaxError};

use crate::keywords::{is_reserved, Kw};
use crate::lexer::Lexer;
use crate::options::{Dialect, ParseOptions};
use crate::token::{Token, TokenKind};

/// Marker for a failed alternative; the position and expectation set live on
/// the [`Parser`] so that deeper failures win and same-depth ones merge.
pub(crate) struct Fail;

pub(crate) type PResult<T> = Result<T, Fail>;

/// The parser over a trivia-carrying token stream.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    opts: ParseOptions,
    furthest: usize,
    expected: BTreeSet<String>,
}

impl Parser {
    /// Tokenize `source` and prepare to parse it.
    ///
    /// Fails eagerly with a configuration error before consuming any text.
    pub fn new(source: &str, options: ParseOptions) -> Result<Self, Error> {
        options.validate()?;
        let tokens = Lexer::tokenize_with_options(source, &options);
        Ok(Self {
            tokens,
            pos: 0,
            opts: options,
            furthest: 0,
            expected: BTreeSet::new(),
        })
    }

    /// Parse the whole input as a sequence of statements.
    pub fn parse_program(mut self) -> Result<Node<Program>, Error> {
        trace!(dialect = %self.opts.dialect, tokens = self.tokens.len(), "parsing program");
        match self.program(false) {
            Ok(program) => Ok(program),
            Err(Fail) => Err(Error::Syntax(self.syntax_error())),
        }
    }

    /// Parse the whole input as a single expression.
    pub fn parse_expression(mut self) -> Result<Node<Expr>, Error> {
        let result = (|| {
            let mut expr = self.expr_node()?;
            if !self.at_eof() {
                return self.expected("end of input");
            }
            let trivia = std::mem::take(&mut self.tokens[self.pos].leading);
            expr.trailing.extend(trivia);
            Ok(expr)
        })();
        match result {
            Ok(expr) => Ok(expr),
            Err(Fail) => Err(Error::Syntax(self.syntax_error())),
        }
    }

    // -----------------------------------------------------------------------
    // Failure bookkeeping
    // -----------------------------------------------------------------------

    pub(crate) fn note_expected(&mut self, what: impl Into<String>) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest {
            self.expected.insert(what.into());
        }
    }

    pub(crate) fn expected<T>(&mut self, what: impl Into<String>) -> PResult<T> {
        self.note_expected(what);
        Err(Fail)
    }

    /// Record several expectations at the token after the current one; used
    /// by dispatchers that look one keyword ahead.
    fn expected_at_next<T>(&mut self, descs: &[&str]) -> PResult<T> {
        self.pos += 1;
        for desc in descs {
            self.note_expected(*desc);
        }
        self.pos -= 1;
        Err(Fail)
    }

    fn syntax_error(&self) -> SyntaxError {
        let idx = self.furthest.min(self.tokens.len().saturating_sub(1));
        let tok = &self.tokens[idx];
        SyntaxError {
            offset: tok.span.start as usize,
            line: tok.line,
            column: tok.col,
            expected: self.expected.clone(),
            found: if tok.kind == TokenKind::Eof {
                None
            } else {
                Some(tok.text.clone())
            },
        }
    }

    // -----------------------------------------------------------------------
    // Token navigation
    // -----------------------------------------------------------------------

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn current_kw(&self) -> Option<Kw> {
        match self.peek_kind() {
            TokenKind::Keyword(k) => Some(*k),
            _ => None,
        }
    }

    pub(crate) fn nth_kw(&self, n: usize) -> Option<Kw> {
        match self.peek_nth(n) {
            TokenKind::Keyword(k) => Some(*k),
            _ => None,
        }
    }

    pub(crate) fn at_kw(&self, kw: Kw) -> bool {
        self.current_kw() == Some(kw)
    }

    pub(crate) fn at_any_kw(&self, set: &[Kw]) -> bool {
        self.current_kw().is_some_and(|k| set.contains(&k))
    }

    pub(crate) fn current_text(&self) -> &str {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].text
    }

    pub(crate) fn nth_leading_is_empty(&self, n: usize) -> bool {
        self.tokens
            .get(self.pos + n)
            .is_none_or(|t| t.leading.is_empty())
    }

    fn dialect(&self) -> Dialect {
        self.opts.dialect
    }

    pub(crate) fn is_sqlite(&self) -> bool {
        self.opts.is_dialect(Dialect::Sqlite)
    }

    pub(crate) fn is_mysql(&self) -> bool {
        self.opts.is_dialect(Dialect::Mysql)
    }

    pub(crate) fn is_postgres(&self) -> bool {
        self.opts.is_dialect(Dialect::Postgresql)
    }

    pub(crate) fn options(&self) -> &ParseOptions {
        &self.opts
    }

    // -----------------------------------------------------------------------
    // Node builders
    // -----------------------------------------------------------------------

    pub(crate) fn ranged<T>(&self, node: Node<T>, span: Span) -> Node<T> {
        if self.opts.include_ranges {
            node.with_range(span)
        } else {
            node
        }
    }

    /// Assign the span covering tokens `[start, current)` when ranges are on.
    pub(crate) fn finish<T>(&self, start: usize, node: Node<T>) -> Node<T> {
        if self.opts.include_ranges && self.pos > start {
            let span = self.tokens[start]
                .span
                .merge(self.tokens[self.pos - 1].span);
            node.with_range(span)
        } else {
            node
        }
    }

    /// Consume the current token (which must be a keyword in `admissible`)
    /// into a keyword node carrying the token's trivia and exact casing.
    pub(crate) fn kw_node(&mut self, admissible: &[Kw]) -> Node<Keyword> {
        let tok = self.advance();
        debug_assert!(
            matches!(tok.kind, TokenKind::Keyword(k) if admissible.contains(&k)),
            "token {tok:?} is not an admissible keyword"
        );
        let names: Vec<&str> = admissible.iter().map(|k| k.name()).collect();
        let node = Node::new(Keyword::one_of(tok.text, &names)).with_leading(tok.leading);
        self.ranged(node, tok.span)
    }

    pub(crate) fn expect_kw(&mut self, kw: Kw) -> PResult<Node<Keyword>> {
        if self.at_kw(kw) {
            Ok(self.kw_node(&[kw]))
        } else {
            self.expected(kw.name())
        }
    }

    pub(crate) fn eat_kw(&mut self, kw: Kw) -> Option<Node<Keyword>> {
        if self.at_kw(kw) {
            Some(self.kw_node(&[kw]))
        } else {
            None
        }
    }

    pub(crate) fn eat_kw_of(&mut self, set: &[Kw]) -> Option<Node<Keyword>> {
        if self.at_any_kw(set) {
            Some(self.kw_node(set))
        } else {
            None
        }
    }

    pub(crate) fn expect_kw_of(&mut self, set: &[Kw], desc: &str) -> PResult<Node<Keyword>> {
        if self.at_any_kw(set) {
            Ok(self.kw_node(set))
        } else {
            self.expected(desc)
        }
    }

    /// An identifier: a plain or quoted identifier token, or a keyword that
    /// is not reserved under the active dialect.
    pub(crate) fn ident_node(&mut self, desc: &str) -> PResult<Node<Ident>> {
        let ok = match self.peek_kind() {
            TokenKind::Ident | TokenKind::QuotedIdent => true,
            TokenKind::Keyword(k) => !is_reserved(*k, self.dialect()),
            _ => false,
        };
        if !ok {
            return self.expected(desc);
        }
        let tok = self.advance();
        let node = Node::new(Ident { text: tok.text }).with_leading(tok.leading);
        Ok(self.ranged(node, tok.span))
    }

    /// Any identifier-like token, keywords included regardless of
    /// reservation (pragma values, collation names).
    pub(crate) fn any_word_node(&mut self, desc: &str) -> PResult<Node<Ident>> {
        match self.peek_kind() {
            TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::Keyword(_) => {
                let tok = self.advance();
                let node = Node::new(Ident { text: tok.text }).with_leading(tok.leading);
                Ok(self.ranged(node, tok.span))
            }
            _ => self.expected(desc),
        }
    }

    fn at_ident(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Ident | TokenKind::QuotedIdent => true,
            TokenKind::Keyword(k) => !is_reserved(*k, self.dialect()),
            _ => false,
        }
    }

    pub(crate) fn string_node(&mut self) -> PResult<Node<StringLiteral>> {
        if self.peek_kind() != &TokenKind::String {
            return self.expected("a string");
        }
        let tok = self.advance();
        let node = Node::new(StringLiteral { text: tok.text }).with_leading(tok.leading);
        Ok(self.ranged(node, tok.span))
    }

    fn number_node(&mut self) -> PResult<Node<NumberLiteral>> {
        if self.peek_kind() != &TokenKind::Number {
            return self.expected("a number");
        }
        let tok = self.advance();
        let node = Node::new(NumberLiteral { text: tok.text }).with_leading(tok.leading);
        Ok(self.ranged(node, tok.span))
    }

    /// Consume punctuation the current node owns; its trivia joins the
    /// preceding sibling's trailing run.
    pub(crate) fn eat_owned(&mut self, kind: &TokenKind, trailing: &mut Trivia) -> bool {
        if self.peek_kind() == kind {
            let tok = self.advance();
            trailing.extend(tok.leading);
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_owned(
        &mut self,
        kind: &TokenKind,
        desc: &str,
        trailing: &mut Trivia,
    ) -> PResult<()> {
        if self.eat_owned(kind, trailing) {
            Ok(())
        } else {
            self.expected(desc)
        }
    }

    /// `( inner )` — the open paren's trivia leads the paren node, the close
    /// paren's trivia trails the inner node.
    pub(crate) fn paren<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<Node<T>>,
    ) -> PResult<Node<ParenExpr<T>>> {
        let start = self.pos;
        if self.peek_kind() != &TokenKind::LParen {
            return self.expected("(");
        }
        let open = self.advance();
        let mut inner = f(self)?;
        if self.peek_kind() != &TokenKind::RParen {
            return self.expected(")");
        }
        let close = self.advance();
        inner.trailing.extend(close.leading);
        let node = Node::new(ParenExpr::new(inner)).with_leading(open.leading);
        Ok(self.finish(start, node))
    }

    /// `item (, item)*` — each separator's trivia trails the item before it.
    /// `allow_trailing` admits a separator after the last item.
    pub(crate) fn comma_list<T>(
        &mut self,
        allow_trailing: bool,
        mut item: impl FnMut(&mut Self) -> PResult<Node<T>>,
    ) -> PResult<ListExpr<T>> {
        let mut items = vec![item(self)?];
        let mut trailing_comma = false;
        while self.peek_kind() == &TokenKind::Comma {
            let comma = self.advance();
            if let Some(last) = items.last_mut() {
                last.trailing.extend(comma.leading);
            }
            if allow_trailing
                && matches!(self.peek_kind(), TokenKind::RParen | TokenKind::Eof)
            {
                trailing_comma = true;
                break;
            }
            items.push(item(self)?);
        }
        Ok(ListExpr {
            items,
            trailing_comma,
        })
    }

    /// Wrap a node in an alias when an `AS name` or bare name follows.
    pub(crate) fn maybe_alias<T>(&mut self, node: Node<T>) -> PResult<Node<Aliased<T>>> {
        if let Some(as_kw) = self.eat_kw(Kw::As) {
            let name = self.alias_name()?;
            return Ok(Node::new(Aliased::Alias(Alias {
                expr: Box::new(node),
                as_kw: Some(as_kw),
                name,
            })));
        }
        if self.at_alias_name() {
            let name = self.alias_name()?;
            return Ok(Node::new(Aliased::Alias(Alias {
                expr: Box::new(node),
                as_kw: None,
                name,
            })));
        }
        Ok(node.map(Aliased::Bare))
    }

    fn at_alias_name(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Ident | TokenKind::QuotedIdent => true,
            TokenKind::String => !self.is_postgres(),
            TokenKind::Keyword(k) => !is_reserved(*k, self.dialect()),
            _ => false,
        }
    }

    fn alias_name(&mut self) -> PResult<Node<AliasName>> {
        if self.peek_kind() == &TokenKind::String && !self.is_postgres() {
            let s = self.string_node()?;
            Ok(s.map(AliasName::String))
        } else {
            let id = self.ident_node("an alias")?;
            Ok(id.map(AliasName::Ident))
        }
    }

    /// `name` or `schema.name`.
    pub(crate) fn table_ref_node(&mut self, desc: &str) -> PResult<Node<TableRef>> {
        let start = self.pos;
        let first = self.ident_node(desc)?;
        if self.peek_kind() == &TokenKind::Dot {
            let mut schema = first;
            let dot = self.advance();
            schema.trailing.extend(dot.leading);
            let name = self.ident_node("a name")?;
            Ok(self.finish(
                start,
                Node::new(TableRef {
                    schema: Some(schema),
                    name,
                }),
            ))
        } else {
            Ok(self.finish(
                start,
                Node::new(TableRef {
                    schema: None,
                    name: first,
                }),
            ))
        }
    }

    // -----------------------------------------------------------------------
    // Program and statements
    // -----------------------------------------------------------------------

    fn program_end(&self, in_trigger: bool) -> bool {
        self.at_eof() || (in_trigger && self.at_kw(Kw::End))
    }

    pub(crate) fn program(&mut self, in_trigger: bool) -> PResult<Node<Program>> {
        let start = self.pos;
        let mut statements = Vec::new();
        loop {
            statements.push(self.statement(in_trigger)?);
            if self.peek_kind() == &TokenKind::Semicolon {
                let semi = self.advance();
                if let Some(last) = statements.last_mut() {
                    last.trailing.extend(semi.leading);
                }
                if self.program_end(in_trigger) {
                    statements.push(Node::new(Statement::Empty));
                    break;
                }
            } else {
                break;
            }
        }
        if !in_trigger {
            if self.at_eof() {
                // The input's trailing trivia sits on the Eof token.
                let trivia = std::mem::take(&mut self.tokens[self.pos].leading);
                if let Some(last) = statements.last_mut() {
                    last.trailing.extend(trivia);
                }
            } else {
                return self.expected(";");
            }
        }
        Ok(self.finish(start, Node::new(Program { statements })))
    }

    fn statement(&mut self, in_trigger: bool) -> PResult<Node<Statement>> {
        let start = self.pos;
        let stmt = match self.peek_kind().clone() {
            TokenKind::Semicolon | TokenKind::Eof => Statement::Empty,
            TokenKind::Keyword(Kw::End) if in_trigger => Statement::Empty,
            TokenKind::LParen => self.select_like(None)?,
            TokenKind::Keyword(k) => match k {
                Kw::Select => self.select_like(None)?,
                Kw::With => {
                    let with = self.with_clause()?;
                    self.with_target(with)?
                }
                Kw::Create => self.create_statement()?,
                Kw::Alter => self.alter_statement()?,
                Kw::Drop => self.drop_statement()?,
                Kw::Insert => Statement::Insert(self.insert_stmt(None)?),
                Kw::Replace if !self.is_postgres() => {
                    Statement::Insert(self.insert_stmt(None)?)
                }
                Kw::Update => Statement::Update(self.update_stmt(None)?),
                Kw::Delete => Statement::Delete(self.delete_stmt(None)?),
                Kw::Analyze => Statement::Analyze(self.analyze_stmt()?),
                Kw::Explain => Statement::Explain(self.explain_stmt(in_trigger)?),
                Kw::Begin | Kw::Start => {
                    Statement::StartTransaction(self.start_transaction_stmt()?)
                }
                Kw::Commit | Kw::End => {
                    Statement::CommitTransaction(self.commit_transaction_stmt()?)
                }
                Kw::Rollback => {
                    Statement::RollbackTransaction(self.rollback_transaction_stmt()?)
                }
                Kw::Savepoint => Statement::Savepoint(SavepointStmt {
                    savepoint_kw: self.kw_node(&[Kw::Savepoint]),
                    savepoint: self.ident_node("a savepoint name")?,
                }),
                Kw::Release => Statement::ReleaseSavepoint(ReleaseSavepointStmt {
                    release_kw: self.kw_node(&[Kw::Release]),
                    savepoint_kw: self.eat_kw(Kw::Savepoint),
                    savepoint: self.ident_node("a savepoint name")?,
                }),
                Kw::Attach if self.is_sqlite() => Statement::Attach(self.attach_stmt()?),
                Kw::Detach if self.is_sqlite() => Statement::Detach(DetachDatabaseStmt {
                    detach_kw: self.kw_node(&[Kw::Detach]),
                    database_kw: self.eat_kw(Kw::Database),
                    schema: self.ident_node("a schema name")?,
                }),
                Kw::Vacuum if self.is_sqlite() => Statement::Vacuum(self.vacuum_stmt()?),
                Kw::Reindex if self.is_sqlite() => {
                    let reindex_kw = self.kw_node(&[Kw::Reindex]);
                    let table = if self.at_ident() {
                        Some(self.table_ref_node("a name")?)
                    } else {
                        None
                    };
                    Statement::Reindex(ReindexStmt { reindex_kw, table })
                }
                Kw::Pragma if self.is_sqlite() => Statement::Pragma(self.pragma_stmt()?),
                Kw::Set if self.is_postgres() && self.at_set_role() => {
                    Statement::SetRole(self.set_role_stmt()?)
                }
                Kw::Reset if self.is_postgres() => Statement::ResetRole(ResetRoleStmt {
                    reset_role_kw: vec![
                        self.kw_node(&[Kw::Reset]),
                        self.expect_kw(Kw::Role)?,
                    ],
                }),
                _ => return self.expected("a statement"),
            },
            _ => return self.expected("a statement"),
        };
        Ok(self.finish(start, Node::new(stmt)))
    }

    fn with_target(&mut self, with: Node<WithClause>) -> PResult<Statement> {
        match self.peek_kind().clone() {
            TokenKind::Keyword(Kw::Select) | TokenKind::LParen => self.select_like(Some(with)),
            TokenKind::Keyword(Kw::Insert) => Ok(Statement::Insert(self.insert_stmt(Some(with))?)),
            TokenKind::Keyword(Kw::Replace) if !self.is_postgres() => {
                Ok(Statement::Insert(self.insert_stmt(Some(with))?))
            }
            TokenKind::Keyword(Kw::Update) => Ok(Statement::Update(self.update_stmt(Some(with))?)),
            TokenKind::Keyword(Kw::Delete) => Ok(Statement::Delete(self.delete_stmt(Some(with))?)),
            _ => self.expected("SELECT"),
        }
    }

    // -----------------------------------------------------------------------
    // SELECT
    // -----------------------------------------------------------------------

    fn select_like(&mut self, with: Option<Node<WithClause>>) -> PResult<Statement> {
        let sub = self.sub_select(with)?;
        match sub.inner {
            SubSelect::Select(stmt) => Ok(Statement::Select(stmt)),
            SubSelect::Compound(compound) => Ok(Statement::CompoundSelect(*compound)),
            SubSelect::Paren(_) => self.expected("UNION, EXCEPT or INTERSECT"),
        }
    }

    /// A select usable as a sub-query, folding compound operators left-deep.
    pub(crate) fn sub_select(&mut self, with: Option<Node<WithClause>>) -> PResult<Node<SubSelect>> {
        let start = self.pos;
        let mut left = self.sub_select_operand(with)?;
        while self.at_any_kw(&[Kw::Union, Kw::Except, Kw::Intersect]) {
            let op_tok = self.advance();
            let op_span = op_tok.span;
            left.trailing.extend(op_tok.leading);
            let mut operator_kw = vec![self.ranged(
                Node::new(Keyword::one_of(
                    op_tok.text,
                    &["UNION", "EXCEPT", "INTERSECT"],
                )),
                op_span,
            )];
            if let Some(quantifier) = self.eat_kw_of(&[Kw::All, Kw::Distinct]) {
                operator_kw.push(quantifier);
            }
            let right = self.sub_select_operand(None)?;
            let compound = CompoundSelectStmt {
                left: Box::new(left),
                operator_kw,
                right: Box::new(right),
            };
            left = self.finish(start, Node::new(SubSelect::Compound(Box::new(compound))));
        }
        Ok(left)
    }

    fn sub_select_operand(
        &mut self,
        with: Option<Node<WithClause>>,
    ) -> PResult<Node<SubSelect>> {
        let start = self.pos;
        if self.peek_kind() == &TokenKind::LParen {
            let paren = self.paren(|p| p.sub_select(None))?;
            return Ok(paren.map(|p| SubSelect::Paren(Box::new(p))));
        }
        let with = match with {
            Some(w) => Some(w),
            None if self.at_kw(Kw::With) => Some(self.with_clause()?),
            None => None,
        };
        let stmt = self.select_stmt(with)?;
        Ok(self.finish(start, Node::new(SubSelect::Select(stmt))))
    }

    fn select_stmt(&mut self, with: Option<Node<WithClause>>) -> PResult<SelectStmt> {
        let mut clauses = Vec::new();
        if let Some(w) = with {
            clauses.push(w.map(SelectPart::With));
        }

        let start = self.pos;
        let select_kw = self.expect_kw(Kw::Select)?;
        let options = self.select_options();
        let columns = self.comma_list(false, Self::select_column)?;
        clauses.push(self.finish(
            start,
            Node::new(SelectPart::Select(SelectClause {
                select_kw,
                options,
                columns,
            })),
        ));

        if self.at_kw(Kw::From) {
            let start = self.pos;
            let from_kw = self.kw_node(&[Kw::From]);
            let expr = self.table_expr_node()?;
            clauses.push(self.finish(
                start,
                Node::new(SelectPart::From(FromClause { from_kw, expr })),
            ));
        }
        if self.at_kw(Kw::Where) {
            let clause = self.where_clause()?;
            clauses.push(clause.map(SelectPart::Where));
        }
        if self.at_kw(Kw::Group) {
            let start = self.pos;
            let group_by_kw = vec![self.kw_node(&[Kw::Group]), self.expect_kw(Kw::By)?];
            let columns = self.comma_list(false, Self::expr_node)?;
            clauses.push(self.finish(
                start,
                Node::new(SelectPart::GroupBy(GroupByClause {
                    group_by_kw,
                    columns,
                })),
            ));
        }
        if self.at_kw(Kw::Having) {
            let start = self.pos;
            let having_kw = self.kw_node(&[Kw::Having]);
            let expr = self.expr_node()?;
            clauses.push(self.finish(
                start,
                Node::new(SelectPart::Having(HavingClause { having_kw, expr })),
            ));
        }
        if self.at_kw(Kw::Window) {
            let start = self.pos;
            let window_kw = self.kw_node(&[Kw::Window]);
            let windows = self.comma_list(false, Self::named_window)?;
            clauses.push(self.finish(
                start,
                Node::new(SelectPart::Window(WindowClause { window_kw, windows })),
            ));
        }
        if self.at_kw(Kw::Order) {
            let clause = self.order_by_clause()?;
            clauses.push(clause.map(SelectPart::OrderBy));
        }
        if self.at_kw(Kw::Limit) {
            let clause = self.limit_clause()?;
            clauses.push(clause.map(SelectPart::Limit));
        }

        Ok(SelectStmt { clauses })
    }

    fn select_options(&mut self) -> Vec<Node<Keyword>> {
        const COMMON: &[Kw] = &[Kw::All, Kw::Distinct];
        const MYSQL: &[Kw] = &[
            Kw::All,
            Kw::Distinct,
            Kw::Distinctrow,
            Kw::HighPriority,
            Kw::StraightJoin,
            Kw::SqlCalcFoundRows,
            Kw::SqlCache,
            Kw::SqlNoCache,
            Kw::SqlBigResult,
            Kw::SqlSmallResult,
            Kw::SqlBufferResult,
        ];
        let admissible = if self.is_mysql() { MYSQL } else { COMMON };
        let mut options = Vec::new();
        while let Some(kw) = self.eat_kw_of(admissible) {
            options.push(kw);
        }
        options
    }

    pub(crate) fn select_column(&mut self) -> PResult<Node<Aliased<Expr>>> {
        if self.peek_kind() == &TokenKind::Star {
            let tok = self.advance();
            let span = tok.span;
            let node =
                Node::new(Expr::AllColumns(AllColumns)).with_leading(tok.leading);
            return Ok(self.ranged(node, span).map(Aliased::Bare));
        }
        let expr = self.expr_node()?;
        // `tbl.*` never takes an alias either.
        if matches!(
            &expr.inner,
            Expr::Column(ColumnRef { column, .. })
                if matches!(column.inner, ColumnTarget::AllColumns(_))
        ) {
            return Ok(expr.map(Aliased::Bare));
        }
        self.maybe_alias(expr)
    }

    pub(crate) fn where_clause(&mut self) -> PResult<Node<WhereClause>> {
        let start = self.pos;
        let where_kw = self.expect_kw(Kw::Where)?;
        let expr = self.expr_node()?;
        Ok(self.finish(start, Node::new(WhereClause { where_kw, expr })))
    }

    pub(crate) fn order_by_clause(&mut self) -> PResult<Node<OrderByClause>> {
        let start = self.pos;
        let order_by_kw = vec![self.expect_kw(Kw::Order)?, self.expect_kw(Kw::By)?];
        let specifications = self.comma_list(false, Self::sort_specification)?;
        let with_rollup_kw = if self.is_mysql() && self.at_kw(Kw::With) && self.nth_kw(1) == Some(Kw::Rollup)
        {
            vec![self.kw_node(&[Kw::With]), self.kw_node(&[Kw::Rollup])]
        } else {
            Vec::new()
        };
        Ok(self.finish(
            start,
            Node::new(OrderByClause {
                order_by_kw,
                specifications,
                with_rollup_kw,
            }),
        ))
    }

    pub(crate) fn sort_specification(&mut self) -> PResult<Node<SortSpecification>> {
        let start = self.pos;
        let expr = self.expr_node()?;
        let order_kw = self.eat_kw_of(&[Kw::Asc, Kw::Desc]);
        let nulls_kw = if self.at_kw(Kw::Nulls) {
            vec![
                self.kw_node(&[Kw::Nulls]),
                self.expect_kw_of(&[Kw::First, Kw::Last], "FIRST or LAST")?,
            ]
        } else {
            Vec::new()
        };
        Ok(self.finish(
            start,
            Node::new(SortSpecification {
                expr,
                order_kw,
                nulls_kw,
            }),
        ))
    }

    fn limit_clause(&mut self) -> PResult<Node<LimitClause>> {
        let start = self.pos;
        let limit_kw = self.expect_kw(Kw::Limit)?;
        let mut first = self.expr_node()?;
        let clause = if self.at_kw(Kw::Offset) {
            let offset_kw = self.kw_node(&[Kw::Offset]);
            let offset = self.expr_node()?;
            LimitClause {
                limit_kw,
                count: Box::new(first),
                offset_kw: Some(offset_kw),
                offset: Some(Box::new(offset)),
            }
        } else if self.peek_kind() == &TokenKind::Comma {
            let comma = self.advance();
            first.trailing.extend(comma.leading);
            let count = self.expr_node()?;
            LimitClause {
                limit_kw,
                count: Box::new(count),
                offset_kw: None,
                offset: Some(Box::new(first)),
            }
        } else {
            LimitClause {
                limit_kw,
                count: Box::new(first),
                offset_kw: None,
                offset: None,
            }
        };
        Ok(self.finish(start, Node::new(clause)))
    }

    fn named_window(&mut self) -> PResult<Node<NamedWindow>> {
        let start = self.pos;
        let name = self.ident_node("a window name")?;
        let as_kw = self.expect_kw(Kw::As)?;
        let window = self.paren(Self::window_definition)?;
        Ok(self.finish(start, Node::new(NamedWindow { name, as_kw, window })))
    }

    pub(crate) fn window_definition(&mut self) -> PResult<Node<WindowDefinition>> {
        let start = self.pos;
        let base_window = if matches!(
            self.peek_kind(),
            TokenKind::Ident | TokenKind::QuotedIdent
        ) {
            Some(self.ident_node("a window name")?)
        } else {
            None
        };
        let partition_by = if self.at_kw(Kw::Partition) {
            let start = self.pos;
            let partition_by_kw =
                vec![self.kw_node(&[Kw::Partition]), self.expect_kw(Kw::By)?];
            let specifications = self.comma_list(false, Self::expr_node)?;
            Some(self.finish(
                start,
                Node::new(PartitionByClause {
                    partition_by_kw,
                    specifications,
                }),
            ))
        } else {
            None
        };
        let order_by = if self.at_kw(Kw::Order) {
            Some(self.order_by_clause()?)
        } else {
            None
        };
        let frame = if self.at_any_kw(&[Kw::Rows, Kw::Range, Kw::Groups]) {
            Some(self.frame_clause()?)
        } else {
            None
        };
        Ok(self.finish(
            start,
            Node::new(WindowDefinition {
                base_window,
                partition_by,
                order_by,
                frame,
            }),
        ))
    }

    fn frame_clause(&mut self) -> PResult<Node<FrameClause>> {
        let start = self.pos;
        let unit_kw = self.kw_node(&[Kw::Rows, Kw::Range, Kw::Groups]);
        let extent = if self.at_kw(Kw::Between) {
            let e_start = self.pos;
            let between_kw = self.kw_node(&[Kw::Between]);
            let begin = Box::new(self.frame_bound()?);
            let and_kw = self.expect_kw(Kw::And)?;
            let end = Box::new(self.frame_bound()?);
            self.finish(
                e_start,
                Node::new(FrameExtent::Between(FrameBetween {
                    between_kw,
                    begin,
                    and_kw,
                    end,
                })),
            )
        } else {
            let bound = self.frame_bound()?;
            bound.map(FrameExtent::Bound)
        };
        let exclusion = if self.at_kw(Kw::Exclude) {
            let x_start = self.pos;
            let exclude_kw = self.kw_node(&[Kw::Exclude]);
            let kind_kw = if self.at_kw(Kw::Current) {
                vec![self.kw_node(&[Kw::Current]), self.expect_kw(Kw::Row)?]
            } else if self.at_kw(Kw::No) {
                vec![self.kw_node(&[Kw::No]), self.expect_kw(Kw::Others)?]
            } else {
                vec![self.expect_kw_of(&[Kw::Group, Kw::Ties], "GROUP or TIES")?]
            };
            Some(self.finish(
                x_start,
                Node::new(FrameExclusion {
                    exclude_kw,
                    kind_kw,
                }),
            ))
        } else {
            None
        };
        Ok(self.finish(
            start,
            Node::new(FrameClause {
                unit_kw,
                extent,
                exclusion,
            }),
        ))
    }

    fn frame_bound(&mut self) -> PResult<Node<FrameBound>> {
        let start = self.pos;
        if self.at_kw(Kw::Current) {
            let current_row_kw = vec![self.kw_node(&[Kw::Current]), self.expect_kw(Kw::Row)?];
            return Ok(self.finish(
                start,
                Node::new(FrameBound::CurrentRow(FrameBoundCurrentRow {
                    current_row_kw,
                })),
            ));
        }
        let limit = if self.at_kw(Kw::Unbounded) {
            let unbounded_kw = self.kw_node(&[Kw::Unbounded]);
            Node::new(FrameLimit::Unbounded(FrameUnbounded { unbounded_kw }))
        } else {
            self.expr_node()?.map(FrameLimit::Expr)
        };
        let direction = self.expect_kw_of(
            &[Kw::Preceding, Kw::Following],
            "PRECEDING or FOLLOWING",
        )?;
        let bound = if direction.inner.text.eq_ignore_ascii_case("PRECEDING") {
            FrameBound::Preceding(FrameBoundPreceding {
                limit,
                preceding_kw: direction,
            })
        } else {
            FrameBound::Following(FrameBoundFollowing {
                limit,
                following_kw: direction,
            })
        };
        Ok(self.finish(start, Node::new(bound)))
    }

    // -----------------------------------------------------------------------
    // FROM / joins
    // -----------------------------------------------------------------------

    fn table_expr_node(&mut self) -> PResult<Node<TableExpr>> {
        let start = self.pos;
        let mut left = self.table_primary()?;
        loop {
            let operator = if self.peek_kind() == &TokenKind::Comma {
                let comma = self.advance();
                left.trailing.extend(comma.leading);
                JoinOperator::Comma
            } else if let Some(kws) = self.join_operator()? {
                JoinOperator::Kw(kws)
            } else {
                break;
            };
            let right = self.table_primary()?;
            let specification = if self.at_kw(Kw::On) {
                let s_start = self.pos;
                let on_kw = self.kw_node(&[Kw::On]);
                let expr = self.expr_node()?;
                Some(self.finish(
                    s_start,
                    Node::new(JoinSpec::On(JoinOnSpecification { on_kw, expr })),
                ))
            } else if self.at_kw(Kw::Using) {
                let s_start = self.pos;
                let using_kw = self.kw_node(&[Kw::Using]);
                let columns = self.paren(|p| {
                    let list = p.comma_list(false, |p| p.ident_node("a column name"))?;
                    Ok(Node::new(list))
                })?;
                Some(self.finish(
                    s_start,
                    Node::new(JoinSpec::Using(JoinUsingSpecification { using_kw, columns })),
                ))
            } else {
                None
            };
            left = self.finish(
                start,
                Node::new(TableExpr::Join(Box::new(JoinExpr {
                    left,
                    operator,
                    right,
                    specification,
                }))),
            );
        }
        Ok(left)
    }

    /// Collect the keyword sequence of a join operator, or `None` when the
    /// current token does not begin one.
    fn join_operator(&mut self) -> PResult<Option<Vec<Node<Keyword>>>> {
        if self.is_mysql() && self.at_kw(Kw::StraightJoin) {
            return Ok(Some(vec![self.kw_node(&[Kw::StraightJoin])]));
        }
        let mut kws = Vec::new();
        if self.at_kw(Kw::Natural) {
            kws.push(self.kw_node(&[Kw::Natural]));
        }
        if self.at_any_kw(&[Kw::Left, Kw::Right, Kw::Full]) {
            kws.push(self.kw_node(&[Kw::Left, Kw::Right, Kw::Full]));
            if let Some(outer) = self.eat_kw(Kw::Outer) {
                kws.push(outer);
            }
        } else if let Some(kind) = self.eat_kw_of(&[Kw::Inner, Kw::Cross]) {
            kws.push(kind);
        }
        if self.at_kw(Kw::Join) {
            kws.push(self.kw_node(&[Kw::Join]));
            Ok(Some(kws))
        } else if kws.is_empty() {
            Ok(None)
        } else {
            self.expected("JOIN")
        }
    }

    fn table_primary(&mut self) -> PResult<Node<TableExpr>> {
        let start = self.pos;
        let base: Node<TableExpr> = if self.peek_kind() == &TokenKind::LParen {
            if matches!(
                self.peek_nth(1),
                TokenKind::Keyword(Kw::Select | Kw::With)
            ) {
                let paren = self.paren(|p| p.sub_select(None))?;
                paren.map(|p| TableExpr::Subquery(Box::new(p)))
            } else {
                let paren = self.paren(Self::table_expr_node)?;
                paren.map(|p| TableExpr::Paren(Box::new(p)))
            }
        } else if self.at_ident() {
            // A bare name, a schema-qualified name, or a table function.
            if self.peek_nth(1) == &TokenKind::LParen {
                let name = self.ident_node("a table")?;
                let args = self.paren(|p| {
                    let list = if p.peek_kind() == &TokenKind::RParen {
                        ListExpr::new(Vec::new())
                    } else {
                        p.comma_list(false, Self::expr_node)?
                    };
                    Ok(Node::new(list))
                })?;
                self.finish(start, Node::new(TableExpr::Func(TableFuncCall { name, args })))
            } else {
                let table = self.table_ref_node("a table")?;
                table.map(TableExpr::Table)
            }
        } else {
            return self.expected("a table");
        };

        let aliased = self.maybe_alias_table(base)?;

        if self.is_sqlite() {
            if self.at_kw(Kw::Indexed) {
                let indexed_by_kw = vec![self.kw_node(&[Kw::Indexed]), self.expect_kw(Kw::By)?];
                let index = self.ident_node("an index name")?;
                return Ok(self.finish(
                    start,
                    Node::new(TableExpr::Indexed(Box::new(IndexedTableRef {
                        table: aliased,
                        indexed_by_kw,
                        index,
                    }))),
                ));
            }
            if self.at_kw(Kw::Not) && self.nth_kw(1) == Some(Kw::Indexed) {
                let not_indexed_kw = vec![self.kw_node(&[Kw::Not]), self.kw_node(&[Kw::Indexed])];
                return Ok(self.finish(
                    start,
                    Node::new(TableExpr::NotIndexed(Box::new(NotIndexedTableRef {
                        table: aliased,
                        not_indexed_kw,
                    }))),
                ));
            }
        }
        Ok(aliased)
    }

    fn maybe_alias_table(&mut self, node: Node<TableExpr>) -> PResult<Node<TableExpr>> {
        let start = self.pos;
        let Node {
            leading,
            inner,
            trailing,
            range,
        } = self.maybe_alias(node)?;
        match inner {
            Aliased::Bare(table) => Ok(Node {
                leading,
                inner: table,
                trailing,
                range,
            }),
            Aliased::Alias(alias) => {
                Ok(self.finish(start, Node::new(TableExpr::Aliased(Box::new(alias)))))
            }
        }
    }

    // -----------------------------------------------------------------------
    // WITH
    // -----------------------------------------------------------------------

    fn with_clause(&mut self) -> PResult<Node<WithClause>> {
        let start = self.pos;
        let with_kw = self.expect_kw(Kw::With)?;
        let recursive_kw = self.eat_kw(Kw::Recursive);
        let tables = self.comma_list(false, Self::common_table_expression)?;
        Ok(self.finish(
            start,
            Node::new(WithClause {
                with_kw,
                recursive_kw,
                tables,
            }),
        ))
    }

    fn common_table_expression(&mut self) -> PResult<Node<CommonTableExpression>> {
        let start = self.pos;
        let table = self.ident_node("a table name")?;
        let columns = if self.peek_kind() == &TokenKind::LParen {
            Some(self.paren(|p| {
                let list = p.comma_list(false, |p| p.ident_node("a column name"))?;
                Ok(Node::new(list))
            })?)
        } else {
            None
        };
        let as_kw = self.expect_kw(Kw::As)?;
        let option_kw = if self.at_kw(Kw::Materialized) {
            vec![self.kw_node(&[Kw::Materialized])]
        } else if self.at_kw(Kw::Not) && self.nth_kw(1) == Some(Kw::Materialized) {
            vec![self.kw_node(&[Kw::Not]), self.kw_node(&[Kw::Materialized])]
        } else {
            Vec::new()
        };
        let expr = self.expr_node()?;
        Ok(self.finish(
            start,
            Node::new(CommonTableExpression {
                table,
                columns,
                as_kw,
                option_kw,
                expr,
            }),
        ))
    }

    // -----------------------------------------------------------------------
    // INSERT / UPDATE / DELETE
    // -----------------------------------------------------------------------

    fn insert_stmt(&mut self, with: Option<Node<WithClause>>) -> PResult<InsertStmt> {
        let insert_kw = self.expect_kw_of(&[Kw::Insert, Kw::Replace], "INSERT")?;
        let mut options = Vec::new();
        if self.is_sqlite() && self.at_kw(Kw::Or) {
            let o_start = self.pos;
            let kw = vec![
                self.kw_node(&[Kw::Or]),
                self.expect_kw_of(
                    &[Kw::Abort, Kw::Fail, Kw::Ignore, Kw::Replace, Kw::Rollback],
                    "a conflict resolution",
                )?,
            ];
            options.push(self.finish(o_start, Node::new(InsertOption { kw })));
        }
        if self.is_mysql() {
            while let Some(kw) = self.eat_kw_of(&[
                Kw::LowPriority,
                Kw::Delayed,
                Kw::HighPriority,
                Kw::Ignore,
            ]) {
                options.push(Node::new(InsertOption { kw: vec![kw] }));
            }
        }
        let into_kw = self.eat_kw(Kw::Into);
        let table = self.table_ref_node("a table")?;
        let columns = if self.peek_kind() == &TokenKind::LParen
            && !matches!(self.peek_nth(1), TokenKind::Keyword(Kw::Select | Kw::With))
        {
            Some(self.paren(|p| {
                let list = p.comma_list(false, |p| p.ident_node("a column name"))?;
                Ok(Node::new(list))
            })?)
        } else {
            None
        };
        let source = self.insert_source()?;
        let upsert = if self.is_sqlite() && self.at_kw(Kw::On) {
            Some(self.upsert_clause()?)
        } else {
            None
        };
        let returning = if !self.is_mysql() && self.at_kw(Kw::Returning) {
            Some(self.returning_clause()?)
        } else {
            None
        };
        Ok(InsertStmt {
            with,
            insert_kw,
            options,
            into_kw,
            table,
            columns,
            source,
            upsert,
            returning,
        })
    }

    fn insert_source(&mut self) -> PResult<Node<InsertSource>> {
        let start = self.pos;
        let source = match self.peek_kind().clone() {
            TokenKind::Keyword(Kw::Values) => InsertSource::Values(self.values_clause()?),
            TokenKind::Keyword(Kw::Default) => {
                let default_values_kw =
                    vec![self.kw_node(&[Kw::Default]), self.expect_kw(Kw::Values)?];
                InsertSource::Default(DefaultValues { default_values_kw })
            }
            TokenKind::Keyword(Kw::Select | Kw::With) | TokenKind::LParen => {
                let sub = self.sub_select(None)?;
                return Ok(self.finish(start, sub.map(InsertSource::Select)));
            }
            _ => return self.expected("VALUES"),
        };
        Ok(self.finish(start, Node::new(source)))
    }

    fn values_clause(&mut self) -> PResult<ValuesClause> {
        let values_kw = self.expect_kw(Kw::Values)?;
        let rows = self.comma_list(false, |p| {
            p.paren(|p| {
                let list = p.comma_list(false, Self::value_item_node)?;
                Ok(Node::new(list))
            })
        })?;
        Ok(ValuesClause { values_kw, rows })
    }

    fn value_item_node(&mut self) -> PResult<Node<ValueItem>> {
        if self.at_kw(Kw::Default) {
            let start = self.pos;
            let default_kw = self.kw_node(&[Kw::Default]);
            return Ok(self.finish(
                start,
                Node::new(ValueItem::Default(DefaultExpr { default_kw })),
            ));
        }
        Ok(self.expr_node()?.map(ValueItem::Expr))
    }

    fn upsert_clause(&mut self) -> PResult<Node<UpsertClause>> {
        let start = self.pos;
        let on_conflict_kw = vec![self.expect_kw(Kw::On)?, self.expect_kw(Kw::Conflict)?];
        let target = if self.peek_kind() == &TokenKind::LParen {
            Some(self.paren(|p| {
                let list = p.comma_list(false, Self::sort_specification)?;
                Ok(Node::new(list))
            })?)
        } else {
            None
        };
        let target_where = if target.is_some() && self.at_kw(Kw::Where) {
            Some(self.where_clause()?)
        } else {
            None
        };
        let do_kw = self.expect_kw(Kw::Do)?;
        let a_start = self.pos;
        let action = if self.at_kw(Kw::Nothing) {
            let nothing_kw = self.kw_node(&[Kw::Nothing]);
            self.finish(
                a_start,
                Node::new(UpsertAction::Nothing(UpsertDoNothing { nothing_kw })),
            )
        } else {
            let update_kw = self.expect_kw(Kw::Update)?;
            let set_kw = self.expect_kw(Kw::Set)?;
            let assignments = self.comma_list(false, Self::column_assignment)?;
            let where_clause = if self.at_kw(Kw::Where) {
                Some(self.where_clause()?)
            } else {
                None
            };
            self.finish(
                a_start,
                Node::new(UpsertAction::Update(UpsertDoUpdate {
                    update_kw,
                    set_kw,
                    assignments,
                    where_clause,
                })),
            )
        };
        Ok(self.finish(
            start,
            Node::new(UpsertClause {
                on_conflict_kw,
                target,
                target_where,
                do_kw,
                action,
            }),
        ))
    }

    fn returning_clause(&mut self) -> PResult<Node<ReturningClause>> {
        let start = self.pos;
        let returning_kw = self.expect_kw(Kw::Returning)?;
        let columns = self.comma_list(false, Self::select_column)?;
        Ok(self.finish(
            start,
            Node::new(ReturningClause {
                returning_kw,
                columns,
            }),
        ))
    }

    fn update_stmt(&mut self, with: Option<Node<WithClause>>) -> PResult<UpdateStmt> {
        let update_kw = self.expect_kw(Kw::Update)?;
        let tables = self.comma_list(false, |p| p.table_ref_node("a table"))?;
        let set_kw = self.expect_kw(Kw::Set)?;
        let assignments = self.comma_list(false, Self::column_assignment)?;
        let where_clause = if self.at_kw(Kw::Where) {
            Some(self.where_clause()?)
        } else {
            None
        };
        let returning = if !self.is_mysql() && self.at_kw(Kw::Returning) {
            Some(self.returning_clause()?)
        } else {
            None
        };
        Ok(UpdateStmt {
            with,
            update_kw,
            tables,
            set_kw,
            assignments,
            where_clause,
            returning,
        })
    }

    fn column_assignment(&mut self) -> PResult<Node<ColumnAssignment>> {
        let start = self.pos;
        let mut column = self.column_target()?;
        self.expect_owned(&TokenKind::Eq, "=", &mut column.trailing)?;
        let value = self.value_item_node()?;
        Ok(self.finish(start, Node::new(ColumnAssignment { column, value })))
    }

    /// The assignable position: `col` or `tbl.col`.
    fn column_target(&mut self) -> PResult<Node<Expr>> {
        let start = self.pos;
        let first = self.ident_node("a column name")?;
        if self.peek_kind() == &TokenKind::Dot {
            let mut table = first;
            let dot = self.advance();
            table.trailing.extend(dot.leading);
            let column = self.ident_node("a column name")?.map(ColumnTarget::Ident);
            return Ok(self.finish(
                start,
                Node::new(Expr::Column(ColumnRef {
                    table: Some(table),
                    column,
                })),
            ));
        }
        Ok(first.map(Expr::Ident))
    }

    fn delete_stmt(&mut self, with: Option<Node<WithClause>>) -> PResult<DeleteStmt> {
        let delete_kw = self.expect_kw(Kw::Delete)?;
        let from_kw = self.expect_kw(Kw::From)?;
        let table = {
            let tref = self.table_ref_node("a table")?;
            self.maybe_alias(tref)?
        };
        let where_clause = if self.at_kw(Kw::Where) {
            Some(self.where_clause()?)
        } else {
            None
        };
        let returning = if !self.is_mysql() && self.at_kw(Kw::Returning) {
            Some(self.returning_clause()?)
        } else {
            None
        };
        Ok(DeleteStmt {
            with,
            delete_kw,
            from_kw,
            table,
            where_clause,
            returning,
        })
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    fn start_transaction_stmt(&mut self) -> PResult<StartTransactionStmt> {
        let start_kw = self.expect_kw_of(&[Kw::Begin, Kw::Start], "BEGIN")?;
        let behavior_kw = if self.is_sqlite() {
            self.eat_kw_of(&[Kw::Deferred, Kw::Immediate, Kw::Exclusive])
        } else {
            None
        };
        let transaction_kw = self.eat_kw_of(&[Kw::Transaction, Kw::Work]);
        Ok(StartTransactionStmt {
            start_kw,
            behavior_kw,
            transaction_kw,
        })
    }

    fn commit_transaction_stmt(&mut self) -> PResult<CommitTransactionStmt> {
        let commit_kw = self.expect_kw_of(&[Kw::Commit, Kw::End], "COMMIT")?;
        let transaction_kw = self.eat_kw_of(&[Kw::Transaction, Kw::Work]);
        Ok(CommitTransactionStmt {
            commit_kw,
            transaction_kw,
        })
    }

    fn rollback_transaction_stmt(&mut self) -> PResult<RollbackTransactionStmt> {
        let rollback_kw = self.expect_kw(Kw::Rollback)?;
        let transaction_kw = self.eat_kw_of(&[Kw::Transaction, Kw::Work]);
        let savepoint = if self.at_kw(Kw::To) {
            let start = self.pos;
            let to_kw = self.kw_node(&[Kw::To]);
            let savepoint_kw = self.eat_kw(Kw::Savepoint);
            let savepoint = self.ident_node("a savepoint name")?;
            Some(self.finish(
                start,
                Node::new(RollbackToSavepoint {
                    to_kw,
                    savepoint_kw,
                    savepoint,
                }),
            ))
        } else {
            None
        };
        Ok(RollbackTransactionStmt {
            rollback_kw,
            transaction_kw,
            savepoint,
        })
    }

    // -----------------------------------------------------------------------
    // SQLite database administration
    // -----------------------------------------------------------------------

    fn attach_stmt(&mut self) -> PResult<AttachDatabaseStmt> {
        let attach_kw = self.expect_kw(Kw::Attach)?;
        let database_kw = self.eat_kw(Kw::Database);
        let file = self.expr_node()?;
        let as_kw = self.expect_kw(Kw::As)?;
        let schema = self.ident_node("a schema name")?;
        Ok(AttachDatabaseStmt {
            attach_kw,
            database_kw,
            file,
            as_kw,
            schema,
        })
    }

    fn vacuum_stmt(&mut self) -> PResult<VacuumStmt> {
        let vacuum_kw = self.expect_kw(Kw::Vacuum)?;
        let schema = if self.at_ident() && !self.at_kw(Kw::Into) {
            Some(self.ident_node("a schema name")?)
        } else {
            None
        };
        let (into_kw, file) = if self.at_kw(Kw::Into) {
            let kw = self.kw_node(&[Kw::Into]);
            let file = self.string_node()?;
            (Some(kw), Some(file))
        } else {
            (None, None)
        };
        Ok(VacuumStmt {
            vacuum_kw,
            schema,
            into_kw,
            file,
        })
    }

    fn pragma_stmt(&mut self) -> PResult<PragmaStmt> {
        let pragma_kw = self.expect_kw(Kw::Pragma)?;
        let start = self.pos;
        let name = self.table_ref_node("a pragma name")?;
        let pragma = if self.peek_kind() == &TokenKind::Eq {
            let mut name = name;
            let eq = self.advance();
            name.trailing.extend(eq.leading);
            let value = self.pragma_value()?;
            self.finish(
                start,
                Node::new(PragmaValue::Assignment(PragmaAssignment { name, value })),
            )
        } else if self.peek_kind() == &TokenKind::LParen {
            let args = self.paren(Self::pragma_value)?;
            self.finish(start, Node::new(PragmaValue::Func(PragmaFuncCall { name, args })))
        } else {
            name.map(PragmaValue::Ref)
        };
        Ok(PragmaStmt { pragma_kw, pragma })
    }

    /// Pragma values admit bare keywords (`PRAGMA foreign_keys = ON`).
    fn pragma_value(&mut self) -> PResult<Node<Expr>> {
        if matches!(
            self.peek_kind(),
            TokenKind::Keyword(_) | TokenKind::Ident | TokenKind::QuotedIdent
        ) {
            let word = self.any_word_node("a pragma value")?;
            Ok(word.map(Expr::Ident))
        } else {
            self.expr_node()
        }
    }

    // -----------------------------------------------------------------------
    // ANALYZE / EXPLAIN
    // -----------------------------------------------------------------------

    fn analyze_stmt(&mut self) -> PResult<AnalyzeStmt> {
        let analyze_kw = self.expect_kw(Kw::Analyze)?;
        let table_kw = if self.is_mysql() {
            self.eat_kw(Kw::Table)
        } else {
            None
        };
        let tables = if self.at_ident() {
            Some(self.comma_list(false, |p| p.table_ref_node("a table"))?)
        } else {
            None
        };
        Ok(AnalyzeStmt {
            analyze_kw,
            table_kw,
            tables,
        })
    }

    fn explain_stmt(&mut self, in_trigger: bool) -> PResult<ExplainStmt> {
        let explain_kw = self.expect_kw(Kw::Explain)?;
        let query_plan_kw = if self.is_sqlite() && self.at_kw(Kw::Query) {
            vec![self.kw_node(&[Kw::Query]), self.expect_kw(Kw::Plan)?]
        } else {
            Vec::new()
        };
        let statement = Box::new(self.statement(in_trigger)?);
        Ok(ExplainStmt {
            explain_kw,
            query_plan_kw,
            statement,
        })
    }

    // -----------------------------------------------------------------------
    // Role statements (PostgreSQL)
    // -----------------------------------------------------------------------

    fn at_set_role(&self) -> bool {
        matches!(self.nth_kw(1), Some(Kw::Role))
            || (matches!(self.nth_kw(1), Some(Kw::Session | Kw::Local))
                && matches!(self.nth_kw(2), Some(Kw::Role)))
    }

    fn set_role_stmt(&mut self) -> PResult<SetRoleStmt> {
        let set_kw = self.expect_kw(Kw::Set)?;
        let scope_kw = self.eat_kw_of(&[Kw::Session, Kw::Local]);
        let role_kw = self.expect_kw(Kw::Role)?;
        let name = match self.peek_kind().clone() {
            TokenKind::Keyword(Kw::None) => {
                let kw_tok = self.advance();
                let span = kw_tok.span;
                let node = Node::new(SetRoleTarget::None(Keyword::one_of(kw_tok.text, &["NONE"])))
                    .with_leading(kw_tok.leading);
                self.ranged(node, span)
            }
            TokenKind::String => self.string_node()?.map(SetRoleTarget::String),
            _ => self.ident_node("a role name")?.map(SetRoleTarget::Ident),
        };
        Ok(SetRoleStmt {
            set_kw,
            scope_kw,
            role_kw,
            name,
        })
    }

    const ROLE_KEYWORD_OPTIONS: &'static [Kw] = &[
        Kw::Superuser,
        Kw::Nosuperuser,
        Kw::Createdb,
        Kw::Nocreatedb,
        Kw::Createrole,
        Kw::Nocreaterole,
        Kw::Inherit,
        Kw::Noinherit,
        Kw::Login,
        Kw::Nologin,
        Kw::Replication,
        Kw::Noreplication,
        Kw::Bypassrls,
        Kw::Nobypassrls,
    ];

    fn at_role_option(&self) -> bool {
        self.at_any_kw(Self::ROLE_KEYWORD_OPTIONS)
            || self.at_any_kw(&[
                Kw::Connection,
                Kw::Encrypted,
                Kw::Password,
                Kw::Valid,
                Kw::In,
                Kw::Role,
                Kw::Admin,
                Kw::Sysid,
            ])
    }

    fn role_option(&mut self) -> PResult<Node<RoleOption>> {
        let start = self.pos;
        let option = if self.at_any_kw(Self::ROLE_KEYWORD_OPTIONS) {
            RoleOption::Keyword(RoleOptionKeyword {
                kw: self.kw_node(Self::ROLE_KEYWORD_OPTIONS),
            })
        } else if self.at_kw(Kw::Connection) {
            RoleOption::ConnectionLimit(RoleOptionConnectionLimit {
                connection_limit_kw: vec![
                    self.kw_node(&[Kw::Connection]),
                    self.expect_kw(Kw::Limit)?,
                ],
                limit: self.number_node()?,
            })
        } else if self.at_any_kw(&[Kw::Encrypted, Kw::Password]) {
            let encrypted_kw = self.eat_kw(Kw::Encrypted);
            let password_kw = self.expect_kw(Kw::Password)?;
            let password = if self.at_kw(Kw::Null) {
                let tok = self.advance();
                let span = tok.span;
                let node = Node::new(PasswordValue::Null(NullLiteral { text: tok.text }))
                    .with_leading(tok.leading);
                self.ranged(node, span)
            } else {
                self.string_node()?.map(PasswordValue::String)
            };
            RoleOption::Password(RoleOptionPassword {
                encrypted_kw,
                password_kw,
                password,
            })
        } else if self.at_kw(Kw::Valid) {
            RoleOption::ValidUntil(RoleOptionValidUntil {
                valid_until_kw: vec![self.kw_node(&[Kw::Valid]), self.expect_kw(Kw::Until)?],
                timestamp: self.string_node()?,
            })
        } else if self.at_kw(Kw::In) {
            RoleOption::InRole(RoleOptionInRole {
                in_role_kw: vec![self.kw_node(&[Kw::In]), self.expect_kw(Kw::Role)?],
                names: self.comma_list(false, |p| p.ident_node("a role name"))?,
            })
        } else if self.at_kw(Kw::Role) {
            RoleOption::Role(RoleOptionRole {
                role_kw: self.kw_node(&[Kw::Role]),
                names: self.comma_list(false, |p| p.ident_node("a role name"))?,
            })
        } else if self.at_kw(Kw::Admin) {
            RoleOption::Admin(RoleOptionAdmin {
                admin_kw: self.kw_node(&[Kw::Admin]),
                names: self.comma_list(false, |p| p.ident_node("a role name"))?,
            })
        } else if self.at_kw(Kw::Sysid) {
            RoleOption::SysId(RoleOptionSysId {
                sysid_kw: self.kw_node(&[Kw::Sysid]),
                id: self.number_node()?,
            })
        } else {
            return self.expected("a role option");
        };
        Ok(self.finish(start, Node::new(option)))
    }

    fn role_options(&mut self) -> PResult<Vec<Node<RoleOption>>> {
        let mut options = Vec::new();
        while self.at_role_option() {
            options.push(self.role_option()?);
        }
        Ok(options)
    }

    fn create_role_stmt(&mut self) -> PResult<CreateRoleStmt> {
        let create_role_kw = vec![
            self.expect_kw(Kw::Create)?,
            self.expect_kw_of(&[Kw::Role, Kw::User, Kw::Group], "ROLE")?,
        ];
        let name = self.ident_node("a role name")?;
        let with_kw = self.eat_kw(Kw::With);
        let options = self.role_options()?;
        Ok(CreateRoleStmt {
            create_role_kw,
            name,
            with_kw,
            options,
        })
    }

    fn alter_role_stmt(&mut self) -> PResult<AlterRoleStmt> {
        let alter_role_kw = vec![
            self.expect_kw(Kw::Alter)?,
            self.expect_kw_of(&[Kw::Role, Kw::User, Kw::Group], "ROLE")?,
        ];
        let name = if self.at_kw(Kw::All) {
            let tok = self.advance();
            let span = tok.span;
            let node = Node::new(RoleName::All(Keyword::one_of(tok.text, &["ALL"])))
                .with_leading(tok.leading);
            self.ranged(node, span)
        } else {
            self.ident_node("a role name")?.map(RoleName::Ident)
        };
        let database = if self.at_kw(Kw::In) {
            let start = self.pos;
            let in_database_kw = vec![self.kw_node(&[Kw::In]), self.expect_kw(Kw::Database)?];
            let name = self.ident_node("a database name")?;
            Some(self.finish(
                start,
                Node::new(InDatabaseClause {
                    in_database_kw,
                    name,
                }),
            ))
        } else {
            None
        };
        let a_start = self.pos;
        let action = if self.at_kw(Kw::Rename) {
            let rename_to_kw = vec![self.kw_node(&[Kw::Rename]), self.expect_kw(Kw::To)?];
            let new_name = self.ident_node("a role name")?;
            self.finish(
                a_start,
                Node::new(AlterRoleAction::Rename(AlterRoleRename {
                    rename_to_kw,
                    new_name,
                })),
            )
        } else {
            let with_kw = self.eat_kw(Kw::With);
            let options = self.role_options()?;
            if with_kw.is_none() && options.is_empty() {
                return self.expected("a role option");
            }
            self.finish(
                a_start,
                Node::new(AlterRoleAction::Options(AlterRoleOptions {
                    with_kw,
                    options,
                })),
            )
        };
        Ok(AlterRoleStmt {
            alter_role_kw,
            name,
            database,
            action,
        })
    }

    fn drop_role_stmt(&mut self) -> PResult<DropRoleStmt> {
        let drop_role_kw = vec![
            self.expect_kw(Kw::Drop)?,
            self.expect_kw_of(&[Kw::Role, Kw::User, Kw::Group], "ROLE")?,
        ];
        let if_exists_kw = self.if_exists()?;
        let names = self.comma_list(false, |p| p.ident_node("a role name"))?;
        Ok(DropRoleStmt {
            drop_role_kw,
            if_exists_kw,
            names,
        })
    }

    // -----------------------------------------------------------------------
    // CREATE / ALTER / DROP dispatch
    // -----------------------------------------------------------------------

    pub(crate) fn if_exists(&mut self) -> PResult<Vec<Node<Keyword>>> {
        if self.at_kw(Kw::If) {
            Ok(vec![self.kw_node(&[Kw::If]), self.expect_kw(Kw::Exists)?])
        } else {
            Ok(Vec::new())
        }
    }

    pub(crate) fn if_not_exists(&mut self) -> PResult<Vec<Node<Keyword>>> {
        if self.at_kw(Kw::If) {
            Ok(vec![
                self.kw_node(&[Kw::If]),
                self.expect_kw(Kw::Not)?,
                self.expect_kw(Kw::Exists)?,
            ])
        } else {
            Ok(Vec::new())
        }
    }

    fn create_statement(&mut self) -> PResult<Statement> {
        let second = self.nth_kw(1);
        let third = self.nth_kw(2);
        match second {
            Some(Kw::Table) => Ok(Statement::CreateTable(self.create_table_stmt()?)),
            Some(Kw::Temporary | Kw::Temp) => match third {
                Some(Kw::Table) => Ok(Statement::CreateTable(self.create_table_stmt()?)),
                Some(Kw::View) => Ok(Statement::CreateView(self.create_view_stmt()?)),
                Some(Kw::Trigger) if self.is_sqlite() => {
                    Ok(Statement::CreateTrigger(self.create_trigger_stmt()?))
                }
                _ => self.expected_at_next(&["TABLE", "VIEW"]),
            },
            Some(Kw::View) => Ok(Statement::CreateView(self.create_view_stmt()?)),
            Some(Kw::Trigger) => Ok(Statement::CreateTrigger(self.create_trigger_stmt()?)),
            Some(Kw::Index | Kw::Unique) => Ok(Statement::CreateIndex(self.create_index_stmt()?)),
            Some(Kw::Fulltext | Kw::Spatial) if self.is_mysql() => {
                Ok(Statement::CreateIndex(self.create_index_stmt()?))
            }
            Some(Kw::Virtual) if self.is_sqlite() => Ok(Statement::CreateVirtualTable(
                self.create_virtual_table_stmt()?,
            )),
            Some(Kw::Role | Kw::User | Kw::Group) if self.is_postgres() => {
                Ok(Statement::CreateRole(self.create_role_stmt()?))
            }
            _ => self.expected_at_next(&["TABLE", "VIEW", "INDEX", "TRIGGER"]),
        }
    }

    fn alter_statement(&mut self) -> PResult<Statement> {
        match self.nth_kw(1) {
            Some(Kw::Table) => Ok(Statement::AlterTable(self.alter_table_stmt()?)),
            Some(Kw::Role | Kw::User | Kw::Group) if self.is_postgres() => {
                Ok(Statement::AlterRole(self.alter_role_stmt()?))
            }
            _ => self.expected_at_next(&["TABLE"]),
        }
    }

    fn drop_statement(&mut self) -> PResult<Statement> {
        match self.nth_kw(1) {
            Some(Kw::Table) => Ok(Statement::DropTable(self.drop_table_stmt()?)),
            Some(Kw::Temporary | Kw::Temp) if self.is_mysql() => {
                Ok(Statement::DropTable(self.drop_table_stmt()?))
            }
            Some(Kw::View) => Ok(Statement::DropView(self.drop_view_stmt()?)),
            Some(Kw::Index) => Ok(Statement::DropIndex(self.drop_index_stmt()?)),
            Some(Kw::Trigger) => Ok(Statement::DropTrigger(self.drop_trigger_stmt()?)),
            Some(Kw::Role | Kw::User | Kw::Group) if self.is_postgres() => {
                Ok(Statement::DropRole(self.drop_role_stmt()?))
            }
            _ => self.expected_at_next(&["TABLE", "VIEW", "INDEX", "TRIGGER"]),
        }
    }
}
