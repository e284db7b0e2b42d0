//! Pratt expression parser.
//!
//! Operators are consumed left-to-right and folded into a left-deep
//! `BinaryExpr` tree according to the binding-power table below; equal
//! binding powers fold left-associatively. The whitespace seen between an
//! operand and the operator that follows it is attached to that operand's
//! trailing run, never to the chain node.
//!
//! Precedence, lowest to highest:
//!   OR
//!   AND
//!   NOT (prefix)
//!   = == != <> <=> IS [NOT] IN LIKE GLOB REGEXP MATCH BETWEEN ESCAPE
//!   < <= > >=
//!   & | << >> (bitwise)
//!   + - (binary)
//!   * / %
//!   || (concat)
//!   COLLATE (postfix)
//!   ~ - + (unary prefix)
//!   -> ->> (JSON access)

use sqltrip_cst::*;

use crate::keywords::Kw;
use crate::options::ParamType;
use crate::parser::{PResult, Parser};
use crate::token::TokenKind;

// Binding powers: higher binds tighter. Left BP is checked against min_bp;
// right BP is passed to the recursive call.
mod bp {
    pub const OR: (u8, u8) = (1, 2);
    pub const AND: (u8, u8) = (3, 4);
    pub const NOT_PREFIX: u8 = 5;
    pub const EQUALITY: (u8, u8) = (7, 8);
    pub const POSTFIX_NULL: u8 = 7;
    pub const COMPARISON: (u8, u8) = (9, 10);
    pub const BITWISE: (u8, u8) = (13, 14);
    pub const ADD: (u8, u8) = (15, 16);
    pub const MUL: (u8, u8) = (17, 18);
    pub const CONCAT: (u8, u8) = (19, 20);
    pub const COLLATE: u8 = 21;
    pub const UNARY: u8 = 23;
    pub const JSON: (u8, u8) = (25, 26);
}

impl Parser {
    /// Parse a single expression.
    pub(crate) fn expr_node(&mut self) -> PResult<Node<Expr>> {
        self.expr_node_bp(0)
    }

    // ── Pratt core ──────────────────────────────────────────────────────

    pub(crate) fn expr_node_bp(&mut self, min_bp: u8) -> PResult<Node<Expr>> {
        let start = self.pos;
        let mut lhs = self.parse_prefix()?;

        loop {
            if let Some(l_bp) = self.postfix_bp() {
                if l_bp < min_bp {
                    break;
                }
                lhs = self.parse_postfix(start, lhs)?;
                continue;
            }
            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }
                lhs = self.parse_infix(start, lhs, r_bp)?;
                continue;
            }
            break;
        }

        Ok(lhs)
    }

    fn postfix_bp(&self) -> Option<u8> {
        match self.peek_kind() {
            TokenKind::Keyword(Kw::Collate) => Some(bp::COLLATE),
            TokenKind::Keyword(Kw::Isnull | Kw::Notnull) if self.is_sqlite() => {
                Some(bp::POSTFIX_NULL)
            }
            TokenKind::Keyword(Kw::Not)
                if self.is_sqlite() && self.nth_kw(1) == Some(Kw::Null) =>
            {
                Some(bp::POSTFIX_NULL)
            }
            _ => None,
        }
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.peek_kind() {
            TokenKind::Concat => Some(bp::CONCAT),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(bp::MUL),
            TokenKind::Plus | TokenKind::Minus => Some(bp::ADD),
            TokenKind::Ampersand
            | TokenKind::Pipe
            | TokenKind::ShiftLeft
            | TokenKind::ShiftRight => Some(bp::BITWISE),
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                Some(bp::COMPARISON)
            }
            TokenKind::Eq | TokenKind::EqEq | TokenKind::Ne | TokenKind::LtGt => {
                Some(bp::EQUALITY)
            }
            TokenKind::NullSafeEq if self.is_mysql() => Some(bp::EQUALITY),
            TokenKind::Arrow | TokenKind::DoubleArrow => Some(bp::JSON),
            TokenKind::Keyword(kw) => match kw {
                Kw::Or => Some(bp::OR),
                Kw::And => Some(bp::AND),
                Kw::Is | Kw::In | Kw::Between | Kw::Like | Kw::Escape => Some(bp::EQUALITY),
                Kw::Glob | Kw::Match if self.is_sqlite() => Some(bp::EQUALITY),
                Kw::Regexp if self.is_sqlite() || self.is_mysql() => Some(bp::EQUALITY),
                Kw::Not
                    if matches!(
                        self.nth_kw(1),
                        Some(
                            Kw::In
                                | Kw::Like
                                | Kw::Between
                                | Kw::Glob
                                | Kw::Regexp
                                | Kw::Match
                        )
                    ) =>
                {
                    Some(bp::EQUALITY)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Consume the first token of an infix operator; its trivia belongs to
    /// the left operand's trailing run.
    fn infix_kw(&mut self, lhs: &mut Node<Expr>, admissible: &[&str]) -> Node<Keyword> {
        let tok = self.advance();
        let span = tok.span;
        lhs.trailing.extend(tok.leading);
        self.ranged(Node::new(Keyword::one_of(tok.text, admissible)), span)
    }

    fn binary(
        &self,
        start: usize,
        lhs: Node<Expr>,
        op: Operator,
        rhs: Node<Expr>,
    ) -> Node<Expr> {
        self.finish(
            start,
            Node::new(Expr::Binary(BinaryExpr {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            })),
        )
    }

    fn parse_infix(
        &mut self,
        start: usize,
        mut lhs: Node<Expr>,
        r_bp: u8,
    ) -> PResult<Node<Expr>> {
        match self.peek_kind().clone() {
            TokenKind::Keyword(kw) => match kw {
                Kw::And | Kw::Or | Kw::Like | Kw::Glob | Kw::Regexp | Kw::Match | Kw::Escape => {
                    let op_kw = self.infix_kw(&mut lhs, &[kw.name()]);
                    let rhs = self.expr_node_bp(r_bp)?;
                    Ok(self.binary(start, lhs, Operator::Kw(vec![op_kw]), rhs))
                }
                Kw::Is => {
                    let mut kws = vec![self.infix_kw(&mut lhs, &["IS"])];
                    if let Some(not) = self.eat_kw(Kw::Not) {
                        kws.push(not);
                    }
                    let rhs = self.expr_node_bp(r_bp)?;
                    Ok(self.binary(start, lhs, Operator::Kw(kws), rhs))
                }
                Kw::In => {
                    let op_kw = self.infix_kw(&mut lhs, &["IN"]);
                    let rhs = self.in_rhs(r_bp)?;
                    Ok(self.binary(start, lhs, Operator::Kw(vec![op_kw]), rhs))
                }
                Kw::Between => {
                    let between_kw = vec![self.infix_kw(&mut lhs, &["BETWEEN"])];
                    self.parse_between(start, lhs, between_kw)
                }
                Kw::Not => {
                    let not_kw = self.infix_kw(&mut lhs, &["NOT"]);
                    if self.at_kw(Kw::Between) {
                        let between_kw = vec![not_kw, self.kw_node(&[Kw::Between])];
                        return self.parse_between(start, lhs, between_kw);
                    }
                    let second = self.expect_kw_of(
                        &[Kw::In, Kw::Like, Kw::Glob, Kw::Regexp, Kw::Match],
                        "IN or LIKE",
                    )?;
                    let is_in = second.inner.text.eq_ignore_ascii_case("IN");
                    let kws = vec![not_kw, second];
                    let rhs = if is_in {
                        self.in_rhs(r_bp)?
                    } else {
                        self.expr_node_bp(r_bp)?
                    };
                    Ok(self.binary(start, lhs, Operator::Kw(kws), rhs))
                }
                _ => self.expected("an operator"),
            },
            _ => {
                let tok = self.advance();
                lhs.trailing.extend(tok.leading);
                let op = Operator::Punct(tok.text);
                let rhs = self.expr_node_bp(r_bp)?;
                Ok(self.binary(start, lhs, op, rhs))
            }
        }
    }

    fn parse_between(
        &mut self,
        start: usize,
        lhs: Node<Expr>,
        between_kw: Vec<Node<Keyword>>,
    ) -> PResult<Node<Expr>> {
        let begin = Box::new(self.expr_node_bp(bp::EQUALITY.1)?);
        let and_kw = self.expect_kw(Kw::And)?;
        let end = Box::new(self.expr_node_bp(bp::EQUALITY.1)?);
        Ok(self.finish(
            start,
            Node::new(Expr::Between(BetweenExpr {
                left: Box::new(lhs),
                between_kw,
                begin,
                and_kw,
                end,
            })),
        ))
    }

    /// The right side of IN: a parenthesized list, a subquery, or a plain
    /// expression (`'oo' IN 'foobar'`).
    fn in_rhs(&mut self, r_bp: u8) -> PResult<Node<Expr>> {
        if self.peek_kind() == &TokenKind::LParen {
            if matches!(self.peek_nth(1), TokenKind::Keyword(Kw::Select | Kw::With)) {
                return self.subquery_expr();
            }
            let paren = self.paren(|p| {
                let list = p.comma_list(false, Self::expr_node)?;
                Ok(Node::new(Expr::List(list)))
            })?;
            return Ok(paren.map(|p| Expr::Paren(Box::new(p))));
        }
        self.expr_node_bp(r_bp)
    }

    fn parse_postfix(&mut self, start: usize, lhs: Node<Expr>) -> PResult<Node<Expr>> {
        if self.at_kw(Kw::Collate) {
            let collate_kw = self.kw_node(&[Kw::Collate]);
            let collation = self.any_word_node("a collation name")?;
            return Ok(self.finish(
                start,
                Node::new(Expr::Collate(CollateExpr {
                    expr: Box::new(lhs),
                    collate_kw,
                    collation,
                })),
            ));
        }
        let op_kw = if self.at_kw(Kw::Not) {
            vec![self.kw_node(&[Kw::Not]), self.expect_kw(Kw::Null)?]
        } else {
            vec![self.kw_node(&[Kw::Isnull, Kw::Notnull])]
        };
        Ok(self.finish(
            start,
            Node::new(Expr::Postfix(PostfixExpr {
                expr: Box::new(lhs),
                op_kw,
            })),
        ))
    }

    // ── Prefix ──────────────────────────────────────────────────────────

    fn leaf_expr(&mut self, make: impl FnOnce(String) -> Expr) -> Node<Expr> {
        let tok = self.advance();
        let span = tok.span;
        let node = Node::new(make(tok.text)).with_leading(tok.leading);
        self.ranged(node, span)
    }

    fn parse_prefix(&mut self) -> PResult<Node<Expr>> {
        let start = self.pos;
        match self.peek_kind().clone() {
            TokenKind::Number => {
                Ok(self.leaf_expr(|text| Expr::Number(NumberLiteral { text })))
            }
            TokenKind::String => {
                Ok(self.leaf_expr(|text| Expr::String(StringLiteral { text })))
            }
            TokenKind::Blob => Ok(self.leaf_expr(|text| Expr::Blob(BlobLiteral { text }))),
            TokenKind::Question
            | TokenKind::QuestionNum
            | TokenKind::ColonParam
            | TokenKind::AtParam
            | TokenKind::DollarParam => self.param_expr(),
            TokenKind::Minus | TokenKind::Plus | TokenKind::Tilde => {
                let tok = self.advance();
                let leading = tok.leading;
                let op = Operator::Punct(tok.text);
                let expr = Box::new(self.expr_node_bp(bp::UNARY)?);
                Ok(self
                    .finish(start, Node::new(Expr::Unary(UnaryExpr { op, expr })))
                    .with_leading(leading))
            }
            TokenKind::LParen => {
                if matches!(self.peek_nth(1), TokenKind::Keyword(Kw::Select | Kw::With)) {
                    self.subquery_expr()
                } else {
                    let paren = self.paren(Self::paren_body)?;
                    Ok(paren.map(|p| Expr::Paren(Box::new(p))))
                }
            }
            TokenKind::Keyword(kw) => match kw {
                Kw::True | Kw::False => {
                    Ok(self.leaf_expr(|text| Expr::Bool(BoolLiteral { text })))
                }
                Kw::Null => Ok(self.leaf_expr(|text| Expr::Null(NullLiteral { text }))),
                Kw::Not => {
                    let op = Operator::Kw(vec![self.kw_node(&[Kw::Not])]);
                    let expr = Box::new(self.expr_node_bp(bp::NOT_PREFIX)?);
                    Ok(self.finish(start, Node::new(Expr::Unary(UnaryExpr { op, expr }))))
                }
                Kw::Exists => {
                    let op = Operator::Kw(vec![self.kw_node(&[Kw::Exists])]);
                    let expr = Box::new(self.subquery_expr()?);
                    Ok(self.finish(start, Node::new(Expr::Unary(UnaryExpr { op, expr }))))
                }
                Kw::Case => self.case_expr(),
                Kw::Cast => self.cast_expr(),
                Kw::Interval if self.is_mysql() => self.interval_expr(),
                Kw::Date | Kw::Time | Kw::Timestamp
                    if self.is_mysql() && self.peek_nth(1) == &TokenKind::String =>
                {
                    let dt_kw = self.kw_node(&[Kw::Date, Kw::Time, Kw::Timestamp]);
                    let value = self.string_node()?;
                    Ok(self.finish(
                        start,
                        Node::new(Expr::Datetime(DatetimeLiteral { kw: dt_kw, value })),
                    ))
                }
                _ => self.ident_prefix(),
            },
            TokenKind::Ident | TokenKind::QuotedIdent => self.ident_prefix(),
            _ => self.expected("an expression"),
        }
    }

    /// The body of a plain parenthesized expression, which may turn out to
    /// be a row value `(a, b, …)`.
    fn paren_body(&mut self) -> PResult<Node<Expr>> {
        let first = self.expr_node()?;
        if self.peek_kind() != &TokenKind::Comma {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek_kind() == &TokenKind::Comma {
            let comma = self.advance();
            if let Some(last) = items.last_mut() {
                last.trailing.extend(comma.leading);
            }
            items.push(self.expr_node()?);
        }
        Ok(Node::new(Expr::List(ListExpr::new(items))))
    }

    fn subquery_expr(&mut self) -> PResult<Node<Expr>> {
        let paren = self.paren(|p| p.sub_select(None))?;
        Ok(paren.map(|p| Expr::Subquery(Box::new(p))))
    }

    fn param_expr(&mut self) -> PResult<Node<Expr>> {
        let style = match self.peek_kind() {
            TokenKind::Question => ParamType::Question,
            TokenKind::QuestionNum => ParamType::QuestionNumbered,
            TokenKind::ColonParam => ParamType::Colon,
            TokenKind::AtParam => ParamType::AtSign,
            TokenKind::DollarParam => ParamType::Dollar,
            _ => return self.expected("an expression"),
        };
        if !self.options().has_param_type(style) {
            return self.expected("an expression");
        }
        Ok(self.leaf_expr(|text| Expr::Param(Param { text })))
    }

    fn ident_prefix(&mut self) -> PResult<Node<Expr>> {
        let start = self.pos;

        // MySQL charset-introduced string: `_utf8'…'` (no gap between the
        // introducer and the string).
        if self.is_mysql()
            && self.peek_kind() == &TokenKind::Ident
            && self.current_text().starts_with('_')
            && self.peek_nth(1) == &TokenKind::String
            && self.nth_leading_is_empty(1)
        {
            let intro = self.advance();
            let leading = intro.leading;
            let value = self.string_node()?;
            let node = Node::new(Expr::CharsetString(StringWithCharset {
                charset: intro.text[1..].to_owned(),
                value,
            }))
            .with_leading(leading);
            return Ok(self.finish(start, node));
        }

        let name = self.ident_node("an expression")?;

        if self.peek_kind() == &TokenKind::LParen {
            let args = self.paren(|p| {
                let list = if p.peek_kind() == &TokenKind::RParen {
                    ListExpr::new(Vec::new())
                } else {
                    p.comma_list(false, Self::func_arg)?
                };
                Ok(Node::new(list))
            })?;
            let over = self.over_arg()?;
            return Ok(self.finish(
                start,
                Node::new(Expr::Func(FuncCall {
                    name,
                    args: Some(args),
                    over,
                })),
            ));
        }

        if self.peek_kind() == &TokenKind::Dot {
            let mut table = name;
            let dot = self.advance();
            table.trailing.extend(dot.leading);
            let column = if self.peek_kind() == &TokenKind::Star {
                let tok = self.advance();
                let span = tok.span;
                self.ranged(
                    Node::new(ColumnTarget::AllColumns(AllColumns)).with_leading(tok.leading),
                    span,
                )
            } else {
                self.ident_node("a column name")?.map(ColumnTarget::Ident)
            };
            return Ok(self.finish(
                start,
                Node::new(Expr::Column(ColumnRef {
                    table: Some(table),
                    column,
                })),
            ));
        }

        Ok(name.map(Expr::Ident))
    }

    fn func_arg(&mut self) -> PResult<Node<FuncArg>> {
        if self.at_kw(Kw::Distinct) {
            let start = self.pos;
            let distinct_kw = self.kw_node(&[Kw::Distinct]);
            let value = Box::new(self.expr_node()?);
            return Ok(self.finish(
                start,
                Node::new(FuncArg::Distinct(DistinctArg { distinct_kw, value })),
            ));
        }
        if self.peek_kind() == &TokenKind::Star {
            let tok = self.advance();
            let span = tok.span;
            let node =
                Node::new(FuncArg::Expr(Expr::AllColumns(AllColumns))).with_leading(tok.leading);
            return Ok(self.ranged(node, span));
        }
        Ok(self.expr_node()?.map(FuncArg::Expr))
    }

    fn over_arg(&mut self) -> PResult<Option<Node<OverArg>>> {
        if !self.at_kw(Kw::Over) {
            return Ok(None);
        }
        let start = self.pos;
        let over_kw = self.kw_node(&[Kw::Over]);
        let window = if self.peek_kind() == &TokenKind::LParen {
            OverWindow::Definition(Box::new(self.paren(Self::window_definition)?))
        } else {
            OverWindow::Named(self.ident_node("a window name")?)
        };
        Ok(Some(self.finish(start, Node::new(OverArg { over_kw, window }))))
    }

    fn case_expr(&mut self) -> PResult<Node<Expr>> {
        let start = self.pos;
        let case_kw = self.expect_kw(Kw::Case)?;
        let subject = if self.at_any_kw(&[Kw::When, Kw::Else, Kw::End]) {
            None
        } else {
            Some(Box::new(self.expr_node()?))
        };
        let mut clauses = Vec::new();
        while self.at_any_kw(&[Kw::When, Kw::Else]) {
            let c_start = self.pos;
            let clause = if self.at_kw(Kw::When) {
                let when_kw = self.kw_node(&[Kw::When]);
                let condition = self.expr_node()?;
                let then_kw = self.expect_kw(Kw::Then)?;
                let result = self.expr_node()?;
                CaseClause::When(CaseWhen {
                    when_kw,
                    condition,
                    then_kw,
                    result,
                })
            } else {
                let else_kw = self.kw_node(&[Kw::Else]);
                let result = self.expr_node()?;
                CaseClause::Else(CaseElse { else_kw, result })
            };
            clauses.push(self.finish(c_start, Node::new(clause)));
        }
        let end_kw = self.expect_kw(Kw::End)?;
        Ok(self.finish(
            start,
            Node::new(Expr::Case(CaseExpr {
                case_kw,
                subject,
                clauses,
                end_kw,
            })),
        ))
    }

    fn cast_expr(&mut self) -> PResult<Node<Expr>> {
        let start = self.pos;
        let cast_kw = self.expect_kw(Kw::Cast)?;
        let args = self.paren(|p| {
            let a_start = p.pos;
            let expr = p.expr_node()?;
            let as_kw = p.expect_kw(Kw::As)?;
            let data_type = p.data_type()?;
            Ok(p.finish(
                a_start,
                Node::new(CastArg {
                    expr,
                    as_kw,
                    data_type,
                }),
            ))
        })?;
        Ok(self.finish(start, Node::new(Expr::Cast(CastExpr { cast_kw, args }))))
    }

    fn interval_expr(&mut self) -> PResult<Node<Expr>> {
        let start = self.pos;
        let interval_kw = self.expect_kw(Kw::Interval)?;
        let expr = Box::new(self.expr_node_bp(bp::UNARY)?);
        let unit_kw = self.expect_kw_of(
            &[
                Kw::Second,
                Kw::Minute,
                Kw::Hour,
                Kw::Day,
                Kw::Week,
                Kw::Month,
                Kw::Year,
            ],
            "an interval unit",
        )?;
        Ok(self.finish(
            start,
            Node::new(Expr::Interval(IntervalExpr {
                interval_kw,
                expr,
                unit_kw,
            })),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Dialect, ParseOptions};
    use crate::parser::Parser;

    fn parse_expr(sql: &str) -> Node<Expr> {
        Parser::new(sql, ParseOptions::preserve_all(Dialect::Sqlite))
            .expect("valid options")
            .parse_expression()
            .expect("expression should parse")
    }

    fn assert_expr_roundtrip(sql: &str) {
        assert_eq!(render(&parse_expr(sql)), sql, "round-trip mismatch");
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_expr("6 + 7 * 3");
        let Expr::Binary(add) = &expr.inner else {
            unreachable!("expected a binary expression at the root");
        };
        assert_eq!(add.op, Operator::Punct("+".to_owned()));
        let Expr::Binary(mul) = &add.right.inner else {
            unreachable!("the right operand should be the multiplication");
        };
        assert_eq!(mul.op, Operator::Punct("*".to_owned()));
    }

    #[test]
    fn equal_precedence_folds_left() {
        let expr = parse_expr("1 - 2 - 3");
        let Expr::Binary(outer) = &expr.inner else {
            unreachable!("expected a binary expression at the root");
        };
        assert!(matches!(&outer.left.inner, Expr::Binary(_)));
        assert!(matches!(&outer.right.inner, Expr::Number(_)));
    }

    #[test]
    fn operator_trivia_lands_on_the_operands() {
        let expr = parse_expr("6 /* com1 */ >= /* com2 */ 7");
        let Expr::Binary(cmp) = &expr.inner else {
            unreachable!("expected a binary expression");
        };
        assert_eq!(cmp.left.trailing[1].text(), "/* com1 */");
        assert_eq!(cmp.right.leading[1].text(), "/* com2 */");
        assert_expr_roundtrip("6 /* com1 */ >= /* com2 */ 7");
    }

    #[test]
    fn comparison_operators_roundtrip() {
        for op in [">=", ">", "<=", "<>", "<", "=", "!=", "=="] {
            assert_expr_roundtrip(&format!("5 {op} 7"));
            assert_expr_roundtrip(&format!("6 /* c1 */ {op} /* c2 */ 7"));
        }
    }

    #[test]
    fn keyword_operators_roundtrip() {
        assert_expr_roundtrip("7 IS 5");
        assert_expr_roundtrip("7 /*c1*/ IS /*c2*/ NOT /*c3*/ 5");
        assert_expr_roundtrip("'oo' IN 'foobar'");
        assert_expr_roundtrip("'oo' /*c1*/ NOT /*c2*/ IN /*c3*/ 'foobar'");
        assert_expr_roundtrip("a LIKE 'x%' ESCAPE '\\'");
        assert_expr_roundtrip("a GLOB '*'");
        assert_expr_roundtrip("x AND y OR not z");
    }

    #[test]
    fn in_list_comments_attach_to_items() {
        assert_expr_roundtrip("7 IN (1, 2, 3, 4)");
        assert_expr_roundtrip("7 /*c*/ IN /*c0*/ (/*c1*/ 1 /*c2*/, /*c3*/ 2 /*c4*/)");
        assert_expr_roundtrip("7 NOT IN (SELECT n FROM t)");
    }

    #[test]
    fn between_roundtrips() {
        assert_expr_roundtrip("5 BETWEEN 1 AND 10");
        assert_expr_roundtrip("5 between 1 and 10");
        assert_expr_roundtrip("5 /*c0*/ not /*c1*/ BETWEEN /*c2*/ 1 /*c3*/ AND /*c4*/ 10");
        assert_expr_roundtrip("5 BETWEEN 1 + 2 AND 10 * 3");
    }

    #[test]
    fn postfix_operators_chain_in_source_order() {
        assert_expr_roundtrip("x COLLATE nocase");
        assert_expr_roundtrip("x COLLATE a COLLATE b");
        let expr = parse_expr("x COLLATE a COLLATE b");
        let Expr::Collate(outer) = &expr.inner else {
            unreachable!("expected the outermost COLLATE");
        };
        assert_eq!(outer.collation.inner.text, "b");
        assert!(matches!(&outer.expr.inner, Expr::Collate(_)));
        assert_expr_roundtrip("x ISNULL");
        assert_expr_roundtrip("x NOTNULL");
        assert_expr_roundtrip("x NOT NULL");
    }

    #[test]
    fn unary_and_paren_expressions() {
        assert_expr_roundtrip("-x");
        assert_expr_roundtrip("NOT x");
        assert_expr_roundtrip("~(a | b)");
        assert_expr_roundtrip("((1))");
        let expr = parse_expr("((1))");
        let Expr::Paren(outer) = &expr.inner else {
            unreachable!("redundant parens must be preserved");
        };
        assert!(matches!(&outer.expr.inner, Expr::Paren(_)));
    }

    #[test]
    fn case_cast_exists_roundtrip() {
        assert_expr_roundtrip("CASE x WHEN 1 THEN 'a' ELSE 'b' END");
        assert_expr_roundtrip("CASE WHEN a > 0 THEN a END");
        assert_expr_roundtrip("CAST(x AS VARCHAR(10))");
        assert_expr_roundtrip("EXISTS (SELECT 1)");
        assert_expr_roundtrip("NOT EXISTS (SELECT 1 FROM t)");
    }

    #[test]
    fn function_calls_roundtrip() {
        assert_expr_roundtrip("count(*)");
        assert_expr_roundtrip("count(DISTINCT a)");
        assert_expr_roundtrip("coalesce(a, b, 0)");
        assert_expr_roundtrip("now()");
        assert_expr_roundtrip("sum(x) OVER (PARTITION BY y)");
    }

    #[test]
    fn json_access_binds_tightest() {
        assert_expr_roundtrip("data -> 'a' ->> 'b'");
        let expr = parse_expr("-data -> 'a'");
        let Expr::Unary(neg) = &expr.inner else {
            unreachable!("expected unary minus at the root");
        };
        assert!(matches!(&neg.expr.inner, Expr::Binary(_)));
    }

    #[test]
    fn params_are_gated_by_style() {
        assert_expr_roundtrip("a = ?");
        assert_expr_roundtrip("a = ?3");
        assert_expr_roundtrip("a = :name AND b = @other AND c = $1");

        let err = Parser::new("a = ?", ParseOptions::new(Dialect::Postgresql))
            .expect("valid options")
            .parse_expression();
        assert!(err.is_err(), "`?` placeholders are not a PostgreSQL style");

        let ok = Parser::new("a = $1", ParseOptions::new(Dialect::Postgresql))
            .expect("valid options")
            .parse_expression();
        assert!(ok.is_ok());
    }

    #[test]
    fn blob_and_quoted_literals_are_verbatim() {
        assert_expr_roundtrip("X'CAFE'");
        assert_expr_roundtrip("x'00ff'");
        assert_expr_roundtrip("'it''s'");
        assert_expr_roundtrip("1.5e-3 + .5 + 0xFF");
    }
}
