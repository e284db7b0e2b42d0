//! DDL parsing: CREATE/ALTER/DROP TABLE, constraints, views, indexes,
//! triggers, virtual tables.

use sqltrip_cst::*;

use crate::keywords::Kw;
use crate::parser::{PResult, Parser};
use crate::token::TokenKind;

impl Parser {
    // -----------------------------------------------------------------------
    // CREATE TABLE
    // -----------------------------------------------------------------------

    pub(crate) fn create_table_stmt(&mut self) -> PResult<CreateTableStmt> {
        let create_kw = self.expect_kw(Kw::Create)?;
        let temporary_kw = self.eat_kw_of(&[Kw::Temporary, Kw::Temp]);
        let table_kw = self.expect_kw(Kw::Table)?;
        let if_not_exists_kw = self.if_not_exists()?;
        let table = self.table_ref_node("a table name")?;
        let columns = if self.peek_kind() == &TokenKind::LParen {
            Some(self.paren(|p| {
                let list = p.comma_list(false, Self::table_entry)?;
                Ok(Node::new(list))
            })?)
        } else {
            None
        };
        Ok(CreateTableStmt {
            create_kw,
            temporary_kw,
            table_kw,
            if_not_exists_kw,
            table,
            columns,
        })
    }

    fn table_entry(&mut self) -> PResult<Node<TableEntry>> {
        let start = self.pos;
        let at_table_constraint = match self.current_kw() {
            Some(Kw::Constraint | Kw::Primary | Kw::Foreign | Kw::Unique | Kw::Check) => true,
            Some(Kw::Fulltext | Kw::Spatial | Kw::Index | Kw::Key) => self.is_mysql(),
            _ => false,
        };
        let entry = if at_table_constraint {
            TableEntry::Constraint(self.table_constraint()?)
        } else {
            TableEntry::Column(self.column_definition()?)
        };
        Ok(self.finish(start, Node::new(entry)))
    }

    fn column_definition(&mut self) -> PResult<ColumnDefinition> {
        let name = self.ident_node("a column name")?;
        let data_type = if self.current_kw().is_some_and(Kw::is_type_name) {
            Some(self.data_type()?)
        } else {
            None
        };
        let mut constraints = Vec::new();
        while self.at_column_constraint() {
            constraints.push(self.column_constraint()?);
        }
        Ok(ColumnDefinition {
            name,
            data_type,
            constraints,
        })
    }

    pub(crate) fn data_type(&mut self) -> PResult<Node<DataType>> {
        let start = self.pos;
        let mut name_kw = Vec::new();
        while self.current_kw().is_some_and(Kw::is_type_name) {
            let kw = match self.current_kw() {
                Some(kw) => kw,
                None => break,
            };
            name_kw.push(self.kw_node(&[kw]));
        }
        if name_kw.is_empty() {
            return self.expected("a type name");
        }
        let params = if self.peek_kind() == &TokenKind::LParen {
            Some(self.paren(|p| {
                let list = p.comma_list(false, Self::expr_node)?;
                Ok(Node::new(list))
            })?)
        } else {
            None
        };
        Ok(self.finish(start, Node::new(DataType { name_kw, params })))
    }

    // -----------------------------------------------------------------------
    // Constraints
    // -----------------------------------------------------------------------

    fn at_column_constraint(&self) -> bool {
        match self.current_kw() {
            Some(
                Kw::Constraint
                | Kw::Not
                | Kw::Primary
                | Kw::Unique
                | Kw::Check
                | Kw::Default
                | Kw::Collate
                | Kw::References
                | Kw::Generated
                | Kw::As,
            ) => true,
            Some(Kw::Autoincrement) => self.is_sqlite(),
            Some(Kw::AutoIncrement | Kw::Null | Kw::Comment | Kw::Visible | Kw::Invisible) => {
                self.is_mysql()
            }
            _ => false,
        }
    }

    fn constraint_name(&mut self) -> PResult<Option<Node<ConstraintName>>> {
        if !self.at_kw(Kw::Constraint) {
            return Ok(None);
        }
        let start = self.pos;
        let constraint_kw = self.kw_node(&[Kw::Constraint]);
        let name = if self.at_kw(Kw::Primary)
            || self.at_kw(Kw::Foreign)
            || self.at_kw(Kw::Unique)
            || self.at_kw(Kw::Check)
            || self.at_kw(Kw::Not)
        {
            None
        } else {
            Some(self.ident_node("a constraint name")?)
        };
        Ok(Some(self.finish(
            start,
            Node::new(ConstraintName {
                constraint_kw,
                name,
            }),
        )))
    }

    fn deferrable_opt(&mut self) -> PResult<Option<Node<ConstraintDeferrable>>> {
        let starts = self.at_kw(Kw::Deferrable)
            || (self.at_kw(Kw::Not) && self.nth_kw(1) == Some(Kw::Deferrable));
        if !starts {
            return Ok(None);
        }
        let start = self.pos;
        let mut deferrable_kw = Vec::new();
        if self.at_kw(Kw::Not) {
            deferrable_kw.push(self.kw_node(&[Kw::Not]));
        }
        deferrable_kw.push(self.expect_kw(Kw::Deferrable)?);
        let initially_kw = if self.at_kw(Kw::Initially) {
            vec![
                self.kw_node(&[Kw::Initially]),
                self.expect_kw_of(&[Kw::Deferred, Kw::Immediate], "DEFERRED or IMMEDIATE")?,
            ]
        } else {
            Vec::new()
        };
        Ok(Some(self.finish(
            start,
            Node::new(ConstraintDeferrable {
                deferrable_kw,
                initially_kw,
            }),
        )))
    }

    fn on_conflict_opt(&mut self) -> PResult<Option<Node<OnConflictClause>>> {
        if !(self.is_sqlite() && self.at_kw(Kw::On) && self.nth_kw(1) == Some(Kw::Conflict)) {
            return Ok(None);
        }
        let start = self.pos;
        let on_conflict_kw = vec![self.kw_node(&[Kw::On]), self.kw_node(&[Kw::Conflict])];
        let resolution_kw = self.expect_kw_of(
            &[Kw::Rollback, Kw::Abort, Kw::Fail, Kw::Ignore, Kw::Replace],
            "a conflict resolution",
        )?;
        Ok(Some(self.finish(
            start,
            Node::new(OnConflictClause {
                on_conflict_kw,
                resolution_kw,
            }),
        )))
    }

    fn column_constraint(&mut self) -> PResult<Node<ColumnConstraint>> {
        let start = self.pos;
        let name = self.constraint_name()?;
        let kind = self.column_constraint_kind()?;
        let deferrable = self.deferrable_opt()?;
        Ok(self.finish(
            start,
            Node::new(Constraint {
                name,
                kind,
                deferrable,
            }),
        ))
    }

    fn column_constraint_kind(&mut self) -> PResult<Node<ColumnConstraintKind>> {
        let start = self.pos;
        let kind = match self.current_kw() {
            Some(Kw::Null) if self.is_mysql() => ColumnConstraintKind::Null(ConstraintNull {
                null_kw: self.kw_node(&[Kw::Null]),
            }),
            Some(Kw::Not) => {
                let not_null_kw = vec![self.kw_node(&[Kw::Not]), self.expect_kw(Kw::Null)?];
                let on_conflict = self.on_conflict_opt()?;
                ColumnConstraintKind::NotNull(ConstraintNotNull {
                    not_null_kw,
                    on_conflict,
                })
            }
            Some(Kw::Primary) => {
                let primary_key_kw = vec![self.kw_node(&[Kw::Primary]), self.expect_kw(Kw::Key)?];
                let on_conflict = self.on_conflict_opt()?;
                ColumnConstraintKind::PrimaryKey(ConstraintPrimaryKey {
                    primary_key_kw,
                    columns: None,
                    on_conflict,
                })
            }
            Some(Kw::Autoincrement | Kw::AutoIncrement) => {
                ColumnConstraintKind::AutoIncrement(ConstraintAutoIncrement {
                    auto_increment_kw: self.kw_node(&[Kw::Autoincrement, Kw::AutoIncrement]),
                })
            }
            Some(Kw::Default) => {
                let default_kw = self.kw_node(&[Kw::Default]);
                let expr = self.default_value_expr()?;
                ColumnConstraintKind::Default(ConstraintDefault { default_kw, expr })
            }
            Some(Kw::Comment) => ColumnConstraintKind::Comment(ConstraintComment {
                comment_kw: self.kw_node(&[Kw::Comment]),
                value: self.string_node()?,
            }),
            Some(Kw::References) => {
                ColumnConstraintKind::References(self.references_specification()?)
            }
            Some(Kw::Unique) => {
                let mut unique_kw = vec![self.kw_node(&[Kw::Unique])];
                if self.is_mysql() {
                    if let Some(kw) = self.eat_kw(Kw::Key) {
                        unique_kw.push(kw);
                    }
                }
                let on_conflict = self.on_conflict_opt()?;
                ColumnConstraintKind::Unique(ConstraintUnique {
                    unique_kw,
                    columns: None,
                    on_conflict,
                })
            }
            Some(Kw::Check) => {
                let check_kw = self.kw_node(&[Kw::Check]);
                let expr = self.paren(Self::expr_node)?;
                let on_conflict = self.on_conflict_opt()?;
                ColumnConstraintKind::Check(ConstraintCheck {
                    check_kw,
                    expr,
                    on_conflict,
                })
            }
            Some(Kw::Generated | Kw::As) => {
                let generated_kw = if self.at_kw(Kw::Generated) {
                    vec![self.kw_node(&[Kw::Generated]), self.expect_kw(Kw::Always)?]
                } else {
                    Vec::new()
                };
                let as_kw = self.expect_kw(Kw::As)?;
                let expr = self.paren(Self::expr_node)?;
                let storage_kw = self.eat_kw_of(&[Kw::Stored, Kw::Virtual]);
                ColumnConstraintKind::Generated(ConstraintGenerated {
                    generated_kw,
                    as_kw,
                    expr,
                    storage_kw,
                })
            }
            Some(Kw::Collate) => ColumnConstraintKind::Collate(ConstraintCollate {
                collate_kw: self.kw_node(&[Kw::Collate]),
                collation: self.any_word_node("a collation name")?,
            }),
            Some(Kw::Visible) => ColumnConstraintKind::Visible(ConstraintVisible {
                visible_kw: self.kw_node(&[Kw::Visible]),
            }),
            Some(Kw::Invisible) => ColumnConstraintKind::Invisible(ConstraintInvisible {
                invisible_kw: self.kw_node(&[Kw::Invisible]),
            }),
            _ => return self.expected("a column constraint"),
        };
        Ok(self.finish(start, Node::new(kind)))
    }

    /// A DEFAULT value: a parenthesized expression, or an expression parsed
    /// above the comparison level so that a following constraint keyword is
    /// not swallowed as an operator.
    fn default_value_expr(&mut self) -> PResult<Node<Expr>> {
        if self.peek_kind() == &TokenKind::LParen {
            let paren = self.paren(Self::expr_node)?;
            return Ok(paren.map(|p| Expr::Paren(Box::new(p))));
        }
        self.expr_node_bp(9)
    }

    fn table_constraint(&mut self) -> PResult<TableConstraint> {
        let name = self.constraint_name()?;
        let kind = self.table_constraint_kind()?;
        let deferrable = self.deferrable_opt()?;
        Ok(Constraint {
            name,
            kind,
            deferrable,
        })
    }

    fn table_constraint_kind(&mut self) -> PResult<Node<TableConstraintKind>> {
        let start = self.pos;
        let kind = match self.current_kw() {
            Some(Kw::Primary) => {
                let primary_key_kw = vec![self.kw_node(&[Kw::Primary]), self.expect_kw(Kw::Key)?];
                let columns = Some(self.sort_column_list()?);
                let on_conflict = self.on_conflict_opt()?;
                TableConstraintKind::PrimaryKey(ConstraintPrimaryKey {
                    primary_key_kw,
                    columns,
                    on_conflict,
                })
            }
            Some(Kw::Foreign) => {
                let foreign_key_kw = vec![self.kw_node(&[Kw::Foreign]), self.expect_kw(Kw::Key)?];
                let columns = self.ident_column_list()?;
                let references = self.references_specification()?;
                TableConstraintKind::ForeignKey(ConstraintForeignKey {
                    foreign_key_kw,
                    columns,
                    references,
                })
            }
            Some(Kw::Unique) => {
                let mut unique_kw = vec![self.kw_node(&[Kw::Unique])];
                if self.is_mysql() {
                    if let Some(kw) = self.eat_kw_of(&[Kw::Index, Kw::Key]) {
                        unique_kw.push(kw);
                    }
                }
                let columns = Some(self.sort_column_list()?);
                let on_conflict = self.on_conflict_opt()?;
                TableConstraintKind::Unique(ConstraintUnique {
                    unique_kw,
                    columns,
                    on_conflict,
                })
            }
            Some(Kw::Check) => {
                let check_kw = self.kw_node(&[Kw::Check]);
                let expr = self.paren(Self::expr_node)?;
                let on_conflict = self.on_conflict_opt()?;
                TableConstraintKind::Check(ConstraintCheck {
                    check_kw,
                    expr,
                    on_conflict,
                })
            }
            Some(Kw::Fulltext | Kw::Spatial | Kw::Index | Kw::Key) if self.is_mysql() => {
                let index_type_kw = self.eat_kw_of(&[Kw::Fulltext, Kw::Spatial]);
                let index_kw = self.expect_kw_of(&[Kw::Index, Kw::Key], "INDEX")?;
                let columns = self.sort_column_list()?;
                TableConstraintKind::Index(ConstraintIndex {
                    index_type_kw,
                    index_kw,
                    columns,
                })
            }
            _ => return self.expected("a table constraint"),
        };
        Ok(self.finish(start, Node::new(kind)))
    }

    fn ident_column_list(&mut self) -> PResult<Node<ParenExpr<ListExpr<Ident>>>> {
        self.paren(|p| {
            let list = p.comma_list(false, |p| p.ident_node("a column name"))?;
            Ok(Node::new(list))
        })
    }

    fn sort_column_list(&mut self) -> PResult<Node<ParenExpr<ListExpr<SortSpecification>>>> {
        self.paren(|p| {
            let list = p.comma_list(false, Self::sort_specification)?;
            Ok(Node::new(list))
        })
    }

    fn references_specification(&mut self) -> PResult<Node<ReferencesSpecification>> {
        let start = self.pos;
        let references_kw = self.expect_kw(Kw::References)?;
        let table = self.table_ref_node("a table name")?;
        let columns = if self.peek_kind() == &TokenKind::LParen {
            Some(self.ident_column_list()?)
        } else {
            None
        };
        let mut options = Vec::new();
        loop {
            if self.at_kw(Kw::On) && matches!(self.nth_kw(1), Some(Kw::Delete | Kw::Update)) {
                let o_start = self.pos;
                let on_kw = self.kw_node(&[Kw::On]);
                let event_kw = self.kw_node(&[Kw::Delete, Kw::Update]);
                let action_kw = match self.current_kw() {
                    Some(Kw::Cascade) => vec![self.kw_node(&[Kw::Cascade])],
                    Some(Kw::Restrict) => vec![self.kw_node(&[Kw::Restrict])],
                    Some(Kw::Set) => vec![
                        self.kw_node(&[Kw::Set]),
                        self.expect_kw_of(&[Kw::Null, Kw::Default], "NULL or DEFAULT")?,
                    ],
                    Some(Kw::No) => vec![self.kw_node(&[Kw::No]), self.expect_kw(Kw::Action)?],
                    _ => return self.expected("a referential action"),
                };
                options.push(self.finish(
                    o_start,
                    Node::new(RefOption::Action(ReferentialAction {
                        on_kw,
                        event_kw,
                        action_kw,
                    })),
                ));
            } else if self.at_kw(Kw::Match) {
                let o_start = self.pos;
                let match_kw = self.kw_node(&[Kw::Match]);
                let type_kw = self.expect_kw_of(
                    &[Kw::Full, Kw::Partial, Kw::Simple],
                    "FULL, PARTIAL or SIMPLE",
                )?;
                options.push(self.finish(
                    o_start,
                    Node::new(RefOption::Match(ReferentialMatch { match_kw, type_kw })),
                ));
            } else {
                break;
            }
        }
        Ok(self.finish(
            start,
            Node::new(ReferencesSpecification {
                references_kw,
                table,
                columns,
                options,
            }),
        ))
    }

    // -----------------------------------------------------------------------
    // ALTER TABLE
    // -----------------------------------------------------------------------

    pub(crate) fn alter_table_stmt(&mut self) -> PResult<AlterTableStmt> {
        let alter_table_kw = vec![self.expect_kw(Kw::Alter)?, self.expect_kw(Kw::Table)?];
        let table = self.table_ref_node("a table name")?;
        let actions = self.comma_list(false, Self::alter_action)?;
        Ok(AlterTableStmt {
            alter_table_kw,
            table,
            actions,
        })
    }

    fn alter_action(&mut self) -> PResult<Node<AlterAction>> {
        let start = self.pos;
        let action = match self.current_kw() {
            Some(Kw::Rename) => self.alter_rename_action()?,
            Some(Kw::Add) => self.alter_add_action()?,
            Some(Kw::Drop) => self.alter_drop_action()?,
            Some(Kw::Alter) => self.alter_column_action()?,
            Some(Kw::Owner) if self.is_postgres() => {
                let owner_to_kw = vec![self.kw_node(&[Kw::Owner]), self.expect_kw(Kw::To)?];
                let owner = self.ident_node("an owner name")?;
                AlterAction::OwnerTo(AlterActionOwnerTo { owner_to_kw, owner })
            }
            _ => return self.expected("an alter action"),
        };
        Ok(self.finish(start, Node::new(action)))
    }

    /// The RENAME family. Phrasings are tried in a fixed order, consulting
    /// the dialect before consuming the token that commits an alternative:
    /// `RENAME TO x` (all), `RENAME AS x` / bare `RENAME x` (MySQL),
    /// `RENAME COLUMN a TO b` (all), bare `RENAME a TO b` (SQLite).
    fn alter_rename_action(&mut self) -> PResult<AlterAction> {
        let rename = self.kw_node(&[Kw::Rename]);
        if self.at_kw(Kw::To) || (self.is_mysql() && self.at_kw(Kw::As)) {
            let rename_kw = vec![rename, self.kw_node(&[Kw::To, Kw::As])];
            let new_name = self.table_ref_node("a table name")?;
            return Ok(AlterAction::RenameTable(AlterActionRenameTable {
                rename_kw,
                new_name,
            }));
        }
        if self.at_kw(Kw::Column) {
            let rename_kw = vec![rename, self.kw_node(&[Kw::Column])];
            return self.alter_rename_column(rename_kw);
        }
        // A bare name next: SQLite reads `RENAME old TO new`, MySQL reads
        // `RENAME new_table_name`.
        if self.is_sqlite() {
            return self.alter_rename_column(vec![rename]);
        }
        if self.is_mysql() {
            let new_name = self.table_ref_node("a table name")?;
            return Ok(AlterAction::RenameTable(AlterActionRenameTable {
                rename_kw: vec![rename],
                new_name,
            }));
        }
        self.expected("TO")
    }

    fn alter_rename_column(&mut self, rename_kw: Vec<Node<Keyword>>) -> PResult<AlterAction> {
        let old_name = self.ident_node("a column name")?;
        let to_kw = if self.is_mysql() {
            self.expect_kw_of(&[Kw::To, Kw::As], "TO")?
        } else {
            self.expect_kw(Kw::To)?
        };
        let new_name = self.ident_node("a column name")?;
        Ok(AlterAction::RenameColumn(AlterActionRenameColumn {
            rename_kw,
            old_name,
            to_kw,
            new_name,
        }))
    }

    fn alter_add_action(&mut self) -> PResult<AlterAction> {
        let add = self.kw_node(&[Kw::Add]);
        let at_constraint = match self.current_kw() {
            Some(Kw::Constraint | Kw::Primary | Kw::Foreign | Kw::Unique | Kw::Check) => true,
            Some(Kw::Fulltext | Kw::Spatial | Kw::Index | Kw::Key) => self.is_mysql(),
            _ => false,
        };
        if at_constraint {
            let c_start = self.pos;
            let constraint = self.table_constraint()?;
            let constraint = self.finish(c_start, Node::new(constraint));
            return Ok(AlterAction::AddConstraint(AlterActionAddConstraint {
                add_kw: add,
                constraint,
            }));
        }
        let mut add_kw = vec![add];
        if let Some(kw) = self.eat_kw(Kw::Column) {
            add_kw.push(kw);
        }
        let c_start = self.pos;
        let column = self.column_definition()?;
        let column = self.finish(c_start, Node::new(column));
        Ok(AlterAction::AddColumn(AlterActionAddColumn {
            add_kw,
            column,
        }))
    }

    fn alter_drop_action(&mut self) -> PResult<AlterAction> {
        let drop = self.kw_node(&[Kw::Drop]);
        if self.at_kw(Kw::Constraint) || (self.is_mysql() && self.at_kw(Kw::Check)) {
            let drop_constraint_kw = vec![drop, self.kw_node(&[Kw::Constraint, Kw::Check])];
            let if_exists_kw = self.if_exists()?;
            let constraint = self.ident_node("a constraint name")?;
            return Ok(AlterAction::DropConstraint(AlterActionDropConstraint {
                drop_constraint_kw,
                if_exists_kw,
                constraint,
            }));
        }
        let mut drop_kw = vec![drop];
        if let Some(kw) = self.eat_kw(Kw::Column) {
            drop_kw.push(kw);
        }
        let column = self.ident_node("a column name")?;
        Ok(AlterAction::DropColumn(AlterActionDropColumn {
            drop_kw,
            column,
        }))
    }

    fn alter_column_action(&mut self) -> PResult<AlterAction> {
        let mut alter_kw = vec![self.kw_node(&[Kw::Alter])];
        if let Some(kw) = self.eat_kw(Kw::Column) {
            alter_kw.push(kw);
        }
        let column = self.ident_node("a column name")?;
        let a_start = self.pos;
        let action = match self.current_kw() {
            Some(Kw::Set) => {
                let set = self.kw_node(&[Kw::Set]);
                match self.current_kw() {
                    Some(Kw::Default) => AlterColumnAction::SetDefault(AlterActionSetDefault {
                        set_default_kw: vec![set, self.kw_node(&[Kw::Default])],
                        expr: self.default_value_expr()?,
                    }),
                    Some(Kw::Not) => AlterColumnAction::SetNotNull(AlterActionSetNotNull {
                        set_not_null_kw: vec![
                            set,
                            self.kw_node(&[Kw::Not]),
                            self.expect_kw(Kw::Null)?,
                        ],
                    }),
                    Some(Kw::Data) => AlterColumnAction::SetDataType(AlterActionSetDataType {
                        set_data_type_kw: vec![
                            set,
                            self.kw_node(&[Kw::Data]),
                            self.expect_kw(Kw::Type)?,
                        ],
                        data_type: self.data_type()?,
                    }),
                    Some(Kw::Visible) if self.is_mysql() => {
                        AlterColumnAction::SetVisible(AlterActionSetVisible {
                            set_visible_kw: vec![set, self.kw_node(&[Kw::Visible])],
                        })
                    }
                    Some(Kw::Invisible) if self.is_mysql() => {
                        AlterColumnAction::SetInvisible(AlterActionSetInvisible {
                            set_invisible_kw: vec![set, self.kw_node(&[Kw::Invisible])],
                        })
                    }
                    _ => return self.expected("DEFAULT, NOT NULL or DATA TYPE"),
                }
            }
            Some(Kw::Drop) => {
                let drop = self.kw_node(&[Kw::Drop]);
                match self.current_kw() {
                    Some(Kw::Default) => AlterColumnAction::DropDefault(AlterActionDropDefault {
                        drop_default_kw: vec![drop, self.kw_node(&[Kw::Default])],
                    }),
                    Some(Kw::Not) => AlterColumnAction::DropNotNull(AlterActionDropNotNull {
                        drop_not_null_kw: vec![
                            drop,
                            self.kw_node(&[Kw::Not]),
                            self.expect_kw(Kw::Null)?,
                        ],
                    }),
                    _ => return self.expected("DEFAULT or NOT NULL"),
                }
            }
            Some(Kw::Type) if self.is_postgres() => {
                AlterColumnAction::SetDataType(AlterActionSetDataType {
                    set_data_type_kw: vec![self.kw_node(&[Kw::Type])],
                    data_type: self.data_type()?,
                })
            }
            _ => return self.expected("SET or DROP"),
        };
        let action = self.finish(a_start, Node::new(action));
        Ok(AlterAction::AlterColumn(AlterActionAlterColumn {
            alter_kw,
            column,
            action,
        }))
    }

    // -----------------------------------------------------------------------
    // DROP TABLE / views / indexes / triggers
    // -----------------------------------------------------------------------

    pub(crate) fn drop_table_stmt(&mut self) -> PResult<DropTableStmt> {
        let drop_kw = self.expect_kw(Kw::Drop)?;
        let temporary_kw = if self.is_mysql() {
            self.eat_kw_of(&[Kw::Temporary, Kw::Temp])
        } else {
            None
        };
        let table_kw = self.expect_kw(Kw::Table)?;
        let if_exists_kw = self.if_exists()?;
        let tables = self.comma_list(false, |p| p.table_ref_node("a table name"))?;
        let behavior_kw = if self.is_postgres() || self.is_mysql() {
            self.eat_kw_of(&[Kw::Cascade, Kw::Restrict])
        } else {
            None
        };
        Ok(DropTableStmt {
            drop_kw,
            temporary_kw,
            table_kw,
            if_exists_kw,
            tables,
            behavior_kw,
        })
    }

    pub(crate) fn create_view_stmt(&mut self) -> PResult<CreateViewStmt> {
        let create_kw = self.expect_kw(Kw::Create)?;
        let temporary_kw = self.eat_kw_of(&[Kw::Temporary, Kw::Temp]);
        let view_kw = self.expect_kw(Kw::View)?;
        let if_not_exists_kw = if self.is_sqlite() {
            self.if_not_exists()?
        } else {
            Vec::new()
        };
        let name = self.table_ref_node("a view name")?;
        let columns = if self.peek_kind() == &TokenKind::LParen {
            Some(self.ident_column_list()?)
        } else {
            None
        };
        let as_kw = self.expect_kw(Kw::As)?;
        let expr = self.sub_select(None)?;
        Ok(CreateViewStmt {
            create_kw,
            temporary_kw,
            view_kw,
            if_not_exists_kw,
            name,
            columns,
            as_kw,
            expr,
        })
    }

    pub(crate) fn drop_view_stmt(&mut self) -> PResult<DropViewStmt> {
        let drop_view_kw = vec![self.expect_kw(Kw::Drop)?, self.expect_kw(Kw::View)?];
        let if_exists_kw = self.if_exists()?;
        let views = self.comma_list(false, |p| p.table_ref_node("a view name"))?;
        let behavior_kw = if self.is_postgres() || self.is_mysql() {
            self.eat_kw_of(&[Kw::Cascade, Kw::Restrict])
        } else {
            None
        };
        Ok(DropViewStmt {
            drop_view_kw,
            if_exists_kw,
            views,
            behavior_kw,
        })
    }

    pub(crate) fn create_index_stmt(&mut self) -> PResult<CreateIndexStmt> {
        let create_kw = self.expect_kw(Kw::Create)?;
        let index_type_kw = if self.is_mysql() {
            self.eat_kw_of(&[Kw::Unique, Kw::Fulltext, Kw::Spatial])
        } else {
            self.eat_kw(Kw::Unique)
        };
        let index_kw = self.expect_kw(Kw::Index)?;
        let if_not_exists_kw = if self.is_mysql() {
            Vec::new()
        } else {
            self.if_not_exists()?
        };
        let name = self.table_ref_node("an index name")?;
        let on_kw = self.expect_kw(Kw::On)?;
        let table = self.table_ref_node("a table name")?;
        let columns = self.sort_column_list()?;
        let where_clause = if !self.is_mysql() && self.at_kw(Kw::Where) {
            Some(self.where_clause()?)
        } else {
            None
        };
        Ok(CreateIndexStmt {
            create_kw,
            index_type_kw,
            index_kw,
            if_not_exists_kw,
            name,
            on_kw,
            table,
            columns,
            where_clause,
        })
    }

    pub(crate) fn drop_index_stmt(&mut self) -> PResult<DropIndexStmt> {
        let drop_index_kw = vec![self.expect_kw(Kw::Drop)?, self.expect_kw(Kw::Index)?];
        let if_exists_kw = if self.is_mysql() {
            Vec::new()
        } else {
            self.if_exists()?
        };
        let indexes = self.comma_list(false, |p| p.table_ref_node("an index name"))?;
        let (on_kw, table) = if self.is_mysql() && self.at_kw(Kw::On) {
            let on = self.kw_node(&[Kw::On]);
            let table = self.table_ref_node("a table name")?;
            (Some(on), Some(table))
        } else {
            (None, None)
        };
        Ok(DropIndexStmt {
            drop_index_kw,
            if_exists_kw,
            indexes,
            on_kw,
            table,
        })
    }

    pub(crate) fn create_trigger_stmt(&mut self) -> PResult<CreateTriggerStmt> {
        let create_kw = self.expect_kw(Kw::Create)?;
        let temporary_kw = if self.is_sqlite() {
            self.eat_kw_of(&[Kw::Temporary, Kw::Temp])
        } else {
            None
        };
        let trigger_kw = self.expect_kw(Kw::Trigger)?;
        let if_not_exists_kw = if self.is_sqlite() {
            self.if_not_exists()?
        } else {
            Vec::new()
        };
        let name = self.table_ref_node("a trigger name")?;
        let event = self.trigger_event()?;
        let on_kw = self.expect_kw(Kw::On)?;
        let table = self.table_ref_node("a table name")?;
        let for_each_row_kw = if self.at_kw(Kw::For) {
            vec![
                self.kw_node(&[Kw::For]),
                self.expect_kw(Kw::Each)?,
                self.expect_kw(Kw::Row)?,
            ]
        } else {
            Vec::new()
        };
        let condition = if self.at_kw(Kw::When) {
            let c_start = self.pos;
            let when_kw = self.kw_node(&[Kw::When]);
            let expr = self.expr_node()?;
            Some(self.finish(c_start, Node::new(TriggerCondition { when_kw, expr })))
        } else {
            None
        };
        let body = self.trigger_body()?;
        Ok(CreateTriggerStmt {
            create_kw,
            temporary_kw,
            trigger_kw,
            if_not_exists_kw,
            name,
            event,
            on_kw,
            table,
            for_each_row_kw,
            condition,
            body,
        })
    }

    fn trigger_event(&mut self) -> PResult<Node<TriggerEvent>> {
        let start = self.pos;
        let time_kw = if self.at_kw(Kw::Instead) {
            vec![self.kw_node(&[Kw::Instead]), self.expect_kw(Kw::Of)?]
        } else if let Some(kw) = self.eat_kw_of(&[Kw::Before, Kw::After]) {
            vec![kw]
        } else {
            Vec::new()
        };
        let event_kw = self.expect_kw_of(
            &[Kw::Insert, Kw::Delete, Kw::Update],
            "INSERT, DELETE or UPDATE",
        )?;
        let (of_kw, columns) = if self.at_kw(Kw::Of) {
            let of = self.kw_node(&[Kw::Of]);
            let cols = self.comma_list(false, |p| p.ident_node("a column name"))?;
            (Some(of), Some(cols))
        } else {
            (None, None)
        };
        Ok(self.finish(
            start,
            Node::new(TriggerEvent {
                time_kw,
                event_kw,
                of_kw,
                columns,
            }),
        ))
    }

    fn trigger_body(&mut self) -> PResult<Node<TriggerBody>> {
        let start = self.pos;
        let begin_kw = self.expect_kw(Kw::Begin)?;
        let program = self.program(true)?;
        let end_kw = self.expect_kw(Kw::End)?;
        Ok(self.finish(
            start,
            Node::new(TriggerBody {
                begin_kw,
                program,
                end_kw,
            }),
        ))
    }

    pub(crate) fn drop_trigger_stmt(&mut self) -> PResult<DropTriggerStmt> {
        let drop_trigger_kw = vec![self.expect_kw(Kw::Drop)?, self.expect_kw(Kw::Trigger)?];
        let if_exists_kw = self.if_exists()?;
        let trigger = self.table_ref_node("a trigger name")?;
        Ok(DropTriggerStmt {
            drop_trigger_kw,
            if_exists_kw,
            trigger,
        })
    }

    // -----------------------------------------------------------------------
    // CREATE VIRTUAL TABLE (SQLite)
    // -----------------------------------------------------------------------

    pub(crate) fn create_virtual_table_stmt(&mut self) -> PResult<CreateVirtualTableStmt> {
        let create_virtual_table_kw = vec![
            self.expect_kw(Kw::Create)?,
            self.expect_kw(Kw::Virtual)?,
            self.expect_kw(Kw::Table)?,
        ];
        let if_not_exists_kw = self.if_not_exists()?;
        let table = self.table_ref_node("a table name")?;
        let using_kw = self.expect_kw(Kw::Using)?;
        let m_start = self.pos;
        let name = self.ident_node("a module name")?;
        let args = if self.peek_kind() == &TokenKind::LParen {
            Some(self.paren(|p| {
                let list = if p.peek_kind() == &TokenKind::RParen {
                    ListExpr::new(Vec::new())
                } else {
                    p.comma_list(false, |p| Ok(p.expr_node()?.map(FuncArg::Expr)))?
                };
                Ok(Node::new(list))
            })?)
        } else {
            None
        };
        let module = self.finish(
            m_start,
            Node::new(FuncCall {
                name,
                args,
                over: None,
            }),
        );
        Ok(CreateVirtualTableStmt {
            create_virtual_table_kw,
            if_not_exists_kw,
            table,
            using_kw,
            module,
        })
    }
}
