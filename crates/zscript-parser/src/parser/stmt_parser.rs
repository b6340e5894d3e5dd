use super::grammar::{PResult, Parser};
use crate::ast::{CheckAt, JumpKind, NodeData, NodeId, UnaryOp};
use crate::terminal::Terminal;

impl<'p, 's> Parser<'p, 's> {
    /// `{ statement* }`, recovering statement by statement.
    pub(super) fn parse_compound(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::LBrace)?.loc;
        let mut content = None;
        while !self.check(Terminal::RBrace) && !self.at_end() {
            match self.parse_statement() {
                Ok(stmt) => content = Some(self.join(content, stmt)),
                Err(error) => {
                    self.report(error);
                    self.synchronize();
                }
            }
        }
        self.expect(Terminal::RBrace)?;
        Ok(self.node(NodeData::CompoundStmt { content }, loc))
    }

    pub(super) fn parse_statement(&mut self) -> PResult<'s, NodeId> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        match self.peek() {
            Terminal::LBrace => self.parse_compound(),
            Terminal::Semicolon => {
                self.advance();
                Ok(self.node(NodeData::CompoundStmt { content: None }, loc))
            }
            Terminal::If => self.parse_if(),
            Terminal::While | Terminal::Until => self.parse_while(),
            Terminal::Do => self.parse_do(),
            Terminal::For => self.parse_for(),
            Terminal::Switch => self.parse_switch(),
            Terminal::Case => {
                self.advance();
                let condition = self.parse_expr()?;
                self.expect(Terminal::Colon)?;
                Ok(self.node(
                    NodeData::CaseStmt {
                        condition: Some(condition),
                    },
                    loc,
                ))
            }
            Terminal::Default => {
                self.advance();
                self.expect(Terminal::Colon)?;
                Ok(self.node(NodeData::CaseStmt { condition: None }, loc))
            }
            Terminal::Break | Terminal::Continue => {
                let kind = match self.advance_terminal() {
                    Terminal::Break => JumpKind::Break,
                    _ => JumpKind::Continue,
                };
                self.expect(Terminal::Semicolon)?;
                Ok(self.node(NodeData::JumpStmt { kind }, loc))
            }
            Terminal::Return => {
                self.advance();
                let values = if self.check(Terminal::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr_list()?)
                };
                self.expect(Terminal::Semicolon)?;
                Ok(self.node(NodeData::ReturnStmt { values }, loc))
            }
            _ if self.is_local_var_decl() => {
                let stmt = self.parse_local_var()?;
                self.expect(Terminal::Semicolon)?;
                Ok(stmt)
            }
            _ => {
                let stmt = self.parse_expression_stmt()?;
                self.expect(Terminal::Semicolon)?;
                Ok(stmt)
            }
        }
    }

    /// Consume the current terminal, returning it.
    fn advance_terminal(&mut self) -> Terminal {
        let terminal = self.peek();
        self.advance();
        terminal
    }

    fn parse_if(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::If)?.loc;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(Terminal::Else).is_some() {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.node(
            NodeData::IfStmt {
                condition,
                then_branch,
                else_branch,
            },
            loc,
        ))
    }

    /// `( expr )`
    fn parse_condition(&mut self) -> PResult<'s, NodeId> {
        self.expect(Terminal::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(Terminal::RParen)?;
        Ok(condition)
    }

    /// Turn an `until` condition into the equivalent `while` condition.
    fn negate(&mut self, condition: NodeId) -> NodeId {
        self.state.init_node_from(
            NodeData::ExprUnary {
                op: UnaryOp::Not,
                operand: condition,
            },
            condition,
        )
    }

    /// `while (c) s` or `until (c) s`.
    fn parse_while(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let until = self.advance_terminal() == Terminal::Until;
        let mut condition = self.parse_condition()?;
        if until {
            condition = self.negate(condition);
        }
        let body = self.parse_statement()?;
        Ok(self.node(
            NodeData::IterationStmt {
                init: None,
                condition: Some(condition),
                update: None,
                body,
                check_at: CheckAt::Start,
            },
            loc,
        ))
    }

    /// `do s while (c);` or `do s until (c);`. A bare `do s` loops forever.
    fn parse_do(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Do)?.loc;
        let body = self.parse_statement()?;
        let condition = match self.peek() {
            Terminal::While | Terminal::Until => {
                let until = self.advance_terminal() == Terminal::Until;
                let condition = self.parse_condition()?;
                self.expect(Terminal::Semicolon)?;
                Some(if until { self.negate(condition) } else { condition })
            }
            _ => None,
        };
        Ok(self.node(
            NodeData::IterationStmt {
                init: None,
                condition,
                update: None,
                body,
                check_at: CheckAt::End,
            },
            loc,
        ))
    }

    /// `for (init; cond; update) s`, where every part may be empty.
    fn parse_for(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::For)?.loc;
        self.expect(Terminal::LParen)?;

        let init = if self.check(Terminal::Semicolon) {
            None
        } else if self.is_local_var_decl() {
            Some(self.parse_local_var()?)
        } else {
            Some(self.parse_expression_stmts()?)
        };
        self.expect(Terminal::Semicolon)?;

        let condition = if self.check(Terminal::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Terminal::Semicolon)?;

        let update = if self.check(Terminal::RParen) {
            None
        } else {
            Some(self.parse_expression_stmts()?)
        };
        self.expect(Terminal::RParen)?;

        let body = self.parse_statement()?;
        Ok(self.node(
            NodeData::IterationStmt {
                init,
                condition,
                update,
                body,
                check_at: CheckAt::Start,
            },
            loc,
        ))
    }

    /// `switch (c) { ... }`; `case` labels are ordinary statements in the body.
    fn parse_switch(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Switch)?.loc;
        let condition = self.parse_condition()?;
        let body = self.parse_compound()?;
        let content = match *self.state.ast()[body].data() {
            NodeData::CompoundStmt { content } => content,
            _ => None,
        };
        Ok(self.node(NodeData::SwitchStmt { condition, content }, loc))
    }

    // ========================================================================
    // Expression and declaration statements
    // ========================================================================

    fn parse_expression_stmt(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let expr = self.parse_expr()?;
        Ok(self.node(NodeData::ExpressionStmt { expr }, loc))
    }

    /// Comma-separated expression statements, as in `for` headers.
    fn parse_expression_stmts(&mut self) -> PResult<'s, NodeId> {
        let head = self.parse_expression_stmt()?;
        while self.eat(Terminal::Comma).is_some() {
            let next = self.parse_expression_stmt()?;
            self.join(Some(head), next);
        }
        Ok(head)
    }

    /// Comma-separated expressions.
    pub(super) fn parse_expr_list(&mut self) -> PResult<'s, NodeId> {
        let head = self.parse_expr()?;
        while self.eat(Terminal::Comma).is_some() {
            let next = self.parse_expr()?;
            self.join(Some(head), next);
        }
        Ok(head)
    }

    /// A type followed by a variable name.
    fn is_local_var_decl(&self) -> bool {
        self.type_len_at(0)
            .is_some_and(|len| self.peek_nth(len) == Terminal::Identifier)
    }

    /// `Type a [= init], b[size], ...` without the trailing `;`.
    fn parse_local_var(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let ty = self.parse_type()?;
        let vars = self.parse_local_var_name()?;
        while self.eat(Terminal::Comma).is_some() {
            let next = self.parse_local_var_name()?;
            self.join(Some(vars), next);
        }
        Ok(self.node(NodeData::LocalVarStmt { ty, vars }, loc))
    }

    fn parse_local_var_name(&mut self) -> PResult<'s, NodeId> {
        let value = self.expect_identifier()?;
        let array_size = self.parse_array_size()?;
        let init = if self.eat(Terminal::Assign).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(self.node(
            NodeData::VarName {
                name: value.as_name(),
                array_size,
                init,
            },
            value.loc,
        ))
    }
}
