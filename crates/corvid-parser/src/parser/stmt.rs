//! Statement grammar.

use std::cell::Cell;

use corvid_ast::stmt::{Statement, StatementKind, VarBinding};

use super::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    pub(super) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current().kind {
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let tok = self.advance();
                let end = self.expect(TokenKind::Semicolon, "';' after break")?;
                Ok(Statement::new(StatementKind::Break, self.span_between(&tok, &end)))
            }
            TokenKind::Continue => {
                let tok = self.advance();
                let end = self.expect(TokenKind::Semicolon, "';' after continue")?;
                Ok(Statement::new(StatementKind::Continue, self.span_between(&tok, &end)))
            }
            TokenKind::Assert => self.parse_assert(),
            TokenKind::Free => self.parse_free(),
            TokenKind::Defer => self.parse_defer(),
            TokenKind::Var | TokenKind::Const | TokenKind::Let => self.parse_var_decl_statement(),
            _ => self.parse_expr_statement(),
        }
    }

    pub(super) fn parse_block(&mut self) -> Result<Statement, ParseError> {
        let open = self.expect(TokenKind::LeftBrace, "'{'")?;
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::EndOfFile) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.report(e);
                    self.recover_to_boundary();
                }
            }
        }

        let close = self.expect(TokenKind::RightBrace, "'}'")?;
        let span = self.span_between(&open, &close);
        Ok(Statement::new(StatementKind::Block(statements), span))
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `if`
        let _ = self.expect(TokenKind::LeftParen, "'(' after if")?;
        let cond = self.parse_expression()?;
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.check(TokenKind::Else) {
            let _ = self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        let end_span = else_branch.as_ref().map_or(&then_branch.span, |b| &b.span);
        let span = self.span_between(&start, &start).combine(end_span);
        Ok(Statement::new(StatementKind::If { cond, then_branch, else_branch }, span))
    }

    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `while`
        let _ = self.expect(TokenKind::LeftParen, "'(' after while")?;
        let cond = self.parse_expression()?;
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        let span = self.span_between(&start, &start).combine(&body.span);
        Ok(Statement::new(StatementKind::While { cond, body }, span))
    }

    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `for`
        let _ = self.expect(TokenKind::LeftParen, "'(' after for")?;

        let checkpoint = self.checkpoint();
        if self.check(TokenKind::Identifier) {
            let binding_tok = self.advance();
            if self.check(TokenKind::In) {
                let _ = self.advance();
                let iterable = self.parse_expression()?;
                let _ = self.expect(TokenKind::RightParen, "')'")?;
                let body = Box::new(self.parse_statement()?);
                let span = self.span_between(&start, &start).combine(&body.span);
                return Ok(Statement::new(
                    StatementKind::ForEach {
                        binding: binding_tok.lexeme.to_string(),
                        iterable,
                        body,
                        local_id: Cell::new(None),
                    },
                    span,
                ));
            }
            self.restore(checkpoint);
        }

        let init = if self.check(TokenKind::Semicolon) {
            let _ = self.advance();
            None
        } else {
            Some(Box::new(self.parse_var_decl_or_expr_statement()?))
        };
        let cond = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
        let _ = self.expect(TokenKind::Semicolon, "';'")?;
        let step = if self.check(TokenKind::RightParen) { None } else { Some(self.parse_expression()?) };
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        let span = self.span_between(&start, &start).combine(&body.span);
        Ok(Statement::new(StatementKind::For { init, cond, step, body }, span))
    }

    fn parse_return(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `return`
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
        let end = self.expect(TokenKind::Semicolon, "';' after return")?;
        let span = self.span_between(&start, &end);
        Ok(Statement::new(StatementKind::Return(value), span))
    }

    fn parse_assert(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `assert`
        let _ = self.expect(TokenKind::LeftParen, "'(' after assert")?;
        let condition = self.parse_expression()?;
        let message = if self.check(TokenKind::Comma) {
            let _ = self.advance();
            let tok = self.expect(TokenKind::StringLiteral, "a string literal message")?;
            Some(tok.lexeme.trim_matches('"').to_string())
        } else {
            None
        };
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        let end = self.expect(TokenKind::Semicolon, "';'")?;
        let span = self.span_between(&start, &end);
        Ok(Statement::new(StatementKind::Assert { condition, message }, span))
    }

    fn parse_free(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `free`
        let _ = self.expect(TokenKind::LeftParen, "'(' after free")?;
        let target = self.parse_expression()?;
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        let end = self.expect(TokenKind::Semicolon, "';'")?;
        let span = self.span_between(&start, &end);
        Ok(Statement::new(StatementKind::Free(target), span))
    }

    fn parse_defer(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance(); // `defer`
        let inner = Box::new(self.parse_statement()?);
        let span = self.span_between(&start, &start).combine(&inner.span);
        Ok(Statement::new(StatementKind::Defer(inner), span))
    }

    fn parse_var_decl_statement(&mut self) -> Result<Statement, ParseError> { self.parse_var_decl_or_expr_statement() }

    /// Parses either a `var`/`const`/`let` binding or a bare expression
    /// statement, consuming the trailing `;` itself. Shared between
    /// ordinary statement parsing and a C-style `for`'s init clause.
    /// `let` is `const`'s own keyword: both bind immutably and accept the
    /// same optional `: type` annotation.
    fn parse_var_decl_or_expr_statement(&mut self) -> Result<Statement, ParseError> {
        if self.check(TokenKind::Var) || self.check(TokenKind::Const) || self.check(TokenKind::Let) {
            let start = self.advance();
            let is_const = matches!(start.kind, TokenKind::Const | TokenKind::Let);
            let name_tok = self.expect(TokenKind::Identifier, "a variable name")?;
            let declared_type = if self.check(TokenKind::Colon) {
                let _ = self.advance();
                Some(self.parse_type_expr()?)
            } else {
                None
            };
            let init = if self.check(TokenKind::Equals) {
                let _ = self.advance();
                Some(self.parse_expression()?)
            } else {
                None
            };
            let end = self.expect(TokenKind::Semicolon, "';' after variable declaration")?;
            let span = self.span_between(&start, &end);
            let binding = VarBinding {
                name: name_tok.lexeme.to_string(),
                declared_type,
                init,
                is_const,
                local_id: Cell::new(None),
            };
            return Ok(Statement::new(StatementKind::VarDecl(binding), span));
        }
        self.parse_expr_statement()
    }

    fn parse_expr_statement(&mut self) -> Result<Statement, ParseError> {
        let expr = self.parse_expression()?;
        let end = self.expect(TokenKind::Semicolon, "';' after expression")?;
        let span = expr.span.combine(&self.span_between(&end, &end));
        Ok(Statement::new(StatementKind::Expr(expr), span))
    }
}
