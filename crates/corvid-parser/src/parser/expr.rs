//! Expression grammar: precedence climbing over the full operator table,
//! from assignment (loosest, right-associative) down through unary and
//! postfix (tightest).
//!
//! The lexer only emits single-character operator tokens, so every
//! compound operator (`==`, `&&`, `<<=`, `->`, ...) is composed here from
//! adjacent tokens. Each binary level guards against eating the first
//! half of an operator that belongs to a *looser* level — e.g. `&` backs
//! off when it's actually the start of `&&` or `&=` — so a single
//! left-to-right token stream still parses the way the precedence table
//! intends.

use std::cell::Cell;

use corvid_ast::expr::{AssignOp, BinaryOp, Expression, ExpressionKind, IncDecOp, SizeOfTarget, UnaryOp};

use super::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    pub(super) fn parse_expression(&mut self) -> Result<Expression, ParseError> { self.parse_assignment() }

    fn combine(&self, left: &Expression, right: &Expression) -> corvid_source::types::SourceSpan {
        left.span.combine(&right.span)
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_ternary()?;

        let op = if self.check(TokenKind::Equals) && !self.check2(TokenKind::Equals, TokenKind::Equals) {
            let _ = self.advance();
            Some(AssignOp::Assign)
        } else if self.check2(TokenKind::Plus, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::Add)
        } else if self.check2(TokenKind::Minus, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::Sub)
        } else if self.check2(TokenKind::Star, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::Mul)
        } else if self.check2(TokenKind::Slash, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::Div)
        } else if self.check2(TokenKind::Percent, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::Mod)
        } else if self.check3(TokenKind::Less, TokenKind::Less, TokenKind::Equals) {
            self.advance_n(3);
            Some(AssignOp::Shl)
        } else if self.check3(TokenKind::Greater, TokenKind::Greater, TokenKind::Equals) {
            self.advance_n(3);
            Some(AssignOp::Shr)
        } else if self.check2(TokenKind::Amp, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::BitAnd)
        } else if self.check2(TokenKind::Pipe, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::BitOr)
        } else if self.check2(TokenKind::Caret, TokenKind::Equals) {
            self.advance_n(2);
            Some(AssignOp::BitXor)
        } else {
            None
        };

        let Some(op) = op else { return Ok(left) };
        let value = self.parse_assignment()?;
        let span = self.combine(&left, &value);
        Ok(Expression::new(ExpressionKind::Assignment { op, target: Box::new(left), value: Box::new(value) }, span))
    }

    fn parse_ternary(&mut self) -> Result<Expression, ParseError> {
        let cond = self.parse_logical_or()?;
        if !self.check(TokenKind::Question) {
            return Ok(cond);
        }
        let _ = self.advance();
        let then_branch = self.parse_expression()?;
        let _ = self.expect(TokenKind::Colon, "':' in conditional expression")?;
        let else_branch = self.parse_ternary()?;
        let span = self.combine(&cond, &else_branch);
        Ok(Expression::new(
            ExpressionKind::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    fn parse_logical_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_logical_and()?;
        while self.check2(TokenKind::Pipe, TokenKind::Pipe) {
            self.advance_n(2);
            let right = self.parse_logical_and()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op: BinaryOp::Or, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_bitor()?;
        while self.check2(TokenKind::Amp, TokenKind::Amp) {
            self.advance_n(2);
            let right = self.parse_bitor()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op: BinaryOp::And, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_bitor(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_bitxor()?;
        while self.check(TokenKind::Pipe) && !self.check2(TokenKind::Pipe, TokenKind::Pipe) && !self.check2(TokenKind::Pipe, TokenKind::Equals) {
            let _ = self.advance();
            let right = self.parse_bitxor()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op: BinaryOp::BitOr, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_bitxor(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_bitand()?;
        while self.check(TokenKind::Caret) && !self.check2(TokenKind::Caret, TokenKind::Equals) {
            let _ = self.advance();
            let right = self.parse_bitand()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op: BinaryOp::BitXor, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_bitand(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::Amp) && !self.check2(TokenKind::Amp, TokenKind::Amp) && !self.check2(TokenKind::Amp, TokenKind::Equals) {
            let _ = self.advance();
            let right = self.parse_equality()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op: BinaryOp::BitAnd, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = if self.check2(TokenKind::Equals, TokenKind::Equals) {
                self.advance_n(2);
                BinaryOp::Eq
            } else if self.check2(TokenKind::Bang, TokenKind::Equals) {
                self.advance_n(2);
                BinaryOp::Ne
            } else {
                break;
            };
            let right = self.parse_relational()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_shift()?;
        loop {
            let op = if self.check2(TokenKind::Less, TokenKind::Equals) {
                self.advance_n(2);
                BinaryOp::Le
            } else if self.check2(TokenKind::Greater, TokenKind::Equals) {
                self.advance_n(2);
                BinaryOp::Ge
            } else if self.check(TokenKind::Less) && !self.check2(TokenKind::Less, TokenKind::Less) {
                let _ = self.advance();
                BinaryOp::Lt
            } else if self.check(TokenKind::Greater) && !self.check2(TokenKind::Greater, TokenKind::Greater) {
                let _ = self.advance();
                BinaryOp::Gt
            } else {
                break;
            };
            let right = self.parse_shift()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = if self.check3(TokenKind::Less, TokenKind::Less, TokenKind::Equals) {
                break;
            } else if self.check2(TokenKind::Less, TokenKind::Less) {
                self.advance_n(2);
                BinaryOp::Shl
            } else if self.check3(TokenKind::Greater, TokenKind::Greater, TokenKind::Equals) {
                break;
            } else if self.check2(TokenKind::Greater, TokenKind::Greater) {
                self.advance_n(2);
                BinaryOp::Shr
            } else {
                break;
            };
            let right = self.parse_additive()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.check(TokenKind::Plus)
                && !self.check2(TokenKind::Plus, TokenKind::Plus)
                && !self.check2(TokenKind::Plus, TokenKind::Equals)
            {
                let _ = self.advance();
                BinaryOp::Add
            } else if self.check(TokenKind::Minus)
                && !self.check2(TokenKind::Minus, TokenKind::Minus)
                && !self.check2(TokenKind::Minus, TokenKind::Equals)
                && !self.check2(TokenKind::Minus, TokenKind::Greater)
            {
                let _ = self.advance();
                BinaryOp::Sub
            } else {
                break;
            };
            let right = self.parse_multiplicative()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.check(TokenKind::Star) && !self.check2(TokenKind::Star, TokenKind::Equals) {
                let _ = self.advance();
                BinaryOp::Mul
            } else if self.check(TokenKind::Slash) && !self.check2(TokenKind::Slash, TokenKind::Equals) {
                let _ = self.advance();
                BinaryOp::Div
            } else if self.check(TokenKind::Percent) && !self.check2(TokenKind::Percent, TokenKind::Equals) {
                let _ = self.advance();
                BinaryOp::Mod
            } else {
                break;
            };
            let right = self.parse_unary()?;
            let span = self.combine(&left, &right);
            left = Expression::new(ExpressionKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let unary_op = if self.check(TokenKind::Minus) {
            Some(UnaryOp::Negate)
        } else if self.check(TokenKind::Bang) {
            Some(UnaryOp::Not)
        } else if self.check(TokenKind::Tilde) {
            Some(UnaryOp::BitNot)
        } else if self.check(TokenKind::Amp) && !self.check2(TokenKind::Amp, TokenKind::Amp) {
            Some(UnaryOp::AddressOf)
        } else if self.check(TokenKind::Star) {
            Some(UnaryOp::Deref)
        } else {
            None
        };

        if let Some(op) = unary_op {
            let start = self.advance();
            let operand = self.parse_unary()?;
            let span = self.span_between(&start, &start).combine(&operand.span);
            return Ok(Expression::new(ExpressionKind::Unary { op, operand: Box::new(operand) }, span));
        }

        if self.check2(TokenKind::Plus, TokenKind::Plus) {
            let start = self.advance();
            let _ = self.advance();
            let operand = self.parse_unary()?;
            let span = self.span_between(&start, &start).combine(&operand.span);
            return Ok(Expression::new(
                ExpressionKind::IncDec { op: IncDecOp::Increment, operand: Box::new(operand), is_prefix: true },
                span,
            ));
        }
        if self.check2(TokenKind::Minus, TokenKind::Minus) {
            let start = self.advance();
            let _ = self.advance();
            let operand = self.parse_unary()?;
            let span = self.span_between(&start, &start).combine(&operand.span);
            return Ok(Expression::new(
                ExpressionKind::IncDec { op: IncDecOp::Decrement, operand: Box::new(operand), is_prefix: true },
                span,
            ));
        }

        if self.check(TokenKind::SizeOf) {
            return self.parse_sizeof();
        }
        if self.check(TokenKind::Malloc) {
            return self.parse_malloc();
        }
        if self.check(TokenKind::SNew) {
            return self.parse_stack_new();
        }

        self.parse_postfix()
    }

    fn parse_sizeof(&mut self) -> Result<Expression, ParseError> {
        let start = self.advance(); // `sizeof`
        let _ = self.expect(TokenKind::LeftParen, "'(' after sizeof")?;

        let checkpoint = self.checkpoint();
        let target = match self.parse_type_expr() {
            Ok(type_expr) if self.check(TokenKind::RightParen) => SizeOfTarget::Type(type_expr),
            _ => {
                self.restore(checkpoint);
                SizeOfTarget::Expr(Box::new(self.parse_expression()?))
            }
        };
        let close = self.expect(TokenKind::RightParen, "')'")?;
        let span = self.span_between(&start, &close);
        Ok(Expression::new(ExpressionKind::SizeOf(target), span))
    }

    fn parse_malloc(&mut self) -> Result<Expression, ParseError> {
        let start = self.advance(); // `malloc`
        let _ = self.expect(TokenKind::LeftParen, "'(' after malloc")?;
        let element_type = self.parse_type_expr()?;
        let count = if self.check(TokenKind::Comma) {
            let _ = self.advance();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        let close = self.expect(TokenKind::RightParen, "')'")?;
        let span = self.span_between(&start, &close);
        Ok(Expression::new(ExpressionKind::Malloc { element_type, count }, span))
    }

    fn parse_stack_new(&mut self) -> Result<Expression, ParseError> {
        let start = self.advance(); // `snew`
        let element_type = self.parse_type_expr()?;
        let _ = self.expect(TokenKind::LeftParen, "'(' after snew type")?;
        let args = self.parse_call_args()?;
        let close = self.expect(TokenKind::RightParen, "')'")?;
        let span = self.span_between(&start, &close);
        Ok(Expression::new(ExpressionKind::StackNew { element_type, args }, span))
    }

    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(TokenKind::LeftParen) {
                let _ = self.advance();
                let args = self.parse_call_args()?;
                let close = self.expect(TokenKind::RightParen, "')'")?;
                let span = expr.span.combine(&self.span_between(&close, &close));
                expr = Expression::new(
                    ExpressionKind::Call { callee: Box::new(expr), args, resolved_callee: Cell::new(None) },
                    span,
                );
            } else if self.check(TokenKind::LeftBracket) {
                let _ = self.advance();
                let index = self.parse_expression()?;
                let close = self.expect(TokenKind::RightBracket, "']'")?;
                let span = expr.span.combine(&self.span_between(&close, &close));
                expr = Expression::new(ExpressionKind::Index { base: Box::new(expr), index: Box::new(index) }, span);
            } else if self.check(TokenKind::Dot) {
                let _ = self.advance();
                let name = self.expect(TokenKind::Identifier, "a member name")?;
                let span = expr.span.combine(&self.span_between(&name, &name));
                expr = Expression::new(ExpressionKind::Member { base: Box::new(expr), name: name.lexeme.to_string() }, span);
            } else if self.check2(TokenKind::Plus, TokenKind::Plus) {
                let plus2 = self.peek_at(1).copied().expect("checked by check2");
                self.advance_n(2);
                let span = expr.span.combine(&self.span_between(&plus2, &plus2));
                expr = Expression::new(
                    ExpressionKind::IncDec { op: IncDecOp::Increment, operand: Box::new(expr), is_prefix: false },
                    span,
                );
            } else if self.check2(TokenKind::Minus, TokenKind::Minus) {
                let minus2 = self.peek_at(1).copied().expect("checked by check2");
                self.advance_n(2);
                let span = expr.span.combine(&self.span_between(&minus2, &minus2));
                expr = Expression::new(
                    ExpressionKind::IncDec { op: IncDecOp::Decrement, operand: Box::new(expr), is_prefix: false },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parses a generic call's type-argument list speculatively. The
    /// arguments themselves feed type deduction during resolution rather
    /// than being stored on the `Call` node, so a successful parse here
    /// only needs to consume the right tokens, not retain the types.
    fn try_parse_generic_args(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !(self.check(TokenKind::Less) && self.follows_prev_token()) {
            return false;
        }
        let _ = self.advance();
        loop {
            if self.parse_type_expr().is_err() {
                self.restore(checkpoint);
                return false;
            }
            if self.check(TokenKind::Comma) {
                let _ = self.advance();
                continue;
            }
            break;
        }
        if !self.check(TokenKind::Greater) || !self.peek_at(1).is_some_and(|t| t.kind == TokenKind::LeftParen) {
            self.restore(checkpoint);
            return false;
        }
        let _ = self.advance(); // `>`
        true
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut args = Vec::new();
        if self.check(TokenKind::RightParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.check(TokenKind::Comma) {
                let _ = self.advance();
                continue;
            }
            break;
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let tok = *self.current();
        let span = self.span_between(&tok, &tok);

        match tok.kind {
            TokenKind::IntLiteral | TokenKind::HexLiteral | TokenKind::BinLiteral => {
                let _ = self.advance();
                let value = parse_int_literal(tok.lexeme);
                Ok(Expression::new(ExpressionKind::IntLiteral(value), span))
            }
            TokenKind::FloatLiteral => {
                let _ = self.advance();
                let value = parse_float_literal(tok.lexeme);
                Ok(Expression::new(ExpressionKind::FloatLiteral(value), span))
            }
            TokenKind::True => {
                let _ = self.advance();
                Ok(Expression::new(ExpressionKind::BoolLiteral(true), span))
            }
            TokenKind::False => {
                let _ = self.advance();
                Ok(Expression::new(ExpressionKind::BoolLiteral(false), span))
            }
            TokenKind::Null => {
                let _ = self.advance();
                Ok(Expression::new(ExpressionKind::NullLiteral, span))
            }
            TokenKind::Any => {
                let _ = self.advance();
                Ok(Expression::new(ExpressionKind::AnyLiteral, span))
            }
            TokenKind::CharLiteral => {
                let _ = self.advance();
                let value = parse_char_literal(tok.lexeme);
                Ok(Expression::new(ExpressionKind::CharLiteral(value), span))
            }
            TokenKind::StringLiteral => {
                let _ = self.advance();
                let value = parse_string_literal(tok.lexeme);
                Ok(Expression::new(ExpressionKind::StringLiteral(value), span))
            }
            TokenKind::Identifier => {
                let _ = self.advance();
                let _ = self.try_parse_generic_args();
                Ok(Expression::new(
                    ExpressionKind::Identifier { name: tok.lexeme.to_string(), resolved: Cell::new(None) },
                    span,
                ))
            }
            TokenKind::LeftParen => {
                let _ = self.advance();
                if self.check(TokenKind::RightParen) {
                    let close = self.advance();
                    let span = self.span_between(&tok, &close);
                    return Ok(Expression::new(ExpressionKind::TupleLiteral(Vec::new()), span));
                }
                let mut items = vec![self.parse_expression()?];
                let mut is_tuple = false;
                while self.check(TokenKind::Comma) {
                    is_tuple = true;
                    let _ = self.advance();
                    items.push(self.parse_expression()?);
                }
                let close = self.expect(TokenKind::RightParen, "')'")?;
                let span = self.span_between(&tok, &close);
                if is_tuple {
                    Ok(Expression::new(ExpressionKind::TupleLiteral(items), span))
                } else {
                    Ok(items.into_iter().next().expect("checked non-empty"))
                }
            }
            TokenKind::LeftBrace => {
                let _ = self.advance();
                let mut items = Vec::new();
                if !self.check(TokenKind::RightBrace) {
                    loop {
                        items.push(self.parse_expression()?);
                        if self.check(TokenKind::Comma) {
                            let _ = self.advance();
                            continue;
                        }
                        break;
                    }
                }
                let close = self.expect(TokenKind::RightBrace, "'}'")?;
                let span = self.span_between(&tok, &close);
                Ok(Expression::new(ExpressionKind::InitializerList(items), span))
            }
            _ => Err(ParseError::unexpected_token(tok.kind, "an expression", span)),
        }
    }
}

/// Strips the optional width/signedness suffix (`u8`, `i32`, ...) and
/// underscore digit separators before parsing.
fn parse_int_literal(lexeme: &str) -> i64 {
    if let Some(hex) = lexeme.strip_prefix("0x") {
        let cleaned: String = hex.chars().filter(|c| *c != '_').collect();
        return i64::from_str_radix(&cleaned, 16).unwrap_or(0);
    }
    if let Some(bin) = lexeme.strip_prefix("0b") {
        let cleaned: String = bin.chars().filter(|c| *c != '_').collect();
        return i64::from_str_radix(&cleaned, 2).unwrap_or(0);
    }
    let digits: String = lexeme.chars().take_while(|c| c.is_ascii_digit() || *c == '_').filter(|c| *c != '_').collect();
    digits.parse().unwrap_or(0)
}

fn parse_float_literal(lexeme: &str) -> f64 {
    let cleaned: String = lexeme.chars().filter(|c| *c != '_' && *c != 'f' && *c != 'd').collect();
    cleaned.parse().unwrap_or(0.0)
}

fn parse_char_literal(lexeme: &str) -> char {
    let inner = lexeme.trim_matches('\'');
    unescape(inner).chars().next().unwrap_or('\0')
}

fn parse_string_literal(lexeme: &str) -> String {
    let inner = lexeme.trim_matches('"');
    unescape(inner)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
