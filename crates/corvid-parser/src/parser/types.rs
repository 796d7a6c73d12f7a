//! Type-expression grammar.
//!
//! `elementType ( '*' | '?' )* ( '[' expr? ']' )?`, with a function type
//! `'(' typeList ')' '->' type` tried first via backtracking wherever a
//! type can start with `(`, since a parenthesized type list is otherwise
//! indistinguishable from a tuple type until the `->` is (or isn't) seen.

use corvid_ast::expr::Expression;
use corvid_ast::types::{FloatPrecision, TypeExpr, TypeExprKind};

use super::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    pub(super) fn parse_type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check(TokenKind::LeftParen) {
            let checkpoint = self.checkpoint();
            match self.try_parse_function_or_tuple_type() {
                Ok(type_expr) => return Ok(type_expr),
                Err(_) => self.restore(checkpoint),
            }
        }
        self.parse_suffixed_type()
    }

    /// Three adjacent `.` tokens, the closest this grammar comes to an
    /// ellipsis token — used to mark a variadic function type's tail.
    fn eat_ellipsis(&mut self) -> bool {
        if self.check(TokenKind::Dot)
            && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::Dot)
            && self.peek_at(2).is_some_and(|t| t.kind == TokenKind::Dot)
            && self.next_two_adjacent()
        {
            let _ = self.advance();
            let _ = self.advance();
            let _ = self.advance();
            true
        } else {
            false
        }
    }

    fn try_parse_function_or_tuple_type(&mut self) -> Result<TypeExpr, ParseError> {
        let open = self.expect(TokenKind::LeftParen, "'('")?;
        let mut elements = Vec::new();
        let mut varargs = false;

        if !self.check(TokenKind::RightParen) {
            loop {
                if self.eat_ellipsis() {
                    varargs = true;
                    break;
                }
                elements.push(self.parse_type_expr()?);
                if self.check(TokenKind::Comma) {
                    let _ = self.advance();
                    continue;
                }
                break;
            }
        }
        let _ = self.expect(TokenKind::RightParen, "')'")?;

        if self.check2(TokenKind::Minus, TokenKind::Greater) {
            let _ = self.advance();
            let _ = self.advance();
            let return_type = Box::new(self.parse_type_expr()?);
            let end = *self.current();
            let span = self.span_between(&open, &end);
            return Ok(TypeExpr::new(TypeExprKind::Function { params: elements, return_type, varargs }, span));
        }

        if varargs {
            let span = self.current_span();
            return Err(ParseError::malformed_declaration("variadic parameter list requires a '->' return type", span));
        }

        match elements.len() {
            1 => Ok(elements.into_iter().next().expect("checked len == 1")),
            _ => {
                let end = *self.current();
                let span = self.span_between(&open, &end);
                Ok(TypeExpr::new(TypeExprKind::Tuple(elements), span))
            }
        }
    }

    fn parse_suffixed_type(&mut self) -> Result<TypeExpr, ParseError> {
        let mut type_expr = self.parse_element_type()?;

        loop {
            if self.check(TokenKind::Star) {
                let star = self.advance();
                let span = type_expr.span.combine(&self.span_between(&star, &star));
                type_expr = TypeExpr::new(TypeExprKind::Pointer(Box::new(type_expr)), span);
            } else if self.check(TokenKind::Question) {
                let q = self.advance();
                let span = type_expr.span.combine(&self.span_between(&q, &q));
                type_expr = TypeExpr::new(TypeExprKind::Optional(Box::new(type_expr)), span);
            } else if self.check(TokenKind::LeftBracket) {
                let _ = self.advance();
                let length: Option<Box<Expression>> = if self.check(TokenKind::RightBracket) {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                let close = self.expect(TokenKind::RightBracket, "']'")?;
                let span = type_expr.span.combine(&self.span_between(&close, &close));
                type_expr = TypeExpr::new(TypeExprKind::Array { element: Box::new(type_expr), length }, span);
            } else {
                break;
            }
        }

        Ok(type_expr)
    }

    fn parse_element_type(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check(TokenKind::Any) {
            let tok = self.advance();
            return Ok(TypeExpr::new(TypeExprKind::Any, self.span_between(&tok, &tok)));
        }

        let tok = self.expect(TokenKind::Identifier, "a type")?;
        let span = self.span_between(&tok, &tok);

        if let Some(kind) = builtin_type_kind(tok.lexeme) {
            return Ok(TypeExpr::new(kind, span));
        }

        let mut path = vec![tok.lexeme.to_string()];
        let mut last = tok;
        while self.check(TokenKind::Dot) {
            let _ = self.advance();
            last = self.expect(TokenKind::Identifier, "a type path segment")?;
            path.push(last.lexeme.to_string());
        }

        let mut type_args = Vec::new();
        if self.check(TokenKind::Less) {
            let _ = self.advance();
            if !self.check(TokenKind::Greater) {
                loop {
                    type_args.push(self.parse_type_expr()?);
                    if self.check(TokenKind::Comma) {
                        let _ = self.advance();
                        continue;
                    }
                    break;
                }
            }
            last = self.expect(TokenKind::Greater, "'>'")?;
        }

        let span = self.span_between(&tok, &last);
        Ok(TypeExpr::new(TypeExprKind::Named { path, type_args }, span))
    }
}

fn builtin_type_kind(name: &str) -> Option<TypeExprKind> {
    Some(match name {
        "void" => TypeExprKind::Void,
        "bool" => TypeExprKind::Bool,
        "string" => TypeExprKind::StringT,
        "half" => TypeExprKind::Float(FloatPrecision::Half),
        "float" | "single" => TypeExprKind::Float(FloatPrecision::Single),
        "double" => TypeExprKind::Float(FloatPrecision::Double),
        "decimal" => TypeExprKind::Float(FloatPrecision::Decimal),
        "quad" => TypeExprKind::Float(FloatPrecision::Quad),
        "int" => TypeExprKind::Integer { width: 32, signed: true },
        "uint" => TypeExprKind::Integer { width: 32, signed: false },
        "i8" | "int8" | "byte" | "char" => TypeExprKind::Integer { width: 8, signed: true },
        "u8" | "uint8" | "ubyte" | "uchar" => TypeExprKind::Integer { width: 8, signed: false },
        "i16" | "int16" | "short" => TypeExprKind::Integer { width: 16, signed: true },
        "u16" | "uint16" | "ushort" => TypeExprKind::Integer { width: 16, signed: false },
        "i32" | "int32" => TypeExprKind::Integer { width: 32, signed: true },
        "u32" | "uint32" => TypeExprKind::Integer { width: 32, signed: false },
        "i64" | "int64" | "long" => TypeExprKind::Integer { width: 64, signed: true },
        "u64" | "uint64" | "ulong" => TypeExprKind::Integer { width: 64, signed: false },
        _ => return None,
    })
}
