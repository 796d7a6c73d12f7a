//! Top-level declaration grammar: functions, structs, classes, enums,
//! typedefs, macros, and globals.
//!
//! Visibility defaults to public; an explicit `private` narrows a
//! declaration to its own module. A function whose name matches its
//! owning struct/class is treated as a constructor; `operator` + a
//! symbol declares an operator overload, disambiguated unary vs. binary
//! by its parameter count (zero extra params for unary, one for binary)
//! since several symbols (`-`, `*`, `&`) are valid as either.

use corvid_ast::decl::{
    ClassDecl, DeclarationKind, EnumDecl, Field, FunctionDecl, GlobalDecl, MacroDecl, OperatorKind, Param,
    StructDecl, TypedefDecl,
};
use corvid_ast::expr::{BinaryOp, UnaryOp};
use corvid_ast::ids::DeclId;

use super::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    pub(super) fn parse_declaration(&mut self) -> Result<DeclId, ParseError> {
        let is_public = if self.check(TokenKind::Private) {
            let _ = self.advance();
            false
        } else {
            if self.check(TokenKind::Public) {
                let _ = self.advance();
            }
            true
        };

        let is_extern = if self.check(TokenKind::Extern) {
            let _ = self.advance();
            true
        } else {
            false
        };

        match self.current().kind {
            TokenKind::Func => self.parse_function_decl(is_public, is_extern, None),
            TokenKind::Operator => self.parse_operator_decl(is_public, None),
            TokenKind::Struct => self.parse_struct_decl(is_public),
            TokenKind::Class => self.parse_class_decl(is_public),
            TokenKind::Enum => self.parse_enum_decl(is_public),
            TokenKind::Typedef => self.parse_typedef_decl(is_public),
            TokenKind::Macro => self.parse_macro_decl(is_public),
            TokenKind::Var | TokenKind::Const => self.parse_global_decl(is_public, is_extern),
            _ => {
                let span = self.current_span();
                Err(ParseError::malformed_declaration(
                    format!("expected a declaration, found '{}'", self.current().kind),
                    span,
                ))
            }
        }
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let _ = self.expect(TokenKind::LeftParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let type_expr = self.parse_type_expr()?;
                let name = self.expect(TokenKind::Identifier, "a parameter name")?;
                params.push(Param { name: name.lexeme.to_string(), type_expr });
                if self.check(TokenKind::Comma) {
                    let _ = self.advance();
                    continue;
                }
                break;
            }
        }
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        Ok(params)
    }

    fn parse_type_params(&mut self) -> Result<Vec<String>, ParseError> {
        if !self.check(TokenKind::Less) {
            return Ok(Vec::new());
        }
        let _ = self.advance();
        let mut names = Vec::new();
        loop {
            names.push(self.expect(TokenKind::Identifier, "a type parameter name")?.lexeme.to_string());
            if self.check(TokenKind::Comma) {
                let _ = self.advance();
                continue;
            }
            break;
        }
        let _ = self.expect(TokenKind::Greater, "'>'")?;
        Ok(names)
    }

    fn parse_function_decl(
        &mut self,
        is_public: bool,
        is_extern: bool,
        owner: Option<DeclId>,
    ) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `func`
        let name_tok = self.expect(TokenKind::Identifier, "a function name")?;
        let name = name_tok.lexeme.to_string();
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;

        let return_type =
            if self.check2(TokenKind::Minus, TokenKind::Greater) {
                self.advance_n(2);
                Some(self.parse_type_expr()?)
            } else {
                None
            };

        let (body, end_span) = self.parse_function_body(is_extern)?;
        let is_constructor = owner.is_some_and(|o| self.decls.get(o).kind.name() == name.as_str());
        let span = self.span_between(&start, &start).combine(&end_span);

        let decl = FunctionDecl {
            name,
            type_params,
            params,
            return_type,
            varargs: false,
            body,
            is_extern,
            owner,
            is_constructor,
            is_operator: None,
            is_entry_point: false,
        };
        Ok(self.decls.alloc(DeclarationKind::Function(decl), span, is_public))
    }

    /// Consumes either a `;` (extern prototype / forward declaration) or a
    /// `{ ... }` body, returning the parsed statements and a span to
    /// extend the declaration's own span with.
    fn parse_function_body(
        &mut self,
        is_extern: bool,
    ) -> Result<(Option<Vec<corvid_ast::stmt::Statement>>, corvid_source::types::SourceSpan), ParseError> {
        if self.check(TokenKind::Semicolon) {
            let end = self.advance();
            return Ok((None, self.span_between(&end, &end)));
        }
        if is_extern {
            let span = self.current_span();
            return Err(ParseError::malformed_declaration("extern function must end in ';'", span));
        }
        let block = self.parse_block()?;
        let corvid_ast::stmt::StatementKind::Block(statements) = block.kind else {
            unreachable!("parse_block always returns StatementKind::Block")
        };
        Ok((Some(statements), block.span))
    }

    fn parse_operator_decl(&mut self, is_public: bool, owner: Option<DeclId>) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `operator`
        let (binary_candidate, unary_candidate) = self.parse_operator_symbol()?;
        let params = self.parse_params()?;

        let return_type = if self.check2(TokenKind::Minus, TokenKind::Greater) {
            self.advance_n(2);
            Some(self.parse_type_expr()?)
        } else {
            None
        };

        let operator_kind = if params.is_empty() {
            unary_candidate.map(OperatorKind::Unary)
        } else {
            binary_candidate.map(OperatorKind::Binary)
        };
        let Some(operator_kind) = operator_kind else {
            let span = self.current_span();
            return Err(ParseError::malformed_declaration(
                "operator symbol is not valid with this many parameters",
                span,
            ));
        };

        let (body, end_span) = self.parse_function_body(false)?;
        let span = self.span_between(&start, &start).combine(&end_span);

        let decl = FunctionDecl {
            name: format!("operator{operator_kind:?}"),
            type_params: Vec::new(),
            params,
            return_type,
            varargs: false,
            body,
            is_extern: false,
            owner,
            is_constructor: false,
            is_operator: Some(operator_kind),
            is_entry_point: false,
        };
        Ok(self.decls.alloc(DeclarationKind::Function(decl), span, is_public))
    }

    #[allow(clippy::type_complexity)]
    fn parse_operator_symbol(&mut self) -> Result<(Option<BinaryOp>, Option<UnaryOp>), ParseError> {
        let span = self.current_span();
        let result = match self.current().kind {
            TokenKind::Plus => {
                let _ = self.advance();
                (Some(BinaryOp::Add), None)
            }
            TokenKind::Minus => {
                let _ = self.advance();
                (Some(BinaryOp::Sub), Some(UnaryOp::Negate))
            }
            TokenKind::Star => {
                let _ = self.advance();
                (Some(BinaryOp::Mul), Some(UnaryOp::Deref))
            }
            TokenKind::Slash => {
                let _ = self.advance();
                (Some(BinaryOp::Div), None)
            }
            TokenKind::Percent => {
                let _ = self.advance();
                (Some(BinaryOp::Mod), None)
            }
            TokenKind::Caret => {
                let _ = self.advance();
                (Some(BinaryOp::BitXor), None)
            }
            TokenKind::Tilde => {
                let _ = self.advance();
                (None, Some(UnaryOp::BitNot))
            }
            TokenKind::Amp if self.check2(TokenKind::Amp, TokenKind::Amp) => {
                self.advance_n(2);
                (Some(BinaryOp::And), None)
            }
            TokenKind::Amp => {
                let _ = self.advance();
                (Some(BinaryOp::BitAnd), Some(UnaryOp::AddressOf))
            }
            TokenKind::Pipe if self.check2(TokenKind::Pipe, TokenKind::Pipe) => {
                self.advance_n(2);
                (Some(BinaryOp::Or), None)
            }
            TokenKind::Pipe => {
                let _ = self.advance();
                (Some(BinaryOp::BitOr), None)
            }
            TokenKind::Bang if self.check2(TokenKind::Bang, TokenKind::Equals) => {
                self.advance_n(2);
                (Some(BinaryOp::Ne), None)
            }
            TokenKind::Bang => {
                let _ = self.advance();
                (None, Some(UnaryOp::Not))
            }
            TokenKind::Equals if self.check2(TokenKind::Equals, TokenKind::Equals) => {
                self.advance_n(2);
                (Some(BinaryOp::Eq), None)
            }
            TokenKind::Less if self.check2(TokenKind::Less, TokenKind::Equals) => {
                self.advance_n(2);
                (Some(BinaryOp::Le), None)
            }
            TokenKind::Less if self.check2(TokenKind::Less, TokenKind::Less) => {
                self.advance_n(2);
                (Some(BinaryOp::Shl), None)
            }
            TokenKind::Less => {
                let _ = self.advance();
                (Some(BinaryOp::Lt), None)
            }
            TokenKind::Greater if self.check2(TokenKind::Greater, TokenKind::Equals) => {
                self.advance_n(2);
                (Some(BinaryOp::Ge), None)
            }
            TokenKind::Greater if self.check2(TokenKind::Greater, TokenKind::Greater) => {
                self.advance_n(2);
                (Some(BinaryOp::Shr), None)
            }
            TokenKind::Greater => {
                let _ = self.advance();
                (Some(BinaryOp::Gt), None)
            }
            found => return Err(ParseError::unexpected_token(found, "an operator symbol", span)),
        };
        Ok(result)
    }

    fn parse_struct_decl(&mut self, is_public: bool) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `struct`
        let name_tok = self.expect(TokenKind::Identifier, "a struct name")?;
        let name = name_tok.lexeme.to_string();
        let type_params = self.parse_type_params()?;

        if self.check(TokenKind::Semicolon) {
            let end = self.advance();
            let span = self.span_between(&start, &end);
            let decl = StructDecl { name, type_params, fields: Vec::new(), methods: Vec::new(), has_body: false };
            return Ok(self.decls.alloc(DeclarationKind::Struct(decl), span, is_public));
        }

        let open = self.expect(TokenKind::LeftBrace, "'{'")?;
        let id = self.decls.alloc(
            DeclarationKind::Struct(StructDecl {
                name,
                type_params,
                fields: Vec::new(),
                methods: Vec::new(),
                has_body: true,
            }),
            self.span_between(&start, &open),
            is_public,
        );

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::EndOfFile) {
            if self.check(TokenKind::Func) {
                match self.parse_function_decl(true, false, Some(id)) {
                    Ok(method_id) => methods.push(method_id),
                    Err(e) => {
                        self.report(e);
                        self.recover_to_boundary();
                    }
                }
            } else if self.check(TokenKind::Operator) {
                match self.parse_operator_decl(true, Some(id)) {
                    Ok(method_id) => methods.push(method_id),
                    Err(e) => {
                        self.report(e);
                        self.recover_to_boundary();
                    }
                }
            } else {
                match self.parse_field() {
                    Ok(field) => fields.push(field),
                    Err(e) => {
                        self.report(e);
                        self.recover_to_boundary();
                    }
                }
            }
        }
        let close = self.expect(TokenKind::RightBrace, "'}'")?;

        let decl = self.decls.get_mut(id);
        decl.span = self.span_between(&start, &close);
        if let DeclarationKind::Struct(s) = &mut decl.kind {
            s.fields = fields;
            s.methods = methods;
        }
        Ok(id)
    }

    fn parse_class_decl(&mut self, is_public: bool) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `class`
        let name_tok = self.expect(TokenKind::Identifier, "a class name")?;
        let name = name_tok.lexeme.to_string();
        let type_params = self.parse_type_params()?;
        let base = if self.check(TokenKind::Colon) {
            let _ = self.advance();
            Some(self.expect(TokenKind::Identifier, "a base class name")?.lexeme.to_string())
        } else {
            None
        };

        let open = self.expect(TokenKind::LeftBrace, "'{'")?;
        let id = self.decls.alloc(
            DeclarationKind::Class(ClassDecl {
                name: name.clone(),
                type_params,
                fields: Vec::new(),
                methods: Vec::new(),
                constructors: Vec::new(),
                base,
            }),
            self.span_between(&start, &open),
            is_public,
        );

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut constructors = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::EndOfFile) {
            if self.check(TokenKind::Func) {
                match self.parse_function_decl(true, false, Some(id)) {
                    Ok(method_id) => {
                        if self.decls.get(method_id).kind.name() == name.as_str() {
                            constructors.push(method_id);
                        } else {
                            methods.push(method_id);
                        }
                    }
                    Err(e) => {
                        self.report(e);
                        self.recover_to_boundary();
                    }
                }
            } else if self.check(TokenKind::Operator) {
                match self.parse_operator_decl(true, Some(id)) {
                    Ok(method_id) => methods.push(method_id),
                    Err(e) => {
                        self.report(e);
                        self.recover_to_boundary();
                    }
                }
            } else {
                match self.parse_field() {
                    Ok(field) => fields.push(field),
                    Err(e) => {
                        self.report(e);
                        self.recover_to_boundary();
                    }
                }
            }
        }
        let close = self.expect(TokenKind::RightBrace, "'}'")?;

        let decl = self.decls.get_mut(id);
        decl.span = self.span_between(&start, &close);
        if let DeclarationKind::Class(c) = &mut decl.kind {
            c.fields = fields;
            c.methods = methods;
            c.constructors = constructors;
        }
        Ok(id)
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let type_expr = self.parse_type_expr()?;
        let name = self.expect(TokenKind::Identifier, "a field name")?;
        let _ = self.expect(TokenKind::Semicolon, "';' after a field declaration")?;
        Ok(Field { name: name.lexeme.to_string(), type_expr })
    }

    fn parse_enum_decl(&mut self, is_public: bool) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `enum`
        let name = self.expect(TokenKind::Identifier, "an enum name")?.lexeme.to_string();
        let _ = self.expect(TokenKind::LeftBrace, "'{'")?;

        let mut values = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::EndOfFile) {
            let value_name = self.expect(TokenKind::Identifier, "an enum value name")?.lexeme.to_string();
            let explicit_value = if self.check(TokenKind::Equals) {
                let _ = self.advance();
                Some(self.parse_expression()?)
            } else {
                None
            };
            values.push((value_name, explicit_value));
            if self.check(TokenKind::Comma) {
                let _ = self.advance();
                continue;
            }
            break;
        }
        let close = self.expect(TokenKind::RightBrace, "'}'")?;
        let span = self.span_between(&start, &close);
        Ok(self.decls.alloc(DeclarationKind::Enum(EnumDecl { name, values }), span, is_public))
    }

    fn parse_typedef_decl(&mut self, is_public: bool) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `typedef`
        let name = self.expect(TokenKind::Identifier, "a typedef name")?.lexeme.to_string();
        let _ = self.expect(TokenKind::Equals, "'=' in typedef")?;
        let target = self.parse_type_expr()?;
        let end = self.expect(TokenKind::Semicolon, "';' after typedef")?;
        let span = self.span_between(&start, &end);
        Ok(self.decls.alloc(DeclarationKind::Typedef(TypedefDecl { name, target }), span, is_public))
    }

    fn parse_macro_decl(&mut self, is_public: bool) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `macro`
        let name = self.expect(TokenKind::Identifier, "a macro name")?.lexeme.to_string();
        let _ = self.expect(TokenKind::LeftParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.expect(TokenKind::Identifier, "a macro parameter")?.lexeme.to_string());
                if self.check(TokenKind::Comma) {
                    let _ = self.advance();
                    continue;
                }
                break;
            }
        }
        let _ = self.expect(TokenKind::RightParen, "')'")?;
        let _ = self.expect(TokenKind::Equals, "'=' before a macro body")?;
        let body = self.parse_expression()?;
        let end = self.expect(TokenKind::Semicolon, "';' after macro")?;
        let span = self.span_between(&start, &end);
        Ok(self.decls.alloc(DeclarationKind::Macro(MacroDecl { name, params, body }), span, is_public))
    }

    fn parse_global_decl(&mut self, is_public: bool, is_extern: bool) -> Result<DeclId, ParseError> {
        let start = self.advance(); // `var` or `const`
        let is_const = start.kind == TokenKind::Const;
        let name = self.expect(TokenKind::Identifier, "a global variable name")?.lexeme.to_string();
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
        let end = self.expect(TokenKind::Semicolon, "';' after global declaration")?;
        let span = self.span_between(&start, &end);
        let decl = GlobalDecl { name, declared_type, init, is_const, is_extern };
        Ok(self.decls.alloc(DeclarationKind::Global(decl), span, is_public))
    }
}
