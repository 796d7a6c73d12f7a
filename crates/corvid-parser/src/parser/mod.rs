//! Recursive-descent parser for the corvid language.

mod decl;
mod expr;
mod stmt;
mod types;

use std::sync::Arc;

use corvid_ast::decl::DeclarationArena;
use corvid_ast::module::{ImportDecl, ImportWildcard};
use corvid_ast::File;
use corvid_source::types::{FileID, SourceManager, SourceSpan};

use crate::diagnostics::{DiagnosticReporter, ParseError};
use crate::lexer::{Lexer, Token, TokenKind};

/// A lightweight checkpoint over the parser's token cursor, used for
/// speculative parses (generic-argument lists, the function-type suffix)
/// that try a production and backtrack on failure.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: usize,
}

pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    source_manager: Arc<SourceManager>,
    file_id: FileID,
    diagnostic_reporter: DiagnosticReporter,
    decls: DeclarationArena,
}

impl<'src> Parser<'src> {
    #[must_use]
    pub fn new(source: &'src str, file_id: FileID, source_manager: Arc<SourceManager>) -> Self {
        let reporter = Arc::new(DiagnosticReporter::new(source_manager.clone()));
        let lexer = Lexer::new(source, file_id, reporter);
        let (tokens, reporter) = lexer.tokenize_all();
        let diagnostic_reporter = Arc::try_unwrap(reporter).unwrap_or_else(|arc| (*arc).clone());
        Self { tokens, pos: 0, source_manager, file_id, diagnostic_reporter, decls: DeclarationArena::new() }
    }

    // --- cursor helpers ---------------------------------------------------

    fn current(&self) -> &Token<'src> {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().expect("tokens always end in EndOfFile"))
    }

    fn peek_at(&self, offset: usize) -> Option<&Token<'src>> { self.tokens.get(self.pos + offset) }

    fn check(&self, kind: TokenKind) -> bool { self.current().kind == kind }

    /// True when the tokens at `offset` and `offset + 1` are adjacent in
    /// the source (no whitespace/comment between them) — used to compose
    /// compound operators (`&&`, `==`, `->`, `**`) out of the lexer's
    /// single-char tokens, and to enforce the no-space rule for `ident<`
    /// generics.
    fn adjacent_at(&self, offset: usize) -> bool {
        let (Some(a), Some(b)) = (self.peek_at(offset), self.peek_at(offset + 1)) else { return false };
        a.span.end == b.span.start
    }

    fn next_two_adjacent(&self) -> bool { self.adjacent_at(0) }

    /// True when the current token immediately follows the previously
    /// consumed one with no whitespace — the `ident<` rule that tells a
    /// generic-argument list apart from a `<` comparison.
    fn follows_prev_token(&self) -> bool {
        self.pos > 0
            && self
                .tokens
                .get(self.pos - 1)
                .is_some_and(|prev| prev.span.end == self.current().span.start)
    }

    fn check2(&self, first: TokenKind, second: TokenKind) -> bool {
        self.check(first) && self.peek_at(1).is_some_and(|t| t.kind == second) && self.adjacent_at(0)
    }

    fn check3(&self, first: TokenKind, second: TokenKind, third: TokenKind) -> bool {
        self.check2(first, second) && self.peek_at(2).is_some_and(|t| t.kind == third) && self.adjacent_at(1)
    }

    fn advance(&mut self) -> Token<'src> {
        let token = *self.current();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            let _ = self.advance();
        }
    }

    fn span_between(&self, start: &Token<'src>, end: &Token<'src>) -> SourceSpan {
        let Some(file) = self.source_manager.get_file(self.file_id) else { return SourceSpan::default() };
        let start_pos = file.position_from_offset(start.span.start);
        let end_pos = file.position_from_offset(end.span.end);
        SourceSpan::new(start_pos, end_pos, self.file_id)
    }

    fn current_span(&self) -> SourceSpan { self.span_between(self.current(), self.current()) }

    fn checkpoint(&self) -> Checkpoint { Checkpoint { pos: self.pos } }

    fn restore(&mut self, checkpoint: Checkpoint) { self.pos = checkpoint.pos; }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let span = self.current_span();
            Err(ParseError::unexpected_token(self.current().kind, what, span))
        }
    }

    fn report(&mut self, error: ParseError) {
        let _ = self.diagnostic_reporter.error(error);
    }

    /// Skips tokens until the next `;`, `}`, or end of file, consuming the
    /// terminator if it was `;`. This is the parser's only error-recovery
    /// strategy: a broken statement or declaration never aborts the rest
    /// of the file.
    fn recover_to_boundary(&mut self) {
        while !self.check(TokenKind::EndOfFile) {
            if self.check(TokenKind::Semicolon) {
                let _ = self.advance();
                return;
            }
            if self.check(TokenKind::RightBrace) {
                return;
            }
            let _ = self.advance();
        }
    }

    // --- entry point --------------------------------------------------------

    /// Parses an entire file: an optional `module`/`namespace` binding,
    /// zero or more `import` declarations, then top-level declarations,
    /// resynchronizing at statement/declaration boundaries on error.
    pub fn parse_file(mut self) -> (File, DeclarationArena, DiagnosticReporter) {
        let mut module_path = None;
        let mut namespace = None;
        let mut imports = Vec::new();
        let mut declarations = Vec::new();

        if self.check(TokenKind::Module) {
            let _ = self.advance();
            match self.parse_dotted_path() {
                Ok(path) => module_path = Some(path),
                Err(e) => {
                    self.report(e);
                    self.recover_to_boundary();
                }
            }
            if self.check(TokenKind::Semicolon) {
                let _ = self.advance();
            }
        }

        if self.check(TokenKind::Namespace) {
            let _ = self.advance();
            match self.expect(TokenKind::Identifier, "namespace name") {
                Ok(tok) => namespace = Some(tok.lexeme.to_string()),
                Err(e) => {
                    self.report(e);
                    self.recover_to_boundary();
                }
            }
            if self.check(TokenKind::Semicolon) {
                let _ = self.advance();
            }
        }

        while self.check(TokenKind::Import) {
            match self.parse_import() {
                Ok(mut import_list) => imports.append(&mut import_list),
                Err(e) => {
                    self.report(e);
                    self.recover_to_boundary();
                }
            }
        }

        while !self.check(TokenKind::EndOfFile) {
            match self.parse_declaration() {
                Ok(id) => declarations.push(id),
                Err(e) => {
                    self.report(e);
                    self.recover_to_boundary();
                }
            }
        }

        let file = File { file_id: self.file_id, module_path, namespace, imports, declarations };
        (file, self.decls, self.diagnostic_reporter)
    }

    fn parse_dotted_path(&mut self) -> Result<Vec<String>, ParseError> {
        let mut parts = vec![self.expect(TokenKind::Identifier, "a module path segment")?.lexeme.to_string()];
        while self.check(TokenKind::Dot) {
            let _ = self.advance();
            parts.push(self.expect(TokenKind::Identifier, "a module path segment")?.lexeme.to_string());
        }
        Ok(parts)
    }

    /// `import a.b, c.*, d.**;` — a single `import` statement may list
    /// several comma-separated paths, each with its own wildcard suffix.
    /// `**` is lexed as two adjacent `*` tokens.
    fn parse_import(&mut self) -> Result<Vec<ImportDecl>, ParseError> {
        let start = self.advance(); // `import`
        let mut result = Vec::new();

        loop {
            let first = self.expect(TokenKind::Identifier, "an import path")?;
            let mut last = first;
            let mut path = vec![first.lexeme.to_string()];
            let mut wildcard = ImportWildcard::None;

            while self.check(TokenKind::Dot) {
                let _ = self.advance();
                if self.check(TokenKind::Star) {
                    last = self.advance();
                    wildcard = if self.check(TokenKind::Star) && self.next_two_adjacent() {
                        last = self.advance();
                        ImportWildcard::Transitive
                    } else {
                        ImportWildcard::Children
                    };
                    break;
                }
                last = self.expect(TokenKind::Identifier, "an import path segment")?;
                path.push(last.lexeme.to_string());
            }

            let span = self.span_between(&start, &last);
            result.push(ImportDecl { path, wildcard, span });

            if self.check(TokenKind::Comma) {
                let _ = self.advance();
                continue;
            }
            break;
        }

        if self.check(TokenKind::Semicolon) {
            let _ = self.advance();
        }

        Ok(result)
    }
}
