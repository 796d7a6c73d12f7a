//! Lexer for the corvid language.
//!
//! Tokenizes brace/semicolon-delimited source (no significant
//! indentation): whitespace and `//` line comments are skipped by the
//! `logos` derive itself, while `/* */` block comments — which may
//! nest — are skipped manually by [`Lexer`] before each token, since a
//! regular expression cannot track nesting depth. Tokens carry only a
//! byte `Range<usize>`; turning that into line/column `Position`s is the
//! `SourceFile`'s job (`corvid_source::types::SourceFile::position_from_offset`),
//! looked up lazily wherever a diagnostic or AST span actually needs one.

mod token;

use std::sync::Arc;

pub use token::{Token, TokenKind};
use corvid_source::types::{FileID, Position, SourceSpan};
use logos::Logos;

use crate::diagnostics::{DiagnosticReporter, LexError};

/// A cheap, copyable cursor over source text: byte offset plus 1-indexed
/// line/column, used both to drive the lexer and as the basis for the
/// parser's speculative, backtrackable parses (`snapshot`/`restore`).
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'src> {
    source: &'src str,
    byte_index: usize,
    line: usize,
    column: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct CursorSnapshot {
    byte_index: usize,
    line: usize,
    column: usize,
}

impl<'src> Cursor<'src> {
    #[must_use]
    pub const fn new(source: &'src str) -> Self { Self { source, byte_index: 0, line: 1, column: 1 } }

    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<char> { self.source[self.byte_index..].chars().nth(offset) }

    #[must_use]
    pub fn has_next(&self) -> bool { self.byte_index < self.source.len() }

    pub fn next(&mut self) -> Option<char> {
        let ch = self.source[self.byte_index..].chars().next()?;
        self.byte_index += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    #[must_use]
    pub const fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot { byte_index: self.byte_index, line: self.line, column: self.column }
    }

    pub const fn restore(&mut self, snapshot: CursorSnapshot) {
        self.byte_index = snapshot.byte_index;
        self.line = snapshot.line;
        self.column = snapshot.column;
    }

    #[must_use]
    pub const fn byte_index(&self) -> usize { self.byte_index }

    #[must_use]
    pub const fn position(&self) -> (usize, usize) { (self.line, self.column) }
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    file_id: FileID,
    diagnostic_reporter: Arc<DiagnosticReporter>,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(source: &'src str, file_id: FileID, diagnostic_reporter: Arc<DiagnosticReporter>) -> Self {
        Self { source, cursor: Cursor::new(source), file_id, diagnostic_reporter }
    }

    #[must_use]
    pub const fn file_id(&self) -> FileID { self.file_id }

    #[must_use]
    pub const fn diagnostic_reporter(&self) -> &Arc<DiagnosticReporter> { &self.diagnostic_reporter }

    pub fn into_diagnostic_reporter(self) -> Arc<DiagnosticReporter> { self.diagnostic_reporter }

    fn report_error(&mut self, error: LexError) {
        let mut reporter = (*self.diagnostic_reporter).clone();
        let _ = reporter.error(error);
        self.diagnostic_reporter = Arc::new(reporter);
    }

    fn span_from(&self, start_line: usize, start_col: usize, start_offset: usize) -> SourceSpan {
        let (end_line, end_col) = self.cursor.position();
        let start = Position::new(start_line, start_col, start_offset);
        let end = Position::new(end_line, end_col, self.cursor.byte_index());
        SourceSpan::new(start, end, self.file_id)
    }

    /// Skips `/* */` block comments, including nested ones.
    fn skip_block_comments(&mut self) {
        while self.cursor.peek(0) == Some('/') && self.cursor.peek(1) == Some('*') {
            let (start_line, start_col) = self.cursor.position();
            let start_offset = self.cursor.byte_index();
            let _ = self.cursor.next();
            let _ = self.cursor.next();
            let mut depth = 1usize;

            while depth > 0 {
                match (self.cursor.peek(0), self.cursor.peek(1)) {
                    (Some('/'), Some('*')) => {
                        let _ = self.cursor.next();
                        let _ = self.cursor.next();
                        depth += 1;
                    }
                    (Some('*'), Some('/')) => {
                        let _ = self.cursor.next();
                        let _ = self.cursor.next();
                        depth -= 1;
                    }
                    (Some(_), _) => {
                        let _ = self.cursor.next();
                    }
                    (None, _) => {
                        let span = self.span_from(start_line, start_col, start_offset);
                        self.report_error(LexError::UnterminatedComment { span });
                        return;
                    }
                }
            }
        }
    }

    fn next_token(&mut self) -> Option<Token<'src>> {
        self.skip_block_comments();

        if !self.cursor.has_next() {
            let offset = self.cursor.byte_index();
            return Some(Token::with_empty_lexeme(TokenKind::EndOfFile, offset..offset));
        }

        let start_offset = self.cursor.byte_index();
        let remaining = &self.source[start_offset..];
        let mut sub = TokenKind::lexer(remaining);

        match sub.next() {
            Some(Ok(kind)) => {
                let relative = sub.span();
                // The derive's own skip rules may consume leading
                // whitespace/line comments before the match starts.
                for _ in 0..relative.start {
                    let _ = self.cursor.next();
                }
                let token_start_offset = self.cursor.byte_index();
                let lexeme = &remaining[relative.clone()];
                for _ in 0..lexeme.chars().count() {
                    let _ = self.cursor.next();
                }
                Some(Token::new(kind, lexeme, token_start_offset..self.cursor.byte_index()))
            }
            Some(Err(())) => {
                let (start_line, start_col) = self.cursor.position();
                let bad_char = remaining.chars().next().unwrap_or('\u{0}');
                let _ = self.cursor.next();
                let span = self.span_from(start_line, start_col, start_offset);
                self.report_error(LexError::UnknownCharacter { character: bad_char, span });
                self.next_token()
            }
            None => {
                let offset = self.cursor.byte_index();
                Some(Token::with_empty_lexeme(TokenKind::EndOfFile, offset..offset))
            }
        }
    }

    /// Lexes the remainder of the source eagerly. The parser needs random
    /// access via its own checkpoint/restore, not a strict iterator.
    pub fn tokenize_all(mut self) -> (Vec<Token<'src>>, Arc<DiagnosticReporter>) {
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.next_token() else { break };
            let is_eof = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostic_reporter)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::EndOfFile {
            return None;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use corvid_source::types::{FileID, SourceManager};

    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        let reporter = Arc::new(DiagnosticReporter::new(Arc::new(SourceManager::new())));
        let lexer = Lexer::new(source, FileID::new(1), reporter);
        let (tokens, _) = lexer.tokenize_all();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_function_signature() {
        let kinds = lex("func add(a: int, b: int) -> int { return a + b; }");
        assert_eq!(kinds.first(), Some(&TokenKind::Func));
        assert!(kinds.contains(&TokenKind::Identifier));
        assert!(kinds.contains(&TokenKind::Return));
        assert_eq!(kinds.last(), Some(&TokenKind::EndOfFile));
    }

    #[test]
    fn skips_nested_block_comments() {
        let kinds = lex("/* outer /* inner */ still outer */ var x = 1;");
        assert_eq!(kinds.first(), Some(&TokenKind::Var));
    }

    #[test]
    fn line_comments_are_skipped() {
        let kinds = lex("// a comment\nvar x = 1;");
        assert_eq!(kinds.first(), Some(&TokenKind::Var));
    }
}
