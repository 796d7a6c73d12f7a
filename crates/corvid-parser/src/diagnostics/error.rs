//! Error types for the corvid lexer and parser.

use std::{fmt, io};

use thiserror::Error;
use corvid_source::types::SourceSpan;

use crate::lexer::TokenKind;

/// Severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
    Note,
}

impl DiagnosticLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Note => "note",
        }
    }

    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Info => "\x1b[36m",
            Self::Note => "\x1b[34m",
        }
    }

    #[must_use]
    pub const fn reset_code() -> &'static str { "\x1b[0m" }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// Errors raised while scanning source text into tokens.
#[derive(Debug, Error, Clone)]
pub enum LexError {
    #[error("unknown character '{character}'")]
    UnknownCharacter { character: char, span: SourceSpan },
    #[error("unterminated string literal")]
    UnterminatedString { span: SourceSpan },
    #[error("unterminated block comment")]
    UnterminatedComment { span: SourceSpan },
    #[error("invalid numeric literal: {message}")]
    InvalidNumber { message: String, span: SourceSpan },
    #[error("invalid escape sequence '\\{character}'")]
    InvalidEscape { character: char, span: SourceSpan },
    #[error("{0}")]
    Other(String),
}

impl LexError {
    #[must_use]
    pub const fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::UnknownCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnterminatedComment { span }
            | Self::InvalidNumber { span, .. }
            | Self::InvalidEscape { span, .. } => Some(*span),
            Self::Other(_) => None,
        }
    }
}

/// Errors raised while building the AST from a token stream.
#[derive(Clone, Debug, Error)]
pub enum ParseError {
    #[error("unexpected token '{found}' at {}:{} (expected {expected})", .span.start.line, .span.start.column)]
    UnexpectedToken { expected: String, found: String, span: SourceSpan },
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String, span: SourceSpan },
    #[error("missing '{delimiter}'")]
    MissingDelimiter { delimiter: &'static str, span: SourceSpan },
    #[error("malformed declaration: {message}")]
    MalformedDeclaration { message: String, span: SourceSpan },
    #[error("invalid literal: {message}")]
    InvalidLiteral { message: String, span: SourceSpan },
    #[error("{0}")]
    Other(String),
}

impl ParseError {
    #[must_use]
    pub fn unexpected_token(found: TokenKind, expected: impl Into<String>, span: SourceSpan) -> Self {
        Self::UnexpectedToken { expected: expected.into(), found: format!("{found}"), span }
    }

    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: SourceSpan) -> Self {
        Self::UnexpectedEof { expected: expected.into(), span }
    }

    #[must_use]
    pub const fn missing_delimiter(delimiter: &'static str, span: SourceSpan) -> Self {
        Self::MissingDelimiter { delimiter, span }
    }

    #[must_use]
    pub fn malformed_declaration(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::MalformedDeclaration { message: message.into(), span }
    }

    #[must_use]
    pub fn invalid_literal(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::InvalidLiteral { message: message.into(), span }
    }

    #[must_use]
    pub const fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::MissingDelimiter { span, .. }
            | Self::MalformedDeclaration { span, .. }
            | Self::InvalidLiteral { span, .. } => Some(*span),
            Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self { Self::Other(err.to_string()) }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A diagnostic message with source location information.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub span: SourceSpan,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
    pub code: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub const fn error(message: String, span: SourceSpan) -> Self {
        Self { level: DiagnosticLevel::Error, message, span, notes: Vec::new(), suggestions: Vec::new(), code: None }
    }

    #[must_use]
    pub const fn warning(message: String, span: SourceSpan) -> Self {
        Self { level: DiagnosticLevel::Warning, message, span, notes: Vec::new(), suggestions: Vec::new(), code: None }
    }

    #[must_use]
    pub const fn info(message: String, span: SourceSpan) -> Self {
        Self { level: DiagnosticLevel::Info, message, span, notes: Vec::new(), suggestions: Vec::new(), code: None }
    }

    #[must_use]
    pub const fn note(message: String, span: SourceSpan) -> Self {
        Self { level: DiagnosticLevel::Note, message, span, notes: Vec::new(), suggestions: Vec::new(), code: None }
    }

    #[must_use]
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: String) -> Self {
        self.code = Some(code);
        self
    }
}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        let span = error.span().unwrap_or_default();
        Self::error(error.to_string(), span)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        let span = error.span().unwrap_or_default();
        Self::error(error.to_string(), span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.level.color_code();
        let reset = DiagnosticLevel::reset_code();

        write!(f, "{}{}{}: {}", color, self.level, reset, self.message)?;

        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }

        write!(f, " at {}", self.span)?;

        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  suggestion: {suggestion}")?;
        }

        Ok(())
    }
}
