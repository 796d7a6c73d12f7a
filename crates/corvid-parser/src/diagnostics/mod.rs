//! Diagnostics and error reporting for the lexer and parser.

mod error;
mod reporter;

pub use error::{Diagnostic, DiagnosticLevel, LexError, ParseError, ParseResult};
pub use reporter::{DiagnosticReporter, format_error_context, format_with_line_numbers};
use corvid_source::types::SourceSpan;

/// Creates an "expected X, found Y" diagnostic.
#[must_use]
pub fn expected_found_error(expected: &str, found: &str, span: SourceSpan) -> Diagnostic {
    Diagnostic::error(format!("Expected {expected}, found {found}"), span)
        .with_suggestion(format!("Try using {expected} here"))
}

/// Creates an "unexpected end of file" diagnostic.
#[must_use]
pub fn unexpected_eof_error(expected: &str, span: SourceSpan) -> Diagnostic {
    Diagnostic::error(format!("Unexpected end of file, expected {expected}"), span)
}

/// Creates a "missing X" diagnostic.
#[must_use]
pub fn missing_error(missing: &str, span: SourceSpan) -> Diagnostic {
    Diagnostic::error(format!("Missing {missing}"), span).with_suggestion(format!("Add {missing} here"))
}

/// Creates a "redefinition" diagnostic.
#[must_use]
pub fn redefinition_error(name: &str, span: SourceSpan, original_span: SourceSpan) -> Diagnostic {
    Diagnostic::error(format!("Redefinition of '{name}'"), span)
        .with_note(format!("'{name}' was previously defined at {original_span}"))
}

/// Creates an "undefined" diagnostic.
#[must_use]
pub fn undefined_error(kind: &str, name: &str, span: SourceSpan) -> Diagnostic {
    Diagnostic::error(format!("Undefined {kind}: '{name}'"), span)
}
