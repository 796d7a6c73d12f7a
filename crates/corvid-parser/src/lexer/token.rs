//! Token kinds for the corvid language, derived via `logos`.
//!
//! The lexer only ever emits single-character punctuation/operator
//! tokens; multi-character operators (`->`, `==`, `<=`, `&&`, `**`, ...)
//! are composed by the parser from adjacent single-char tokens, matching
//! the grammar's lookahead-gated disambiguation (e.g. `ident<` as the
//! start of a generic-argument list vs. a `<` comparison, which needs to
//! see whether whitespace separates the identifier from the `<`).

use std::fmt;
use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("func")]
    Func,
    #[token("struct")]
    Struct,
    #[token("class")]
    Class,
    #[token("enum")]
    Enum,
    #[token("typedef")]
    Typedef,
    #[token("macro")]
    Macro,
    #[token("module")]
    Module,
    #[token("namespace")]
    Namespace,
    #[token("import")]
    Import,
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("assert")]
    Assert,
    #[token("defer")]
    Defer,
    #[token("free")]
    Free,
    #[token("malloc")]
    Malloc,
    #[token("snew")]
    SNew,
    #[token("sizeof")]
    SizeOf,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("any")]
    Any,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("extern")]
    Extern,
    #[token("operator")]
    Operator,

    // Identifiers and literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9][0-9_]*(u8|u16|u32|u64|i8|i16|i32|i64)?")]
    IntLiteral,
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*")]
    HexLiteral,
    #[regex(r"0b[01][01_]*")]
    BinLiteral,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?(f|d)?")]
    FloatLiteral,
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\]|\\.)'")]
    CharLiteral,

    // Punctuation / operators (single-character only)
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Equals,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,

    EndOfFile,
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{self:?}") }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub span: Range<usize>,
}

impl<'src> Token<'src> {
    #[must_use]
    pub const fn new(kind: TokenKind, lexeme: &'src str, span: Range<usize>) -> Self {
        Self { kind, lexeme, span }
    }

    #[must_use]
    pub const fn with_empty_lexeme(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, lexeme: "", span }
    }

    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool { self.kind == kind }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}", self.lexeme)
        }
    }
}
