//! # corvid parser
//!
//! Lexing and recursive-descent parsing for the corvid language: a small
//! statically-typed, brace/semicolon-delimited imperative language.
//!
//! ## Key features
//!
//! - **Error recovery**: resynchronizes at `;`/`}` boundaries and keeps
//!   parsing after an error, so a single pass can report every syntax
//!   problem in a file rather than stopping at the first one.
//! - **Speculative parsing**: ambiguous constructs (generic-argument
//!   lists, the function-type vs. element-type suffix) are resolved by
//!   snapshotting the cursor, attempting a parse, and backtracking on
//!   failure.
//! - **Rich diagnostics**: every error carries a `SourceSpan` and feeds a
//!   `DiagnosticReporter` that can format rustc-style output.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use corvid_source::types::SourceManager;
//! use corvid_parser::parser::Parser;
//!
//! let mut source_manager = SourceManager::new();
//! let file_id = source_manager.add_file("example.cv".into(), "func main() { return 0; }".into());
//! let source_manager = Arc::new(source_manager);
//! let source = "func main() { return 0; }";
//! let parser = Parser::new(source, file_id, source_manager);
//! let (file, decls, reporter) = parser.parse_file();
//! assert!(!reporter.has_errors());
//! ```

pub mod diagnostics;
pub mod lexer;
pub mod parser;
