//! Module and import declaration syntax.
//!
//! A `module a.b.c;` declaration binds a file to a node in the module
//! graph built in `corvid_analyzer::modules`; an `import` declaration
//! expands against that graph during resolution.

use corvid_source::types::SourceSpan;

/// How an import path's trailing wildcard expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportWildcard {
    /// No wildcard: import exactly the named module.
    None,
    /// `*`: import this module plus its immediate child modules.
    Children,
    /// `**`: import this module plus every transitive descendant.
    Transitive,
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub path: Vec<String>,
    pub wildcard: ImportWildcard,
    pub span: SourceSpan,
}
