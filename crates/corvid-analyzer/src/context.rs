//! Semantic analysis context.
//!
//! Where the staged [`crate::resolve`] pass does the actual work, this
//! module is the thin public entry point a driver calls once it has
//! lexed and parsed every file in a compilation.

use corvid_ast::decl::DeclarationArena;
use corvid_ast::File;

use crate::error::ResolveError;
use crate::resolve::{self, ResolvedProgram};

/// The result of running the resolver over a whole compilation: the
/// annotated program plus every error accumulated along the way.
/// Resolution never stops at the first error (spec §4.6, "Failure
/// semantics") — a sibling declaration or statement with no error of its
/// own is always still fully resolved.
pub struct AnalysisContext {
    program: ResolvedProgram,
    errors: Vec<ResolveError>,
}

impl AnalysisContext {
    /// Runs every resolver stage over an already-parsed compilation.
    #[must_use]
    pub fn analyze(files: Vec<File>, decls: DeclarationArena) -> Self {
        let (program, errors) = resolve::resolve_program(files, decls);
        Self { program, errors }
    }

    #[must_use]
    pub const fn program(&self) -> &ResolvedProgram { &self.program }

    pub fn into_program(self) -> ResolvedProgram { self.program }

    #[must_use]
    pub fn errors(&self) -> &[ResolveError] { &self.errors }

    #[must_use]
    pub fn is_ok(&self) -> bool { self.errors.is_empty() }
}
