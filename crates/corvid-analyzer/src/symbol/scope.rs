//! Lexical scopes inside a function body.
//!
//! Module- and file-level bindings (globals, function overload sets, enum
//! values, macros) are looked up against the [`crate::resolve::FileBindings`]
//! maps built during header resolution, not through here — this scope
//! chain only ever holds parameters and block-scoped `var`/`const`
//! declarations, and is pushed/popped as the resolver walks a function
//! body.

use std::fmt;

use corvid_ast::ids::LocalId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[must_use]
    pub const fn new(id: u32) -> Self { Self(id) }

    #[must_use]
    pub const fn value(self) -> u32 { self.0 }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "scope:{}", self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// A function or method body's outermost scope; parameters live here.
    Function,
    /// An ordinary `{ }` block: `if`/`while`/`for` bodies and bare blocks.
    Block,
    /// A `while`/`for`/foreach body. Marked separately from `Block` so
    /// `break`/`continue` resolution can find the nearest enclosing loop
    /// without crossing a function boundary.
    Loop,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    locals: FxHashMap<String, LocalId>,
}

impl Scope {
    #[must_use]
    pub fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self { id, kind, parent, locals: FxHashMap::default() }
    }

    #[must_use]
    pub fn get_local(&self, name: &str) -> Option<LocalId> { self.locals.get(name).copied() }

    /// Binds `name` in this scope. Shadowing an outer scope's binding of
    /// the same name is allowed; only a duplicate *within* this scope is
    /// rejected by the caller before this is invoked.
    pub fn bind_local(&mut self, name: String, local: LocalId) { self.locals.insert(name, local); }

    #[must_use]
    pub fn has_local(&self, name: &str) -> bool { self.locals.contains_key(name) }
}
