//! The scope stack the resolver pushes and pops while walking a function
//! body.

use corvid_ast::ids::LocalId;

use super::scope::{Scope, ScopeId, ScopeKind};

#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
    next_local: u32,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Pushes a fresh function scope, resetting local-id allocation for
    /// the new function.
    pub fn enter_function(&mut self) -> ScopeId {
        self.next_local = 0;
        self.push(ScopeKind::Function)
    }

    pub fn enter_block(&mut self) -> ScopeId { self.push(ScopeKind::Block) }

    pub fn enter_loop(&mut self) -> ScopeId { self.push(ScopeKind::Loop) }

    fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId::new(u32::try_from(self.scopes.len()).expect("scope table overflow"));
        let parent = self.stack.last().copied();
        self.scopes.push(Scope::new(id, kind, parent));
        self.stack.push(id);
        id
    }

    pub fn exit(&mut self) -> Option<ScopeId> { self.stack.pop() }

    #[must_use]
    pub fn current(&self) -> Option<ScopeId> { self.stack.last().copied() }

    /// Allocates a fresh [`LocalId`] and binds `name` to it in the current
    /// scope.
    pub fn declare_local(&mut self, name: String) -> LocalId {
        let local = LocalId::new(self.next_local);
        self.next_local += 1;
        let scope_id = self.current().expect("declare_local outside any scope");
        self.scope_mut(scope_id).bind_local(name, local);
        local
    }

    /// Walks the current scope chain upward (stopping at the function
    /// scope's own parent, i.e. never past the function boundary) looking
    /// for `name`.
    #[must_use]
    pub fn lookup_local(&self, name: &str) -> Option<LocalId> {
        for &id in self.stack.iter().rev() {
            let scope = self.scope(id);
            if let Some(local) = scope.get_local(name) {
                return Some(local);
            }
        }
        None
    }

    /// The nearest enclosing loop scope, for `break`/`continue`
    /// resolution (invariant: always a lexically-enclosing loop, never
    /// one reached only through a function boundary — the scope stack is
    /// reset at every `enter_function`, so this can never see past it).
    #[must_use]
    pub fn nearest_loop(&self) -> Option<ScopeId> {
        self.stack.iter().rev().find(|&&id| self.scope(id).kind == ScopeKind::Loop).copied()
    }

    fn scope(&self, id: ScopeId) -> &Scope { &self.scopes[id.value() as usize] }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope { &mut self.scopes[id.value() as usize] }
}
