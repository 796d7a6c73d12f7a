//! The local-variable scope chain used while resolving a function body.

mod scope;
mod table;

pub use scope::{Scope, ScopeId, ScopeKind};
pub use table::SymbolTable;
