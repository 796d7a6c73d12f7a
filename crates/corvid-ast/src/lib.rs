//! Abstract Syntax Tree for the corvid language.
//!
//! Expression, Statement and Type trees are owned `Box` trees rooted at
//! each [`decl::Declaration`] — matching unique ownership from the root
//! `File` down. The two places the language actually needs sharing
//! (semantic types, and bindings from declarations back to other
//! declarations) go through the opaque handles in [`ids`] instead of
//! borrows, resolved against the arenas in [`decl::DeclarationArena`] and
//! (outside this crate) `corvid_analyzer::types::TypeRegistry`.

pub mod decl;
pub mod expr;
pub mod ids;
pub mod module;
pub mod stmt;
pub mod types;
pub mod visitor;

pub use decl::{Declaration, DeclarationArena, DeclarationKind, File};
pub use expr::{Binding, Expression, ExpressionKind};
pub use ids::{DeclId, LocalId, ModuleId, TypeId};
pub use stmt::{Statement, StatementKind};
pub use types::{FloatPrecision, TypeExpr, TypeExprKind};
