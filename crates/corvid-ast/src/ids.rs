//! Opaque `u32` handles shared between the AST and `corvid-analyzer`.
//!
//! Each handle indexes into exactly one owning collection: `DeclId` into a
//! [`crate::decl::DeclarationArena`], `TypeId` into the analyzer's
//! `TypeRegistry`, `LocalId` into a function's local-variable list, and
//! `ModuleId` into the analyzer's module graph. None of them carry a
//! generation counter — nothing in the front end ever frees a slot out
//! from under a live handle.

use std::fmt;

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Builds a handle from a raw index.
            #[must_use]
            pub const fn new(index: u32) -> Self { Self(index) }

            /// Returns the raw index as a `usize` suitable for `Vec` indexing.
            #[must_use]
            pub const fn index(self) -> usize { self.0 as usize }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

index_id!(
    /// Handle into the resolver's `TypeRegistry`, attached in place onto
    /// every `TypeExpr` and `Expression` node once resolution runs.
    TypeId
);
index_id!(
    /// Handle into a [`crate::decl::DeclarationArena`].
    DeclId
);
index_id!(
    /// Handle into a function's local-variable slots (parameters and
    /// block-scoped `var` declarations), assigned during resolution.
    LocalId
);
index_id!(
    /// Handle into the analyzer's module graph.
    ModuleId
);
