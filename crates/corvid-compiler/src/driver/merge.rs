//! Folds a freshly parsed file's own `DeclarationArena` into the
//! compilation's shared arena.
//!
//! Each [`corvid_parser::parser::Parser`] allocates its own arena starting
//! at index 0 (spec §4.3 parses one file at a time), but the resolver
//! needs a single arena so `DeclId`s compare across files. Every `DeclId`
//! the freshly parsed file's declarations embed — a file's own
//! declaration list, a struct/class's method and constructor lists, and a
//! method's `owner` back-reference — gets shifted by the shared arena's
//! length before the file's declarations are appended to it.

use corvid_ast::decl::{DeclarationArena, DeclarationKind};
use corvid_ast::ids::DeclId;
use corvid_ast::File;

fn rebase(id: DeclId, offset: u32) -> DeclId { DeclId::new(id.0 + offset) }

fn rebase_kind(kind: &mut DeclarationKind, offset: u32) {
    match kind {
        DeclarationKind::Function(f) => {
            f.owner = f.owner.map(|id| rebase(id, offset));
        }
        DeclarationKind::Struct(s) => {
            for id in &mut s.methods {
                *id = rebase(*id, offset);
            }
        }
        DeclarationKind::Class(c) => {
            for id in &mut c.methods {
                *id = rebase(*id, offset);
            }
            for id in &mut c.constructors {
                *id = rebase(*id, offset);
            }
        }
        DeclarationKind::Enum(_) | DeclarationKind::Typedef(_) | DeclarationKind::Macro(_) | DeclarationKind::Global(_) => {}
    }
}

/// Appends `file_decls` (freshly parsed, its own zero-based arena) onto
/// `arena`, rebasing every embedded `DeclId` by `arena`'s prior length,
/// and returns `file` with its top-level declaration list rebased to
/// match.
pub(super) fn append_file(arena: &mut DeclarationArena, mut file: File, file_decls: DeclarationArena) -> File {
    let offset = u32::try_from(arena.len()).expect("decl arena overflow");
    for mut decl in file_decls.into_iter() {
        decl.id = rebase(decl.id, offset);
        rebase_kind(&mut decl.kind, offset);
        let id = arena.alloc(decl.kind, decl.span, decl.is_public);
        debug_assert_eq!(id, decl.id, "arena alloc must preserve the rebased id");
    }
    for id in &mut file.declarations {
        *id = rebase(*id, offset);
    }
    file
}
