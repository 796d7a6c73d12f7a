// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Typhon Project
// SPDX-FileName: crates/corvid-compiler/src/backend/mod.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! The narrow read-only interface a code generator consumes the resolved
//! program through (spec §6, "Backend query interface"). No backend
//! lives in this repository — C emitter, TCC JIT, and Emscripten targets
//! are all Non-goals — but this is the seam they would plug into.

use corvid_analyzer::ResolvedProgram;
use corvid_ast::ids::{DeclId, TypeId};
use corvid_ast::{Expression, File};

/// A successfully resolved compilation, ready for a backend to query.
///
/// Every method here is a read-only lookup over the [`ResolvedProgram`]
/// the resolver produced; nothing on this type mutates it; a backend
/// cannot feed types or declarations back into the front end.
pub struct Program {
    resolved: ResolvedProgram,
}

impl Program {
    #[must_use]
    pub(crate) const fn new(resolved: ResolvedProgram) -> Self { Self { resolved } }

    /// Every annotated file root, in compilation order.
    #[must_use]
    pub fn files(&self) -> &[File] { &self.resolved.files }

    /// The type an already-resolved expression was annotated with.
    /// `None` if the expression was never visited (e.g. inside a
    /// declaration whose header failed to resolve).
    #[must_use]
    pub fn type_of(&self, expr: &Expression) -> Option<TypeId> { expr.value_type.get() }

    /// The function (or generic instance of one) a resolved call
    /// expression's callee was bound to.
    #[must_use]
    pub fn callee_of(&self, call: &Expression) -> Option<DeclId> {
        match &call.kind {
            corvid_ast::ExpressionKind::Call { resolved_callee, .. } => resolved_callee.get(),
            _ => None,
        }
    }

    /// Every concrete instantiation generated for a generic declaration,
    /// in instantiation order.
    #[must_use]
    pub fn instances_of(&self, generic: DeclId) -> &[DeclId] {
        self.resolved.generic_instances.get(&generic).map_or(&[], Vec::as_slice)
    }

    /// The deterministic external symbol name a function or global
    /// mangled to (spec §6, "Name mangling").
    #[must_use]
    pub fn mangled_name_of(&self, decl: DeclId) -> Option<&str> {
        self.resolved.signatures.get(&decl).map(|sig| sig.mangled_name.as_str())
    }

    /// The program's entry point, if one of the compiled files declared
    /// a valid `main`.
    #[must_use]
    pub fn entry_point(&self) -> Option<DeclId> { self.resolved.entry_point }

    /// The underlying resolved program, for callers that need the full
    /// `TypeRegistry`/`ModuleGraph`/`DeclarationArena` rather than this
    /// narrow view.
    #[must_use]
    pub const fn resolved(&self) -> &ResolvedProgram { &self.resolved }
}
