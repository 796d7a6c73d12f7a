//! Resolves a parsed [`TypeExpr`] into an interned [`TypeId`], and the
//! handful of constant-folding helpers array lengths and implicit
//! conversions need.

use corvid_ast::decl::DeclarationKind;
use corvid_ast::expr::{BinaryOp, Expression, ExpressionKind, UnaryOp};
use corvid_ast::ids::TypeId;
use corvid_ast::types::{TypeExpr, TypeExprKind};
use rustc_hash::FxHashMap;

use crate::error::ResolveError;

use super::Resolver;

impl Resolver {
    /// `generic_scope` binds a type parameter name in scope (a function's
    /// or type's own `type_params`, or the deduced arguments while
    /// instantiating a generic) to the `TypeId` it should resolve to.
    pub(super) fn resolve_type_expr(
        &mut self,
        file_idx: usize,
        type_expr: &TypeExpr,
        generic_scope: &FxHashMap<String, TypeId>,
    ) -> TypeId {
        let ty = match &type_expr.kind {
            TypeExprKind::Void => self.registry.void(),
            TypeExprKind::Bool => self.registry.bool(),
            TypeExprKind::Integer { width, signed } => self.registry.integer(*width, *signed),
            TypeExprKind::Float(p) => self.registry.float(*p),
            TypeExprKind::StringT => self.registry.string(),
            TypeExprKind::Any => self.registry.any(),
            TypeExprKind::Pointer(inner) => {
                let id = self.resolve_type_expr(file_idx, inner, generic_scope);
                self.registry.pointer(id)
            }
            TypeExprKind::Optional(inner) => {
                let id = self.resolve_type_expr(file_idx, inner, generic_scope);
                self.registry.optional(id)
            }
            TypeExprKind::Function { params, return_type, varargs } => {
                let param_ids: Vec<TypeId> =
                    params.iter().map(|p| self.resolve_type_expr(file_idx, p, generic_scope)).collect();
                let ret_id = self.resolve_type_expr(file_idx, return_type, generic_scope);
                self.registry.function(param_ids, ret_id, *varargs)
            }
            TypeExprKind::Tuple(elems) => {
                let ids: Vec<TypeId> =
                    elems.iter().map(|e| self.resolve_type_expr(file_idx, e, generic_scope)).collect();
                self.registry.tuple(ids)
            }
            TypeExprKind::Array { element, length } => {
                let elem_id = self.resolve_type_expr(file_idx, element, generic_scope);
                let len = match length {
                    None => None,
                    Some(expr) => match self.fold_const_int(file_idx, expr) {
                        Some(n) if n >= 0 => Some(n as u64),
                        _ => {
                            self.report(ResolveError::NonConstantArrayLength { span: expr.span });
                            None
                        }
                    },
                };
                self.registry.array(elem_id, len)
            }
            TypeExprKind::Named { path, type_args } => {
                return self.resolve_named_type(file_idx, path, type_args, type_expr.span, generic_scope);
            }
        };
        type_expr.resolved.set(Some(ty));
        ty
    }

    fn resolve_named_type(
        &mut self,
        file_idx: usize,
        path: &[String],
        type_args: &[TypeExpr],
        span: corvid_source::types::SourceSpan,
        generic_scope: &FxHashMap<String, TypeId>,
    ) -> TypeId {
        let name = path.last().cloned().unwrap_or_default();

        if type_args.is_empty() {
            if let Some(&bound) = generic_scope.get(&name) {
                return bound;
            }
        }

        let resolved_args: Vec<TypeId> =
            type_args.iter().map(|a| self.resolve_type_expr(file_idx, a, generic_scope)).collect();

        let Some((owner_file, decl_id)) = self.find_type_decl(file_idx, &name) else {
            self.report(ResolveError::UndefinedType { name, span });
            return self.registry.any();
        };

        if !self.is_visible(file_idx, owner_file, self.decls.get(decl_id).is_public) {
            self.report(ResolveError::VisibilityViolation { name, span });
        }

        let type_params = match &self.decls.get(decl_id).kind {
            DeclarationKind::Struct(s) => s.type_params.clone(),
            DeclarationKind::Class(c) => c.type_params.clone(),
            _ => Vec::new(),
        };

        if type_params.is_empty() {
            if !resolved_args.is_empty() {
                self.report(ResolveError::NonGenericGivenArguments { name, span });
            }
            return *self.type_decls.get(&decl_id).unwrap_or(&self.registry.any());
        }

        if resolved_args.len() != type_params.len() {
            if resolved_args.is_empty() {
                self.report(ResolveError::GenericUsedWithoutArguments { name, span });
            } else {
                self.report(ResolveError::TypeArgumentCountMismatch {
                    expected: type_params.len(),
                    found: resolved_args.len(),
                    span,
                });
            }
            return self.registry.any();
        }

        self.instantiate_generic(decl_id, owner_file, &type_params, &resolved_args)
    }

    fn find_type_decl(&self, file_idx: usize, name: &str) -> Option<(usize, corvid_ast::ids::DeclId)> {
        if let Some(&id) = self.bindings[file_idx].locals_by_name.get(name) {
            return Some((file_idx, id));
        }
        for (i, b) in self.bindings.iter().enumerate() {
            if i == file_idx {
                continue;
            }
            if let Some(&id) = b.locals_by_name.get(name) {
                let owner_public = self.decls.get(id).is_public;
                if self.is_visible(file_idx, i, owner_public) {
                    return Some((i, id));
                }
            }
        }
        None
    }

    /// Looks up or creates a generic instantiation: a deep clone of the
    /// generic declaration re-allocated under a fresh `DeclId` and
    /// registered in the instance cache *before* its header/body are
    /// resolved, so a self-referential generic sees itself already
    /// present instead of recursing forever (spec §4.6, generic
    /// instantiation).
    fn instantiate_generic(
        &mut self,
        generic_decl: corvid_ast::ids::DeclId,
        owner_file: usize,
        type_params: &[String],
        type_args: &[TypeId],
    ) -> TypeId {
        if let Some(list) = self.generic_instances.get(&generic_decl) {
            if let Some((_, existing)) = list.iter().find(|(args, _)| {
                args.len() == type_args.len() && args.iter().zip(type_args).all(|(a, b)| self.registry.compare_types(*a, *b))
            }) {
                return *self.type_decls.get(existing).unwrap_or(&self.registry.any());
            }
        }

        let cloned_kind = self.decls.get(generic_decl).kind.clone();
        let span = self.decls.get(generic_decl).span;
        let is_public = self.decls.get(generic_decl).is_public;
        let instance_id = self.decls.alloc(cloned_kind, span, is_public);

        self.generic_instances.entry(generic_decl).or_default().push((type_args.to_vec(), instance_id));

        let scope: FxHashMap<String, TypeId> =
            type_params.iter().cloned().zip(type_args.iter().copied()).collect();

        let name = self.decls.get(instance_id).kind.name().to_string();
        let placeholder = match &self.decls.get(instance_id).kind {
            DeclarationKind::Struct(_) => self.registry.fresh_struct(name, instance_id, type_args.to_vec()),
            DeclarationKind::Class(_) => self.registry.fresh_class(name, instance_id, type_args.to_vec()),
            _ => self.registry.any(),
        };
        self.type_decls.insert(instance_id, placeholder);

        let fields: Vec<corvid_ast::decl::Field> = match &self.decls.get(instance_id).kind {
            DeclarationKind::Struct(s) => s.fields.clone(),
            DeclarationKind::Class(c) => c.fields.clone(),
            _ => Vec::new(),
        };
        for f in &fields {
            let _ = self.resolve_type_expr(owner_file, &f.type_expr, &scope);
        }

        let nested: Vec<corvid_ast::ids::DeclId> = match &self.decls.get(instance_id).kind {
            DeclarationKind::Struct(s) => s.methods.clone(),
            DeclarationKind::Class(c) => c.methods.iter().chain(c.constructors.iter()).copied().collect(),
            _ => Vec::new(),
        };
        for method_id in nested {
            self.resolve_function_header_for(owner_file, method_id);
            self.resolve_function_body_with_scope(owner_file, method_id, &scope);
        }

        placeholder
    }

    /// Whether `expr` folds to a compile-time constant (spec §4.4's
    /// `from_is_constant` parameter).
    pub(super) fn is_constant_expr(&self, file_idx: usize, expr: &Expression) -> bool {
        match &expr.kind {
            ExpressionKind::IntLiteral(_)
            | ExpressionKind::FloatLiteral(_)
            | ExpressionKind::BoolLiteral(_)
            | ExpressionKind::CharLiteral(_)
            | ExpressionKind::StringLiteral(_)
            | ExpressionKind::NullLiteral => true,
            ExpressionKind::Unary { operand, .. } => self.is_constant_expr(file_idx, operand),
            ExpressionKind::Binary { left, right, .. } => {
                self.is_constant_expr(file_idx, left) && self.is_constant_expr(file_idx, right)
            }
            ExpressionKind::TupleLiteral(elems) | ExpressionKind::InitializerList(elems) => {
                elems.iter().all(|e| self.is_constant_expr(file_idx, e))
            }
            ExpressionKind::Identifier { name, .. } => self.bindings[file_idx]
                .locals_by_name
                .get(name)
                .is_some_and(|&id| matches!(&self.decls.get(id).kind, DeclarationKind::Global(g) if g.is_const)),
            _ => false,
        }
    }

    /// Folds an integer constant expression for array-length resolution.
    /// Returns `None` for anything not made of literals and the basic
    /// arithmetic/unary operators.
    pub(super) fn fold_const_int(&self, file_idx: usize, expr: &Expression) -> Option<i64> {
        match &expr.kind {
            ExpressionKind::IntLiteral(n) => Some(*n),
            ExpressionKind::Unary { op: UnaryOp::Negate, operand } => {
                self.fold_const_int(file_idx, operand).map(|n| -n)
            }
            ExpressionKind::Binary { op, left, right } => {
                let l = self.fold_const_int(file_idx, left)?;
                let r = self.fold_const_int(file_idx, right)?;
                match op {
                    BinaryOp::Add => Some(l + r),
                    BinaryOp::Sub => Some(l - r),
                    BinaryOp::Mul => Some(l * r),
                    BinaryOp::Div if r != 0 => Some(l / r),
                    _ => None,
                }
            }
            ExpressionKind::Identifier { name, .. } => {
                let id = *self.bindings[file_idx].locals_by_name.get(name)?;
                let DeclarationKind::Global(g) = &self.decls.get(id).kind else { return None };
                if !g.is_const {
                    return None;
                }
                self.fold_const_int(file_idx, g.init.as_ref()?)
            }
            _ => None,
        }
    }
}
