//! Resolves function/method/constructor bodies: statements, expressions,
//! lvalue rules, call overload resolution, and operator-overload fallback
//! search (spec §4.6).

use corvid_ast::decl::{DeclarationKind, OperatorKind};
use corvid_ast::expr::{AssignOp, BinaryOp, Binding, Expression, ExpressionKind, UnaryOp};
use corvid_ast::ids::{DeclId, LocalId, TypeId};
use corvid_ast::stmt::{Statement, StatementKind};
use rustc_hash::FxHashMap;

use crate::error::ResolveError;
use crate::symbol::SymbolTable;
use crate::types::Type;

use super::overload::{generic_param_mask, pick_overload, score_overload};
use super::Resolver;

/// Mutable state threaded through one function body's resolution: the
/// scope chain and the type each live [`LocalId`] was declared with.
struct BodyState<'a> {
    file_idx: usize,
    generic_scope: &'a FxHashMap<String, TypeId>,
    symtab: SymbolTable,
    local_types: FxHashMap<LocalId, TypeId>,
    return_type: TypeId,
}

impl Resolver {
    pub(super) fn resolve_function_body(&mut self, file_idx: usize, id: DeclId) {
        self.resolve_function_body_with_scope(file_idx, id, &FxHashMap::default());
    }

    pub(super) fn resolve_function_body_with_scope(
        &mut self,
        file_idx: usize,
        id: DeclId,
        generic_scope: &FxHashMap<String, TypeId>,
    ) {
        let (params, return_type_expr, body, owner) = {
            let DeclarationKind::Function(f) = &self.decls.get(id).kind else { return };
            (f.params.clone(), f.return_type.clone(), f.body.clone(), f.owner)
        };
        let Some(body) = body else { return };

        let return_type = return_type_expr
            .as_ref()
            .map_or_else(|| self.registry.void(), |t| self.resolve_type_expr(file_idx, t, generic_scope));

        let mut state =
            BodyState { file_idx, generic_scope, symtab: SymbolTable::new(), local_types: FxHashMap::default(), return_type };
        state.symtab.enter_function();

        for p in &params {
            let ty = self.resolve_type_expr(file_idx, &p.type_expr, generic_scope);
            let local = state.symtab.declare_local(p.name.clone());
            state.local_types.insert(local, ty);
        }
        if let Some(owner_id) = owner {
            if let Some(&owner_ty) = self.type_decls.get(&owner_id) {
                let ptr_ty = self.registry.pointer(owner_ty);
                let local = state.symtab.declare_local("this".to_string());
                state.local_types.insert(local, ptr_ty);
            }
        }

        for stmt in &body {
            self.resolve_statement(stmt, &mut state);
        }
    }

    /// Resolves a top-level expression with no enclosing function body
    /// (a global initializer, an enum value, a default-argument
    /// expression): locals are never visible here, only globals,
    /// functions, enum values, and macros.
    pub(super) fn resolve_expression(&mut self, file_idx: usize, expr: &Expression, generic_scope: &FxHashMap<String, TypeId>) -> TypeId {
        let mut state = BodyState {
            file_idx,
            generic_scope,
            symtab: SymbolTable::new(),
            local_types: FxHashMap::default(),
            return_type: self.registry.void(),
        };
        state.symtab.enter_function();
        self.resolve_expr(expr, &mut state)
    }

    fn resolve_statement(&mut self, stmt: &Statement, state: &mut BodyState<'_>) {
        match &stmt.kind {
            StatementKind::Expr(e) => {
                self.resolve_expr(e, state);
            }
            StatementKind::VarDecl(binding) => {
                let declared = binding.declared_type.as_ref().map(|t| self.resolve_type_expr(state.file_idx, t, state.generic_scope));
                let init_ty = binding.init.as_ref().map(|e| self.resolve_expr(e, state));
                let ty = declared.or(init_ty).unwrap_or_else(|| self.registry.any());
                if let (Some(d), Some(i), Some(init)) = (declared, init_ty, binding.init.as_ref()) {
                    let is_const_src = self.is_constant_expr(state.file_idx, init);
                    if !self.registry.can_convert_implicit(i, d, is_const_src) {
                        self.report(ResolveError::IncompatibleInitializer {
                            expected: self.registry.pretty_print(d),
                            found: self.registry.pretty_print(i),
                            span: init.span,
                        });
                    }
                }
                let local = state.symtab.declare_local(binding.name.clone());
                state.local_types.insert(local, ty);
                binding.local_id.set(Some(local));
            }
            StatementKind::Block(stmts) => {
                state.symtab.enter_block();
                for s in stmts {
                    self.resolve_statement(s, state);
                }
                state.symtab.exit();
            }
            StatementKind::If { cond, then_branch, else_branch } => {
                self.resolve_expr(cond, state);
                self.resolve_statement(then_branch, state);
                if let Some(e) = else_branch {
                    self.resolve_statement(e, state);
                }
            }
            StatementKind::While { cond, body } => {
                self.resolve_expr(cond, state);
                state.symtab.enter_loop();
                self.resolve_statement(body, state);
                state.symtab.exit();
            }
            StatementKind::For { init, cond, step, body } => {
                state.symtab.enter_block();
                if let Some(init) = init {
                    self.resolve_statement(init, state);
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond, state);
                }
                if let Some(step) = step {
                    self.resolve_expr(step, state);
                }
                state.symtab.enter_loop();
                self.resolve_statement(body, state);
                state.symtab.exit();
                state.symtab.exit();
            }
            StatementKind::ForEach { binding, iterable, body, local_id } => {
                let iter_ty = self.resolve_expr(iterable, state);
                let elem_ty = match self.registry.get(self.registry.unwrap(iter_ty)) {
                    Type::Array { element, .. } => *element,
                    Type::Pointer(elem) => *elem,
                    _ => self.registry.any(),
                };
                state.symtab.enter_loop();
                let local = state.symtab.declare_local(binding.clone());
                state.local_types.insert(local, elem_ty);
                local_id.set(Some(local));
                self.resolve_statement(body, state);
                state.symtab.exit();
            }
            StatementKind::Return(value) => {
                let span = stmt.span;
                match value {
                    Some(e) => {
                        let ty = self.resolve_expr(e, state);
                        let is_const = self.is_constant_expr(state.file_idx, e);
                        if !self.registry.can_convert_implicit(ty, state.return_type, is_const) {
                            self.report(ResolveError::IncompatibleReturn {
                                expected: self.registry.pretty_print(state.return_type),
                                found: self.registry.pretty_print(ty),
                                span: e.span,
                            });
                        }
                    }
                    None => {
                        if !matches!(self.registry.get(self.registry.unwrap(state.return_type)), Type::Void) {
                            self.report(ResolveError::IncompatibleReturn {
                                expected: self.registry.pretty_print(state.return_type),
                                found: "void".to_string(),
                                span,
                            });
                        }
                    }
                }
            }
            StatementKind::Break | StatementKind::Continue => {
                // `nearest_loop` realizes the branch-destination invariant;
                // a `None` here means the construct escaped every
                // enclosing loop, a parser/earlier-stage bug rather than
                // a user error, so there is nothing to additionally
                // report beyond what scope discipline already prevents.
                let _ = state.symtab.nearest_loop();
            }
            StatementKind::Assert { condition, .. } => {
                self.resolve_expr(condition, state);
            }
            StatementKind::Free(e) => {
                self.resolve_expr(e, state);
            }
            StatementKind::Defer(s) => {
                self.resolve_statement(s, state);
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expression, state: &mut BodyState<'_>) -> TypeId {
        let (ty, is_lvalue) = self.resolve_expr_inner(expr, state);
        expr.value_type.set(Some(ty));
        expr.lvalue.set(is_lvalue);
        ty
    }

    fn resolve_expr_inner(&mut self, expr: &Expression, state: &mut BodyState<'_>) -> (TypeId, bool) {
        match &expr.kind {
            ExpressionKind::IntLiteral(_) => (self.registry.integer(32, true), false),
            ExpressionKind::FloatLiteral(_) => (self.registry.float(corvid_ast::types::FloatPrecision::Double), false),
            ExpressionKind::BoolLiteral(_) => (self.registry.bool(), false),
            ExpressionKind::CharLiteral(_) => (self.registry.integer(8, true), false),
            ExpressionKind::StringLiteral(_) => (self.registry.string(), false),
            ExpressionKind::NullLiteral => {
                let void = self.registry.void();
                (self.registry.pointer(void), false)
            }
            ExpressionKind::AnyLiteral => (self.registry.any(), false),

            ExpressionKind::Identifier { name, resolved } => self.resolve_identifier(name, resolved, expr.span, state),

            ExpressionKind::Unary { op, operand } => {
                let ty = self.resolve_expr(operand, state);
                let result = match op {
                    UnaryOp::AddressOf => self.registry.pointer(ty),
                    UnaryOp::Deref => match self.registry.get(self.registry.unwrap(ty)) {
                        Type::Pointer(elem) => *elem,
                        _ => {
                            self.report(ResolveError::DerefOfNonPointer {
                                found: self.registry.pretty_print(ty),
                                span: expr.span,
                            });
                            self.registry.any()
                        }
                    },
                    UnaryOp::Negate | UnaryOp::Not | UnaryOp::BitNot => ty,
                };
                let is_lvalue = matches!(op, UnaryOp::Deref);
                (result, is_lvalue)
            }

            ExpressionKind::IncDec { operand, .. } => {
                let ty = self.resolve_expr(operand, state);
                (ty, false)
            }

            ExpressionKind::Binary { op, left, right } => {
                let lt = self.resolve_expr(left, state);
                let rt = self.resolve_expr(right, state);
                if matches!(op, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge) {
                    if self.registry.binary_operator_type_meet(lt, rt).is_none() {
                        self.find_binary_operator(*op, lt, rt, left, right, state, expr.span);
                    }
                    return (self.registry.bool(), false);
                }
                if matches!(op, BinaryOp::And | BinaryOp::Or) {
                    return (self.registry.bool(), false);
                }
                match self.registry.binary_operator_type_meet(lt, rt) {
                    Some(ty) => (ty, false),
                    None => {
                        let ty = self.find_binary_operator(*op, lt, rt, left, right, state, expr.span);
                        (ty.unwrap_or_else(|| self.registry.any()), false)
                    }
                }
            }

            ExpressionKind::Assignment { op, target, value } => {
                let target_ty = self.resolve_expr(target, state);
                let value_ty = self.resolve_expr(value, state);
                if !target.lvalue.get() {
                    self.report(ResolveError::NonLvalueAssignment { span: target.span });
                } else if let ExpressionKind::Identifier { resolved, .. } = &target.kind {
                    if let Some(Binding::Global(decl)) = resolved.get() {
                        let is_const = matches!(&self.decls.get(decl).kind, DeclarationKind::Global(g) if g.is_const);
                        if is_const {
                            self.report(ResolveError::AssignmentToConstant {
                                name: self.decls.get(decl).kind.name().to_string(),
                                span: target.span,
                            });
                        }
                    }
                }

                let effective_ty = if matches!(op, AssignOp::Assign) {
                    value_ty
                } else {
                    self.registry.binary_operator_type_meet(target_ty, value_ty).unwrap_or(value_ty)
                };
                let is_const_src = self.is_constant_expr(state.file_idx, value);
                if !self.registry.can_convert_implicit(effective_ty, target_ty, is_const_src) {
                    self.report(ResolveError::IncompatibleAssignment {
                        expected: self.registry.pretty_print(target_ty),
                        found: self.registry.pretty_print(effective_ty),
                        span: expr.span,
                    });
                }
                (target_ty, false)
            }

            ExpressionKind::Ternary { cond, then_branch, else_branch } => {
                self.resolve_expr(cond, state);
                let tt = self.resolve_expr(then_branch, state);
                let et = self.resolve_expr(else_branch, state);
                let ty = self.registry.binary_operator_type_meet(tt, et).unwrap_or(tt);
                (ty, false)
            }

            ExpressionKind::Call { callee, args, resolved_callee } => {
                self.resolve_call(callee, args, resolved_callee, expr.span, state)
            }

            ExpressionKind::Index { base, index } => {
                let base_ty = self.resolve_expr(base, state);
                let _ = self.resolve_expr(index, state);
                let elem = match self.registry.get(self.registry.unwrap(base_ty)) {
                    Type::Array { element, .. } | Type::Pointer(element) => Some(*element),
                    Type::String => Some(self.registry.integer(8, true)),
                    _ => None,
                };
                match elem {
                    Some(e) => (e, true),
                    None => {
                        // struct/class `[]` operator overload (spec §4.6,
                        // "operator-overload search").
                        let ty = self.find_subscript_operator(base_ty, state).unwrap_or_else(|| self.registry.any());
                        (ty, true)
                    }
                }
            }

            ExpressionKind::Member { base, name } => {
                let base_ty = self.resolve_expr(base, state);
                let base_lvalue = base.lvalue.get();
                let ty = self.resolve_member(base_ty, name, expr.span);
                (ty, base_lvalue)
            }

            ExpressionKind::Cast { target_type, operand } => {
                let target = self.resolve_type_expr(state.file_idx, target_type, state.generic_scope);
                let operand_ty = self.resolve_expr(operand, state);
                let is_const = self.is_constant_expr(state.file_idx, operand);
                if !self.registry.can_convert(operand_ty, target, is_const) {
                    self.report(ResolveError::InvalidCast {
                        from: self.registry.pretty_print(operand_ty),
                        to: self.registry.pretty_print(target),
                        span: expr.span,
                    });
                }
                (target, false)
            }

            ExpressionKind::SizeOf(target) => {
                match target {
                    corvid_ast::expr::SizeOfTarget::Type(t) => {
                        let _ = self.resolve_type_expr(state.file_idx, t, state.generic_scope);
                    }
                    corvid_ast::expr::SizeOfTarget::Expr(e) => {
                        let _ = self.resolve_expr(e, state);
                    }
                }
                (self.registry.integer(64, false), false)
            }

            ExpressionKind::Malloc { element_type, count } => {
                let elem = self.resolve_type_expr(state.file_idx, element_type, state.generic_scope);
                if let Some(c) = count {
                    let _ = self.resolve_expr(c, state);
                }
                (self.registry.pointer(elem), false)
            }

            ExpressionKind::StackNew { element_type, args } => {
                let elem = self.resolve_type_expr(state.file_idx, element_type, state.generic_scope);
                for a in args {
                    let _ = self.resolve_expr(a, state);
                }
                (elem, false)
            }

            ExpressionKind::TupleLiteral(elems) => {
                let ids: Vec<TypeId> = elems.iter().map(|e| self.resolve_expr(e, state)).collect();
                (self.registry.tuple(ids), false)
            }

            ExpressionKind::InitializerList(elems) => {
                let mut last = self.registry.any();
                for e in elems {
                    last = self.resolve_expr(e, state);
                }
                (self.registry.array(last, Some(elems.len() as u64)), false)
            }
        }
    }

    /// 6-step identifier lookup (spec §4.6): locals, file globals,
    /// module/dependency globals (visibility-filtered), the accumulated
    /// function overload set, enum values, then macro substitution.
    /// Variables win over a same-named function set when both exist.
    fn resolve_identifier(
        &mut self,
        name: &str,
        resolved: &std::cell::Cell<Option<Binding>>,
        span: corvid_source::types::SourceSpan,
        state: &mut BodyState<'_>,
    ) -> (TypeId, bool) {
        if let Some(local) = state.symtab.lookup_local(name) {
            resolved.set(Some(Binding::Local(local)));
            let ty = state.local_types.get(&local).copied().unwrap_or_else(|| self.registry.any());
            return (ty, true);
        }

        if let Some(&decl) = self.bindings[state.file_idx].locals_by_name.get(name) {
            resolved.set(Some(Binding::Global(decl)));
            let ty = self.global_types.get(&decl).or_else(|| self.type_decls.get(&decl)).copied().unwrap_or_else(|| self.registry.any());
            let is_lvalue = matches!(&self.decls.get(decl).kind, DeclarationKind::Global(_));
            return (ty, is_lvalue);
        }

        for i in 0..self.bindings.len() {
            if i == state.file_idx {
                continue;
            }
            if let Some(&decl) = self.bindings[i].locals_by_name.get(name) {
                let is_public = self.decls.get(decl).is_public;
                if self.is_visible(state.file_idx, i, is_public) {
                    resolved.set(Some(Binding::Global(decl)));
                    let ty =
                        self.global_types.get(&decl).or_else(|| self.type_decls.get(&decl)).copied().unwrap_or_else(|| self.registry.any());
                    let is_lvalue = matches!(&self.decls.get(decl).kind, DeclarationKind::Global(_));
                    return (ty, is_lvalue);
                }
            }
        }

        if let Some(candidates) = self.collect_overload_set(state.file_idx, name) {
            if let Some(&(first, _)) = candidates.first() {
                resolved.set(Some(Binding::Function(first)));
                if let Some(sig) = self.signatures.get(&first) {
                    return (sig.function_type, false);
                }
            }
        }

        if let Some(&(decl, ord)) = self.bindings[state.file_idx].enum_values.get(name) {
            resolved.set(Some(Binding::EnumValue(decl, ord)));
            let ty = self.type_decls.get(&decl).copied().unwrap_or_else(|| self.registry.any());
            return (ty, false);
        }
        for i in 0..self.bindings.len() {
            if i == state.file_idx {
                continue;
            }
            if let Some(&(decl, ord)) = self.bindings[i].enum_values.get(name) {
                let is_public = self.decls.get(decl).is_public;
                if self.is_visible(state.file_idx, i, is_public) {
                    resolved.set(Some(Binding::EnumValue(decl, ord)));
                    let ty = self.type_decls.get(&decl).copied().unwrap_or_else(|| self.registry.any());
                    return (ty, false);
                }
            }
        }

        if let Some(&macro_decl) = self.bindings[state.file_idx].macros.get(name) {
            let DeclarationKind::Macro(m) = &self.decls.get(macro_decl).kind else { unreachable!() };
            if m.params.is_empty() {
                let body = m.body.clone();
                let ty = self.resolve_expr(&body, state);
                return (ty, false);
            }
        }

        self.report(ResolveError::UndefinedIdentifier { name: name.to_string(), span });
        (self.registry.any(), false)
    }

    /// Gathers every function declared under `name` visible from
    /// `file_idx`, as `(decl, is_local)` pairs for scoring.
    fn collect_overload_set(&self, file_idx: usize, name: &str) -> Option<Vec<(DeclId, bool)>> {
        let mut out = Vec::new();
        if let Some(fns) = self.bindings[file_idx].functions_by_name.get(name) {
            out.extend(fns.iter().map(|&d| (d, true)));
        }
        for (i, b) in self.bindings.iter().enumerate() {
            if i == file_idx {
                continue;
            }
            if let Some(fns) = b.functions_by_name.get(name) {
                for &d in fns {
                    let is_public = self.decls.get(d).is_public;
                    if self.is_visible(file_idx, i, is_public) {
                        out.push((d, false));
                    }
                }
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }

    fn resolve_call(
        &mut self,
        callee: &Expression,
        args: &[Expression],
        resolved_callee: &std::cell::Cell<Option<DeclId>>,
        span: corvid_source::types::SourceSpan,
        state: &mut BodyState<'_>,
    ) -> (TypeId, bool) {
        // Builtin-cast-call form: `i32(x)`, `string(ptr, len)`.
        if let ExpressionKind::Identifier { name, .. } = &callee.kind {
            if let Some((owner_file, decl_id)) = self.find_type_decl_public(state.file_idx, name) {
                let _ = owner_file;
                let target_ty = self.type_decls.get(&decl_id).copied();
                if let Some(target_ty) = target_ty {
                    let arg_types: Vec<TypeId> = args.iter().map(|a| self.resolve_expr(a, state)).collect();
                    if let Some(&first) = arg_types.first() {
                        let is_const = args.first().is_some_and(|a| self.is_constant_expr(state.file_idx, a));
                        if !self.registry.can_convert(first, target_ty, is_const) {
                            self.report(ResolveError::InvalidCast {
                                from: self.registry.pretty_print(first),
                                to: self.registry.pretty_print(target_ty),
                                span,
                            });
                        }
                    }
                    return (target_ty, false);
                }
            }
        }

        let arg_tys: Vec<(TypeId, bool)> = args
            .iter()
            .map(|a| {
                let ty = self.resolve_expr(a, state);
                let is_const = self.is_constant_expr(state.file_idx, a);
                (ty, is_const)
            })
            .collect();

        if let ExpressionKind::Identifier { name, .. } = &callee.kind {
            if let Some(candidates) = self.collect_overload_set(state.file_idx, name) {
                let scored: Vec<(DeclId, u32)> = candidates
                    .iter()
                    .filter_map(|&(decl, is_local)| {
                        let sig = self.signatures.get(&decl)?;
                        let Type::Function { params, varargs, .. } = self.registry.get(sig.function_type) else {
                            return None;
                        };
                        let DeclarationKind::Function(f) = &self.decls.get(decl).kind else { return None };
                        let mask = generic_param_mask(f);
                        score_overload(&self.registry, params, &mask, *varargs, &arg_tys, is_local).map(|s| (decl, s))
                    })
                    .collect();
                match pick_overload(&scored) {
                    Ok(Some(decl)) => {
                        resolved_callee.set(Some(decl));
                        let ret = self.signatures.get(&decl).map(|s| s.function_type);
                        if let Some(Type::Function { return_type, .. }) = ret.map(|t| self.registry.get(t).clone()) {
                            return (return_type, false);
                        }
                        return (self.registry.any(), false);
                    }
                    Ok(None) => {
                        self.report(ResolveError::NoMatchingOverload { name: name.clone(), span });
                        return (self.registry.any(), false);
                    }
                    Err(()) => {
                        self.report(ResolveError::AmbiguousOverload { name: name.clone(), span });
                        return (self.registry.any(), false);
                    }
                }
            }
        }

        // Constructor call on a class/struct name.
        if let ExpressionKind::Identifier { name, .. } = &callee.kind {
            if let Some((_, decl_id)) = self.find_type_decl_public(state.file_idx, name) {
                let is_class = matches!(&self.decls.get(decl_id).kind, DeclarationKind::Class(_));
                if !is_class {
                    let ty = self.type_decls.get(&decl_id).copied().unwrap_or_else(|| self.registry.any());
                    self.report(ResolveError::ConstructorOnNonClass { found: self.registry.pretty_print(ty), span });
                    return (ty, false);
                }
                let DeclarationKind::Class(c) = &self.decls.get(decl_id).kind else { unreachable!() };
                let ctor_candidates: Vec<(DeclId, bool)> = c.constructors.iter().map(|&d| (d, true)).collect();
                let scored: Vec<(DeclId, u32)> = ctor_candidates
                    .iter()
                    .filter_map(|&(decl, is_local)| {
                        let sig = self.signatures.get(&decl)?;
                        let Type::Function { params, varargs, .. } = self.registry.get(sig.function_type) else {
                            return None;
                        };
                        let DeclarationKind::Function(f) = &self.decls.get(decl).kind else { return None };
                        let mask = generic_param_mask(f);
                        score_overload(&self.registry, params, &mask, *varargs, &arg_tys, is_local).map(|s| (decl, s))
                    })
                    .collect();
                let ty = self.type_decls.get(&decl_id).copied().unwrap_or_else(|| self.registry.any());
                match pick_overload(&scored) {
                    Ok(Some(decl)) => resolved_callee.set(Some(decl)),
                    Ok(None) => self.report(ResolveError::NoMatchingOverload { name: name.clone(), span }),
                    Err(()) => self.report(ResolveError::AmbiguousOverload { name: name.clone(), span }),
                }
                return (ty, false);
            }
        }

        // Method call: `base.method(args)`.
        if let ExpressionKind::Member { base, name } = &callee.kind {
            let base_ty = self.resolve_expr(base, state);
            let owner_decl = match self.registry.get(self.registry.unwrap(base_ty)) {
                Type::Struct { decl, .. } | Type::Class { decl, .. } => Some(*decl),
                _ => None,
            };
            if let Some(owner_decl) = owner_decl {
                let methods: Vec<DeclId> = match &self.decls.get(owner_decl).kind {
                    DeclarationKind::Struct(s) => s.methods.clone(),
                    DeclarationKind::Class(c) => c.methods.clone(),
                    _ => Vec::new(),
                };
                let candidates: Vec<(DeclId, bool)> = methods
                    .iter()
                    .filter(|&&m| self.decls.get(m).kind.name() == name)
                    .map(|&m| (m, true))
                    .collect();
                let scored: Vec<(DeclId, u32)> = candidates
                    .iter()
                    .filter_map(|&(decl, is_local)| {
                        let sig = self.signatures.get(&decl)?;
                        let Type::Function { params, varargs, .. } = self.registry.get(sig.function_type) else {
                            return None;
                        };
                        let DeclarationKind::Function(f) = &self.decls.get(decl).kind else { return None };
                        let mask = generic_param_mask(f);
                        score_overload(&self.registry, params, &mask, *varargs, &arg_tys, is_local).map(|s| (decl, s))
                    })
                    .collect();
                return match pick_overload(&scored) {
                    Ok(Some(decl)) => {
                        resolved_callee.set(Some(decl));
                        let ret = self.signatures.get(&decl).map(|s| s.function_type);
                        match ret.map(|t| self.registry.get(t).clone()) {
                            Some(Type::Function { return_type, .. }) => (return_type, false),
                            _ => (self.registry.any(), false),
                        }
                    }
                    Ok(None) => {
                        self.report(ResolveError::NoMatchingOverload { name: name.clone(), span });
                        (self.registry.any(), false)
                    }
                    Err(()) => {
                        self.report(ResolveError::AmbiguousOverload { name: name.clone(), span });
                        (self.registry.any(), false)
                    }
                };
            }
        }

        let callee_ty = self.resolve_expr(callee, state);
        match self.registry.get(self.registry.unwrap(callee_ty)).clone() {
            Type::Function { return_type, .. } => (return_type, false),
            _ => (self.registry.any(), false),
        }
    }

    fn find_type_decl_public(&self, file_idx: usize, name: &str) -> Option<(usize, DeclId)> {
        if let Some(&id) = self.bindings[file_idx].locals_by_name.get(name) {
            if matches!(
                &self.decls.get(id).kind,
                DeclarationKind::Struct(_) | DeclarationKind::Class(_) | DeclarationKind::Typedef(_) | DeclarationKind::Enum(_)
            ) {
                return Some((file_idx, id));
            }
        }
        for (i, b) in self.bindings.iter().enumerate() {
            if i == file_idx {
                continue;
            }
            if let Some(&id) = b.locals_by_name.get(name) {
                let is_public = self.decls.get(id).is_public;
                if self.is_visible(file_idx, i, is_public)
                    && matches!(
                        &self.decls.get(id).kind,
                        DeclarationKind::Struct(_) | DeclarationKind::Class(_) | DeclarationKind::Typedef(_) | DeclarationKind::Enum(_)
                    )
                {
                    return Some((i, id));
                }
            }
        }
        None
    }

    fn resolve_member(&mut self, base_ty: TypeId, name: &str, span: corvid_source::types::SourceSpan) -> TypeId {
        let unwrapped = self.registry.unwrap(base_ty);
        let decl = match self.registry.get(unwrapped) {
            Type::Struct { decl, .. } | Type::Class { decl, .. } => Some(*decl),
            Type::Pointer(inner) => match self.registry.get(self.registry.unwrap(*inner)) {
                Type::Struct { decl, .. } | Type::Class { decl, .. } => Some(*decl),
                _ => None,
            },
            _ => None,
        };
        let Some(decl) = decl else {
            self.report(ResolveError::UndefinedIdentifier { name: name.to_string(), span });
            return self.registry.any();
        };
        let fields: Vec<corvid_ast::decl::Field> = match &self.decls.get(decl).kind {
            DeclarationKind::Struct(s) => s.fields.clone(),
            DeclarationKind::Class(c) => c.fields.clone(),
            _ => Vec::new(),
        };
        for f in &fields {
            if f.name == name {
                return f.type_expr.resolved.get().unwrap_or_else(|| self.registry.any());
            }
        }
        self.report(ResolveError::UndefinedIdentifier { name: name.to_string(), span });
        self.registry.any()
    }

    /// Searches the declaring module of either operand's type for a
    /// matching operator-overload function (spec §4.6). Falls back to
    /// reporting the comparison/arithmetic as unresolvable when neither
    /// side owns a matching operator.
    fn find_binary_operator(
        &mut self,
        op: BinaryOp,
        lt: TypeId,
        rt: TypeId,
        left: &Expression,
        right: &Expression,
        state: &mut BodyState<'_>,
        span: corvid_source::types::SourceSpan,
    ) -> Option<TypeId> {
        let _ = (left, right);
        for ty in [lt, rt] {
            let decl = match self.registry.get(self.registry.unwrap(ty)) {
                Type::Struct { decl, .. } | Type::Class { decl, .. } => Some(*decl),
                _ => None,
            };
            let Some(decl) = decl else { continue };
            let methods: Vec<DeclId> = match &self.decls.get(decl).kind {
                DeclarationKind::Struct(s) => s.methods.clone(),
                DeclarationKind::Class(c) => c.methods.clone(),
                _ => Vec::new(),
            };
            let candidates: Vec<(DeclId, bool)> = methods
                .iter()
                .filter(|&&m| matches!(&self.decls.get(m).kind, DeclarationKind::Function(f) if f.is_operator == Some(OperatorKind::Binary(op))))
                .map(|&m| (m, true))
                .collect();
            let arg_tys = [(lt, false), (rt, false)];
            let scored: Vec<(DeclId, u32)> = candidates
                .iter()
                .filter_map(|&(cd, is_local)| {
                    let sig = self.signatures.get(&cd)?;
                    let Type::Function { params, varargs, .. } = self.registry.get(sig.function_type) else { return None };
                    let DeclarationKind::Function(f) = &self.decls.get(cd).kind else { return None };
                    let mask = generic_param_mask(f);
                    score_overload(&self.registry, params, &mask, *varargs, &arg_tys, is_local).map(|s| (cd, s))
                })
                .collect();
            if let Ok(Some(cd)) = pick_overload(&scored) {
                if let Some(Type::Function { return_type, .. }) = self.signatures.get(&cd).map(|s| self.registry.get(s.function_type).clone()) {
                    return Some(return_type);
                }
            }
        }
        let _ = state;
        self.report(ResolveError::NoMatchingOverload { name: format!("operator{op:?}"), span });
        None
    }

    fn find_subscript_operator(&mut self, base_ty: TypeId, state: &mut BodyState<'_>) -> Option<TypeId> {
        let _ = state;
        let decl = match self.registry.get(self.registry.unwrap(base_ty)) {
            Type::Struct { decl, .. } | Type::Class { decl, .. } => Some(*decl),
            _ => None,
        };
        let decl = decl?;
        let methods: Vec<DeclId> = match &self.decls.get(decl).kind {
            DeclarationKind::Struct(s) => s.methods.clone(),
            DeclarationKind::Class(c) => c.methods.clone(),
            _ => Vec::new(),
        };
        for m in methods {
            if let DeclarationKind::Function(f) = &self.decls.get(m).kind {
                if f.name == "[]" {
                    if let Some(sig) = self.signatures.get(&m) {
                        if let Type::Function { return_type, .. } = self.registry.get(sig.function_type) {
                            return Some(*return_type);
                        }
                    }
                }
            }
        }
        None
    }
}
