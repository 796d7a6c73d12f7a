//! Visitor trait over the AST, one method per node category, with a free
//! `walk_*` function per category giving the default recursive traversal.
//! Implementers override only the categories they care about and call the
//! matching `walk_*` to recurse into children.

use crate::decl::{Declaration, DeclarationArena, DeclarationKind};
use crate::expr::{Expression, ExpressionKind, SizeOfTarget};
use crate::stmt::{Statement, StatementKind};
use crate::types::{TypeExpr, TypeExprKind};

pub trait AstVisitor {
    fn visit_expression(&mut self, expr: &Expression) { walk_expression(self, expr); }

    fn visit_statement(&mut self, stmt: &Statement) { walk_statement(self, stmt); }

    fn visit_type_expr(&mut self, ty: &TypeExpr) { walk_type_expr(self, ty); }

    fn visit_declaration(&mut self, decl: &Declaration, arena: &DeclarationArena) {
        walk_declaration(self, decl, arena);
    }
}

pub fn walk_expression<V: AstVisitor + ?Sized>(v: &mut V, expr: &Expression) {
    match &expr.kind {
        ExpressionKind::IntLiteral(_)
        | ExpressionKind::FloatLiteral(_)
        | ExpressionKind::BoolLiteral(_)
        | ExpressionKind::CharLiteral(_)
        | ExpressionKind::StringLiteral(_)
        | ExpressionKind::NullLiteral
        | ExpressionKind::AnyLiteral
        | ExpressionKind::Identifier { .. } => {}
        ExpressionKind::Unary { operand, .. } => v.visit_expression(operand),
        ExpressionKind::IncDec { operand, .. } => v.visit_expression(operand),
        ExpressionKind::Binary { left, right, .. } => {
            v.visit_expression(left);
            v.visit_expression(right);
        }
        ExpressionKind::Assignment { target, value, .. } => {
            v.visit_expression(target);
            v.visit_expression(value);
        }
        ExpressionKind::Ternary { cond, then_branch, else_branch } => {
            v.visit_expression(cond);
            v.visit_expression(then_branch);
            v.visit_expression(else_branch);
        }
        ExpressionKind::Call { callee, args, .. } => {
            v.visit_expression(callee);
            for arg in args {
                v.visit_expression(arg);
            }
        }
        ExpressionKind::Index { base, index } => {
            v.visit_expression(base);
            v.visit_expression(index);
        }
        ExpressionKind::Member { base, .. } => v.visit_expression(base),
        ExpressionKind::Cast { target_type, operand } => {
            v.visit_type_expr(target_type);
            v.visit_expression(operand);
        }
        ExpressionKind::SizeOf(target) => match target {
            SizeOfTarget::Type(ty) => v.visit_type_expr(ty),
            SizeOfTarget::Expr(expr) => v.visit_expression(expr),
        },
        ExpressionKind::Malloc { element_type, count } => {
            v.visit_type_expr(element_type);
            if let Some(count) = count {
                v.visit_expression(count);
            }
        }
        ExpressionKind::StackNew { element_type, args } => {
            v.visit_type_expr(element_type);
            for arg in args {
                v.visit_expression(arg);
            }
        }
        ExpressionKind::TupleLiteral(items) | ExpressionKind::InitializerList(items) => {
            for item in items {
                v.visit_expression(item);
            }
        }
    }
}

pub fn walk_statement<V: AstVisitor + ?Sized>(v: &mut V, stmt: &Statement) {
    match &stmt.kind {
        StatementKind::Expr(expr) | StatementKind::Free(expr) => v.visit_expression(expr),
        StatementKind::VarDecl(binding) => {
            if let Some(ty) = &binding.declared_type {
                v.visit_type_expr(ty);
            }
            if let Some(init) = &binding.init {
                v.visit_expression(init);
            }
        }
        StatementKind::Block(stmts) => {
            for s in stmts {
                v.visit_statement(s);
            }
        }
        StatementKind::If { cond, then_branch, else_branch } => {
            v.visit_expression(cond);
            v.visit_statement(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_statement(else_branch);
            }
        }
        StatementKind::While { cond, body } => {
            v.visit_expression(cond);
            v.visit_statement(body);
        }
        StatementKind::For { init, cond, step, body } => {
            if let Some(init) = init {
                v.visit_statement(init);
            }
            if let Some(cond) = cond {
                v.visit_expression(cond);
            }
            if let Some(step) = step {
                v.visit_expression(step);
            }
            v.visit_statement(body);
        }
        StatementKind::ForEach { iterable, body, .. } => {
            v.visit_expression(iterable);
            v.visit_statement(body);
        }
        StatementKind::Return(expr) => {
            if let Some(expr) = expr {
                v.visit_expression(expr);
            }
        }
        StatementKind::Break | StatementKind::Continue => {}
        StatementKind::Assert { condition, .. } => v.visit_expression(condition),
        StatementKind::Defer(stmt) => v.visit_statement(stmt),
    }
}

pub fn walk_type_expr<V: AstVisitor + ?Sized>(v: &mut V, ty: &TypeExpr) {
    match &ty.kind {
        TypeExprKind::Void
        | TypeExprKind::Bool
        | TypeExprKind::Integer { .. }
        | TypeExprKind::Float(_)
        | TypeExprKind::StringT
        | TypeExprKind::Any => {}
        TypeExprKind::Named { type_args, .. } => {
            for arg in type_args {
                v.visit_type_expr(arg);
            }
        }
        TypeExprKind::Pointer(inner) | TypeExprKind::Optional(inner) => v.visit_type_expr(inner),
        TypeExprKind::Function { params, return_type, .. } => {
            for param in params {
                v.visit_type_expr(param);
            }
            v.visit_type_expr(return_type);
        }
        TypeExprKind::Tuple(items) => {
            for item in items {
                v.visit_type_expr(item);
            }
        }
        TypeExprKind::Array { element, length } => {
            v.visit_type_expr(element);
            if let Some(length) = length {
                v.visit_expression(length);
            }
        }
    }
}

pub fn walk_declaration<V: AstVisitor + ?Sized>(v: &mut V, decl: &Declaration, arena: &DeclarationArena) {
    match &decl.kind {
        DeclarationKind::Function(f) => {
            for param in &f.params {
                v.visit_type_expr(&param.type_expr);
            }
            if let Some(return_type) = &f.return_type {
                v.visit_type_expr(return_type);
            }
            if let Some(body) = &f.body {
                for stmt in body {
                    v.visit_statement(stmt);
                }
            }
        }
        DeclarationKind::Struct(s) => {
            for field in &s.fields {
                v.visit_type_expr(&field.type_expr);
            }
            for method in &s.methods {
                v.visit_declaration(arena.get(*method), arena);
            }
        }
        DeclarationKind::Class(c) => {
            for field in &c.fields {
                v.visit_type_expr(&field.type_expr);
            }
            for method in c.methods.iter().chain(&c.constructors) {
                v.visit_declaration(arena.get(*method), arena);
            }
        }
        DeclarationKind::Enum(e) => {
            for (_, value) in &e.values {
                if let Some(value) = value {
                    v.visit_expression(value);
                }
            }
        }
        DeclarationKind::Typedef(t) => v.visit_type_expr(&t.target),
        DeclarationKind::Macro(m) => v.visit_expression(&m.body),
        DeclarationKind::Global(g) => {
            if let Some(ty) = &g.declared_type {
                v.visit_type_expr(ty);
            }
            if let Some(init) = &g.init {
                v.visit_expression(init);
            }
        }
    }
}
