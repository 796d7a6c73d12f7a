//! The resolver: the staged whole-program pass described in spec §4.6.
//!
//! Headers are resolved in a fixed order across every file before any
//! function or method body is walked, because bodies depend on member
//! layouts and function signatures being fully known. Generic
//! instantiation can re-enter resolution from any later stage; the
//! instance cache keyed by structural equality of the type-argument list
//! is what keeps `Box<i32>` used twice from allocating twice (testable
//! property 4, scenario S3).

mod body;
mod overload;
mod typeexpr;

pub use overload::score_overload;

use corvid_ast::decl::{DeclarationArena, DeclarationKind};
use corvid_ast::ids::{DeclId, ModuleId, TypeId};
use corvid_ast::File;
use rustc_hash::FxHashMap;

use crate::error::ResolveError;
use crate::mangle::mangle_function;
use crate::modules::{DependencySet, ModuleGraph};
use crate::types::TypeRegistry;

/// Everything resolved about one file's top-level bindings, built during
/// header resolution and consulted by identifier lookup (spec §4.6,
/// "Identifier lookup").
#[derive(Debug, Default)]
pub struct FileBindings {
    pub module: Option<ModuleId>,
    pub deps: DependencySet,
    /// Non-function globals and type declarations visible by simple name,
    /// declared in this file.
    pub locals_by_name: FxHashMap<String, DeclId>,
    /// Function overload sets declared in this file, keyed by name.
    pub functions_by_name: FxHashMap<String, Vec<DeclId>>,
    /// Enum value name -> (enum decl, ordinal).
    pub enum_values: FxHashMap<String, (DeclId, u32)>,
    /// Macro (`exprdef`) bodies, substituted at the use site.
    pub macros: FxHashMap<String, DeclId>,
}

/// A mangled-name / type-id pair filled in once header resolution
/// computes a function's signature.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub function_type: TypeId,
    pub mangled_name: String,
}

/// The fully-resolved output of a compilation: the interned types, the
/// module graph, the (possibly generics-expanded) declaration arena, and
/// every file's annotated AST — the shape the backend query interface
/// (spec §6) walks.
pub struct ResolvedProgram {
    pub registry: TypeRegistry,
    pub modules: ModuleGraph,
    pub decls: DeclarationArena,
    pub files: Vec<File>,
    pub entry_point: Option<DeclId>,
    pub generic_instances: FxHashMap<DeclId, Vec<DeclId>>,
    /// Every function/method/constructor's interned signature and
    /// mangled external name, the shape `mangled_name_of` queries.
    pub signatures: FxHashMap<DeclId, FunctionSignature>,
}

pub(crate) struct Resolver {
    pub(crate) registry: TypeRegistry,
    pub(crate) modules: ModuleGraph,
    pub(crate) decls: DeclarationArena,
    pub(crate) files: Vec<File>,
    pub(crate) bindings: Vec<FileBindings>,
    pub(crate) signatures: FxHashMap<DeclId, FunctionSignature>,
    pub(crate) global_types: FxHashMap<DeclId, TypeId>,
    pub(crate) type_decls: FxHashMap<DeclId, TypeId>,
    /// Generic declaration -> (type-argument tuple -> instantiated decl),
    /// consulted before cloning so repeated uses of the same arguments
    /// collapse onto one instance (spec §4.6, generic instantiation step
    /// 1; testable property 4).
    pub(crate) generic_instances: FxHashMap<DeclId, Vec<(Vec<TypeId>, DeclId)>>,
    pub(crate) entry_point: Option<DeclId>,
    pub(crate) errors: Vec<ResolveError>,
}

impl Resolver {
    fn new(files: Vec<File>, decls: DeclarationArena) -> Self {
        let bindings = files.iter().map(|_| FileBindings::default()).collect();
        Self {
            registry: TypeRegistry::new(),
            modules: ModuleGraph::new(),
            decls,
            files,
            bindings,
            signatures: FxHashMap::default(),
            global_types: FxHashMap::default(),
            type_decls: FxHashMap::default(),
            generic_instances: FxHashMap::default(),
            entry_point: None,
            errors: Vec::new(),
        }
    }

    fn report(&mut self, err: ResolveError) { self.errors.push(err); }

    // ---- stage 1: module headers -----------------------------------

    fn resolve_module_headers(&mut self) {
        for i in 0..self.files.len() {
            if let Some(path) = self.files[i].module_path.clone() {
                let id = self.modules.intern_path(&path);
                self.bindings[i].module = Some(id);
                self.bindings[i].deps.own_module = Some(id);
            }
        }
        for i in 0..self.files.len() {
            let imports = self.files[i].imports.clone();
            for import in &imports {
                let Some(target) = self.modules.lookup_path(&import.path) else { continue };
                let expanded = self.modules.expand_import(target, import.wildcard);
                self.bindings[i].deps.imported.extend(expanded);
            }
        }
    }

    // ---- stages 2-9: remaining headers -------------------------------

    fn resolve_headers(&mut self) {
        self.resolve_module_headers();
        self.index_declarations();
        self.resolve_primitive_global_headers();
        self.resolve_enum_headers();
        self.resolve_struct_headers();
        self.resolve_class_headers();
        self.resolve_typedef_headers();
        self.resolve_function_headers();
        self.resolve_remaining_global_headers();
    }

    /// Builds each file's `locals_by_name` / `functions_by_name` index
    /// before any type resolution runs, so forward references within a
    /// file (and across files via imports) are visible from stage 2
    /// onward.
    fn index_declarations(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                let kind_name = self.decls.get(id).kind.name().to_string();
                match &self.decls.get(id).kind {
                    DeclarationKind::Function(f) if f.owner.is_none() => {
                        self.bindings[i].functions_by_name.entry(kind_name).or_default().push(id);
                    }
                    DeclarationKind::Function(_) => {}
                    DeclarationKind::Enum(e) => {
                        for (ord, (name, _)) in e.values.iter().enumerate() {
                            self.bindings[i]
                                .enum_values
                                .insert(name.clone(), (id, u32::try_from(ord).unwrap_or(u32::MAX)));
                        }
                        self.bindings[i].locals_by_name.insert(kind_name, id);
                    }
                    DeclarationKind::Macro(_) => {
                        self.bindings[i].macros.insert(kind_name, id);
                    }
                    _ => {
                        self.bindings[i].locals_by_name.insert(kind_name, id);
                    }
                }
            }
        }
    }

    fn resolve_primitive_global_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                let is_primitive_const = matches!(
                    &self.decls.get(id).kind,
                    DeclarationKind::Global(g) if g.is_const && matches!(
                        g.declared_type.as_ref().map(|t| &t.kind),
                        Some(
                            corvid_ast::types::TypeExprKind::Integer { .. }
                                | corvid_ast::types::TypeExprKind::Float(_)
                                | corvid_ast::types::TypeExprKind::Bool
                        )
                    )
                );
                if is_primitive_const {
                    self.resolve_global_header(i, id);
                }
            }
        }
    }

    fn resolve_global_header(&mut self, file_idx: usize, id: DeclId) {
        let span = self.decls.get(id).span;
        let (declared_type, init) = {
            let DeclarationKind::Global(g) = &self.decls.get(id).kind else { return };
            (g.declared_type.clone(), g.init.clone())
        };
        let declared = declared_type.as_ref().map(|t| self.resolve_type_expr(file_idx, t, &FxHashMap::default()));
        let init_ty = init.as_ref().map(|e| self.resolve_expression(file_idx, e, &FxHashMap::default()));
        let ty = declared.or(init_ty).unwrap_or_else(|| self.registry.void());
        if let (Some(d), Some(i)) = (declared, init_ty) {
            let is_const = matches!(&self.decls.get(id).kind, DeclarationKind::Global(g) if g.init.is_some());
            let is_const_src = matches!(&init, Some(e) if self.is_constant_expr(file_idx, e));
            if !self.registry.can_convert_implicit(i, d, is_const && is_const_src) {
                self.report(ResolveError::IncompatibleInitializer {
                    expected: self.registry.pretty_print(d),
                    found: self.registry.pretty_print(i),
                    span,
                });
            }
        }
        self.global_types.insert(id, ty);
    }

    fn resolve_enum_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                if !matches!(&self.decls.get(id).kind, DeclarationKind::Enum(_)) {
                    continue;
                }
                let i32_ty = self.registry.integer(32, true);
                let name = self.decls.get(id).kind.name().to_string();
                let alias = self.registry.fresh_alias(name, i32_ty);
                self.type_decls.insert(id, alias);

                let values = { let DeclarationKind::Enum(e) = &self.decls.get(id).kind else { unreachable!() }; e.values.clone() };
                for (_, value) in &values {
                    if let Some(expr) = value {
                        let _ = self.resolve_expression(i, expr, &FxHashMap::default());
                    }
                }
            }
        }
    }

    fn resolve_struct_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                let DeclarationKind::Struct(s) = &self.decls.get(id).kind else { continue };
                if !s.type_params.is_empty() {
                    continue;
                }
                let name = s.name.clone();
                let ty = self.registry.fresh_struct(name, id, Vec::new());
                self.type_decls.insert(id, ty);
            }
        }
    }

    fn resolve_class_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                let DeclarationKind::Class(c) = &self.decls.get(id).kind else { continue };
                if !c.type_params.is_empty() {
                    continue;
                }
                let name = c.name.clone();
                let ty = self.registry.fresh_class(name, id, Vec::new());
                self.type_decls.insert(id, ty);
            }
        }
    }

    fn resolve_typedef_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                let DeclarationKind::Typedef(t) = &self.decls.get(id).kind else { continue };
                let target = t.target.clone();
                let name = t.name.clone();
                let target_ty = self.resolve_type_expr(i, &target, &FxHashMap::default());
                let alias = self.registry.fresh_alias(name, target_ty);
                self.type_decls.insert(id, alias);
            }
        }
    }

    fn resolve_function_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                self.resolve_function_header_for(i, id);
                // Struct/class methods and constructors, recorded on the
                // owner but not in the file's own top-level list.
                let nested: Vec<DeclId> = match &self.decls.get(id).kind {
                    DeclarationKind::Struct(s) => s.methods.clone(),
                    DeclarationKind::Class(c) => {
                        c.methods.iter().chain(c.constructors.iter()).copied().collect()
                    }
                    _ => Vec::new(),
                };
                for method_id in nested {
                    self.resolve_function_header_for(i, method_id);
                }
            }
        }
    }

    fn resolve_function_header_for(&mut self, file_idx: usize, id: DeclId) {
        let DeclarationKind::Function(_) = &self.decls.get(id).kind else { return };
        let (params, return_type, varargs, is_extern, is_entry_point, name) = {
            let DeclarationKind::Function(f) = &self.decls.get(id).kind else { unreachable!() };
            (
                f.params.clone(),
                f.return_type.clone(),
                f.varargs,
                f.is_extern,
                f.is_entry_point,
                f.name.clone(),
            )
        };

        let param_types: Vec<TypeId> =
            params.iter().map(|p| self.resolve_type_expr(file_idx, &p.type_expr, &FxHashMap::default())).collect();
        let return_ty = return_type
            .as_ref()
            .map_or_else(|| self.registry.void(), |t| self.resolve_type_expr(file_idx, t, &FxHashMap::default()));
        let function_ty = self.registry.function(param_types.clone(), return_ty, varargs);

        let module_path = self.bindings[file_idx].module.map(|m| self.modules.path_of(m).to_vec()).unwrap_or_default();
        let mangled =
            mangle_function(&self.registry, &module_path, &name, is_entry_point, is_extern, &param_types, &[]);

        if is_entry_point {
            let span = self.decls.get(id).span;
            let is_public = self.decls.get(id).is_public;
            let ok_return = matches!(self.registry.get(self.registry.unwrap(return_ty)), crate::types::Type::Void)
                || matches!(self.registry.get(self.registry.unwrap(return_ty)), crate::types::Type::Integer { width: 32, signed: true });
            if !is_public || !ok_return || !params.is_empty() {
                self.report(ResolveError::NoMatchingOverload { name: "main".to_string(), span });
            } else {
                self.entry_point = Some(id);
            }
        }

        self.signatures.insert(id, FunctionSignature { function_type: function_ty, mangled_name: mangled });
    }

    fn resolve_remaining_global_headers(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                let is_remaining = matches!(&self.decls.get(id).kind, DeclarationKind::Global(_))
                    && !self.global_types.contains_key(&id);
                if is_remaining {
                    self.resolve_global_header(i, id);
                }
            }
        }
    }

    // ---- stages 10-12: bodies ----------------------------------------

    fn resolve_bodies(&mut self) {
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                self.resolve_type_body(i, id);
            }
        }
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                self.resolve_function_and_methods(i, id);
            }
        }
        for i in 0..self.files.len() {
            let decl_ids = self.files[i].declarations.clone();
            for id in decl_ids {
                self.resolve_global_initializer(i, id);
            }
        }
    }

    fn resolve_type_body(&mut self, file_idx: usize, id: DeclId) {
        let fields: Vec<corvid_ast::decl::Field> = match &self.decls.get(id).kind {
            DeclarationKind::Struct(s) => s.fields.clone(),
            DeclarationKind::Class(c) => c.fields.clone(),
            _ => return,
        };
        for f in &fields {
            let _ = self.resolve_type_expr(file_idx, &f.type_expr, &FxHashMap::default());
        }
    }

    fn resolve_function_and_methods(&mut self, file_idx: usize, id: DeclId) {
        self.resolve_function_body(file_idx, id);
        let nested: Vec<DeclId> = match &self.decls.get(id).kind {
            DeclarationKind::Struct(s) => s.methods.clone(),
            DeclarationKind::Class(c) => c.methods.iter().chain(c.constructors.iter()).copied().collect(),
            _ => Vec::new(),
        };
        for method_id in nested {
            self.resolve_function_body(file_idx, method_id);
        }
    }

    fn resolve_global_initializer(&mut self, file_idx: usize, id: DeclId) {
        let DeclarationKind::Global(g) = &self.decls.get(id).kind else { return };
        let Some(init) = g.init.clone() else { return };
        let declared = self.global_types.get(&id).copied();
        let init_ty = self.resolve_expression(file_idx, &init, &FxHashMap::default());
        if let Some(declared) = declared {
            let is_const = self.is_constant_expr(file_idx, &init);
            if !self.registry.can_convert_implicit(init_ty, declared, is_const) {
                self.report(ResolveError::IncompatibleInitializer {
                    expected: self.registry.pretty_print(declared),
                    found: self.registry.pretty_print(init_ty),
                    span: self.decls.get(id).span,
                });
            }
        }
    }

    // ---- identifier / visibility helpers ------------------------------

    fn module_of(&self, file_idx: usize) -> Option<ModuleId> { self.bindings[file_idx].module }

    /// Spec §4.5: visible if declared in the lookup site's own file, or
    /// public and declared in a module in the site's dependency set.
    fn is_visible(&self, file_idx: usize, owner_file: usize, is_public: bool) -> bool {
        if file_idx == owner_file {
            return true;
        }
        is_public
            && self.module_of(owner_file).is_some_and(|m| self.bindings[file_idx].deps.contains(m))
    }
}

/// Runs the full staged resolver over an already-parsed program.
#[must_use]
pub fn resolve_program(files: Vec<File>, decls: DeclarationArena) -> (ResolvedProgram, Vec<ResolveError>) {
    let mut resolver = Resolver::new(files, decls);
    resolver.resolve_headers();
    resolver.resolve_bodies();

    let entry_point = resolver.entry_point;
    let errors = resolver.errors;
    let program = ResolvedProgram {
        registry: resolver.registry,
        modules: resolver.modules,
        decls: resolver.decls,
        files: resolver.files,
        entry_point,
        generic_instances: resolver
            .generic_instances
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().map(|(_, d)| d).collect()))
            .collect(),
        signatures: resolver.signatures,
    };
    (program, errors)
}
