//! The type registry: the one piece of process-wide mutable state in the
//! front end.
//!
//! Primitives are pre-allocated singletons. Pointer/optional/function/
//! tuple/array shapes are interned by linear search through a small
//! per-kind bucket, so two syntactically distinct mentions of `int*`
//! always resolve to the same [`TypeId`]. Struct/class/enum/alias
//! declarations each get a fresh `TypeId` on request — two different
//! `struct Foo {}` declarations never collapse into one type even if
//! their bodies happen to match, and it's the resolver's generic-instance
//! cache, not this registry, that keeps `Box<i32>` used twice from
//! allocating twice.

use corvid_ast::ids::{DeclId, TypeId};
use corvid_ast::types::FloatPrecision;

/// A fully-resolved type. Nested types are referenced by [`TypeId`], not
/// owned — the registry is the only place a `Type` value lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Bool,
    Integer { width: u8, signed: bool },
    Float(FloatPrecision),
    String,
    Any,
    Pointer(TypeId),
    Optional(TypeId),
    Function { params: Vec<TypeId>, return_type: TypeId, varargs: bool },
    Tuple(Vec<TypeId>),
    /// `length: None` is the unsized `array<T, -1>` form.
    Array { element: TypeId, length: Option<u64> },
    Struct { name: String, decl: DeclId, type_args: Vec<TypeId> },
    Class { name: String, decl: DeclId, type_args: Vec<TypeId> },
    /// Both `typedef`s and enum declarations resolve to this: an enum's
    /// `TypeID` aliases `i32` by default (spec §4.6 stage 3), so it needs
    /// no separate representation here.
    Alias { name: String, target: TypeId },
}

impl Type {
    #[must_use]
    pub const fn is_alias(&self) -> bool { matches!(self, Self::Alias { .. }) }
}

fn float_rank(p: FloatPrecision) -> u8 {
    match p {
        FloatPrecision::Half => 0,
        FloatPrecision::Single => 1,
        FloatPrecision::Double => 2,
        FloatPrecision::Decimal => 3,
        FloatPrecision::Quad => 4,
    }
}

/// Owns every interned [`Type`] for one compiler instance. Never shared
/// across instances, never locked — the front end is single-threaded.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<Type>,
    void_id: Option<TypeId>,
    bool_id: Option<TypeId>,
    string_id: Option<TypeId>,
    any_id: Option<TypeId>,
    int_cache: Vec<((u8, bool), TypeId)>,
    float_cache: Vec<(FloatPrecision, TypeId)>,
    pointer_bucket: Vec<TypeId>,
    optional_bucket: Vec<TypeId>,
    function_bucket: Vec<TypeId>,
    tuple_bucket: Vec<TypeId>,
    array_bucket: Vec<TypeId>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn alloc(&mut self, ty: Type) -> TypeId {
        let id = TypeId::new(u32::try_from(self.types.len()).expect("type registry overflow"));
        self.types.push(ty);
        id
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> &Type { &self.types[id.index()] }

    pub fn void(&mut self) -> TypeId {
        if let Some(id) = self.void_id {
            return id;
        }
        let id = self.alloc(Type::Void);
        self.void_id = Some(id);
        id
    }

    pub fn bool(&mut self) -> TypeId {
        if let Some(id) = self.bool_id {
            return id;
        }
        let id = self.alloc(Type::Bool);
        self.bool_id = Some(id);
        id
    }

    pub fn string(&mut self) -> TypeId {
        if let Some(id) = self.string_id {
            return id;
        }
        let id = self.alloc(Type::String);
        self.string_id = Some(id);
        id
    }

    pub fn any(&mut self) -> TypeId {
        if let Some(id) = self.any_id {
            return id;
        }
        let id = self.alloc(Type::Any);
        self.any_id = Some(id);
        id
    }

    pub fn integer(&mut self, width: u8, signed: bool) -> TypeId {
        if let Some((_, id)) = self.int_cache.iter().find(|((w, s), _)| *w == width && *s == signed) {
            return *id;
        }
        let id = self.alloc(Type::Integer { width, signed });
        self.int_cache.push(((width, signed), id));
        id
    }

    pub fn float(&mut self, precision: FloatPrecision) -> TypeId {
        if let Some((_, id)) = self.float_cache.iter().find(|(p, _)| *p == precision) {
            return *id;
        }
        let id = self.alloc(Type::Float(precision));
        self.float_cache.push((precision, id));
        id
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        if let Some(&id) = self.pointer_bucket.iter().find(|&&id| self.get(id) == &Type::Pointer(elem)) {
            return id;
        }
        let id = self.alloc(Type::Pointer(elem));
        self.pointer_bucket.push(id);
        id
    }

    pub fn optional(&mut self, inner: TypeId) -> TypeId {
        if let Some(&id) = self.optional_bucket.iter().find(|&&id| self.get(id) == &Type::Optional(inner)) {
            return id;
        }
        let id = self.alloc(Type::Optional(inner));
        self.optional_bucket.push(id);
        id
    }

    pub fn function(&mut self, params: Vec<TypeId>, return_type: TypeId, varargs: bool) -> TypeId {
        let candidate = Type::Function { params: params.clone(), return_type, varargs };
        if let Some(&id) = self.function_bucket.iter().find(|&&id| self.get(id) == &candidate) {
            return id;
        }
        let id = self.alloc(candidate);
        self.function_bucket.push(id);
        id
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        let candidate = Type::Tuple(elements);
        if let Some(&id) = self.tuple_bucket.iter().find(|&&id| self.get(id) == &candidate) {
            return id;
        }
        let id = self.alloc(candidate);
        self.tuple_bucket.push(id);
        id
    }

    pub fn array(&mut self, element: TypeId, length: Option<u64>) -> TypeId {
        let candidate = Type::Array { element, length };
        if let Some(&id) = self.array_bucket.iter().find(|&&id| self.get(id) == &candidate) {
            return id;
        }
        let id = self.alloc(candidate);
        self.array_bucket.push(id);
        id
    }

    /// Always allocates a fresh id; callers (the resolver's generic
    /// instance cache) are responsible for not calling this twice for
    /// what should be the same instance.
    pub fn fresh_struct(&mut self, name: String, decl: DeclId, type_args: Vec<TypeId>) -> TypeId {
        self.alloc(Type::Struct { name, decl, type_args })
    }

    pub fn fresh_class(&mut self, name: String, decl: DeclId, type_args: Vec<TypeId>) -> TypeId {
        self.alloc(Type::Class { name, decl, type_args })
    }

    pub fn fresh_alias(&mut self, name: String, target: TypeId) -> TypeId {
        self.alloc(Type::Alias { name, target })
    }

    /// Follows an alias chain to its non-alias target. Capped at the
    /// registry's own size so a (disallowed) alias cycle can't loop
    /// forever.
    #[must_use]
    pub fn unwrap(&self, mut id: TypeId) -> TypeId {
        let mut steps = 0;
        while let Type::Alias { target, .. } = self.get(id) {
            id = *target;
            steps += 1;
            if steps > self.types.len() {
                return id;
            }
        }
        id
    }

    /// Structural equality after unwrapping both sides through alias
    /// chains. Nested `TypeId`s compare by physical identity, which is
    /// sound because every compound shape is interned.
    #[must_use]
    pub fn compare_types(&self, a: TypeId, b: TypeId) -> bool {
        let a = self.unwrap(a);
        let b = self.unwrap(b);
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (Type::Struct { decl: da, type_args: ta, .. }, Type::Struct { decl: db, type_args: tb, .. })
            | (Type::Class { decl: da, type_args: ta, .. }, Type::Class { decl: db, type_args: tb, .. }) => {
                da == db
                    && ta.len() == tb.len()
                    && ta.iter().zip(tb).all(|(x, y)| self.compare_types(*x, *y))
            }
            _ => self.get(a) == self.get(b),
        }
    }

    /// The implicit conversion matrix (spec §4.4).
    #[must_use]
    pub fn can_convert_implicit(&self, from: TypeId, to: TypeId, from_is_constant: bool) -> bool {
        let from_u = self.unwrap(from);
        let to_u = self.unwrap(to);
        if self.compare_types(from_u, to_u) {
            return true;
        }

        match (self.get(from_u), self.get(to_u)) {
            (Type::Integer { width: fw, .. }, Type::Integer { width: tw, .. }) => {
                tw >= fw || (from_is_constant && *fw <= 32)
            }
            (Type::Integer { .. }, Type::Bool) => true,
            (Type::Bool, Type::Integer { .. }) => from_is_constant,
            (Type::Float(fp), Type::Float(tp)) => float_rank(*tp) >= float_rank(*fp) || from_is_constant,
            (Type::Integer { .. }, Type::Float(_)) => true,
            (Type::Pointer(fe), Type::Pointer(te)) => {
                matches!(self.get(self.unwrap(*fe)), Type::Void)
                    || matches!(self.get(self.unwrap(*te)), Type::Void)
            }
            (Type::Pointer(elem), Type::Optional(inner)) => {
                matches!(self.get(self.unwrap(*elem)), Type::Void) && self.compare_types(*elem, *inner)
                    || matches!(self.get(self.unwrap(*elem)), Type::Void)
            }
            (_, Type::Optional(inner)) => self.can_convert_implicit(from_u, *inner, from_is_constant),
            (_, Type::Any) | (Type::Any, _) => true,
            (Type::Array { element: fe, length: Some(_) }, Type::Array { element: te, length: None }) => {
                self.compare_types(*fe, *te)
            }
            (Type::Array { element: fe, length: Some(fl) }, Type::Array { element: te, length: Some(tl) }) => {
                self.can_convert_implicit(*fe, *te, from_is_constant) && from_is_constant && fl == tl
            }
            (Type::Tuple(elems), Type::Array { element: te, .. }) => {
                from_is_constant && elems.iter().all(|e| self.compare_types(*e, *te))
            }
            (Type::Tuple(elems), Type::Struct { type_args, .. } | Type::Class { type_args, .. }) => {
                from_is_constant
                    && elems.len() == type_args.len()
                    && elems
                        .iter()
                        .zip(type_args)
                        .all(|(e, t)| self.can_convert_implicit(*e, *t, from_is_constant))
            }
            (Type::Pointer(_), Type::Class { .. } | Type::Function { .. }) => from_is_constant,
            (Type::Pointer(_), Type::String) => true,
            (Type::Pointer(elem), _) if matches!(self.get(self.unwrap(*elem)), Type::Integer { width: 8, signed: true }) => {
                matches!(self.get(to_u), Type::String)
            }
            _ => false,
        }
    }

    /// Explicit cast: the implicit matrix plus the obvious numeric,
    /// pointer-integer, and function-pointer casts.
    #[must_use]
    pub fn can_convert(&self, from: TypeId, to: TypeId, from_is_constant: bool) -> bool {
        if self.can_convert_implicit(from, to, from_is_constant) {
            return true;
        }
        let from_u = self.unwrap(from);
        let to_u = self.unwrap(to);
        match (self.get(from_u), self.get(to_u)) {
            (Type::Integer { .. } | Type::Float(_) | Type::Bool, Type::Integer { .. } | Type::Float(_) | Type::Bool) => true,
            (Type::Pointer(_), Type::Integer { .. }) | (Type::Integer { .. }, Type::Pointer(_)) => true,
            (Type::Function { .. }, Type::Pointer(_)) | (Type::Pointer(_), Type::Function { .. }) => true,
            _ => false,
        }
    }

    /// The arithmetic promotion result for a binary operator's operand
    /// types, per spec §4.4. `None` means the operands don't combine
    /// structurally and the resolver should fall back to operator-overload
    /// search.
    #[must_use]
    pub fn binary_operator_type_meet(&mut self, l: TypeId, r: TypeId) -> Option<TypeId> {
        let lu = self.unwrap(l);
        let ru = self.unwrap(r);
        match (self.get(lu).clone(), self.get(ru).clone()) {
            (Type::Integer { width: lw, signed: ls }, Type::Integer { width: rw, signed: rs }) => {
                Some(self.integer(lw.max(rw), ls || rs))
            }
            (Type::Float(lp), Type::Float(rp)) => {
                Some(self.float(if float_rank(lp) >= float_rank(rp) { lp } else { rp }))
            }
            (Type::Integer { .. }, Type::Float(p)) | (Type::Float(p), Type::Integer { .. }) => Some(self.float(p)),
            (Type::Pointer(_), Type::Integer { .. }) => Some(lu),
            (Type::Integer { .. }, Type::Pointer(_)) => Some(ru),
            (Type::Pointer(le), Type::Pointer(re)) => {
                if matches!(self.get(self.unwrap(le)), Type::Void) { Some(ru) } else { Some(lu) }
            }
            (Type::String, Type::String) => Some(lu),
            _ => None,
        }
    }

    /// Canonical pretty-print, used both for diagnostics and for the
    /// round-trip testable property.
    #[must_use]
    pub fn pretty_print(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Void => "void".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Integer { width, signed } => format!("{}{width}", if *signed { "int" } else { "uint" }),
            Type::Float(FloatPrecision::Half) => "half".to_string(),
            Type::Float(FloatPrecision::Single) => "float".to_string(),
            Type::Float(FloatPrecision::Double) => "double".to_string(),
            Type::Float(FloatPrecision::Decimal) => "decimal".to_string(),
            Type::Float(FloatPrecision::Quad) => "quad".to_string(),
            Type::String => "string".to_string(),
            Type::Any => "any".to_string(),
            Type::Pointer(e) => format!("{}*", self.pretty_print(*e)),
            Type::Optional(e) => format!("{}?", self.pretty_print(*e)),
            Type::Function { params, return_type, varargs } => {
                let mut parts: Vec<String> = params.iter().map(|p| self.pretty_print(*p)).collect();
                if *varargs {
                    parts.push("...".to_string());
                }
                format!("({}) -> {}", parts.join(", "), self.pretty_print(*return_type))
            }
            Type::Tuple(elems) => {
                format!("({})", elems.iter().map(|e| self.pretty_print(*e)).collect::<Vec<_>>().join(", "))
            }
            Type::Array { element, length: Some(n) } => format!("{}[{n}]", self.pretty_print(*element)),
            Type::Array { element, length: None } => format!("{}[]", self.pretty_print(*element)),
            Type::Struct { name, type_args, .. } | Type::Class { name, type_args, .. } => {
                if type_args.is_empty() {
                    name.clone()
                } else {
                    format!(
                        "{name}<{}>",
                        type_args.iter().map(|t| self.pretty_print(*t)).collect::<Vec<_>>().join(", ")
                    )
                }
            }
            Type::Alias { name, .. } => name.clone(),
        }
    }
}
