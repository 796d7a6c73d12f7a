//! Pre-resolution type syntax.
//!
//! `TypeExpr` is what the parser produces from a type annotation. It
//! carries a `resolved` cell that the resolver fills in with a `TypeId`
//! from the `TypeRegistry` once the type has been constructed and
//! interned — the same "annotate the AST in place" contract used for
//! `Expression::value_type`.

use std::cell::Cell;

use corvid_source::types::SourceSpan;

use crate::expr::Expression;
use crate::ids::TypeId;

/// Floating-point precision as written in source. Widths the target
/// platform cannot represent natively (`half`, 80-bit `decimal`, `quad`)
/// are accepted syntactically and downgraded to `Double` with a warning
/// during resolution rather than rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatPrecision {
    Half,
    Single,
    Double,
    Decimal,
    Quad,
}

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: SourceSpan,
    pub resolved: Cell<Option<TypeId>>,
}

impl TypeExpr {
    #[must_use]
    pub const fn new(kind: TypeExprKind, span: SourceSpan) -> Self {
        Self { kind, span, resolved: Cell::new(None) }
    }
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    Void,
    Bool,
    Integer { width: u8, signed: bool },
    Float(FloatPrecision),
    StringT,
    Any,
    /// A named type reference, e.g. `Foo` or `Pair<int, string>`. Resolved
    /// against structs, classes, enums, typedefs, or a bound type
    /// parameter in scope.
    Named { path: Vec<String>, type_args: Vec<TypeExpr> },
    Pointer(Box<TypeExpr>),
    Optional(Box<TypeExpr>),
    Function { params: Vec<TypeExpr>, return_type: Box<TypeExpr>, varargs: bool },
    Tuple(Vec<TypeExpr>),
    /// `length` is `None` for `elem[]` (unsized / inferred from an
    /// initializer) and `Some` for `elem[N]`, where `N` must fold to a
    /// non-negative constant integer during resolution.
    Array { element: Box<TypeExpr>, length: Option<Box<Expression>> },
}
