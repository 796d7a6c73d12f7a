//! Declarations, the `DeclarationArena` that owns them, and the `File`
//! root node.
//!
//! Every declaration is allocated once into a `DeclarationArena` and
//! referenced everywhere else — from its owning `File`, from sibling
//! declarations (a class's methods), and from `TypeId` payloads in the
//! `TypeRegistry` — by `DeclId`. This is the one place the AST departs
//! from pure tree ownership, because the data model explicitly treats
//! declaration handles referenced from `TypeID` values and from
//! expressions as borrow relationships rather than ownership.

use corvid_source::types::{FileID, SourceSpan};

use crate::expr::Expression;
use crate::ids::DeclId;
use crate::module::ImportDecl;
use crate::stmt::Statement;
use crate::types::TypeExpr;

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub type_expr: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub type_expr: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub varargs: bool,
    /// `None` for a forward declaration or an `extern` prototype.
    pub body: Option<Vec<Statement>>,
    pub is_extern: bool,
    /// Set for struct/class methods and constructors; `owner` names the
    /// declaration it belongs to so the mangler can qualify the name.
    pub owner: Option<DeclId>,
    pub is_constructor: bool,
    pub is_operator: Option<OperatorKind>,
    pub is_entry_point: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Unary(crate::expr::UnaryOp),
    Binary(crate::expr::BinaryOp),
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<DeclId>,
    /// `false` for a forward-declared `struct Foo;` with no body yet.
    pub has_body: bool,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<DeclId>,
    pub constructors: Vec<DeclId>,
    pub base: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<(String, Option<Expression>)>,
}

#[derive(Debug, Clone)]
pub struct TypedefDecl {
    pub name: String,
    pub target: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct MacroDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Expression,
}

#[derive(Debug, Clone)]
pub struct GlobalDecl {
    pub name: String,
    pub declared_type: Option<TypeExpr>,
    pub init: Option<Expression>,
    pub is_const: bool,
    pub is_extern: bool,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
    Function(FunctionDecl),
    Struct(StructDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    Macro(MacroDecl),
    Global(GlobalDecl),
}

impl DeclarationKind {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(d) => &d.name,
            Self::Struct(d) => &d.name,
            Self::Class(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::Typedef(d) => &d.name,
            Self::Macro(d) => &d.name,
            Self::Global(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub kind: DeclarationKind,
    pub span: SourceSpan,
    pub is_public: bool,
}

/// Owns every `Declaration` produced while parsing and while instantiating
/// generics. Generic instantiation clones the generic declaration's
/// `DeclarationKind` and re-allocates it here under a fresh `DeclId`
/// *before* resolving its body, so a recursive generic type sees its own
/// instance already present and does not recurse forever.
#[derive(Debug, Default)]
pub struct DeclarationArena {
    declarations: Vec<Declaration>,
}

impl DeclarationArena {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn alloc(&mut self, kind: DeclarationKind, span: SourceSpan, is_public: bool) -> DeclId {
        let id = DeclId::new(u32::try_from(self.declarations.len()).expect("decl arena overflow"));
        self.declarations.push(Declaration { id, kind, span, is_public });
        id
    }

    #[must_use]
    pub fn get(&self, id: DeclId) -> &Declaration { &self.declarations[id.index()] }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration { &mut self.declarations[id.index()] }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> { self.declarations.iter() }

    /// Consumes the arena, yielding its declarations in allocation order.
    /// Used when folding one file's freshly parsed arena into a shared
    /// whole-program arena.
    pub fn into_iter(self) -> impl Iterator<Item = Declaration> { self.declarations.into_iter() }

    #[must_use]
    pub fn len(&self) -> usize { self.declarations.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.declarations.is_empty() }
}

/// One parsed source file: its `module`/`namespace` binding, its
/// `import`s, and the top-level declarations it owns (by reference into
/// the compilation's shared `DeclarationArena`).
#[derive(Debug, Clone)]
pub struct File {
    pub file_id: FileID,
    pub module_path: Option<Vec<String>>,
    pub namespace: Option<String>,
    pub imports: Vec<ImportDecl>,
    pub declarations: Vec<DeclId>,
}
