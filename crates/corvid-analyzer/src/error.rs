//! Resolver error taxonomy.

use corvid_source::types::SourceSpan;
use thiserror::Error;

/// Errors raised during name resolution and type checking (spec §7,
/// "Resolve errors"). Every variant carries the span of the construct
/// that triggered it so the diagnostic callback can report
/// `(file, line, column)`.
#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier { name: String, span: SourceSpan },

    #[error("undefined type '{name}'")]
    UndefinedType { name: String, span: SourceSpan },

    #[error("ambiguous function call to '{name}'")]
    AmbiguousOverload { name: String, span: SourceSpan },

    #[error("no matching overload for '{name}'")]
    NoMatchingOverload { name: String, span: SourceSpan },

    #[error("'{name}' is not visible from this module")]
    VisibilityViolation { name: String, span: SourceSpan },

    #[error("wrong number of arguments: expected {expected}, found {found}")]
    WrongArgumentCount { expected: usize, found: usize, span: SourceSpan },

    #[error("incompatible types in assignment: cannot assign '{found}' to '{expected}'")]
    IncompatibleAssignment { expected: String, found: String, span: SourceSpan },

    #[error("incompatible return type: expected '{expected}', found '{found}'")]
    IncompatibleReturn { expected: String, found: String, span: SourceSpan },

    #[error("incompatible argument type: expected '{expected}', found '{found}'")]
    IncompatibleArgument { expected: String, found: String, span: SourceSpan },

    #[error("incompatible initializer type: expected '{expected}', found '{found}'")]
    IncompatibleInitializer { expected: String, found: String, span: SourceSpan },

    #[error("left-hand side of assignment is not an lvalue")]
    NonLvalueAssignment { span: SourceSpan },

    #[error("cannot assign to constant '{name}'")]
    AssignmentToConstant { name: String, span: SourceSpan },

    #[error("dereference of non-pointer type '{found}'")]
    DerefOfNonPointer { found: String, span: SourceSpan },

    #[error("invalid cast from '{from}' to '{to}'")]
    InvalidCast { from: String, to: String, span: SourceSpan },

    #[error("wrong number of type arguments: expected {expected}, found {found}")]
    TypeArgumentCountMismatch { expected: usize, found: usize, span: SourceSpan },

    #[error("duplicate definition of '{name}'")]
    DuplicateDefinition { name: String, first_span: SourceSpan, span: SourceSpan },

    #[error("array length is not a constant expression")]
    NonConstantArrayLength { span: SourceSpan },

    #[error("constructor call on non-class type '{found}'")]
    ConstructorOnNonClass { found: String, span: SourceSpan },

    #[error("'{name}' is generic but was used without type arguments")]
    GenericUsedWithoutArguments { name: String, span: SourceSpan },

    #[error("'{name}' is not generic but was given type arguments")]
    NonGenericGivenArguments { name: String, span: SourceSpan },
}

impl ResolveError {
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::UndefinedIdentifier { span, .. }
            | Self::UndefinedType { span, .. }
            | Self::AmbiguousOverload { span, .. }
            | Self::NoMatchingOverload { span, .. }
            | Self::VisibilityViolation { span, .. }
            | Self::WrongArgumentCount { span, .. }
            | Self::IncompatibleAssignment { span, .. }
            | Self::IncompatibleReturn { span, .. }
            | Self::IncompatibleArgument { span, .. }
            | Self::IncompatibleInitializer { span, .. }
            | Self::NonLvalueAssignment { span }
            | Self::AssignmentToConstant { span, .. }
            | Self::DerefOfNonPointer { span, .. }
            | Self::InvalidCast { span, .. }
            | Self::TypeArgumentCountMismatch { span, .. }
            | Self::DuplicateDefinition { span, .. }
            | Self::NonConstantArrayLength { span }
            | Self::ConstructorOnNonClass { span, .. }
            | Self::GenericUsedWithoutArguments { span, .. }
            | Self::NonGenericGivenArguments { span, .. } => *span,
        }
    }
}
