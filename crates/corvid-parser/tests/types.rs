//! Tests for type-expression parsing: builtin names, suffixes, the
//! function-type/tuple-type backtracking ambiguity, and generics.

use std::sync::Arc;

use corvid_ast::decl::DeclarationKind;
use corvid_ast::types::{FloatPrecision, TypeExprKind};
use corvid_parser::parser::Parser;
use corvid_source::types::SourceManager;

fn parse_global_type(type_src: &str) -> corvid_ast::types::TypeExpr {
    let source = format!("var x: {type_src};");
    let mut source_manager = SourceManager::new();
    let file_id = source_manager.add_file("test.cv".to_string(), source.clone());
    let parser = Parser::new(&source, file_id, Arc::new(source_manager));
    let (file, decls, reporter) = parser.parse_file();
    assert!(!reporter.has_errors(), "unexpected parse errors: {:?}", reporter.diagnostics());

    let DeclarationKind::Global(g) = &decls.get(file.declarations[0]).kind else { panic!("expected a global") };
    g.declared_type.clone().expect("declared type")
}

// ============================================================================
// Builtin primitive names
// ============================================================================

#[test]
fn test_void_and_bool() {
    assert!(matches!(parse_global_type("void").kind, TypeExprKind::Void));
    assert!(matches!(parse_global_type("bool").kind, TypeExprKind::Bool));
}

#[test]
fn test_string_and_any() {
    assert!(matches!(parse_global_type("string").kind, TypeExprKind::StringT));
    assert!(matches!(parse_global_type("any").kind, TypeExprKind::Any));
}

#[test]
fn test_float_precisions() {
    assert!(matches!(parse_global_type("half").kind, TypeExprKind::Float(FloatPrecision::Half)));
    assert!(matches!(parse_global_type("float").kind, TypeExprKind::Float(FloatPrecision::Single)));
    assert!(matches!(parse_global_type("single").kind, TypeExprKind::Float(FloatPrecision::Single)));
    assert!(matches!(parse_global_type("double").kind, TypeExprKind::Float(FloatPrecision::Double)));
    assert!(matches!(parse_global_type("decimal").kind, TypeExprKind::Float(FloatPrecision::Decimal)));
    assert!(matches!(parse_global_type("quad").kind, TypeExprKind::Float(FloatPrecision::Quad)));
}

#[test]
fn test_sized_integer_names() {
    assert!(matches!(parse_global_type("int").kind, TypeExprKind::Integer { width: 32, signed: true }));
    assert!(matches!(parse_global_type("uint").kind, TypeExprKind::Integer { width: 32, signed: false }));
    assert!(matches!(parse_global_type("int8").kind, TypeExprKind::Integer { width: 8, signed: true }));
    assert!(matches!(parse_global_type("byte").kind, TypeExprKind::Integer { width: 8, signed: true }));
    assert!(matches!(parse_global_type("uint64").kind, TypeExprKind::Integer { width: 64, signed: false }));
}

#[test]
fn test_iN_uN_keyword_spellings() {
    assert!(matches!(parse_global_type("i8").kind, TypeExprKind::Integer { width: 8, signed: true }));
    assert!(matches!(parse_global_type("i16").kind, TypeExprKind::Integer { width: 16, signed: true }));
    assert!(matches!(parse_global_type("i32").kind, TypeExprKind::Integer { width: 32, signed: true }));
    assert!(matches!(parse_global_type("i64").kind, TypeExprKind::Integer { width: 64, signed: true }));
    assert!(matches!(parse_global_type("u8").kind, TypeExprKind::Integer { width: 8, signed: false }));
    assert!(matches!(parse_global_type("u16").kind, TypeExprKind::Integer { width: 16, signed: false }));
    assert!(matches!(parse_global_type("u32").kind, TypeExprKind::Integer { width: 32, signed: false }));
    assert!(matches!(parse_global_type("u64").kind, TypeExprKind::Integer { width: 64, signed: false }));
}

// ============================================================================
// Named types and generics
// ============================================================================

#[test]
fn test_named_type_path() {
    let ty = parse_global_type("widgets.Button");
    let TypeExprKind::Named { path, type_args } = ty.kind else { panic!("expected a named type") };
    assert_eq!(path, vec!["widgets".to_string(), "Button".to_string()]);
    assert!(type_args.is_empty());
}

#[test]
fn test_generic_named_type() {
    let ty = parse_global_type("Pair<int, string>");
    let TypeExprKind::Named { path, type_args } = ty.kind else { panic!("expected a named type") };
    assert_eq!(path, vec!["Pair".to_string()]);
    assert_eq!(type_args.len(), 2);
}

// ============================================================================
// Suffixes: pointer, optional, array
// ============================================================================

#[test]
fn test_pointer_suffix() {
    assert!(matches!(parse_global_type("int*").kind, TypeExprKind::Pointer(_)));
}

#[test]
fn test_optional_suffix() {
    assert!(matches!(parse_global_type("int?").kind, TypeExprKind::Optional(_)));
}

#[test]
fn test_unsized_array() {
    let ty = parse_global_type("int[]");
    let TypeExprKind::Array { length, .. } = ty.kind else { panic!("expected an array type") };
    assert!(length.is_none());
}

#[test]
fn test_sized_array() {
    let ty = parse_global_type("int[10]");
    let TypeExprKind::Array { length, .. } = ty.kind else { panic!("expected an array type") };
    assert!(length.is_some());
}

#[test]
fn test_suffixes_compose() {
    // pointer-to-optional-int, then made into an array of those
    let ty = parse_global_type("int?*[]");
    let TypeExprKind::Array { element, .. } = ty.kind else { panic!("expected an array type") };
    let TypeExprKind::Pointer(inner) = element.kind else { panic!("expected a pointer type") };
    assert!(matches!(inner.kind, TypeExprKind::Optional(_)));
}

// ============================================================================
// Function types vs. tuple types
// ============================================================================

#[test]
fn test_single_element_parens_collapse_to_the_element() {
    let ty = parse_global_type("(int)");
    assert!(matches!(ty.kind, TypeExprKind::Integer { width: 32, signed: true }));
}

#[test]
fn test_multi_element_parens_is_a_tuple() {
    let ty = parse_global_type("(int, string)");
    let TypeExprKind::Tuple(elements) = ty.kind else { panic!("expected a tuple type") };
    assert_eq!(elements.len(), 2);
}

#[test]
fn test_parenthesized_list_with_arrow_is_a_function_type() {
    let ty = parse_global_type("(int, int) -> bool");
    let TypeExprKind::Function { params, return_type, varargs } = ty.kind else { panic!("expected a function type") };
    assert_eq!(params.len(), 2);
    assert!(!varargs);
    assert!(matches!(return_type.kind, TypeExprKind::Bool));
}

#[test]
fn test_variadic_function_type() {
    let ty = parse_global_type("(int, ...) -> void");
    let TypeExprKind::Function { varargs, .. } = ty.kind else { panic!("expected a function type") };
    assert!(varargs);
}
