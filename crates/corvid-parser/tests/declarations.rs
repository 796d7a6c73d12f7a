//! Tests for top-level declaration parsing: functions, structs, classes,
//! enums, typedefs, macros, globals, operator overloads, and visibility.

use std::sync::Arc;

use corvid_ast::decl::{DeclarationKind, OperatorKind};
use corvid_ast::expr::{BinaryOp, UnaryOp};
use corvid_parser::parser::Parser;
use corvid_source::types::SourceManager;

fn parse(source: &str) -> (corvid_ast::File, corvid_ast::decl::DeclarationArena, corvid_parser::diagnostics::DiagnosticReporter) {
    let mut source_manager = SourceManager::new();
    let file_id = source_manager.add_file("test.cv".to_string(), source.to_string());
    let parser = Parser::new(source, file_id, Arc::new(source_manager));
    parser.parse_file()
}

fn parse_ok(source: &str) -> (corvid_ast::File, corvid_ast::decl::DeclarationArena) {
    let (file, decls, reporter) = parse(source);
    assert!(!reporter.has_errors(), "unexpected parse errors: {:?}", reporter.diagnostics());
    (file, decls)
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_simple_function() {
    let (file, decls) = parse_ok("func add(int a, int b) -> int { return a + b; }");
    let DeclarationKind::Function(f) = &decls.get(file.declarations[0]).kind else { panic!("expected a function") };
    assert_eq!(f.name, "add");
    assert_eq!(f.params.len(), 2);
    assert!(f.return_type.is_some());
    assert!(f.body.is_some());
}

#[test]
fn test_function_is_public_by_default() {
    let (file, decls) = parse_ok("func f() -> void { }");
    assert!(decls.get(file.declarations[0]).is_public);
}

#[test]
fn test_private_narrows_visibility() {
    let (file, decls) = parse_ok("private func f() -> void { }");
    assert!(!decls.get(file.declarations[0]).is_public);
}

#[test]
fn test_explicit_public_is_a_no_op() {
    let (file, decls) = parse_ok("public func f() -> void { }");
    assert!(decls.get(file.declarations[0]).is_public);
}

#[test]
fn test_extern_function_requires_no_body() {
    let (file, decls) = parse_ok("extern func puts(string s) -> int;");
    let DeclarationKind::Function(f) = &decls.get(file.declarations[0]).kind else { panic!("expected a function") };
    assert!(f.is_extern);
    assert!(f.body.is_none());
}

#[test]
fn test_extern_function_with_body_is_an_error() {
    let (_, _, reporter) = parse("extern func f() -> void { }");
    assert!(reporter.has_errors());
}

#[test]
fn test_generic_function_type_params() {
    let (file, decls) = parse_ok("func identity<T>(T x) -> T { return x; }");
    let DeclarationKind::Function(f) = &decls.get(file.declarations[0]).kind else { panic!("expected a function") };
    assert_eq!(f.type_params, vec!["T".to_string()]);
}

// ============================================================================
// Structs and classes
// ============================================================================

#[test]
fn test_forward_declared_struct() {
    let (file, decls) = parse_ok("struct Opaque;");
    let DeclarationKind::Struct(s) = &decls.get(file.declarations[0]).kind else { panic!("expected a struct") };
    assert!(!s.has_body);
    assert!(s.fields.is_empty());
}

#[test]
fn test_struct_with_fields_and_methods() {
    let (file, decls) = parse_ok(
        r"
        struct Point {
            double x;
            double y;

            func length() -> double { return x; }
        }
        ",
    );
    let DeclarationKind::Struct(s) = &decls.get(file.declarations[0]).kind else { panic!("expected a struct") };
    assert_eq!(s.fields.len(), 2);
    assert_eq!(s.methods.len(), 1);
    assert!(s.has_body);

    let DeclarationKind::Function(method) = &decls.get(s.methods[0]).kind else { panic!("expected a function") };
    assert_eq!(method.owner, Some(file.declarations[0]));
}

#[test]
fn test_class_constructor_detected_by_name() {
    let (file, decls) = parse_ok(
        r"
        class Point {
            double x;

            func Point(double x) { this.x = x; }

            func magnitude() -> double { return x; }
        }
        ",
    );
    let DeclarationKind::Class(c) = &decls.get(file.declarations[0]).kind else { panic!("expected a class") };
    assert_eq!(c.constructors.len(), 1);
    assert_eq!(c.methods.len(), 1);

    let DeclarationKind::Function(ctor) = &decls.get(c.constructors[0]).kind else { panic!("expected a function") };
    assert!(ctor.is_constructor);
}

#[test]
fn test_class_with_base() {
    let (file, decls) = parse_ok("class Derived : Base { }");
    let DeclarationKind::Class(c) = &decls.get(file.declarations[0]).kind else { panic!("expected a class") };
    assert_eq!(c.base, Some("Base".to_string()));
}

// ============================================================================
// Enums, typedefs, macros, globals
// ============================================================================

#[test]
fn test_enum_with_explicit_values() {
    let (file, decls) = parse_ok("enum Color { Red = 0, Green = 1, Blue = 2 }");
    let DeclarationKind::Enum(e) = &decls.get(file.declarations[0]).kind else { panic!("expected an enum") };
    assert_eq!(e.values.len(), 3);
    assert!(e.values[0].1.is_some());
}

#[test]
fn test_typedef() {
    let (file, decls) = parse_ok("typedef IntPtr = int*;");
    let DeclarationKind::Typedef(t) = &decls.get(file.declarations[0]).kind else { panic!("expected a typedef") };
    assert_eq!(t.name, "IntPtr");
}

#[test]
fn test_macro_decl() {
    let (file, decls) = parse_ok("macro square(x) = x * x;");
    let DeclarationKind::Macro(m) = &decls.get(file.declarations[0]).kind else { panic!("expected a macro") };
    assert_eq!(m.params, vec!["x".to_string()]);
}

#[test]
fn test_global_const() {
    let (file, decls) = parse_ok("const MAX: int = 100;");
    let DeclarationKind::Global(g) = &decls.get(file.declarations[0]).kind else { panic!("expected a global") };
    assert!(g.is_const);
    assert!(g.init.is_some());
}

// ============================================================================
// Operator overloads
// ============================================================================

#[test]
fn test_binary_operator_overload() {
    let (file, decls) = parse_ok(
        r"
        struct Vec2 {
            double x;
            operator +(Vec2 other) -> Vec2 { return this; }
        }
        ",
    );
    let DeclarationKind::Struct(s) = &decls.get(file.declarations[0]).kind else { panic!("expected a struct") };
    let DeclarationKind::Function(op) = &decls.get(s.methods[0]).kind else { panic!("expected a function") };
    assert_eq!(op.is_operator, Some(OperatorKind::Binary(BinaryOp::Add)));
}

#[test]
fn test_unary_operator_overload_disambiguated_by_arity() {
    let (file, decls) = parse_ok(
        r"
        struct Vec2 {
            double x;
            operator -() -> Vec2 { return this; }
        }
        ",
    );
    let DeclarationKind::Struct(s) = &decls.get(file.declarations[0]).kind else { panic!("expected a struct") };
    let DeclarationKind::Function(op) = &decls.get(s.methods[0]).kind else { panic!("expected a function") };
    assert_eq!(op.is_operator, Some(OperatorKind::Unary(UnaryOp::Negate)));
}

// ============================================================================
// Imports and module binding
// ============================================================================

#[test]
fn test_module_and_import_wildcards() {
    let (file, _) = parse_ok(
        r"
        module demo.app;
        import demo.util;
        import demo.widgets.*;
        import demo.core.**;

        func main() -> void { }
        ",
    );
    assert_eq!(file.module_path, Some(vec!["demo".to_string(), "app".to_string()]));
    assert_eq!(file.imports.len(), 3);
    assert_eq!(file.imports[0].wildcard, corvid_ast::module::ImportWildcard::None);
    assert_eq!(file.imports[1].wildcard, corvid_ast::module::ImportWildcard::Children);
    assert_eq!(file.imports[2].wildcard, corvid_ast::module::ImportWildcard::Transitive);
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_recovers_after_a_malformed_declaration_and_keeps_parsing() {
    let (file, decls, reporter) = parse(
        r"
        func broken(,);
        func ok() -> void { }
        ",
    );
    assert!(reporter.has_errors());
    let names: Vec<&str> = file.declarations.iter().map(|id| decls.get(*id).kind.name()).collect();
    assert!(names.contains(&"ok"));
}
