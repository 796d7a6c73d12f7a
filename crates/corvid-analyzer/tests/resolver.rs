//! End-to-end resolver tests: parse a small program, resolve it, and
//! check the properties the analyzer is responsible for guaranteeing.

use std::sync::Arc;

use corvid_analyzer::AnalysisContext;
use corvid_ast::decl::DeclarationKind;
use corvid_ast::expr::{Binding, ExpressionKind};
use corvid_ast::stmt::StatementKind;
use corvid_parser::parser::Parser;
use corvid_source::types::SourceManager;

fn analyze(source: &str) -> AnalysisContext {
    let mut manager = SourceManager::new();
    let file_id = manager.add_file("test.cv".to_string(), source.to_string());
    let manager = Arc::new(manager);
    let parser = Parser::new(source, file_id, manager);
    let (file, decls, reporter) = parser.parse_file();
    assert!(!reporter.has_errors(), "unexpected parse errors: {:?}", reporter);
    AnalysisContext::analyze(vec![file], decls)
}

#[test]
fn resolves_a_simple_entry_point() {
    let ctx = analyze("func main() -> i32 { let x = 1 + 2u64; return 0; }");
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());
    assert!(ctx.program().entry_point.is_some());
}

#[test]
fn call_resolves_to_the_matching_overload() {
    let ctx = analyze(
        r"
        func add(i32 a, i32 b) -> i32 { return a + b; }
        func add(float a, float b) -> float { return a + b; }
        func main() -> i32 {
            var x: i32 = add(1, 2);
            return x;
        }
        ",
    );
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());

    let program = ctx.program();
    for decl in program.decls.iter() {
        if let DeclarationKind::Function(f) = &decl.kind {
            if f.name == "main" {
                let body = f.body.as_ref().unwrap();
                let StatementKind::VarDecl(binding) = &body[0].kind else { panic!("expected var decl") };
                let ExpressionKind::Call { resolved_callee, .. } = &binding.init.as_ref().unwrap().kind else {
                    panic!("expected call")
                };
                assert!(resolved_callee.get().is_some(), "call should resolve to one overload");
            }
        }
    }
}

#[test]
fn undefined_identifier_is_reported() {
    let ctx = analyze("func main() -> int { return undeclared_name; }");
    assert!(!ctx.is_ok());
    assert!(ctx
        .errors()
        .iter()
        .any(|e| matches!(e, corvid_analyzer::ResolveError::UndefinedIdentifier { .. })));
}

#[test]
fn struct_field_types_resolve_and_compare_equal_to_themselves() {
    let ctx = analyze(
        r"
        struct Point {
            i32 x;
            i32 y;
        }
        func main() -> i32 { return 0; }
        ",
    );
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());
    let program = ctx.program();
    for decl in program.decls.iter() {
        if let DeclarationKind::Struct(s) = &decl.kind {
            for field in &s.fields {
                let ty = field.type_expr.resolved.get().expect("field type should resolve");
                assert!(program.registry.compare_types(ty, ty), "a type always compares equal to itself");
            }
        }
    }
}

#[test]
fn break_inside_a_loop_finds_the_enclosing_loop() {
    let ctx = analyze(
        r"
        func main() -> i32 {
            while (true) {
                break;
            }
            return 0;
        }
        ",
    );
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());
}

#[test]
fn generic_struct_instantiated_twice_with_equal_arguments_collapses_to_one_instance() {
    let ctx = analyze(
        r"
        struct Box<T> {
            T value;
        }
        func main() -> i32 {
            var a: Box<i32>;
            var b: Box<i32>;
            return 0;
        }
        ",
    );
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());
    let program = ctx.program();
    let generic_decl = program
        .decls
        .iter()
        .find(|d| matches!(&d.kind, DeclarationKind::Struct(s) if s.name == "Box"))
        .map(|d| d.id)
        .expect("Box declared");
    let instances = program.generic_instances.get(&generic_decl).cloned().unwrap_or_default();
    assert_eq!(instances.len(), 1, "Box<int> used twice should instantiate once");
}

#[test]
fn enum_values_resolve_to_an_i32_aliased_type() {
    let ctx = analyze(
        r"
        enum Color { Red, Green, Blue }
        func main() -> i32 {
            var c: Color = Color.Red;
            return 0;
        }
        ",
    );
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());
}

#[test]
fn local_variable_shadows_a_same_named_global() {
    let ctx = analyze(
        r"
        const value: i32 = 1;
        func main() -> i32 {
            let value = 2;
            return value;
        }
        ",
    );
    assert!(ctx.is_ok(), "errors: {:?}", ctx.errors());
    let program = ctx.program();
    for decl in program.decls.iter() {
        if let DeclarationKind::Function(f) = &decl.kind {
            if f.name == "main" {
                let body = f.body.as_ref().unwrap();
                let StatementKind::Return(Some(expr)) = &body[1].kind else { panic!("expected return") };
                let ExpressionKind::Identifier { resolved, .. } = &expr.kind else { panic!("expected identifier") };
                assert!(matches!(resolved.get(), Some(Binding::Local(_))), "local should shadow the global const");
            }
        }
    }
}
