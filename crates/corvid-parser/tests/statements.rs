//! Tests for statement parsing: control flow, the for/foreach ambiguity,
//! variable declarations, and block-level error recovery.

use std::sync::Arc;

use corvid_ast::decl::DeclarationKind;
use corvid_ast::stmt::StatementKind;
use corvid_parser::parser::Parser;
use corvid_source::types::SourceManager;

fn parse_body(body: &str) -> Vec<corvid_ast::stmt::Statement> {
    let source = format!("func main() -> void {{\n{body}\n}}");
    let mut source_manager = SourceManager::new();
    let file_id = source_manager.add_file("test.cv".to_string(), source.clone());
    let parser = Parser::new(&source, file_id, Arc::new(source_manager));
    let (file, decls, reporter) = parser.parse_file();
    assert!(!reporter.has_errors(), "unexpected parse errors: {:?}", reporter.diagnostics());

    let DeclarationKind::Function(func) = &decls.get(file.declarations[0]).kind else { panic!("expected a function") };
    func.body.clone().expect("function has a body")
}

// ============================================================================
// Simple statements
// ============================================================================

#[test]
fn test_break_and_continue() {
    let stmts = parse_body("while (true) { break; }");
    let StatementKind::While { body, .. } = &stmts[0].kind else { panic!("expected a while loop") };
    let StatementKind::Block(inner) = &body.kind else { panic!("expected a block") };
    assert!(matches!(inner[0].kind, StatementKind::Break));
}

#[test]
fn test_return_with_and_without_value() {
    let with_value = parse_body("return 1;");
    assert!(matches!(with_value[0].kind, StatementKind::Return(Some(_))));

    let bare = parse_body("return;");
    assert!(matches!(bare[0].kind, StatementKind::Return(None)));
}

#[test]
fn test_var_decl_with_type_and_init() {
    let stmts = parse_body("var x: int = 5;");
    let StatementKind::VarDecl(binding) = &stmts[0].kind else { panic!("expected a var decl") };
    assert_eq!(binding.name, "x");
    assert!(binding.declared_type.is_some());
    assert!(binding.init.is_some());
    assert!(!binding.is_const);
}

#[test]
fn test_const_decl() {
    let stmts = parse_body("const y = 10;");
    let StatementKind::VarDecl(binding) = &stmts[0].kind else { panic!("expected a var decl") };
    assert!(binding.is_const);
}

#[test]
fn test_assert_with_message() {
    let stmts = parse_body(r#"assert(x > 0, "must be positive");"#);
    let StatementKind::Assert { message, .. } = &stmts[0].kind else { panic!("expected an assert") };
    assert_eq!(message.as_deref(), Some("must be positive"));
}

#[test]
fn test_free_and_defer() {
    let stmts = parse_body("free(ptr); defer free(other);");
    assert!(matches!(stmts[0].kind, StatementKind::Free(_)));
    let StatementKind::Defer(inner) = &stmts[1].kind else { panic!("expected a defer") };
    assert!(matches!(inner.kind, StatementKind::Free(_)));
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_else() {
    let stmts = parse_body("if (x > 0) { return 1; } else { return 2; }");
    let StatementKind::If { else_branch, .. } = &stmts[0].kind else { panic!("expected an if") };
    assert!(else_branch.is_some());
}

#[test]
fn test_if_without_else() {
    let stmts = parse_body("if (x > 0) { return 1; }");
    let StatementKind::If { else_branch, .. } = &stmts[0].kind else { panic!("expected an if") };
    assert!(else_branch.is_none());
}

#[test]
fn test_while_loop() {
    let stmts = parse_body("while (i < 10) { i = i + 1; }");
    assert!(matches!(stmts[0].kind, StatementKind::While { .. }));
}

// ============================================================================
// for vs. foreach disambiguation
// ============================================================================

#[test]
fn test_c_style_for_loop() {
    let stmts = parse_body("for (var i: int = 0; i < 10; i = i + 1) { }");
    let StatementKind::For { init, cond, step, .. } = &stmts[0].kind else { panic!("expected a C-style for loop") };
    assert!(init.is_some());
    assert!(cond.is_some());
    assert!(step.is_some());
}

#[test]
fn test_foreach_loop() {
    let stmts = parse_body("for (item in items) { }");
    let StatementKind::ForEach { binding, .. } = &stmts[0].kind else { panic!("expected a foreach loop") };
    assert_eq!(binding, "item");
}

#[test]
fn test_c_style_for_with_all_clauses_empty() {
    let stmts = parse_body("for (;;) { break; }");
    let StatementKind::For { init, cond, step, .. } = &stmts[0].kind else { panic!("expected a C-style for loop") };
    assert!(init.is_none());
    assert!(cond.is_none());
    assert!(step.is_none());
}

// ============================================================================
// Nested blocks and error recovery
// ============================================================================

#[test]
fn test_nested_blocks() {
    let stmts = parse_body("{ { return 1; } }");
    let StatementKind::Block(outer) = &stmts[0].kind else { panic!("expected a block") };
    assert!(matches!(outer[0].kind, StatementKind::Block(_)));
}

#[test]
fn test_recovers_after_malformed_statement_and_keeps_parsing_the_block() {
    let source = r"
    func main() -> void {
        var ;
        return 1;
    }
    ";
    let mut source_manager = SourceManager::new();
    let file_id = source_manager.add_file("test.cv".to_string(), source.to_string());
    let parser = Parser::new(source, file_id, Arc::new(source_manager));
    let (file, decls, reporter) = parser.parse_file();
    assert!(reporter.has_errors());

    let DeclarationKind::Function(func) = &decls.get(file.declarations[0]).kind else { panic!("expected a function") };
    let body = func.body.clone().expect("function has a body");
    assert!(matches!(body.last().expect("at least one statement").kind, StatementKind::Return(Some(_))));
}
