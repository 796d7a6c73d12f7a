//! Tests for expression parsing: precedence, associativity, compound
//! operator composition, and the `ident<` generic-call disambiguation.

use std::sync::Arc;

use corvid_ast::decl::DeclarationKind;
use corvid_ast::expr::{AssignOp, BinaryOp, ExpressionKind, UnaryOp};
use corvid_ast::stmt::StatementKind;
use corvid_parser::parser::Parser;
use corvid_source::types::SourceManager;

/// Parses a single source file and returns the body statements of its
/// first function declaration — the only public surface the parser
/// exposes is `parse_file`, so every expression/statement test smuggles
/// its snippet through a `return`/expression statement inside `main`.
fn parse_main_body(body: &str) -> Vec<corvid_ast::stmt::Statement> {
    let source = format!("func main() -> void {{\n{body}\n}}");
    let mut source_manager = SourceManager::new();
    let file_id = source_manager.add_file("test.cv".to_string(), source.clone());
    let parser = Parser::new(&source, file_id, Arc::new(source_manager));
    let (file, decls, reporter) = parser.parse_file();
    assert!(!reporter.has_errors(), "unexpected parse errors: {:?}", reporter.diagnostics());

    let decl_id = file.declarations[0];
    let DeclarationKind::Function(func) = &decls.get(decl_id).kind else { panic!("expected a function") };
    func.body.clone().expect("function has a body")
}

fn first_expr(body: &str) -> corvid_ast::expr::Expression {
    let stmts = parse_main_body(body);
    match &stmts[0].kind {
        StatementKind::Return(Some(e)) => e.clone(),
        StatementKind::Expr(e) => e.clone(),
        other => panic!("expected an expression-bearing statement, got {other:?}"),
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_integer_literal() {
    let expr = first_expr("return 42;");
    assert!(matches!(expr.kind, ExpressionKind::IntLiteral(42)));
}

#[test]
fn test_hex_and_bin_literals() {
    assert!(matches!(first_expr("return 0xFF;").kind, ExpressionKind::IntLiteral(255)));
    assert!(matches!(first_expr("return 0b1010;").kind, ExpressionKind::IntLiteral(10)));
}

#[test]
fn test_float_literal() {
    let expr = first_expr("return 3.14;");
    let ExpressionKind::FloatLiteral(v) = expr.kind else { panic!("expected a float literal") };
    assert!((v - 3.14).abs() < 1e-9);
}

#[test]
fn test_string_literal_unescapes() {
    let expr = first_expr(r#"return "hi\n";"#);
    let ExpressionKind::StringLiteral(s) = expr.kind else { panic!("expected a string literal") };
    assert_eq!(s, "hi\n");
}

#[test]
fn test_bool_and_null_literals() {
    assert!(matches!(first_expr("return true;").kind, ExpressionKind::BoolLiteral(true)));
    assert!(matches!(first_expr("return false;").kind, ExpressionKind::BoolLiteral(false)));
    assert!(matches!(first_expr("return null;").kind, ExpressionKind::NullLiteral));
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expr = first_expr("return 1 + 2 * 3;");
    let ExpressionKind::Binary { op: BinaryOp::Add, left, right } = expr.kind else { panic!("expected addition at the top") };
    assert!(matches!(left.kind, ExpressionKind::IntLiteral(1)));
    assert!(matches!(right.kind, ExpressionKind::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn test_assignment_is_right_associative() {
    let expr = first_expr("a = b = c;");
    let ExpressionKind::Assignment { op: AssignOp::Assign, value, .. } = expr.kind else {
        panic!("expected an assignment");
    };
    assert!(matches!(value.kind, ExpressionKind::Assignment { .. }));
}

#[test]
fn test_additive_is_left_associative() {
    let expr = first_expr("return a - b - c;");
    let ExpressionKind::Binary { op: BinaryOp::Sub, left, right } = expr.kind else { panic!("expected subtraction") };
    assert!(matches!(right.kind, ExpressionKind::Identifier { .. }));
    assert!(matches!(left.kind, ExpressionKind::Binary { op: BinaryOp::Sub, .. }));
}

#[test]
fn test_ternary_right_associative_else_branch() {
    let expr = first_expr("return a ? b : c ? d : e;");
    let ExpressionKind::Ternary { else_branch, .. } = expr.kind else { panic!("expected a ternary") };
    assert!(matches!(else_branch.kind, ExpressionKind::Ternary { .. }));
}

// ============================================================================
// Compound operator composition
// ============================================================================

#[test]
fn test_logical_and_or() {
    let expr = first_expr("return a && b || c;");
    let ExpressionKind::Binary { op: BinaryOp::Or, left, .. } = expr.kind else { panic!("expected 'or' at the top") };
    assert!(matches!(left.kind, ExpressionKind::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn test_bitand_not_confused_with_logical_and() {
    let expr = first_expr("return a & b;");
    assert!(matches!(expr.kind, ExpressionKind::Binary { op: BinaryOp::BitAnd, .. }));
}

#[test]
fn test_shift_operators() {
    assert!(matches!(first_expr("return a << b;").kind, ExpressionKind::Binary { op: BinaryOp::Shl, .. }));
    assert!(matches!(first_expr("return a >> b;").kind, ExpressionKind::Binary { op: BinaryOp::Shr, .. }));
}

#[test]
fn test_relational_not_confused_with_shift() {
    let expr = first_expr("return a < b;");
    assert!(matches!(expr.kind, ExpressionKind::Binary { op: BinaryOp::Lt, .. }));
}

#[test]
fn test_compound_assignment_operators() {
    assert!(matches!(first_expr("a += 1;").kind, ExpressionKind::Assignment { op: AssignOp::Add, .. }));
    assert!(matches!(first_expr("a <<= 1;").kind, ExpressionKind::Assignment { op: AssignOp::Shl, .. }));
    assert!(matches!(first_expr("a >>= 1;").kind, ExpressionKind::Assignment { op: AssignOp::Shr, .. }));
}

#[test]
fn test_equality_not_confused_with_assignment() {
    let expr = first_expr("return a == b;");
    assert!(matches!(expr.kind, ExpressionKind::Binary { op: BinaryOp::Eq, .. }));
}

// ============================================================================
// Unary, increment/decrement, and postfix
// ============================================================================

#[test]
fn test_unary_negate_and_not() {
    assert!(matches!(first_expr("return -a;").kind, ExpressionKind::Unary { op: UnaryOp::Negate, .. }));
    assert!(matches!(first_expr("return !a;").kind, ExpressionKind::Unary { op: UnaryOp::Not, .. }));
}

#[test]
fn test_address_of_not_confused_with_logical_and() {
    let expr = first_expr("return &a;");
    assert!(matches!(expr.kind, ExpressionKind::Unary { op: UnaryOp::AddressOf, .. }));
}

#[test]
fn test_prefix_and_postfix_increment() {
    let prefix = first_expr("return ++a;");
    let ExpressionKind::IncDec { is_prefix: true, .. } = prefix.kind else { panic!("expected prefix increment") };

    let postfix = first_expr("return a++;");
    let ExpressionKind::IncDec { is_prefix: false, .. } = postfix.kind else { panic!("expected postfix increment") };
}

#[test]
fn test_call_index_and_member_chain() {
    let expr = first_expr("return a.b[0](1, 2);");
    let ExpressionKind::Call { callee, args, .. } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 2);
    assert!(matches!(callee.kind, ExpressionKind::Index { .. }));
}

// ============================================================================
// Generic-call disambiguation
// ============================================================================

#[test]
fn test_generic_call_with_no_space_parses_as_call() {
    let expr = first_expr("return make<int>(1);");
    let ExpressionKind::Call { callee, args, .. } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 1);
    assert!(matches!(callee.kind, ExpressionKind::Identifier { .. }));
}

#[test]
fn test_spaced_less_than_parses_as_comparison() {
    let expr = first_expr("return a < b > (c);");
    // with whitespace this must NOT commit to the generic-call reading;
    // it parses as `a < b` compared... but since a call follows, this is
    // an exercise of the backtracking path rather than a valid program,
    // so just assert the top-level node isn't a direct generic call.
    assert!(!matches!(expr.kind, ExpressionKind::Call { .. }));
}

// ============================================================================
// Tuple and initializer-list literals
// ============================================================================

#[test]
fn test_parenthesized_single_expr_is_not_a_tuple() {
    let expr = first_expr("return (a + b);");
    assert!(matches!(expr.kind, ExpressionKind::Binary { op: BinaryOp::Add, .. }));
}

#[test]
fn test_comma_parenthesized_is_a_tuple() {
    let expr = first_expr("return (a, b, c);");
    let ExpressionKind::TupleLiteral(items) = expr.kind else { panic!("expected a tuple literal") };
    assert_eq!(items.len(), 3);
}

#[test]
fn test_initializer_list() {
    let expr = first_expr("return { 1, 2, 3 };");
    let ExpressionKind::InitializerList(items) = expr.kind else { panic!("expected an initializer list") };
    assert_eq!(items.len(), 3);
}

// ============================================================================
// sizeof / malloc / snew
// ============================================================================

#[test]
fn test_sizeof_type() {
    let expr = first_expr("return sizeof(int);");
    assert!(matches!(expr.kind, ExpressionKind::SizeOf(_)));
}

#[test]
fn test_sizeof_expr() {
    let expr = first_expr("return sizeof(a + b);");
    let ExpressionKind::SizeOf(target) = expr.kind else { panic!("expected sizeof") };
    assert!(matches!(target, corvid_ast::expr::SizeOfTarget::Expr(_)));
}

#[test]
fn test_malloc_with_count() {
    let expr = first_expr("return malloc(int, 10);");
    let ExpressionKind::Malloc { count, .. } = expr.kind else { panic!("expected malloc") };
    assert!(count.is_some());
}

#[test]
fn test_stack_new_with_args() {
    let expr = first_expr("return snew Point(1, 2);");
    let ExpressionKind::StackNew { args, .. } = expr.kind else { panic!("expected snew") };
    assert_eq!(args.len(), 2);
}
