use crate::ast::{build_ast, AstNodeKind, Span};
use crate::error::ErrorCode;
use crate::value::Value;
use crate::{Engine, Variables};

#[test]
fn test_span_helpers() {
    let a = Span::new(2, 3);
    let b = Span::new(7, 1);
    assert_eq!(a.end(), 5);
    assert_eq!(Span::covering(&a, &b), Span::new(2, 6));
    assert_eq!(Span::covering(&b, &a), Span::new(2, 6));
    assert_eq!(Span::new(1, 2).slice("√9×2"), "9×");
    assert_eq!(a.to_string(), "2..5");
}

#[test]
fn test_binary_tree_with_values() {
    let compiled = Engine::new().compile("1 + 2 * 3").unwrap();
    let ast = compiled.ast(None).unwrap();

    assert_eq!(ast.kind, AstNodeKind::BinaryOperator);
    assert_eq!(ast.label, "+");
    assert_eq!(ast.value, Some(Value::Number(7.0)));
    assert_eq!(ast.span, Span::new(0, 9));
    assert_eq!(ast.children.len(), 2);
    assert_eq!(ast.children[1].value, Some(Value::Number(6.0)));
    assert_eq!(ast.size(), 5);
}

#[test]
fn test_ternary_reports_only_taken_branch() {
    let compiled = Engine::new()
        .compile("$x > 0 ? 10 / $x : 1 / 0")
        .unwrap();
    let mut vars = Variables::new();
    vars.insert("x".to_string(), Value::Number(5.0));

    let ast = compiled.ast(Some(&vars)).unwrap();
    assert_eq!(ast.kind, AstNodeKind::Ternary);
    assert_eq!(ast.value, Some(Value::Number(2.0)));
    assert_eq!(ast.children.len(), 3);
    assert_eq!(ast.children[0].value, Some(Value::Boolean(true)));
    assert_eq!(ast.children[1].value, Some(Value::Number(2.0)));
    // untaken branch keeps its shape but is never evaluated
    assert_eq!(ast.children[2].value, None);
    assert_eq!(ast.children[2].children.len(), 2);
}

#[test]
fn test_function_node() {
    let compiled = Engine::new().compile("max(1, 4, 2)").unwrap();
    let ast = compiled.ast(None).unwrap();
    assert_eq!(ast.kind, AstNodeKind::Function);
    assert_eq!(ast.label, "max/3");
    assert_eq!(ast.children.len(), 3);
    assert_eq!(ast.value, Some(Value::Number(4.0)));
}

#[test]
fn test_build_errors_match_evaluation() {
    let engine = Engine::new();
    let compiled = engine.compile("$missing + 1").unwrap();
    let err = build_ast(compiled.rpn(), engine.environment(), None).unwrap_err();
    assert_eq!(err.code, ErrorCode::VariableNotFound);
}

#[test]
fn test_ast_serializes_with_wire_names() {
    let compiled = Engine::new().compile("-2").unwrap();
    let json = serde_json::to_value(compiled.ast(None).unwrap()).unwrap();
    assert_eq!(json["type"], "prefix_operator");
    assert_eq!(json["sourceRange"]["startIndex"], 0);
    assert_eq!(json["sourceRange"]["length"], 2);
    assert_eq!(json["evaluatedValue"]["value"], -2.0);
    assert_eq!(json["children"][0]["type"], "number");
}
