use super::*;
use pretty_assertions::assert_eq;

fn ident(name: &str, raw: u32) -> Ident {
    Ident {
        name: name.to_string(),
        id: NodeId::from_raw(raw),
        line: 1,
    }
}

fn var(name: &str, raw: u32) -> Expr {
    Expr::new(ExprKind::Var(ident(name, raw)), 1)
}

fn num(raw: &str) -> Expr {
    Expr::new(ExprKind::Number(raw.to_string()), 1)
}

#[test]
fn test_comparison_classification() {
    for op in [
        BinaryOp::Eq,
        BinaryOp::NotEq,
        BinaryOp::Lt,
        BinaryOp::LtEq,
        BinaryOp::Gt,
        BinaryOp::GtEq,
    ] {
        assert!(op.is_comparison(), "{op} should be a comparison");
        assert!(!op.is_logical());
    }
    assert!(!BinaryOp::Add.is_comparison());
    assert!(BinaryOp::And.is_logical());
}

#[test]
fn test_display_binary_and_call() {
    let sum = Expr::new(
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(var("x", 0)),
            right: Box::new(num("1")),
        },
        1,
    );
    assert_eq!(sum.to_string(), "x + 1");

    let call = Expr::new(
        ExprKind::Call(Call {
            callee: ident("f", 1),
            args: vec![num("2"), Expr::new(ExprKind::Paren(Box::new(sum)), 1)],
        }),
        1,
    );
    assert_eq!(call.to_string(), "f(2, (x + 1))");
}

#[test]
fn test_display_unary_and_string() {
    let not = Expr::new(
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand: Box::new(Expr::new(ExprKind::Bool(true), 1)),
        },
        1,
    );
    assert_eq!(not.to_string(), "not true");

    let text = Expr::new(ExprKind::Str("'hi'".to_string()), 1);
    assert!(text.is_string_literal());
    assert_eq!(text.to_string(), "'hi'");
}

#[test]
fn test_as_function() {
    let def = FunctionDef {
        name: ident("f", 0),
        params: vec![ident("a", 1)],
        body: Rc::new(Block::default()),
    };
    let stmt = Stmt {
        kind: StmtKind::Function(def),
        line: 3,
    };
    assert_eq!(stmt.as_function().map(|d| d.name.name.as_str()), Some("f"));

    let print = Stmt {
        kind: StmtKind::Print(Vec::new()),
        line: 4,
    };
    assert!(print.as_function().is_none());
}
