use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("expected `end`")
        .with_label(4, "block opened here")
        .with_note("every `if` needs an `end`");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "expected `end`");
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.notes, vec!["every `if` needs an `end`".to_string()]);
}

#[test]
fn test_primary_line_prefers_primary_label() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_secondary_label(2, "first")
        .with_label(9, "again");
    assert_eq!(diag.primary_line(), Some(9));

    let only_secondary = Diagnostic::error(ErrorCode::E2001).with_secondary_label(3, "x");
    assert_eq!(only_secondary.primary_line(), Some(3));

    assert_eq!(Diagnostic::error(ErrorCode::E9001).primary_line(), None);
}

#[test]
fn test_display() {
    let diag = undeclared_function(7, "g");
    assert_eq!(
        diag.to_string(),
        "error[E2002]: call to undeclared function `g` (line 7)"
    );
}

#[test]
fn test_redeclared_points_at_both_lines() {
    let diag = redeclared_identifier(10, "f", Some(3));
    let lines: Vec<u32> = diag.labels.iter().map(|l| l.line).collect();
    assert_eq!(lines, vec![10, 3]);

    let diag = redeclared_identifier(10, "f", None);
    assert_eq!(diag.labels.len(), 1);
}

#[test]
fn test_argument_count_message() {
    let diag = argument_count_mismatch(1, "f", 1, 2);
    assert_eq!(
        diag.message,
        "function `f` takes 1 argument but 2 were supplied"
    );
    let diag = argument_count_mismatch(1, "g", 2, 0);
    assert_eq!(
        diag.message,
        "function `g` takes 2 arguments but 0 were supplied"
    );
}

#[test]
fn test_string_value_display() {
    assert_eq!(
        string_value(4).to_string(),
        "error[E2005]: string literal used as a value (line 4)"
    );
}
