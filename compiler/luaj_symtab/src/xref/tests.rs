use super::*;
use crate::{DeclKind, Routine};
use pretty_assertions::assert_eq;

#[test]
fn test_listing_layout() {
    let mut table = SymbolTable::new();
    let chunk = table
        .declare("demo", DeclKind::Chunk(Routine::default()))
        .unwrap();
    table.set_program(chunk);
    table.push(Some(chunk));

    let x = table
        .declare("x", DeclKind::Variable { slot: None })
        .unwrap();
    table.add_line(x, 1);
    table.add_line(x, 12);

    let f = table
        .declare("f", DeclKind::Function(Routine::default()))
        .unwrap();
    table.add_line(f, 2);
    table.routine_mut(chunk).unwrap().subroutines.push(f);
    table.push(Some(f));
    let slot = table.next_slot();
    let a = table
        .declare("a", DeclKind::ValueParameter { slot })
        .unwrap();
    table.add_line(a, 2);
    table.pop();
    table.pop();

    let expected = "
===== CROSS-REFERENCE TABLE =====

*** chunk demo ***

Identifier       Line numbers    Type specification
----------       ------------    ------------------
f                002
                                 Defined as: function
                                 Scope nesting level: 1
x                001 012
                                 Defined as: variable
                                 Scope nesting level: 1

*** function f ***

Identifier       Line numbers    Type specification
----------       ------------    ------------------
a                002
                                 Defined as: value parameter
                                 Scope nesting level: 2
";
    assert_eq!(CrossReference::new(&table).to_string(), expected);
}

#[test]
fn test_missing_program() {
    let table = SymbolTable::new();
    assert_eq!(
        CrossReference::new(&table).to_string(),
        "\n===== CROSS-REFERENCE TABLE =====\n\tProgram id is missing\n"
    );
}
