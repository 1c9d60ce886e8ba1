//! Operand-stack and local-slot limits of generated methods.
//!
//! Each method of the generated class is re-read from the Jasmin text and
//! walked along every control-flow path. The walk checks that:
//! 1. the stack never underflows and has one depth per instruction
//! 2. `.limit stack` is at least the deepest stack on any path
//! 3. `.limit locals` covers every slot loaded or stored
//! 4. every label is bound once and every branch target exists

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use std::collections::HashMap;

use luaj_codegen::generate;
use luaj_diagnostic::DiagnosticQueue;
use luaj_parse::parse;
use luaj_sema::analyze;
use proptest::prelude::*;

// -- Reading the assembly back --

enum Line {
    Label(String),
    Insn { mnemonic: String, operand: Option<String> },
}

struct Method {
    name: String,
    limit_stack: i32,
    limit_locals: u32,
    code: Vec<Line>,
}

fn methods(asm: &str) -> Vec<Method> {
    let mut out = Vec::new();
    let mut current: Option<Method> = None;

    for line in asm.lines() {
        if let Some(header) = line.strip_prefix(".method ") {
            current = Some(Method {
                name: header.to_string(),
                limit_stack: 0,
                limit_locals: 0,
                code: Vec::new(),
            });
            continue;
        }
        let Some(method) = current.as_mut() else {
            continue;
        };
        if let Some(n) = line.strip_prefix(".limit stack ") {
            method.limit_stack = n.parse().unwrap();
        } else if let Some(n) = line.strip_prefix(".limit locals ") {
            method.limit_locals = n.parse().unwrap();
        } else if line == ".end method" {
            out.extend(current.take());
        } else if let Some(insn) = line.strip_prefix("    ") {
            let (mnemonic, operand) = match insn.split_once('\t') {
                Some((m, o)) => (m.to_string(), Some(o.to_string())),
                None => (insn.to_string(), None),
            };
            method.code.push(Line::Insn { mnemonic, operand });
        } else if let Some(label) = line.strip_suffix(':').filter(|_| !line.starts_with(';')) {
            method.code.push(Line::Label(label.to_string()));
        }
    }
    out
}

/// Words taken by each type in a descriptor fragment.
fn descriptor_words(mut desc: &str) -> i32 {
    let mut words = 0;
    while let Some(c) = desc.chars().next() {
        let rest = desc.trim_start_matches('[');
        let is_array = rest.len() != desc.len();
        let len = match rest.chars().next() {
            Some('L') => rest.find(';').unwrap() + 1,
            Some(_) => 1,
            None => break,
        };
        words += match (is_array, c) {
            (false, 'J' | 'D') => 2,
            (false, 'V') => 0,
            _ => 1,
        };
        desc = &rest[len..];
    }
    words
}

fn call_effect(target: &str, receiver: i32) -> i32 {
    let open = target.find('(').unwrap();
    let (args, ret) = target[open + 1..].split_once(')').unwrap();
    descriptor_words(ret) - descriptor_words(args) - receiver
}

fn effect(mnemonic: &str, operand: Option<&str>) -> i32 {
    match mnemonic {
        "lload_3" => 2,
        "lstore_3" => -2,
        "iadd" | "isub" | "imul" | "idiv" | "irem" | "iand" | "ior" | "ixor" | "ifeq"
        | "ifne" | "ireturn" | "putstatic" | "pop" => -1,
        "bipush" | "sipush" | "ldc" | "getstatic" | "new" | "dup" => 1,
        "ineg" | "goto" | "return" | "anewarray" => 0,
        "aastore" => -3,
        "invokestatic" => call_effect(operand.unwrap(), 0),
        "invokevirtual" | "invokespecial" => call_effect(operand.unwrap(), 1),
        m if m.starts_with("if_icmp") => -2,
        m if m.starts_with("iconst") || m.starts_with("iload") || m.starts_with("aload") => 1,
        m if m.starts_with("istore") || m.starts_with("astore") => -1,
        other => panic!("unexpected instruction `{other}`"),
    }
}

/// Highest local slot an instruction touches, plus one.
fn slots_used(mnemonic: &str, operand: Option<&str>) -> Option<u32> {
    let (kind, slot) = match mnemonic.split_once('_') {
        Some((kind, slot)) if slot.chars().all(|c| c.is_ascii_digit()) => {
            (kind, slot.parse::<u32>().ok()?)
        }
        _ => (mnemonic, operand?.parse::<u32>().ok()?),
    };
    match kind {
        "iload" | "istore" | "aload" | "astore" => Some(slot + 1),
        "lload" | "lstore" => Some(slot + 2),
        _ => None,
    }
}

/// Walk every path through `method` and return its deepest stack.
fn max_depth(method: &Method) -> Result<i32, String> {
    let mut labels = HashMap::new();
    for (pc, line) in method.code.iter().enumerate() {
        if let Line::Label(name) = line {
            if labels.insert(name.as_str(), pc).is_some() {
                return Err(format!("label {name} bound twice"));
            }
        }
    }

    let mut depth_at: Vec<Option<i32>> = vec![None; method.code.len()];
    let mut work = vec![(0usize, 0i32)];
    let mut max = 0;

    while let Some((pc, depth)) = work.pop() {
        let Some(line) = method.code.get(pc) else {
            return Err(format!("control falls off the end of {}", method.name));
        };
        match depth_at[pc] {
            Some(seen) if seen == depth => continue,
            Some(seen) => return Err(format!("depth {seen} and {depth} meet at {pc}")),
            None => depth_at[pc] = Some(depth),
        }

        let (mnemonic, operand) = match line {
            Line::Label(_) => {
                work.push((pc + 1, depth));
                continue;
            }
            Line::Insn { mnemonic, operand } => (mnemonic.as_str(), operand.as_deref()),
        };

        let after = depth + effect(mnemonic, operand);
        if after < 0 {
            return Err(format!("stack underflow at {pc} ({mnemonic})"));
        }
        max = max.max(after);

        let target = |label: Option<&str>| -> Result<usize, String> {
            let label = label.unwrap_or_default();
            labels
                .get(label)
                .copied()
                .ok_or_else(|| format!("branch to unknown label {label}"))
        };
        match mnemonic {
            "goto" => work.push((target(operand)?, after)),
            "return" | "ireturn" => {}
            m if m.starts_with("if") => {
                work.push((target(operand)?, after));
                work.push((pc + 1, after));
            }
            _ => work.push((pc + 1, after)),
        }
    }
    Ok(max)
}

fn check(source: &str) {
    let out = parse(source);
    assert!(out.errors.is_empty(), "syntax errors in:\n{source}");
    let mut queue = DiagnosticQueue::new();
    let model = analyze(&out.chunk, "Gen", &mut queue);
    assert!(queue.is_empty(), "semantic errors in:\n{source}");
    let asm = generate(&model, &out.chunk).unwrap();

    let methods = methods(&asm);
    assert!(methods.len() >= 3);
    for method in &methods {
        let depth = max_depth(method).unwrap_or_else(|e| panic!("{e}\n{asm}"));
        assert!(
            depth <= method.limit_stack,
            "{}: stack reaches {depth} but limit is {}\n{asm}",
            method.name,
            method.limit_stack
        );
        for line in &method.code {
            if let Line::Insn { mnemonic, operand } = line {
                if let Some(used) = slots_used(mnemonic, operand.as_deref()) {
                    assert!(
                        used <= method.limit_locals,
                        "{}: {mnemonic} exceeds {} locals",
                        method.name,
                        method.limit_locals
                    );
                }
            }
        }
    }
}

// -- Fixed programs --

#[test]
fn test_scenarios_are_balanced() {
    check("x = 1\nprint(x)");
    check("function f() x = 1 end\nf()");
    check("repeat x = x + 1 until x == 10");
    check("if x == 1 then print(1) elseif x == 2 then print(2) else print(3) end");
}

#[test]
fn test_recursive_function_is_balanced() {
    check(
        "function fib(n)\n  if n < 2 then return n end\n  return fib(n - 1) + fib(n - 2)\nend\n\
         print(\"fib\", fib(20), fib(5) > 3)",
    );
}

#[test]
fn test_nested_functions_are_balanced() {
    check(
        "function outer(a)\n  function inner(b) return b * 2 end\n  \
         repeat a = a - inner(1) until a <= 0 or not (a ~= 0)\n  return a\nend\nprint(outer(9))",
    );
}

// -- Generated programs --

fn leaf_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..70_000i32).prop_map(|n| n.to_string()),
        prop::sample::select(vec!["a", "b", "c"]).prop_map(str::to_string),
        Just("true".to_string()),
        Just("false".to_string()),
    ]
}

const BINARY_OPS: [&str; 13] = [
    "+", "-", "*", "/", "%", "==", "~=", "<", "<=", ">", ">=", "and", "or",
];

fn expr_strategy(depth: u32) -> BoxedStrategy<String> {
    if depth == 0 {
        leaf_strategy().boxed()
    } else {
        prop_oneof![
            leaf_strategy(),
            (
                expr_strategy(depth - 1),
                prop::sample::select(BINARY_OPS.to_vec()),
                expr_strategy(depth - 1)
            )
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            expr_strategy(depth - 1).prop_map(|e| format!("-({})", e)),
            expr_strategy(depth - 1).prop_map(|e| format!("not ({})", e)),
            expr_strategy(depth - 1).prop_map(|e| format!("({})", e)),
            expr_strategy(depth - 1).prop_map(|e| format!("sq({})", e)),
        ]
        .boxed()
    }
}

fn print_arg_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        expr_strategy(2),
        prop::string::string_regex("[a-z %]{0,8}")
            .expect("valid regex")
            .prop_map(|s| format!("\"{}\"", s)),
    ]
}

fn stmt_strategy(depth: u32) -> BoxedStrategy<String> {
    let simple = prop_oneof![
        (
            prop::sample::select(vec!["a", "b", "c"]),
            expr_strategy(3)
        )
            .prop_map(|(v, e)| format!("{} = {}", v, e)),
        prop::collection::vec(print_arg_strategy(), 0..4)
            .prop_map(|args| format!("print({})", args.join(", "))),
        expr_strategy(2).prop_map(|e| format!("sq({})", e)),
    ];
    if depth == 0 {
        return simple.boxed();
    }
    let block = prop::collection::vec(stmt_strategy(depth - 1), 1..3).prop_map(|s| s.join("\n"));
    prop_oneof![
        simple,
        (
            expr_strategy(2),
            block.clone(),
            prop::collection::vec((expr_strategy(2), block.clone()), 0..3),
            prop::option::of(block.clone())
        )
            .prop_map(|(cond, then, elifs, els)| {
                let mut s = format!("if {} then\n{}\n", cond, then);
                for (c, b) in elifs {
                    s.push_str(&format!("elseif {} then\n{}\n", c, b));
                }
                if let Some(b) = els {
                    s.push_str(&format!("else\n{}\n", b));
                }
                s.push_str("end");
                s
            }),
        (block, expr_strategy(2)).prop_map(|(b, until)| format!("repeat\n{}\nuntil {}", b, until)),
    ]
    .boxed()
}

fn program_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(stmt_strategy(2), 1..4),
        prop::collection::vec(stmt_strategy(2), 1..4),
    )
        .prop_map(|(body, main)| {
            format!(
                "function sq(n)\n  return n * n\nend\n\
                 function work(a, b)\n{}\nreturn c\nend\n\
                 {}\nprint(work(1, 2))",
                body.join("\n"),
                main.join("\n")
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    /// Declared limits cover every path of every generated method.
    #[test]
    fn prop_limits_cover_all_paths(source in program_strategy()) {
        check(&source);
    }

    /// Generating the same program twice gives the same text.
    #[test]
    fn prop_generation_is_deterministic(source in program_strategy()) {
        let out = parse(&source);
        let mut queue = DiagnosticQueue::new();
        let model = analyze(&out.chunk, "Gen", &mut queue);
        prop_assert_eq!(
            generate(&model, &out.chunk).unwrap(),
            generate(&model, &out.chunk).unwrap()
        );
    }
}
