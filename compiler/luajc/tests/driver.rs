//! The `run` entry point: files, exit status and messages.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs;
use std::path::Path;

use luaj_diagnostic::emitter::ColorMode;
use luajc::{explain, run, CompileOptions, DriverError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Outcome {
    status: i32,
    stdout: String,
    stderr: String,
}

fn options(dir: &Path) -> CompileOptions {
    CompileOptions {
        output_dir: dir.to_path_buf(),
        color: ColorMode::Never,
        ..CompileOptions::default()
    }
}

fn run_file(dir: &TempDir, name: &str, source: &str, options: &CompileOptions) -> Outcome {
    let input = dir.path().join(name);
    fs::write(&input, source).unwrap();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = run(&input, options, &mut stdout, &mut stderr).unwrap();
    Outcome {
        status,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

#[test]
fn test_success_writes_class_file() {
    let dir = TempDir::new().unwrap();
    let outcome = run_file(&dir, "hello.lua", "x = 1\nprint(x)", &options(dir.path()));

    let path = dir.path().join("hello.j");
    assert_eq!(outcome.status, 0);
    assert_eq!(
        outcome.stdout,
        format!("Object file \"{}\" created.\n", path.display())
    );
    let asm = fs::read_to_string(&path).unwrap();
    assert!(asm.starts_with(".class public hello\n.super java/lang/Object\n"));
    assert!(outcome.stderr.contains("*** chunk hello ***"));
}

#[test]
fn test_rewriting_gives_identical_file() {
    let dir = TempDir::new().unwrap();
    let source = "function f(n) return n * 3 end\nprint(f(2))";
    run_file(&dir, "again.lua", source, &options(dir.path()));
    let first = fs::read_to_string(dir.path().join("again.j")).unwrap();
    run_file(&dir, "again.lua", source, &options(dir.path()));
    let second = fs::read_to_string(dir.path().join("again.j")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_syntax_errors_set_exit_status() {
    let dir = TempDir::new().unwrap();
    let outcome = run_file(&dir, "bad.lua", "x = )\ny = 2\nz = * 3", &options(dir.path()));

    assert_eq!(outcome.status, 2);
    assert_eq!(
        outcome.stdout,
        "There were 2 syntax errors.\nObject file not created or modified.\n"
    );
    assert!(outcome.stderr.contains("error[E1002]"));
    assert!(outcome.stderr.contains("bad.lua:3"));
    assert!(!outcome.stderr.contains("CROSS-REFERENCE"));
    assert!(!dir.path().join("bad.j").exists());
}

#[test]
fn test_semantic_errors_set_exit_status() {
    let dir = TempDir::new().unwrap();
    let outcome = run_file(&dir, "sem.lua", "g(1)\nh()", &options(dir.path()));

    assert_eq!(outcome.status, 2);
    assert_eq!(
        outcome.stdout,
        "There were 2 semantic errors. Object file not created or modified.\n"
    );
    assert_eq!(outcome.stderr.matches("error[E2002]").count(), 2);
    assert!(outcome.stderr.contains("CROSS-REFERENCE"));
    assert!(!dir.path().join("sem.j").exists());
}

#[test]
fn test_error_count_summary() {
    let dir = TempDir::new().unwrap();
    let outcome = run_file(&dir, "sum.lua", "x = \"s\"\ng()", &options(dir.path()));
    assert_eq!(outcome.status, 2);
    assert!(outcome.stderr.contains("error[E2005]"));
    assert!(outcome.stderr.contains("\n2 errors emitted\n"));
}

#[test]
fn test_exit_status_saturates() {
    let dir = TempDir::new().unwrap();
    let source = "g()\n".repeat(256);
    let outcome = run_file(&dir, "many.lua", &source, &options(dir.path()));
    assert_eq!(outcome.status, 255);
    assert!(outcome
        .stdout
        .starts_with("There were 256 semantic errors."));
}

#[test]
fn test_invalid_class_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    for stem in ["my-prog", "2fast", "class", "caf\u{e9}"] {
        let input = dir.path().join(format!("{stem}.lua"));
        fs::write(&input, "x = 1").unwrap();
        let err = run(&input, &options(dir.path()), &mut Vec::new(), &mut Vec::new()).unwrap_err();
        assert!(
            matches!(&err, DriverError::InvalidClassName(name) if name == stem),
            "{stem}: {err}"
        );
        assert!(!dir.path().join(format!("{stem}.j")).exists());
    }

    let input = dir.path().join("ok.lua");
    fs::write(&input, "x = 1").unwrap();
    let named = CompileOptions {
        class_name: Some("pop".to_string()),
        ..options(dir.path())
    };
    let err = run(&input, &named, &mut Vec::new(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, DriverError::InvalidClassName(_)));

    let named = CompileOptions {
        class_name: Some("_Ok2".to_string()),
        ..options(dir.path())
    };
    assert_eq!(run(&input, &named, &mut Vec::new(), &mut Vec::new()).unwrap(), 0);
    assert!(dir.path().join("_Ok2.j").exists());
}

#[test]
fn test_failed_compile_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    run_file(&dir, "keep.lua", "x = 1", &options(dir.path()));
    let before = fs::read_to_string(dir.path().join("keep.j")).unwrap();
    let outcome = run_file(&dir, "keep.lua", "x = (", &options(dir.path()));
    assert!(outcome.status > 0);
    assert_eq!(fs::read_to_string(dir.path().join("keep.j")).unwrap(), before);
}

#[test]
fn test_no_xref_and_stdout_output() {
    let dir = TempDir::new().unwrap();
    let options = CompileOptions {
        emit_xref: false,
        print_asm: true,
        class_name: Some("Named".to_string()),
        ..options(dir.path())
    };
    let outcome = run_file(&dir, "quiet.lua", "print(1)", &options);

    assert_eq!(outcome.status, 0);
    assert!(outcome.stdout.starts_with(".class public Named\n"));
    assert_eq!(outcome.stderr, "");
    assert!(!dir.path().join("Named.j").exists());
}

#[test]
fn test_verbose_reports_progress() {
    let dir = TempDir::new().unwrap();
    let options = CompileOptions {
        verbose: true,
        emit_xref: false,
        ..options(dir.path())
    };
    let outcome = run_file(&dir, "loud.lua", "print(1)", &options);
    assert!(outcome.stderr.starts_with("compiling "));
    assert!(outcome.stderr.contains(" as class loud\n"));
    assert!(outcome.stderr.contains("wrote "));
}

#[test]
fn test_missing_input_is_a_driver_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.lua");
    let err = run(&missing, &options(dir.path()), &mut Vec::new(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }));
    assert!(err.to_diagnostic().is_none());
}

#[test]
fn test_unwritable_output_dir() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.lua");
    fs::write(&input, "x = 1").unwrap();
    let options = options(&dir.path().join("no/such/dir"));
    let err = run(&input, &options, &mut Vec::new(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, DriverError::Write { .. }));
}

#[test]
fn test_explain() {
    assert!(explain("E2002").unwrap().contains("E2002"));
    assert!(explain("e2002").is_ok());
    assert_eq!(
        explain("E7777").unwrap_err().to_string(),
        "unknown error code `E7777`"
    );
}
