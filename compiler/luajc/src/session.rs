//! One compilation from source text to Jasmin assembly.

use std::fs;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use luaj_codegen::is_keyword;
use luaj_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use luaj_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorDocs};
use luaj_parse::parse;
use luaj_sema::analyze;
use tracing::{debug, info};

use crate::{CompileOptions, DriverError};

/// Everything a compilation produced, whether or not it succeeded.
#[derive(Clone, Debug, Default)]
pub struct CompileResult {
    /// All diagnostics, sorted by line.
    pub diagnostics: Vec<Diagnostic>,
    pub syntax_errors: usize,
    pub semantic_errors: usize,
    /// Cross-reference listing; present once analysis has run.
    pub xref: Option<String>,
    /// Generated class; present only when there were no errors.
    pub assembly: Option<String>,
}

impl CompileResult {
    pub fn succeeded(&self) -> bool {
        self.assembly.is_some()
    }
}

/// Compile `source` into a class named `class_name`.
///
/// User errors end up in the result. `Err` means code generation rejected
/// a program that passed analysis.
#[tracing::instrument(level = "info", skip(source), fields(len = source.len()))]
pub fn compile_source(source: &str, class_name: &str) -> Result<CompileResult, DriverError> {
    let mut queue = DiagnosticQueue::new();
    let parsed = parse(source);
    queue.extend(parsed.errors);

    let mut result = CompileResult {
        syntax_errors: queue.syntax_error_count(),
        ..CompileResult::default()
    };
    if result.syntax_errors > 0 {
        debug!(errors = result.syntax_errors, "stopping after parse");
        result.diagnostics = queue.flush();
        return Ok(result);
    }

    let model = analyze(&parsed.chunk, class_name, &mut queue);
    result.xref = Some(model.cross_reference().to_string());
    result.semantic_errors = queue.semantic_error_count();
    result.diagnostics = queue.flush();
    if result.semantic_errors > 0 {
        debug!(errors = result.semantic_errors, "stopping after analysis");
        return Ok(result);
    }

    result.assembly = Some(luaj_codegen::generate(&model, &parsed.chunk)?);
    Ok(result)
}

/// Compile the file at `input` and report on `out` and `err` the way the
/// `luaj` binary does.
///
/// Returns the process exit status: the syntax error count, else the
/// semantic error count, else 0. Counts are clamped to 1..=255 so a
/// failed compile never exits 0.
pub fn run(
    input: &Path,
    options: &CompileOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<i32, DriverError> {
    let source = fs::read_to_string(input).map_err(|source| DriverError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let class_name = class_name(input, options)?;
    if options.verbose {
        writeln!(err, "compiling {} as class {class_name}", input.display())?;
    }

    let result = compile_source(&source, &class_name)?;

    let file = input.display().to_string();
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::with_color_mode(&mut *err, options.color, is_tty)
        .with_source(&file, &source);
    emitter.emit_all(&result.diagnostics);
    emitter.emit_summary(result.diagnostics.len());
    emitter.flush();

    if result.syntax_errors > 0 {
        writeln!(out, "There were {} syntax errors.", result.syntax_errors)?;
        writeln!(out, "Object file not created or modified.")?;
        return Ok(exit_status(result.syntax_errors));
    }

    if options.emit_xref {
        if let Some(xref) = &result.xref {
            write!(err, "{xref}")?;
        }
    }

    if result.semantic_errors > 0 {
        writeln!(
            out,
            "There were {} semantic errors. Object file not created or modified.",
            result.semantic_errors
        )?;
        return Ok(exit_status(result.semantic_errors));
    }

    let Some(assembly) = result.assembly else {
        return Ok(1);
    };
    if options.print_asm {
        write!(out, "{assembly}")?;
        return Ok(0);
    }

    let path = options.output_dir.join(format!("{class_name}.j"));
    fs::write(&path, &assembly).map_err(|source| DriverError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = assembly.len(), "wrote class");
    if options.verbose {
        writeln!(err, "wrote {} bytes", assembly.len())?;
    }
    writeln!(out, "Object file \"{}\" created.", path.display())?;
    Ok(0)
}

/// Long description of an error code, for `luaj explain`.
pub fn explain(code: &str) -> Result<&'static str, DriverError> {
    let code: ErrorCode = code
        .parse()
        .map_err(|_| DriverError::UnknownCode(code.to_string()))?;
    ErrorDocs::get(code).ok_or(DriverError::Undocumented(code))
}

fn class_name(input: &Path, options: &CompileOptions) -> Result<String, DriverError> {
    let name = match &options.class_name {
        Some(name) => name.clone(),
        None => input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DriverError::NoClassName(PathBuf::from(input)))?,
    };
    if is_class_name(&name) {
        Ok(name)
    } else {
        Err(DriverError::InvalidClassName(name))
    }
}

/// An identifier the assembler accepts as a class name.
fn is_class_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_keyword(name)
}

fn exit_status(errors: usize) -> i32 {
    i32::try_from(errors.clamp(1, 255)).unwrap_or(255)
}
