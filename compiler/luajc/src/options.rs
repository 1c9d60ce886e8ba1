//! Command-line options for a compilation.

use std::path::PathBuf;

use luaj_diagnostic::emitter::ColorMode;

use crate::DriverError;

/// How a single source file is compiled and where the result goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Directory the `.j` file is written to.
    pub output_dir: PathBuf,
    /// Class name to use instead of the input file's stem.
    pub class_name: Option<String>,
    /// Print the cross-reference listing after analysis.
    pub emit_xref: bool,
    /// Write the assembly to stdout instead of a file.
    pub print_asm: bool,
    /// Coloring of rendered diagnostics.
    pub color: ColorMode,
    pub verbose: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            output_dir: PathBuf::from("."),
            class_name: None,
            emit_xref: true,
            print_asm: false,
            color: ColorMode::Auto,
            verbose: false,
        }
    }
}

/// Parse `[options] <file.lua>`.
///
/// Options may come before or after the file. `-d` and `--class` take the
/// next argument or an `=value` suffix.
pub fn parse_compile_args(args: &[String]) -> Result<(CompileOptions, PathBuf), DriverError> {
    let mut options = CompileOptions::default();
    let mut input = None;
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();
        let mut value = |flag: &str| -> Result<String, DriverError> {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| DriverError::Usage(format!("missing value for `{flag}`")))
        };

        match arg {
            "-d" | "--out-dir" => options.output_dir = PathBuf::from(value(arg)?),
            "--class" => options.class_name = Some(value(arg)?),
            "--no-xref" => options.emit_xref = false,
            "--emit-stdout" => options.print_asm = true,
            "-v" | "--verbose" => options.verbose = true,
            _ => {
                if let Some(dir) = arg.strip_prefix("--out-dir=") {
                    options.output_dir = PathBuf::from(dir);
                } else if let Some(name) = arg.strip_prefix("--class=") {
                    options.class_name = Some(name.to_string());
                } else if let Some(mode) = arg.strip_prefix("--color=") {
                    options.color = parse_color(mode)?;
                } else if arg.starts_with('-') {
                    return Err(DriverError::Usage(format!("unknown option `{arg}`")));
                } else if input.is_none() {
                    input = Some(PathBuf::from(arg));
                } else {
                    return Err(DriverError::Usage(format!("unexpected argument `{arg}`")));
                }
            }
        }
        i += 1;
    }

    let input = input.ok_or_else(|| DriverError::Usage("missing input file".to_string()))?;
    Ok((options, input))
}

fn parse_color(mode: &str) -> Result<ColorMode, DriverError> {
    match mode {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        _ => Err(DriverError::Usage(format!(
            "invalid color mode `{mode}` (expected auto, always or never)"
        ))),
    }
}
