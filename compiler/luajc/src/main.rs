//! luaj compiler CLI

use std::io;

use luaj_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use luajc::{explain, init_tracing, parse_compile_args, run, DriverError};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" => {
            println!("luaj {}", env!("CARGO_PKG_VERSION"));
        }
        "explain" | "--explain" => {
            let Some(code) = args.get(2) else {
                eprintln!("Usage: luaj explain <ERROR_CODE>");
                eprintln!("Example: luaj explain E2001");
                std::process::exit(1);
            };
            match explain(code) {
                Ok(doc) => println!("{doc}"),
                Err(err) => fail(&err),
            }
        }
        _ => {
            let (options, input) = match parse_compile_args(&args[1..]) {
                Ok(parsed) => parsed,
                Err(err) => {
                    eprintln!("error: {err}");
                    eprintln!();
                    print_usage();
                    std::process::exit(1);
                }
            };
            match run(&input, &options, &mut io::stdout(), &mut io::stderr()) {
                Ok(status) => std::process::exit(status),
                Err(err) => fail(&err),
            }
        }
    }
}

fn fail(err: &DriverError) -> ! {
    if let Some(diagnostic) = err.to_diagnostic() {
        let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
        let mut emitter = TerminalEmitter::with_color_mode(io::stderr(), ColorMode::Auto, is_tty);
        emitter.emit(&diagnostic);
        emitter.flush();
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}

fn print_usage() {
    println!("luaj: compile a Lua subset to Jasmin assembly for the JVM");
    println!();
    println!("Usage: luaj [options] <file.lua>");
    println!("       luaj explain <code>");
    println!();
    println!("Options:");
    println!("  -d, --out-dir <dir>   Directory for the .j file (default: .)");
    println!("  --class <name>        Class name (default: input file stem)");
    println!("  --no-xref             Do not print the cross-reference listing");
    println!("  --emit-stdout         Print the assembly instead of writing a file");
    println!("  --color=<mode>        Diagnostic colors: auto, always, never");
    println!("  -v, --verbose         Report what the driver is doing");
    println!();
    println!("Environment:");
    println!("  RUST_LOG              Log filter, e.g. luaj_codegen=trace");
    println!("  LUAJ_LOG_TREE=1       Print log spans as a tree");
    println!();
    println!("Exit status is the number of syntax errors, else the number of");
    println!("semantic errors, else 0.");
    println!();
    println!("Examples:");
    println!("  luaj hello.lua                # writes ./hello.j");
    println!("  luaj -d build --no-xref a.lua");
    println!("  luaj explain E2002");
}
