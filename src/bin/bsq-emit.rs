use std::{env, io::Write, path::PathBuf, process::ExitCode};

use bsq_emit::{
    automock, fuzz, parse_program, transpile_file, ProcessEnvProvider, ToolchainConfig,
    TranspileOptions, UnsupportedPolicy,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "BSQ_EMIT_LOG";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Verbose,
    Debug,
}

#[derive(Debug)]
struct TranspileCommandOptions {
    output: Option<PathBuf>,
    ast: bool,
    options: TranspileOptions,
}

fn main() -> ExitCode {
    let (args, verbosity) = split_verbosity(env::args().collect());
    init_tracing(verbosity);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: Verbosity) {
    let filter = match env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(match verbosity {
            Verbosity::Quiet => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Removes `--verbose`/`--debug` from anywhere in the argument list.
fn split_verbosity(args: Vec<String>) -> (Vec<String>, Verbosity) {
    let mut verbosity = Verbosity::Quiet;
    let mut rest = Vec::with_capacity(args.len());
    for arg in args {
        match arg.as_str() {
            "--verbose" | "-v" => {
                if verbosity == Verbosity::Quiet {
                    verbosity = Verbosity::Verbose;
                }
            }
            "--debug" => verbosity = Verbosity::Debug,
            _ => rest.push(arg),
        }
    }
    (rest, verbosity)
}

fn run(args: Vec<String>) -> Result<(), String> {
    if args.len() < 3 {
        return Err("not enough arguments".to_string());
    }

    let command = args[1].as_str();
    let file = PathBuf::from(&args[2]);

    match command {
        "transpile" => {
            let options = parse_transpile_options(&args[3..])?;
            run_transpile(&file, &options)
        }
        "automock" => {
            let [opname, json_args] = positional::<2>(&args[3..], "automock <file> <op> <json-args>")?;
            let output = match ToolchainConfig::from_env(&ProcessEnvProvider) {
                Ok(config) => {
                    automock(&file, &opname, &json_args, &config, TranspileOptions::default())
                }
                Err(err) => err.to_string(),
            };
            write_stdout(&output)
        }
        "fuzz" => {
            let [opname] = positional::<1>(&args[3..], "fuzz <file> <op>")?;
            let output = match ToolchainConfig::from_env(&ProcessEnvProvider) {
                Ok(config) => fuzz(&file, &opname, &config, TranspileOptions::default()),
                Err(err) => err.to_string(),
            };
            write_stdout(&output)
        }
        _ => Err(format!("unknown command '{command}'")),
    }
}

fn run_transpile(file: &PathBuf, options: &TranspileCommandOptions) -> Result<(), String> {
    let output = if options.ast {
        let input = std::fs::read_to_string(file)
            .map_err(|e| format!("failed to read '{}': {e}", file.display()))?;
        let program = parse_program(&input).map_err(|e| e.to_string())?;
        serde_json::to_string_pretty(&program).map_err(|e| e.to_string())?
    } else {
        transpile_file(file, options.options).map_err(|e| e.to_string())?
    };

    match &options.output {
        Some(path) => {
            std::fs::write(path, format!("{output}\n"))
                .map_err(|e| format!("failed to write '{}': {e}", path.display()))?;
            eprintln!("wrote: {}", path.display());
            Ok(())
        }
        None => {
            println!("{output}");
            Ok(())
        }
    }
}

fn write_stdout(text: &str) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("failed to write output: {e}"))
}

fn positional<const N: usize>(args: &[String], usage: &str) -> Result<[String; N], String> {
    if args.len() != N {
        return Err(format!("expected: {usage}"));
    }
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.clone();
    }
    Ok(out)
}

fn parse_transpile_options(args: &[String]) -> Result<TranspileCommandOptions, String> {
    let mut output = None;
    let mut ast = false;
    let mut options = TranspileOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--output" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --output".to_string());
                }
                output = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--ast" => {
                ast = true;
                i += 1;
            }
            "--placeholder-unsupported" => {
                options.unsupported = UnsupportedPolicy::Placeholder;
                i += 1;
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    Ok(TranspileCommandOptions {
        output,
        ast,
        options,
    })
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  bsq-emit transpile <file> [--output <file.bsqapi>] [--ast] [--placeholder-unsupported]");
    eprintln!("  bsq-emit automock <file> <op> <json-args>");
    eprintln!("  bsq-emit fuzz <file> <op>");
    eprintln!();
    eprintln!("transpile options:");
    eprintln!("  --output <path>            write generated program to a file instead of stdout");
    eprintln!("  --ast                      print the parsed syntax tree as JSON");
    eprintln!("  --placeholder-unsupported  replace declarations using unsupported features");
    eprintln!("                             with a placeholder instead of failing");
    eprintln!();
    eprintln!("logging:");
    eprintln!("  --verbose | --debug        raise log level (or set {LOG_ENV})");
    eprintln!();
    eprintln!("environment (automock / fuzz):");
    eprintln!("  BSQ_ROOT    analysis engine checkout (required)");
    eprintln!("  BSQ_NODE    interpreter used to launch the engine (default: node)");
    eprintln!("  CADL_ROOT   root of the scratch directory <CADL_ROOT>/bsqit (default: cwd)");
}
