//! Drives the external analysis engine against a generated program.
//!
//! Both commands regenerate the scratch API file and package manifest, run the
//! engine once, and return its standard output. Every failure is reported as
//! text instead of propagating.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::config::ToolchainConfig;
use crate::error::EmitError;
use crate::transpile_file;
use crate::transpiler::TranspileOptions;

const ENTRYPOINT_NAMESPACE: &str = "Main";

#[derive(Debug, Serialize)]
struct PackageManifest {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    license: &'static str,
    src: PackageSources,
}

#[derive(Debug, Serialize)]
struct PackageSources {
    bsqsource: Vec<String>,
    entrypoints: Vec<String>,
    testfiles: Vec<String>,
}

/// Translates `file` and writes the API file plus package manifest into the scratch directory.
pub fn generate_scratch(
    file: &Path,
    config: &ToolchainConfig,
    options: TranspileOptions,
) -> Result<(), EmitError> {
    let program = transpile_file(file, options)?;

    fs::create_dir_all(&config.scratch_dir)?;
    let api_file = config.api_file();
    fs::write(&api_file, program)?;

    let manifest = PackageManifest {
        name: "bsqit",
        version: "0.0.0.0",
        description: "generated entrypoints for symbolic testing",
        license: "MIT",
        src: PackageSources {
            bsqsource: Vec::new(),
            entrypoints: vec![format!("./{}", file_name(&api_file))],
            testfiles: Vec::new(),
        },
    };
    let package_file = config.package_file();
    fs::write(&package_file, serde_json::to_string_pretty(&manifest)?)?;

    info!(
        api = %api_file.display(),
        manifest = %package_file.display(),
        "wrote scratch program"
    );
    Ok(())
}

/// Runs the engine's `symrun` mode on `opname` with a JSON array of arguments.
pub fn automock(
    file: &Path,
    opname: &str,
    args: &str,
    config: &ToolchainConfig,
    options: TranspileOptions,
) -> String {
    report(run_automock(file, opname, args, config, options))
}

/// Runs the engine's `fuzz` mode on `opname`.
pub fn fuzz(
    file: &Path,
    opname: &str,
    config: &ToolchainConfig,
    options: TranspileOptions,
) -> String {
    report(run_fuzz(file, opname, config, options))
}

fn run_automock(
    file: &Path,
    opname: &str,
    args: &str,
    config: &ToolchainConfig,
    options: TranspileOptions,
) -> Result<String, EmitError> {
    let entrypoint = entrypoint_name(opname)?;
    let arguments = argument_list(args)?;
    generate_scratch(file, config, options)?;

    run_engine(
        config,
        &[
            "symrun".to_string(),
            config.package_file().display().to_string(),
            "--entrypoint".to_string(),
            entrypoint,
            "--args".to_string(),
            arguments,
        ],
    )
}

fn run_fuzz(
    file: &Path,
    opname: &str,
    config: &ToolchainConfig,
    options: TranspileOptions,
) -> Result<String, EmitError> {
    let entrypoint = entrypoint_name(opname)?;
    generate_scratch(file, config, options)?;

    run_engine(
        config,
        &[
            "fuzz".to_string(),
            config.package_file().display().to_string(),
            "--entrypoint".to_string(),
            entrypoint,
        ],
    )
}

fn run_engine(config: &ToolchainConfig, args: &[String]) -> Result<String, EmitError> {
    debug!(
        interpreter = %config.interpreter.display(),
        script = %config.engine_script.display(),
        ?args,
        "running analysis engine"
    );

    let output = Command::new(&config.interpreter)
        .arg(&config.engine_script)
        .args(args)
        .output()
        .map_err(|e| {
            EmitError::Toolchain(format!(
                "failed to run '{}': {e}",
                config.interpreter.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EmitError::Toolchain(format!(
            "engine exited with code {:?}: {}",
            output.status.code(),
            stderr.trim_end()
        )));
    }

    info!(mode = %args[0], "engine run finished");
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn report(result: Result<String, EmitError>) -> String {
    match result {
        Ok(stdout) => format!("{stdout}\n"),
        Err(err) => err.to_string(),
    }
}

/// Qualified entrypoint for an operation name (`Main::<opname>`).
pub fn entrypoint_name(opname: &str) -> Result<String, EmitError> {
    if !identifier_regex().is_match(opname) {
        return Err(EmitError::Arguments(format!(
            "'{opname}' is not a valid operation name"
        )));
    }
    Ok(format!("{ENTRYPOINT_NAMESPACE}::{opname}"))
}

/// Re-encodes a JSON array of arguments as `[a, b, ...]`.
pub fn argument_list(args: &str) -> Result<String, EmitError> {
    let parsed: JsonValue = serde_json::from_str(args)?;
    let JsonValue::Array(items) = parsed else {
        return Err(EmitError::Arguments(
            "arguments must be a JSON array".to_string(),
        ));
    };

    let encoded = items
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", encoded.join(", ")))
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
