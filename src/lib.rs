pub mod ast;
pub mod config;
pub mod constraints;
pub mod decorators;
pub mod enumeration;
pub mod error;
pub mod model;
pub mod operation;
pub mod primitives;
pub mod syntax;
pub mod toolchain;
pub mod transpiler;
pub mod type_expr;

pub use config::{EnvProvider, MapEnvProvider, ProcessEnvProvider, ToolchainConfig};
pub use constraints::ConstraintBuffer;
pub use error::EmitError;
pub use syntax::parse_program;
pub use toolchain::{automock, fuzz, generate_scratch};
pub use transpiler::{
    transpile, transpile_with_options, TranspileOptions, Transpiler, UnsupportedPolicy,
};
pub use type_expr::{type_text, TypeContext};

use std::path::Path;

/// Reads and translates a source file.
pub fn transpile_file(
    path: impl AsRef<Path>,
    options: TranspileOptions,
) -> Result<String, EmitError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|e| {
        EmitError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read '{}': {e}", path.display()),
        ))
    })?;
    transpile_with_options(&input, options)
}
