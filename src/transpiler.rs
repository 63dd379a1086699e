//! Program-level orchestration: statement dispatch and output assembly.

use tracing::{debug, warn};

use crate::ast::{Program, Statement};
use crate::constraints::ConstraintBuffer;
use crate::error::EmitError;
use crate::syntax::parse_program;
use crate::type_expr::placeholder;

/// Module header every generated program starts with.
pub const MODULE_HEADER: &str = "namespace Main;";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// What happens when a declaration uses a deliberately unsupported feature.
pub enum UnsupportedPolicy {
    /// Fail the whole translation with [`EmitError::Unsupported`].
    #[default]
    Abort,
    /// Replace the offending declaration with an `[Unsupported: ...]` token.
    Placeholder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Translation options.
pub struct TranspileOptions {
    pub unsupported: UnsupportedPolicy,
}

/// Stateful translator owning the per-declaration [`ConstraintBuffer`].
///
/// Declaration methods are not reentrant: each resets the buffer on entry and
/// drains it before returning.
#[derive(Debug, Default)]
pub struct Transpiler {
    pub(crate) options: TranspileOptions,
    pub(crate) constraints: ConstraintBuffer,
}

impl Transpiler {
    pub fn new(options: TranspileOptions) -> Self {
        Self {
            options,
            constraints: ConstraintBuffer::new(),
        }
    }

    /// Current buffer contents; empty between declarations.
    pub fn constraints(&self) -> &ConstraintBuffer {
        &self.constraints
    }

    /// Translates every top-level statement and joins the fragments under the module header.
    pub fn transpile_program(&mut self, program: &Program) -> Result<String, EmitError> {
        let mut fragments = Vec::with_capacity(program.statements.len());

        for statement in &program.statements {
            let fragment = match self.transpile_statement(statement) {
                Ok(text) => text,
                Err(EmitError::Unsupported(message))
                    if self.options.unsupported == UnsupportedPolicy::Placeholder =>
                {
                    warn!(kind = statement.kind_name(), %message, "declaration replaced by placeholder");
                    format!("[Unsupported: {message}]")
                }
                Err(err) => return Err(err),
            };
            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }

        debug_assert!(
            self.constraints.is_empty(),
            "constraint buffer not drained by a declaration transpiler"
        );

        Ok(format!("{MODULE_HEADER}\n\n{}", fragments.join("\n\n")))
    }

    /// Dispatches one statement to its declaration transpiler.
    pub fn transpile_statement(&mut self, statement: &Statement) -> Result<String, EmitError> {
        match statement {
            Statement::Model(model) => {
                debug!(model = %model.name, "transpiling model");
                self.transpile_model(model)
            }
            Statement::Enum(enumeration) => {
                debug!(enumeration = %enumeration.name, "transpiling enum");
                self.transpile_enum(enumeration)
            }
            Statement::Interface(interface) => {
                debug!(interface = %interface.name, "transpiling interface");
                self.transpile_interface(interface)
            }
            Statement::Operation(_)
            | Statement::Import(_)
            | Statement::Namespace(_)
            | Statement::Union(_)
            | Statement::Using(_)
            | Statement::Alias(_)
            | Statement::Projection
            | Statement::Empty
            | Statement::Invalid => {
                debug!(kind = statement.kind_name(), "unsupported statement");
                Ok(placeholder(statement.kind_name()))
            }
        }
    }
}

/// Parses and translates `source` with default options.
pub fn transpile(source: &str) -> Result<String, EmitError> {
    transpile_with_options(source, TranspileOptions::default())
}

/// Parses and translates `source`.
pub fn transpile_with_options(
    source: &str,
    options: TranspileOptions,
) -> Result<String, EmitError> {
    let program = parse_program(source)?;
    Transpiler::new(options).transpile_program(&program)
}
