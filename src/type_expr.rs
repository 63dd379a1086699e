//! Translation of source type expressions into target type syntax.

use tracing::warn;

use crate::ast::{Decorator, Expression};
use crate::constraints::{pattern_clause, ConstraintBuffer};
use crate::decorators::{string_arguments, PATTERN};
use crate::primitives::{lookup_primitive, map_type_name, TARGET_ANY, TARGET_STRING};

#[derive(Debug, Clone, Copy)]
/// Decorators and name of the field, parameter, or return slot being typed.
pub struct TypeContext<'a> {
    pub decorators: &'a [Decorator],
    /// Name bound in generated clauses (`$name`).
    pub name: &'a str,
}

impl<'a> TypeContext<'a> {
    pub fn new(decorators: &'a [Decorator], name: &'a str) -> Self {
        Self { decorators, name }
    }
}

/// Renders `expr` as target type text.
///
/// When `expr` names the source string primitive and `context` carries `@pattern`
/// decorators, one validator clause per pattern is appended to `constraints`.
/// The buffer is never reset or drained here; nested element types are
/// translated without context.
pub fn type_text(
    expr: &Expression,
    context: Option<TypeContext<'_>>,
    constraints: &mut ConstraintBuffer,
) -> String {
    let text = match expr {
        Expression::Array(element) => format!("List<{}>", type_text(element, None, constraints)),
        Expression::Tuple(elements) => format!("[{}]", join_types(elements, ", ", constraints)),
        Expression::Union(options) => join_types(options, " | ", constraints),
        Expression::Intersection(options) => join_types(options, " & ", constraints),
        Expression::TypeReference(name) | Expression::Identifier(name) => map_type_name(name),
        Expression::Unknown => TARGET_ANY.to_string(),
        Expression::Model(_)
        | Expression::Member { .. }
        | Expression::StringLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::Void
        | Expression::Never => {
            warn!(kind = expr.kind_name(), "unsupported type expression");
            placeholder(expr.kind_name())
        }
    };

    if is_string_primitive(expr) {
        if let Some(context) = context {
            for regex in string_arguments(context.decorators, PATTERN) {
                constraints.push(pattern_clause(regex, context.name));
            }
        }
    }

    text
}

/// True for references to the source primitive that maps to the target string type.
fn is_string_primitive(expr: &Expression) -> bool {
    match expr {
        Expression::TypeReference(name) | Expression::Identifier(name) => {
            lookup_primitive(name) == Some(TARGET_STRING)
        }
        _ => false,
    }
}

/// Bracketed marker standing in for an unsupported node kind.
pub fn placeholder(kind: &str) -> String {
    format!("[{kind}]")
}

fn join_types(
    expressions: &[Expression],
    separator: &str,
    constraints: &mut ConstraintBuffer,
) -> String {
    expressions
        .iter()
        .map(|expr| type_text(expr, None, constraints))
        .collect::<Vec<_>>()
        .join(separator)
}
