//! Recognized contract decorators and their literal arguments.

use crate::ast::{Decorator, Expression};

pub const INVARIANT: &str = "invariant";
pub const REQUIRES: &str = "requires";
pub const ENSURES: &str = "ensures";
pub const PATTERN: &str = "pattern";

/// Literal string argument of every decorator tagged `tag`, in decorator order.
///
/// Only the first argument is consulted and only when it is a string literal;
/// other decorators (and non-literal arguments) are ignored.
pub fn string_arguments<'a>(decorators: &'a [Decorator], tag: &str) -> Vec<&'a str> {
    decorators
        .iter()
        .filter(|decorator| decorator.target == tag)
        .filter_map(|decorator| match decorator.arguments.first() {
            Some(Expression::StringLiteral(text)) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Literal clauses for `tag`, each terminated with `;`.
pub fn literal_clauses(decorators: &[Decorator], tag: &str) -> Vec<String> {
    string_arguments(decorators, tag)
        .into_iter()
        .map(|text| format!("{text};"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{literal_clauses, string_arguments, INVARIANT, PATTERN};
    use crate::ast::{Decorator, Expression};

    fn decorator(target: &str, args: Vec<Expression>) -> Decorator {
        Decorator {
            target: target.to_string(),
            arguments: args,
        }
    }

    #[test]
    fn collects_matching_string_literals_in_order() {
        let decorators = vec![
            decorator(INVARIANT, vec![Expression::StringLiteral("$a > 0".into())]),
            decorator("doc", vec![Expression::StringLiteral("ignored".into())]),
            decorator(INVARIANT, vec![Expression::StringLiteral("$b > 0".into())]),
        ];
        assert_eq!(
            string_arguments(&decorators, INVARIANT),
            vec!["$a > 0", "$b > 0"]
        );
        assert_eq!(
            literal_clauses(&decorators, INVARIANT),
            vec!["$a > 0;".to_string(), "$b > 0;".to_string()]
        );
    }

    #[test]
    fn skips_non_literal_and_missing_arguments() {
        let decorators = vec![
            decorator(PATTERN, vec![Expression::reference("Regex")]),
            decorator(PATTERN, vec![]),
            decorator("Cadl.pattern", vec![Expression::StringLiteral("/x/".into())]),
        ];
        assert!(string_arguments(&decorators, PATTERN).is_empty());
    }
}
