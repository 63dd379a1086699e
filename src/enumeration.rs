//! Enum declarations.

use tracing::warn;

use crate::ast::{EnumMember, EnumStatement};
use crate::error::EmitError;
use crate::transpiler::Transpiler;
use crate::type_expr::placeholder;

impl Transpiler {
    /// Translates an enum into a case block, one case per member in source order.
    ///
    /// Members carrying a custom value are rejected; spreads become placeholders.
    pub fn transpile_enum(&mut self, enumeration: &EnumStatement) -> Result<String, EmitError> {
        let mut cases = Vec::with_capacity(enumeration.members.len());
        for member in &enumeration.members {
            match member {
                EnumMember::Plain {
                    name,
                    value: Some(_),
                    ..
                } => {
                    return Err(EmitError::Unsupported(format!(
                        "custom value on enum member '{}' in '{}'",
                        name.text(),
                        enumeration.name
                    )));
                }
                EnumMember::Plain { name, .. } => cases.push(name.text().to_string()),
                EnumMember::Spread(_) => {
                    warn!(enumeration = %enumeration.name, "enum spread left as placeholder");
                    cases.push(placeholder("EnumSpreadMemberNode"));
                }
            }
        }

        if cases.is_empty() {
            return Ok(format!("enum {} {{\n}}", enumeration.name));
        }

        let body = cases
            .iter()
            .map(|case| format!("    {case}"))
            .collect::<Vec<_>>()
            .join(",\n");
        Ok(format!("enum {} {{\n{body}\n}}", enumeration.name))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{EnumMember, EnumStatement, Expression, PropertyKey};
    use crate::transpiler::Transpiler;

    fn plain(name: &str) -> EnumMember {
        EnumMember::Plain {
            name: PropertyKey::Identifier(name.to_string()),
            value: None,
            decorators: Vec::new(),
        }
    }

    fn enumeration(members: Vec<EnumMember>) -> EnumStatement {
        EnumStatement {
            name: "Letter".to_string(),
            decorators: Vec::new(),
            members,
        }
    }

    #[test]
    fn preserves_member_order() {
        let out = Transpiler::default()
            .transpile_enum(&enumeration(vec![plain("A"), plain("B"), plain("C")]))
            .unwrap();
        assert_eq!(out, "enum Letter {\n    A,\n    B,\n    C\n}");
        let cases: Vec<&str> = out
            .lines()
            .skip(1)
            .take_while(|line| *line != "}")
            .map(|line| line.trim().trim_end_matches(','))
            .collect();
        assert_eq!(cases, vec!["A", "B", "C"]);
    }

    #[test]
    fn spread_member_is_placeholder() {
        let out = Transpiler::default()
            .transpile_enum(&enumeration(vec![
                plain("A"),
                EnumMember::Spread(Expression::reference("Other")),
            ]))
            .unwrap();
        assert_eq!(out, "enum Letter {\n    A,\n    [EnumSpreadMemberNode]\n}");
    }

    #[test]
    fn valued_member_is_rejected() {
        let err = Transpiler::default()
            .transpile_enum(&enumeration(vec![
                plain("A"),
                EnumMember::Plain {
                    name: PropertyKey::Identifier("B".to_string()),
                    value: Some(Expression::StringLiteral("b".to_string())),
                    decorators: Vec::new(),
                },
            ]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported feature: custom value on enum member 'B' in 'Letter'"
        );
    }

    #[test]
    fn empty_enum_has_empty_body() {
        let out = Transpiler::default()
            .transpile_enum(&enumeration(Vec::new()))
            .unwrap();
        assert_eq!(out, "enum Letter {\n}");
    }
}
