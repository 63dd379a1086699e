//! Source front end: tokenizer and parser for schema programs.

/// Tokenizer for schema source text.
pub mod lexer;
/// Parser producing [`crate::ast::Program`].
pub mod parser;

use crate::ast::Program;
use crate::error::EmitError;

pub use lexer::tokenize;

/// Parses schema source text into a program AST.
pub fn parse_program(input: &str) -> Result<Program, EmitError> {
    let tokens = lexer::tokenize(input)?;
    parser::parse(input, &tokens)
}

#[cfg(test)]
mod tests {
    use super::parse_program;
    use crate::ast::{
        Decorator, EnumMember, Expression, ModelMember, PropertyKey, Statement,
    };

    #[test]
    fn parses_structured_model_with_decorated_property() {
        let program = parse_program(
            r#"
@invariant("$age >= 0")
model Person {
  @pattern("/^[A-Z]+$/")
  code: string;
  "display-name": string,
  age: int32;
}
"#,
        )
        .unwrap();

        let Statement::Model(model) = &program.statements[0] else {
            panic!("expected model, got {:?}", program.statements[0]);
        };
        assert_eq!(model.name, "Person");
        assert!(model.is.is_none());
        assert_eq!(
            model.decorators,
            vec![Decorator {
                target: "invariant".to_string(),
                arguments: vec![Expression::StringLiteral("$age >= 0".to_string())],
            }]
        );
        assert_eq!(model.members.len(), 3);
        let ModelMember::Property(code) = &model.members[0] else {
            panic!("expected property");
        };
        assert_eq!(code.name.text(), "code");
        assert_eq!(code.decorators[0].target, "pattern");
        let ModelMember::Property(display) = &model.members[1] else {
            panic!("expected property");
        };
        assert_eq!(
            display.name,
            PropertyKey::StringLiteral("display-name".to_string())
        );
    }

    #[test]
    fn parses_alias_model_and_optional_default_flags() {
        let program = parse_program(
            "model Email is string;\nmodel Opts { retries?: int32; mode: string = \"fast\"; }",
        )
        .unwrap();

        let Statement::Model(alias) = &program.statements[0] else {
            panic!("expected model");
        };
        assert_eq!(alias.is, Some(Expression::reference("string")));

        let Statement::Model(opts) = &program.statements[1] else {
            panic!("expected model");
        };
        let ModelMember::Property(retries) = &opts.members[0] else {
            panic!("expected property");
        };
        assert!(retries.optional);
        let ModelMember::Property(mode) = &opts.members[1] else {
            panic!("expected property");
        };
        assert_eq!(
            mode.default,
            Some(Expression::StringLiteral("fast".to_string()))
        );
    }

    #[test]
    fn parses_type_expression_shapes() {
        let program = parse_program(
            "alias T = | string[] | [int32, boolean] | A & B | Lib.Thing | unknown | void;",
        )
        .unwrap();
        let Statement::Alias(alias) = &program.statements[0] else {
            panic!("expected alias");
        };
        assert_eq!(
            alias.value,
            Expression::Union(vec![
                Expression::Array(Box::new(Expression::reference("string"))),
                Expression::Tuple(vec![
                    Expression::reference("int32"),
                    Expression::reference("boolean"),
                ]),
                Expression::Intersection(vec![
                    Expression::reference("A"),
                    Expression::reference("B"),
                ]),
                Expression::Member {
                    base: Box::new(Expression::reference("Lib")),
                    member: "Thing".to_string(),
                },
                Expression::Unknown,
                Expression::Void,
            ])
        );
    }

    #[test]
    fn parses_enum_members_values_and_spreads() {
        let program = parse_program("enum Color { Red, Green: \"g\", ...Base.Colors }").unwrap();
        let Statement::Enum(color) = &program.statements[0] else {
            panic!("expected enum");
        };
        assert_eq!(color.members.len(), 3);
        assert!(matches!(
            &color.members[1],
            EnumMember::Plain { value: Some(Expression::StringLiteral(v)), .. } if v == "g"
        ));
        assert!(matches!(&color.members[2], EnumMember::Spread(_)));
    }

    #[test]
    fn parses_interface_operations_with_and_without_op_keyword() {
        let program = parse_program(
            r#"
interface Store {
  @requires("$count > 0")
  op list(@pattern("/^a/") prefix: string, count: int32): string[];
  get(id: string): Item;
}
"#,
        )
        .unwrap();
        let Statement::Interface(store) = &program.statements[0] else {
            panic!("expected interface");
        };
        assert_eq!(store.operations.len(), 2);
        let list = &store.operations[0];
        assert_eq!(list.name, "list");
        assert_eq!(list.decorators[0].target, "requires");
        assert_eq!(list.signature.parameters.members.len(), 2);
        assert_eq!(store.operations[1].name, "get");
    }

    #[test]
    fn parses_unsupported_statement_kinds() {
        let program = parse_program(
            r#"
import "./other.cadl";
using Cadl.Http;
namespace Demo.Api;
namespace Nested { model Inner { x: int32 } }
union Shape { circle: Circle, square: Square }
op ping(): void;
projection model#rename { to { } }
;
"#,
        )
        .unwrap();

        let kinds: Vec<&str> = program.statements.iter().map(Statement::kind_name).collect();
        assert_eq!(
            kinds,
            vec![
                "ImportStatementNode",
                "UsingStatementNode",
                "NamespaceStatementNode",
                "NamespaceStatementNode",
                "UnionStatementNode",
                "OperationStatementNode",
                "ProjectionStatementNode",
                "EmptyStatementNode",
            ]
        );
    }

    #[test]
    fn recovers_unknown_statement_as_invalid() {
        let program = parse_program("scalar Foo extends string;\nenum E { A }").unwrap();
        assert_eq!(program.statements[0], Statement::Invalid);
        assert!(matches!(program.statements[1], Statement::Enum(_)));
    }

    #[test]
    fn unknown_statement_inside_namespace_block_leaves_closing_brace() {
        let program = parse_program("namespace N { scalar S }\nmodel A { x: int32 }").unwrap();
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::Namespace(namespace) => {
                assert_eq!(namespace.statements, vec![Statement::Invalid]);
            }
            other => panic!("expected namespace, got {other:?}"),
        }
        assert!(matches!(program.statements[1], Statement::Model(_)));
    }

    #[test]
    fn stray_closing_brace_becomes_invalid() {
        let program = parse_program("}\nenum E { A }").unwrap();
        assert_eq!(program.statements[0], Statement::Invalid);
        assert!(matches!(program.statements[1], Statement::Enum(_)));
    }

    #[test]
    fn decorated_spreads_parse() {
        let program = parse_program(
            "model M { @doc(\"d\") ...Base; x: int32 }\nenum E { @doc(\"d\") ...Other, A }",
        )
        .unwrap();
        match &program.statements[0] {
            Statement::Model(model) => {
                assert!(matches!(&model.members[0], ModelMember::Spread(_)));
                assert!(matches!(&model.members[1], ModelMember::Property(_)));
            }
            other => panic!("expected model, got {other:?}"),
        }
        match &program.statements[1] {
            Statement::Enum(color) => {
                assert!(matches!(&color.members[0], EnumMember::Spread(_)));
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn malformed_model_is_fatal() {
        let err = parse_program("model Broken {\n  x int32;\n}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error at 2:5: expected ':' after property name"
        );
    }
}
