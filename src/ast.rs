//! Syntax tree for schema source programs.
//!
//! Nodes are built once by [`crate::syntax::parse_program`] (or by hand in tests)
//! and are read-only afterwards.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Parsed source program: top-level statements in source order.
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Top-level (or namespace-nested) statement.
pub enum Statement {
    Model(ModelStatement),
    Enum(EnumStatement),
    Interface(InterfaceStatement),
    /// Operation declared outside any interface.
    Operation(OperationStatement),
    Import(ImportStatement),
    Namespace(NamespaceStatement),
    Union(UnionStatement),
    Using(UsingStatement),
    Alias(AliasStatement),
    Projection,
    Empty,
    Invalid,
}

impl Statement {
    /// Node kind name used in placeholder tokens.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Model(_) => "ModelStatementNode",
            Statement::Enum(_) => "EnumStatementNode",
            Statement::Interface(_) => "InterfaceStatementNode",
            Statement::Operation(_) => "OperationStatementNode",
            Statement::Import(_) => "ImportStatementNode",
            Statement::Namespace(_) => "NamespaceStatementNode",
            Statement::Union(_) => "UnionStatementNode",
            Statement::Using(_) => "UsingStatementNode",
            Statement::Alias(_) => "AliasStatementNode",
            Statement::Projection => "ProjectionStatementNode",
            Statement::Empty => "EmptyStatementNode",
            Statement::Invalid => "InvalidStatementNode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Decorator application such as `@pattern("/^[a-z]+$/")`.
pub struct Decorator {
    /// Decorator name, dotted when qualified (`@Cadl.doc` -> `Cadl.doc`).
    pub target: String,
    /// Argument expressions in source order.
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Property or enum member key: bare identifier or quoted string.
pub enum PropertyKey {
    Identifier(String),
    StringLiteral(String),
}

impl PropertyKey {
    /// Key text without quotes.
    pub fn text(&self) -> &str {
        match self {
            PropertyKey::Identifier(name) | PropertyKey::StringLiteral(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// `model` declaration.
pub struct ModelStatement {
    pub name: String,
    pub decorators: Vec<Decorator>,
    /// Target of `model M is T`; selects alias mode when present.
    pub is: Option<Expression>,
    pub members: Vec<ModelMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Member of a model body or inline model expression.
pub enum ModelMember {
    Property(ModelProperty),
    /// `...Other`
    Spread(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Named, typed model property.
pub struct ModelProperty {
    pub name: PropertyKey,
    pub value: Expression,
    /// `name?: T`
    pub optional: bool,
    /// `name: T = default`
    pub default: Option<Expression>,
    pub decorators: Vec<Decorator>,
}

impl ModelProperty {
    /// Required, undecorated property with an identifier key.
    pub fn new(name: impl Into<String>, value: Expression) -> Self {
        Self {
            name: PropertyKey::Identifier(name.into()),
            value,
            optional: false,
            default: None,
            decorators: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// `enum` declaration.
pub struct EnumStatement {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EnumMember {
    Plain {
        name: PropertyKey,
        /// Custom discriminant (`A: "a"`); rejected by the generator.
        value: Option<Expression>,
        decorators: Vec<Decorator>,
    },
    /// `...OtherEnum`
    Spread(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// `interface` declaration grouping operations.
pub struct InterfaceStatement {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub operations: Vec<OperationStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// `op name(params): Return` declaration.
pub struct OperationStatement {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub signature: OperationSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSignature {
    /// Parameter list, shaped like an inline model.
    pub parameters: ModelExpression,
    pub return_type: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportStatement {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceStatement {
    /// Dotted namespace name.
    pub name: String,
    pub decorators: Vec<Decorator>,
    /// Statements of a block namespace; empty for `namespace A;`.
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionStatement {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub variants: Vec<UnionVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionVariant {
    pub name: PropertyKey,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsingStatement {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasStatement {
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
/// Inline `{ ... }` model.
pub struct ModelExpression {
    pub members: Vec<ModelMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Type expression.
pub enum Expression {
    /// `T[]`
    Array(Box<Expression>),
    /// `[T1, T2]`
    Tuple(Vec<Expression>),
    /// `A | B`
    Union(Vec<Expression>),
    /// `A & B`
    Intersection(Vec<Expression>),
    /// Reference to a named type (`int32`, `Widget`).
    TypeReference(String),
    /// Bare identifier.
    Identifier(String),
    Model(ModelExpression),
    /// `base.member`
    Member {
        base: Box<Expression>,
        member: String,
    },
    StringLiteral(String),
    NumericLiteral(f64),
    BooleanLiteral(bool),
    Void,
    Never,
    Unknown,
}

impl Expression {
    /// Shorthand for [`Expression::TypeReference`].
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::TypeReference(name.into())
    }

    /// Node kind name used in placeholder tokens.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Array(_) => "ArrayExpressionNode",
            Expression::Tuple(_) => "TupleExpressionNode",
            Expression::Union(_) => "UnionExpressionNode",
            Expression::Intersection(_) => "IntersectionExpressionNode",
            Expression::TypeReference(_) => "TypeReferenceNode",
            Expression::Identifier(_) => "IdentifierNode",
            Expression::Model(_) => "ModelExpressionNode",
            Expression::Member { .. } => "MemberExpressionNode",
            Expression::StringLiteral(_) => "StringLiteralNode",
            Expression::NumericLiteral(_) => "NumericLiteralNode",
            Expression::BooleanLiteral(_) => "BooleanLiteralNode",
            Expression::Void => "VoidKeywordNode",
            Expression::Never => "NeverKeywordNode",
            Expression::Unknown => "UnknownKeywordNode",
        }
    }

    /// Dotted name of a reference, identifier, or member chain.
    pub fn reference_path(&self) -> Option<String> {
        match self {
            Expression::TypeReference(name) | Expression::Identifier(name) => Some(name.clone()),
            Expression::Member { base, member } => {
                base.reference_path().map(|base| format!("{base}.{member}"))
            }
            _ => None,
        }
    }
}
