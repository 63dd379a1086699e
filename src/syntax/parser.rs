//! Recursive-descent parser for schema source programs.

use crate::ast::{
    AliasStatement, Decorator, EnumMember, EnumStatement, Expression, ImportStatement,
    InterfaceStatement, ModelExpression, ModelMember, ModelProperty, ModelStatement,
    NamespaceStatement, OperationSignature, OperationStatement, Program, PropertyKey, Statement,
    UnionStatement, UnionVariant, UsingStatement,
};
use crate::error::EmitError;

use super::lexer::{error_at, Token, TokenKind};

/// Parses a token stream into a [`Program`].
pub fn parse(source: &str, tokens: &[Token]) -> Result<Program, EmitError> {
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let statements = parser.parse_statements(false)?;
    Ok(Program { statements })
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_statements(&mut self, in_block: bool) -> Result<Vec<Statement>, EmitError> {
        let mut statements = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Eof if in_block => {
                    return Err(self.error("expected '}' to close namespace block"));
                }
                TokenKind::Eof => break,
                TokenKind::RBrace if in_block => break,
                _ => statements.push(self.parse_statement()?),
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, EmitError> {
        let decorators = self.parse_decorators()?;

        if self.consume_if(|k| matches!(k, TokenKind::Semicolon)).is_some() {
            return Ok(Statement::Empty);
        }

        let keyword = match &self.current().kind {
            TokenKind::Ident(name) => name.clone(),
            _ => {
                self.recover();
                return Ok(Statement::Invalid);
            }
        };

        match keyword.as_str() {
            "import" => {
                self.pos += 1;
                let path = self.expect_string("expected import path string")?;
                self.expect_semicolon()?;
                Ok(Statement::Import(ImportStatement { path }))
            }
            "using" => {
                self.pos += 1;
                let name = self.parse_dotted_name()?;
                self.expect_semicolon()?;
                Ok(Statement::Using(UsingStatement { name }))
            }
            "namespace" => {
                self.pos += 1;
                self.parse_namespace(decorators)
            }
            "model" => {
                self.pos += 1;
                self.parse_model(decorators).map(Statement::Model)
            }
            "enum" => {
                self.pos += 1;
                self.parse_enum(decorators).map(Statement::Enum)
            }
            "interface" => {
                self.pos += 1;
                self.parse_interface(decorators).map(Statement::Interface)
            }
            "op" => {
                self.pos += 1;
                let op = self.parse_operation(decorators)?;
                self.expect_semicolon()?;
                Ok(Statement::Operation(op))
            }
            "union" => {
                self.pos += 1;
                self.parse_union(decorators).map(Statement::Union)
            }
            "alias" => {
                self.pos += 1;
                let name = self.expect_ident("expected alias name")?;
                self.expect(|k| matches!(k, TokenKind::Equals), "expected '=' after alias name")?;
                let value = self.parse_expression()?;
                self.expect_semicolon()?;
                Ok(Statement::Alias(AliasStatement { name, value }))
            }
            "projection" => {
                self.pos += 1;
                self.skip_projection()?;
                Ok(Statement::Projection)
            }
            _ => {
                self.recover();
                Ok(Statement::Invalid)
            }
        }
    }

    fn parse_namespace(&mut self, decorators: Vec<Decorator>) -> Result<Statement, EmitError> {
        let name = self.parse_dotted_name()?;
        let statements = if self.consume_if(|k| matches!(k, TokenKind::LBrace)).is_some() {
            let statements = self.parse_statements(true)?;
            self.expect(|k| matches!(k, TokenKind::RBrace), "expected '}'")?;
            statements
        } else {
            self.expect_semicolon()?;
            Vec::new()
        };
        Ok(Statement::Namespace(NamespaceStatement {
            name,
            decorators,
            statements,
        }))
    }

    fn parse_model(&mut self, decorators: Vec<Decorator>) -> Result<ModelStatement, EmitError> {
        let name = self.expect_ident("expected model name")?;
        if matches!(self.current().kind, TokenKind::Lt) {
            return Err(self.error("template parameters are not supported"));
        }

        let is = if self.consume_keyword("is") {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let members = if self.consume_if(|k| matches!(k, TokenKind::LBrace)).is_some() {
            self.parse_model_members()?
        } else if is.is_some() {
            self.expect_semicolon()?;
            Vec::new()
        } else {
            return Err(self.error("expected '{' or 'is' after model name"));
        };

        Ok(ModelStatement {
            name,
            decorators,
            is,
            members,
        })
    }

    /// Parses members up to and including the closing `}` (the `{` is consumed).
    fn parse_model_members(&mut self) -> Result<Vec<ModelMember>, EmitError> {
        self.parse_members_until(|k| matches!(k, TokenKind::RBrace), "'}'")
    }

    fn parse_members_until(
        &mut self,
        close: fn(&TokenKind) -> bool,
        close_text: &str,
    ) -> Result<Vec<ModelMember>, EmitError> {
        let mut members = Vec::new();
        loop {
            if self.consume_if(close).is_some() {
                break;
            }
            let decorators = self.parse_decorators()?;
            if self.consume_if(|k| matches!(k, TokenKind::Ellipsis)).is_some() {
                members.push(ModelMember::Spread(self.parse_expression()?));
            } else {
                members.push(ModelMember::Property(self.parse_property(decorators)?));
            }

            if self
                .consume_if(|k| matches!(k, TokenKind::Semicolon | TokenKind::Comma))
                .is_none()
                && !close(&self.current().kind)
            {
                return Err(self.error(&format!("expected ';', ',' or {close_text}")));
            }
        }
        Ok(members)
    }

    fn parse_property(&mut self, decorators: Vec<Decorator>) -> Result<ModelProperty, EmitError> {
        let name = self.parse_property_key("expected property name")?;
        let optional = self.consume_if(|k| matches!(k, TokenKind::Question)).is_some();
        self.expect(|k| matches!(k, TokenKind::Colon), "expected ':' after property name")?;
        let value = self.parse_expression()?;
        let default = if self.consume_if(|k| matches!(k, TokenKind::Equals)).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(ModelProperty {
            name,
            value,
            optional,
            default,
            decorators,
        })
    }

    fn parse_enum(&mut self, decorators: Vec<Decorator>) -> Result<EnumStatement, EmitError> {
        let name = self.expect_ident("expected enum name")?;
        self.expect(|k| matches!(k, TokenKind::LBrace), "expected '{' after enum name")?;

        let mut members = Vec::new();
        loop {
            if self.consume_if(|k| matches!(k, TokenKind::RBrace)).is_some() {
                break;
            }
            let member_decorators = self.parse_decorators()?;
            if self.consume_if(|k| matches!(k, TokenKind::Ellipsis)).is_some() {
                members.push(EnumMember::Spread(self.parse_primary()?));
            } else {
                let member_name = self.parse_property_key("expected enum member name")?;
                let value = if self.consume_if(|k| matches!(k, TokenKind::Colon)).is_some() {
                    Some(self.parse_primary()?)
                } else {
                    None
                };
                members.push(EnumMember::Plain {
                    name: member_name,
                    value,
                    decorators: member_decorators,
                });
            }

            if self
                .consume_if(|k| matches!(k, TokenKind::Comma | TokenKind::Semicolon))
                .is_none()
                && !matches!(self.current().kind, TokenKind::RBrace)
            {
                return Err(self.error("expected ',' or '}' in enum body"));
            }
        }

        Ok(EnumStatement {
            name,
            decorators,
            members,
        })
    }

    fn parse_interface(
        &mut self,
        decorators: Vec<Decorator>,
    ) -> Result<InterfaceStatement, EmitError> {
        let name = self.expect_ident("expected interface name")?;
        self.expect(|k| matches!(k, TokenKind::LBrace), "expected '{' after interface name")?;

        let mut operations = Vec::new();
        loop {
            if self.consume_if(|k| matches!(k, TokenKind::RBrace)).is_some() {
                break;
            }
            let op_decorators = self.parse_decorators()?;
            self.consume_keyword("op");
            operations.push(self.parse_operation(op_decorators)?);
            if self
                .consume_if(|k| matches!(k, TokenKind::Semicolon | TokenKind::Comma))
                .is_none()
                && !matches!(self.current().kind, TokenKind::RBrace)
            {
                return Err(self.error("expected ';' after operation"));
            }
        }

        Ok(InterfaceStatement {
            name,
            decorators,
            operations,
        })
    }

    /// Parses `name(params): Return` (the `op` keyword is already consumed).
    fn parse_operation(
        &mut self,
        decorators: Vec<Decorator>,
    ) -> Result<OperationStatement, EmitError> {
        let name = self.expect_ident("expected operation name")?;
        self.expect(|k| matches!(k, TokenKind::LParen), "expected '(' after operation name")?;
        let members = self.parse_members_until(|k| matches!(k, TokenKind::RParen), "')'")?;
        self.expect(|k| matches!(k, TokenKind::Colon), "expected ':' before return type")?;
        let return_type = self.parse_expression()?;

        Ok(OperationStatement {
            name,
            decorators,
            signature: OperationSignature {
                parameters: ModelExpression { members },
                return_type,
            },
        })
    }

    fn parse_union(&mut self, decorators: Vec<Decorator>) -> Result<UnionStatement, EmitError> {
        let name = self.expect_ident("expected union name")?;
        self.expect(|k| matches!(k, TokenKind::LBrace), "expected '{' after union name")?;

        let mut variants = Vec::new();
        loop {
            if self.consume_if(|k| matches!(k, TokenKind::RBrace)).is_some() {
                break;
            }
            self.parse_decorators()?;
            let variant_name = self.parse_property_key("expected union variant name")?;
            self.expect(|k| matches!(k, TokenKind::Colon), "expected ':' after variant name")?;
            let value = self.parse_expression()?;
            variants.push(UnionVariant {
                name: variant_name,
                value,
            });
            if self
                .consume_if(|k| matches!(k, TokenKind::Comma | TokenKind::Semicolon))
                .is_none()
                && !matches!(self.current().kind, TokenKind::RBrace)
            {
                return Err(self.error("expected ',' or '}' in union body"));
            }
        }

        Ok(UnionStatement {
            name,
            decorators,
            variants,
        })
    }

    fn parse_decorators(&mut self) -> Result<Vec<Decorator>, EmitError> {
        let mut decorators = Vec::new();
        while self.consume_if(|k| matches!(k, TokenKind::At)).is_some() {
            let target = self.parse_dotted_name()?;
            let mut arguments = Vec::new();
            if self.consume_if(|k| matches!(k, TokenKind::LParen)).is_some()
                && self.consume_if(|k| matches!(k, TokenKind::RParen)).is_none()
            {
                loop {
                    arguments.push(self.parse_expression()?);
                    if self.consume_if(|k| matches!(k, TokenKind::Comma)).is_some() {
                        continue;
                    }
                    self.expect(
                        |k| matches!(k, TokenKind::RParen),
                        "expected ')' after decorator arguments",
                    )?;
                    break;
                }
            }
            decorators.push(Decorator { target, arguments });
        }
        Ok(decorators)
    }

    fn parse_expression(&mut self) -> Result<Expression, EmitError> {
        self.consume_if(|k| matches!(k, TokenKind::Pipe));
        let mut options = vec![self.parse_intersection()?];
        while self.consume_if(|k| matches!(k, TokenKind::Pipe)).is_some() {
            options.push(self.parse_intersection()?);
        }
        if options.len() == 1 {
            Ok(options.remove(0))
        } else {
            Ok(Expression::Union(options))
        }
    }

    fn parse_intersection(&mut self) -> Result<Expression, EmitError> {
        let mut options = vec![self.parse_array()?];
        while self.consume_if(|k| matches!(k, TokenKind::Amp)).is_some() {
            options.push(self.parse_array()?);
        }
        if options.len() == 1 {
            Ok(options.remove(0))
        } else {
            Ok(Expression::Intersection(options))
        }
    }

    fn parse_array(&mut self) -> Result<Expression, EmitError> {
        let mut expr = self.parse_primary()?;
        while matches!(self.current().kind, TokenKind::LBracket)
            && matches!(self.peek_kind(1), TokenKind::RBracket)
        {
            self.pos += 2;
            expr = Expression::Array(Box::new(expr));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, EmitError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number(n) => {
                self.pos += 1;
                Ok(Expression::NumericLiteral(n))
            }
            TokenKind::String(ref s) => {
                self.pos += 1;
                Ok(Expression::StringLiteral(s.clone()))
            }
            TokenKind::Bool(v) => {
                self.pos += 1;
                Ok(Expression::BooleanLiteral(v))
            }
            TokenKind::Ident(ref s) => {
                self.pos += 1;
                let mut expr = match s.as_str() {
                    "void" => return Ok(Expression::Void),
                    "never" => return Ok(Expression::Never),
                    "unknown" => return Ok(Expression::Unknown),
                    _ => Expression::TypeReference(s.clone()),
                };
                while self.consume_if(|k| matches!(k, TokenKind::Dot)).is_some() {
                    let member = self.expect_ident("expected identifier after '.'")?;
                    expr = Expression::Member {
                        base: Box::new(expr),
                        member,
                    };
                }
                if matches!(self.current().kind, TokenKind::Lt) {
                    return Err(self.error("template arguments are not supported"));
                }
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.pos += 1;
                let mut elements = Vec::new();
                if self.consume_if(|k| matches!(k, TokenKind::RBracket)).is_none() {
                    loop {
                        elements.push(self.parse_expression()?);
                        if self.consume_if(|k| matches!(k, TokenKind::Comma)).is_some() {
                            continue;
                        }
                        self.expect(
                            |k| matches!(k, TokenKind::RBracket),
                            "expected ']' after tuple elements",
                        )?;
                        break;
                    }
                }
                Ok(Expression::Tuple(elements))
            }
            TokenKind::LBrace => {
                self.pos += 1;
                let members = self.parse_model_members()?;
                Ok(Expression::Model(ModelExpression { members }))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let expr = self.parse_expression()?;
                self.expect(
                    |k| matches!(k, TokenKind::RParen),
                    "expected ')' after expression",
                )?;
                Ok(expr)
            }
            _ => Err(self.error(&format!("unexpected token {:?}", token.kind))),
        }
    }

    fn parse_property_key(&mut self, message: &str) -> Result<PropertyKey, EmitError> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let key = PropertyKey::Identifier(name.clone());
                self.pos += 1;
                Ok(key)
            }
            TokenKind::String(text) => {
                let key = PropertyKey::StringLiteral(text.clone());
                self.pos += 1;
                Ok(key)
            }
            _ => Err(self.error(message)),
        }
    }

    fn parse_dotted_name(&mut self) -> Result<String, EmitError> {
        let mut name = self.expect_ident("expected identifier")?;
        while self.consume_if(|k| matches!(k, TokenKind::Dot)).is_some() {
            name.push('.');
            name.push_str(&self.expect_ident("expected identifier after '.'")?);
        }
        Ok(name)
    }

    /// Skips `projection <selector>#<id> { ... }` by brace balance.
    fn skip_projection(&mut self) -> Result<(), EmitError> {
        while !matches!(self.current().kind, TokenKind::LBrace) {
            if matches!(self.current().kind, TokenKind::Eof) {
                return Err(self.error("expected '{' in projection statement"));
            }
            self.pos += 1;
        }
        self.skip_balanced_braces()
    }

    fn skip_balanced_braces(&mut self) -> Result<(), EmitError> {
        let mut depth = 0usize;
        loop {
            match self.current().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                TokenKind::Eof => return Err(self.error("unbalanced '{'")),
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skips an unrecognised statement up to the next `;` or balanced `{}` block.
    ///
    /// A `}` that ends the skipped text is left for the enclosing block; only
    /// a stray `}` at the very start is consumed.
    fn recover(&mut self) {
        let start = self.pos;
        loop {
            match self.current().kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                TokenKind::LBrace => {
                    // Unbalanced input simply runs to end of file.
                    let _ = self.skip_balanced_braces();
                    return;
                }
                TokenKind::RBrace => {
                    if self.pos == start {
                        self.pos += 1;
                    }
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn consume_if(&mut self, predicate: fn(&TokenKind) -> bool) -> Option<&Token> {
        if predicate(&self.current().kind) {
            let current = &self.tokens[self.pos];
            self.pos += 1;
            Some(current)
        } else {
            None
        }
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if matches!(&self.current().kind, TokenKind::Ident(name) if name == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(
        &mut self,
        predicate: fn(&TokenKind) -> bool,
        message: &str,
    ) -> Result<(), EmitError> {
        if self.consume_if(predicate).is_some() {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn expect_semicolon(&mut self) -> Result<(), EmitError> {
        self.expect(|k| matches!(k, TokenKind::Semicolon), "expected ';'")
    }

    fn expect_ident(&mut self, message: &str) -> Result<String, EmitError> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error(message)),
        }
    }

    fn expect_string(&mut self, message: &str) -> Result<String, EmitError> {
        match &self.current().kind {
            TokenKind::String(text) => {
                let text = text.clone();
                self.pos += 1;
                Ok(text)
            }
            _ => Err(self.error(message)),
        }
    }

    fn error(&self, message: &str) -> EmitError {
        error_at(self.source, self.current().pos, message)
    }
}
