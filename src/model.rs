//! Model declarations: alias (`model M is T`) and structured entity forms.

use tracing::warn;

use crate::ast::{Expression, ModelMember, ModelProperty, ModelStatement};
use crate::decorators::{literal_clauses, INVARIANT};
use crate::error::EmitError;
use crate::primitives::lookup_primitive;
use crate::transpiler::Transpiler;
use crate::type_expr::{placeholder, type_text, TypeContext};

impl Transpiler {
    /// Translates a model declaration.
    pub fn transpile_model(&mut self, model: &ModelStatement) -> Result<String, EmitError> {
        if let Some(target) = &model.is {
            return Ok(self.alias_model(&model.name, target));
        }

        self.constraints.reset();
        let result = self.structured_model(model);
        if result.is_err() {
            self.constraints.reset();
        }
        result
    }

    fn alias_model(&mut self, name: &str, target: &Expression) -> String {
        match target.reference_path() {
            Some(path) => match lookup_primitive(&path) {
                Some(primitive) => format!("typedecl {name} = {primitive};"),
                None => format!("typedef {name} = {path};"),
            },
            None => format!(
                "typedef {name} = {};",
                type_text(target, None, &mut self.constraints)
            ),
        }
    }

    fn structured_model(&mut self, model: &ModelStatement) -> Result<String, EmitError> {
        let mut fields = Vec::with_capacity(model.members.len());
        for member in &model.members {
            match member {
                ModelMember::Property(property) => {
                    let (name, ty) = self.typed_property(property, &model.name)?;
                    fields.push(format!("field {name}: {ty};"));
                }
                ModelMember::Spread(_) => {
                    warn!(model = %model.name, "spread property left as placeholder");
                    fields.push(placeholder("ModelSpreadPropertyNode"));
                }
            }
        }

        let mut invariants = literal_clauses(&model.decorators, INVARIANT);
        invariants.extend(self.constraints.drain());

        let mut out = format!("entity {} {{\n", model.name);
        for field in &fields {
            out.push_str(&format!("    {field}\n"));
        }
        if !invariants.is_empty() {
            if !fields.is_empty() {
                out.push('\n');
            }
            for clause in &invariants {
                out.push_str(&format!("    invariant {clause}\n"));
            }
        }
        out.push('}');
        Ok(out)
    }

    /// Resolves a property's name and type, registering pattern validators.
    ///
    /// Optional and defaulted properties are rejected.
    pub(crate) fn typed_property(
        &mut self,
        property: &ModelProperty,
        owner: &str,
    ) -> Result<(String, String), EmitError> {
        let name = property.name.text();
        if property.optional {
            return Err(EmitError::Unsupported(format!(
                "optional property '{name}' in '{owner}'"
            )));
        }
        if property.default.is_some() {
            return Err(EmitError::Unsupported(format!(
                "default value on property '{name}' in '{owner}'"
            )));
        }

        let ty = type_text(
            &property.value,
            Some(TypeContext::new(&property.decorators, name)),
            &mut self.constraints,
        );
        Ok((name.to_string(), ty))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        Decorator, Expression, ModelMember, ModelProperty, ModelStatement, PropertyKey,
    };
    use crate::transpiler::Transpiler;

    fn string_decorator(target: &str, text: &str) -> Decorator {
        Decorator {
            target: target.to_string(),
            arguments: vec![Expression::StringLiteral(text.to_string())],
        }
    }

    fn model(name: &str, members: Vec<ModelMember>) -> ModelStatement {
        ModelStatement {
            name: name.to_string(),
            decorators: Vec::new(),
            is: None,
            members,
        }
    }

    fn alias(name: &str, target: Expression) -> ModelStatement {
        ModelStatement {
            name: name.to_string(),
            decorators: Vec::new(),
            is: Some(target),
            members: Vec::new(),
        }
    }

    #[test]
    fn alias_to_primitive_is_distinct_type() {
        let mut transpiler = Transpiler::default();
        assert_eq!(
            transpiler
                .transpile_model(&alias("Email", Expression::reference("string")))
                .unwrap(),
            "typedecl Email = String;"
        );
    }

    #[test]
    fn alias_to_declaration_is_plain_typedef() {
        let mut transpiler = Transpiler::default();
        assert_eq!(
            transpiler
                .transpile_model(&alias("Owner", Expression::reference("Person")))
                .unwrap(),
            "typedef Owner = Person;"
        );
        assert_eq!(
            transpiler
                .transpile_model(&alias(
                    "Names",
                    Expression::Array(Box::new(Expression::reference("string")))
                ))
                .unwrap(),
            "typedef Names = List<String>;"
        );
    }

    #[test]
    fn plain_model_has_no_invariant_block() {
        let mut transpiler = Transpiler::default();
        let out = transpiler
            .transpile_model(&model(
                "Point",
                vec![
                    ModelMember::Property(ModelProperty::new("x", Expression::reference("int32"))),
                    ModelMember::Property(ModelProperty::new("y", Expression::reference("int32"))),
                ],
            ))
            .unwrap();
        assert_eq!(out, "entity Point {\n    field x: Int;\n    field y: Int;\n}");
        assert!(!out.contains("invariant"));
    }

    #[test]
    fn pattern_field_emits_single_invariant_and_drains_buffer() {
        let mut code = ModelProperty::new("code", Expression::reference("string"));
        code.decorators.push(string_decorator("pattern", "/^[0-9]+$/"));

        let mut transpiler = Transpiler::default();
        let out = transpiler
            .transpile_model(&model("Zip", vec![ModelMember::Property(code)]))
            .unwrap();

        assert_eq!(
            out,
            "entity Zip {\n    field code: String;\n\n    invariant /^[0-9]+$/.accepts($code);\n}"
        );
        assert_eq!(out.matches("invariant").count(), 1);
        assert!(transpiler.constraints().is_empty());
    }

    #[test]
    fn literal_invariants_precede_pattern_invariants() {
        let mut code = ModelProperty::new("code", Expression::reference("string"));
        code.decorators.push(string_decorator("pattern", "/^x/"));
        let mut statement = model(
            "Item",
            vec![
                ModelMember::Property(code),
                ModelMember::Property(ModelProperty::new("qty", Expression::reference("int32"))),
            ],
        );
        statement.decorators = vec![
            string_decorator("invariant", "$qty > 0"),
            string_decorator("doc", "ignored"),
            string_decorator("invariant", "$qty < 100"),
        ];

        let mut transpiler = Transpiler::default();
        let out = transpiler.transpile_model(&statement).unwrap();
        let invariants: Vec<&str> = out
            .lines()
            .filter(|line| line.trim_start().starts_with("invariant"))
            .collect();
        assert_eq!(
            invariants,
            vec![
                "    invariant $qty > 0;",
                "    invariant $qty < 100;",
                "    invariant /^x/.accepts($code);",
            ]
        );
    }

    #[test]
    fn model_decorators_do_not_apply_to_fields() {
        let mut statement = model(
            "Tag",
            vec![ModelMember::Property(ModelProperty::new(
                "label",
                Expression::reference("string"),
            ))],
        );
        statement.decorators = vec![string_decorator("pattern", "/^t/")];

        let mut transpiler = Transpiler::default();
        let out = transpiler.transpile_model(&statement).unwrap();
        assert_eq!(out, "entity Tag {\n    field label: String;\n}");
    }

    #[test]
    fn string_literal_keys_use_their_text() {
        let property = ModelProperty {
            name: PropertyKey::StringLiteral("zip".to_string()),
            value: Expression::reference("string"),
            optional: false,
            default: None,
            decorators: vec![string_decorator("pattern", "/^[0-9]{5}$/")],
        };
        let mut transpiler = Transpiler::default();
        let out = transpiler
            .transpile_model(&model("Addr", vec![ModelMember::Property(property)]))
            .unwrap();
        assert!(out.contains("field zip: String;"));
        assert!(out.contains("invariant /^[0-9]{5}$/.accepts($zip);"));
    }

    #[test]
    fn optional_and_defaulted_properties_are_rejected() {
        let mut optional = ModelProperty::new("nick", Expression::reference("string"));
        optional.optional = true;
        let mut defaulted = ModelProperty::new("count", Expression::reference("int32"));
        defaulted.default = Some(Expression::NumericLiteral(0.0));

        let mut transpiler = Transpiler::default();
        let err = transpiler
            .transpile_model(&model("A", vec![ModelMember::Property(optional)]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported feature: optional property 'nick' in 'A'"
        );
        let err = transpiler
            .transpile_model(&model("B", vec![ModelMember::Property(defaulted)]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported feature: default value on property 'count' in 'B'"
        );
    }

    #[test]
    fn spread_property_becomes_placeholder_field() {
        let mut transpiler = Transpiler::default();
        let out = transpiler
            .transpile_model(&model(
                "Derived",
                vec![ModelMember::Spread(Expression::reference("Base"))],
            ))
            .unwrap();
        assert_eq!(out, "entity Derived {\n    [ModelSpreadPropertyNode]\n}");
    }
}
