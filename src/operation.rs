//! Interface operations rendered as contract-decorated entrypoint stubs.

use crate::ast::{InterfaceStatement, ModelMember, OperationStatement};
use crate::decorators::{literal_clauses, ENSURES, REQUIRES};
use crate::error::EmitError;
use crate::transpiler::Transpiler;
use crate::type_expr::{placeholder, type_text, TypeContext};

/// Name the return value is bound to in postconditions (`$return`).
pub const RETURN_BINDING: &str = "return";

impl Transpiler {
    /// Translates every operation of an interface, blank-line separated.
    pub fn transpile_interface(
        &mut self,
        interface: &InterfaceStatement,
    ) -> Result<String, EmitError> {
        let mut operations = Vec::with_capacity(interface.operations.len());
        for operation in &interface.operations {
            operations.push(self.transpile_operation(operation)?);
        }
        Ok(operations.join("\n\n"))
    }

    /// Translates one operation into an entrypoint function with a havoc body.
    pub fn transpile_operation(
        &mut self,
        operation: &OperationStatement,
    ) -> Result<String, EmitError> {
        self.constraints.reset();
        let result = self.operation_text(operation);
        if result.is_err() {
            self.constraints.reset();
        }
        result
    }

    fn operation_text(&mut self, operation: &OperationStatement) -> Result<String, EmitError> {
        let mut parameters = Vec::with_capacity(operation.signature.parameters.members.len());
        for member in &operation.signature.parameters.members {
            match member {
                ModelMember::Property(property) => {
                    let (name, ty) = self.typed_property(property, &operation.name)?;
                    parameters.push(format!("{name}: {ty}"));
                }
                ModelMember::Spread(_) => parameters.push(placeholder("ModelSpreadPropertyNode")),
            }
        }

        let mut preconditions = literal_clauses(&operation.decorators, REQUIRES);
        preconditions.extend(self.constraints.drain());

        self.constraints.reset();
        let result_type = type_text(
            &operation.signature.return_type,
            Some(TypeContext::new(&operation.decorators, RETURN_BINDING)),
            &mut self.constraints,
        );
        let mut postconditions = literal_clauses(&operation.decorators, ENSURES);
        postconditions.extend(self.constraints.drain());

        let mut out = format!(
            "entrypoint function {}({}): {result_type}",
            operation.name,
            parameters.join(", ")
        );
        if preconditions.is_empty() && postconditions.is_empty() {
            out.push_str(" {\n");
        } else {
            out.push('\n');
            for clause in &preconditions {
                out.push_str(&format!("    requires {clause}\n"));
            }
            for clause in &postconditions {
                out.push_str(&format!("    ensures {clause}\n"));
            }
            out.push_str("{\n");
        }
        out.push_str(&format!(
            "    return s_reshavoc<{result_type}>(\"{}\");\n}}",
            operation.name
        ));
        Ok(out)
    }
}
