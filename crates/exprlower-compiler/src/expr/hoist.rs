//! Binding values to synthetic locals.

use exprlower_ast::Expr;
use exprlower_core::{PrimitiveKind, Result, TypeRef};
use tracing::trace;

use super::{ExprCompiler, NamingSubject};
use crate::keywords::make_identifier;
use crate::output::{NameKey, TreeAppendable};
use crate::serializer::serialize;

impl ExprCompiler<'_> {
    /// Declare a fresh local bound to `expr` and emit
    /// `<type> <name> = <init>;`, where `init` writes the initializer.
    ///
    /// The name is visible to `init`; it must not emit `expr` through
    /// [`to_expression`](ExprCompiler::to_expression).
    pub fn declare_fresh_local_variable(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
        init: impl FnOnce(&mut TreeAppendable) -> Result<()>,
    ) -> Result<String> {
        let ty = self.type_for_variable_declaration(expr);
        let proposed = make_identifier(&self.favorite_variable_name(NamingSubject::Expr(expr)));
        let name = sink.declare_synthetic_variable(NameKey::Expr(expr.id), &proposed);
        trace!(expr = ?expr.id, %name, %ty, "hoisting");
        sink.new_line()
            .append(&serialize(&ty, true))
            .append(" ")
            .append(&name)
            .append(" = ");
        init(sink)?;
        sink.append(";");
        Ok(name)
    }

    /// Declare a local for the value of `expr`, initialized to the default
    /// of its type and assigned later.
    pub fn declare_synthetic_variable(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
    ) -> Result<String> {
        let literal = self.default_value_literal(expr);
        self.declare_fresh_local_variable(expr, sink, |sink| {
            sink.append(&literal);
            Ok(())
        })
    }

    /// The declared type of a local holding `expr`: its inferred type, or
    /// the expected type when nothing more specific was inferred.
    pub fn type_for_variable_declaration(&self, expr: &Expr<'_>) -> TypeRef {
        let ty = self.type_of(expr);
        if ty.is_any()
            && let Some(expected) = self.ctx.types.expected_type(expr)
            && !expected.is_type_parameter()
        {
            return expected;
        }
        ty
    }

    pub fn default_value_literal(&self, expr: &Expr<'_>) -> String {
        match self.type_for_variable_declaration(expr).primitive_kind() {
            Some(PrimitiveKind::Boolean) => "false".to_string(),
            Some(kind) if !kind.is_void() => format!("({}) 0", kind.name()),
            _ => "null".to_string(),
        }
    }
}
