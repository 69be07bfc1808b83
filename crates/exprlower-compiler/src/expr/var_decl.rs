//! Local variable declarations.

use exprlower_ast::{Expr, VarDeclExpr};
use exprlower_core::{Result, TypeRef};

use super::{ExprCompiler, NamingSubject};
use crate::keywords::make_identifier;
use crate::output::{NameKey, TreeAppendable};
use crate::serializer::serialize;
use crate::type_resolver::resolve_type;

/// `[final] <type> <name>[ = <init>];`
///
/// The name is declared after the initializer's statements so they cannot
/// see it.
pub(super) fn to_statement(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    decl: &VarDeclExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    if let Some(init) = decl.init {
        compiler.to_statement(init, sink, !compiler.is_void_valued(init))?;
    }
    let ty = match (&decl.declared_type, decl.init) {
        (Some(declared), _) => resolve_type(declared),
        (None, Some(init)) => compiler.type_for_variable_declaration(init),
        (None, None) => TypeRef::object(),
    };

    sink.new_line();
    if !decl.writeable {
        sink.append("final ");
    }
    let proposed = make_identifier(&compiler.favorite_variable_name(NamingSubject::Expr(expr)));
    let name = sink.declare_synthetic_variable(NameKey::Expr(expr.id), &proposed);
    sink.append(&serialize(&ty, true)).append(" ").append(&name);
    if let Some(init) = decl.init {
        sink.append(" = ");
        compiler.to_converted_expression(init, sink, Some(&ty))?;
    }
    sink.append(";");
    Ok(())
}
