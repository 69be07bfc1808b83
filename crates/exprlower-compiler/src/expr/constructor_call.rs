//! Instance creation.

use exprlower_ast::{ConstructorCallExpr, Expr};
use exprlower_core::Result;

use super::{ExprCompiler, feature_call};
use crate::output::TreeAppendable;
use crate::serializer::serialize;
use crate::type_resolver::{resolve_type, resolve_types};

pub(super) fn to_statement(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    ctor: &ConstructorCallExpr<'_>,
    sink: &mut TreeAppendable,
    is_referenced: bool,
) -> Result<()> {
    for arg in ctor.args {
        compiler.to_statement(arg, sink, true)?;
    }
    if is_referenced {
        compiler.declare_fresh_local_variable(expr, sink, |sink| to_expression(compiler, ctor, sink))?;
    } else {
        sink.new_line();
        to_expression(compiler, ctor, sink)?;
        sink.append(";");
    }
    Ok(())
}

/// `new <class>(<args>)`
pub(super) fn to_expression(
    compiler: &ExprCompiler<'_>,
    ctor: &ConstructorCallExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    sink.append("new ")
        .append(&serialize(&resolve_type(&ctor.class), false))
        .append("(");
    feature_call::arguments(compiler, ctor.args, &resolve_types(ctor.param_types), sink)?;
    sink.append(")");
    Ok(())
}
