use exprlower_ast::CastExpr;
use exprlower_core::Result;

use super::ExprCompiler;
use crate::output::TreeAppendable;
use crate::serializer::serialize;
use crate::type_resolver::resolve_type;

/// `((<target>) <operand>)`
pub(super) fn to_expression(
    compiler: &ExprCompiler<'_>,
    cast: &CastExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    sink.append("((")
        .append(&serialize(&resolve_type(&cast.target), true))
        .append(") ");
    compiler.to_expression(cast.expr, sink)?;
    sink.append(")");
    Ok(())
}
