//! `if`, `return` and `throw`.

use exprlower_ast::{Expr, IfExpr, ReturnExpr, ThrowExpr};
use exprlower_core::{Result, TypeRef};

use super::{ExprCompiler, block};
use crate::output::TreeAppendable;

/// A referenced, non-void `if` declares its result local first and assigns
/// it at the end of each branch that produces a value.
pub(super) fn if_statement(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    if_expr: &IfExpr<'_>,
    sink: &mut TreeAppendable,
    is_referenced: bool,
) -> Result<()> {
    let referenced = is_referenced && !compiler.is_void_valued(expr);
    compiler.to_statement(if_expr.cond, sink, true)?;
    if referenced {
        compiler.declare_synthetic_variable(expr, sink)?;
    }

    sink.new_line().append("if (");
    compiler.to_converted_expression(if_expr.cond, sink, Some(&TypeRef::boolean()))?;
    sink.append(") {").increase_indentation();
    branch(compiler, expr, if_expr.then, sink, referenced)?;
    sink.decrease_indentation().new_line().append("}");
    if let Some(other) = if_expr.else_ {
        sink.append(" else {").increase_indentation();
        branch(compiler, expr, other, sink, referenced)?;
        sink.decrease_indentation().new_line().append("}");
    }
    Ok(())
}

fn branch(
    compiler: &ExprCompiler<'_>,
    owner: &Expr<'_>,
    body: &Expr<'_>,
    sink: &mut TreeAppendable,
    referenced: bool,
) -> Result<()> {
    sink.with_scope(|sink| {
        let assign = referenced && !compiler.is_void_valued(body) && !compiler.is_early_exit(body);
        compiler.to_statement(body, sink, assign)?;
        if assign {
            block::assign_result(compiler, owner, body, sink)?;
        }
        Ok(())
    })
}

/// `return <value>;`, or a bare `return;` when there is no value or it is
/// void.
pub(super) fn return_statement(
    compiler: &ExprCompiler<'_>,
    ret: &ReturnExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    match ret.value {
        Some(value) if !compiler.is_void_valued(value) => {
            compiler.to_statement(value, sink, true)?;
            let expected = compiler.ctx.types.expected_type(value);
            sink.new_line().append("return ");
            compiler.to_converted_expression(value, sink, expected.as_ref())?;
            sink.append(";");
        }
        Some(value) => {
            compiler.to_statement(value, sink, false)?;
            sink.new_line().append("return;");
        }
        None => {
            sink.new_line().append("return;");
        }
    }
    Ok(())
}

pub(super) fn throw_statement(
    compiler: &ExprCompiler<'_>,
    throw: &ThrowExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    compiler.to_statement(throw.value, sink, true)?;
    sink.new_line().append("throw ");
    compiler.to_expression(throw.value, sink)?;
    sink.append(";");
    Ok(())
}
