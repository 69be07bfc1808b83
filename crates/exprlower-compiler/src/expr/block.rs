//! Blocks.

use exprlower_ast::{BlockExpr, Expr};
use exprlower_core::{CompilationError, Result};

use super::ExprCompiler;
use crate::output::{NameKey, TreeAppendable};

/// A block of one expression is that expression. Longer blocks get braces and
/// a scope of their own; a referenced value is assigned to a local declared
/// before the braces.
pub(super) fn to_statement(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    block: &BlockExpr<'_>,
    sink: &mut TreeAppendable,
    is_referenced: bool,
) -> Result<()> {
    let Some((last, statements)) = block.exprs.split_last() else {
        return Ok(());
    };
    if statements.is_empty() {
        return compiler.to_statement(last, sink, is_referenced);
    }

    let referenced = is_referenced && !compiler.is_void_valued(expr);
    if referenced {
        compiler.declare_synthetic_variable(expr, sink)?;
    }
    sink.new_line().append("{").increase_indentation();
    sink.with_scope(|sink| {
        for statement in statements {
            compiler.to_statement(statement, sink, false)?;
        }
        let assign = referenced && !compiler.is_void_valued(last) && !compiler.is_early_exit(last);
        compiler.to_statement(last, sink, assign)?;
        if assign {
            assign_result(compiler, expr, last, sink)?;
        }
        Ok(())
    })?;
    sink.decrease_indentation().new_line().append("}");
    Ok(())
}

/// `<name of owner> = <value>;` for a branch or block result bound to the
/// local of `owner`.
pub(super) fn assign_result(
    compiler: &ExprCompiler<'_>,
    owner: &Expr<'_>,
    value: &Expr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    let Some(name) = sink.get_name(&NameKey::Expr(owner.id)).map(str::to_string) else {
        return Err(CompilationError::internal(format!(
            "no local was declared for the {} at {}",
            owner.kind_name(),
            owner.span
        )));
    };
    let target = compiler.type_of(owner);
    sink.new_line().append(&name).append(" = ");
    compiler.to_converted_expression(value, sink, Some(&target))?;
    sink.append(";");
    Ok(())
}
