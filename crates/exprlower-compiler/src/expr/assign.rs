//! Assignments to locals, parameters and fields.

use exprlower_ast::{AssignExpr, FeatureKind};
use exprlower_core::{CompilationError, Result};

use super::ExprCompiler;
use crate::output::{NameKey, TreeAppendable};

pub(super) fn to_statement(
    compiler: &ExprCompiler<'_>,
    assign: &AssignExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    if let Some(receiver) = assign.receiver {
        compiler.to_statement(receiver, sink, true)?;
    }
    compiler.to_statement(assign.value, sink, true)?;
    sink.new_line();
    to_expression(compiler, assign, sink)?;
    sink.append(";");
    Ok(())
}

/// `<target> = <value>`, the value converted to the target's type.
pub(super) fn to_expression(
    compiler: &ExprCompiler<'_>,
    assign: &AssignExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    let target = assign.target;
    match target.kind {
        FeatureKind::LocalVariable(decl) => {
            let Some(name) = sink.get_name(&NameKey::Expr(decl)).map(str::to_string) else {
                return Err(CompilationError::UnresolvedFeature {
                    what: "local variable".into(),
                    name: target.name.into(),
                    span: assign.value.span,
                });
            };
            sink.append(&name);
        }
        FeatureKind::Parameter => {
            let name = sink
                .get_name(&NameKey::Parameter(target.name.to_string()))
                .unwrap_or(target.name)
                .to_string();
            sink.append(&name);
        }
        FeatureKind::Field => {
            if let Some(receiver) = assign.receiver {
                compiler.to_expression(receiver, sink)?;
                sink.append(".");
            }
            sink.append(target.name);
        }
        _ => {
            return Err(CompilationError::InvalidOperation {
                message: format!("cannot assign to '{}'", target.name),
                span: assign.value.span,
            });
        }
    }
    sink.append(" = ");
    let expected = compiler.ctx.types.expected_type(assign.value);
    compiler.to_converted_expression(assign.value, sink, expected.as_ref())
}
