//! Feature calls: variable, parameter and field reads, `this`, method calls
//! and operator applications.

use exprlower_ast::{Expr, FeatureCallExpr, FeatureKind};
use exprlower_core::{CompilationError, Result, TypeRef};

use super::ExprCompiler;
use crate::output::{NameKey, TreeAppendable};
use crate::serializer::serialize;
use crate::type_resolver::{resolve_type, resolve_types};

/// Prepare the receiver and arguments; a referenced, non-void invocation is
/// hoisted, an unreferenced one becomes an expression statement. Reads and
/// operators emit nothing of their own.
pub(super) fn to_statement(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    call: &FeatureCallExpr<'_>,
    sink: &mut TreeAppendable,
    is_referenced: bool,
) -> Result<()> {
    if let Some(receiver) = call.receiver {
        compiler.to_statement(receiver, sink, true)?;
    }
    for arg in call.args {
        compiler.to_statement(arg, sink, true)?;
    }
    if !call.feature.is_invocation() {
        return Ok(());
    }
    if is_referenced && !compiler.is_void_valued(expr) {
        compiler.declare_fresh_local_variable(expr, sink, |sink| invocation(compiler, call, sink))?;
    } else {
        sink.new_line();
        invocation(compiler, call, sink)?;
        sink.append(";");
    }
    Ok(())
}

pub(super) fn to_expression(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    call: &FeatureCallExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    let feature = call.feature;
    match feature.kind {
        FeatureKind::LocalVariable(decl) => {
            let Some(name) = sink.get_name(&NameKey::Expr(decl)).map(str::to_string) else {
                return Err(CompilationError::UnresolvedFeature {
                    what: "local variable".into(),
                    name: feature.name.into(),
                    span: expr.span,
                });
            };
            sink.append(&name);
        }
        FeatureKind::Parameter => {
            let name = sink
                .get_name(&NameKey::Parameter(feature.name.to_string()))
                .unwrap_or(feature.name)
                .to_string();
            sink.append(&name);
        }
        FeatureKind::This | FeatureKind::Super => {
            let key = NameKey::Type(compiler.type_of(expr).type_hash());
            let name = sink.get_name(&key).unwrap_or(feature.name).to_string();
            sink.append(&name);
        }
        FeatureKind::Field => {
            if let Some(receiver) = call.receiver {
                compiler.to_expression(receiver, sink)?;
                sink.append(".");
            }
            sink.append(feature.name);
        }
        FeatureKind::Operator(symbol) => operator(compiler, expr, call, symbol, sink)?,
        FeatureKind::Method | FeatureKind::StaticMethod => invocation(compiler, call, sink)?,
    }
    Ok(())
}

/// `[<target>.]name(<args>)`, where the target is the declaring type of a
/// static method or the receiver of an instance method.
fn invocation(
    compiler: &ExprCompiler<'_>,
    call: &FeatureCallExpr<'_>,
    sink: &mut TreeAppendable,
) -> Result<()> {
    let feature = call.feature;
    match (feature.kind, call.receiver, &feature.declaring_type) {
        (FeatureKind::StaticMethod, _, Some(owner)) => {
            sink.append(&serialize(&resolve_type(owner), false)).append(".");
        }
        (_, Some(receiver), _) => {
            compiler.to_expression(receiver, sink)?;
            sink.append(".");
        }
        _ => {}
    }
    sink.append(feature.name).append("(");
    arguments(compiler, call.args, &resolve_types(feature.param_types), sink)?;
    sink.append(")");
    Ok(())
}

/// `(lhs <op> rhs)` for binary and `(<op>operand)` for unary operators.
fn operator(
    compiler: &ExprCompiler<'_>,
    expr: &Expr<'_>,
    call: &FeatureCallExpr<'_>,
    symbol: &str,
    sink: &mut TreeAppendable,
) -> Result<()> {
    let params = resolve_types(call.feature.param_types);
    let operands: Vec<&Expr<'_>> = call
        .receiver
        .into_iter()
        .chain(call.args.iter().copied())
        .collect();
    sink.append("(");
    match operands.as_slice() {
        [operand] => {
            sink.append(symbol);
            compiler.to_converted_expression(operand, sink, params.first())?;
        }
        [lhs, rhs] => {
            compiler.to_expression(lhs, sink)?;
            sink.append(" ").append(symbol).append(" ");
            compiler.to_converted_expression(rhs, sink, params.first())?;
        }
        _ => {
            return Err(CompilationError::InvalidOperation {
                message: format!(
                    "operator '{}' applied to {} operands",
                    call.feature.name,
                    operands.len()
                ),
                span: expr.span,
            });
        }
    }
    sink.append(")");
    Ok(())
}

/// Comma-separated argument expressions, each converted to its parameter type.
pub(super) fn arguments(
    compiler: &ExprCompiler<'_>,
    args: &[&Expr<'_>],
    params: &[TypeRef],
    sink: &mut TreeAppendable,
) -> Result<()> {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            sink.append(", ");
        }
        compiler.to_converted_expression(arg, sink, params.get(i))?;
    }
    Ok(())
}
