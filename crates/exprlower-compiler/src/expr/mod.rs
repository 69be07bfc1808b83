//! Expression lowering.
//!
//! The [`ExprCompiler`] turns a typed expression tree into host statements
//! and expressions. Every node has two forms:
//! - statement form (`to_statement`): emits whatever has to run before the
//!   node's value is available, hoisting it into a named local when the
//!   value is referenced later and cannot be re-evaluated inline
//! - expression form (`to_expression`): the node's value as inline text,
//!   or the name it was hoisted into
//!
//! The entry points combine the two: [`compile`](ExprCompiler::compile)
//! for function bodies, [`compile_block`](ExprCompiler::compile_block) for
//! bodies whose outer block is trimmed, and
//! [`compile_as_expression`](ExprCompiler::compile_as_expression) where a
//! single inline expression is required.
//!
//! # Example
//!
//! ```ignore
//! let compiler = ExprCompiler::new(ctx);
//! let mut out = TreeAppendable::default();
//! compiler.compile(body, &mut out, Some(&TypeRef::int()), &[])?;
//! ```

mod assign;
mod block;
mod cast;
mod constructor_call;
mod control;
mod feature_call;
mod hoist;
mod literal;
mod naming;
mod var_decl;

pub use naming::NamingSubject;

use exprlower_ast::{Expr, ExprKind};
use exprlower_core::{CompilationError, PrimitiveKind, Result, TypeRef};
use tracing::{debug, warn};

use crate::context::CompilationContext;
use crate::output::{NameKey, TreeAppendable};
use crate::serializer::serialize;

/// Lowers expressions to host code.
pub struct ExprCompiler<'a> {
    ctx: CompilationContext<'a>,
}

impl<'a> ExprCompiler<'a> {
    pub fn new(ctx: CompilationContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CompilationContext<'a> {
        &self.ctx
    }

    pub(crate) fn type_of(&self, expr: &Expr<'_>) -> TypeRef {
        self.ctx.types.type_of(expr)
    }

    pub(crate) fn is_void_valued(&self, expr: &Expr<'_>) -> bool {
        self.type_of(expr).is_void()
    }

    pub(crate) fn is_early_exit(&self, expr: &Expr<'_>) -> bool {
        self.ctx.early_exits.is_early_exit(expr)
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Emit `expr` as the body of a function returning `expected_return` and
    /// declaring `declared_exceptions`.
    ///
    /// The value is returned unless the function returns `void` or `expr`
    /// exits early. Checked exceptions `declared_exceptions` does not cover
    /// are caught and rethrown unchecked through the configured helper.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
        expected_return: Option<&TypeRef>,
        declared_exceptions: &[TypeRef],
    ) -> Result<()> {
        sink.traced(expr, true, |sink| {
            let void_expected = expected_return.is_some_and(TypeRef::is_void);
            let wrap = self.needs_sneaky_throw(expr, declared_exceptions);
            self.function_body(expr, sink, expected_return, void_expected, wrap)
        })
    }

    /// Emit `expr` as one inline expression.
    ///
    /// When that is impossible (the value needs statements first, the node
    /// exits early, or it throws undeclared checked exceptions) the body is
    /// wrapped in a zero-argument function literal that is applied at once.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_as_expression(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
        expected: Option<&TypeRef>,
    ) -> Result<()> {
        sink.traced(expr, true, |sink| {
            let void_expected = expected.is_some_and(TypeRef::is_void);
            let early_exit = self.is_early_exit(expr);
            let wrap = self.needs_sneaky_throw(expr, &[]);
            if !early_exit && !wrap && self.can_compile_to_expression(expr, sink) {
                return self.to_expression(expr, sink);
            }

            debug!(expr = ?expr.id, early_exit, wrap, "wrapping in a function literal");
            sink.with_scope(|sink| {
                alias_enclosing_instances(sink);
                let config = self.ctx.config;
                let (callable, result) = if void_expected {
                    (TypeRef::class(&config.procedure_type), "void".to_string())
                } else {
                    let result = self.function_result_type(expr, expected);
                    (
                        TypeRef::generic(&config.function_type, vec![result.clone()]),
                        serialize(&result, false),
                    )
                };
                sink.append("new ")
                    .append(&serialize(&callable, false))
                    .append("() {")
                    .increase_indentation();
                sink.new_line()
                    .append("public ")
                    .append(&result)
                    .append(" apply() {")
                    .increase_indentation();
                self.function_body(expr, sink, expected, void_expected, wrap)?;
                sink.decrease_indentation().new_line().append("}");
                sink.decrease_indentation().new_line().append("}.apply()");
                Ok(())
            })
        })
    }

    /// Emit the children of `block` directly, without braces or a scope of
    /// their own, returning the last one unless it is void or exits early.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_block(
        &self,
        block: &Expr<'_>,
        sink: &mut TreeAppendable,
        expected_return: Option<&TypeRef>,
    ) -> Result<()> {
        let Some(body) = block.as_block() else {
            return Err(CompilationError::InvalidOperation {
                message: format!("expected a block expression, found {}", block.kind_name()),
                span: block.span,
            });
        };
        let void_expected = expected_return.is_some_and(TypeRef::is_void);
        let Some((last, statements)) = body.exprs.split_last() else {
            return Ok(());
        };
        for statement in statements {
            self.to_statement(statement, sink, false)?;
        }
        let implicit_return =
            !void_expected && !self.is_void_valued(last) && !self.is_early_exit(last);
        self.to_statement(last, sink, implicit_return)?;
        if implicit_return {
            sink.new_line().append("return (");
            self.to_converted_expression(last, sink, expected_return)?;
            sink.append(");");
        }
        Ok(())
    }

    /// Steps shared by function bodies and function literals: optional
    /// `try`, the statement form, the trailing `return`, the rethrowing
    /// `catch`.
    fn function_body(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
        expected: Option<&TypeRef>,
        void_expected: bool,
        wrap: bool,
    ) -> Result<()> {
        let void_valued = self.is_void_valued(expr);
        let early_exit = self.is_early_exit(expr);
        if wrap {
            sink.new_line().append("try {").increase_indentation();
        }
        self.to_statement(expr, sink, !void_expected && !void_valued && !early_exit)?;
        if !void_expected && !early_exit {
            sink.new_line().append("return ");
            if void_valued {
                append_default_literal(sink, expected);
            } else {
                self.to_expression(expr, sink)?;
            }
            sink.append(";");
        }
        if wrap {
            self.generate_checked_exception_handling(sink);
        }
        Ok(())
    }

    /// Boxed result type of a function literal wrapping `expr`.
    fn function_result_type(&self, expr: &Expr<'_>, expected: Option<&TypeRef>) -> TypeRef {
        let ty = expected.cloned().unwrap_or_else(|| self.type_of(expr));
        if ty.is_void() || ty.is_any() {
            TypeRef::object()
        } else {
            ty.wrapper_if_primitive()
        }
    }

    // ========================================================================
    // Exceptions
    // ========================================================================

    /// Whether `expr` throws checked exceptions `declared` does not cover.
    pub fn needs_sneaky_throw(&self, expr: &Expr<'_>, declared: &[TypeRef]) -> bool {
        let thrown = self.ctx.types.thrown_exception_types(expr);
        !thrown.is_empty()
            && !self
                .ctx
                .exceptions
                .find_unhandled_exceptions(expr, &thrown, declared)
                .is_empty()
    }

    /// Close an open `try` with a clause rethrowing through the helper.
    ///
    /// A helper unknown to the type oracle leaves a diagnostic in the output
    /// instead of failing.
    pub fn generate_checked_exception_handling(&self, sink: &mut TreeAppendable) {
        let config = self.ctx.config;
        let key = sink.fresh_key();
        let name = sink.declare_synthetic_variable(key, &config.catch_variable);
        sink.decrease_indentation()
            .new_line()
            .append("} catch (Exception ")
            .append(&name)
            .append(") {")
            .increase_indentation();
        match self.ctx.type_oracle.find_declared_type(&config.rethrow_helper) {
            Some(helper) => {
                sink.new_line()
                    .append("throw ")
                    .append(&serialize(&helper, false))
                    .append(".sneakyThrow(")
                    .append(&name)
                    .append(");");
            }
            None => {
                warn!(helper = %config.rethrow_helper, "rethrow helper not found");
                sink.append(&format!(
                    "COMPILE ERROR : '{}' could not be found on the classpath!",
                    config.rethrow_helper.replace('$', ".")
                ));
            }
        }
        sink.decrease_indentation().new_line().append("}");
    }

    // ========================================================================
    // Inline-ability
    // ========================================================================

    /// Whether `expr` can be emitted inline: it already has a name, or
    /// neither it nor any unnamed sub-expression needs hoisting.
    pub fn can_compile_to_expression(&self, expr: &Expr<'_>, sink: &TreeAppendable) -> bool {
        if sink.has_expr_name(expr) {
            return true;
        }
        if self.is_variable_declaration_required(expr, sink) {
            return false;
        }
        expr.descendants().all(|sub| {
            sink.has_expr_name(sub) || !self.is_variable_declaration_required(sub, sink)
        })
    }

    /// Whether the value of `expr` must be bound to a local before use.
    ///
    /// Anything that may have side effects needs one; literals, reads of
    /// locals, parameters, fields and `this`, operator applications and
    /// casts do not.
    pub fn is_variable_declaration_required(&self, expr: &Expr<'_>, sink: &TreeAppendable) -> bool {
        match expr.kind {
            ExprKind::Literal(_) | ExprKind::Cast(_) => false,
            ExprKind::FeatureCall(call) => call.feature.is_invocation(),
            ExprKind::Block(block) => match block.exprs {
                [only] => self.is_variable_declaration_required(only, sink),
                _ => true,
            },
            _ => true,
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Emit the statement form of `expr`. `is_referenced` tells whether its
    /// value is used afterwards.
    pub fn to_statement(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
        is_referenced: bool,
    ) -> Result<()> {
        sink.traced(expr, true, |sink| match expr.kind {
            ExprKind::Block(block) => block::to_statement(self, expr, &block, sink, is_referenced),
            ExprKind::VarDecl(decl) => var_decl::to_statement(self, expr, decl, sink),
            ExprKind::FeatureCall(call) => {
                feature_call::to_statement(self, expr, call, sink, is_referenced)
            }
            ExprKind::ConstructorCall(ctor) => {
                constructor_call::to_statement(self, expr, ctor, sink, is_referenced)
            }
            ExprKind::Literal(_) => Ok(()),
            ExprKind::If(if_expr) => control::if_statement(self, expr, if_expr, sink, is_referenced),
            ExprKind::Return(ret) => control::return_statement(self, &ret, sink),
            ExprKind::Throw(throw) => control::throw_statement(self, &throw, sink),
            ExprKind::Cast(cast) => self.to_statement(cast.expr, sink, true),
            ExprKind::Assign(assign) => assign::to_statement(self, assign, sink),
            ExprKind::Extension(ext) => Err(CompilationError::unsupported(ext.kind_name, expr.span)),
        })
    }

    /// Emit the expression form of `expr`, or the name it was hoisted into.
    pub fn to_expression(&self, expr: &Expr<'_>, sink: &mut TreeAppendable) -> Result<()> {
        if let Some(name) = sink.get_name(&NameKey::Expr(expr.id)).map(str::to_string) {
            sink.append(&name);
            return Ok(());
        }
        sink.traced(expr, true, |sink| match expr.kind {
            ExprKind::Block(block) => match block.exprs {
                [only] => self.to_expression(only, sink),
                _ => Err(no_value(expr)),
            },
            ExprKind::FeatureCall(call) => feature_call::to_expression(self, expr, call, sink),
            ExprKind::ConstructorCall(ctor) => constructor_call::to_expression(self, ctor, sink),
            ExprKind::Literal(lit) => {
                sink.append(&literal::to_source(&lit));
                Ok(())
            }
            ExprKind::Cast(cast) => cast::to_expression(self, cast, sink),
            ExprKind::Assign(assign) => assign::to_expression(self, assign, sink),
            ExprKind::VarDecl(_) | ExprKind::If(_) | ExprKind::Return(_) | ExprKind::Throw(_) => {
                Err(no_value(expr))
            }
            ExprKind::Extension(ext) => Err(CompilationError::unsupported(ext.kind_name, expr.span)),
        })
    }

    /// Expression form of `expr`, unboxed when `target` is primitive and
    /// `expr` has the matching wrapper type.
    pub fn to_converted_expression(
        &self,
        expr: &Expr<'_>,
        sink: &mut TreeAppendable,
        target: Option<&TypeRef>,
    ) -> Result<()> {
        self.to_expression(expr, sink)?;
        let wants_primitive = target.is_some_and(TypeRef::is_primitive);
        if wants_primitive && let Some(kind) = self.type_of(expr).unboxed() {
            sink.append(".").append(kind.name()).append("Value()");
        }
        Ok(())
    }
}

fn no_value(expr: &Expr<'_>) -> CompilationError {
    CompilationError::InvalidOperation {
        message: format!("{} cannot be used as a value here", expr.kind_name()),
        span: expr.span,
    }
}

/// Make `this` and `super` of the enclosing instance reachable from inside a
/// function literal.
fn alias_enclosing_instances(sink: &mut TreeAppendable) {
    let Some(this_type) = sink.get_object("this").cloned() else {
        return;
    };
    let simple = this_type.simple_name();
    sink.declare_variable(NameKey::Type(this_type.type_hash()), format!("{simple}.this"));
    if let Some(super_type) = sink.get_object("super").cloned() {
        sink.declare_variable(
            NameKey::Type(super_type.type_hash()),
            format!("{simple}.super"),
        );
    }
}

/// Literal for a value of `ty` that was never computed: `false`, `0`, or
/// `null` for everything else.
pub fn append_default_literal(sink: &mut TreeAppendable, ty: Option<&TypeRef>) {
    let literal = ty
        .and_then(TypeRef::primitive_kind)
        .and_then(PrimitiveKind::default_literal)
        .unwrap_or("null");
    sink.append(literal);
}
