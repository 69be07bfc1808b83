//! exprlower
//!
//! Lowers a statically-typed embedded expression language to source code of a
//! Java-like host language, inferring the type of every node on the way.
//!
//! Trees are built with [`AstBuilder`](prelude::AstBuilder) into a
//! [`Bump`] arena, typed against a [`TypeRegistry`](prelude::TypeRegistry)
//! and written into a [`TreeAppendable`](prelude::TreeAppendable).
//!
//! ```
//! use exprlower::prelude::*;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let body = b.block(&[b.string("ignored"), b.int(7)]);
//!
//! let registry = TypeRegistry::with_java_lang();
//! let lowered = exprlower::lower_lambda(body, &MethodSignature::new(TypeRef::int()), &registry)?;
//! assert_eq!(lowered.source, "\nreturn (7);");
//! # Ok::<(), CompilationError>(())
//! ```

pub use bumpalo::Bump;
pub use exprlower_ast as ast;
pub use exprlower_compiler as compiler;
pub use exprlower_core as types;

use exprlower_ast::Expr;
use exprlower_compiler::inference::ResolvedTypesSnapshot;
use exprlower_compiler::{Compiler, CompilerConfig, MethodSignature, TraceRegion, TypeOracle};
use exprlower_core::{Result, TypeRef};

pub mod prelude {
    pub use crate::{Lowered, lower_expression, lower_lambda, lower_method};
    pub use bumpalo::Bump;
    pub use exprlower_ast::{AstBuilder, Expr, ExprId, ExprKind, Feature, FeatureKind, TypeExpr};
    pub use exprlower_compiler::inference::{ResolvedTypesSnapshot, TypeExpectation};
    pub use exprlower_compiler::{
        ClassDecl, Compiler, CompilerConfig, MethodSignature, NameKey, TreeAppendable,
        TypeOracle, TypeRegistry,
    };
    pub use exprlower_core::{CompilationError, PrimitiveKind, Result, Span, TypeRef};
}

/// Generated source together with what inference learned about the tree.
#[derive(Debug)]
pub struct Lowered {
    pub source: String,
    pub types: ResolvedTypesSnapshot,
    /// Output regions per expression node
    pub traces: Vec<TraceRegion>,
}

/// Lower `body` as a method body with the default configuration.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn lower_method(
    body: &Expr<'_>,
    signature: &MethodSignature,
    oracle: &dyn TypeOracle,
) -> Result<Lowered> {
    let compiler = Compiler::new(oracle, CompilerConfig::default());
    let mut out = compiler.new_appendable();
    let types = compiler.compile_method_body(body, signature, &mut out)?;
    Ok(finish(out, types))
}

/// Lower `body` as a lambda body with the default configuration.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn lower_lambda(
    body: &Expr<'_>,
    signature: &MethodSignature,
    oracle: &dyn TypeOracle,
) -> Result<Lowered> {
    let compiler = Compiler::new(oracle, CompilerConfig::default());
    let mut out = compiler.new_appendable();
    let types = compiler.compile_lambda_body(body, signature, &mut out)?;
    Ok(finish(out, types))
}

/// Lower `expr` to a single host expression with the default configuration.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn lower_expression(
    expr: &Expr<'_>,
    expected: Option<&TypeRef>,
    oracle: &dyn TypeOracle,
) -> Result<Lowered> {
    let compiler = Compiler::new(oracle, CompilerConfig::default());
    let mut out = compiler.new_appendable();
    let types = compiler.compile_expression(expr, expected, &mut out)?;
    Ok(finish(out, types))
}

fn finish(out: exprlower_compiler::TreeAppendable, types: ResolvedTypesSnapshot) -> Lowered {
    let traces = out.trace_regions().to_vec();
    Lowered {
        source: out.into_content(),
        types,
        traces,
    }
}
