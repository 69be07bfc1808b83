//! Compiler - entry points that infer a tree and lower it in one call.

use exprlower_ast::Expr;
use exprlower_core::{Result, TypeRef};
use tracing::{debug, debug_span};

use crate::config::CompilerConfig;
use crate::context::CompilationContext;
use crate::expr::ExprCompiler;
use crate::inference::{FeatureScopeSession, ResolvedTypesSnapshot, TypeExpectation, TypeResolver};
use crate::keywords::make_identifier;
use crate::oracle::{
    CheckedExceptions, InferredTypeProvider, SimpleNameProvider, StructuralEarlyExit, TypeOracle,
};
use crate::output::{NameKey, TreeAppendable};

/// The function an expression tree is the body of.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub return_type: TypeRef,
    /// Parameter names and types, in order
    pub params: Vec<(String, TypeRef)>,
    pub declared_exceptions: Vec<TypeRef>,
    /// Enclosing instance type; `None` for static contexts
    pub this_type: Option<TypeRef>,
    /// Direct supertype of the enclosing instance
    pub super_type: Option<TypeRef>,
}

impl MethodSignature {
    pub fn new(return_type: TypeRef) -> Self {
        Self {
            return_type,
            params: Vec::new(),
            declared_exceptions: Vec::new(),
            this_type: None,
            super_type: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push((name.into(), ty));
        self
    }

    pub fn with_exception(mut self, ty: TypeRef) -> Self {
        self.declared_exceptions.push(ty);
        self
    }

    pub fn with_this(mut self, ty: TypeRef) -> Self {
        self.this_type = Some(ty);
        self
    }

    pub fn with_super(mut self, ty: TypeRef) -> Self {
        self.super_type = Some(ty);
        self
    }

    fn session(&self) -> FeatureScopeSession {
        let mut session = FeatureScopeSession::new()
            .with_return(TypeExpectation::returning(self.return_type.clone()));
        if let Some(this) = &self.this_type {
            session = session.with_this(this.clone());
        }
        if let Some(super_type) = &self.super_type {
            session = session.with_super(super_type.clone());
        }
        session
    }
}

/// Infers and lowers expression trees against one type oracle.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use exprlower_ast::AstBuilder;
/// use exprlower_compiler::{Compiler, CompilerConfig, MethodSignature, TypeRegistry};
/// use exprlower_core::TypeRef;
///
/// let arena = Bump::new();
/// let b = AstBuilder::new(&arena);
/// let body = b.int(42);
///
/// let registry = TypeRegistry::with_java_lang();
/// let compiler = Compiler::new(&registry, CompilerConfig::default());
/// let mut out = compiler.new_appendable();
/// compiler
///     .compile_method_body(body, &MethodSignature::new(TypeRef::int()), &mut out)
///     .unwrap();
/// assert_eq!(out.content(), "\nreturn 42;");
/// ```
pub struct Compiler<'o> {
    oracle: &'o dyn TypeOracle,
    config: CompilerConfig,
}

impl<'o> Compiler<'o> {
    pub fn new(oracle: &'o dyn TypeOracle, config: CompilerConfig) -> Self {
        Self { oracle, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// An empty sink indented as configured.
    pub fn new_appendable(&self) -> TreeAppendable {
        TreeAppendable::new(&self.config.indent)
    }

    /// Lower `body` as the complete body of a method.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_method_body(
        &self,
        body: &Expr<'_>,
        signature: &MethodSignature,
        sink: &mut TreeAppendable,
    ) -> Result<ResolvedTypesSnapshot> {
        let _span = debug_span!("compile_method_body", root = ?body.id).entered();
        let expectation = TypeExpectation::returning(signature.return_type.clone());
        self.run(body, &expectation, signature.session(), sink, |compiler, sink| {
            declare_signature(sink, signature);
            compiler.compile(
                body,
                sink,
                Some(&signature.return_type),
                &signature.declared_exceptions,
            )
        })
    }

    /// Lower `body` as the body of a lambda; a block body is emitted without
    /// its own braces, inside a rethrowing `try` when it throws undeclared
    /// checked exceptions.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_lambda_body(
        &self,
        body: &Expr<'_>,
        signature: &MethodSignature,
        sink: &mut TreeAppendable,
    ) -> Result<ResolvedTypesSnapshot> {
        let _span = debug_span!("compile_lambda_body", root = ?body.id).entered();
        let expectation = TypeExpectation::returning(signature.return_type.clone());
        self.run(body, &expectation, signature.session(), sink, |compiler, sink| {
            declare_signature(sink, signature);
            if body.is_block() {
                let wrap = compiler.needs_sneaky_throw(body, &signature.declared_exceptions);
                if wrap {
                    sink.new_line().append("try {").increase_indentation();
                }
                compiler.compile_block(body, sink, Some(&signature.return_type))?;
                if wrap {
                    compiler.generate_checked_exception_handling(sink);
                }
                Ok(())
            } else {
                compiler.compile(
                    body,
                    sink,
                    Some(&signature.return_type),
                    &signature.declared_exceptions,
                )
            }
        })
    }

    /// Lower `expr` to one inline expression at the sink's current position.
    ///
    /// The enclosing instance, if any, is taken from the sink's `"this"` and
    /// `"super"` objects.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_expression(
        &self,
        expr: &Expr<'_>,
        expected: Option<&TypeRef>,
        sink: &mut TreeAppendable,
    ) -> Result<ResolvedTypesSnapshot> {
        let _span = debug_span!("compile_expression", root = ?expr.id).entered();
        let expectation = expected.map_or_else(TypeExpectation::none, |ty| {
            TypeExpectation::convertible(ty.clone())
        });
        let mut session = FeatureScopeSession::new();
        if let Some(this) = sink.get_object("this") {
            session = session.with_this(this.clone());
        }
        if let Some(super_type) = sink.get_object("super") {
            session = session.with_super(super_type.clone());
        }
        self.run(expr, &expectation, session, sink, |compiler, sink| {
            compiler.compile_as_expression(expr, sink, expected)
        })
    }

    /// Infer `root`, then lower it in a fresh sink scope with the default
    /// collaborators.
    fn run(
        &self,
        root: &Expr<'_>,
        expectation: &TypeExpectation,
        session: FeatureScopeSession,
        sink: &mut TreeAppendable,
        emit: impl FnOnce(&ExprCompiler<'_>, &mut TreeAppendable) -> Result<()>,
    ) -> Result<ResolvedTypesSnapshot> {
        let snapshot = TypeResolver::new(self.oracle).infer(root, expectation, session)?;
        let types = InferredTypeProvider::new(&snapshot);
        let exceptions = CheckedExceptions::new(self.oracle);
        let ctx = CompilationContext::new(
            &types,
            &StructuralEarlyExit,
            &exceptions,
            self.oracle,
            &SimpleNameProvider,
            &self.config,
        );
        let compiler = ExprCompiler::new(ctx);
        sink.with_scope(|sink| emit(&compiler, sink))?;
        debug!(typed_nodes = snapshot.len(), "lowered");
        Ok(snapshot)
    }
}

/// Bind `this`, `super` and the parameters of `signature` in the current scope.
fn declare_signature(sink: &mut TreeAppendable, signature: &MethodSignature) {
    if let Some(this) = &signature.this_type {
        sink.set_object("this", this.clone());
        sink.declare_variable(NameKey::Type(this.type_hash()), "this");
    }
    if let Some(super_type) = &signature.super_type {
        sink.set_object("super", super_type.clone());
        sink.declare_variable(NameKey::Type(super_type.type_hash()), "super");
    }
    for (name, _) in &signature.params {
        sink.declare_variable(NameKey::Parameter(name.clone()), make_identifier(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use bumpalo::Bump;
    use exprlower_ast::{AstBuilder, Feature, TypeExpr};
    use exprlower_core::CompilationError;

    #[test]
    fn method_body_scope_is_closed() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = b.param("value", TypeExpr::int());
        let registry = TypeRegistry::with_java_lang();
        let compiler = Compiler::new(&registry, CompilerConfig::default());
        let signature = MethodSignature::new(TypeRef::int()).with_param("value", TypeRef::int());

        let mut out = compiler.new_appendable();
        let types = compiler.compile_method_body(body, &signature, &mut out).unwrap();
        assert_eq!(out.content(), "\nreturn value;");
        assert_eq!(out.scope_depth(), 1);
        assert!(!out.has_name(&NameKey::Parameter("value".into())));
        assert_eq!(types.actual_type(body.id), Some(&TypeRef::int()));
    }

    #[test]
    fn keyword_parameters_are_escaped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = b.param("new", TypeExpr::string());
        let registry = TypeRegistry::with_java_lang();
        let compiler = Compiler::new(&registry, CompilerConfig::default());
        let signature = MethodSignature::new(TypeRef::string()).with_param("new", TypeRef::string());

        let mut out = compiler.new_appendable();
        compiler.compile_method_body(body, &signature, &mut out).unwrap();
        assert_eq!(out.content(), "\nreturn new_;");
    }

    #[test]
    fn lambda_block_body_is_trimmed() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let foo = b.call(Feature::method("foo", TypeExpr::void()), Some(b.this()), &[]);
        let body = b.block(&[foo, b.boolean(true)]);
        let registry = TypeRegistry::with_java_lang();
        let compiler = Compiler::new(&registry, CompilerConfig::default());
        let signature =
            MethodSignature::new(TypeRef::boolean()).with_this(TypeRef::class("a.Person"));

        let mut out = compiler.new_appendable();
        compiler.compile_lambda_body(body, &signature, &mut out).unwrap();
        assert_eq!(out.content(), "\nthis.foo();\nreturn (true);");
    }

    #[test]
    fn lambda_block_body_rethrows_undeclared_checked_exceptions() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let throws = b.types(&[TypeExpr::named("java.io.IOException")]);
        let read = Feature::method("read", TypeExpr::void()).with_throws(throws);
        let body = b.block(&[b.call(read, Some(b.this()), &[]), b.int(1)]);
        let registry = TypeRegistry::with_java_lang();
        let compiler = Compiler::new(&registry, CompilerConfig::default());
        let signature = MethodSignature::new(TypeRef::int()).with_this(TypeRef::class("a.Reader"));

        let mut out = compiler.new_appendable();
        compiler.compile_lambda_body(body, &signature, &mut out).unwrap();
        assert_eq!(
            out.content(),
            "\ntry {\n  this.read();\n  return (1);\n} catch (Exception _e) {\n  throw exprlower.lib.Exceptions.sneakyThrow(_e);\n}"
        );
        assert_eq!(out.scope_depth(), 1);

        let declared = signature.with_exception(TypeRef::class("java.io.IOException"));
        let mut out = compiler.new_appendable();
        compiler.compile_lambda_body(body, &declared, &mut out).unwrap();
        assert_eq!(out.content(), "\nthis.read();\nreturn (1);");
    }

    #[test]
    fn expression_uses_enclosing_instance_of_sink() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let expr = b.call(Feature::method("size", TypeExpr::int()), Some(b.this()), &[]);
        let registry = TypeRegistry::with_java_lang();
        let compiler = Compiler::new(&registry, CompilerConfig::default().with_indent("\t"));

        let mut out = compiler.new_appendable();
        out.set_object("this", TypeRef::class("a.Bag"));
        compiler
            .compile_expression(expr, Some(&TypeRef::int()), &mut out)
            .unwrap();
        assert_eq!(
            out.content(),
            "new exprlower.lib.Functions.Function0<java.lang.Integer>() {\n\tpublic java.lang.Integer apply() {\n\t\tint _size = Bag.this.size();\n\t\treturn _size;\n\t}\n}.apply()"
        );
    }

    #[test]
    fn unbound_this_fails_inference() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let expr = b.this();
        let registry = TypeRegistry::with_java_lang();
        let compiler = Compiler::new(&registry, CompilerConfig::default());

        let mut out = compiler.new_appendable();
        let err = compiler.compile_expression(expr, None, &mut out).unwrap_err();
        assert!(matches!(err, CompilationError::UnresolvedFeature { .. }));
        assert_eq!(out.content(), "");
    }
}
