//! Collaborator contracts of the expression compiler, and default
//! implementations backed by inference results.
//!
//! The compiler asks these questions and never answers them itself: what a
//! node's type is, whether it leaves its block unconditionally, which of its
//! exceptions are unhandled, how host types relate, and what a feature is
//! called.

use std::iter;

use exprlower_ast::{Expr, ExprKind, Feature};
use exprlower_core::TypeRef;

use crate::inference::ResolvedTypesSnapshot;
use crate::registry::{ERROR, RUNTIME_EXCEPTION};
use crate::type_resolver::resolve_types;

// ============================================================================
// Contracts
// ============================================================================

/// Types of expression nodes.
pub trait TypeProvider {
    /// The type of `expr`; [`TypeRef::Any`] when nothing is known.
    fn type_of(&self, expr: &Expr<'_>) -> TypeRef;

    /// The type the context of `expr` expected, if any.
    fn expected_type(&self, expr: &Expr<'_>) -> Option<TypeRef>;

    /// Exception types evaluating `expr` may throw, its sub-expressions included.
    fn thrown_exception_types(&self, expr: &Expr<'_>) -> Vec<TypeRef>;
}

pub trait EarlyExitOracle {
    /// Whether evaluating `expr` always transfers control out of the
    /// enclosing block.
    fn is_early_exit(&self, expr: &Expr<'_>) -> bool;
}

pub trait ExceptionOracle {
    /// The subset of `thrown` that neither the host treats as unchecked nor
    /// `declared` covers.
    fn find_unhandled_exceptions(
        &self,
        expr: &Expr<'_>,
        thrown: &[TypeRef],
        declared: &[TypeRef],
    ) -> Vec<TypeRef>;
}

/// Conformance between host types.
pub trait TypeOracle {
    /// Look up a class by qualified name.
    fn find_declared_type(&self, name: &str) -> Option<TypeRef>;

    /// Whether `sub` may be used where `sup` is expected without conversion.
    fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool;

    /// Whether the host converts `from` to `to` implicitly.
    fn is_convertible(&self, from: &TypeRef, to: &TypeRef) -> bool;

    /// The most specific type both `a` and `b` conform to.
    fn common_super_type(&self, a: &TypeRef, b: &TypeRef) -> TypeRef;
}

pub trait NameProvider {
    fn simple_name(&self, feature: &Feature<'_>) -> String;
}

// ============================================================================
// Defaults
// ============================================================================

/// Answers type questions from a finished inference run.
pub struct InferredTypeProvider<'s> {
    snapshot: &'s ResolvedTypesSnapshot,
}

impl<'s> InferredTypeProvider<'s> {
    pub fn new(snapshot: &'s ResolvedTypesSnapshot) -> Self {
        Self { snapshot }
    }
}

impl TypeProvider for InferredTypeProvider<'_> {
    fn type_of(&self, expr: &Expr<'_>) -> TypeRef {
        self.snapshot
            .actual_type(expr.id)
            .cloned()
            .unwrap_or(TypeRef::Any)
    }

    fn expected_type(&self, expr: &Expr<'_>) -> Option<TypeRef> {
        self.snapshot.expected_type(expr.id).cloned()
    }

    fn thrown_exception_types(&self, expr: &Expr<'_>) -> Vec<TypeRef> {
        let mut thrown: Vec<TypeRef> = Vec::new();
        for node in iter::once(expr).chain(expr.descendants()) {
            let types = match node.kind {
                ExprKind::FeatureCall(call) if call.feature.is_invocation() => {
                    resolve_types(call.feature.throws)
                }
                ExprKind::ConstructorCall(ctor) => resolve_types(ctor.throws),
                ExprKind::Throw(throw) => vec![self.type_of(throw.value)],
                _ => continue,
            };
            for ty in types {
                if !thrown.contains(&ty) {
                    thrown.push(ty);
                }
            }
        }
        thrown
    }
}

/// Early exits decided by tree shape: `return` and `throw`, blocks
/// containing one, and `if`s whose branches both exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEarlyExit;

impl EarlyExitOracle for StructuralEarlyExit {
    fn is_early_exit(&self, expr: &Expr<'_>) -> bool {
        match expr.kind {
            ExprKind::Return(_) | ExprKind::Throw(_) => true,
            ExprKind::Block(block) => block.exprs.iter().any(|e| self.is_early_exit(e)),
            ExprKind::If(if_expr) => if_expr
                .else_
                .is_some_and(|other| self.is_early_exit(if_expr.then) && self.is_early_exit(other)),
            _ => false,
        }
    }
}

/// The host's checked-exception rule: everything but `RuntimeException`,
/// `Error` and their subclasses must be declared.
pub struct CheckedExceptions<'o> {
    oracle: &'o dyn TypeOracle,
}

impl<'o> CheckedExceptions<'o> {
    pub fn new(oracle: &'o dyn TypeOracle) -> Self {
        Self { oracle }
    }
}

impl ExceptionOracle for CheckedExceptions<'_> {
    fn find_unhandled_exceptions(
        &self,
        _expr: &Expr<'_>,
        thrown: &[TypeRef],
        declared: &[TypeRef],
    ) -> Vec<TypeRef> {
        let unchecked = [TypeRef::class(RUNTIME_EXCEPTION), TypeRef::class(ERROR)];
        let mut unhandled = Vec::new();
        for ty in thrown {
            let covered = unchecked
                .iter()
                .chain(declared)
                .any(|handled| self.oracle.is_subtype(ty, handled));
            if !covered && !unhandled.contains(ty) {
                unhandled.push(ty.clone());
            }
        }
        unhandled
    }
}

/// Features are named as declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNameProvider;

impl NameProvider for SimpleNameProvider {
    fn simple_name(&self, feature: &Feature<'_>) -> String {
        feature.name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{FeatureScopeSession, TypeExpectation, TypeResolver};
    use crate::registry::TypeRegistry;
    use bumpalo::Bump;
    use exprlower_ast::{AstBuilder, TypeExpr};

    #[test]
    fn early_exits() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let oracle = StructuralEarlyExit;

        let ret = b.ret(None);
        assert!(oracle.is_early_exit(ret));
        assert!(oracle.is_early_exit(b.block(&[b.int(1), ret])));
        assert!(!oracle.is_early_exit(b.block(&[b.int(1)])));

        let both = b.if_(b.boolean(true), b.ret(None), Some(b.throw(b.null())));
        assert!(oracle.is_early_exit(both));
        let one = b.if_(b.boolean(true), b.ret(None), Some(b.int(0)));
        assert!(!oracle.is_early_exit(one));
        let no_else = b.if_(b.boolean(true), b.ret(None), None);
        assert!(!oracle.is_early_exit(no_else));
    }

    #[test]
    fn checked_exceptions_must_be_declared() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let expr = b.null();
        let registry = TypeRegistry::with_java_lang();
        let oracle = CheckedExceptions::new(&registry);

        let io = TypeRef::class("java.io.IOException");
        let fnf = TypeRef::class("java.io.FileNotFoundException");
        let ise = TypeRef::class("java.lang.IllegalStateException");
        let thrown = [fnf.clone(), ise, fnf.clone()];

        assert_eq!(oracle.find_unhandled_exceptions(expr, &thrown, &[]), vec![fnf]);
        assert!(oracle.find_unhandled_exceptions(expr, &thrown, &[io]).is_empty());
    }

    #[test]
    fn thrown_types_come_from_the_whole_subtree() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let throws = b.types(&[TypeExpr::named("java.io.IOException")]);
        let read = Feature::method("read", TypeExpr::int()).with_throws(throws);
        let call = b.call(read, Some(b.this()), &[]);
        let fail = b.throw(b.new_instance(TypeExpr::named("java.lang.Exception"), &[], &[]));
        let body = b.block(&[call, fail]);

        let registry = TypeRegistry::with_java_lang();
        let session = FeatureScopeSession::new().with_this(TypeRef::class("a.Reader"));
        let snapshot = TypeResolver::new(&registry)
            .infer(body, &TypeExpectation::none(), session)
            .unwrap();
        let provider = InferredTypeProvider::new(&snapshot);

        assert_eq!(
            provider.thrown_exception_types(body),
            vec![
                TypeRef::class("java.io.IOException"),
                TypeRef::class("java.lang.Exception")
            ]
        );
        assert_eq!(provider.type_of(call), TypeRef::int());
        assert_eq!(provider.type_of(b.int(0)), TypeRef::Any);
    }
}
