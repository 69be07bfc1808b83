//! Typing rules that drive the state tree.

use exprlower_ast::{
    AssignExpr, BlockExpr, Expr, ExprKind, FeatureCallExpr, FeatureKind, IfExpr, LiteralKind,
    TypeExpr, VarDeclExpr,
};
use exprlower_core::{CompilationError, PrimitiveKind, Result, Span, TypeRef};
use tracing::debug;

use super::{
    ConformanceHint, FeatureScopeSession, ResolvedTypesSnapshot, StateArena, StateId,
    TypeExpectation,
};
use crate::oracle::TypeOracle;
use crate::type_resolver::resolve_type;

/// Computes the type of every node of one expression tree.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use exprlower_ast::AstBuilder;
/// use exprlower_compiler::inference::{FeatureScopeSession, TypeExpectation, TypeResolver};
/// use exprlower_compiler::TypeRegistry;
/// use exprlower_core::TypeRef;
///
/// let arena = Bump::new();
/// let b = AstBuilder::new(&arena);
/// let last = b.int(3);
/// let body = b.block(&[b.string("a"), last]);
///
/// let registry = TypeRegistry::with_java_lang();
/// let types = TypeResolver::new(&registry)
///     .infer(body, &TypeExpectation::returning(TypeRef::int()), FeatureScopeSession::new())
///     .unwrap();
/// assert_eq!(types.actual_type(body.id), Some(&TypeRef::int()));
/// ```
pub struct TypeResolver<'o> {
    states: StateArena<'o>,
}

impl<'o> TypeResolver<'o> {
    pub fn new(oracle: &'o dyn TypeOracle) -> Self {
        Self {
            states: StateArena::new(oracle),
        }
    }

    /// Infer `expr` under `expectation` and seal the results.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn infer(
        mut self,
        expr: &Expr<'_>,
        expectation: &TypeExpectation,
        session: FeatureScopeSession,
    ) -> Result<ResolvedTypesSnapshot> {
        debug!(root = ?expr.id, %expectation, "inferring types");
        let root = self.states.root(expr, session)?;
        let result = self.compute(root, expr, expectation);
        self.close(root, result)?;
        self.states.finish()
    }

    fn compute(
        &mut self,
        state: StateId,
        expr: &Expr<'_>,
        expectation: &TypeExpectation,
    ) -> Result<TypeRef> {
        let ty = self.compute_kind(state, expr, expectation)?;
        let hint = classify(self.states.oracle(), expectation, &ty, expr.span)?;
        self.states
            .accept_type(state, expectation, ty, hint, expectation.is_return)
    }

    /// Discard `state` whether or not its computation succeeded.
    fn close(&mut self, state: StateId, result: Result<TypeRef>) -> Result<TypeRef> {
        let discarded = self.states.discard(state);
        let ty = result?;
        discarded?;
        Ok(ty)
    }

    /// Compute a child whose value becomes the value of `parent`.
    fn value(
        &mut self,
        parent: StateId,
        expr: &Expr<'_>,
        expectation: &TypeExpectation,
    ) -> Result<TypeRef> {
        let child = self.states.child(parent, expr)?;
        let result = self.compute(child, expr, expectation);
        self.close(child, result)
    }

    /// Compute an independent operand in the parent's current scope.
    fn operand(
        &mut self,
        parent: StateId,
        expr: &Expr<'_>,
        expectation: &TypeExpectation,
    ) -> Result<TypeRef> {
        let session = self.states.session(parent)?.clone();
        let nested = self.states.nested(parent, expr, session)?;
        let result = self.compute(nested, expr, expectation);
        self.close(nested, result)
    }

    fn compute_kind(
        &mut self,
        state: StateId,
        expr: &Expr<'_>,
        expectation: &TypeExpectation,
    ) -> Result<TypeRef> {
        match expr.kind {
            ExprKind::Literal(literal) => Ok(literal_type(&literal)),
            ExprKind::Block(block) => self.block(state, &block, expectation),
            ExprKind::VarDecl(decl) => self.var_decl(state, expr, decl),
            ExprKind::FeatureCall(call) => self.feature_call(state, expr, call),
            ExprKind::ConstructorCall(ctor) => {
                self.arguments(state, ctor.args, ctor.param_types)?;
                Ok(resolve_type(&ctor.class))
            }
            ExprKind::If(if_expr) => self.if_expr(state, expr, if_expr, expectation),
            ExprKind::Return(ret) => {
                if let Some(value) = ret.value {
                    let expected = self
                        .states
                        .session(state)?
                        .return_expectation()
                        .cloned()
                        .unwrap_or_default();
                    self.operand(state, value, &expected)?;
                }
                Ok(TypeRef::void())
            }
            ExprKind::Throw(throw) => {
                self.operand(state, throw.value, &TypeExpectation::none())?;
                Ok(TypeRef::void())
            }
            ExprKind::Cast(cast) => {
                self.operand(state, cast.expr, &TypeExpectation::none())?;
                Ok(resolve_type(&cast.target))
            }
            ExprKind::Assign(assign) => self.assign(state, expr, assign),
            ExprKind::Extension(ext) => Err(CompilationError::unsupported(ext.kind_name, expr.span)),
        }
    }

    fn block(
        &mut self,
        state: StateId,
        block: &BlockExpr<'_>,
        expectation: &TypeExpectation,
    ) -> Result<TypeRef> {
        let Some((last, statements)) = block.exprs.split_last() else {
            return Ok(TypeRef::void());
        };
        for statement in statements {
            self.operand(state, statement, &TypeExpectation::none())?;
        }
        self.value(state, last, expectation)
    }

    fn var_decl(&mut self, state: StateId, expr: &Expr<'_>, decl: &VarDeclExpr<'_>) -> Result<TypeRef> {
        let declared = decl.declared_type.as_ref().map(resolve_type);
        let local = match (decl.init, declared) {
            (Some(init), Some(declared)) => {
                self.operand(state, init, &TypeExpectation::convertible(declared.clone()))?;
                declared
            }
            (Some(init), None) => self.operand(state, init, &TypeExpectation::none())?,
            (None, Some(declared)) => declared,
            (None, None) => TypeRef::object(),
        };
        self.states.declare_local(state, expr.id, local)?;
        Ok(TypeRef::void())
    }

    fn feature_call(
        &mut self,
        state: StateId,
        expr: &Expr<'_>,
        call: &FeatureCallExpr<'_>,
    ) -> Result<TypeRef> {
        if let Some(receiver) = call.receiver {
            self.operand(state, receiver, &TypeExpectation::none())?;
        }
        self.arguments(state, call.args, call.feature.param_types)?;

        let feature = call.feature;
        let session = self.states.session(state)?;
        match feature.kind {
            FeatureKind::LocalVariable(decl) => session
                .local(decl)
                .cloned()
                .ok_or_else(|| unresolved("local variable", feature.name, expr.span)),
            FeatureKind::This => session
                .this_type()
                .cloned()
                .ok_or_else(|| unresolved("enclosing instance", feature.name, expr.span)),
            FeatureKind::Super => session
                .super_type()
                .cloned()
                .ok_or_else(|| unresolved("enclosing supertype", feature.name, expr.span)),
            FeatureKind::Method | FeatureKind::StaticMethod => {
                Ok(feature.ty.as_ref().map_or_else(TypeRef::void, resolve_type))
            }
            FeatureKind::Parameter | FeatureKind::Field | FeatureKind::Operator(_) => feature
                .ty
                .as_ref()
                .map(resolve_type)
                .ok_or_else(|| unresolved("value", feature.name, expr.span)),
        }
    }

    fn arguments(
        &mut self,
        state: StateId,
        args: &[&Expr<'_>],
        params: &[TypeExpr<'_>],
    ) -> Result<()> {
        for (i, arg) in args.iter().enumerate() {
            let expectation = params
                .get(i)
                .map(|param| TypeExpectation::convertible(resolve_type(param)))
                .unwrap_or_default();
            self.operand(state, arg, &expectation)?;
        }
        Ok(())
    }

    fn if_expr(
        &mut self,
        state: StateId,
        expr: &Expr<'_>,
        if_expr: &IfExpr<'_>,
        expectation: &TypeExpectation,
    ) -> Result<TypeRef> {
        self.operand(state, if_expr.cond, &TypeExpectation::convertible(TypeRef::boolean()))?;
        let then = self.value(state, if_expr.then, expectation)?;
        if let Some(other) = if_expr.else_ {
            self.value(state, other, expectation)?;
        }
        // both branches reported into this node's entry
        Ok(self
            .states
            .table()
            .resolution(expr.id, expectation)
            .map_or(then, |resolution| resolution.actual.clone()))
    }

    fn assign(&mut self, state: StateId, expr: &Expr<'_>, assign: &AssignExpr<'_>) -> Result<TypeRef> {
        let target = assign.target;
        let target_type = match target.kind {
            FeatureKind::LocalVariable(decl) => self.states.session(state)?.local(decl).cloned(),
            _ => target.ty.as_ref().map(resolve_type),
        }
        .ok_or_else(|| unresolved("assignment target", target.name, expr.span))?;

        if let Some(receiver) = assign.receiver {
            self.operand(state, receiver, &TypeExpectation::none())?;
        }
        self.operand(state, assign.value, &TypeExpectation::convertible(target_type))?;
        Ok(TypeRef::void())
    }
}

fn unresolved(what: &str, name: &str, span: Span) -> CompilationError {
    CompilationError::UnresolvedFeature {
        what: what.to_string(),
        name: name.to_string(),
        span,
    }
}

fn literal_type(literal: &LiteralKind<'_>) -> TypeRef {
    match literal {
        LiteralKind::Int(_) => TypeRef::int(),
        LiteralKind::Long(_) => TypeRef::primitive(PrimitiveKind::Long),
        LiteralKind::Double(_) => TypeRef::primitive(PrimitiveKind::Double),
        LiteralKind::Boolean(_) => TypeRef::boolean(),
        LiteralKind::Char(_) => TypeRef::primitive(PrimitiveKind::Char),
        LiteralKind::String(_) => TypeRef::string(),
        LiteralKind::Null => TypeRef::Any,
    }
}

/// The hint under which `actual` conforms to `expectation`.
pub fn classify(
    oracle: &dyn TypeOracle,
    expectation: &TypeExpectation,
    actual: &TypeRef,
    span: Span,
) -> Result<ConformanceHint> {
    let Some(expected) = expectation.expected_type() else {
        return Ok(ConformanceHint::Subtype);
    };
    if actual.is_void() || actual.is_any() || expected.is_type_parameter() || expected.is_any() {
        return Ok(ConformanceHint::Subtype);
    }
    let mismatch = || CompilationError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.to_string(),
        span,
    };
    match expectation.hint {
        ConformanceHint::Exact if actual == expected => Ok(ConformanceHint::Exact),
        ConformanceHint::Exact => Err(mismatch()),
        _ if oracle.is_subtype(actual, expected) => Ok(ConformanceHint::Subtype),
        ConformanceHint::ImplicitConversion if oracle.is_convertible(actual, expected) => {
            Ok(ConformanceHint::ImplicitConversion)
        }
        _ => Err(mismatch()),
    }
}
