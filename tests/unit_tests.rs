//! End-to-end tests: trees built with `AstBuilder`, typed against the
//! preloaded registry and lowered through the public entry points.

use exprlower::prelude::*;
use exprlower_compiler::expr::{ExprCompiler, NamingSubject};
use exprlower_compiler::inference::{ConformanceHint, FeatureScopeSession, StateArena};
use exprlower_compiler::keywords::make_identifier;
use exprlower_compiler::{
    CheckedExceptions, CompilationContext, InferredTypeProvider, SimpleNameProvider,
    StructuralEarlyExit, TypeResolver,
};

const PERSON: &str = "a.Person";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn method(ret: TypeRef) -> MethodSignature {
    MethodSignature::new(ret).with_this(TypeRef::class(PERSON))
}

fn call<'ast>(b: &AstBuilder<'ast>, name: &'ast str, ret: TypeExpr<'ast>) -> &'ast Expr<'ast> {
    b.call(Feature::method(name, ret), Some(b.this()), &[])
}

fn io_call<'ast>(b: &AstBuilder<'ast>) -> &'ast Expr<'ast> {
    let throws = b.types(&[TypeExpr::named("java.io.IOException")]);
    let size = Feature::static_method(TypeExpr::named("a.Files"), "size", TypeExpr::int())
        .with_throws(throws);
    b.call(size, None, &[])
}

// ============================================================================
// Returns
// ============================================================================

#[test]
fn void_value_under_void_expectation_has_no_return() {
    init_tracing();
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = call(&b, "save", TypeExpr::void());
    let registry = TypeRegistry::with_java_lang();

    let lowered = exprlower::lower_method(body, &method(TypeRef::void()), &registry).unwrap();
    assert_eq!(lowered.source, "\nthis.save();");
    assert!(!lowered.source.contains("return"));
}

#[test]
fn void_value_under_int_returns_default() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = call(&b, "save", TypeExpr::void());
    let registry = TypeRegistry::with_java_lang();

    let lowered = exprlower::lower_method(body, &method(TypeRef::int()), &registry).unwrap();
    assert_eq!(lowered.source, "\nthis.save();\nreturn 0;");

    let lowered = exprlower::lower_method(body, &method(TypeRef::boolean()), &registry).unwrap();
    assert_eq!(lowered.source, "\nthis.save();\nreturn false;");

    let lowered = exprlower::lower_method(body, &method(TypeRef::string()), &registry).unwrap();
    assert_eq!(lowered.source, "\nthis.save();\nreturn null;");
}

#[test]
fn early_exit_has_no_trailing_return() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let flag = b.param("flag", TypeExpr::boolean());
    let fail = b.throw(b.new_instance(
        TypeExpr::named("java.lang.IllegalStateException"),
        &[],
        &[],
    ));
    let body = b.if_(flag, b.ret(Some(b.int(1))), Some(fail));
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int()).with_param("flag", TypeRef::boolean());

    let lowered = exprlower::lower_method(body, &signature, &registry).unwrap();
    assert_eq!(
        lowered.source,
        "\nif (flag) {\n  return 1;\n} else {\n  java.lang.IllegalStateException _illegalStateException = new java.lang.IllegalStateException();\n  throw _illegalStateException;\n}"
    );
}

#[test]
fn block_scenario_returns_last_child() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let a = call(&b, "a", TypeExpr::void());
    let bb = call(&b, "b", TypeExpr::void());
    let c = b.param("c", TypeExpr::int());
    let body = b.block(&[a, bb, c]);
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int()).with_param("c", TypeRef::int());

    let lowered = exprlower::lower_lambda(body, &signature, &registry).unwrap();
    assert_eq!(lowered.source, "\nthis.a();\nthis.b();\nreturn (c);");
    assert_eq!(lowered.source.matches("return").count(), 1);
    assert!(lowered.source.ends_with("return (c);"));
}

#[test]
fn pure_last_child_is_returned_exactly_once() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let x = b.param("x", TypeExpr::int());
    let sum = b.binary("operator_plus", "+", TypeExpr::int(), x, b.int(2));
    let body = b.block(&[call(&b, "log", TypeExpr::void()), sum]);
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int()).with_param("x", TypeRef::int());

    let lowered = exprlower::lower_lambda(body, &signature, &registry).unwrap();
    assert_eq!(lowered.source.matches("return").count(), 1);
    assert!(lowered.source.ends_with("\nreturn ((x + 2));"));
}

// ============================================================================
// Checked exceptions
// ============================================================================

#[test]
fn checked_throw_in_expression_position_is_wrapped() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = io_call(&b);
    let registry = TypeRegistry::with_java_lang();

    let lowered = exprlower::lower_expression(body, Some(&TypeRef::int()), &registry).unwrap();
    assert_eq!(
        lowered.source,
        "new exprlower.lib.Functions.Function0<java.lang.Integer>() {\n  public java.lang.Integer apply() {\n    try {\n      int _size = a.Files.size();\n      return _size;\n    } catch (Exception _e) {\n      throw exprlower.lib.Exceptions.sneakyThrow(_e);\n    }\n  }\n}.apply()"
    );
}

#[test]
fn catch_variable_avoids_taken_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = io_call(&b);
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int()).with_param("_e", TypeRef::string());

    let lowered = exprlower::lower_method(body, &signature, &registry).unwrap();
    assert!(lowered.source.contains("} catch (Exception _e_1) {"));
    assert!(lowered.source.contains("sneakyThrow(_e_1);"));
}

#[test]
fn declared_exception_needs_no_wrapping() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = io_call(&b);
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int()).with_exception(TypeRef::class("java.io.IOException"));

    let lowered = exprlower::lower_method(body, &signature, &registry).unwrap();
    assert_eq!(lowered.source, "\nint _size = a.Files.size();\nreturn _size;");
}

#[test]
fn unchecked_exception_needs_no_wrapping() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = b.throw(b.new_instance(
        TypeExpr::named("java.lang.IllegalArgumentException"),
        &[b.string("bad")],
        &[],
    ));
    let registry = TypeRegistry::with_java_lang();

    let lowered = exprlower::lower_method(body, &method(TypeRef::void()), &registry).unwrap();
    assert_eq!(
        lowered.source,
        "\njava.lang.IllegalArgumentException _illegalArgumentException = new java.lang.IllegalArgumentException(\"bad\");\nthrow _illegalArgumentException;"
    );
}

#[test]
fn missing_helper_is_reported_inline() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = io_call(&b);
    let registry = TypeRegistry::with_java_lang();
    let compiler = Compiler::new(
        &registry,
        CompilerConfig::default().with_rethrow_helper("org.acme.Sneaky$Inner"),
    );

    let mut out = compiler.new_appendable();
    compiler
        .compile_method_body(body, &method(TypeRef::int()), &mut out)
        .unwrap();
    assert!(out.content().contains(
        "catch (Exception _e) {COMPILE ERROR : 'org.acme.Sneaky.Inner' could not be found on the classpath!"
    ));
    assert!(!out.content().contains("sneakyThrow"));
}

// ============================================================================
// Inline-ability and naming
// ============================================================================

/// Run `f` against a compiler for `root` typed as a method of `PERSON`.
fn with_compiler<'ast>(
    root: &'ast Expr<'ast>,
    registry: &TypeRegistry,
    f: impl FnOnce(&ExprCompiler<'_>, &mut TreeAppendable),
) {
    let session = FeatureScopeSession::new().with_this(TypeRef::class(PERSON));
    let snapshot = TypeResolver::new(registry)
        .infer(root, &TypeExpectation::none(), session)
        .unwrap();
    let types = InferredTypeProvider::new(&snapshot);
    let exceptions = CheckedExceptions::new(registry);
    let config = CompilerConfig::default();
    let ctx = CompilationContext::new(
        &types,
        &StructuralEarlyExit,
        &exceptions,
        registry,
        &SimpleNameProvider,
        &config,
    );
    let mut out = TreeAppendable::default();
    f(&ExprCompiler::new(ctx), &mut out);
}

#[test]
fn naming_sub_expressions_keeps_expressions_inline() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let size = call(&b, "size", TypeExpr::int());
    let x = b.param("x", TypeExpr::int());
    let sum = b.binary("operator_plus", "+", TypeExpr::int(), x, size);
    let registry = TypeRegistry::with_java_lang();

    with_compiler(sum, &registry, |compiler, out| {
        assert!(!compiler.can_compile_to_expression(sum, out));
        out.declare_variable(NameKey::Expr(size.id), "_size");
        assert!(compiler.can_compile_to_expression(sum, out));
        out.declare_variable(NameKey::Expr(x.id), "x");
        assert!(compiler.can_compile_to_expression(sum, out));
        compiler.to_expression(sum, out).unwrap();
        assert_eq!(out.content(), "(x + _size)");
    });
}

#[test]
fn naming_is_idempotent() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let get = call(&b, "getFirstName", TypeExpr::string());
    let decl = b.val("default", None, get);
    let body = b.block(&[decl, b.local(decl)]);
    let registry = TypeRegistry::with_java_lang();

    with_compiler(body, &registry, |compiler, _| {
        for subject in [
            NamingSubject::Expr(get),
            NamingSubject::Expr(decl),
            NamingSubject::Expr(body),
            NamingSubject::Type(&TypeRef::class("java.util.HashMap$Entry")),
            NamingSubject::Parameter("switch"),
        ] {
            let first = make_identifier(&compiler.favorite_variable_name(subject));
            let second = make_identifier(&compiler.favorite_variable_name(subject));
            assert_eq!(first, second);
            assert_eq!(make_identifier(&first), first);
        }
        assert_eq!(
            compiler.favorite_variable_name(NamingSubject::Expr(get)),
            "_firstName"
        );
        assert_eq!(make_identifier("default"), "default_");
        assert_eq!(
            compiler.favorite_variable_name(NamingSubject::Type(&TypeRef::class(
                "java.util.HashMap$Entry"
            ))),
            "_entry"
        );
    });
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn accessor_prefixes_are_dropped_from_proposed_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let registry = TypeRegistry::with_java_lang();

    let body = call(&b, "toString", TypeExpr::string());
    let lowered = exprlower::lower_method(body, &method(TypeRef::string()), &registry).unwrap();
    assert_eq!(
        lowered.source,
        "\njava.lang.String _string = this.toString();\nreturn _string;"
    );

    let body = call(&b, "getter", TypeExpr::int());
    let lowered = exprlower::lower_method(body, &method(TypeRef::int()), &registry).unwrap();
    assert_eq!(lowered.source, "\nint _ter = this.getter();\nreturn _ter;");
}

#[test]
fn null_initializer_takes_declared_or_object_type() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let untyped = b.var("a", None, Some(b.null()));
    let typed = b.val("s", Some(TypeExpr::string()), b.null());
    let body = b.block(&[untyped, typed, b.local(typed)]);
    let registry = TypeRegistry::with_java_lang();

    let lowered = exprlower::lower_lambda(body, &method(TypeRef::string()), &registry).unwrap();
    assert_eq!(
        lowered.source,
        "\njava.lang.Object a = null;\nfinal java.lang.String s = null;\nreturn (s);"
    );
}

#[test]
fn nested_blocks_reuse_released_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let first = b.if_(
        b.param("flag", TypeExpr::boolean()),
        b.block(&[b.val("tmp", None, b.int(1)), call(&b, "a", TypeExpr::void())]),
        Some(b.block(&[b.val("tmp", None, b.int(2)), call(&b, "b", TypeExpr::void())])),
    );
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::void()).with_param("flag", TypeRef::boolean());

    let lowered = exprlower::lower_method(first, &signature, &registry).unwrap();
    assert_eq!(lowered.source.matches("final int tmp = ").count(), 2);
    assert!(!lowered.source.contains("tmp_1"));
}

// ============================================================================
// Inference
// ============================================================================

#[test]
fn exact_resolutions_conflict() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let (one, two) = (b.int(1), b.long(2));
    let root = b.block(&[one, two]);
    let registry = TypeRegistry::with_java_lang();
    let mut states = StateArena::new(&registry);
    let expectation = TypeExpectation::exact(TypeRef::int());

    let top = states.root(root, FeatureScopeSession::new()).unwrap();
    let child = states.child(top, one).unwrap();
    states
        .accept_type(child, &expectation, TypeRef::int(), ConformanceHint::Exact, false)
        .unwrap();
    states.discard(child).unwrap();

    let child = states.child(top, two).unwrap();
    let long = TypeRef::primitive(PrimitiveKind::Long);
    let err = states
        .accept_type(child, &expectation, long, ConformanceHint::Exact, false)
        .unwrap_err();
    assert!(err.is_inference_conflict());
}

#[test]
fn subtype_resolutions_widen_and_forward() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let (one, two) = (b.int(1), b.long(2));
    let root = b.block(&[one, two]);
    let registry = TypeRegistry::with_java_lang();
    let mut states = StateArena::new(&registry);
    let expectation = TypeExpectation::none();

    let top = states.root(root, FeatureScopeSession::new()).unwrap();
    for (expr, ty) in [(one, TypeRef::int()), (two, TypeRef::primitive(PrimitiveKind::Long))] {
        let child = states.child(top, expr).unwrap();
        states
            .accept_type(child, &expectation, ty, ConformanceHint::Subtype, false)
            .unwrap();
        states.discard(child).unwrap();
    }
    assert_eq!(
        states.table().actual_type(root.id),
        Some(&TypeRef::primitive(PrimitiveKind::Long))
    );
    assert_eq!(states.table().actual_type(one.id), Some(&TypeRef::int()));

    states.discard(top).unwrap();
    let snapshot = states.finish().unwrap();
    assert_eq!(snapshot.len(), 3);
}

#[test]
fn children_are_sequential() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let (one, two) = (b.int(1), b.int(2));
    let root = b.block(&[one, two]);
    let registry = TypeRegistry::with_java_lang();
    let mut states = StateArena::new(&registry);

    let top = states.root(root, FeatureScopeSession::new()).unwrap();
    let _first = states.child(top, one).unwrap();
    let err = states.child(top, two).unwrap_err();
    assert!(matches!(err, CompilationError::Internal { .. }));
}

#[test]
fn if_type_is_the_merged_branch_type() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let then = b.new_instance(TypeExpr::named("java.util.ArrayList"), &[], &[]);
    let other = b.string("none");
    let body = b.if_(b.boolean(true), then, Some(other));
    let registry = TypeRegistry::with_java_lang();

    let types = TypeResolver::new(&registry)
        .infer(body, &TypeExpectation::none(), FeatureScopeSession::new())
        .unwrap();
    assert_eq!(types.actual_type(body.id), Some(&TypeRef::object()));
    assert_eq!(types.actual_type(other.id), Some(&TypeRef::string()));
}

#[test]
fn mismatch_is_reported_with_location() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    b.set_span(Span::new(3, 9, 4));
    let body = b.string("text");
    let registry = TypeRegistry::with_java_lang();

    let err = exprlower::lower_method(body, &method(TypeRef::int()), &registry).unwrap_err();
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));
    assert_eq!(err.span(), Span::new(3, 9, 4));
    assert!(err.to_string().starts_with("at 3:9"));
}

#[test]
fn extension_kinds_are_unsupported() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = b.extension("SynchronizedExpression", &[b.int(1)]);
    let registry = TypeRegistry::with_java_lang();

    let err = exprlower::lower_method(body, &method(TypeRef::int()), &registry).unwrap_err();
    assert!(
        err.to_string()
            .contains("couldn't find a compilation strategy for expressions of type SynchronizedExpression")
    );
}

// ============================================================================
// Scopes and sharing
// ============================================================================

#[test]
fn this_is_aliased_inside_function_literals() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let name = call(&b, "getName", TypeExpr::string());
    let registry = TypeRegistry::with_java_lang();
    let compiler = Compiler::new(&registry, CompilerConfig::default());

    let mut out = compiler.new_appendable();
    out.set_object("this", TypeRef::class("a.Outer$Person"));
    out.set_object("super", TypeRef::class("a.Base"));
    compiler
        .compile_expression(name, Some(&TypeRef::string()), &mut out)
        .unwrap();
    assert!(out.content().contains("java.lang.String _name = Person.this.getName();"));
    assert_eq!(out.scope_depth(), 1);
    assert!(!out.has_name(&NameKey::Type(TypeRef::class("a.Outer$Person").type_hash())));
}

#[test]
fn super_is_aliased_inside_function_literals() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let hash = b.call(
        Feature::method("hashCode", TypeExpr::int()),
        Some(b.super_()),
        &[],
    );
    let registry = TypeRegistry::with_java_lang();
    let compiler = Compiler::new(&registry, CompilerConfig::default());

    let mut out = compiler.new_appendable();
    out.set_object("this", TypeRef::class("a.Outer$Person"));
    out.set_object("super", TypeRef::class("a.Base"));
    compiler
        .compile_expression(hash, Some(&TypeRef::int()), &mut out)
        .unwrap();
    assert_eq!(
        out.content(),
        "new exprlower.lib.Functions.Function0<java.lang.Integer>() {\n  public java.lang.Integer apply() {\n    int _hashCode = Person.super.hashCode();\n    return _hashCode;\n  }\n}.apply()"
    );
    assert!(!out.has_name(&NameKey::Type(TypeRef::class("a.Base").type_hash())));
}

#[test]
fn signature_binds_super_in_method_bodies() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let hash = b.call(
        Feature::method("hashCode", TypeExpr::int()),
        Some(b.super_()),
        &[],
    );
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int()).with_super(TypeRef::class("a.Base"));

    let lowered = exprlower::lower_method(hash, &signature, &registry).unwrap();
    assert_eq!(lowered.source, "\nint _hashCode = super.hashCode();\nreturn _hashCode;");
    assert_eq!(lowered.types.actual_type(hash.id), Some(&TypeRef::int()));

    let err = exprlower::lower_method(hash, &method(TypeRef::int()), &registry).unwrap_err();
    assert!(matches!(err, CompilationError::UnresolvedFeature { .. }));
}

#[test]
fn failed_compilation_leaves_scopes_balanced() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = b.ret(Some(b.int(1)));
    let registry = TypeRegistry::with_java_lang();
    let compiler = Compiler::new(&registry, CompilerConfig::default());

    let mut out = compiler.new_appendable();
    out.set_object("this", TypeRef::class(PERSON));
    let sig = method(TypeRef::int());
    compiler.compile_method_body(body, &sig, &mut out).unwrap();
    assert_eq!(out.scope_depth(), 1);

    let stray = b.extension("Foreign", &[]);
    assert!(compiler.compile_method_body(stray, &sig, &mut out).is_err());
    assert_eq!(out.scope_depth(), 1);
}

#[test]
fn trees_are_shared_across_threads() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = b.block(&[call(&b, "a", TypeExpr::void()), b.int(5)]);
    let registry = TypeRegistry::with_java_lang();
    let signature = method(TypeRef::int());

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    exprlower::lower_lambda(body, &signature, &registry)
                        .map(|lowered| lowered.source)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });
    assert!(outputs.iter().all(|source| source == "\nthis.a();\nreturn (5);"));
}

#[test]
fn trace_regions_cover_lowered_nodes() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let name = call(&b, "getName", TypeExpr::string());
    let registry = TypeRegistry::with_java_lang();

    let lowered = exprlower::lower_method(name, &method(TypeRef::string()), &registry).unwrap();
    assert!(lowered.traces.iter().any(|region| region.expr == name.id));
    assert!(lowered.types.contains(name.id));
}
