//! Registry of known host classes.
//!
//! [`TypeRegistry`] is the default [`TypeOracle`]: it knows classes by their
//! erased name, with a super class and interfaces, and answers conformance
//! questions by walking those edges. Type arguments are compared by equality
//! only; a raw reference conforms to any parameterization of the same class.

use exprlower_core::{PrimitiveKind, TypeHash, TypeRef, type_ref::OBJECT};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::CompilerConfig;
use crate::oracle::TypeOracle;

pub const THROWABLE: &str = "java.lang.Throwable";
pub const EXCEPTION: &str = "java.lang.Exception";
pub const RUNTIME_EXCEPTION: &str = "java.lang.RuntimeException";
pub const ERROR: &str = "java.lang.Error";

/// A class or interface known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Qualified name (`$` separates nested classes)
    pub name: String,
    /// Direct super class; `None` means `java.lang.Object`
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_class: None,
            interfaces: Vec::new(),
        }
    }

    pub fn extends(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }
}

/// Known host classes, keyed by the hash of their qualified name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: FxHashMap<TypeHash, ClassDecl>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the core runtime classes and the helper
    /// types named by the default [`CompilerConfig`].
    pub fn with_java_lang() -> Self {
        let mut registry = Self::new();
        registry.register(ClassDecl::new(OBJECT));
        registry.register(ClassDecl::new("java.lang.CharSequence"));
        registry.register(ClassDecl::new("java.lang.Comparable"));
        registry.register(ClassDecl::new("java.io.Serializable"));
        registry.register(
            ClassDecl::new("java.lang.String")
                .implements("java.lang.CharSequence")
                .implements("java.lang.Comparable")
                .implements("java.io.Serializable"),
        );
        registry.register(ClassDecl::new("java.lang.Number").implements("java.io.Serializable"));
        for kind in PrimitiveKind::VALUES {
            let wrapper = ClassDecl::new(kind.wrapper_name()).implements("java.lang.Comparable");
            let wrapper = if kind.is_numeric() && kind != PrimitiveKind::Char {
                wrapper.extends("java.lang.Number")
            } else {
                wrapper
            };
            registry.register(wrapper);
        }
        registry.register(ClassDecl::new(PrimitiveKind::Void.wrapper_name()));

        registry.register(ClassDecl::new(THROWABLE).implements("java.io.Serializable"));
        registry.register(ClassDecl::new(EXCEPTION).extends(THROWABLE));
        registry.register(ClassDecl::new(ERROR).extends(THROWABLE));
        registry.register(ClassDecl::new(RUNTIME_EXCEPTION).extends(EXCEPTION));
        for unchecked in [
            "java.lang.IllegalArgumentException",
            "java.lang.IllegalStateException",
            "java.lang.NullPointerException",
            "java.lang.UnsupportedOperationException",
        ] {
            registry.register(ClassDecl::new(unchecked).extends(RUNTIME_EXCEPTION));
        }
        registry.register(ClassDecl::new("java.io.IOException").extends(EXCEPTION));
        registry.register(ClassDecl::new("java.io.FileNotFoundException").extends("java.io.IOException"));
        registry.register(ClassDecl::new("java.lang.InterruptedException").extends(EXCEPTION));

        registry.register(ClassDecl::new("java.lang.Iterable"));
        registry.register(ClassDecl::new("java.util.Collection").implements("java.lang.Iterable"));
        registry.register(ClassDecl::new("java.util.List").implements("java.util.Collection"));
        registry.register(ClassDecl::new("java.util.ArrayList").implements("java.util.List"));

        let config = CompilerConfig::default();
        registry.register(ClassDecl::new(config.rethrow_helper));
        registry.register(ClassDecl::new(config.procedure_type));
        registry.register(ClassDecl::new(config.function_type));
        registry
    }

    /// Add or replace a class.
    pub fn register(&mut self, decl: ClassDecl) -> TypeHash {
        let hash = TypeHash::from_name(&decl.name);
        self.classes.insert(hash, decl);
        hash
    }

    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(&TypeHash::from_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Erased names of `name` and all its super types, nearest first.
    /// `java.lang.Object` comes last.
    fn supertypes(&self, name: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = std::collections::VecDeque::from([name.to_string()]);
        while let Some(current) = queue.pop_front() {
            if current == OBJECT || !seen.insert(current.clone()) {
                continue;
            }
            if let Some(decl) = self.get(&current) {
                queue.extend(decl.super_class.iter().cloned());
                queue.extend(decl.interfaces.iter().cloned());
            }
            order.push(current);
        }
        order.push(OBJECT.to_string());
        order
    }

    fn is_subclass(&self, sub: &str, sup: &str) -> bool {
        sup == OBJECT || self.supertypes(sub).iter().any(|name| name == sup)
    }
}

impl TypeOracle for TypeRegistry {
    fn find_declared_type(&self, name: &str) -> Option<TypeRef> {
        self.get(name).map(|decl| TypeRef::class(decl.name.clone()))
    }

    fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool {
        if sub == sup || sub.is_any() || sup.is_any() {
            return true;
        }
        match (sub, sup) {
            (TypeRef::Primitive(a), TypeRef::Primitive(b)) => {
                !a.is_void() && !b.is_void() && a.widens_to(*b)
            }
            (TypeRef::Primitive(_), _) | (_, TypeRef::Primitive(_)) => false,
            (_, TypeRef::Class { name, .. }) if name == OBJECT => true,
            (
                TypeRef::Class { name: a, args: a_args },
                TypeRef::Class { name: b, args: b_args },
            ) => {
                if a == b {
                    a_args.is_empty() || b_args.is_empty() || a_args == b_args
                } else {
                    self.is_subclass(a, b)
                }
            }
            (TypeRef::Array(a), TypeRef::Array(b)) => {
                if a.is_primitive() || b.is_primitive() {
                    a == b
                } else {
                    self.is_subtype(a, b)
                }
            }
            _ => false,
        }
    }

    fn is_convertible(&self, from: &TypeRef, to: &TypeRef) -> bool {
        if self.is_subtype(from, to) {
            return true;
        }
        match (from.primitive_kind(), to.primitive_kind()) {
            // boxing, then reference widening
            (Some(kind), None) if !kind.is_void() => {
                self.is_subtype(&TypeRef::class(kind.wrapper_name()), to)
            }
            // unboxing, then primitive widening
            (None, Some(target)) => from.unboxed().is_some_and(|kind| kind.widens_to(target)),
            _ => false,
        }
    }

    fn common_super_type(&self, a: &TypeRef, b: &TypeRef) -> TypeRef {
        if self.is_subtype(a, b) {
            return b.clone();
        }
        if self.is_subtype(b, a) {
            return a.clone();
        }
        if let (Some(x), Some(y)) = (a.primitive_kind(), b.primitive_kind())
            && x.is_numeric()
            && y.is_numeric()
        {
            let wider = [
                PrimitiveKind::Int,
                PrimitiveKind::Long,
                PrimitiveKind::Float,
                PrimitiveKind::Double,
            ]
            .into_iter()
            .find(|target| x.widens_to(*target) && y.widens_to(*target));
            if let Some(kind) = wider {
                return TypeRef::primitive(kind);
            }
        }
        if a.is_primitive() || b.is_primitive() {
            return self.common_super_type(&a.wrapper_if_primitive(), &b.wrapper_if_primitive());
        }
        match (a, b) {
            (TypeRef::Class { name: x, .. }, TypeRef::Class { name: y, .. }) => self
                .supertypes(x)
                .into_iter()
                .find(|candidate| self.is_subclass(y, candidate))
                .map(TypeRef::class)
                .unwrap_or_else(TypeRef::object),
            _ => TypeRef::object(),
        }
    }
}
