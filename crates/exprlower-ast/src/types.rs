//! Type syntax as written in the expression tree.
//!
//! These are unresolved: the compiler's type resolver turns them into
//! [`TypeRef`](exprlower_core::TypeRef) values.

use exprlower_core::PrimitiveKind;

/// A type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeExpr<'ast> {
    /// `int`, `boolean`, `void`, ...
    Primitive(PrimitiveKind),
    /// A class by qualified name, with type arguments.
    Named {
        name: &'ast str,
        args: &'ast [TypeExpr<'ast>],
    },
    /// `T[]`
    Array(&'ast TypeExpr<'ast>),
    /// A reference to a type parameter in scope.
    Param(&'ast str),
}

impl<'ast> TypeExpr<'ast> {
    /// A class without type arguments.
    pub const fn named(name: &'ast str) -> Self {
        TypeExpr::Named { name, args: &[] }
    }

    pub const fn primitive(kind: PrimitiveKind) -> Self {
        TypeExpr::Primitive(kind)
    }

    pub const fn void() -> Self {
        TypeExpr::Primitive(PrimitiveKind::Void)
    }

    pub const fn int() -> Self {
        TypeExpr::Primitive(PrimitiveKind::Int)
    }

    pub const fn boolean() -> Self {
        TypeExpr::Primitive(PrimitiveKind::Boolean)
    }

    pub const fn string() -> Self {
        TypeExpr::named("java.lang.String")
    }
}
