//! Resolution of written types to type references.
//!
//! Names in the tree are already qualified by the front end, so resolution
//! is structural: it never fails, and whether a named class exists is a
//! question for the type oracle.

use exprlower_ast::TypeExpr;
use exprlower_core::TypeRef;

/// Resolve a type expression.
pub fn resolve_type(ty: &TypeExpr<'_>) -> TypeRef {
    match ty {
        TypeExpr::Primitive(kind) => TypeRef::primitive(*kind),
        TypeExpr::Named { name, args } => TypeRef::generic(*name, resolve_types(args)),
        TypeExpr::Array(component) => TypeRef::array(resolve_type(component)),
        TypeExpr::Param(name) => TypeRef::type_parameter(*name),
    }
}

pub fn resolve_types(types: &[TypeExpr<'_>]) -> Vec<TypeRef> {
    types.iter().map(resolve_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprlower_core::PrimitiveKind;

    #[test]
    fn nested_generics_and_arrays() {
        let args = [TypeExpr::string(), TypeExpr::Param("V")];
        let component = TypeExpr::Named {
            name: "java.util.Map",
            args: &args,
        };
        let ty = resolve_type(&TypeExpr::Array(&component));
        assert_eq!(ty.to_string(), "java.util.Map<java.lang.String, V>[]");
    }

    #[test]
    fn primitives() {
        assert_eq!(resolve_type(&TypeExpr::void()), TypeRef::void());
        assert_eq!(
            resolve_type(&TypeExpr::primitive(PrimitiveKind::Char)),
            TypeRef::primitive(PrimitiveKind::Char)
        );
    }
}
