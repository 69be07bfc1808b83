//! Host source text for type references.

use exprlower_core::TypeRef;

/// Render `ty` as it is written in host source.
///
/// Nested class names use `.` instead of `$`. Type arguments are always
/// boxed; with `allow_primitives` unset the top-level type is boxed too.
/// [`TypeRef::Any`] becomes `java.lang.Object`.
///
/// ```
/// use exprlower_compiler::serializer::serialize;
/// use exprlower_core::TypeRef;
///
/// let f = TypeRef::generic("lib.Functions$Function0", vec![TypeRef::int()]);
/// assert_eq!(serialize(&f, true), "lib.Functions.Function0<java.lang.Integer>");
/// assert_eq!(serialize(&TypeRef::int(), false), "java.lang.Integer");
/// ```
pub fn serialize(ty: &TypeRef, allow_primitives: bool) -> String {
    let mut out = String::new();
    write_type(&mut out, ty, allow_primitives);
    out
}

fn write_type(out: &mut String, ty: &TypeRef, allow_primitives: bool) {
    match ty {
        TypeRef::Primitive(kind) if allow_primitives => out.push_str(kind.name()),
        TypeRef::Primitive(kind) => out.push_str(kind.wrapper_name()),
        TypeRef::Class { name, args } => {
            out.push_str(&name.replace('$', "."));
            if !args.is_empty() {
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_type(out, arg, false);
                }
                out.push('>');
            }
        }
        TypeRef::Array(component) => {
            write_type(out, component, true);
            out.push_str("[]");
        }
        TypeRef::TypeParameter(name) => out.push_str(name),
        TypeRef::Any => out.push_str(exprlower_core::type_ref::OBJECT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprlower_core::PrimitiveKind;

    #[test]
    fn arrays_keep_primitive_components() {
        let ints = TypeRef::array(TypeRef::int());
        assert_eq!(serialize(&ints, false), "int[]");
    }

    #[test]
    fn any_is_object() {
        assert_eq!(serialize(&TypeRef::Any, true), "java.lang.Object");
        let list = TypeRef::generic("java.util.List", vec![TypeRef::Any]);
        assert_eq!(serialize(&list, true), "java.util.List<java.lang.Object>");
    }

    #[test]
    fn void_boxes_to_wrapper() {
        assert_eq!(serialize(&TypeRef::void(), true), "void");
        assert_eq!(serialize(&TypeRef::void(), false), "java.lang.Void");
        assert_eq!(
            serialize(&TypeRef::primitive(PrimitiveKind::Boolean), false),
            "java.lang.Boolean"
        );
    }
}
