//! Type references: the compiler's description of host types.
//!
//! A [`TypeRef`] names a host type structurally. Conformance between
//! references is not decided here; that belongs to the type oracle. The
//! [`TypeRef::Any`] placeholder stands for "not committed yet" and must be
//! replaced by a concrete type before a variable is declared with it.
//!
//! ```
//! use exprlower_core::{PrimitiveKind, TypeRef};
//!
//! let list = TypeRef::generic("java.util.List", vec![TypeRef::string()]);
//! assert_eq!(list.to_string(), "java.util.List<java.lang.String>");
//! assert_eq!(list.simple_name(), "List");
//!
//! let ints = TypeRef::array(TypeRef::primitive(PrimitiveKind::Int));
//! assert_eq!(ints.to_string(), "int[]");
//! ```

use std::fmt::{self, Display, Formatter};

use crate::{PrimitiveKind, TypeHash};

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";

/// A reference to a host type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive value type, or `void`.
    Primitive(PrimitiveKind),
    /// A class or interface, with its type arguments.
    Class { name: String, args: Vec<TypeRef> },
    /// An array of the component type.
    Array(Box<TypeRef>),
    /// A reference to a declared type parameter.
    TypeParameter(String),
    /// Placeholder for a type inference could not commit to yet.
    Any,
}

impl TypeRef {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }

    pub fn void() -> Self {
        TypeRef::Primitive(PrimitiveKind::Void)
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveKind::Boolean)
    }

    pub fn int() -> Self {
        TypeRef::Primitive(PrimitiveKind::Int)
    }

    /// A non-generic class reference.
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A parameterized class reference.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Class {
            name: name.into(),
            args,
        }
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        TypeRef::TypeParameter(name.into())
    }

    pub fn object() -> Self {
        Self::class(OBJECT)
    }

    pub fn string() -> Self {
        Self::class(STRING)
    }

    /// `void`, the type of expressions that produce no value.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Void))
    }

    /// A primitive that carries a value (`void` excluded).
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(kind) if !kind.is_void())
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TypeRef::Any)
    }

    pub fn is_type_parameter(&self) -> bool {
        matches!(self, TypeRef::TypeParameter(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    pub fn component_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// The erased, fully qualified name (no type arguments).
    pub fn qualified_name(&self) -> String {
        match self {
            TypeRef::Primitive(kind) => kind.name().to_string(),
            TypeRef::Class { name, .. } => name.clone(),
            TypeRef::Array(component) => format!("{}[]", component.qualified_name()),
            TypeRef::TypeParameter(name) => name.clone(),
            TypeRef::Any => OBJECT.to_string(),
        }
    }

    /// The unqualified name: the last segment of a class name, nested
    /// classes included (`a.b.Outer$Inner` yields `Inner`).
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Class { name, .. } => name
                .rsplit(|c: char| c == '.' || c == '$')
                .next()
                .unwrap_or(name.as_str())
                .to_string(),
            TypeRef::Array(component) => format!("{}[]", component.simple_name()),
            TypeRef::Any => "Object".to_string(),
            other => other.qualified_name(),
        }
    }

    /// Identity of the erased type.
    pub fn type_hash(&self) -> TypeHash {
        TypeHash::from_name(&self.qualified_name())
    }

    /// The primitive a wrapper class unboxes to.
    pub fn unboxed(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Class { name, args } if args.is_empty() => {
                PrimitiveKind::from_wrapper_name(name).filter(|kind| !kind.is_void())
            }
            _ => None,
        }
    }

    /// Box primitives into their wrapper class; other references unchanged.
    pub fn wrapper_if_primitive(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(kind) => TypeRef::class(kind.wrapper_name()),
            other => other.clone(),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{kind}"),
            TypeRef::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Array(component) => write!(f, "{component}[]"),
            TypeRef::TypeParameter(name) => f.write_str(name),
            TypeRef::Any => f.write_str("any"),
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_is_not_a_value_primitive() {
        assert!(TypeRef::void().is_void());
        assert!(!TypeRef::void().is_primitive());
        assert!(TypeRef::int().is_primitive());
        assert!(!TypeRef::string().is_primitive());
    }

    #[test]
    fn simple_name_strips_package_and_outer_class() {
        assert_eq!(TypeRef::class("java.util.Map$Entry").simple_name(), "Entry");
        assert_eq!(TypeRef::class("Local").simple_name(), "Local");
        assert_eq!(TypeRef::array(TypeRef::string()).simple_name(), "String[]");
    }

    #[test]
    fn boxing_and_unboxing() {
        let boxed = TypeRef::int().wrapper_if_primitive();
        assert_eq!(boxed, TypeRef::class("java.lang.Integer"));
        assert_eq!(boxed.unboxed(), Some(PrimitiveKind::Int));
        assert_eq!(TypeRef::string().unboxed(), None);
        assert_eq!(TypeRef::class("java.lang.Void").unboxed(), None);
    }

    #[test]
    fn erased_hash_ignores_type_arguments() {
        let raw = TypeRef::class("java.util.List");
        let typed = TypeRef::generic("java.util.List", vec![TypeRef::string()]);
        assert_eq!(raw.type_hash(), typed.type_hash());
    }

    #[test]
    fn any_displays_as_placeholder() {
        assert_eq!(TypeRef::Any.to_string(), "any");
        assert_eq!(TypeRef::Any.qualified_name(), OBJECT);
    }
}
