//! Primitive kinds of the host language.

use std::fmt;

/// The host language's built-in value types, plus `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// All kinds that denote an actual value (everything but `void`).
    pub const VALUES: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// The keyword spelling of this primitive.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Parse a primitive keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "void" => PrimitiveKind::Void,
            "boolean" => PrimitiveKind::Boolean,
            "byte" => PrimitiveKind::Byte,
            "short" => PrimitiveKind::Short,
            "char" => PrimitiveKind::Char,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            _ => return None,
        };
        Some(kind)
    }

    /// Fully qualified name of the boxing class.
    pub const fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "java.lang.Void",
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }

    /// Inverse of [`wrapper_name`](Self::wrapper_name).
    pub fn from_wrapper_name(name: &str) -> Option<Self> {
        [PrimitiveKind::Void]
            .into_iter()
            .chain(Self::VALUES)
            .find(|kind| kind.wrapper_name() == name)
    }

    pub const fn is_void(self) -> bool {
        matches!(self, PrimitiveKind::Void)
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Void | PrimitiveKind::Boolean)
    }

    /// Whether a value of `self` widens implicitly to `target`.
    ///
    /// Identity counts as widening.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Void | Boolean | Double => false,
        }
    }

    /// The literal a variable of this kind is initialized with when it has no
    /// value yet. `void` has none.
    pub const fn default_literal(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::Void => None,
            PrimitiveKind::Boolean => Some("false"),
            _ => Some("0"),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
