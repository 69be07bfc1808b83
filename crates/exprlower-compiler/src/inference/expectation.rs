//! Expected types and conformance hints.

use std::fmt;

use exprlower_core::TypeRef;

/// How strictly a resolved type has to match the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConformanceHint {
    /// Only the expected type itself
    Exact,
    /// The expected type or any subtype
    Subtype,
    /// Anything the host converts implicitly (boxing, unboxing, widening)
    ImplicitConversion,
}

impl fmt::Display for ConformanceHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConformanceHint::Exact => "exact",
            ConformanceHint::Subtype => "subtype",
            ConformanceHint::ImplicitConversion => "implicit conversion",
        })
    }
}

/// The type a context requests for one of its children.
///
/// Expectations compare by value; children computed under equal
/// expectations report into the same entry of their parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpectation {
    pub expected: Option<TypeRef>,
    pub hint: ConformanceHint,
    /// Whether this models the return position of a function
    pub is_return: bool,
}

impl TypeExpectation {
    /// No constraint.
    pub fn none() -> Self {
        Self {
            expected: None,
            hint: ConformanceHint::Subtype,
            is_return: false,
        }
    }

    pub fn exact(ty: TypeRef) -> Self {
        Self::with_hint(ty, ConformanceHint::Exact)
    }

    pub fn subtype(ty: TypeRef) -> Self {
        Self::with_hint(ty, ConformanceHint::Subtype)
    }

    pub fn convertible(ty: TypeRef) -> Self {
        Self::with_hint(ty, ConformanceHint::ImplicitConversion)
    }

    /// The return position of a function declared to return `ty`.
    pub fn returning(ty: TypeRef) -> Self {
        Self {
            is_return: true,
            ..Self::convertible(ty)
        }
    }

    fn with_hint(ty: TypeRef, hint: ConformanceHint) -> Self {
        Self {
            expected: Some(ty),
            hint,
            is_return: false,
        }
    }

    pub fn expected_type(&self) -> Option<&TypeRef> {
        self.expected.as_ref()
    }

    /// Whether the context expects no value at all.
    pub fn is_void(&self) -> bool {
        self.expected.as_ref().is_some_and(TypeRef::is_void)
    }
}

impl Default for TypeExpectation {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for TypeExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(ty) => write!(f, "{ty} ({})", self.hint)?,
            None => f.write_str("<none>")?,
        }
        if self.is_return {
            f.write_str(" [return]")?;
        }
        Ok(())
    }
}
