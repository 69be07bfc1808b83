//! Deterministic identity for host types.
//!
//! [`TypeHash`] is a 64-bit XXHash of a fully qualified type name. The type
//! registry and the output sink both key class types by it, so the same name
//! always maps to the same entry regardless of registration order.
//!
//! ```
//! use exprlower_core::TypeHash;
//!
//! let a = TypeHash::from_name("java.lang.String");
//! assert_eq!(a, TypeHash::from_name("java.lang.String"));
//! assert_ne!(a, TypeHash::from_name("java.lang.Object"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into every type hash.
const TYPE_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A deterministic 64-bit hash identifying a named host type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Hash a fully qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(TYPE_DOMAIN ^ xxh64(name.as_bytes(), 0))
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}
