//! Core types shared by the exprlower crates.
//!
//! - [`TypeRef`] / [`PrimitiveKind`]: the type reference model of the host language
//! - [`TypeHash`]: deterministic identity of named host types
//! - [`Span`]: source locations
//! - [`CompilationError`]: the error type of inference and lowering

mod error;
mod primitive_kind;
mod span;
mod type_hash;
pub mod type_ref;

pub use error::{CompilationError, Result};
pub use primitive_kind::PrimitiveKind;
pub use span::Span;
pub use type_hash::TypeHash;
pub use type_ref::TypeRef;
