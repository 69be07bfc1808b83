//! Expression trees of the embedded language.
//!
//! Nodes live in a [`bumpalo::Bump`] arena and are referenced by identity
//! ([`ExprId`]). The tree is read-only once built and can be shared between
//! independent compilations.
//!
//! - [`expr`]: node definitions
//! - [`types`]: unresolved type syntax
//! - [`builder`]: [`AstBuilder`] for constructing trees
//! - [`visitor`]: child and descendant traversal

pub mod builder;
pub mod expr;
pub mod types;
pub mod visitor;

pub use builder::AstBuilder;
pub use expr::*;
pub use types::TypeExpr;
pub use visitor::Descendants;
