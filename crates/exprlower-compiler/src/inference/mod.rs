//! Hierarchical type inference.
//!
//! Inference walks the expression tree once, top-down, through a tree of
//! computation states ([`StateArena`]). Every state computes one node under
//! the expectation of its parent; the resolved type flows back up through
//! [`StateArena::accept_type`] into a single [`ResolvedTypes`] table, which is
//! sealed into a [`ResolvedTypesSnapshot`] when the root state finishes.
//!
//! - [`expectation`]: [`TypeExpectation`] and [`ConformanceHint`]
//! - [`resolved`]: the table and its merge rule
//! - [`session`]: scopes seen by name resolution
//! - [`state`]: the state arena
//! - [`resolver`]: per-kind typing rules ([`TypeResolver`])

pub mod expectation;
pub mod resolved;
pub mod resolver;
pub mod session;
pub mod state;

pub use expectation::{ConformanceHint, TypeExpectation};
pub use resolved::{ResolvedTypes, ResolvedTypesSnapshot, TypeResolution};
pub use resolver::{TypeResolver, classify};
pub use session::FeatureScopeSession;
pub use state::{StateArena, StateId, StateKind};
