//! The resolved-types table.
//!
//! One table is shared by every state of a compilation. It is append-only:
//! each node holds at most one resolution per expectation, and a second
//! offer under the same expectation is merged into the first.

use exprlower_ast::ExprId;
use exprlower_core::{CompilationError, Result, Span, TypeRef};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::{ConformanceHint, TypeExpectation};
use crate::oracle::TypeOracle;

/// The type a node was resolved to under one expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeResolution {
    pub expectation: TypeExpectation,
    pub actual: TypeRef,
    pub hint: ConformanceHint,
    pub is_return: bool,
}

/// Mutable table written while inference runs.
#[derive(Debug, Default)]
pub struct ResolvedTypes {
    entries: FxHashMap<ExprId, Vec<TypeResolution>>,
}

impl ResolvedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `offer` for `expr`, merging with an earlier resolution under
    /// the same expectation.
    ///
    /// - an identical type, `void` or `any` leaves the entry unchanged
    /// - a `void` or `any` entry is replaced
    /// - otherwise an `Exact` hint on either side is a conflict
    /// - otherwise the entry widens to the common super type
    pub fn accept(
        &mut self,
        expr: ExprId,
        span: Span,
        offer: TypeResolution,
        oracle: &dyn TypeOracle,
    ) -> Result<()> {
        let entry = self.entries.entry(expr).or_default();
        let Some(existing) = entry
            .iter_mut()
            .find(|resolution| resolution.expectation == offer.expectation)
        else {
            trace!(?expr, actual = %offer.actual, expectation = %offer.expectation, "resolved");
            entry.push(offer);
            return Ok(());
        };

        if existing.actual == offer.actual || offer.actual.is_void() || offer.actual.is_any() {
            return Ok(());
        }
        if existing.actual.is_void() || existing.actual.is_any() {
            trace!(?expr, from = %existing.actual, to = %offer.actual, "refined");
            *existing = offer;
            return Ok(());
        }
        if existing.hint == ConformanceHint::Exact || offer.hint == ConformanceHint::Exact {
            return Err(CompilationError::InferenceConflict {
                first: existing.actual.to_string(),
                second: offer.actual.to_string(),
                span,
            });
        }

        let merged = oracle.common_super_type(&existing.actual, &offer.actual);
        trace!(?expr, first = %existing.actual, second = %offer.actual, %merged, "merged");
        existing.actual = merged;
        if offer.hint == ConformanceHint::ImplicitConversion {
            existing.hint = ConformanceHint::ImplicitConversion;
        }
        existing.is_return |= offer.is_return;
        Ok(())
    }

    /// The resolution of `expr` under exactly `expectation`.
    pub fn resolution(&self, expr: ExprId, expectation: &TypeExpectation) -> Option<&TypeResolution> {
        self.entries
            .get(&expr)?
            .iter()
            .find(|resolution| &resolution.expectation == expectation)
    }

    pub fn actual_type(&self, expr: ExprId) -> Option<&TypeRef> {
        self.entries.get(&expr)?.first().map(|r| &r.actual)
    }

    /// Freeze the table.
    pub fn seal(self) -> ResolvedTypesSnapshot {
        ResolvedTypesSnapshot {
            entries: self.entries,
        }
    }
}

/// Read-only view of the resolved types of a finished compilation.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTypesSnapshot {
    entries: FxHashMap<ExprId, Vec<TypeResolution>>,
}

impl ResolvedTypesSnapshot {
    /// The type of `expr` under the first expectation it was resolved for.
    pub fn actual_type(&self, expr: ExprId) -> Option<&TypeRef> {
        self.resolutions(expr).first().map(|r| &r.actual)
    }

    /// The type its context expected for `expr`, if it expected one.
    pub fn expected_type(&self, expr: ExprId) -> Option<&TypeRef> {
        self.resolutions(expr)
            .first()
            .and_then(|r| r.expectation.expected_type())
    }

    pub fn resolutions(&self, expr: ExprId) -> &[TypeResolution] {
        self.entries.get(&expr).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, expr: ExprId) -> bool {
        self.entries.contains_key(&expr)
    }

    /// Number of resolved nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
