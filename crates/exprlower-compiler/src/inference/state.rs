//! The tree of type computation states.
//!
//! States mirror the part of the expression tree inference visits. They
//! live in one arena and refer to their parent by index. A state creates at
//! most one child at a time; the child is discarded once its type has been
//! accepted, and a discarded state accepts no further writes.
//!
//! Two kinds of child exist. A [`StateKind::Child`] computes a node whose
//! value is the value of its parent (the last expression of a block, the
//! branches of an `if`) and forwards every type it accepts to the parent's
//! node. A [`StateKind::Nested`] computes an independent operand (arguments,
//! conditions, initializers) and records only its own node.

use exprlower_ast::{Expr, ExprId};
use exprlower_core::{CompilationError, Result, Span, TypeRef};

use super::{
    ConformanceHint, FeatureScopeSession, ResolvedTypes, ResolvedTypesSnapshot, TypeExpectation,
    TypeResolution,
};
use crate::oracle::TypeOracle;

/// Index of a state in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Root,
    Child,
    Nested,
}

#[derive(Debug)]
struct State {
    parent: Option<StateId>,
    expr: ExprId,
    span: Span,
    kind: StateKind,
    session: FeatureScopeSession,
    active_child: Option<StateId>,
    discarded: bool,
}

/// All states of one compilation plus the table they write.
pub struct StateArena<'o> {
    states: Vec<State>,
    table: ResolvedTypes,
    oracle: &'o dyn TypeOracle,
}

impl<'o> StateArena<'o> {
    pub fn new(oracle: &'o dyn TypeOracle) -> Self {
        Self {
            states: Vec::new(),
            table: ResolvedTypes::new(),
            oracle,
        }
    }

    /// Create the root state. Only one root exists per arena.
    pub fn root(&mut self, expr: &Expr<'_>, session: FeatureScopeSession) -> Result<StateId> {
        if !self.states.is_empty() {
            return Err(CompilationError::internal("root state already exists"));
        }
        Ok(self.push(None, expr, StateKind::Root, session))
    }

    /// Create a state for `expr` whose value is the value of `parent`.
    pub fn child(&mut self, parent: StateId, expr: &Expr<'_>) -> Result<StateId> {
        let session = self.live(parent)?.session.clone();
        self.spawn(parent, expr, StateKind::Child, session)
    }

    /// Create a state for an independent operand `expr` of `parent`.
    pub fn nested(
        &mut self,
        parent: StateId,
        expr: &Expr<'_>,
        session: FeatureScopeSession,
    ) -> Result<StateId> {
        self.spawn(parent, expr, StateKind::Nested, session)
    }

    fn spawn(
        &mut self,
        parent: StateId,
        expr: &Expr<'_>,
        kind: StateKind,
        session: FeatureScopeSession,
    ) -> Result<StateId> {
        if let Some(active) = self.live(parent)?.active_child {
            return Err(CompilationError::internal(format!(
                "state {} still has active child {} while starting another",
                parent.0, active.0
            )));
        }
        let id = self.push(Some(parent), expr, kind, session);
        self.states[parent.0 as usize].active_child = Some(id);
        Ok(id)
    }

    fn push(
        &mut self,
        parent: Option<StateId>,
        expr: &Expr<'_>,
        kind: StateKind,
        session: FeatureScopeSession,
    ) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(State {
            parent,
            expr: expr.id,
            span: expr.span,
            kind,
            session,
            active_child: None,
            discarded: false,
        });
        id
    }

    /// Finish `state`; its parent may start its next child.
    pub fn discard(&mut self, state: StateId) -> Result<()> {
        let entry = self.live_mut(state)?;
        entry.discarded = true;
        if let Some(parent) = entry.parent {
            let parent = &mut self.states[parent.0 as usize];
            if parent.active_child == Some(state) {
                parent.active_child = None;
            }
        }
        Ok(())
    }

    fn get(&self, state: StateId) -> Result<&State> {
        self.states
            .get(state.0 as usize)
            .ok_or_else(|| CompilationError::internal(format!("unknown state {}", state.0)))
    }

    fn live(&self, state: StateId) -> Result<&State> {
        let entry = self.get(state)?;
        if entry.discarded {
            return Err(CompilationError::internal(format!(
                "state {} was already discarded",
                state.0
            )));
        }
        Ok(entry)
    }

    fn live_mut(&mut self, state: StateId) -> Result<&mut State> {
        self.live(state)?;
        Ok(&mut self.states[state.0 as usize])
    }

    pub fn kind(&self, state: StateId) -> Result<StateKind> {
        Ok(self.get(state)?.kind)
    }

    pub fn parent(&self, state: StateId) -> Result<Option<StateId>> {
        Ok(self.get(state)?.parent)
    }

    pub fn session(&self, state: StateId) -> Result<&FeatureScopeSession> {
        Ok(&self.live(state)?.session)
    }

    /// Make a local visible to the statements that follow `state`: it is
    /// added to the parent's session, or to the state's own at the root.
    pub fn declare_local(&mut self, state: StateId, decl: ExprId, ty: TypeRef) -> Result<()> {
        let owner = self.live(state)?.parent.unwrap_or(state);
        let entry = self.live_mut(owner)?;
        entry.session = entry.session.with_local(decl, ty);
        Ok(())
    }

    /// Accept `ty` as the type of the node `state` covers.
    ///
    /// An `any` result under a concrete expectation is recorded as the
    /// expected type. A [`StateKind::Child`] also records the same
    /// resolution for its parent's node. Returns the recorded type.
    pub fn accept_type(
        &mut self,
        state: StateId,
        expectation: &TypeExpectation,
        ty: TypeRef,
        hint: ConformanceHint,
        is_return: bool,
    ) -> Result<TypeRef> {
        let (expr, span, kind, parent) = {
            let entry = self.live(state)?;
            (entry.expr, entry.span, entry.kind, entry.parent)
        };
        let ty = refine(expectation, ty);
        let resolution = TypeResolution {
            expectation: expectation.clone(),
            actual: ty.clone(),
            hint,
            is_return,
        };

        if kind == StateKind::Child
            && let Some(parent) = parent
        {
            let parent_expr = self.live(parent)?.expr;
            self.table.accept(expr, span, resolution.clone(), self.oracle)?;
            self.table.accept(parent_expr, span, resolution, self.oracle)?;
        } else {
            self.table.accept(expr, span, resolution, self.oracle)?;
        }
        Ok(ty)
    }

    /// The table as written so far.
    pub fn table(&self) -> &ResolvedTypes {
        &self.table
    }

    pub fn oracle(&self) -> &'o dyn TypeOracle {
        self.oracle
    }

    /// Seal the table. Fails if any state is still active.
    pub fn finish(self) -> Result<ResolvedTypesSnapshot> {
        if let Some(index) = self.states.iter().position(|state| !state.discarded) {
            return Err(CompilationError::internal(format!(
                "state {index} is still active"
            )));
        }
        Ok(self.table.seal())
    }
}

/// Replace an `any` result by the concrete type the context asked for.
fn refine(expectation: &TypeExpectation, ty: TypeRef) -> TypeRef {
    match expectation.expected_type() {
        Some(expected) if ty.is_any() && !expected.is_type_parameter() && !expected.is_any() => {
            expected.clone()
        }
        _ => ty,
    }
}
