//! Feature scope sessions.
//!
//! A session is what name resolution sees at one point of the tree: the
//! local variables declared so far, the enclosing instance and the return
//! expectation of the enclosing function. Sessions are persistent; adding a
//! local yields a new session sharing its tail with the old one, so a child
//! state can extend its scope without affecting its siblings.

use std::rc::Rc;

use exprlower_ast::ExprId;
use exprlower_core::TypeRef;

use super::TypeExpectation;

#[derive(Debug)]
struct Local {
    decl: ExprId,
    ty: TypeRef,
    next: Option<Rc<Local>>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureScopeSession {
    locals: Option<Rc<Local>>,
    this_type: Option<TypeRef>,
    super_type: Option<TypeRef>,
    return_expectation: Option<TypeExpectation>,
}

impl FeatureScopeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_this(self, ty: TypeRef) -> Self {
        Self {
            this_type: Some(ty),
            ..self
        }
    }

    pub fn with_super(self, ty: TypeRef) -> Self {
        Self {
            super_type: Some(ty),
            ..self
        }
    }

    pub fn with_return(self, expectation: TypeExpectation) -> Self {
        Self {
            return_expectation: Some(expectation),
            ..self
        }
    }

    /// A session that also sees the local declared by `decl`.
    pub fn with_local(&self, decl: ExprId, ty: TypeRef) -> Self {
        Self {
            locals: Some(Rc::new(Local {
                decl,
                ty,
                next: self.locals.clone(),
            })),
            ..self.clone()
        }
    }

    pub fn local(&self, decl: ExprId) -> Option<&TypeRef> {
        let mut current = self.locals.as_deref();
        while let Some(local) = current {
            if local.decl == decl {
                return Some(&local.ty);
            }
            current = local.next.as_deref();
        }
        None
    }

    pub fn this_type(&self) -> Option<&TypeRef> {
        self.this_type.as_ref()
    }

    pub fn super_type(&self) -> Option<&TypeRef> {
        self.super_type.as_ref()
    }

    pub fn return_expectation(&self) -> Option<&TypeExpectation> {
        self.return_expectation.as_ref()
    }
}
