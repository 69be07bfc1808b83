//! Construction of expression trees in an arena.
//!
//! Parsing is not part of this workspace; front ends (and tests) build trees
//! through [`AstBuilder`], which assigns every node its identity.
//!
//! ```
//! use bumpalo::Bump;
//! use exprlower_ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let x = b.val("x", None, b.int(1));
//! let body = b.block(&[x, b.local(x)]);
//! assert_eq!(body.children().len(), 2);
//! assert_ne!(x.id, body.id);
//! ```

use std::cell::Cell;

use bumpalo::Bump;
use exprlower_core::Span;

use crate::expr::{
    AssignExpr, BlockExpr, CastExpr, ConstructorCallExpr, Expr, ExprId, ExprKind, ExtensionExpr,
    Feature, FeatureCallExpr, IfExpr, LiteralKind, ReturnExpr, ThrowExpr, VarDeclExpr,
};
use crate::types::TypeExpr;

/// Allocates expression nodes with fresh identities.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
    span: Cell<Span>,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
            span: Cell::new(Span::default()),
        }
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    /// Location attached to nodes created from now on.
    pub fn set_span(&self, span: Span) {
        self.span.set(span);
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.next_id.get() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, kind: ExprKind<'ast>) -> &'ast Expr<'ast> {
        let id = ExprId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.arena.alloc(Expr {
            id,
            kind,
            span: self.span.get(),
        })
    }

    fn exprs(&self, exprs: &[&'ast Expr<'ast>]) -> &'ast [&'ast Expr<'ast>] {
        self.arena.alloc_slice_copy(exprs)
    }

    /// Copy a name into the arena.
    pub fn name(&self, name: &str) -> &'ast str {
        self.arena.alloc_str(name)
    }

    /// Copy a list of types into the arena.
    pub fn types(&self, types: &[TypeExpr<'ast>]) -> &'ast [TypeExpr<'ast>] {
        self.arena.alloc_slice_copy(types)
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    pub fn generic(&self, name: &'ast str, args: &[TypeExpr<'ast>]) -> TypeExpr<'ast> {
        TypeExpr::Named {
            name,
            args: self.types(args),
        }
    }

    pub fn array_of(&self, component: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Array(self.arena.alloc(component))
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn block(&self, exprs: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        self.node(ExprKind::Block(BlockExpr {
            exprs: self.exprs(exprs),
        }))
    }

    /// A final local (`val`).
    pub fn val(
        &self,
        name: &'ast str,
        declared_type: Option<TypeExpr<'ast>>,
        init: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        self.var_decl(name, declared_type, false, Some(init))
    }

    /// A writeable local (`var`).
    pub fn var(
        &self,
        name: &'ast str,
        declared_type: Option<TypeExpr<'ast>>,
        init: Option<&'ast Expr<'ast>>,
    ) -> &'ast Expr<'ast> {
        self.var_decl(name, declared_type, true, init)
    }

    fn var_decl(
        &self,
        name: &'ast str,
        declared_type: Option<TypeExpr<'ast>>,
        writeable: bool,
        init: Option<&'ast Expr<'ast>>,
    ) -> &'ast Expr<'ast> {
        self.node(ExprKind::VarDecl(self.arena.alloc(VarDeclExpr {
            name,
            declared_type,
            writeable,
            init,
        })))
    }

    /// Read of the local variable declared by `decl`.
    ///
    /// # Panics
    ///
    /// Panics if `decl` is not a variable declaration.
    pub fn local(&self, decl: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        let ExprKind::VarDecl(var) = decl.kind else {
            panic!("local() needs a variable declaration, got {}", decl.kind_name());
        };
        self.call(Feature::local(var.name, decl.id), None, &[])
    }

    pub fn param(&self, name: &'ast str, ty: TypeExpr<'ast>) -> &'ast Expr<'ast> {
        self.call(Feature::parameter(name, ty), None, &[])
    }

    pub fn this(&self) -> &'ast Expr<'ast> {
        self.call(Feature::this(), None, &[])
    }

    pub fn super_(&self) -> &'ast Expr<'ast> {
        self.call(Feature::super_(), None, &[])
    }

    /// Call `feature` on an optional receiver.
    pub fn call(
        &self,
        feature: Feature<'ast>,
        receiver: Option<&'ast Expr<'ast>>,
        args: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.node(ExprKind::FeatureCall(self.arena.alloc(FeatureCallExpr {
            feature: self.arena.alloc(feature),
            receiver,
            args: self.exprs(args),
        })))
    }

    /// Binary operator application `lhs <symbol> rhs`.
    pub fn binary(
        &self,
        name: &'ast str,
        symbol: &'ast str,
        ret: TypeExpr<'ast>,
        lhs: &'ast Expr<'ast>,
        rhs: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        self.call(Feature::operator(name, symbol, ret), Some(lhs), &[rhs])
    }

    pub fn new_instance(
        &self,
        class: TypeExpr<'ast>,
        args: &[&'ast Expr<'ast>],
        throws: &[TypeExpr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.node(ExprKind::ConstructorCall(self.arena.alloc(
            ConstructorCallExpr {
                class,
                args: self.exprs(args),
                param_types: &[],
                throws: self.types(throws),
            },
        )))
    }

    pub fn literal(&self, kind: LiteralKind<'ast>) -> &'ast Expr<'ast> {
        self.node(ExprKind::Literal(kind))
    }

    pub fn int(&self, value: i32) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    pub fn long(&self, value: i64) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Long(value))
    }

    pub fn boolean(&self, value: bool) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Boolean(value))
    }

    pub fn string(&self, value: &'ast str) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::String(value))
    }

    pub fn null(&self) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Null)
    }

    pub fn if_(
        &self,
        cond: &'ast Expr<'ast>,
        then: &'ast Expr<'ast>,
        else_: Option<&'ast Expr<'ast>>,
    ) -> &'ast Expr<'ast> {
        self.node(ExprKind::If(self.arena.alloc(IfExpr { cond, then, else_ })))
    }

    pub fn ret(&self, value: Option<&'ast Expr<'ast>>) -> &'ast Expr<'ast> {
        self.node(ExprKind::Return(ReturnExpr { value }))
    }

    pub fn throw(&self, value: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.node(ExprKind::Throw(ThrowExpr { value }))
    }

    pub fn cast(&self, target: TypeExpr<'ast>, expr: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.node(ExprKind::Cast(self.arena.alloc(CastExpr { target, expr })))
    }

    /// Assign `value` to the local declared by `decl`.
    ///
    /// # Panics
    ///
    /// Panics if `decl` is not a variable declaration.
    pub fn assign(&self, decl: &'ast Expr<'ast>, value: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        let ExprKind::VarDecl(var) = decl.kind else {
            panic!("assign() needs a variable declaration, got {}", decl.kind_name());
        };
        self.node(ExprKind::Assign(self.arena.alloc(AssignExpr {
            target: self.arena.alloc(Feature::local(var.name, decl.id)),
            receiver: None,
            value,
        })))
    }

    pub fn extension(
        &self,
        kind_name: &'ast str,
        children: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.node(ExprKind::Extension(ExtensionExpr {
            kind_name,
            children: self.exprs(children),
        }))
    }
}
