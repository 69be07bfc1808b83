//! Traversal of expression trees.

use crate::expr::{Expr, ExprKind};

impl<'ast> Expr<'ast> {
    /// Direct sub-expressions, in evaluation order.
    pub fn children(&self) -> Vec<&'ast Expr<'ast>> {
        let mut out = Vec::new();
        match self.kind {
            ExprKind::Block(block) => out.extend_from_slice(block.exprs),
            ExprKind::VarDecl(decl) => out.extend(decl.init),
            ExprKind::FeatureCall(call) => {
                out.extend(call.receiver);
                out.extend_from_slice(call.args);
            }
            ExprKind::ConstructorCall(ctor) => out.extend_from_slice(ctor.args),
            ExprKind::Literal(_) => {}
            ExprKind::If(if_expr) => {
                out.push(if_expr.cond);
                out.push(if_expr.then);
                out.extend(if_expr.else_);
            }
            ExprKind::Return(ret) => out.extend(ret.value),
            ExprKind::Throw(throw) => out.push(throw.value),
            ExprKind::Cast(cast) => out.push(cast.expr),
            ExprKind::Assign(assign) => {
                out.extend(assign.receiver);
                out.push(assign.value);
            }
            ExprKind::Extension(ext) => out.extend_from_slice(ext.children),
        }
        out
    }

    /// All proper descendants in pre-order; the node itself is not included.
    pub fn descendants(&self) -> Descendants<'ast> {
        let mut stack = self.children();
        stack.reverse();
        Descendants { stack }
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'ast> {
    stack: Vec<&'ast Expr<'ast>>,
}

impl<'ast> Iterator for Descendants<'ast> {
    type Item = &'ast Expr<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children().into_iter().rev());
        Some(next)
    }
}
