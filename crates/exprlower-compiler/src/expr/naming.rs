//! Proposed names for synthetic locals.

use exprlower_ast::{Expr, ExprKind};
use exprlower_core::TypeRef;

use super::ExprCompiler;
use crate::type_resolver::resolve_type;

const OPERATOR_PREFIX: &str = "operator_";

/// What a variable name is proposed for.
#[derive(Debug, Clone, Copy)]
pub enum NamingSubject<'n, 'ast> {
    Expr(&'n Expr<'ast>),
    Type(&'n TypeRef),
    Parameter(&'n str),
}

impl ExprCompiler<'_> {
    /// A readable name proposal: the declared name of a variable, otherwise
    /// an underscore followed by a stem taken from the feature, class or node
    /// kind (`getName()` gives `_name`, `toString()` gives `_string`,
    /// `new ArrayList()` gives `_arrayList`).
    ///
    /// The proposal is not unique; scopes add suffixes when it clashes.
    pub fn favorite_variable_name(&self, subject: NamingSubject<'_, '_>) -> String {
        match subject {
            NamingSubject::Parameter(name) => name.to_string(),
            NamingSubject::Type(TypeRef::Array(component)) => {
                self.favorite_variable_name(NamingSubject::Type(component))
            }
            NamingSubject::Type(ty) => format!("_{}", to_first_lower(&ty.simple_name())),
            NamingSubject::Expr(expr) => match expr.kind {
                ExprKind::VarDecl(decl) => decl.name.to_string(),
                ExprKind::FeatureCall(call) => {
                    let name = self.ctx.names.simple_name(call.feature);
                    format!("_{}", feature_stem(&name))
                }
                ExprKind::ConstructorCall(ctor) => {
                    let class = resolve_type(&ctor.class);
                    self.favorite_variable_name(NamingSubject::Type(&class))
                }
                _ => format!("_{}", expr.kind_name().to_lowercase()),
            },
        }
    }
}

fn feature_stem(name: &str) -> String {
    let name = name.split('(').next().unwrap_or(name);
    let name = name.rsplit('.').next().unwrap_or(name);
    if let Some(rest) = name.strip_prefix(OPERATOR_PREFIX) {
        to_first_lower(rest)
    } else if name.len() > 3
        && let Some(rest) = name.strip_prefix("get")
    {
        to_first_lower(rest)
    } else if name.len() > 2
        && let Some(rest) = name.strip_prefix("to")
    {
        to_first_lower(rest)
    } else {
        name.to_string()
    }
}

pub(crate) fn to_first_lower(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems() {
        assert_eq!(feature_stem("getName"), "name");
        assert_eq!(feature_stem("get"), "get");
        assert_eq!(feature_stem("getter"), "ter");
        assert_eq!(feature_stem("operator_plus"), "plus");
        assert_eq!(feature_stem("operator_Plus"), "plus");
        assert_eq!(feature_stem("toString"), "string");
        assert_eq!(feature_stem("toList()"), "list");
        assert_eq!(feature_stem("to"), "to");
        assert_eq!(feature_stem("java.util.List.size()"), "size");
        assert_eq!(feature_stem("foo"), "foo");
    }

    #[test]
    fn first_lower() {
        assert_eq!(to_first_lower("ArrayList"), "arrayList");
        assert_eq!(to_first_lower(""), "");
        assert_eq!(to_first_lower("x"), "x");
    }
}
