//! Scoped, traceable text output.
//!
//! [`TreeAppendable`] is the sink generated host code is written into. Besides
//! text and indentation it keeps a stack of name scopes: every expression
//! that gets hoisted into a local, every parameter and every aliased
//! enclosing instance is bound to a name here, and a name stays reserved
//! until the scope that declared it closes.
//!
//! ```
//! use exprlower_compiler::output::{NameKey, TreeAppendable};
//!
//! let mut out = TreeAppendable::new("  ");
//! let first = out.declare_synthetic_variable(NameKey::Synthetic(0), "_e");
//! let second = out.declare_synthetic_variable(NameKey::Synthetic(1), "_e");
//! assert_eq!((first.as_str(), second.as_str()), ("_e", "_e_1"));
//! ```

use exprlower_ast::{Expr, ExprId};
use exprlower_core::{Result, TypeHash, TypeRef};
use rustc_hash::{FxHashMap, FxHashSet};

// ============================================================================
// Keys
// ============================================================================

/// What a declared name stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameKey {
    /// The value of an expression node
    Expr(ExprId),
    /// An enclosing instance of the given type (`this`, `Outer.this`)
    Type(TypeHash),
    /// A parameter of the function being generated
    Parameter(String),
    /// A compiler-internal binding with no source counterpart
    Synthetic(u32),
}

/// A region of output produced for one expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRegion {
    pub expr: ExprId,
    /// Byte offset into the output
    pub offset: usize,
    pub len: usize,
    pub use_for_debugging: bool,
}

#[derive(Debug, Default)]
struct Scope {
    names: FxHashMap<NameKey, String>,
    objects: FxHashMap<String, TypeRef>,
    used: FxHashSet<String>,
}

// ============================================================================
// TreeAppendable
// ============================================================================

/// Text sink with indentation, name scopes and source tracing.
#[derive(Debug)]
pub struct TreeAppendable {
    content: String,
    indent_unit: String,
    indent: usize,
    scopes: Vec<Scope>,
    traces: Vec<TraceRegion>,
    next_synthetic: u32,
}

impl TreeAppendable {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            indent_unit: indent_unit.into(),
            indent: 0,
            scopes: vec![Scope::default()],
            traces: Vec::new(),
            next_synthetic: 0,
        }
    }

    /// Run `f` and record the text it produced as belonging to `expr`.
    pub fn traced<T>(
        &mut self,
        expr: &Expr<'_>,
        use_for_debugging: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let offset = self.content.len();
        let result = f(self)?;
        self.traces.push(TraceRegion {
            expr: expr.id,
            offset,
            len: self.content.len() - offset,
            use_for_debugging,
        });
        Ok(result)
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Close the innermost scope, releasing its names. The outermost scope
    /// is never closed.
    pub fn close_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            tracing::warn!("close_scope called without a matching open_scope");
        }
    }

    /// Run `f` in a fresh scope that is closed again whether or not `f` fails.
    pub fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.open_scope();
        let result = f(self);
        self.close_scope();
        result
    }

    /// Current nesting depth; the outermost scope is depth 1.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    fn current(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn is_taken(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.used.contains(name))
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Bind `key` to fixed text in the current scope.
    pub fn declare_variable(&mut self, key: NameKey, text: impl Into<String>) -> String {
        let text = text.into();
        let scope = self.current();
        scope.used.insert(text.clone());
        scope.names.insert(key, text.clone());
        text
    }

    /// Bind `key` to a name derived from `proposed` that no visible scope
    /// uses yet: `proposed`, then `proposed_1`, `proposed_2`, ...
    pub fn declare_synthetic_variable(&mut self, key: NameKey, proposed: &str) -> String {
        let mut name = proposed.to_string();
        let mut suffix = 1;
        while self.is_taken(&name) {
            name = format!("{proposed}_{suffix}");
            suffix += 1;
        }
        self.declare_variable(key, name)
    }

    /// A key no other binding uses.
    pub fn fresh_key(&mut self) -> NameKey {
        let key = NameKey::Synthetic(self.next_synthetic);
        self.next_synthetic += 1;
        key
    }

    pub fn has_name(&self, key: &NameKey) -> bool {
        self.get_name(key).is_some()
    }

    /// The innermost binding of `key`.
    pub fn get_name(&self, key: &NameKey) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(key))
            .map(String::as_str)
    }

    /// Whether `expr` has been hoisted into a named local.
    pub fn has_expr_name(&self, expr: &Expr<'_>) -> bool {
        self.has_name(&NameKey::Expr(expr.id))
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// Attach a type to a well-known key (`"this"`, `"super"`) in the current scope.
    pub fn set_object(&mut self, key: impl Into<String>, ty: TypeRef) {
        self.current().objects.insert(key.into(), ty);
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.get_object(key).is_some()
    }

    pub fn get_object(&self, key: &str) -> Option<&TypeRef> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.objects.get(key))
    }

    // ========================================================================
    // Text
    // ========================================================================

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self
    }

    /// Start a new line at the current indentation.
    pub fn new_line(&mut self) -> &mut Self {
        self.content.push('\n');
        for _ in 0..self.indent {
            self.content.push_str(&self.indent_unit);
        }
        self
    }

    pub fn increase_indentation(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn decrease_indentation(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Traced regions, innermost first.
    pub fn trace_regions(&self) -> &[TraceRegion] {
        &self.traces
    }
}

impl Default for TreeAppendable {
    fn default() -> Self {
        Self::new("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprlower_core::CompilationError;

    #[test]
    fn names_are_released_with_their_scope() {
        let mut out = TreeAppendable::default();
        out.open_scope();
        let inner = out.declare_synthetic_variable(NameKey::Synthetic(0), "_x");
        assert_eq!(inner, "_x");
        assert!(out.has_name(&NameKey::Synthetic(0)));
        out.close_scope();

        assert!(!out.has_name(&NameKey::Synthetic(0)));
        let again = out.declare_synthetic_variable(NameKey::Synthetic(1), "_x");
        assert_eq!(again, "_x");
    }

    #[test]
    fn outer_names_stay_reserved_in_inner_scopes() {
        let mut out = TreeAppendable::default();
        out.declare_variable(NameKey::Parameter("_e".into()), "_e");
        out.open_scope();
        let name = out.declare_synthetic_variable(NameKey::Synthetic(0), "_e");
        assert_eq!(name, "_e_1");
        let name = out.declare_synthetic_variable(NameKey::Synthetic(1), "_e");
        assert_eq!(name, "_e_2");
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut out = TreeAppendable::default();
        let key = NameKey::Type(TypeHash::from_name("a.Foo"));
        out.declare_variable(key.clone(), "this");
        out.open_scope();
        out.declare_variable(key.clone(), "Foo.this");
        assert_eq!(out.get_name(&key), Some("Foo.this"));
        out.close_scope();
        assert_eq!(out.get_name(&key), Some("this"));
    }

    #[test]
    fn with_scope_closes_on_error() {
        let mut out = TreeAppendable::default();
        let result: Result<()> = out.with_scope(|out| {
            out.set_object("this", TypeRef::class("a.Foo"));
            Err(CompilationError::internal("boom"))
        });
        assert!(result.is_err());
        assert_eq!(out.scope_depth(), 1);
        assert!(!out.has_object("this"));
    }

    #[test]
    fn outermost_scope_survives_extra_close() {
        let mut out = TreeAppendable::default();
        out.declare_variable(NameKey::Synthetic(9), "kept");
        out.close_scope();
        assert_eq!(out.get_name(&NameKey::Synthetic(9)), Some("kept"));
    }

    #[test]
    fn indentation() {
        let mut out = TreeAppendable::new("    ");
        out.append("{").increase_indentation();
        out.new_line().append("x;");
        out.decrease_indentation().new_line().append("}");
        assert_eq!(out.content(), "{\n    x;\n}");
    }

    #[test]
    fn fresh_keys_differ() {
        let mut out = TreeAppendable::default();
        assert_ne!(out.fresh_key(), out.fresh_key());
    }
}
