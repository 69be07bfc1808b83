//! Error types for expression lowering.
//!
//! A single expression tree either compiles completely or fails with a
//! [`CompilationError`] located at the offending node. The one deliberate
//! exception, a missing exception-rethrow helper, is reported inline in the
//! generated text and never surfaces here.
//!
//! ```text
//! CompilationError
//! ├── InferenceConflict  - incompatible exact resolutions for one node
//! ├── TypeMismatch       - a result that does not conform to its expectation
//! ├── Unsupported        - no lowering strategy for an expression kind
//! ├── UnresolvedFeature  - a referenced value has no bound name or type
//! ├── InvalidOperation   - a construct used where it cannot yield a value
//! └── Internal           - broken inference-state protocol
//! ```

use thiserror::Error;

use crate::Span;

/// Result alias used throughout the exprlower crates.
pub type Result<T> = std::result::Result<T, CompilationError>;

/// Errors raised while inferring types for, or lowering, an expression tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A node was resolved to two different types where one demanded an exact match.
    #[error("at {span}: conflicting types for expression: '{first}' and '{second}'")]
    InferenceConflict {
        /// The type recorded first.
        first: String,
        /// The type offered afterwards.
        second: String,
        span: Span,
    },

    /// A resolved type does not conform to what its context expects.
    #[error("at {span}: expected '{expected}', got '{actual}'")]
    TypeMismatch {
        expected: String,
        actual: String,
        span: Span,
    },

    /// No lowering or typing strategy exists for this kind of expression.
    #[error("at {span}: couldn't find a compilation strategy for expressions of type {kind}")]
    Unsupported { kind: String, span: Span },

    /// A feature reference could not be bound to a name or a type.
    #[error("at {span}: unresolved {what} '{name}'")]
    UnresolvedFeature {
        /// What was being resolved ("local variable", "value", ...).
        what: String,
        name: String,
        span: Span,
    },

    /// An expression was used in a position where it cannot produce a value.
    #[error("at {span}: {message}")]
    InvalidOperation { message: String, span: Span },

    /// The inference-state protocol was violated.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CompilationError {
    /// Where the error occurred. Internal errors have no location.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::InferenceConflict { span, .. } => *span,
            CompilationError::TypeMismatch { span, .. } => *span,
            CompilationError::Unsupported { span, .. } => *span,
            CompilationError::UnresolvedFeature { span, .. } => *span,
            CompilationError::InvalidOperation { span, .. } => *span,
            CompilationError::Internal { .. } => Span::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }

    pub fn unsupported(kind: impl Into<String>, span: Span) -> Self {
        CompilationError::Unsupported {
            kind: kind.into(),
            span,
        }
    }

    pub fn is_inference_conflict(&self) -> bool {
        matches!(self, CompilationError::InferenceConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_the_kind() {
        let err = CompilationError::unsupported("PatternMatch", Span::new(4, 2, 7));
        assert_eq!(
            format!("{err}"),
            "at 4:2: couldn't find a compilation strategy for expressions of type PatternMatch"
        );
        assert_eq!(err.span(), Span::new(4, 2, 7));
    }

    #[test]
    fn conflict_display() {
        let err = CompilationError::InferenceConflict {
            first: "int".to_string(),
            second: "java.lang.Integer".to_string(),
            span: Span::new(1, 1, 1),
        };
        assert!(err.is_inference_conflict());
        assert_eq!(
            format!("{err}"),
            "at 1:1: conflicting types for expression: 'int' and 'java.lang.Integer'"
        );
    }

    #[test]
    fn internal_has_no_location() {
        let err = CompilationError::internal("state 3 was discarded");
        assert_eq!(err.span(), Span::default());
        assert_eq!(format!("{err}"), "internal error: state 3 was discarded");
    }
}
