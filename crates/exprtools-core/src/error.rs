//! Error types for building, evaluating and inspecting expression trees.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ExprError   - raised by parse/build; one variant per failure class
//! EvalError   - raised while interpreting a tree or calling host members
//! PathError   - raised when a lambda is not a pure member-access chain
//! ```
//!
//! Inlining, constant folding and serialization never fail.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Build Errors
// ============================================================================

/// Errors raised while turning expression text into a typed tree.
///
/// Every variant carries the span of the syntax that triggered it. The
/// builder stops at the first error; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Unparsable text, several top-level statements, or trailing input.
    #[error("at {span}: syntax error: {message}")]
    Syntax { message: String, span: Span },

    /// An identifier that resolved to neither a parameter, method nor type.
    #[error("at {span}: unresolved identifier '{name}'")]
    UnresolvedIdentifier { name: String, span: Span },

    /// A type annotation, cast target or generic argument that is unknown.
    #[error("at {span}: unresolved type '{name}'")]
    UnresolvedType { name: String, span: Span },

    /// A property, field or static member that the host type does not have.
    #[error("at {span}: type '{type_name}' has no member '{member}'")]
    UnresolvedMember {
        member: String,
        type_name: String,
        span: Span,
    },

    /// An operator outside the supported table.
    #[error("at {span}: unsupported operator '{op}'")]
    UnsupportedOperator { op: String, span: Span },

    /// Mismatched array elements, operand types, or no matching method.
    #[error("at {span}: {message}")]
    ArgumentShape { message: String, span: Span },
}

impl ExprError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ExprError::Syntax { span, .. }
            | ExprError::UnresolvedIdentifier { span, .. }
            | ExprError::UnresolvedType { span, .. }
            | ExprError::UnresolvedMember { span, .. }
            | ExprError::UnsupportedOperator { span, .. }
            | ExprError::ArgumentShape { span, .. } => *span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        ExprError::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn argument_shape(message: impl Into<String>, span: Span) -> Self {
        ExprError::ArgumentShape {
            message: message.into(),
            span,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ExprError::Syntax { .. })
    }

    pub fn is_unresolved_identifier(&self) -> bool {
        matches!(self, ExprError::UnresolvedIdentifier { .. })
    }

    pub fn is_unresolved_type(&self) -> bool {
        matches!(self, ExprError::UnresolvedType { .. })
    }

    pub fn is_unresolved_member(&self) -> bool {
        matches!(self, ExprError::UnresolvedMember { .. })
    }

    pub fn is_unsupported_operator(&self) -> bool {
        matches!(self, ExprError::UnsupportedOperator { .. })
    }

    pub fn is_argument_shape(&self) -> bool {
        matches!(self, ExprError::ArgumentShape { .. })
    }

    /// Render the error followed by the offending source line and a caret
    /// marker under the span.
    pub fn display_with_source(&self, source: &str) -> String {
        let span = self.span();
        let line = source
            .lines()
            .nth(span.line.saturating_sub(1) as usize)
            .unwrap_or("");
        let pad = " ".repeat(span.col.saturating_sub(1) as usize);
        let marks = "^".repeat(span.len.max(1) as usize);
        format!("{}\n  {}\n  {}{}", self, line, pad, marks)
    }
}

// ============================================================================
// Evaluation Errors
// ============================================================================

/// Errors raised while evaluating a tree or invoking a host member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A value did not have the shape the node's type promised.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A member or method was applied to null.
    #[error("null reference while evaluating {context}")]
    NullReference { context: String },

    /// Integral division or remainder by zero.
    #[error("division by zero")]
    DivideByZero,

    /// Array or indexer access outside the bounds.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// A lambda was called with the wrong number of arguments.
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    /// A parameter reference with no bound argument.
    #[error("unbound parameter '{0}'")]
    UnboundParameter(String),

    /// A member or method without a native implementation.
    #[error("'{0}' has no native implementation")]
    NotInvocable(String),

    /// A node kind the evaluator cannot interpret.
    #[error("cannot evaluate {0}")]
    Unsupported(String),

    /// Failure reported by a native host function.
    #[error("{0}")]
    Native(String),
}

impl EvalError {
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

// ============================================================================
// Property Path Errors
// ============================================================================

/// Errors raised when extracting a member path from a lambda.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The body contains a node that is not a member access or parameter.
    #[error("unexpected use of {0} in the given expression")]
    UnexpectedNode(&'static str),

    /// The body is a bare parameter, so there is no member to name.
    #[error("the expression does not access any member")]
    NoMember,
}
