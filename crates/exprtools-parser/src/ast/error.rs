//! Parse error types for the expression parser.
//!
//! Lexing and parsing stop at the first problem. The resulting
//! [`ParseError`] converts into [`ExprError`], so callers of the builder see
//! a single error type.

use exprtools_core::{ExprError, Span};
use std::fmt;

/// A parse error with location and diagnostic information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} at {}", self.kind, self.span)
        } else {
            write!(f, "{} at {}: {}", self.kind, self.span, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    // Lexical errors
    UnexpectedChar,
    UnterminatedString,
    UnterminatedComment,
    InvalidNumber,
    InvalidEscape,

    // Token-level errors
    ExpectedToken,
    UnexpectedToken,

    // Expression errors
    ExpectedExpression,
    ExpectedType,
    ExpectedLambda,
    /// A recognised operator outside the supported set.
    UnsupportedOperator,
    /// Input left over after the single top-level lambda.
    TrailingInput,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::UnexpectedChar => "unexpected character",
            ParseErrorKind::UnterminatedString => "unterminated literal",
            ParseErrorKind::UnterminatedComment => "unterminated comment",
            ParseErrorKind::InvalidNumber => "invalid number",
            ParseErrorKind::InvalidEscape => "invalid escape sequence",
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedLambda => "expected lambda expression",
            ParseErrorKind::UnsupportedOperator => "unsupported operator",
            ParseErrorKind::TrailingInput => "unexpected trailing input",
        };
        write!(f, "{}", text)
    }
}

impl From<ParseError> for ExprError {
    fn from(err: ParseError) -> Self {
        match err.kind {
            ParseErrorKind::UnsupportedOperator => ExprError::UnsupportedOperator {
                op: err.message,
                span: err.span,
            },
            _ => ExprError::Syntax {
                message: if err.message.is_empty() {
                    err.kind.to_string()
                } else {
                    format!("{}: {}", err.kind, err.message)
                },
                span: err.span,
            },
        }
    }
}
