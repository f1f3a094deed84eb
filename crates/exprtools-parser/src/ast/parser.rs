//! Parser state and entry points.
//!
//! The [`Parser`] holds the fully lexed token buffer and a position into it.
//! Lookahead is unbounded, and speculative parses (casts, generic names)
//! save and restore `position` to backtrack.

use bumpalo::Bump;
use exprtools_core::Span;

use crate::ast::expr::{Expr, LambdaExpr};
use crate::ast::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};

/// Expression parser over an arena.
pub struct Parser<'ast> {
    pub(super) buffer: Vec<Token<'ast>>,
    pub(super) position: usize,
    pub(super) arena: &'ast Bump,
    /// Tokens replaced by `>>` splits, for undoing on backtrack.
    splits: Vec<(usize, Token<'ast>)>,
}

/// A saved parser position.
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoint {
    position: usize,
    splits: usize,
}

impl<'ast> Parser<'ast> {
    /// Lex `source` into a new parser.
    pub fn new(source: &str, arena: &'ast Bump) -> Result<Self, ParseError> {
        let buffer = Lexer::new(source, arena).tokenize()?;
        Ok(Self {
            buffer,
            position: 0,
            arena,
            splits: Vec::new(),
        })
    }

    /// Parse a complete lambda: a single lambda expression, optionally
    /// followed by one `;`, and nothing else.
    ///
    /// # Example
    ///
    /// ```
    /// use exprtools_parser::Parser;
    /// use bumpalo::Bump;
    ///
    /// let arena = Bump::new();
    /// let lambda = Parser::parse_lambda("(a, b) => a * b", &arena).unwrap();
    /// assert_eq!(lambda.params.len(), 2);
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_lambda(source: &str, arena: &'ast Bump) -> Result<&'ast LambdaExpr<'ast>, ParseError> {
        let mut parser = Parser::new(source, arena)?;
        tracing::trace!(tokens = parser.buffer.len(), "parsing lambda");

        let expr = parser.parse_expr(0)?;
        let lambda = match expr.unparenthesized() {
            Expr::Lambda(lambda) => *lambda,
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedLambda,
                    other.span(),
                    format!("found {}", other.kind_name()),
                ));
            }
        };

        parser.eat(TokenKind::Semicolon);
        parser.expect_end()?;
        Ok(lambda)
    }

    /// Parse a complete standalone expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_expression(source: &str, arena: &'ast Bump) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut parser = Parser::new(source, arena)?;
        let expr = parser.parse_expr(0)?;
        parser.expect_end()?;
        Ok(expr)
    }

    // =========================================
    // Token access
    // =========================================

    /// The current token. The buffer always ends with `Eof`, which is
    /// returned for any position past the end.
    pub(super) fn peek(&self) -> &Token<'ast> {
        self.peek_nth(0)
    }

    pub(super) fn peek_nth(&self, n: usize) -> &Token<'ast> {
        let last = self.buffer.len() - 1;
        &self.buffer[(self.position + n).min(last)]
    }

    pub(super) fn advance(&mut self) -> Token<'ast> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.peek();
        Err(ParseError::new(
            ParseErrorKind::ExpectedToken,
            found.span,
            format!("expected {}, found {}", kind, found.kind),
        ))
    }

    /// Span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        self.position
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Consume a `>` that closes a generic argument list, splitting a `>>`
    /// token in two when needed.
    pub(super) fn expect_closing_angle(&mut self) -> Result<Token<'ast>, ParseError> {
        if self.check(TokenKind::GreaterGreater) {
            let token = *self.peek();
            let first = Token::new(
                TokenKind::Greater,
                &token.lexeme[..1],
                Span::new(token.span.line, token.span.col, token.span.offset, 1),
            );
            let second = Token::new(
                TokenKind::Greater,
                &token.lexeme[1..],
                Span::new(token.span.line, token.span.col + 1, token.span.offset + 1, 1),
            );
            self.splits.push((self.position, token));
            self.buffer[self.position] = second;
            return Ok(first);
        }
        self.expect(TokenKind::Greater)
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            splits: self.splits.len(),
        }
    }

    /// Return to a checkpoint, undoing any `>>` splits made since.
    pub(super) fn rewind(&mut self, checkpoint: Checkpoint) {
        while self.splits.len() > checkpoint.splits {
            if let Some((index, token)) = self.splits.pop() {
                self.buffer[index] = token;
            }
        }
        self.position = checkpoint.position;
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            return Ok(());
        }
        let kind = if token.kind.is_unsupported_operator() {
            ParseErrorKind::UnsupportedOperator
        } else {
            ParseErrorKind::TrailingInput
        };
        let message = if kind == ParseErrorKind::UnsupportedOperator {
            token.lexeme.to_string()
        } else {
            format!("found {}", token.kind)
        };
        Err(ParseError::new(kind, token.span, message))
    }
}
